//! Launching the external path-finder.
//!
//! One subprocess per query. A semaphore bounds how many run at once; excess
//! queries wait for a permit in arrival order. Each run is bounded by a
//! deadline, after which the child is killed.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::BrokerConfig;
use crate::error::{Error, Result};
use crate::parser::RawProcessOutput;

/// Exit code reported when the child was terminated by a signal.
pub const SIGNAL_EXIT_CODE: i32 = -1;

/// One caller request for a path computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathQuery {
    pub algorithm: String,
    pub source: String,
    pub destination: String,
}

impl PathQuery {
    pub fn new(
        algorithm: impl Into<String>,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            algorithm: algorithm.into(),
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// Reject blank fields. Whether the executable understands the values is
    /// for the executable to decide.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("algorithm", &self.algorithm),
            ("source", &self.source),
            ("destination", &self.destination),
        ] {
            if value.trim().is_empty() {
                return Err(Error::EmptyArgument { field });
            }
        }
        Ok(())
    }
}

/// Owns subprocess lifecycle and admission control.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    executable: PathBuf,
    launcher_args: Vec<String>,
    mode_flag: Option<String>,
    timeout: Duration,
    max_concurrent: usize,
    permits: Arc<Semaphore>,
}

impl Orchestrator {
    pub fn new(config: &BrokerConfig) -> Self {
        let max_concurrent = config.max_concurrent.max(1);
        Self {
            executable: config.executable.clone(),
            launcher_args: config.launcher_args.clone(),
            mode_flag: config.mode_flag.clone(),
            timeout: config.timeout,
            max_concurrent,
            permits: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Permits not currently held by a running subprocess.
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    /// Stop admitting new runs. Queued and future calls fail with
    /// [`Error::AdmissionClosed`]; running subprocesses are unaffected.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Argument vector passed to the executable for `query`.
    pub fn command_args(&self, query: &PathQuery) -> Vec<String> {
        let mut args = self.launcher_args.clone();
        args.push(query.algorithm.trim().to_string());
        args.push(query.source.trim().to_string());
        args.push(query.destination.trim().to_string());
        if let Some(flag) = &self.mode_flag {
            args.push(flag.clone());
        }
        args
    }

    /// Run the path-finder for `query` and capture everything it wrote.
    ///
    /// A non-zero exit status is returned as data, not as an error.
    pub async fn run_path_computation(&self, query: &PathQuery) -> Result<RawProcessOutput> {
        query.validate()?;

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| Error::AdmissionClosed)?;

        let args = self.command_args(query);
        tracing::info!(
            executable = %self.executable.display(),
            args = ?args,
            "spawning path computation"
        );

        let child = Command::new(&self.executable)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.executable.display().to_string(),
                source,
            })?;

        let started = Instant::now();
        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "path computation timed out, killing subprocess"
                );
                return Err(Error::Timeout {
                    after: self.timeout,
                });
            }
        };

        let exit_code = output.status.code().unwrap_or(SIGNAL_EXIT_CODE);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        tracing::debug!(
            exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            stdout = %stdout,
            "path computation finished"
        );
        if !stderr.trim().is_empty() {
            tracing::warn!(stderr = %stderr.trim_end(), "path computation wrote to stderr");
        }
        if exit_code != 0 {
            tracing::warn!(exit_code, "path computation exited with non-zero status");
        }

        Ok(RawProcessOutput {
            exit_code,
            stdout,
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_names_the_blank_field() {
        let err = PathQuery::new("1", "main gate", "  ").validate().unwrap_err();
        assert!(matches!(err, Error::EmptyArgument { field: "destination" }));

        let err = PathQuery::new("", "main gate", "library").validate().unwrap_err();
        assert!(matches!(err, Error::EmptyArgument { field: "algorithm" }));
    }

    #[test]
    fn command_args_are_positional_with_trailing_flag() {
        let config = BrokerConfig::default().with_launcher_args(["wine"]);
        let orchestrator = Orchestrator::new(&config);
        let args = orchestrator.command_args(&PathQuery::new("1", " main gate ", "library"));
        assert_eq!(args, vec!["wine", "1", "main gate", "library", "--web"]);
    }

    #[test]
    fn command_args_without_mode_flag() {
        let config = BrokerConfig::default().with_mode_flag(None);
        let orchestrator = Orchestrator::new(&config);
        let args = orchestrator.command_args(&PathQuery::new("2", "oat", "hostel"));
        assert_eq!(args, vec!["2", "oat", "hostel"]);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let config = BrokerConfig::default().with_max_concurrent(0);
        let orchestrator = Orchestrator::new(&config);
        assert_eq!(orchestrator.max_concurrent(), 1);
        assert_eq!(orchestrator.available_permits(), 1);
    }

    #[tokio::test]
    async fn closed_gate_rejects_runs() {
        let orchestrator = Orchestrator::new(&BrokerConfig::default());
        orchestrator.close();
        let err = orchestrator
            .run_path_computation(&PathQuery::new("1", "oat", "hostel"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AdmissionClosed));
    }
}
