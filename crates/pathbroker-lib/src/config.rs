//! Broker configuration.
//!
//! # Environment Variables
//!
//! - `PATHFINDER_EXECUTABLE`: program to spawn (default: `integrated`)
//! - `PATHFINDER_LAUNCHER_ARGS`: whitespace-separated arguments placed before
//!   the positional parameters (default: none)
//! - `PATHFINDER_MODE_FLAG`: trailing output-mode flag, empty to disable
//!   (default: `--web`)
//! - `PATHFINDER_TIMEOUT_SECS`: per-run deadline in seconds (default: 30)
//! - `PATHFINDER_MAX_CONCURRENCY`: simultaneous subprocesses (default: 4)
//! - `MAP_LINK_BASE_URL`: directions link template
//! - `GAZETTEER_PATH`: JSON gazetteer replacing the built-in campus table

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::maplink::DEFAULT_MAP_BASE_URL;

pub const DEFAULT_EXECUTABLE: &str = "integrated";
pub const DEFAULT_MODE_FLAG: &str = "--web";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// How the external path-finder is launched and how its results are linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerConfig {
    pub executable: PathBuf,
    pub launcher_args: Vec<String>,
    pub mode_flag: Option<String>,
    pub timeout: Duration,
    pub max_concurrent: usize,
    pub map_base_url: String,
    pub gazetteer_path: Option<PathBuf>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from(DEFAULT_EXECUTABLE),
            launcher_args: Vec::new(),
            mode_flag: Some(DEFAULT_MODE_FLAG.to_string()),
            timeout: DEFAULT_TIMEOUT,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            map_base_url: DEFAULT_MAP_BASE_URL.to_string(),
            gazetteer_path: None,
        }
    }
}

impl BrokerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(executable) = lookup("PATHFINDER_EXECUTABLE").filter(|v| !v.trim().is_empty())
        {
            config.executable = PathBuf::from(executable.trim());
        }
        if let Some(args) = lookup("PATHFINDER_LAUNCHER_ARGS") {
            config.launcher_args = args.split_whitespace().map(str::to_string).collect();
        }
        if let Some(flag) = lookup("PATHFINDER_MODE_FLAG") {
            config.mode_flag = Some(flag.trim().to_string()).filter(|f| !f.is_empty());
        }
        if let Some(secs) = lookup("PATHFINDER_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_positive("PATHFINDER_TIMEOUT_SECS", &secs)?);
        }
        if let Some(max) = lookup("PATHFINDER_MAX_CONCURRENCY") {
            config.max_concurrent = parse_positive("PATHFINDER_MAX_CONCURRENCY", &max)? as usize;
        }
        if let Some(base) = lookup("MAP_LINK_BASE_URL").filter(|v| !v.trim().is_empty()) {
            config.map_base_url = base.trim().to_string();
        }
        if let Some(path) = lookup("GAZETTEER_PATH").filter(|v| !v.trim().is_empty()) {
            config.gazetteer_path = Some(PathBuf::from(path.trim()));
        }

        Ok(config)
    }

    pub fn with_executable(mut self, executable: impl Into<PathBuf>) -> Self {
        self.executable = executable.into();
        self
    }

    pub fn with_launcher_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launcher_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_mode_flag(mut self, flag: Option<String>) -> Self {
        self.mode_flag = flag;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| Error::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
        })
}
