//! End-to-end request handling: spawn, parse, link.

use std::sync::Arc;

use serde::Serialize;

use crate::config::BrokerConfig;
use crate::error::{Error, Result};
use crate::gazetteer::Gazetteer;
use crate::maplink::MapLinkSynthesizer;
use crate::orchestrator::{Orchestrator, PathQuery};
use crate::parser::{parse, FailureKind, RawProcessOutput, RouteResult};

/// What the presentation layer receives for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrokerReply {
    pub result: RouteResult,
    pub summary: String,
    pub map_link: Option<String>,
}

impl BrokerReply {
    fn from_result(result: RouteResult, map_link: Option<String>) -> Self {
        let summary = result.summary();
        Self {
            result,
            summary,
            map_link,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Facade over the orchestrator, parser and link synthesizer.
#[derive(Debug, Clone)]
pub struct PathBroker {
    orchestrator: Orchestrator,
    synthesizer: MapLinkSynthesizer,
    gazetteer: Arc<Gazetteer>,
}

impl PathBroker {
    pub fn new(config: &BrokerConfig, gazetteer: Arc<Gazetteer>) -> Self {
        Self {
            orchestrator: Orchestrator::new(config),
            synthesizer: MapLinkSynthesizer::new(config.map_base_url.clone()),
            gazetteer,
        }
    }

    /// Build a broker, loading the gazetteer named by `config` or falling
    /// back to the built-in campus table.
    pub fn from_config(config: &BrokerConfig) -> Result<Self> {
        let gazetteer = match &config.gazetteer_path {
            Some(path) => Gazetteer::from_json_file(path)?,
            None => Gazetteer::campus().clone(),
        };
        Ok(Self::new(config, Arc::new(gazetteer)))
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Run one query to completion. Every failure is folded into the reply.
    pub async fn find_path(&self, query: &PathQuery) -> BrokerReply {
        tracing::info!(
            algorithm = %query.algorithm,
            source = %query.source,
            destination = %query.destination,
            "handling path request"
        );

        match self.orchestrator.run_path_computation(query).await {
            Ok(raw) => self.interpret(&raw),
            Err(err) => {
                tracing::warn!(error = %err, "path computation did not complete");
                BrokerReply::from_result(failure_for(&err), None)
            }
        }
    }

    /// Parse captured output and derive its map link.
    pub fn interpret(&self, raw: &RawProcessOutput) -> BrokerReply {
        let result = parse(raw);
        let map_link = match &result {
            RouteResult::Success(success) => match &success.producer_link {
                Some(link) => Some(link.clone()),
                None => self.synthesizer.synthesize(&success.path, &self.gazetteer),
            },
            RouteResult::Failure(_) => None,
        };

        if result.is_success() && map_link.is_none() {
            tracing::info!(
                waypoints = result.path().len(),
                "no waypoint resolved to a coordinate, omitting map link"
            );
        }

        BrokerReply::from_result(result, map_link)
    }
}

fn failure_for(err: &Error) -> RouteResult {
    match err {
        Error::Timeout { .. } => RouteResult::failure(FailureKind::Timeout, "timeout"),
        Error::AdmissionClosed => RouteResult::failure(
            FailureKind::Unavailable,
            "path broker is not accepting computations",
        ),
        other => RouteResult::failure(
            FailureKind::Launch,
            format!("failed to launch computation: {}", other),
        ),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn broker() -> PathBroker {
        PathBroker::new(&BrokerConfig::default(), Arc::new(Gazetteer::campus().clone()))
    }

    #[test]
    fn producer_link_bypasses_synthesis() {
        let reply = broker().interpret(&RawProcessOutput::new(
            0,
            "https://www.openstreetmap.org/directions?route=1,2;3,4\n",
        ));
        assert_eq!(
            reply.map_link.as_deref(),
            Some("https://www.openstreetmap.org/directions?route=1,2;3,4")
        );
        assert!(reply.is_success());
    }

    #[test]
    fn failures_never_carry_a_link() {
        let reply = broker().interpret(&RawProcessOutput::new(
            2,
            r#"{"success":true,"path":"main gate → library"}"#,
        ));
        assert!(reply.map_link.is_none());
        assert_eq!(reply.summary, "Error: computation exited with status 2");
    }

    #[test]
    fn timeout_maps_to_timeout_failure() {
        let result = failure_for(&Error::Timeout {
            after: Duration::from_secs(1),
        });
        assert_eq!(result, RouteResult::failure(FailureKind::Timeout, "timeout"));
    }

    #[test]
    fn other_errors_map_to_launch_failure() {
        let result = failure_for(&Error::EmptyArgument { field: "source" });
        match result {
            RouteResult::Failure(failure) => {
                assert_eq!(failure.kind, FailureKind::Launch);
                assert!(failure.message.contains("source"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn closed_admission_is_an_unavailable_failure() {
        let broker = broker();
        broker.orchestrator().close();
        let reply = broker
            .find_path(&PathQuery::new("1", "main gate", "library"))
            .await;

        assert_eq!(
            reply.result,
            RouteResult::failure(
                FailureKind::Unavailable,
                "path broker is not accepting computations"
            )
        );
        assert!(reply.map_link.is_none());
    }

    #[tokio::test]
    async fn missing_executable_is_a_launch_failure() {
        let config = BrokerConfig::default().with_executable("/nonexistent/pathfinder-binary");
        let broker = PathBroker::new(&config, Arc::new(Gazetteer::campus().clone()));
        let reply = broker
            .find_path(&PathQuery::new("1", "main gate", "library"))
            .await;

        assert!(!reply.is_success());
        assert!(reply.map_link.is_none());
        assert!(reply.summary.starts_with("Error: failed to launch computation"));
    }
}
