//! Path broker library entry points.
//!
//! This crate launches an external path-finding executable, interprets its
//! output under the structured, text and URL contracts producers have used,
//! and turns the resulting waypoint sequence into a directions link.
//! Frontends (CLI, HTTP service) should only depend on the items exported
//! here instead of reimplementing behavior.

pub mod broker;
pub mod config;
pub mod error;
pub mod gazetteer;
pub mod maplink;
pub mod orchestrator;
pub mod parser;

pub use broker::{BrokerReply, PathBroker};
pub use config::BrokerConfig;
pub use error::{Error, Result};
pub use gazetteer::{Coordinate, Gazetteer};
pub use maplink::{route_coordinates, MapLinkSynthesizer, DEFAULT_MAP_BASE_URL};
pub use orchestrator::{Orchestrator, PathQuery};
pub use parser::{
    parse, split_waypoints, FailureKind, OutputFormat, RawProcessOutput, RouteFailure,
    RouteResult, RouteSuccess,
};
