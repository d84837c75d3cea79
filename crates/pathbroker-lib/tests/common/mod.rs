//! Shared helpers for integration tests that drive a stand-in path-finder.
//!
//! Scripts are run as `sh <script> <algorithm> <source> <destination> [flag]`
//! through the launcher prefix, so the script file itself never needs the
//! executable bit.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pathbroker_lib::{BrokerConfig, Gazetteer, PathBroker};
use tempfile::TempDir;

/// A stand-in path-finder script living in its own temporary directory.
pub struct FakePathfinder {
    _dir: TempDir,
    pub script: PathBuf,
}

impl FakePathfinder {
    pub fn new(body: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let script = dir.path().join("pathfinder.sh");
        fs::write(&script, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        Self { _dir: dir, script }
    }

    pub fn config(&self) -> BrokerConfig {
        BrokerConfig::default()
            .with_executable("sh")
            .with_launcher_args([self.script.display().to_string()])
            .with_timeout(Duration::from_secs(10))
    }

    pub fn broker(&self) -> PathBroker {
        self.broker_with(self.config())
    }

    pub fn broker_with(&self, config: BrokerConfig) -> PathBroker {
        PathBroker::new(&config, Arc::new(Gazetteer::campus().clone()))
    }
}
