//! Path broker CLI library.
//!
//! Rendering helpers shared by the `pathbroker-cli` binary.

pub mod output;
