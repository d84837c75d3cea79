//! Output formatting for broker replies and location listings.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use pathbroker_lib::{BrokerReply, Gazetteer};

/// Line printed in place of a link when no waypoint resolved.
pub const NO_MAP_LINK: &str = "Map: unavailable (no waypoint matched a known location)";

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

#[derive(Debug, Serialize)]
struct LocationEntry<'a> {
    name: &'a str,
    lat: f64,
    lon: f64,
}

/// Render a broker reply.
///
/// Text output is the summary followed by a `Map:` line.
pub fn render_reply(reply: &BrokerReply, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reply)?),
        OutputFormat::Text => {
            let mut out = String::new();
            writeln!(out, "{}", reply.summary.trim_end())?;
            match &reply.map_link {
                Some(link) => writeln!(out, "Map: {}", link)?,
                None if reply.is_success() => writeln!(out, "{}", NO_MAP_LINK)?,
                None => {}
            }
            Ok(out)
        }
    }
}

/// Render the gazetteer as a name/coordinate table.
pub fn render_locations(gazetteer: &Gazetteer, format: OutputFormat) -> Result<String> {
    let entries: Vec<LocationEntry<'_>> = gazetteer
        .entries()
        .into_iter()
        .map(|(name, coord)| LocationEntry {
            name,
            lat: coord.lat,
            lon: coord.lon,
        })
        .collect();

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text => {
            let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
            let mut out = String::new();
            for entry in &entries {
                writeln!(
                    out,
                    "{:<width$}  {},{}",
                    entry.name,
                    entry.lat,
                    entry.lon,
                    width = width
                )?;
            }
            Ok(out)
        }
    }
}
