//! Static lookup from location names to geographic coordinates.
//!
//! Keys are stored lower-cased and trimmed, and every lookup is normalized the
//! same way, so producer casing ("DS" vs "ds") never decides whether a
//! waypoint resolves.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// Built-in campus locations served by the routing executable.
const CAMPUS_LOCATIONS: &[(&str, f64, f64)] = &[
    ("main gate", 29.375000, 79.531111),
    ("oat", 29.375278, 79.530000),
    ("basketball", 29.375000, 79.530278),
    ("cricket ground", 29.375000, 79.529444),
    ("bus", 29.374444, 79.531111),
    ("ds", 29.375278, 79.529722),
    ("academic block a", 29.375278, 79.530833),
    ("academic block c", 29.374444, 79.530556),
    ("academic block d", 29.374444, 79.530000),
    ("library", 29.375556, 79.530556),
    ("canteen", 29.375000, 79.530833),
    ("volleyball ground", 29.375000, 79.530000),
    ("hostel", 29.375833, 79.529444),
    ("saisandhya hall", 29.375556, 79.530000),
    ("academic block b", 29.374722, 79.529722),
];

static CAMPUS: Lazy<Gazetteer> = Lazy::new(|| {
    Gazetteer::from_entries(
        CAMPUS_LOCATIONS
            .iter()
            .map(|&(name, lat, lon)| (name, Coordinate::new(lat, lon))),
    )
});

/// Normalize a waypoint name for lookup.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Read-only name → coordinate table.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: HashMap<String, Coordinate>,
}

impl Gazetteer {
    /// The built-in campus table.
    pub fn campus() -> &'static Gazetteer {
        &CAMPUS
    }

    /// Build a gazetteer from `(name, coordinate)` pairs.
    ///
    /// Names are normalized on insertion; when two names normalize to the same
    /// key the later entry wins.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinate)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(name, coord)| (normalize_name(name.as_ref()), coord))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { entries }
    }

    /// Parse a JSON object mapping names to `[lat, lon]` arrays.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, [f64; 2]> = serde_json::from_str(json)?;
        let mut entries = Vec::with_capacity(raw.len());
        for (name, [lat, lon]) in raw {
            let coord = Coordinate::new(lat, lon);
            if !coord.is_valid() {
                return Err(Error::InvalidCoordinate { name, lat, lon });
            }
            entries.push((name, coord));
        }
        Ok(Self::from_entries(entries))
    }

    /// Load a gazetteer from a JSON file. See [`Gazetteer::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::GazetteerRead {
            path: path.to_path_buf(),
            source,
        })?;
        let gazetteer = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            locations = gazetteer.len(),
            "loaded gazetteer"
        );
        Ok(gazetteer)
    }

    /// Look up a waypoint, ignoring case and surrounding whitespace.
    pub fn resolve(&self, name: &str) -> Option<Coordinate> {
        self.entries.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known location names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Known locations with their coordinates, sorted by name.
    pub fn entries(&self) -> Vec<(&str, Coordinate)> {
        let mut entries: Vec<(&str, Coordinate)> = self
            .entries
            .iter()
            .map(|(name, coord)| (name.as_str(), *coord))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
