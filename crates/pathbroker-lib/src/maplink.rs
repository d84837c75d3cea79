//! Directions deep links built from resolved waypoints.

use crate::gazetteer::{Coordinate, Gazetteer};

/// Foot-routing directions template on openstreetmap.org.
pub const DEFAULT_MAP_BASE_URL: &str =
    "https://www.openstreetmap.org/directions?engine=fossgis_osrm_foot&route=";

/// Builds links of the form `<base><lat1,lon1>;<lat2,lon2>;...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLinkSynthesizer {
    base_url: String,
}

impl Default for MapLinkSynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAP_BASE_URL)
    }
}

impl MapLinkSynthesizer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Build a link through every waypoint the gazetteer knows, in path order.
    ///
    /// Unknown waypoints are skipped. Returns `None` when nothing resolves.
    pub fn synthesize<S: AsRef<str>>(&self, path: &[S], gazetteer: &Gazetteer) -> Option<String> {
        let coords: Vec<String> = path
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                let coord = gazetteer.resolve(name);
                if coord.is_none() {
                    tracing::debug!(waypoint = name, "waypoint not in gazetteer, skipping");
                }
                coord
            })
            .map(|coord| coord.to_string())
            .collect();

        if coords.is_empty() {
            return None;
        }

        Some(format!("{}{}", self.base_url, coords.join(";")))
    }
}

/// Recover the ordered coordinates from a link's `route=` parameter.
///
/// Pairs that do not parse are ignored.
pub fn route_coordinates(link: &str) -> Vec<Coordinate> {
    let Some((_, route)) = link.split_once("route=") else {
        return Vec::new();
    };
    let route = route.split(['&', '#']).next().unwrap_or_default();

    route
        .split(';')
        .filter_map(|pair| {
            let (lat, lon) = pair.split_once(',')?;
            Some(Coordinate::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::split_waypoints;

    #[test]
    fn empty_path_has_no_link() {
        let path: [&str; 0] = [];
        assert_eq!(
            MapLinkSynthesizer::default().synthesize(&path, Gazetteer::campus()),
            None
        );
    }

    #[test]
    fn unresolved_only_path_has_no_link() {
        let link = MapLinkSynthesizer::default().synthesize(&["nowhere"], Gazetteer::campus());
        assert!(link.is_none());
    }

    #[test]
    fn single_waypoint_link() {
        let link = MapLinkSynthesizer::default()
            .synthesize(&["main gate"], Gazetteer::campus())
            .unwrap();
        assert_eq!(
            link,
            "https://www.openstreetmap.org/directions?engine=fossgis_osrm_foot&route=29.375,79.531111"
        );
    }

    #[test]
    fn custom_base_url_is_used_verbatim() {
        let synthesizer = MapLinkSynthesizer::new("https://maps.test/directions?engine=foot&route=");
        let link = synthesizer
            .synthesize(&["library"], Gazetteer::campus())
            .unwrap();
        assert_eq!(
            link,
            "https://maps.test/directions?engine=foot&route=29.375556,79.530556"
        );
    }

    #[test]
    fn path_text_accepts_legacy_separators() {
        let synthesizer = MapLinkSynthesizer::default();
        let arrow = synthesizer.synthesize(&split_waypoints("oat → hostel"), Gazetteer::campus());
        let typo = synthesizer.synthesize(&split_waypoints("oat ? hostel"), Gazetteer::campus());
        assert!(arrow.is_some());
        assert_eq!(arrow, typo);
    }

    #[test]
    fn route_coordinates_ignores_trailing_fragment() {
        let coords = route_coordinates("https://x.test/d?route=1.5,2.5;3,4#map=19/1/2");
        assert_eq!(coords, vec![Coordinate::new(1.5, 2.5), Coordinate::new(3.0, 4.0)]);
    }

    #[test]
    fn route_coordinates_without_route_param_is_empty() {
        assert!(route_coordinates("https://x.test/d?engine=foot").is_empty());
    }
}
