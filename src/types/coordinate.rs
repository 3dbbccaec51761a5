use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Renders as `"lat,lng"`, the form every
/// Google endpoint accepts for a location parameter.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Coordinate { lat, lng }
    }

    /// Parses the `"lat,lng"` form returned by IP geolocation services.
    pub fn parse_pair(pair: &str) -> Option<Self> {
        let (lat, lng) = pair.split_once(',')?;
        let lat = lat.trim().parse::<f64>().ok()?;
        let lng = lng.trim().parse::<f64>().ok()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
            return None;
        }

        Some(Coordinate { lat, lng })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

/// Where the user is, both as a coordinate for the places query and as text
/// for the directions query.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub coordinate: Coordinate,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_comma_joined_pair() {
        assert_eq!(Coordinate::new(51.5237, -0.1585).to_string(), "51.5237,-0.1585");
    }

    #[test]
    fn parses_ipinfo_loc_field() {
        assert_eq!(
            Coordinate::parse_pair("40.7143,-74.0060"),
            Some(Coordinate::new(40.7143, -74.006))
        );
        assert_eq!(
            Coordinate::parse_pair(" 1.5 , 2.5 "),
            Some(Coordinate::new(1.5, 2.5))
        );
    }

    #[test]
    fn rejects_malformed_pairs() {
        assert_eq!(Coordinate::parse_pair(""), None);
        assert_eq!(Coordinate::parse_pair("40.7"), None);
        assert_eq!(Coordinate::parse_pair("north,west"), None);
        assert_eq!(Coordinate::parse_pair("91.0,0.0"), None);
        assert_eq!(Coordinate::parse_pair("0.0,181.0"), None);
    }
}
