/// Artist search results and coordinate extraction
///
/// One ArtistRecord per place returned by the location-grounded search.
/// Coordinates are best-effort: they only exist when one of the known
/// Google Maps URI patterns matches the record's link.

use regex::Regex;
use std::sync::OnceLock;

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Used when the device location is denied or unavailable (San Francisco)
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 37.7749,
    longitude: -122.4194,
};

/// One tattoo studio/artist from the grounded place search
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistRecord {
    pub title: String,
    pub uri: String,
    pub place_id: Option<String>,
    /// Star rating in 0.0..=5.0 when the source reported one
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    /// Only set when the link carried an extractable coordinate
    pub coordinate: Option<Coordinate>,
}

// Checked in order; the first matching pattern wins.
const COORDINATE_PATTERNS: [&str; 3] = [
    r"[?&]q=(-?[0-9.]+),(-?[0-9.]+)",
    r"@(-?[0-9.]+),(-?[0-9.]+)",
    r"ll=(-?[0-9.]+),(-?[0-9.]+)",
];

/// Extract a coordinate from a place link.
///
/// Maps links encode the position in several shapes (`?q=lat,lng`,
/// `@lat,lng`, `ll=lat,lng`). Links with no matching pattern yield
/// `None` rather than an error.
pub fn extract_coordinate(uri: &str) -> Option<Coordinate> {
    static REGEXES: OnceLock<Vec<Regex>> = OnceLock::new();
    let regexes = REGEXES.get_or_init(|| {
        COORDINATE_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern).expect("coordinate pattern must compile"))
            .collect()
    });

    for regex in regexes {
        if let Some(captures) = regex.captures(uri) {
            let latitude = captures[1].parse::<f64>();
            let longitude = captures[2].parse::<f64>();
            if let (Ok(latitude), Ok(longitude)) = (latitude, longitude) {
                return Some(Coordinate {
                    latitude,
                    longitude,
                });
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_pattern() {
        let uri = "https://www.google.com/maps/place/Ink/@37.7749,-122.4194,15z/data=abc";
        let coordinate = extract_coordinate(uri).unwrap();
        assert_eq!(coordinate.latitude, 37.7749);
        assert_eq!(coordinate.longitude, -122.4194);
    }

    #[test]
    fn test_query_pattern() {
        let coordinate = extract_coordinate("https://maps.google.com/?q=40.7128,-74.006").unwrap();
        assert_eq!(coordinate.latitude, 40.7128);
        assert_eq!(coordinate.longitude, -74.006);
    }

    #[test]
    fn test_ll_pattern() {
        let coordinate = extract_coordinate("https://maps.google.com/maps?ll=51.5,-0.12").unwrap();
        assert_eq!(coordinate.latitude, 51.5);
        assert_eq!(coordinate.longitude, -0.12);
    }

    #[test]
    fn test_query_pattern_wins_over_at() {
        // Both shapes present: the q= pattern is checked first
        let uri = "https://maps.google.com/?q=1.5,2.5/@3.5,4.5";
        let coordinate = extract_coordinate(uri).unwrap();
        assert_eq!(coordinate.latitude, 1.5);
        assert_eq!(coordinate.longitude, 2.5);
    }

    #[test]
    fn test_no_pattern_yields_none() {
        assert!(extract_coordinate("https://maps.google.com/place/some-studio").is_none());
        assert!(extract_coordinate("").is_none());
    }

    #[test]
    fn test_q_needs_parameter_boundary() {
        // "q=" must be a query parameter, not part of another word
        assert!(extract_coordinate("https://x.test/freq=1,2").is_none());
        assert!(extract_coordinate("https://x.test/path?q=1,2").is_some());
    }
}
