/// Device coordinate resolution
///
/// Desktop machines have no GPS, so the coordinate comes from the
/// INK_STUDIO_LAT / INK_STUDIO_LNG environment variables when both
/// parse, and falls back to a fixed default (San Francisco) otherwise.
/// Resolution never fails; the search always has somewhere to anchor.

use crate::state::artist::{Coordinate, DEFAULT_COORDINATE};

pub fn current_coordinate() -> Coordinate {
    let coordinate = coordinate_from_parts(
        parse_env("INK_STUDIO_LAT"),
        parse_env("INK_STUDIO_LNG"),
    );
    if coordinate == DEFAULT_COORDINATE {
        log::warn!("No device location configured; defaulting to San Francisco");
    }
    coordinate
}

fn parse_env(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.trim().parse().ok()
}

fn coordinate_from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Coordinate {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Coordinate {
            latitude,
            longitude,
        },
        _ => DEFAULT_COORDINATE,
    }
}
