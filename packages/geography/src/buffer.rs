//! Planar buffering helpers for AOI construction.
//!
//! The `geo` crate has no geodesic buffer, so distances in meters are
//! converted to degrees with a cos-latitude approximation. At city scale
//! (a few kilometers) the error is far below the 30 m sampling resolution
//! used by the statistics step.

use flood_watch_geography_models::BoundingBox;
use geo::{Coord, LineString, Polygon};

/// Meters per degree of latitude (WGS84 mean).
const METERS_PER_DEGREE_LAT: f64 = 111_320.0;

/// Number of vertices used to approximate a circular buffer.
const CIRCLE_SEGMENTS: usize = 64;

/// Degrees of latitude / longitude equivalent to `meters` at `latitude`.
fn degree_offsets(latitude: f64, meters: f64) -> (f64, f64) {
    let dlat = meters / METERS_PER_DEGREE_LAT;
    let dlng = meters / (METERS_PER_DEGREE_LAT * latitude.to_radians().cos());
    (dlat, dlng)
}

/// Expands a city rectangle outward by `meters` on every side.
#[must_use]
pub fn buffered_rect(bbox: &BoundingBox, meters: f64) -> Polygon<f64> {
    let (dlat, dlng) = degree_offsets(bbox.mid_latitude(), meters);
    BoundingBox::new(
        bbox.west - dlng,
        bbox.south - dlat,
        bbox.east + dlng,
        bbox.north + dlat,
    )
    .to_polygon()
}

/// Builds a circular polygon of radius `meters` around a point.
///
/// The ring is closed (first coordinate repeated at the end) and wound
/// counter-clockwise.
#[must_use]
pub fn buffered_circle(latitude: f64, longitude: f64, meters: f64) -> Polygon<f64> {
    let (dlat, dlng) = degree_offsets(latitude, meters);

    let mut coords: Vec<Coord<f64>> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = std::f64::consts::TAU * (i as f64) / (CIRCLE_SEGMENTS as f64);
            Coord {
                x: longitude + dlng * angle.cos(),
                y: latitude + dlat * angle.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);

    Polygon::new(LineString::from(coords), vec![])
}
