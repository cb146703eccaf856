#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Area-of-interest geometry types.
//!
//! An [`AreaOfInterest`] is the bounded geographic region a flood analysis
//! runs over. It is resolved once per request, from a named city or a
//! raw coordinate, and is immutable afterwards. All coordinates are
//! WGS84 decimal degrees, longitude first.

use geo::Polygon;
use serde::{Deserialize, Serialize};

/// A fixed rectangular boundary for a supported city (WGS84 degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Western longitude.
    pub west: f64,
    /// Southern latitude.
    pub south: f64,
    /// Eastern longitude.
    pub east: f64,
    /// Northern latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Creates a bounding box from `west, south, east, north` edges.
    #[must_use]
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Latitude of the box's horizontal midline.
    ///
    /// Used when converting a buffer distance in meters to degrees of
    /// longitude, which shrink with `cos(latitude)`.
    #[must_use]
    pub fn mid_latitude(&self) -> f64 {
        f64::midpoint(self.south, self.north)
    }

    /// Converts the box to a closed exterior ring.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            geo::LineString::from(vec![
                (self.west, self.south),
                (self.east, self.south),
                (self.east, self.north),
                (self.west, self.north),
                (self.west, self.south),
            ]),
            vec![],
        )
    }
}

/// How an area of interest was resolved.
///
/// Carried through the pipeline so the response can echo back the input
/// that produced the verdict.
#[derive(Debug, Clone, PartialEq)]
pub enum AoiOrigin {
    /// Resolved from a named city in the boundary table.
    City(String),
    /// Resolved from a request-supplied coordinate.
    Point {
        /// Latitude (WGS84).
        latitude: f64,
        /// Longitude (WGS84).
        longitude: f64,
    },
}

impl AoiOrigin {
    /// Human-readable label for log lines and the history page.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::City(name) => name.clone(),
            Self::Point {
                latitude,
                longitude,
            } => format!("{latitude:.4}, {longitude:.4}"),
        }
    }
}

/// The bounded region under analysis.
///
/// Invariant: the polygon encloses a non-degenerate region (point-derived
/// AOIs are always built with a positive buffer radius).
#[derive(Debug, Clone, PartialEq)]
pub struct AreaOfInterest {
    /// The input this AOI was resolved from.
    pub origin: AoiOrigin,
    /// Buffered boundary polygon (WGS84, lon/lat).
    pub polygon: Polygon<f64>,
}

impl AreaOfInterest {
    /// Converts the boundary to a `GeoJSON` geometry.
    ///
    /// The map frontend feeds this directly to `L.geoJSON` to zoom the
    /// viewport onto the analyzed region.
    #[must_use]
    pub fn to_geojson(&self) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::from(&self.polygon))
    }

    /// Exterior ring as `[lon, lat]` pairs, closing coordinate included.
    #[must_use]
    pub fn exterior_coordinates(&self) -> Vec<[f64; 2]> {
        self.polygon
            .exterior()
            .coords()
            .map(|c| [c.x, c.y])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_polygon_is_closed() {
        let bbox = BoundingBox::new(-8.57, 51.73, -7.96, 52.01);
        let polygon = bbox.to_polygon();
        let ring = polygon.exterior();
        assert_eq!(ring.coords().count(), 5);
        assert_eq!(ring.coords().next(), ring.coords().last());
    }

    #[test]
    fn point_origin_label_has_four_decimals() {
        let origin = AoiOrigin::Point {
            latitude: 51.9,
            longitude: -8.4,
        };
        assert_eq!(origin.label(), "51.9000, -8.4000");
    }

    #[test]
    fn geojson_conversion_produces_polygon() {
        let aoi = AreaOfInterest {
            origin: AoiOrigin::City("Cork".to_string()),
            polygon: BoundingBox::new(-8.57, 51.73, -7.96, 52.01).to_polygon(),
        };
        let geometry = aoi.to_geojson();
        assert!(matches!(geometry.value, geojson::Value::Polygon(_)));
    }
}
