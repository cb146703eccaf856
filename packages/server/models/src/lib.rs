#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the flood watch server.
//!
//! Field names are part of the wire contract consumed by the map
//! frontend; they stay `snake_case` and `null`-bearing fields are always
//! serialized.

use flood_watch_analysis_models::{FloodAssessment, MapTiles};
use flood_watch_geography_models::AoiOrigin;
use serde::{Deserialize, Serialize};

/// Body of `POST /analyze_flood`.
///
/// One of the two input modes is expected; `city` takes precedence when
/// both are supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeFloodRequest {
    /// Named city; must match a boundary-table key exactly.
    pub city: Option<String>,
    /// Latitude (WGS84 degrees).
    pub latitude: Option<f64>,
    /// Longitude (WGS84 degrees).
    pub longitude: Option<f64>,
}

/// Success body of `POST /analyze_flood`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeFloodResponse {
    /// Always `true` for this body.
    pub success: bool,
    /// Resolved city name, or `null` for coordinate requests.
    pub city: Option<String>,
    /// Request latitude, or `null` for city requests.
    pub latitude: Option<f64>,
    /// Request longitude, or `null` for city requests.
    pub longitude: Option<f64>,
    /// Analysis year (current year minus ten at request time).
    pub year: i32,
    /// Flooded share of the AOI, percent, two decimals.
    pub flood_percentage: f64,
    /// `"YES"` or `"NO"`.
    pub was_flooded: String,
    /// Overlay tile URL templates.
    pub map_tiles: MapTiles,
    /// Analyzed boundary as a `GeoJSON` geometry.
    pub aoi: geojson::Geometry,
    /// Historical annotation; empty outside the known flood year.
    pub historical_note: String,
}

impl From<FloodAssessment> for AnalyzeFloodResponse {
    fn from(assessment: FloodAssessment) -> Self {
        let (city, latitude, longitude) = match assessment.origin {
            AoiOrigin::City(name) => (Some(name), None, None),
            AoiOrigin::Point {
                latitude,
                longitude,
            } => (None, Some(latitude), Some(longitude)),
        };
        Self {
            success: true,
            city,
            latitude,
            longitude,
            year: assessment.year,
            flood_percentage: assessment.flood_percentage,
            was_flooded: if assessment.flooded { "YES" } else { "NO" }.to_string(),
            map_tiles: assessment.map_tiles,
            aoi: assessment.aoi,
            historical_note: assessment.historical_note,
        }
    }
}

/// Failure body for any analysis endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `false` for this body.
    pub success: bool,
    /// Human-readable failure description.
    pub error: String,
}

impl ErrorResponse {
    /// Builds a failure body from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// `GET /api/health` body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiHealth {
    /// Liveness flag.
    pub healthy: bool,
    /// Server crate version.
    pub version: String,
}
