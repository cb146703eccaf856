#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Result types produced by the flood analysis pipeline.

use flood_watch_geography_models::AoiOrigin;
use serde::{Deserialize, Serialize};

/// Tile URL templates for the two overlay layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTiles {
    /// Flood mask overlay (white → red over the masked pixels).
    pub flood: String,
    /// AOI boundary outline (blue stroke).
    pub aoi: String,
}

/// The complete outcome of one flood analysis.
///
/// Constructed once per request, immutable, returned and discarded;
/// nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodAssessment {
    /// The input the AOI was resolved from (city or coordinate).
    pub origin: AoiOrigin,
    /// The year the before/after windows were taken from.
    pub year: i32,
    /// Flooded share of the AOI, in percent, two-decimal precision.
    pub flood_percentage: f64,
    /// Verdict: `flood_percentage` strictly above the verdict threshold.
    pub flooded: bool,
    /// Overlay tile URL templates.
    pub map_tiles: MapTiles,
    /// The analyzed boundary as `GeoJSON`.
    pub aoi: geojson::Geometry,
    /// Historical annotation; empty for all but the known flood year.
    pub historical_note: String,
}
