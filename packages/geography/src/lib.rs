#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! City boundary table and area-of-interest resolution.
//!
//! Turns an analysis request (a named city, or a raw latitude/longitude)
//! into a buffered [`AreaOfInterest`] polygon. City boundaries come from
//! a TOML table embedded at compile time; the table is constructed once
//! at process start and passed explicitly into [`resolve_aoi`] so tests
//! can substitute their own.

pub mod buffer;
pub mod table;

use flood_watch_geography_models::{AoiOrigin, AreaOfInterest};
use thiserror::Error;

pub use table::CityBoundaryTable;

/// Buffer radius applied around every AOI, in meters.
///
/// Point inputs become a circle of this radius; city rectangles are
/// expanded outward by the same distance.
pub const AOI_BUFFER_METERS: f64 = 5000.0;

/// Errors that can occur while resolving an area of interest.
///
/// Both variants are client-fixable input errors and map to a 400 status
/// at the request boundary.
#[derive(Debug, Error)]
pub enum AoiError {
    /// The requested city is not in the boundary table.
    #[error("Unsupported city: {name}")]
    UnsupportedCity {
        /// The name that failed to match.
        name: String,
    },

    /// Neither a city name nor a coordinate pair was supplied.
    #[error("A city name or latitude/longitude coordinates are required")]
    MissingInput,
}

/// Resolves an analysis request into an [`AreaOfInterest`].
///
/// A city name takes precedence over coordinates when both are present.
/// Coordinates are trusted as WGS84 decimal degrees; no range validation
/// is performed.
///
/// # Errors
///
/// Returns [`AoiError::UnsupportedCity`] for a name absent from `table`
/// (exact match only), or [`AoiError::MissingInput`] when neither input
/// mode is supplied.
pub fn resolve_aoi(
    table: &CityBoundaryTable,
    city: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<AreaOfInterest, AoiError> {
    if let Some(name) = city {
        let bbox = table.get(name).ok_or_else(|| AoiError::UnsupportedCity {
            name: name.to_string(),
        })?;
        return Ok(AreaOfInterest {
            origin: AoiOrigin::City(name.to_string()),
            polygon: buffer::buffered_rect(bbox, AOI_BUFFER_METERS),
        });
    }

    if let (Some(lat), Some(lng)) = (latitude, longitude) {
        return Ok(AreaOfInterest {
            origin: AoiOrigin::Point {
                latitude: lat,
                longitude: lng,
            },
            polygon: buffer::buffered_circle(lat, lng, AOI_BUFFER_METERS),
        });
    }

    Err(AoiError::MissingInput)
}
