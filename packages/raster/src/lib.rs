#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Boundary to the external imagery service.
//!
//! The raster data source is an opaque collaborator: given a region, a
//! time range, and a band selector it returns a composite scene handle;
//! given a raster expression and a region it returns a scalar aggregate;
//! given a raster expression and a visualization spec it returns a
//! tile-serving URL template. Those three calls ([`ImageryService`])
//! are the only network round trips. Raster arithmetic (subtract,
//! threshold, mask, clip) is pure client-side expression building; see
//! [`expr::RasterExpr`].

pub mod expr;
pub mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use expr::{RasterExpr, SceneHandle};
pub use http::{HttpImageryService, ImageryServiceConfig};

/// Errors from imagery service operations.
#[derive(Debug, Error)]
pub enum RasterError {
    /// HTTP transport failed (after retries).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be interpreted.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// Authentication or initialization was rejected.
    ///
    /// Fatal at process start: the server must not come up without a
    /// working imagery session.
    #[error("Imagery service authentication failed: {message}")]
    Auth {
        /// Rejection detail from the service.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("Imagery service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error detail from the response body.
        message: String,
    },
}

/// Request for a median composite over a spatiotemporal window.
///
/// Acquisitions are filtered to those intersecting `region`, acquired in
/// `[start_date, end_date)`, whose polarisation list contains
/// `polarisation`, and whose instrument mode equals `instrument_mode`;
/// the single `band` is selected and the per-pixel median taken. A window
/// matching zero acquisitions still yields a handle; the gap only
/// surfaces when the composite is reduced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeSpec {
    /// Image collection identifier (e.g. `COPERNICUS/S1_GRD`).
    pub collection: String,
    /// Spatial filter geometry (`GeoJSON`, WGS84).
    pub region: geojson::Geometry,
    /// Acquisition window start (inclusive).
    pub start_date: NaiveDate,
    /// Acquisition window end (exclusive).
    pub end_date: NaiveDate,
    /// Required entry in the acquisition's polarisation list.
    pub polarisation: String,
    /// Required acquisition mode (e.g. `IW`).
    pub instrument_mode: String,
    /// Band selected from each acquisition.
    pub band: String,
}

/// Parameters for a region reduction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReduceParams {
    /// Sampling resolution in meters.
    pub scale_meters: f64,
    /// Upper bound on samples evaluated: a safety valve against runaway
    /// computation on the service side, not a precision knob.
    pub max_samples: u64,
}

/// Per-band scalar results of a region reduction.
///
/// A band can be absent or null when the reduced composite contained no
/// valid pixels over the region (e.g. a composite of zero images).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct BandValues(pub BTreeMap<String, Option<f64>>);

impl BandValues {
    /// Scalar value for `band`, if the reduction produced one.
    #[must_use]
    pub fn get(&self, band: &str) -> Option<f64> {
        self.0.get(band).copied().flatten()
    }
}

/// Visualization parameters for tile issuance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisParams {
    /// Value mapped to the first palette color.
    pub min: f64,
    /// Value mapped to the last palette color.
    pub max: f64,
    /// Color ramp (CSS color names or hex strings).
    pub palette: Vec<String>,
}

/// A tile-serving URL template issued by the service.
///
/// Contains `{z}/{x}/{y}` placeholders expanded by the map client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// The URL template.
    pub url_format: String,
}

/// The three blocking round trips to the imagery collaborator.
///
/// Implemented over HTTP by [`HttpImageryService`]; tests substitute a
/// canned implementation returning fixed handles and statistics.
#[async_trait]
pub trait ImageryService: Send + Sync {
    /// Requests a median composite and returns its opaque scene handle.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] if the round trip fails.
    async fn composite(&self, spec: &CompositeSpec) -> Result<SceneHandle, RasterError>;

    /// Reduces `raster` over `region` to its per-band spatial mean.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] if the round trip fails.
    async fn reduce_mean(
        &self,
        raster: &RasterExpr,
        region: &geojson::Geometry,
        params: &ReduceParams,
    ) -> Result<BandValues, RasterError>;

    /// Issues a tile URL template rendering `raster` with `vis`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] if the round trip fails.
    async fn tile_layer(
        &self,
        raster: &RasterExpr,
        vis: &VisParams,
    ) -> Result<TileLayer, RasterError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_values_distinguish_null_from_value() {
        let values: BandValues =
            serde_json::from_value(serde_json::json!({ "VV": 0.062, "VH": null })).unwrap();
        assert!((values.get("VV").unwrap() - 0.062).abs() < 1e-12);
        assert!(values.get("VH").is_none());
        assert!(values.get("HH").is_none());
    }

    #[test]
    fn composite_spec_serializes_dates_as_iso() {
        let spec = CompositeSpec {
            collection: "COPERNICUS/S1_GRD".to_string(),
            region: geojson::Geometry::new(geojson::Value::Point(vec![-8.4, 51.9])),
            start_date: NaiveDate::from_ymd_opt(2013, 10, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2013, 10, 17).unwrap(),
            polarisation: "VV".to_string(),
            instrument_mode: "IW".to_string(),
            band: "VV".to_string(),
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["start_date"], "2013-10-01");
        assert_eq!(json["end_date"], "2013-10-17");
        assert_eq!(json["instrument_mode"], "IW");
    }
}
