#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood detection analysis pipeline.
//!
//! One request drives one synchronous pipeline run: resolve the AOI,
//! derive the before/after October windows, request the two Sentinel-1
//! VV composites, build the thresholded change mask, reduce it to an
//! area percentage, and issue the overlay tile layers. Errors propagate
//! to the request boundary; there are no retries and no partial results
//! at this layer.

pub mod detect;
pub mod stats;
pub mod visualize;
pub mod window;

use chrono::NaiveDate;
use flood_watch_analysis_models::{FloodAssessment, MapTiles};
use flood_watch_geography::{AoiError, CityBoundaryTable, resolve_aoi};
use flood_watch_raster::{CompositeSpec, ImageryService, RasterError};
use thiserror::Error;

pub use window::{TemporalWindow, analysis_year};

/// Image collection holding the radar acquisitions.
pub const SENTINEL1_COLLECTION: &str = "COPERNICUS/S1_GRD";

/// Polarisation channel analyzed, and the band key expected back from
/// region reductions.
pub const ANALYSIS_BAND: &str = "VV";

/// Required acquisition mode (interferometric wide swath).
pub const INSTRUMENT_MODE: &str = "IW";

/// The one year for which the historical annotation fires.
pub const HISTORIC_FLOOD_YEAR: i32 = 2013;

/// Errors that can occur during a flood analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Client-fixable input problem (unknown city, missing inputs).
    #[error("{0}")]
    Input(#[from] AoiError),

    /// A collaborator round trip failed.
    #[error("Imagery service error: {0}")]
    Raster(#[from] RasterError),

    /// The reduction produced no value for the analysis band: no
    /// imagery matched the spatiotemporal filter.
    #[error("No imagery available for the requested period and area")]
    MissingStatistic,
}

/// Composite request for the Sentinel-1 VV band over one window.
///
/// Acquisition dates are filtered to `[start, end)`.
#[must_use]
pub fn sentinel1_composite(
    region: geojson::Geometry,
    start: NaiveDate,
    end: NaiveDate,
) -> CompositeSpec {
    CompositeSpec {
        collection: SENTINEL1_COLLECTION.to_string(),
        region,
        start_date: start,
        end_date: end,
        polarisation: ANALYSIS_BAND.to_string(),
        instrument_mode: INSTRUMENT_MODE.to_string(),
        band: ANALYSIS_BAND.to_string(),
    }
}

/// Annotation attached to the result when the computed analysis year is
/// the known flood year; empty otherwise.
///
/// The comparison is against the *computed* year, so the note only ever
/// fires when the request arrives exactly ten years after
/// [`HISTORIC_FLOOD_YEAR`]. Long-standing behavior, kept as is.
#[must_use]
pub fn historical_note(year: i32) -> String {
    if year == HISTORIC_FLOOD_YEAR {
        format!("Major floods occurred in {HISTORIC_FLOOD_YEAR}")
    } else {
        String::new()
    }
}

/// Runs the full flood analysis for one request.
///
/// `city` takes precedence over the coordinate pair when both are
/// supplied. `year` is the already-computed analysis year (see
/// [`analysis_year`]); callers pass it in so tests can pin it.
///
/// # Errors
///
/// Returns [`AnalysisError::Input`] before any collaborator call for bad
/// inputs, [`AnalysisError::MissingStatistic`] when no imagery matched
/// the windows, or [`AnalysisError::Raster`] for collaborator failures.
pub async fn run_flood_analysis(
    service: &dyn ImageryService,
    table: &CityBoundaryTable,
    city: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    year: i32,
) -> Result<FloodAssessment, AnalysisError> {
    let aoi = resolve_aoi(table, city, latitude, longitude)?;
    let window = TemporalWindow::for_year(year);
    let region = aoi.to_geojson();

    log::info!(
        "Analyzing {}: windows {}..{} / {}..{}",
        aoi.origin.label(),
        window.pre_start,
        window.pre_end,
        window.post_start,
        window.post_end
    );

    let pre = service
        .composite(&sentinel1_composite(
            region.clone(),
            window.pre_start,
            window.pre_end,
        ))
        .await?;
    let post = service
        .composite(&sentinel1_composite(
            region.clone(),
            window.post_start,
            window.post_end,
        ))
        .await?;

    let mask = detect::flood_mask(&pre, &post, region.clone());

    let bands = service
        .reduce_mean(&mask, &region, &stats::reduce_params())
        .await?;
    let mask_mean = bands.get(ANALYSIS_BAND).ok_or_else(|| {
        log::warn!(
            "Reduction returned no {ANALYSIS_BAND} value for {}",
            aoi.origin.label()
        );
        AnalysisError::MissingStatistic
    })?;

    let flood_percentage = stats::flood_percentage(mask_mean);
    let flooded = stats::is_flooded(flood_percentage);
    log::info!(
        "{}: {flood_percentage:.2}% flooded (verdict: {flooded})",
        aoi.origin.label()
    );

    let flood_tiles = service.tile_layer(&mask, &visualize::flood_vis()).await?;
    let aoi_tiles = service
        .tile_layer(&visualize::aoi_outline(region.clone()), &visualize::aoi_vis())
        .await?;

    Ok(FloodAssessment {
        origin: aoi.origin,
        year,
        flood_percentage,
        flooded,
        map_tiles: MapTiles {
            flood: flood_tiles.url_format,
            aoi: aoi_tiles.url_format,
        },
        aoi: region,
        historical_note: historical_note(year),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use flood_watch_geography_models::AoiOrigin;
    use flood_watch_raster::{
        BandValues, RasterExpr, ReduceParams, SceneHandle, TileLayer, VisParams,
    };

    /// Canned collaborator: hands out numbered scenes, a fixed mask
    /// mean, and predictable tile URLs, recording every composite spec.
    #[derive(Default)]
    struct FakeImagery {
        mask_mean: Option<f64>,
        composites: Mutex<Vec<CompositeSpec>>,
        tile_layers: Mutex<Vec<VisParams>>,
    }

    #[async_trait]
    impl ImageryService for FakeImagery {
        async fn composite(&self, spec: &CompositeSpec) -> Result<SceneHandle, RasterError> {
            let mut specs = self.composites.lock().unwrap();
            specs.push(spec.clone());
            Ok(SceneHandle {
                id: format!("scene-{}", specs.len()),
            })
        }

        async fn reduce_mean(
            &self,
            _raster: &RasterExpr,
            _region: &geojson::Geometry,
            _params: &ReduceParams,
        ) -> Result<BandValues, RasterError> {
            let mut bands = BTreeMap::new();
            if let Some(mean) = self.mask_mean {
                bands.insert(ANALYSIS_BAND.to_string(), Some(mean));
            }
            Ok(BandValues(bands))
        }

        async fn tile_layer(
            &self,
            _raster: &RasterExpr,
            vis: &VisParams,
        ) -> Result<TileLayer, RasterError> {
            let mut layers = self.tile_layers.lock().unwrap();
            layers.push(vis.clone());
            Ok(TileLayer {
                url_format: format!("https://tiles.example/layer-{}/{{z}}/{{x}}/{{y}}", layers.len()),
            })
        }
    }

    fn table() -> CityBoundaryTable {
        CityBoundaryTable::builtin()
    }

    #[tokio::test]
    async fn cork_2013_end_to_end() {
        let service = FakeImagery {
            mask_mean: Some(0.062),
            ..Default::default()
        };
        let result = run_flood_analysis(&service, &table(), Some("Cork"), None, None, 2013)
            .await
            .unwrap();

        assert_eq!(result.origin, AoiOrigin::City("Cork".to_string()));
        assert_eq!(result.year, 2013);
        assert!((result.flood_percentage - 6.2).abs() < 1e-9);
        assert!(result.flooded);
        assert_eq!(result.historical_note, "Major floods occurred in 2013");
        assert!(result.map_tiles.flood.contains("{z}/{x}/{y}"));
        assert!(result.map_tiles.aoi.contains("{z}/{x}/{y}"));
        assert!(matches!(result.aoi.value, geojson::Value::Polygon(_)));

        let specs = service.composites.lock().unwrap();
        assert_eq!(specs.len(), 2);
        let ymd = |d| NaiveDate::from_ymd_opt(2013, 10, d).unwrap();
        assert_eq!(specs[0].start_date, ymd(1));
        assert_eq!(specs[0].end_date, ymd(17));
        assert_eq!(specs[1].start_date, ymd(18));
        assert_eq!(specs[1].end_date, ymd(25));
        for spec in specs.iter() {
            assert_eq!(spec.collection, SENTINEL1_COLLECTION);
            assert_eq!(spec.polarisation, "VV");
            assert_eq!(spec.instrument_mode, "IW");
            assert_eq!(spec.band, "VV");
        }
    }

    #[tokio::test]
    async fn unknown_city_fails_before_any_collaborator_call() {
        let service = FakeImagery::default();
        let err = run_flood_analysis(&service, &table(), Some("Atlantis"), None, None, 2013)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Input(AoiError::UnsupportedCity { .. })
        ));
        assert!(service.composites.lock().unwrap().is_empty());
        assert!(service.tile_layers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_inputs_fail_before_any_collaborator_call() {
        let service = FakeImagery::default();
        let err = run_flood_analysis(&service, &table(), None, None, None, 2013)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Input(AoiError::MissingInput)));
        assert!(service.composites.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_reduction_surfaces_as_missing_statistic() {
        let service = FakeImagery {
            mask_mean: None,
            ..Default::default()
        };
        let err = run_flood_analysis(&service, &table(), None, Some(51.9), Some(-8.4), 2015)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingStatistic));
        assert_eq!(
            err.to_string(),
            "No imagery available for the requested period and area"
        );
        // Both composites were requested before the gap surfaced.
        assert_eq!(service.composites.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn verdict_boundary_five_percent_is_not_a_flood() {
        let service = FakeImagery {
            mask_mean: Some(0.05),
            ..Default::default()
        };
        let result = run_flood_analysis(&service, &table(), Some("Cork"), None, None, 2015)
            .await
            .unwrap();
        assert!((result.flood_percentage - 5.0).abs() < 1e-9);
        assert!(!result.flooded);
    }

    #[tokio::test]
    async fn note_is_empty_for_every_other_year() {
        for year in [2012, 2014, 2023] {
            let service = FakeImagery {
                mask_mean: Some(0.01),
                ..Default::default()
            };
            let result = run_flood_analysis(&service, &table(), Some("Cork"), None, None, year)
                .await
                .unwrap();
            assert_eq!(result.historical_note, "");
        }
    }

    #[test]
    fn note_fires_only_for_the_historic_year() {
        assert_eq!(historical_note(2013), "Major floods occurred in 2013");
        assert_eq!(historical_note(2012), "");
        assert_eq!(historical_note(2014), "");
    }
}
