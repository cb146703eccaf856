//! HTTP handler functions for the flood watch API.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use flood_watch_analysis::{AnalysisError, analysis_year, run_flood_analysis};
use flood_watch_analysis_models::FloodAssessment;
use flood_watch_server_models::{
    AnalyzeFloodRequest, AnalyzeFloodResponse, ApiHealth, ErrorResponse,
};

use crate::AppState;

/// City the read-only history view reports on.
const HISTORY_CITY: &str = "Cork";

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /analyze_flood`
///
/// Runs the flood analysis pipeline for a named city or a coordinate and
/// returns the verdict plus overlay tile URLs.
pub async fn analyze_flood(
    state: web::Data<AppState>,
    body: web::Json<AnalyzeFloodRequest>,
) -> HttpResponse {
    let year = analysis_year(Utc::now());
    let result = run_flood_analysis(
        state.imagery.as_ref(),
        &state.boundary_table,
        body.city.as_deref(),
        body.latitude,
        body.longitude,
        year,
    )
    .await;

    match result {
        Ok(assessment) => HttpResponse::Ok().json(AnalyzeFloodResponse::from(assessment)),
        Err(err) => error_response(&err),
    }
}

/// `GET /history`
///
/// Runs the identical pipeline for the default city and renders a small
/// HTML report instead of JSON.
pub async fn history(state: web::Data<AppState>) -> HttpResponse {
    let year = analysis_year(Utc::now());
    let result = run_flood_analysis(
        state.imagery.as_ref(),
        &state.boundary_table,
        Some(HISTORY_CITY),
        None,
        None,
        year,
    )
    .await;

    match result {
        Ok(assessment) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(render_history_page(&assessment)),
        Err(err) => {
            log::error!("History analysis for {HISTORY_CITY} failed: {err}");
            HttpResponse::InternalServerError()
                .content_type("text/html; charset=utf-8")
                .body(render_history_error())
        }
    }
}

/// Maps an analysis failure to its HTTP status and JSON body.
///
/// Input errors are client-fixable and get a 400; everything else is a
/// 500. Collaborator error text is logged but never echoed to clients.
fn error_response(err: &AnalysisError) -> HttpResponse {
    match err {
        AnalysisError::Input(input) => {
            log::warn!("Rejected analysis request: {input}");
            HttpResponse::BadRequest().json(ErrorResponse::new(input.to_string()))
        }
        AnalysisError::MissingStatistic => {
            log::warn!("{err}");
            HttpResponse::InternalServerError().json(ErrorResponse::new(err.to_string()))
        }
        AnalysisError::Raster(raster) => {
            log::error!("Flood analysis failed: {raster}");
            HttpResponse::InternalServerError().json(ErrorResponse::new("Flood analysis failed"))
        }
    }
}

/// Renders the history report page.
fn render_history_page(assessment: &FloodAssessment) -> String {
    let verdict = if assessment.flooded { "YES" } else { "NO" };
    let note = if assessment.historical_note.is_empty() {
        String::new()
    } else {
        format!("<p class=\"note\">{}</p>", assessment.historical_note)
    };
    format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Flood history: {label}</title></head>\n<body>\n\
         <h1>Flood history for {label}</h1>\n\
         <p>Analysis year: {year}</p>\n\
         <p>Flooded area: {percentage:.2}%</p>\n\
         <p>Flooding detected: {verdict}</p>\n\
         {note}\n\
         </body>\n</html>\n",
        label = assessment.origin.label(),
        year = assessment.year,
        percentage = assessment.flood_percentage,
    )
}

/// Error page shown when the history analysis fails.
fn render_history_error() -> String {
    "<!DOCTYPE html>\n<html>\n<head><title>Flood history</title></head>\n<body>\n\
     <h1>Flood history unavailable</h1>\n\
     <p>The analysis could not be completed. Please try again later.</p>\n\
     </body>\n</html>\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use flood_watch_analysis_models::MapTiles;
    use flood_watch_geography::AoiError;
    use flood_watch_geography_models::AoiOrigin;

    #[test]
    fn input_errors_are_bad_requests() {
        let err = AnalysisError::Input(AoiError::UnsupportedCity {
            name: "Atlantis".to_string(),
        });
        assert_eq!(error_response(&err).status(), StatusCode::BAD_REQUEST);

        let err = AnalysisError::Input(AoiError::MissingInput);
        assert_eq!(error_response(&err).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_statistic_is_a_server_error() {
        let response = error_response(&AnalysisError::MissingStatistic);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn history_page_shows_the_verdict() {
        let assessment = FloodAssessment {
            origin: AoiOrigin::City("Cork".to_string()),
            year: 2013,
            flood_percentage: 6.2,
            flooded: true,
            map_tiles: MapTiles {
                flood: "https://tiles.example/flood/{z}/{x}/{y}".to_string(),
                aoi: "https://tiles.example/aoi/{z}/{x}/{y}".to_string(),
            },
            aoi: geojson::Geometry::new(geojson::Value::Point(vec![-8.4, 51.9])),
            historical_note: "Major floods occurred in 2013".to_string(),
        };
        let page = render_history_page(&assessment);
        assert!(page.contains("Flood history for Cork"));
        assert!(page.contains("6.20%"));
        assert!(page.contains("Flooding detected: YES"));
        assert!(page.contains("Major floods occurred in 2013"));
    }

    #[test]
    fn history_page_omits_empty_note() {
        let assessment = FloodAssessment {
            origin: AoiOrigin::City("Cork".to_string()),
            year: 2015,
            flood_percentage: 0.4,
            flooded: false,
            map_tiles: MapTiles {
                flood: String::new(),
                aoi: String::new(),
            },
            aoi: geojson::Geometry::new(geojson::Value::Point(vec![-8.4, 51.9])),
            historical_note: String::new(),
        };
        let page = render_history_page(&assessment);
        assert!(page.contains("Flooding detected: NO"));
        assert!(!page.contains("class=\"note\""));
    }
}
