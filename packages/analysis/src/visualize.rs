//! Visualization specs for the two overlay layers.
//!
//! No rendering happens locally; these only parameterize the tile-URL
//! round trips.

use flood_watch_raster::{RasterExpr, VisParams};

/// Stroke width, in pixels, of the AOI outline.
pub const AOI_OUTLINE_WIDTH: f64 = 3.0;

/// Visualization for the flood mask: white at 0, red at 1.
#[must_use]
pub fn flood_vis() -> VisParams {
    VisParams {
        min: 0.0,
        max: 1.0,
        palette: vec!["white".to_string(), "red".to_string()],
    }
}

/// Visualization for the AOI outline: a blue stroke.
#[must_use]
pub fn aoi_vis() -> VisParams {
    VisParams {
        min: 0.0,
        max: 1.0,
        palette: vec!["blue".to_string()],
    }
}

/// Outline raster for the AOI boundary.
#[must_use]
pub fn aoi_outline(region: geojson::Geometry) -> RasterExpr {
    RasterExpr::paint(region, 1.0, AOI_OUTLINE_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flood_palette_is_white_to_red() {
        let vis = flood_vis();
        assert_eq!(vis.palette, ["white", "red"]);
        assert!((vis.min - 0.0).abs() < f64::EPSILON);
        assert!((vis.max - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn outline_is_a_width_three_paint() {
        let region = geojson::Geometry::new(geojson::Value::Point(vec![-8.4, 51.9]));
        let RasterExpr::Paint { value, width, .. } = aoi_outline(region) else {
            panic!("expected a paint op");
        };
        assert!((value - 1.0).abs() < f64::EPSILON);
        assert!((width - 3.0).abs() < f64::EPSILON);
    }
}
