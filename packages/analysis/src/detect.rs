//! Backscatter change detection.
//!
//! A rise in VV backscatter between the pre- and post-event composites
//! marks standing water. The difference is always `post − pre`; the
//! threshold comparison is strict.

use flood_watch_raster::{RasterExpr, SceneHandle};

/// Backscatter increase, in decibels, above which a pixel counts as
/// flooded.
pub const FLOOD_THRESHOLD_DB: f64 = 2.0;

/// Pixel-wise signed change raster, `post − pre`.
#[must_use]
pub fn change_raster(pre: &SceneHandle, post: &SceneHandle) -> RasterExpr {
    RasterExpr::from(post).subtract(RasterExpr::from(pre))
}

/// Plain binary flood mask: 1 where the change exceeds
/// [`FLOOD_THRESHOLD_DB`], 0 elsewhere.
///
/// The unrefined variant: it renders an explicit 0/1 field and is not
/// clipped to the AOI. Prefer [`flood_mask`] for statistics and
/// visualization.
#[must_use]
pub fn binary_flood_mask(pre: &SceneHandle, post: &SceneHandle) -> RasterExpr {
    change_raster(pre, post).gt(FLOOD_THRESHOLD_DB)
}

/// Masked-and-clipped flood mask: non-flooded pixels become no-data and
/// the result is clipped to the AOI boundary, so neither statistics nor
/// visualization leak outside the area of interest.
#[must_use]
pub fn flood_mask(
    pre: &SceneHandle,
    post: &SceneHandle,
    aoi: geojson::Geometry,
) -> RasterExpr {
    binary_flood_mask(pre, post).self_mask().clip(aoi)
}
