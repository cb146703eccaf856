//! Region statistics and the flood verdict.

use flood_watch_raster::ReduceParams;

/// Sampling resolution for region reductions, in meters.
pub const STATS_SCALE_METERS: f64 = 30.0;

/// Cap on samples evaluated per reduction. Effectively unbounded for
/// city-scale AOIs; guards the collaborator against runaway requests.
pub const MAX_SAMPLES: u64 = 10_000_000_000;

/// Flooded-area percentage above which the AOI counts as flooded.
pub const FLOOD_VERDICT_PERCENT: f64 = 5.0;

/// Reduction parameters used for every flood statistic.
#[must_use]
pub const fn reduce_params() -> ReduceParams {
    ReduceParams {
        scale_meters: STATS_SCALE_METERS,
        max_samples: MAX_SAMPLES,
    }
}

/// Converts a mask mean in `[0, 1]` to a percentage rounded to two
/// decimal places.
#[must_use]
pub fn flood_percentage(mask_mean: f64) -> f64 {
    (mask_mean * 100.0 * 100.0).round() / 100.0
}

/// Verdict: strictly more than [`FLOOD_VERDICT_PERCENT`] of the AOI
/// flooded. Exactly 5.00 % is not a flood.
#[must_use]
pub fn is_flooded(percentage: f64) -> bool {
    percentage > FLOOD_VERDICT_PERCENT
}
