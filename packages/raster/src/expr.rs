//! Client-side raster expression tree.
//!
//! Mirrors how imagery-service client libraries work: pixel operations
//! build a lazy expression over opaque scene handles, and the expression
//! is only evaluated server-side when it reaches a reduction or tile
//! round trip. Building an expression never touches the network.

use serde::{Deserialize, Serialize};

/// Opaque handle to a server-side composite scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneHandle {
    /// Service-assigned scene identifier.
    pub id: String,
}

/// A lazy raster computation over scene handles.
///
/// Serialized verbatim into reduce and tile requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RasterExpr {
    /// A composite scene previously returned by the service.
    Scene {
        /// The scene's identifier.
        id: String,
    },
    /// Pixel-wise signed difference `left − right`.
    Subtract {
        /// Minuend.
        left: Box<RasterExpr>,
        /// Subtrahend.
        right: Box<RasterExpr>,
    },
    /// Indicator raster: 1 where `input > threshold`, 0 elsewhere.
    GreaterThan {
        /// Operand.
        input: Box<RasterExpr>,
        /// Strict comparison threshold.
        threshold: f64,
    },
    /// Marks zero-valued pixels as no-data, leaving only nonzero pixels
    /// defined.
    SelfMask {
        /// Operand.
        input: Box<RasterExpr>,
    },
    /// Restricts the raster to a region; pixels outside become no-data.
    Clip {
        /// Operand.
        input: Box<RasterExpr>,
        /// Clip boundary (`GeoJSON`, WGS84).
        region: geojson::Geometry,
    },
    /// Rasterizes a region boundary onto an empty image as a stroke.
    Paint {
        /// Boundary to draw.
        region: geojson::Geometry,
        /// Pixel value written along the stroke.
        value: f64,
        /// Stroke width in pixels.
        width: f64,
    },
}

impl From<&SceneHandle> for RasterExpr {
    fn from(handle: &SceneHandle) -> Self {
        Self::Scene {
            id: handle.id.clone(),
        }
    }
}

impl RasterExpr {
    /// `self − other`, pixel-wise.
    #[must_use]
    pub fn subtract(self, other: Self) -> Self {
        Self::Subtract {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    /// Indicator raster for `self > threshold` (strict).
    #[must_use]
    pub fn gt(self, threshold: f64) -> Self {
        Self::GreaterThan {
            input: Box::new(self),
            threshold,
        }
    }

    /// Masks out zero-valued pixels.
    #[must_use]
    pub fn self_mask(self) -> Self {
        Self::SelfMask {
            input: Box::new(self),
        }
    }

    /// Clips to `region`.
    #[must_use]
    pub fn clip(self, region: geojson::Geometry) -> Self {
        Self::Clip {
            input: Box::new(self),
            region,
        }
    }

    /// Outline rendering of `region` with the given stroke `value` and
    /// `width`.
    #[must_use]
    pub const fn paint(region: geojson::Geometry, value: f64, width: f64) -> Self {
        Self::Paint {
            region,
            value,
            width,
        }
    }
}
