//! # Point Size — Sizing Point Sprites With Distance Attenuation
//!
//! When a batch is drawn as points, every vertex also produces a point size in
//! pixels. The base size comes either from the vertex itself or from the batch,
//! and can shrink with distance from the eye:
//!
//! ```text
//! d      = |eye.xyz|
//! factor = sqrt(c0 + c1·d + c2·d²)
//! size   = clamp(base / factor, minimum_size, maximum_size)
//! ```
//!
//! `(c0, c1, c2)` is `size_attenuation`. Two values switch attenuation off
//! entirely: `(1, 0, 0)` (the formula would divide by 1 anyway) and `(0, 0, 0)`
//! (which would otherwise divide by zero). Neither reads the eye position.
//!
//! Batches not drawn as points always get a size of exactly 1.
//!
//! ## Comparison
//!
//! - **OpenGL `GL_POINT_DISTANCE_ATTENUATION`**: The same `sqrt(1/(a + bd + cd²))`
//!   scale, applied by fixed-function hardware.
//! - **three.js `PointsMaterial.sizeAttenuation`**: A boolean; size is scaled by
//!   `scale / -mvPosition.z` instead of a polynomial.

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};
use crate::math::{Vec3, Vec4};
use crate::vertex::VertexInput;

/// The `(1, 0, 0)` "no attenuation" coefficients.
pub const NO_ATTENUATION: Vec3 = Vec3::X;

/// Per-batch point-sprite settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointConfig {
    /// When false the stage is not drawing points and size is always 1.
    pub is_drawing_points: bool,
    /// Take the base size from the vertex instead of [`size`](Self::size).
    pub has_vertex_point_size: bool,
    pub size: f32,
    pub minimum_size: f32,
    pub maximum_size: f32,
    /// Constant, linear and quadratic distance coefficients.
    pub size_attenuation: Vec3,
    /// Consumed by the fragment stage's alpha fade, not by size computation.
    pub size_fade_threshold: f32,
}

impl Default for PointConfig {
    fn default() -> Self {
        Self {
            is_drawing_points: false,
            has_vertex_point_size: false,
            size: 1.0,
            minimum_size: 1.0,
            maximum_size: 64.0,
            size_attenuation: NO_ATTENUATION,
            size_fade_threshold: 1.0,
        }
    }
}

impl PointConfig {
    /// Draw points of a fixed `size` with no attenuation.
    pub fn points(size: f32) -> Self {
        Self {
            is_drawing_points: true,
            size,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, minimum: f32, maximum: f32) -> Self {
        self.minimum_size = minimum;
        self.maximum_size = maximum;
        self
    }

    pub fn with_attenuation(mut self, constant: f32, linear: f32, quadratic: f32) -> Self {
        self.size_attenuation = Vec3::new(constant, linear, quadratic);
        self
    }

    pub fn with_vertex_point_size(mut self) -> Self {
        self.has_vertex_point_size = true;
        self
    }

    /// False for the `(1, 0, 0)` and `(0, 0, 0)` sentinels.
    #[inline]
    pub fn attenuation_enabled(&self) -> bool {
        self.size_attenuation != NO_ATTENUATION && self.size_attenuation != Vec3::ZERO
    }

    /// `sqrt(c0 + c1·d + c2·d²)` for an eye distance `d`.
    #[inline]
    pub fn attenuation_factor(&self, distance: f32) -> f32 {
        let c = self.size_attenuation;
        (c.x + distance * c.y + distance * distance * c.z).sqrt()
    }

    /// Check the size range and that active attenuation stays positive at every
    /// distance: the constant term must be positive and the others non-negative.
    pub fn validate(&self) -> StageResult<()> {
        if self.minimum_size > self.maximum_size {
            return Err(StageError::SizeRange {
                minimum: self.minimum_size,
                maximum: self.maximum_size,
            });
        }
        let c = self.size_attenuation;
        if self.attenuation_enabled() && (c.x <= 0.0 || c.y < 0.0 || c.z < 0.0) {
            return Err(StageError::DegenerateAttenuation(self.size_attenuation));
        }
        Ok(())
    }
}

/// Point size for one vertex.
///
/// `eye_position` is only read when attenuation is enabled.
#[inline]
pub fn compute_point_size(vertex: &VertexInput, config: &PointConfig, eye_position: Vec4) -> f32 {
    if !config.is_drawing_points {
        return 1.0;
    }

    let mut size = if config.has_vertex_point_size {
        vertex.point_size
    } else {
        config.size
    };

    if config.attenuation_enabled() {
        let distance = eye_position.truncate().length();
        let factor = config.attenuation_factor(distance);
        debug_assert!(factor != 0.0, "point size attenuation factor is zero at distance {distance}");
        size /= factor;
    }

    debug_assert!(
        config.minimum_size <= config.maximum_size,
        "minimum point size {} > maximum {}",
        config.minimum_size,
        config.maximum_size
    );
    // Shader clamp: never panics on an inverted range, unlike f32::clamp.
    size.max(config.minimum_size).min(config.maximum_size)
}
