//! Errors reported by the configuration layer.
//!
//! The per-vertex path never returns these. They come from building palettes,
//! loading batch configs and the explicit `validate*` calls that a caller runs
//! before handing data to the stage.

use std::fmt;

use crate::math::Vec3;

/// Errors that can occur while assembling or validating vertex-stage inputs.
#[derive(Debug)]
pub enum StageError {
    /// The bone palette holds more matrices than the stage can bind.
    PaletteTooLarge { len: usize, max: usize },
    /// `bones_per_vertex` is outside `0..=4`.
    BonesPerVertex(u32),
    /// A vertex references a palette slot that does not exist.
    BoneIndexOutOfRange {
        vertex: usize,
        slot: usize,
        index: u32,
        palette_len: usize,
    },
    /// `minimum_size > maximum_size`.
    SizeRange { minimum: f32, maximum: f32 },
    /// Attenuation is active but a coefficient lets the denominator reach zero:
    /// the constant term is not positive or another term is negative.
    DegenerateAttenuation(Vec3),
    /// Joint and inverse-bind arrays differ in length.
    SkeletonMismatch { joints: usize, inverse_binds: usize },
    /// Raw attribute bytes are not a whole number of vertex records.
    VertexBuffer(bytemuck::PodCastError),
    /// Failed to read or write a config file.
    Io(std::io::Error),
    /// Failed to parse or produce config JSON.
    Json(serde_json::Error),
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::PaletteTooLarge { len, max } => {
                write!(f, "bone palette has {len} matrices, at most {max} are supported")
            }
            StageError::BonesPerVertex(n) => {
                write!(f, "bones_per_vertex must be in 0..=4, got {n}")
            }
            StageError::BoneIndexOutOfRange {
                vertex,
                slot,
                index,
                palette_len,
            } => write!(
                f,
                "vertex {vertex} influence {slot} references bone {index}, palette has {palette_len}"
            ),
            StageError::SizeRange { minimum, maximum } => {
                write!(f, "point size range is inverted: minimum {minimum} > maximum {maximum}")
            }
            StageError::DegenerateAttenuation(c) => write!(
                f,
                "size attenuation ({}, {}, {}) can reach a zero denominator",
                c.x, c.y, c.z
            ),
            StageError::SkeletonMismatch {
                joints,
                inverse_binds,
            } => write!(
                f,
                "skeleton has {joints} joint matrices but {inverse_binds} inverse bind matrices"
            ),
            StageError::VertexBuffer(e) => write!(f, "invalid vertex buffer: {e}"),
            StageError::Io(e) => write!(f, "config io failed: {e}"),
            StageError::Json(e) => write!(f, "config json invalid: {e}"),
        }
    }
}

impl std::error::Error for StageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StageError::Io(e) => Some(e),
            StageError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StageError {
    fn from(e: std::io::Error) -> Self {
        StageError::Io(e)
    }
}

impl From<serde_json::Error> for StageError {
    fn from(e: serde_json::Error) -> Self {
        StageError::Json(e)
    }
}

impl From<bytemuck::PodCastError> for StageError {
    fn from(e: bytemuck::PodCastError) -> Self {
        StageError::VertexBuffer(e)
    }
}

pub type StageResult<T> = Result<T, StageError>;
