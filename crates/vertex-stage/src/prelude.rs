//! Convenience re-exports: `use vertex_stage::prelude::*`.

pub use crate::config::BatchConfig;
pub use crate::error::{StageError, StageResult};
pub use crate::math::{Mat4, Quat, Transform, Vec3, Vec4};
pub use crate::point::{NO_ATTENUATION, PointConfig, compute_point_size};
pub use crate::skinning::{
    BonePalette, MAX_BONES_PER_VERTEX, SkinningConfig, compute_eye_space_position,
};
pub use crate::stage::{VertexOutput, VertexStage};
pub use crate::vertex::{MAX_INFLUENCES, SkinnedVertex, VertexInput};
