//! # Skinning — Blending Bone Transforms Into an Eye-Space Position
//!
//! A skinned mesh is deformed by a skeleton. Every vertex names up to four
//! bones in the batch's *bone palette* and a weight for each; its eye-space
//! position is the weighted sum of the position transformed by each bone:
//!
//! ```text
//! eye = Σ  palette[index[i]] * position * weight[i]      i in 0..bones_per_vertex
//! ```
//!
//! With `bones_per_vertex == 0` the batch is rigid and the plain model-view
//! matrix is used instead; no skinning data is read at all.
//!
//! ## Palette Matrices Are Eye-Space
//!
//! Palette entries map model space straight to eye space. They already contain
//! the camera's view matrix and each joint's inverse bind matrix:
//!
//! ```text
//! palette[i] = view * joint_world[i] * inverse_bind[i]
//! ```
//!
//! [`BonePalette::from_skeleton`] builds them that way.
//!
//! ## Weights Are Not Renormalized
//!
//! If the active weights don't sum to 1 the result scales accordingly. That is
//! the exporter's job, not the vertex stage's.
//!
//! ## Comparison
//!
//! - **glTF / Bevy**: Same linear blend, four joints per vertex, joint
//!   matrices uploaded as a storage or uniform array.
//! - **MMD (BDEF4)**: Identical sum; BDEF1/BDEF2 are the 1- and 2-bone cases.
//! - **Dual quaternion skinning**: Avoids the "candy wrapper" collapse of
//!   linear blending but needs a different palette format. Not supported.

use serde::{Deserialize, Serialize};

use crate::error::{StageError, StageResult};
use crate::math::{Mat4, Vec4};
use crate::vertex::{MAX_INFLUENCES, VertexInput};

/// Maximum number of matrices in a bone palette.
///
/// Sized for the uniform block of the smallest target: 11 mat4s plus the
/// model-view and projection matrices.
pub const MAX_BONES_PER_VERTEX: usize = 11;

/// The current bone matrices of one skeleton, indexed by per-vertex bone indices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Mat4>", into = "Vec<Mat4>")]
pub struct BonePalette {
    matrices: Vec<Mat4>,
}

impl BonePalette {
    /// Wrap a list of eye-space bone matrices.
    pub fn new(matrices: Vec<Mat4>) -> StageResult<Self> {
        if matrices.len() > MAX_BONES_PER_VERTEX {
            return Err(StageError::PaletteTooLarge {
                len: matrices.len(),
                max: MAX_BONES_PER_VERTEX,
            });
        }
        Ok(Self { matrices })
    }

    /// `count` identity matrices (clamped to the palette limit).
    pub fn identity(count: usize) -> Self {
        Self {
            matrices: vec![Mat4::IDENTITY; count.min(MAX_BONES_PER_VERTEX)],
        }
    }

    /// Build eye-space bone matrices from a posed skeleton.
    ///
    /// `palette[i] = view * joint_world[i] * inverse_bind[i]`
    pub fn from_skeleton(
        view: Mat4,
        joint_world: &[Mat4],
        inverse_bind: &[Mat4],
    ) -> StageResult<Self> {
        if joint_world.len() != inverse_bind.len() {
            return Err(StageError::SkeletonMismatch {
                joints: joint_world.len(),
                inverse_binds: inverse_bind.len(),
            });
        }
        let matrices = joint_world
            .iter()
            .zip(inverse_bind)
            .map(|(joint, inv_bind)| view * *joint * *inv_bind)
            .collect();
        Self::new(matrices)
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Palette entry for a bone index. Out-of-range indices yield the zero
    /// matrix, so they drop out of the blend instead of panicking.
    #[inline]
    pub fn get(&self, index: u32) -> Mat4 {
        self.matrices
            .get(index as usize)
            .copied()
            .unwrap_or(Mat4::ZERO)
    }
}

impl TryFrom<Vec<Mat4>> for BonePalette {
    type Error = StageError;

    fn try_from(matrices: Vec<Mat4>) -> StageResult<Self> {
        Self::new(matrices)
    }
}

impl From<BonePalette> for Vec<Mat4> {
    fn from(palette: BonePalette) -> Self {
        palette.matrices
    }
}

/// Per-batch skinning inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinningConfig {
    /// Active influences per vertex, `0..=4`. Zero selects the rigid path.
    pub bones_per_vertex: u32,
    pub bone_matrices: BonePalette,
    /// Used only when `bones_per_vertex == 0`.
    pub model_view_matrix: Mat4,
    pub projection_matrix: Mat4,
}

impl Default for SkinningConfig {
    fn default() -> Self {
        Self {
            bones_per_vertex: 0,
            bone_matrices: BonePalette::default(),
            model_view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
        }
    }
}

impl SkinningConfig {
    /// A rigid (unskinned) batch.
    pub fn rigid(model_view: Mat4, projection: Mat4) -> Self {
        Self {
            model_view_matrix: model_view,
            projection_matrix: projection,
            ..Self::default()
        }
    }

    /// A skinned batch reading `bones_per_vertex` influences from `palette`.
    pub fn skinned(bones_per_vertex: u32, palette: BonePalette, projection: Mat4) -> Self {
        Self {
            bones_per_vertex,
            bone_matrices: palette,
            projection_matrix: projection,
            ..Self::default()
        }
    }

    pub fn is_skinned(&self) -> bool {
        self.bones_per_vertex > 0
    }

    /// Number of influence slots actually read per vertex.
    #[inline]
    pub fn active_influences(&self) -> usize {
        (self.bones_per_vertex as usize).min(MAX_INFLUENCES)
    }

    /// Check the batch-level invariants. Does not look at vertices.
    pub fn validate(&self) -> StageResult<()> {
        if self.bones_per_vertex as usize > MAX_INFLUENCES {
            return Err(StageError::BonesPerVertex(self.bones_per_vertex));
        }
        if self.bone_matrices.len() > MAX_BONES_PER_VERTEX {
            return Err(StageError::PaletteTooLarge {
                len: self.bone_matrices.len(),
                max: MAX_BONES_PER_VERTEX,
            });
        }
        Ok(())
    }

    /// Check that every active bone index of `vertex` is inside the palette.
    pub fn validate_vertex(&self, vertex_index: usize, vertex: &VertexInput) -> StageResult<()> {
        let palette_len = self.bone_matrices.len();
        for (slot, (_, index)) in vertex.influences(self.active_influences()).enumerate() {
            if index as usize >= palette_len {
                return Err(StageError::BoneIndexOutOfRange {
                    vertex: vertex_index,
                    slot,
                    index,
                    palette_len,
                });
            }
        }
        Ok(())
    }
}

/// Resolve a vertex's eye-space position.
///
/// Rigid batches use `model_view * position`. Skinned batches blend the first
/// `bones_per_vertex` influences; later slots are never read.
#[inline]
pub fn compute_eye_space_position(vertex: &VertexInput, config: &SkinningConfig) -> Vec4 {
    debug_assert!(
        config.bones_per_vertex as usize <= MAX_INFLUENCES,
        "bones_per_vertex {} exceeds {MAX_INFLUENCES}",
        config.bones_per_vertex
    );

    if config.bones_per_vertex == 0 {
        return config.model_view_matrix * vertex.position;
    }

    let palette = &config.bone_matrices;
    let mut eye = Vec4::ZERO;
    for (weight, index) in vertex.influences(config.active_influences()) {
        debug_assert!(
            (index as usize) < palette.len(),
            "bone index {index} outside palette of {}",
            palette.len()
        );
        eye += palette.get(index) * vertex.position * weight;
    }
    eye
}
