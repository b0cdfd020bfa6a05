//! # Stage — The Per-Vertex Entry Point
//!
//! [`VertexStage`] bundles one batch's skinning and point configuration and
//! runs the whole vertex program:
//!
//! ```text
//! VertexInput ──► compute_eye_space_position ──► eye ──► projection * eye ──► clip
//!                                                 │
//!                                                 └──► compute_point_size ──► size
//! ```
//!
//! The eye position is computed once and handed to both consumers.
//!
//! ## Batches
//!
//! Vertices are independent: no evaluation reads another's result, and the
//! configs are read-only for the whole batch. [`VertexStage::evaluate_batch`]
//! is therefore a plain parallel map (rayon, with the default `parallel`
//! feature). Output order always matches input order.
//!
//! Changing the palette between animation frames goes through
//! [`VertexStage::swap_palette`], which needs `&mut self`. The borrow checker
//! guarantees no batch is still reading the old palette.

use bytemuck::PodCastError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::StageResult;
use crate::math::Vec4;
use crate::point::{PointConfig, compute_point_size};
use crate::skinning::{BonePalette, SkinningConfig, compute_eye_space_position};
use crate::uniforms::{PointUniform, SkinningUniform};
use crate::vertex::{SkinnedVertex, VertexInput};

/// Result of running the vertex stage on one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    /// `projection * eye_position`.
    pub clip_position: Vec4,
    pub eye_position: Vec4,
    /// Meaningful only when the batch draws points; 1 otherwise.
    pub point_size: f32,
}

/// One draw batch's vertex program.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexStage {
    pub skinning: SkinningConfig,
    pub point: PointConfig,
}

impl VertexStage {
    pub fn new(skinning: SkinningConfig, point: PointConfig) -> Self {
        Self { skinning, point }
    }

    /// Run skinning, projection and point sizing for one vertex.
    #[inline]
    pub fn evaluate_vertex(&self, vertex: &VertexInput) -> VertexOutput {
        let eye_position = compute_eye_space_position(vertex, &self.skinning);
        VertexOutput {
            clip_position: self.skinning.projection_matrix * eye_position,
            eye_position,
            point_size: compute_point_size(vertex, &self.point, eye_position),
        }
    }

    /// Evaluate every vertex, in parallel when the `parallel` feature is on.
    pub fn evaluate_batch(&self, vertices: &[VertexInput]) -> Vec<VertexOutput> {
        #[cfg(feature = "parallel")]
        {
            log::debug!(
                "evaluating {} vertices in parallel ({} bones/vertex)",
                vertices.len(),
                self.skinning.bones_per_vertex
            );
            vertices.par_iter().map(|v| self.evaluate_vertex(v)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            self.evaluate_batch_sequential(vertices)
        }
    }

    /// Evaluate every vertex on the calling thread.
    pub fn evaluate_batch_sequential(&self, vertices: &[VertexInput]) -> Vec<VertexOutput> {
        log::debug!(
            "evaluating {} vertices sequentially ({} bones/vertex)",
            vertices.len(),
            self.skinning.bones_per_vertex
        );
        vertices.iter().map(|v| self.evaluate_vertex(v)).collect()
    }

    /// Evaluate a raw vertex buffer of [`SkinnedVertex`] records.
    ///
    /// `bytes` may start at any address; records are read unaligned.
    pub fn evaluate_bytes(&self, bytes: &[u8]) -> StageResult<Vec<VertexOutput>> {
        let stride = std::mem::size_of::<SkinnedVertex>();
        if bytes.len() % stride != 0 {
            return Err(PodCastError::OutputSliceWouldHaveSlop.into());
        }
        let vertices: Vec<VertexInput> = bytes
            .chunks_exact(stride)
            .map(|record| bytemuck::pod_read_unaligned::<SkinnedVertex>(record).decode())
            .collect();
        Ok(self.evaluate_batch(&vertices))
    }

    /// Replace the bone palette, returning the previous one.
    pub fn swap_palette(&mut self, palette: BonePalette) -> BonePalette {
        log::trace!(
            "swapping bone palette ({} -> {} bones)",
            self.skinning.bone_matrices.len(),
            palette.len()
        );
        std::mem::replace(&mut self.skinning.bone_matrices, palette)
    }

    /// Check both configs.
    pub fn validate(&self) -> StageResult<()> {
        Self::validate_configs(&self.skinning, &self.point)
    }

    /// Batch-level checks shared with [`BatchConfig`](crate::config::BatchConfig).
    pub fn validate_configs(skinning: &SkinningConfig, point: &PointConfig) -> StageResult<()> {
        skinning.validate()?;
        point.validate()
    }

    /// Check that every vertex only references bones that exist. Stops at the
    /// first offender.
    pub fn validate_vertices(&self, vertices: &[VertexInput]) -> StageResult<()> {
        if !self.skinning.is_skinned() {
            return Ok(());
        }
        for (i, v) in vertices.iter().enumerate() {
            if let Err(e) = self.skinning.validate_vertex(i, v) {
                log::warn!("vertex validation failed: {e}");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Uniform blocks for uploading this batch to the GPU.
    pub fn uniforms(&self) -> (SkinningUniform, PointUniform) {
        ((&self.skinning).into(), (&self.point).into())
    }
}
