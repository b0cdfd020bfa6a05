//! # Vertex — Per-Vertex Inputs to the Stage
//!
//! Each vertex of a skinned, pure-color mesh carries a model-space position, up
//! to four bone influences (weight + palette index) and an optional per-vertex
//! point size. [`VertexInput`] is the decoded form the evaluator works with;
//! [`SkinnedVertex`] is the raw attribute record as it sits in a GPU vertex
//! buffer.
//!
//! ## Memory Layout
//!
//! ```text
//! SkinnedVertex (52 bytes)
//! ┌──────────────┬──────────────┬──────────────┬────────────┐
//! │ position     │ bone_weights │ bone_indices │ point_size │
//! │ [f32; 4]     │ [f32; 4]     │ [f32; 4]     │ f32        │
//! │ 16 bytes     │ 16 bytes     │ 16 bytes     │ 4 bytes    │
//! │ offset 0     │ offset 16    │ offset 32    │ offset 48  │
//! │ location(0)  │ location(1)  │ location(2)  │ location(3)│
//! └──────────────┴──────────────┴──────────────┴────────────┘
//! ```
//!
//! Bone indices travel as floats. Older attribute pipelines only had float
//! vertex formats, so the indices are stored as whole numbers in a `vec4` and
//! truncated back to integers by the consumer. [`SkinnedVertex::decode`] does
//! that truncation on the CPU.
//!
//! ## Influence Order
//!
//! Slot 0 is the first influence. Only the first `bones_per_vertex` slots of a
//! batch are read; the rest may hold anything.

use bytemuck::{Pod, Zeroable};

use crate::math::Vec4;

/// Number of weight/index slots per vertex.
pub const MAX_INFLUENCES: usize = 4;

/// A decoded vertex as consumed by the skinning and point-size evaluators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexInput {
    /// Homogeneous model-space position.
    pub position: Vec4,
    pub bone_weights: [f32; MAX_INFLUENCES],
    pub bone_indices: [u32; MAX_INFLUENCES],
    /// Used only when the batch has `has_vertex_point_size` set.
    pub point_size: f32,
}

impl VertexInput {
    /// A rigid vertex at `position` (w = 1) with no bone influences.
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self::new(Vec4::new(x, y, z, 1.0))
    }

    pub fn new(position: Vec4) -> Self {
        Self {
            position,
            bone_weights: [0.0; MAX_INFLUENCES],
            bone_indices: [0; MAX_INFLUENCES],
            point_size: 1.0,
        }
    }

    /// Set the bone influences. Slots are consumed in order.
    pub fn with_bones(
        mut self,
        weights: [f32; MAX_INFLUENCES],
        indices: [u32; MAX_INFLUENCES],
    ) -> Self {
        self.bone_weights = weights;
        self.bone_indices = indices;
        self
    }

    pub fn with_point_size(mut self, size: f32) -> Self {
        self.point_size = size;
        self
    }

    /// The first `count` (weight, index) pairs.
    pub fn influences(&self, count: usize) -> impl Iterator<Item = (f32, u32)> + '_ {
        self.bone_weights
            .iter()
            .copied()
            .zip(self.bone_indices.iter().copied())
            .take(count.min(MAX_INFLUENCES))
    }
}

impl Default for VertexInput {
    fn default() -> Self {
        Self::new(Vec4::W)
    }
}

/// Raw per-vertex attributes, laid out exactly as the GPU vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SkinnedVertex {
    pub position: [f32; 4],
    pub bone_weights: [f32; 4],
    /// Whole-number palette indices stored as floats.
    pub bone_indices: [f32; 4],
    pub point_size: f32,
}

const _: () = assert!(std::mem::size_of::<SkinnedVertex>() == 52);

impl SkinnedVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SkinnedVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position: vec4<f32>
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x4,
            },
            // bone_weights: vec4<f32>
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
            // bone_indices: vec4<f32>
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            // point_size: f32
            wgpu::VertexAttribute {
                offset: 48,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32,
            },
        ],
    };

    /// Convert to the evaluator's form, truncating the float indices toward
    /// zero. Negative and NaN indices become 0.
    pub fn decode(&self) -> VertexInput {
        VertexInput {
            position: Vec4::from_array(self.position),
            bone_weights: self.bone_weights,
            bone_indices: self.bone_indices.map(|i| i as u32),
            point_size: self.point_size,
        }
    }
}

impl From<&VertexInput> for SkinnedVertex {
    fn from(v: &VertexInput) -> Self {
        Self {
            position: v.position.to_array(),
            bone_weights: v.bone_weights,
            bone_indices: v.bone_indices.map(|i| i as f32),
            point_size: v.point_size,
        }
    }
}
