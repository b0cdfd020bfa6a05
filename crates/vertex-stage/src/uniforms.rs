//! # Uniforms — Per-Batch Inputs Packed for the GPU
//!
//! The vertex stage's batch inputs are uploaded as two uniform blocks, one for
//! skinning and one for point sprites. These structs mirror the WGSL layout
//! byte for byte so they can be cast with `bytemuck` and written straight into
//! a buffer.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ SkinningUniform (848 bytes)                              │
//! │   model_view: mat4x4         64                          │
//! │   projection: mat4x4         64                          │
//! │   bones: array<mat4x4, 11>  704                          │
//! │   bones_per_vertex: u32 + 12 bytes padding  16           │
//! ├──────────────────────────────────────────────────────────┤
//! │ PointUniform (48 bytes)                                  │
//! │   size, minimum, maximum, fade_threshold    16           │
//! │   attenuation: vec3 + is_drawing_points     16           │
//! │   has_vertex_point_size + 12 bytes padding  16           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Booleans are `u32` (0 or 1): WGSL has no host-shareable `bool`.
//!
//! The bone array is fixed at [`MAX_BONES_PER_VERTEX`] entries. Unused entries
//! are zero; a batch only reads as many as its vertices reference.

use bytemuck::{Pod, Zeroable};

use crate::point::PointConfig;
use crate::skinning::{MAX_BONES_PER_VERTEX, SkinningConfig};

/// Skinning uniform block: transforms, bone palette and bone count.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct SkinningUniform {
    pub model_view: [[f32; 4]; 4],                         // 64 bytes
    pub projection: [[f32; 4]; 4],                         // 64 bytes
    pub bones: [[[f32; 4]; 4]; MAX_BONES_PER_VERTEX],      // 704 bytes
    pub bones_per_vertex: u32,                             // 4 bytes
    pub _pad: [u32; 3],                                    // 12 bytes → 848
}

const _: () = assert!(std::mem::size_of::<SkinningUniform>() == 848);

impl From<&SkinningConfig> for SkinningUniform {
    fn from(config: &SkinningConfig) -> Self {
        let mut bones = [[[0.0; 4]; 4]; MAX_BONES_PER_VERTEX];
        for (slot, matrix) in bones.iter_mut().zip(config.bone_matrices.as_slice()) {
            *slot = matrix.to_cols_array_2d();
        }
        Self {
            model_view: config.model_view_matrix.to_cols_array_2d(),
            projection: config.projection_matrix.to_cols_array_2d(),
            bones,
            bones_per_vertex: config.bones_per_vertex,
            _pad: [0; 3],
        }
    }
}

/// Point-sprite uniform block.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct PointUniform {
    pub size: f32,                  // 4 bytes
    pub minimum_size: f32,          // 4 bytes
    pub maximum_size: f32,          // 4 bytes
    pub size_fade_threshold: f32,   // 4 bytes → 16
    pub size_attenuation: [f32; 3], // 12 bytes
    pub is_drawing_points: u32,     // 4 bytes → 32
    pub has_vertex_point_size: u32, // 4 bytes
    pub _pad: [u32; 3],             // 12 bytes → 48
}

const _: () = assert!(std::mem::size_of::<PointUniform>() == 48);

impl From<&PointConfig> for PointUniform {
    fn from(config: &PointConfig) -> Self {
        Self {
            size: config.size,
            minimum_size: config.minimum_size,
            maximum_size: config.maximum_size,
            size_fade_threshold: config.size_fade_threshold,
            size_attenuation: config.size_attenuation.to_array(),
            is_drawing_points: config.is_drawing_points as u32,
            has_vertex_point_size: config.has_vertex_point_size as u32,
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat4, Vec3};
    use crate::skinning::BonePalette;

    #[test]
    fn skinning_uniform_packs_palette_and_zero_fills() {
        let palette = BonePalette::new(vec![
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)),
        ])
        .unwrap();
        let config = SkinningConfig::skinned(2, palette, Mat4::from_scale(Vec3::splat(0.5)));
        let u = SkinningUniform::from(&config);

        assert_eq!(u.bones_per_vertex, 2);
        assert_eq!(u.bones[0], Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(u.bones[1][3], [2.0, 0.0, 0.0, 1.0], "translation is the last column");
        assert!(u.bones[2..].iter().all(|m| *m == [[0.0; 4]; 4]));
        assert_eq!(u.projection[0][0], 0.5);
    }

    #[test]
    fn point_uniform_encodes_flags_as_u32() {
        let config = PointConfig::points(3.0)
            .with_range(1.0, 9.0)
            .with_attenuation(1.0, 0.0, 0.25)
            .with_vertex_point_size();
        let u = PointUniform::from(&config);
        assert_eq!(u.is_drawing_points, 1);
        assert_eq!(u.has_vertex_point_size, 1);
        assert_eq!(u.size_attenuation, [1.0, 0.0, 0.25]);
        assert_eq!(u.size_fade_threshold, config.size_fade_threshold);
    }

    #[test]
    fn uniforms_cast_to_bytes() {
        let s = SkinningUniform::from(&SkinningConfig::default());
        let p = PointUniform::from(&PointConfig::default());
        assert_eq!(bytemuck::bytes_of(&s).len(), 848);
        assert_eq!(bytemuck::bytes_of(&p).len(), 48);
    }
}
