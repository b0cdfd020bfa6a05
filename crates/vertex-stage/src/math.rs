//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`] type builds the model-view and
//! bone matrices that feed the vertex stage.

pub use glam::{Mat4, Quat, Vec3, Vec4};

/// A 3D transform: position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Self::IDENTITY
        }
    }

    /// Create a transform that looks at a target point from the current position.
    ///
    /// `Transform::from_xyz(0, 5, 10).looking_at(Vec3::ZERO, Vec3::Y)` places a
    /// camera at (0,5,10) facing the origin. Its [`view_matrix`](Self::view_matrix)
    /// is the usual eye-space transform.
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        let look = Mat4::look_at_rh(self.translation, target, up);
        let (_, rot, _) = look.inverse().to_scale_rotation_translation();
        self.rotation = rot;
        self
    }

    /// Return a copy rotated by `rotation` (applied after the existing one).
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation * self.rotation;
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// The inverse of [`matrix`](Self::matrix), i.e. world → eye space when
    /// this transform describes a camera.
    pub fn view_matrix(&self) -> Mat4 {
        self.matrix().inverse()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_lands_in_last_column() {
        let m = Transform::from_xyz(2.0, -3.0, 4.0).matrix();
        assert_eq!(m.col(3), Vec4::new(2.0, -3.0, 4.0, 1.0));
    }

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let camera = Transform::from_xyz(0.0, 5.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        let eye = camera.view_matrix() * Vec4::new(0.0, 5.0, 10.0, 1.0);
        assert!(eye.truncate().length() < 1e-4, "camera should sit at the eye origin, got {eye}");
    }

    #[test]
    fn looking_at_faces_negative_z() {
        let camera = Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y);
        let target = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((target.z + 10.0).abs() < 1e-4, "target should be 10 units down -Z, got {target}");
    }

    #[test]
    fn scale_then_translate() {
        let m = Transform::from_xyz(1.0, 0.0, 0.0).with_scale(2.0).matrix();
        let p = m * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vec4::new(3.0, 2.0, 2.0, 1.0));
    }
}
