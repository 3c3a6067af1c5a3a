//! Math utilities and types
//!
//! Provides the math types used by text layout and vertex generation.

pub use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Extension trait for Mat4 with additional convenience methods
pub trait Mat4Ext {
    /// Create a pure translation matrix
    fn translation(x: f32, y: f32, z: f32) -> Mat4;

    /// Transform a point on the z = 0 plane, keeping the homogeneous result
    fn transform_plane_point(&self, x: f32, y: f32) -> Vec4;
}

impl Mat4Ext for Mat4 {
    fn translation(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::new_translation(&Vec3::new(x, y, z))
    }

    fn transform_plane_point(&self, x: f32, y: f32) -> Vec4 {
        self * Vec4::new(x, y, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_keeps_plane_point() {
        let p = Mat4::identity().transform_plane_point(3.0, -2.0);
        assert_relative_eq!(p, Vec4::new(3.0, -2.0, 0.0, 1.0));
    }

    #[test]
    fn test_translation_moves_plane_point() {
        let m = Mat4::translation(10.0, 20.0, 5.0);
        let p = m.transform_plane_point(1.0, 1.0);
        assert_relative_eq!(p, Vec4::new(11.0, 21.0, 5.0, 1.0));
    }
}
