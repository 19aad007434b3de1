//! Lumen math - the numeric foundation shared by every Lumen crate.
//!
//! All geometry is double precision. `Vec3` and `Point3` are aliases of
//! `glam::DVec3` so the renderer reads in geometric terms while still getting
//! glam's SIMD-friendly operators.

pub use glam::{dvec3, DVec3};

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// A direction or offset in 3D space.
pub type Vec3 = DVec3;

/// A location in 3D space.
pub type Point3 = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_point_and_vector_share_ops() {
        let p: Point3 = dvec3(1.0, 2.0, 3.0);
        let d: Vec3 = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(p + d, Point3::new(5.0, 7.0, 9.0));
        assert_eq!(d.cross(Vec3::X), Vec3::new(0.0, 6.0, -5.0));
    }
}
