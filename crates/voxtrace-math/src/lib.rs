#![warn(missing_docs)]

//! Math types for the voxtrace traversal engine.
//!
//! Thin wrappers around nalgebra fixing the engine's numeric conventions:
//! single precision throughout, a small epsilon bias for ray lower bounds,
//! and axis-aligned boxes for voxel geometry.

use nalgebra::Vector3;

/// Scalar type used by every traversal computation.
pub type Float = f32;

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<Float>;

/// A vector in 3D space.
pub type Vec3 = Vector3<Float>;

/// Default lower ray bound. Keeps a ray spawned on a surface from
/// immediately re-hitting that surface.
pub const EPS: Float = 0.00001;

/// Largest finite scalar, the default upper ray bound.
pub const MAX_FLOAT: Float = Float::MAX;

/// Component-wise reciprocal of `v`.
///
/// Zero components map to signed infinities rather than failing; slab tests
/// rely on that.
#[inline]
pub fn reciprocal(v: &Vec3) -> Vec3 {
    Vec3::new(1.0 / v.x, 1.0 / v.y, 1.0 / v.z)
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Aabb3 {
    /// Create an AABB from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered at `center` with the given half extent.
    pub fn cube(center: Point3, half_extent: Float) -> Self {
        let h = Vec3::repeat(half_extent);
        Self {
            min: center - h,
            max: center + h,
        }
    }

    /// Create an empty (inverted) AABB suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            max: Point3::new(Float::NEG_INFINITY, Float::NEG_INFINITY, Float::NEG_INFINITY),
        }
    }

    /// True if `min <= max` on every axis.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }

    /// Expand this AABB to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Expand this AABB to include another one.
    pub fn include_aabb(&mut self, other: &Aabb3) {
        self.include_point(&other.min);
        self.include_point(&other.max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reciprocal() {
        let inv = reciprocal(&Vec3::new(2.0, -4.0, 0.5));
        assert_relative_eq!(inv, Vec3::new(0.5, -0.25, 2.0));
    }

    #[test]
    fn test_reciprocal_of_zero_is_infinite() {
        let inv = reciprocal(&Vec3::new(0.0, -0.0, 1.0));
        assert_eq!(inv.x, Float::INFINITY);
        assert_eq!(inv.y, Float::NEG_INFINITY);
        assert_eq!(inv.z, 1.0);
    }

    #[test]
    fn test_default_bounds() {
        assert!(EPS > 0.0);
        assert!(MAX_FLOAT.is_finite());
        assert!(EPS < MAX_FLOAT);
    }

    #[test]
    fn test_cube() {
        let b = Aabb3::cube(Point3::new(1.0, 2.0, 3.0), 0.5);
        assert_relative_eq!(b.min, Point3::new(0.5, 1.5, 2.5));
        assert_relative_eq!(b.max, Point3::new(1.5, 2.5, 3.5));
        assert!(b.is_valid());
    }

    #[test]
    fn test_empty_expands() {
        let mut b = Aabb3::empty();
        assert!(!b.is_valid());
        b.include_point(&Point3::new(1.0, -1.0, 0.0));
        b.include_aabb(&Aabb3::cube(Point3::origin(), 0.5));
        assert!(b.is_valid());
        assert_relative_eq!(b.min, Point3::new(-0.5, -1.0, -0.5));
        assert_relative_eq!(b.max, Point3::new(1.0, 0.5, 0.5));
    }
}
