//! Ray-sphere intersection (quadratic equation).

use voxtrace_math::{Float, Point3};

use crate::Ray;

/// Intersect a ray with a sphere.
///
/// Returns up to 2 crossings (entry and exit), sorted by t. Only crossings
/// with t >= 0 are returned. A tangent ray yields a single crossing.
pub fn intersect_sphere(ray: &Ray, center: &Point3, radius: Float) -> Vec<Float> {
    let oc = ray.origin() - center;
    let d = ray.direction();

    // |oc + t*d|^2 = r^2, in half-b form
    let a = d.dot(&d);
    if a == 0.0 {
        return Vec::new();
    }
    let half_b = oc.dot(&d);
    let c = oc.dot(&oc) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-half_b - sqrt_disc) / a;
    let t2 = (-half_b + sqrt_disc) / a;

    let mut hits = Vec::with_capacity(2);
    for t in [t1, t2] {
        if t < 0.0 || hits.last() == Some(&t) {
            continue;
        }
        hits.push(t);
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use voxtrace_math::Vec3;

    #[test]
    fn test_ray_sphere_through_center() {
        // Ray from (-10, 0, 0) pointing +x, hitting sphere at x = ±5
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let hits = intersect_sphere(&ray, &Point3::origin(), 5.0);
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0], 5.0);
        assert_relative_eq!(hits[1], 15.0);
    }

    #[test]
    fn test_ray_sphere_miss() {
        let ray = Ray::new(Point3::new(-10.0, 6.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, &Point3::origin(), 5.0).is_empty());
    }

    #[test]
    fn test_ray_sphere_tangent() {
        let ray = Ray::new(Point3::new(5.0, -10.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let hits = intersect_sphere(&ray, &Point3::origin(), 5.0);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0], 10.0);
    }

    #[test]
    fn test_ray_sphere_from_inside() {
        let ray = Ray::new(Point3::origin(), Vec3::new(0.0, 0.0, 1.0));
        let hits = intersect_sphere(&ray, &Point3::origin(), 2.0);
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0], 2.0);
    }

    #[test]
    fn test_ray_sphere_behind() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(intersect_sphere(&ray, &Point3::origin(), 5.0).is_empty());
    }

    #[test]
    fn test_ray_sphere_scaled_direction() {
        let ray = Ray::new(Point3::new(-10.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        let hits = intersect_sphere(&ray, &Point3::origin(), 5.0);
        assert_relative_eq!(hits[0], 2.5);
        assert_relative_eq!(hits[1], 7.5);
    }
}
