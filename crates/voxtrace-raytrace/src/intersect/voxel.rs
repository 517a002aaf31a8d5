//! Ray-voxel (axis-aligned box) intersection.

use voxtrace_math::{Aabb3, Float};

use crate::Ray;

/// Intersect a ray with the boundary of an axis-aligned box.
///
/// Returns the entry and exit crossings with t >= 0, sorted by t. A ray
/// starting inside the box yields only the exit; a ray grazing an edge
/// yields a single crossing.
pub fn intersect_voxel(ray: &Ray, voxel: &Aabb3) -> Vec<Float> {
    let Some((t_enter, t_exit)) = ray.intersect_aabb(voxel) else {
        return Vec::new();
    };

    let mut hits = Vec::with_capacity(2);
    if t_enter >= 0.0 {
        hits.push(t_enter);
    }
    if t_exit != t_enter {
        hits.push(t_exit);
    }
    hits
}
