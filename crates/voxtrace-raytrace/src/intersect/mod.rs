//! Ray-primitive intersection routines used by the reference scenes.
//!
//! Each routine returns every surface crossing at `t >= 0`, sorted by `t`.
//! Interval filtering is left to the caller.

mod sphere;
mod voxel;

pub use sphere::intersect_sphere;
pub use voxel::intersect_voxel;
