//! The contract a scene must satisfy to be walked by a [`crate::Tracer`].
//!
//! A scene hands out intersection candidates one at a time. How it finds
//! them (BVH, grid, brute force) is its own business; the tracer only sees
//! the opaque per-traversal [`Scene::Context`] and the narrowing ray.

mod primitives;
mod sequence;

pub use primitives::{Candidate, Primitive, PrimitiveContext, PrimitiveScene};
pub use sequence::{HitSequence, SequenceCursor};

use crate::Ray;

/// A traversable scene.
///
/// # Implementer obligations
///
/// - [`launch_ray`](Scene::launch_ray) may be called any number of times,
///   including concurrently from several threads when the scene is `Sync`.
///   It must not mutate shared scene state.
/// - [`next_intersection`](Scene::next_intersection) reports candidates in
///   non-decreasing distance. The tracer never sorts or checks them; an
///   out-of-order scene gives meaningless any-hit results.
/// - The context owns the search frontier. The interval seen on the first
///   query bounds the search; later queries continue past the candidate
///   returned last, whose distance the ray's `max_t` now holds.
/// - Failures (bad scene data, allocation) are reported through the scene's
///   own channel before tracing starts. A launched context is assumed valid.
pub trait Scene {
    /// Per-traversal state. Lives for exactly one traversal and is dropped by
    /// the tracer when that traversal ends.
    type Context<'a>
    where
        Self: 'a;

    /// Begin a new traversal.
    fn launch_ray(&self) -> Self::Context<'_>;

    /// Find the next candidate for `ray`.
    ///
    /// On success sets `ray.max_t` to the candidate distance and returns
    /// `true`. Returns `false` once no candidates remain; that is the normal
    /// end of a traversal, not an error.
    fn next_intersection(&self, ctx: &mut Self::Context<'_>, ray: &mut Ray) -> bool;
}
