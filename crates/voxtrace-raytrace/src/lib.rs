#![warn(missing_docs)]

//! Any-hit / closest-hit ray traversal for voxtrace.
//!
//! This crate provides the host-side control flow of a hardware ray-tracing
//! pipeline, decoupled from any acceleration structure. A scene reports
//! intersection candidates one at a time; the tracer decides, per candidate,
//! whether to commit, ignore, stop, or ask a caller-supplied handler.
//!
//! # Architecture
//!
//! - [`Ray`] - Ray with a cached reciprocal direction and a valid `[min_t, max_t]` interval
//! - [`Scene`] - Contract a traversable scene implements, with its own opaque context type
//! - [`Tracer`] - The traversal state machine and its optional handlers
//! - [`TraceSettings`] - Default policies and ray bounds, loadable from TOML
//! - [`intersect`] - Ray-primitive intersection for the reference scenes
//! - [`HitSequence`], [`PrimitiveScene`] - Reference scene implementations
//!
//! # Example
//!
//! ```
//! use voxtrace_math::{Point3, Vec3};
//! use voxtrace_raytrace::{AnyHitDecision, ClosestHitDecision, HitSequence, Ray, Tracer};
//!
//! let scene = HitSequence::new([2.0, 5.0, 8.0]);
//! let tracer: Tracer<Vec<f32>> = Tracer::new()
//!     .with_closest_hit_handler(|_, ray, hits: &mut Vec<f32>| hits.push(ray.max_t));
//!
//! let mut ray = Ray::new(Point3::origin(), Vec3::z());
//! let mut hits = Vec::new();
//! tracer.trace_ray(
//!     &scene,
//!     &mut ray,
//!     AnyHitDecision::CommitAndReturn,
//!     ClosestHitDecision::DeferToHandler,
//!     &mut hits,
//! );
//!
//! assert_eq!(ray.max_t, 2.0);
//! assert_eq!(hits, vec![2.0]);
//! ```

mod error;
mod ray;
mod scene;
mod settings;
mod tracer;
pub mod intersect;

pub use error::{HandlerKind, Result, TraceError};
pub use ray::Ray;
pub use scene::{Candidate, HitSequence, Primitive, PrimitiveContext, PrimitiveScene, Scene, SequenceCursor};
pub use settings::TraceSettings;
pub use tracer::{
    AnyHitDecision, AnyHitHandler, ClosestHitDecision, ClosestHitHandler, TraceStats, Tracer,
};
