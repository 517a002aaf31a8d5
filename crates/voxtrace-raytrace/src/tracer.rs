//! Any-hit / closest-hit traversal engine.
//!
//! [`Tracer::trace_ray`] walks the candidates a [`Scene`] reports along a ray
//! and applies caller policy to each one:
//!
//! 1. The caller's ray is copied into a working ray and a context is launched.
//! 2. The scene narrows the working ray onto the next candidate.
//! 3. The any-hit decision (the policy flag, or the registered handler when
//!    the flag defers to it) either commits the candidate's interval to the
//!    caller's ray or ignores it, then continues or stops.
//! 4. When the walk ends and something was committed, the closest-hit
//!    handler fires once if the closest-hit policy defers to it.
//!
//! Only committed intervals ever reach the caller's ray, so ignored geometry
//! has no influence on the result.

use std::fmt;
use std::str::FromStr;

use log::{debug, trace, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{HandlerKind, Result, TraceError};
use crate::{Ray, Scene};

/// What to do with a single intersection candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnyHitDecision {
    /// Accept the candidate and keep searching.
    #[default]
    CommitAndContinue,
    /// Skip the candidate and keep searching.
    IgnoreAndContinue,
    /// Accept the candidate and stop.
    CommitAndReturn,
    /// Ask the registered any-hit handler. A handler answering with this
    /// skips the candidate.
    DeferToHandler,
}

/// What to do once the search has ended with at least one accepted hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosestHitDecision {
    /// Return without further work.
    #[default]
    ReturnOnly,
    /// Call the registered closest-hit handler.
    DeferToHandler,
}

impl AnyHitDecision {
    /// True for the two decisions that accept the candidate.
    pub fn commits(self) -> bool {
        matches!(self, AnyHitDecision::CommitAndContinue | AnyHitDecision::CommitAndReturn)
    }
}

impl fmt::Display for AnyHitDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnyHitDecision::CommitAndContinue => "commit_and_continue",
            AnyHitDecision::IgnoreAndContinue => "ignore_and_continue",
            AnyHitDecision::CommitAndReturn => "commit_and_return",
            AnyHitDecision::DeferToHandler => "defer_to_handler",
        })
    }
}

impl FromStr for AnyHitDecision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "commit_and_continue" | "commit" => Ok(AnyHitDecision::CommitAndContinue),
            "ignore_and_continue" | "ignore" => Ok(AnyHitDecision::IgnoreAndContinue),
            "commit_and_return" | "first" => Ok(AnyHitDecision::CommitAndReturn),
            "defer_to_handler" | "handler" => Ok(AnyHitDecision::DeferToHandler),
            other => Err(format!("unknown any-hit decision: {other}")),
        }
    }
}

impl fmt::Display for ClosestHitDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClosestHitDecision::ReturnOnly => "return_only",
            ClosestHitDecision::DeferToHandler => "defer_to_handler",
        })
    }
}

impl FromStr for ClosestHitDecision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "return_only" | "return" => Ok(ClosestHitDecision::ReturnOnly),
            "defer_to_handler" | "handler" => Ok(ClosestHitDecision::DeferToHandler),
            other => Err(format!("unknown closest-hit decision: {other}")),
        }
    }
}

/// Per-candidate callback. Receives the tracer, the working ray narrowed onto
/// the candidate, and the caller's payload.
pub type AnyHitHandler<P> = Box<dyn Fn(&Tracer<P>, &Ray, &mut P) -> AnyHitDecision + Send + Sync>;

/// End-of-traversal callback. Receives the tracer, the caller's ray holding
/// the last committed interval, and the caller's payload.
pub type ClosestHitHandler<P> = Box<dyn Fn(&Tracer<P>, &Ray, &mut P) + Send + Sync>;

/// Summary of one traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraceStats {
    /// Candidates the any-hit policy was evaluated for.
    pub candidates: usize,
    /// Candidates that were committed.
    pub commits: usize,
    /// True if any candidate was committed.
    pub has_accepted_hit: bool,
    /// True if a `CommitAndReturn` ended the search.
    pub returned_early: bool,
    /// True if the closest-hit handler ran.
    pub closest_hit_invoked: bool,
}

/// Traversal engine with optional any-hit and closest-hit handlers.
///
/// `P` is the caller payload type handed through to the handlers untouched.
/// A configured tracer holds no per-traversal state, so one instance can
/// serve many traversals, including concurrently.
pub struct Tracer<P = ()> {
    any_hit_handler: Option<AnyHitHandler<P>>,
    closest_hit_handler: Option<ClosestHitHandler<P>>,
}

impl<P> Default for Tracer<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Tracer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracer")
            .field("any_hit_handler", &self.any_hit_handler.is_some())
            .field("closest_hit_handler", &self.closest_hit_handler.is_some())
            .finish()
    }
}

impl<P> Tracer<P> {
    /// Create a tracer with no handlers.
    pub fn new() -> Self {
        Self {
            any_hit_handler: None,
            closest_hit_handler: None,
        }
    }

    /// Register the any-hit handler, replacing any previous one.
    pub fn set_any_hit_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Tracer<P>, &Ray, &mut P) -> AnyHitDecision + Send + Sync + 'static,
    {
        self.any_hit_handler = Some(Box::new(handler));
    }

    /// Register the closest-hit handler, replacing any previous one.
    pub fn set_closest_hit_handler<F>(&mut self, handler: F)
    where
        F: Fn(&Tracer<P>, &Ray, &mut P) + Send + Sync + 'static,
    {
        self.closest_hit_handler = Some(Box::new(handler));
    }

    /// Builder form of [`set_any_hit_handler`](Self::set_any_hit_handler).
    pub fn with_any_hit_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Tracer<P>, &Ray, &mut P) -> AnyHitDecision + Send + Sync + 'static,
    {
        self.set_any_hit_handler(handler);
        self
    }

    /// Builder form of [`set_closest_hit_handler`](Self::set_closest_hit_handler).
    pub fn with_closest_hit_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Tracer<P>, &Ray, &mut P) + Send + Sync + 'static,
    {
        self.set_closest_hit_handler(handler);
        self
    }

    /// Remove the any-hit handler.
    pub fn clear_any_hit_handler(&mut self) {
        self.any_hit_handler = None;
    }

    /// Remove the closest-hit handler.
    pub fn clear_closest_hit_handler(&mut self) {
        self.closest_hit_handler = None;
    }

    /// True if an any-hit handler is registered.
    pub fn has_any_hit_handler(&self) -> bool {
        self.any_hit_handler.is_some()
    }

    /// True if a closest-hit handler is registered.
    pub fn has_closest_hit_handler(&self) -> bool {
        self.closest_hit_handler.is_some()
    }

    /// Check that every handler the given policies defer to is registered.
    pub fn check_policies(
        &self,
        any_hit: AnyHitDecision,
        closest_hit: ClosestHitDecision,
    ) -> Result<()> {
        if any_hit == AnyHitDecision::DeferToHandler && self.any_hit_handler.is_none() {
            return Err(TraceError::MissingHandler(HandlerKind::AnyHit));
        }
        if closest_hit == ClosestHitDecision::DeferToHandler && self.closest_hit_handler.is_none() {
            return Err(TraceError::MissingHandler(HandlerKind::ClosestHit));
        }
        Ok(())
    }

    /// Trace `ray` through `scene`.
    ///
    /// On return `ray` holds the last committed interval, or is unchanged if
    /// nothing was committed. A ray whose interval is already empty traces no
    /// candidates and the scene is never launched.
    ///
    /// A policy of [`AnyHitDecision::DeferToHandler`] without a registered
    /// handler behaves as [`AnyHitDecision::CommitAndContinue`]; use
    /// [`try_trace_ray`](Self::try_trace_ray) to reject it instead.
    /// Handler panics propagate to the caller.
    pub fn trace_ray<S>(
        &self,
        scene: &S,
        ray: &mut Ray,
        any_hit: AnyHitDecision,
        closest_hit: ClosestHitDecision,
        payload: &mut P,
    ) -> TraceStats
    where
        S: Scene + ?Sized,
    {
        let mut stats = TraceStats::default();

        if !ray.has_valid_interval() {
            debug!(
                "skipping traversal of empty interval [{}, {}]",
                ray.min_t, ray.max_t
            );
            return stats;
        }

        if any_hit == AnyHitDecision::DeferToHandler && self.any_hit_handler.is_none() {
            warn!("any-hit policy defers to a handler, but none is registered; committing every candidate");
        }

        let mut ctx = scene.launch_ray();
        let mut working = *ray;

        while working.has_valid_interval() && scene.next_intersection(&mut ctx, &mut working) {
            stats.candidates += 1;

            let decision = self.resolve_any_hit(any_hit, &working, payload);
            trace!(
                "candidate {} at t={} -> {}",
                stats.candidates,
                working.max_t,
                decision
            );

            if decision.commits() {
                ray.commit_interval(&working);
                stats.commits += 1;
                stats.has_accepted_hit = true;
            }

            if decision == AnyHitDecision::CommitAndReturn {
                stats.returned_early = true;
                break;
            }
        }
        drop(ctx);

        if stats.has_accepted_hit && closest_hit == ClosestHitDecision::DeferToHandler {
            if let Some(handler) = &self.closest_hit_handler {
                handler(self, &*ray, payload);
                stats.closest_hit_invoked = true;
            }
        }

        debug!(
            "traversal done: {} candidates, {} commits, max_t={}",
            stats.candidates, stats.commits, ray.max_t
        );
        stats
    }

    /// Like [`trace_ray`](Self::trace_ray), but fails before launching the
    /// scene if a policy defers to a handler that is not registered.
    pub fn try_trace_ray<S>(
        &self,
        scene: &S,
        ray: &mut Ray,
        any_hit: AnyHitDecision,
        closest_hit: ClosestHitDecision,
        payload: &mut P,
    ) -> Result<TraceStats>
    where
        S: Scene + ?Sized,
    {
        self.check_policies(any_hit, closest_hit)?;
        Ok(self.trace_ray(scene, ray, any_hit, closest_hit, payload))
    }

    /// Trace many rays in parallel, pairing `rays[i]` with `payloads[i]`.
    ///
    /// Every ray gets its own context; results match tracing the rays one by
    /// one with [`trace_ray`](Self::trace_ray).
    ///
    /// Fails with [`TraceError::BatchMismatch`] if `rays` and `payloads`
    /// differ in length; no ray is traced in that case.
    pub fn trace_rays<S>(
        &self,
        scene: &S,
        rays: &mut [Ray],
        any_hit: AnyHitDecision,
        closest_hit: ClosestHitDecision,
        payloads: &mut [P],
    ) -> Result<Vec<TraceStats>>
    where
        S: Scene + Sync + ?Sized,
        P: Send,
    {
        if rays.len() != payloads.len() {
            return Err(TraceError::BatchMismatch {
                rays: rays.len(),
                payloads: payloads.len(),
            });
        }

        Ok(rays
            .par_iter_mut()
            .zip(payloads.par_iter_mut())
            .map(|(ray, payload)| self.trace_ray(scene, ray, any_hit, closest_hit, payload))
            .collect())
    }

    fn resolve_any_hit(&self, policy: AnyHitDecision, working: &Ray, payload: &mut P) -> AnyHitDecision {
        if policy != AnyHitDecision::DeferToHandler {
            return policy;
        }
        match &self.any_hit_handler {
            Some(handler) => match handler(self, working, payload) {
                // A handler cannot defer to itself; the candidate is dropped.
                AnyHitDecision::DeferToHandler => AnyHitDecision::IgnoreAndContinue,
                decision => decision,
            },
            None => AnyHitDecision::CommitAndContinue,
        }
    }
}
