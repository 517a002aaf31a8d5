//! Tracing a scene file and collecting per-ray results.

use anyhow::Result;
use log::info;
use serde::Serialize;
use voxtrace_math::Float;
use voxtrace_raytrace::{AnyHitDecision, TraceSettings, TraceStats, Tracer};

use crate::scene_file::SceneFile;

/// Handler payload for one ray.
#[derive(Debug, Default)]
pub struct RayReport {
    /// Stop after this many candidates.
    budget: Option<usize>,
    /// Every candidate distance the any-hit handler saw.
    candidates: Vec<Float>,
    /// Interval end reported to the closest-hit handler.
    closest: Option<Float>,
}

/// Outcome of tracing one ray from the scene file.
#[derive(Debug, Clone, Serialize)]
pub struct RayResult {
    pub index: usize,
    pub hit: bool,
    pub min_t: Float,
    pub max_t: Float,
    pub handler_candidates: Vec<Float>,
    pub closest_hit: Option<Float>,
    pub stats: TraceStats,
}

/// Tracer whose any-hit handler records candidates and enforces the
/// payload's budget, and whose closest-hit handler records the final hit.
pub fn reporting_tracer() -> Tracer<RayReport> {
    Tracer::new()
        .with_any_hit_handler(|_, ray, report: &mut RayReport| {
            report.candidates.push(ray.max_t);
            match report.budget {
                Some(n) if report.candidates.len() >= n => AnyHitDecision::CommitAndReturn,
                _ => AnyHitDecision::CommitAndContinue,
            }
        })
        .with_closest_hit_handler(|_, ray, report: &mut RayReport| {
            report.closest = Some(ray.max_t);
        })
}

/// Trace every ray of `file` in parallel with the given settings.
pub fn trace_scene(
    file: &SceneFile,
    settings: &TraceSettings,
    max_candidates: Option<usize>,
) -> Result<Vec<RayResult>> {
    trace_with(&reporting_tracer(), file, settings, max_candidates)
}

/// Trace every ray of `file` through `tracer`.
///
/// With `strict_handlers` set, a policy deferring to a handler the tracer
/// lacks is an error and nothing is traced.
fn trace_with(
    tracer: &Tracer<RayReport>,
    file: &SceneFile,
    settings: &TraceSettings,
    max_candidates: Option<usize>,
) -> Result<Vec<RayResult>> {
    settings.validate()?;
    if settings.strict_handlers {
        tracer.check_policies(settings.any_hit, settings.closest_hit)?;
    }
    let scene = file.build_scene()?;

    let mut rays = file.rays(settings);
    let mut reports: Vec<RayReport> = rays
        .iter()
        .map(|_| RayReport {
            budget: max_candidates,
            ..Default::default()
        })
        .collect();

    info!(
        "tracing {} rays through {} primitives ({} / {})",
        rays.len(),
        scene.len(),
        settings.any_hit,
        settings.closest_hit
    );
    let stats = tracer.trace_rays(
        &scene,
        &mut rays,
        settings.any_hit,
        settings.closest_hit,
        &mut reports,
    )?;

    Ok(rays
        .into_iter()
        .zip(reports)
        .zip(stats)
        .enumerate()
        .map(|(index, ((ray, report), stats))| RayResult {
            index,
            hit: stats.has_accepted_hit,
            min_t: ray.min_t,
            max_t: ray.max_t,
            handler_candidates: report.candidates,
            closest_hit: report.closest,
            stats,
        })
        .collect())
}
