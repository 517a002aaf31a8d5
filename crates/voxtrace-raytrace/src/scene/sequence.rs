//! A scene over a fixed list of candidate distances.

use voxtrace_math::Float;

use super::Scene;
use crate::Ray;

/// Candidates given directly as distances along the ray, independent of the
/// ray's geometry.
///
/// Useful for replaying precomputed hit lists and for driving the tracer
/// with an exact candidate sequence. Distances are kept sorted; NaNs are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct HitSequence {
    distances: Vec<Float>,
}

/// Cursor into a [`HitSequence`] for one traversal.
#[derive(Debug, Clone, Default)]
pub struct SequenceCursor {
    next: usize,
    window: Option<(Float, Float)>,
}

impl SequenceCursor {
    /// Number of candidates handed out so far.
    pub fn consumed(&self) -> usize {
        self.next
    }
}

impl HitSequence {
    /// Create a sequence from candidate distances in any order.
    pub fn new(distances: impl IntoIterator<Item = Float>) -> Self {
        let mut distances: Vec<Float> = distances.into_iter().filter(|d| !d.is_nan()).collect();
        distances.sort_by(|a, b| a.total_cmp(b));
        Self { distances }
    }

    /// The sorted candidate distances.
    pub fn distances(&self) -> &[Float] {
        &self.distances
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// True if the sequence has no candidates.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

impl Scene for HitSequence {
    type Context<'a> = SequenceCursor where Self: 'a;

    fn launch_ray(&self) -> SequenceCursor {
        SequenceCursor::default()
    }

    fn next_intersection(&self, ctx: &mut SequenceCursor, ray: &mut Ray) -> bool {
        let (lo, hi) = *ctx.window.get_or_insert((ray.min_t, ray.max_t));

        while let Some(&t) = self.distances.get(ctx.next) {
            ctx.next += 1;
            if t > hi {
                ctx.next = self.distances.len();
                return false;
            }
            if t >= lo {
                ray.max_t = t;
                return true;
            }
        }
        false
    }
}
