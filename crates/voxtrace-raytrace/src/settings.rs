//! Traversal settings loaded from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use voxtrace_math::{Float, Point3, Vec3, EPS, MAX_FLOAT};

use crate::error::{Result, TraceError};
use crate::{AnyHitDecision, ClosestHitDecision, Ray, Scene, TraceStats, Tracer};

/// Default policies and ray bounds for a traversal run.
///
/// Every field is optional in a settings file:
///
/// ```toml
/// any_hit = "commit_and_return"
/// closest_hit = "defer_to_handler"
/// strict_handlers = true
/// ray_min_t = 0.001
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceSettings {
    /// Any-hit policy applied to every candidate.
    pub any_hit: AnyHitDecision,
    /// Closest-hit policy applied once at the end.
    pub closest_hit: ClosestHitDecision,
    /// Reject policies that defer to an unregistered handler instead of
    /// committing.
    pub strict_handlers: bool,
    /// Lower bound for rays built by [`TraceSettings::make_ray`].
    pub ray_min_t: Float,
    /// Upper bound for rays built by [`TraceSettings::make_ray`].
    pub ray_max_t: Float,
}

impl Default for TraceSettings {
    fn default() -> Self {
        Self {
            any_hit: AnyHitDecision::CommitAndContinue,
            closest_hit: ClosestHitDecision::ReturnOnly,
            strict_handlers: false,
            ray_min_t: EPS,
            ray_max_t: MAX_FLOAT,
        }
    }
}

impl TraceSettings {
    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.ray_min_t >= 0.0) {
            return Err(TraceError::InvalidSettings(format!(
                "ray_min_t must be non-negative, got {}",
                self.ray_min_t
            )));
        }
        if !(self.ray_max_t >= self.ray_min_t) {
            return Err(TraceError::InvalidSettings(format!(
                "ray_max_t ({}) must not be below ray_min_t ({})",
                self.ray_max_t, self.ray_min_t
            )));
        }
        Ok(())
    }

    /// Build a ray using the configured bounds.
    pub fn make_ray(&self, origin: Point3, direction: Vec3) -> Ray {
        Ray::with_interval(origin, direction, self.ray_min_t, self.ray_max_t)
    }

    /// Trace `ray` with the configured policies.
    ///
    /// Fails only in strict mode, when a policy defers to a missing handler.
    pub fn trace<S, P>(
        &self,
        tracer: &Tracer<P>,
        scene: &S,
        ray: &mut Ray,
        payload: &mut P,
    ) -> Result<TraceStats>
    where
        S: Scene + ?Sized,
    {
        if self.strict_handlers {
            tracer.try_trace_ray(scene, ray, self.any_hit, self.closest_hit, payload)
        } else {
            Ok(tracer.trace_ray(scene, ray, self.any_hit, self.closest_hit, payload))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerKind;
    use crate::HitSequence;

    #[test]
    fn test_defaults() {
        let s = TraceSettings::default();
        assert_eq!(s.any_hit, AnyHitDecision::CommitAndContinue);
        assert_eq!(s.closest_hit, ClosestHitDecision::ReturnOnly);
        assert!(!s.strict_handlers);
        assert_eq!(s.ray_min_t, EPS);
        assert_eq!(s.ray_max_t, MAX_FLOAT);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let s = TraceSettings::from_toml_str(
            r#"
            any_hit = "commit_and_return"
            strict_handlers = true
            "#,
        )
        .unwrap();
        assert_eq!(s.any_hit, AnyHitDecision::CommitAndReturn);
        assert_eq!(s.closest_hit, ClosestHitDecision::ReturnOnly);
        assert!(s.strict_handlers);
        assert_eq!(s.ray_min_t, EPS);
    }

    #[test]
    fn test_empty_toml() {
        assert_eq!(TraceSettings::from_toml_str("").unwrap(), TraceSettings::default());
    }

    #[test]
    fn test_rejects_bad_policy() {
        let err = TraceSettings::from_toml_str(r#"any_hit = "maybe""#).unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_bounds() {
        let err = TraceSettings::from_toml_str("ray_min_t = 5.0\nray_max_t = 1.0").unwrap_err();
        assert!(matches!(err, TraceError::InvalidSettings(_)));

        let err = TraceSettings::from_toml_str("ray_min_t = -1.0").unwrap_err();
        assert!(matches!(err, TraceError::InvalidSettings(_)));

        let s = TraceSettings {
            ray_min_t: Float::NAN,
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = TraceSettings::load("/nonexistent/voxtrace-settings.toml").unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
    }

    #[test]
    fn test_make_ray_uses_bounds() {
        let s = TraceSettings {
            ray_min_t: 0.5,
            ray_max_t: 6.0,
            ..Default::default()
        };
        let r = s.make_ray(Point3::origin(), Vec3::z());
        assert_eq!(r.min_t, 0.5);
        assert_eq!(r.max_t, 6.0);
    }

    #[test]
    fn test_trace_strict_and_lenient() {
        let scene = HitSequence::new([2.0, 5.0, 8.0]);
        let tracer = Tracer::<()>::new();

        let lenient = TraceSettings {
            any_hit: AnyHitDecision::DeferToHandler,
            ..Default::default()
        };
        let mut r = lenient.make_ray(Point3::origin(), Vec3::z());
        let stats = lenient.trace(&tracer, &scene, &mut r, &mut ()).unwrap();
        assert_eq!(stats.commits, 3);
        assert_eq!(r.max_t, 8.0);

        let strict = TraceSettings {
            strict_handlers: true,
            ..lenient
        };
        let mut r = strict.make_ray(Point3::origin(), Vec3::z());
        let err = strict.trace(&tracer, &scene, &mut r, &mut ()).unwrap_err();
        assert!(matches!(err, TraceError::MissingHandler(HandlerKind::AnyHit)));
        assert_eq!(r.max_t, MAX_FLOAT);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let s = TraceSettings {
            any_hit: AnyHitDecision::IgnoreAndContinue,
            closest_hit: ClosestHitDecision::DeferToHandler,
            strict_handlers: true,
            ray_min_t: 0.25,
            ray_max_t: 100.0,
        };
        let text = toml::to_string(&s).unwrap();
        assert_eq!(TraceSettings::from_toml_str(&text).unwrap(), s);
    }
}
