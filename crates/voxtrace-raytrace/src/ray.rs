//! Ray representation and its valid parametric interval.

use voxtrace_math::{reciprocal, Aabb3, Float, Point3, Vec3, EPS, MAX_FLOAT};

/// A ray `origin + t * direction` restricted to `t` in `[min_t, max_t]`.
///
/// `direction` is fixed at construction and need not be unit length. Its
/// component-wise reciprocal is cached so box tests avoid repeated division.
/// The interval is public: scenes narrow `max_t` as they report candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    origin: Point3,
    direction: Vec3,
    inv_direction: Vec3,
    /// Lower bound of the valid interval.
    pub min_t: Float,
    /// Upper bound of the valid interval.
    pub max_t: Float,
}

impl Ray {
    /// Create a ray with the default interval `[EPS, MAX_FLOAT]`.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self::with_interval(origin, direction, EPS, MAX_FLOAT)
    }

    /// Create a ray with an explicit interval.
    ///
    /// The interval is not validated; a ray with `min_t > max_t` is accepted
    /// and simply traces no candidates.
    pub fn with_interval(origin: Point3, direction: Vec3, min_t: Float, max_t: Float) -> Self {
        Self {
            origin,
            direction,
            inv_direction: reciprocal(&direction),
            min_t,
            max_t,
        }
    }

    /// Origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Point3 {
        self.origin
    }

    /// Direction of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Component-wise reciprocal of the direction. Zero components are infinite.
    #[inline]
    pub fn inv_direction(&self) -> Vec3 {
        self.inv_direction
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: Float) -> Point3 {
        self.origin + self.direction * t
    }

    /// True while `min_t <= max_t`. NaN bounds are never valid.
    #[inline]
    pub fn has_valid_interval(&self) -> bool {
        self.min_t <= self.max_t
    }

    /// True if `t` lies inside the current interval (bounds included).
    #[inline]
    pub fn contains(&self, t: Float) -> bool {
        self.min_t <= t && t <= self.max_t
    }

    /// Copy the interval of `other` onto this ray, leaving geometry untouched.
    #[inline]
    pub(crate) fn commit_interval(&mut self, other: &Ray) {
        self.min_t = other.min_t;
        self.max_t = other.max_t;
    }

    /// Test ray-AABB intersection using the slab method.
    ///
    /// Returns `Some((t_enter, t_exit))` for the unclamped entry and exit
    /// parameters when the box is crossed somewhere at `t >= 0`. The ray's
    /// own interval is not consulted.
    #[inline]
    pub fn intersect_aabb(&self, aabb: &Aabb3) -> Option<(Float, Float)> {
        let sign = [
            usize::from(self.inv_direction.x < 0.0),
            usize::from(self.inv_direction.y < 0.0),
            usize::from(self.inv_direction.z < 0.0),
        ];
        let bounds = [aabb.min, aabb.max];

        let tx1 = (bounds[sign[0]].x - self.origin.x) * self.inv_direction.x;
        let tx2 = (bounds[1 - sign[0]].x - self.origin.x) * self.inv_direction.x;

        let mut t_enter = tx1;
        let mut t_exit = tx2;

        let ty1 = (bounds[sign[1]].y - self.origin.y) * self.inv_direction.y;
        let ty2 = (bounds[1 - sign[1]].y - self.origin.y) * self.inv_direction.y;

        t_enter = t_enter.max(ty1);
        t_exit = t_exit.min(ty2);

        let tz1 = (bounds[sign[2]].z - self.origin.z) * self.inv_direction.z;
        let tz2 = (bounds[1 - sign[2]].z - self.origin.z) * self.inv_direction.z;

        t_enter = t_enter.max(tz1);
        t_exit = t_exit.min(tz2);

        if t_exit >= t_enter && t_exit >= 0.0 {
            Some((t_enter, t_exit))
        } else {
            None
        }
    }
}
