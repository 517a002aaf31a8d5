//! Brute-force scene over a flat list of spheres and voxels.

use log::trace;
use voxtrace_math::{Aabb3, Float, Point3, Vec3};

use super::Scene;
use crate::error::{Result, TraceError};
use crate::intersect::{intersect_sphere, intersect_voxel};
use crate::Ray;

/// A primitive the brute-force scene can intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    /// Sphere given by center and radius.
    Sphere {
        /// Center of the sphere.
        center: Point3,
        /// Radius, strictly positive.
        radius: Float,
    },
    /// Axis-aligned box.
    Voxel(Aabb3),
}

impl Primitive {
    /// Bounding box of the primitive.
    pub fn bounds(&self) -> Aabb3 {
        match self {
            Primitive::Sphere { center, radius } => Aabb3::new(
                *center - Vec3::repeat(*radius),
                *center + Vec3::repeat(*radius),
            ),
            Primitive::Voxel(aabb) => *aabb,
        }
    }

    /// Every surface crossing of `ray` with this primitive at t >= 0.
    pub fn intersect(&self, ray: &Ray) -> Vec<Float> {
        match self {
            Primitive::Sphere { center, radius } => intersect_sphere(ray, center, *radius),
            Primitive::Voxel(aabb) => intersect_voxel(ray, aabb),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Primitive::Sphere { center, radius } => {
                if !(*radius > 0.0 && radius.is_finite()) {
                    return Err(TraceError::InvalidPrimitive(format!(
                        "sphere radius must be positive and finite, got {radius}"
                    )));
                }
                if !center.coords.iter().all(|c| c.is_finite()) {
                    return Err(TraceError::InvalidPrimitive(
                        "sphere center must be finite".into(),
                    ));
                }
            }
            Primitive::Voxel(aabb) => {
                if !aabb.is_valid() {
                    return Err(TraceError::InvalidPrimitive(format!(
                        "voxel min {:?} exceeds max {:?}",
                        aabb.min, aabb.max
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One surface crossing found during a traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Distance along the ray.
    pub t: Float,
    /// Index of the primitive in its scene.
    pub primitive: usize,
}

/// Scene that tests every primitive against every ray.
///
/// Each traversal context gathers all crossings inside the interval seen on
/// its first query, sorted by distance with ties broken by primitive index,
/// and hands them out one per query.
#[derive(Debug, Clone)]
pub struct PrimitiveScene {
    primitives: Vec<Primitive>,
    bounds: Aabb3,
}

impl Default for PrimitiveScene {
    fn default() -> Self {
        Self::new()
    }
}

impl PrimitiveScene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            bounds: Aabb3::empty(),
        }
    }

    /// Build a scene from primitives, rejecting degenerate ones.
    pub fn from_primitives(primitives: impl IntoIterator<Item = Primitive>) -> Result<Self> {
        let mut scene = Self::new();
        for p in primitives {
            scene.push(p)?;
        }
        Ok(scene)
    }

    /// Add a primitive and return its index.
    pub fn push(&mut self, primitive: Primitive) -> Result<usize> {
        primitive.validate()?;
        self.bounds.include_aabb(&primitive.bounds());
        self.primitives.push(primitive);
        Ok(self.primitives.len() - 1)
    }

    /// Add a sphere and return its index.
    pub fn add_sphere(&mut self, center: Point3, radius: Float) -> Result<usize> {
        self.push(Primitive::Sphere { center, radius })
    }

    /// Add a voxel and return its index.
    pub fn add_voxel(&mut self, voxel: Aabb3) -> Result<usize> {
        self.push(Primitive::Voxel(voxel))
    }

    /// The primitives in insertion order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Bounding box of all primitives. Inverted when the scene is empty.
    pub fn bounds(&self) -> Aabb3 {
        self.bounds
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// True if the scene has no primitives.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All crossings of `ray` inside its current interval, in traversal order.
    pub fn candidates(&self, ray: &Ray) -> Vec<Candidate> {
        if self.primitives.is_empty() || ray.intersect_aabb(&self.bounds).is_none() {
            return Vec::new();
        }

        let mut found: Vec<Candidate> = self
            .primitives
            .iter()
            .enumerate()
            .flat_map(|(primitive, p)| {
                p.intersect(ray)
                    .into_iter()
                    .filter(|&t| ray.contains(t))
                    .map(move |t| Candidate { t, primitive })
            })
            .collect();

        found.sort_by(|a, b| a.t.total_cmp(&b.t).then(a.primitive.cmp(&b.primitive)));
        found
    }
}

/// Traversal state for a [`PrimitiveScene`].
#[derive(Debug)]
pub struct PrimitiveContext<'a> {
    scene: &'a PrimitiveScene,
    pending: Option<Vec<Candidate>>,
    cursor: usize,
}

impl PrimitiveContext<'_> {
    /// The candidate most recently handed out, if any.
    pub fn last_candidate(&self) -> Option<Candidate> {
        let pending = self.pending.as_ref()?;
        self.cursor.checked_sub(1).and_then(|i| pending.get(i).copied())
    }
}

impl Scene for PrimitiveScene {
    type Context<'a> = PrimitiveContext<'a> where Self: 'a;

    fn launch_ray(&self) -> PrimitiveContext<'_> {
        PrimitiveContext {
            scene: self,
            pending: None,
            cursor: 0,
        }
    }

    fn next_intersection(&self, ctx: &mut PrimitiveContext<'_>, ray: &mut Ray) -> bool {
        let scene = ctx.scene;
        let pending = ctx.pending.get_or_insert_with(|| {
            let found = scene.candidates(ray);
            trace!("gathered {} candidates from {} primitives", found.len(), scene.len());
            found
        });

        match pending.get(ctx.cursor) {
            Some(c) => {
                ctx.cursor += 1;
                ray.max_t = c.t;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn row_of_voxels() -> PrimitiveScene {
        // Unit voxels at z = 2, 5 and 8 along the +z axis.
        PrimitiveScene::from_primitives([8.0, 2.0, 5.0].map(|z| {
            Primitive::Voxel(Aabb3::new(Point3::new(-0.5, -0.5, z), Point3::new(0.5, 0.5, z + 1.0)))
        }))
        .unwrap()
    }

    fn drain(scene: &PrimitiveScene, mut ray: Ray) -> Vec<Float> {
        let mut ctx = scene.launch_ray();
        let mut seen = Vec::new();
        while scene.next_intersection(&mut ctx, &mut ray) {
            seen.push(ray.max_t);
        }
        seen
    }

    #[test]
    fn test_candidates_sorted_across_primitives() {
        let scene = row_of_voxels();
        let seen = drain(&scene, Ray::new(Point3::origin(), Vec3::z()));
        assert_eq!(seen.len(), 6);
        for (got, want) in seen.iter().zip([2.0, 3.0, 5.0, 6.0, 8.0, 9.0]) {
            assert_relative_eq!(*got, want);
        }
    }

    #[test]
    fn test_interval_limits_candidates() {
        let scene = row_of_voxels();
        let seen = drain(&scene, Ray::with_interval(Point3::origin(), Vec3::z(), 2.5, 8.5));
        assert_eq!(seen, vec![3.0, 5.0, 6.0, 8.0]);
    }

    #[test]
    fn test_miss_scene_bounds() {
        let scene = row_of_voxels();
        assert!(drain(&scene, Ray::new(Point3::new(3.0, 0.0, 0.0), Vec3::z())).is_empty());
    }

    #[test]
    fn test_empty_scene() {
        let scene = PrimitiveScene::new();
        assert!(scene.is_empty());
        assert!(drain(&scene, Ray::new(Point3::origin(), Vec3::z())).is_empty());
    }

    #[test]
    fn test_mixed_primitives_and_last_candidate() {
        let mut scene = PrimitiveScene::new();
        let sphere = scene.add_sphere(Point3::new(0.0, 0.0, 10.0), 1.0).unwrap();
        let voxel = scene.add_voxel(Aabb3::cube(Point3::new(0.0, 0.0, 4.0), 0.5)).unwrap();

        let mut ray = Ray::new(Point3::origin(), Vec3::z());
        let mut ctx = scene.launch_ray();
        assert!(ctx.last_candidate().is_none());

        assert!(scene.next_intersection(&mut ctx, &mut ray));
        assert_relative_eq!(ray.max_t, 3.5);
        assert_eq!(ctx.last_candidate().unwrap().primitive, voxel);

        assert!(scene.next_intersection(&mut ctx, &mut ray));
        assert!(scene.next_intersection(&mut ctx, &mut ray));
        assert_relative_eq!(ray.max_t, 9.0);
        assert_eq!(ctx.last_candidate().unwrap().primitive, sphere);

        assert!(scene.next_intersection(&mut ctx, &mut ray));
        assert_relative_eq!(ray.max_t, 11.0);
        assert!(!scene.next_intersection(&mut ctx, &mut ray));
    }

    #[test]
    fn test_rejects_degenerate_primitives() {
        let mut scene = PrimitiveScene::new();
        assert!(matches!(
            scene.add_sphere(Point3::origin(), 0.0),
            Err(TraceError::InvalidPrimitive(_))
        ));
        assert!(matches!(
            scene.add_sphere(Point3::origin(), Float::NAN),
            Err(TraceError::InvalidPrimitive(_))
        ));
        assert!(matches!(
            scene.add_voxel(Aabb3::new(Point3::new(1.0, 0.0, 0.0), Point3::origin())),
            Err(TraceError::InvalidPrimitive(_))
        ));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_bounds_cover_primitives() {
        let mut scene = PrimitiveScene::new();
        scene.add_sphere(Point3::new(0.0, 0.0, 10.0), 1.0).unwrap();
        scene.add_voxel(Aabb3::cube(Point3::origin(), 0.5)).unwrap();
        let b = scene.bounds();
        assert_relative_eq!(b.min, Point3::new(-1.0, -1.0, -0.5));
        assert_relative_eq!(b.max, Point3::new(1.0, 1.0, 11.0));
    }
}
