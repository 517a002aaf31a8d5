//! TOML scene descriptions: primitives plus the rays to trace through them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use voxtrace_math::{Aabb3, Float, Point3, Vec3};
use voxtrace_raytrace::{PrimitiveScene, Ray, TraceSettings};

#[derive(Debug, Clone, Deserialize)]
pub struct SphereDef {
    pub center: [Float; 3],
    pub radius: Float,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoxelDef {
    pub min: [Float; 3],
    pub max: [Float; 3],
}

#[derive(Debug, Clone, Deserialize)]
pub struct RayDef {
    #[serde(default)]
    pub origin: [Float; 3],
    pub direction: [Float; 3],
    pub min_t: Option<Float>,
    pub max_t: Option<Float>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneFile {
    pub spheres: Vec<SphereDef>,
    pub voxels: Vec<VoxelDef>,
    pub rays: Vec<RayDef>,
}

impl SceneFile {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid scene description")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build the traversable scene. Spheres come first, then voxels.
    pub fn build_scene(&self) -> Result<PrimitiveScene> {
        let mut scene = PrimitiveScene::new();
        for (i, s) in self.spheres.iter().enumerate() {
            scene
                .add_sphere(Point3::from(s.center), s.radius)
                .with_context(|| format!("sphere #{i}"))?;
        }
        for (i, v) in self.voxels.iter().enumerate() {
            scene
                .add_voxel(Aabb3::new(Point3::from(v.min), Point3::from(v.max)))
                .with_context(|| format!("voxel #{i}"))?;
        }
        Ok(scene)
    }

    /// Rays to trace. Missing bounds fall back to the settings.
    pub fn rays(&self, settings: &TraceSettings) -> Vec<Ray> {
        self.rays
            .iter()
            .map(|r| {
                Ray::with_interval(
                    Point3::from(r.origin),
                    Vec3::from(r.direction),
                    r.min_t.unwrap_or(settings.ray_min_t),
                    r.max_t.unwrap_or(settings.ray_max_t),
                )
            })
            .collect()
    }
}
