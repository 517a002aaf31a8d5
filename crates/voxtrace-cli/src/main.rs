//! voxtrace CLI - trace scene descriptions with any-hit / closest-hit policies
//!
//! Loads a TOML scene of spheres, voxels and rays, runs each ray through the
//! traversal engine, and prints what was committed.

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::debug;
use std::path::{Path, PathBuf};
use voxtrace_raytrace::{AnyHitDecision, ClosestHitDecision, TraceSettings};

mod logger;
mod run;
mod scene_file;

use logger::{init_logger, LogLevel};
use scene_file::SceneFile;

#[derive(Parser)]
#[command(name = "voxtrace")]
#[command(about = "Any-hit / closest-hit ray traversal driver", long_about = None)]
struct Cli {
    /// Logging level
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trace every ray of a scene file
    Trace {
        /// Scene description (.toml)
        scene: PathBuf,
        /// Settings file providing default policies and ray bounds
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Any-hit policy: commit, ignore, first, handler
        #[arg(long)]
        any_hit: Option<AnyHitDecision>,
        /// Closest-hit policy: return, handler
        #[arg(long)]
        closest_hit: Option<ClosestHitDecision>,
        /// Fail if a policy defers to a handler that is not registered
        #[arg(long)]
        strict: bool,
        /// Stop each ray after this many candidates (applies with --any-hit handler)
        #[arg(long)]
        max_candidates: Option<usize>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display information about a scene file
    Info {
        /// Scene description (.toml)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);

    match cli.command {
        Commands::Trace {
            scene,
            config,
            any_hit,
            closest_hit,
            strict,
            max_candidates,
            json,
        } => {
            let mut settings = match config {
                Some(path) => TraceSettings::load(&path)?,
                None => TraceSettings::default(),
            };
            if let Some(p) = any_hit {
                settings.any_hit = p;
            }
            if let Some(p) = closest_hit {
                settings.closest_hit = p;
            }
            if strict {
                settings.strict_handlers = true;
            }
            debug!("settings: {:?}", settings);

            trace_file(&scene, &settings, max_candidates, json)?;
        }
        Commands::Info { scene } => {
            show_info(&scene)?;
        }
    }

    Ok(())
}

fn trace_file(
    path: &Path,
    settings: &TraceSettings,
    max_candidates: Option<usize>,
    json: bool,
) -> Result<()> {
    let file = SceneFile::load(path)?;
    let results = run::trace_scene(&file, settings, max_candidates)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for r in &results {
        if r.hit {
            println!(
                "ray {}: hit  t=[{}, {}]  candidates={} commits={}",
                r.index, r.min_t, r.max_t, r.stats.candidates, r.stats.commits
            );
        } else {
            println!("ray {}: miss candidates={}", r.index, r.stats.candidates);
        }
        if let Some(t) = r.closest_hit {
            println!("  closest-hit handler saw t={}", t);
        }
    }

    Ok(())
}

fn show_info(path: &Path) -> Result<()> {
    let file = SceneFile::load(path)?;
    let scene = file.build_scene()?;

    println!("voxtrace scene: {}", path.display());
    println!("  Spheres: {}", file.spheres.len());
    println!("  Voxels: {}", file.voxels.len());
    println!("  Rays: {}", file.rays.len());

    if !scene.is_empty() {
        let b = scene.bounds();
        println!(
            "  Bounds: [{}, {}, {}] .. [{}, {}, {}]",
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z
        );
    }

    Ok(())
}
