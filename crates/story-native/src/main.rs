//! Headless driver: sweeps the scroll from top to bottom at a fixed frame
//! rate and logs what the render surface would receive.

use std::time::Duration;

use anyhow::Context;
use glam::Vec3;
use instant::Instant;

use story_core::{
    should_show_loader, Aabb, AssetPart, FlockConfig, FrameOutput, LoadingTimer, MemorySessionFlag,
    SceneAsset, SceneConfig, SessionFlag, StoryScene, POND_POSITION,
};

struct Args {
    frames: u32,
    fps: f32,
    flock: bool,
    seed: u64,
    aspect: f32,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            frames: 600,
            fps: 60.0,
            flock: false,
            seed: 7,
            aspect: 16.0 / 9.0,
        }
    }
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--frames" => {
                let v = it.next().context("--frames needs a value")?;
                args.frames = v.parse().with_context(|| format!("bad --frames {v}"))?;
            }
            "--fps" => {
                let v = it.next().context("--fps needs a value")?;
                args.fps = v.parse().with_context(|| format!("bad --fps {v}"))?;
            }
            "--seed" => {
                let v = it.next().context("--seed needs a value")?;
                args.seed = v.parse().with_context(|| format!("bad --seed {v}"))?;
            }
            "--aspect" => {
                let v = it.next().context("--aspect needs a value")?;
                args.aspect = v.parse().with_context(|| format!("bad --aspect {v}"))?;
            }
            "--flock" => args.flock = true,
            other => anyhow::bail!("unknown argument {other}"),
        }
    }
    anyhow::ensure!(args.fps > 0.0, "--fps must be positive");
    anyhow::ensure!(args.frames > 0, "--frames must be positive");
    Ok(args)
}

/// Stand-in for the decoded pond model: a rim around a shallow water sheet.
fn demo_pond() -> SceneAsset {
    SceneAsset::new(POND_POSITION)
        .with_part(AssetPart::new(
            "Rim",
            Some(Aabb::new(Vec3::new(-2.0, -0.1, -1.5), Vec3::new(2.0, 0.25, 1.5))),
        ))
        .with_part(
            AssetPart::new(
                "Sheet",
                Some(Aabb::new(Vec3::new(-1.8, 0.0, -1.3), Vec3::new(1.8, 0.12, 1.3))),
            )
            .with_material("Water_Mat"),
        )
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2},{:.2},{:.2})", v.x, v.y, v.z)
}

fn log_frame(frame: u32, out: &FrameOutput) {
    let boat = out
        .boat
        .map_or_else(|| "-".into(), |b| fmt_vec(b.follower.position));
    let school = if out.school.visible {
        format!("{:.3}", out.school.scale.x)
    } else {
        "hidden".into()
    };
    log::info!(
        "[frame {frame:4}] t={:.3} eye={} look={} amb={:.2} dir={:.2} boat={boat} school={school} \
         parts={} flock={}",
        out.progress,
        fmt_vec(out.camera.eye),
        fmt_vec(out.camera.target),
        out.lights.ambient,
        out.lights.directional,
        out.school_parts.len(),
        out.flock.iter().filter(|f| f.visible).count(),
    );
}

fn run_loader(base: Instant, fps: f32) {
    let mut flag = MemorySessionFlag::default();
    if !should_show_loader(&flag) {
        return;
    }
    let mut timer = LoadingTimer::new();
    timer.start(base);
    let step = Duration::from_secs_f32(1.0 / fps);
    let mut now = base;
    let mut last_shown = None;
    while let Some(tick) = timer.tick(now) {
        if last_shown != Some(tick.percent) {
            log::debug!("[loader] {:>3}% at {:.0} ms", tick.percent, tick.elapsed_ms);
            last_shown = Some(tick.percent);
        }
        if tick.completed {
            flag.mark_seen();
        }
        now += step;
    }
    log::info!("[loader] seen={}", flag.seen());
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args()?;

    // Simulated clock so runs are reproducible regardless of host speed.
    let base = Instant::now();
    run_loader(base, args.fps);

    let config = SceneConfig {
        flock: args.flock.then_some(FlockConfig {
            seed: args.seed,
            ..Default::default()
        }),
        ..Default::default()
    };
    let mut scene = StoryScene::new(config, args.aspect, base)?;
    if let Some(report) = scene.attach_pond(demo_pond(), base) {
        log::info!(
            "[calibrate] scale={:.4} surface_y={:.4} via {:?}",
            report.scale,
            report.surface_y,
            report.source
        );
    }

    let step = Duration::from_secs_f32(1.0 / args.fps);
    let log_every = (args.frames / 20).max(1);
    let mut now = base;
    for frame in 0..args.frames {
        now += step;
        let t = frame as f32 / (args.frames - 1).max(1) as f32;
        scene.progress_mut().set_target(t);
        let out = scene.frame(now);
        if frame % log_every == 0 || frame + 1 == args.frames {
            log_frame(frame, &out);
        }
    }
    scene.teardown();
    Ok(())
}
