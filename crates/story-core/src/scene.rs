//! One frame of the story, in dependency order: progress, pending
//! calibration passes, camera, lights, boat, then the gated props.

use std::time::Duration;

use glam::Mat4;
use instant::Instant;

use crate::asset::{CalibrationTarget, SceneAsset};
use crate::calibration::{
    Calibration, CalibrationSchedule, FitReport, PassReason, SurfaceCalibrator,
};
use crate::camera::{Camera, CameraPose, CameraRig};
use crate::constants::{
    CALIBRATION_RETRY_MS, POND_BASE_SCALE, POND_FIT_FRACTION, REFERENCE_FPS, SCROLL_DAMPING_SEC,
    SCROLL_PAGES, SURFACE_BIAS, SURFACE_MARKERS,
};
use crate::error::Result;
use crate::flock::{Flock, FlockConfig};
use crate::gate::{GatedProp, PlaceholderRaw};
use crate::lights::{AmbientLightController, LightLevels};
use crate::path_follower::{HullRocking, PathFollower};
use crate::progress::{ProgressSource, ScrollProgress};
use crate::transform::Transform;

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub pages: f32,
    pub scroll_damping_sec: f32,
    pub fit_fraction: f32,
    pub base_scale: f32,
    pub surface_bias: f32,
    /// Substrings of part names or materials that mark the water surface.
    pub surface_markers: &'static [&'static str],
    pub retry_delay: Duration,
    pub school_model: Option<SceneAsset>,
    pub flock: Option<FlockConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pages: SCROLL_PAGES,
            scroll_damping_sec: SCROLL_DAMPING_SEC,
            fit_fraction: POND_FIT_FRACTION,
            base_scale: POND_BASE_SCALE,
            surface_bias: SURFACE_BIAS,
            surface_markers: SURFACE_MARKERS,
            retry_delay: Duration::from_millis(CALIBRATION_RETRY_MS),
            school_model: None,
            flock: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoatPose {
    pub follower: Transform,
    pub hull: Transform,
}

impl BoatPose {
    pub fn hull_world_matrix(&self) -> Mat4 {
        self.follower.then(&self.hull)
    }
}

/// Everything the render surface needs for one frame.
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub progress: f32,
    pub camera: CameraPose,
    pub lights: LightLevels,
    pub calibration: Calibration,
    pub pond: Option<Transform>,
    pub boat: Option<BoatPose>,
    pub school: Transform,
    /// Generated school parts in world space; empty once an external model
    /// is attached.
    pub school_parts: Vec<PlaceholderRaw>,
    pub flock: Vec<Transform>,
}

pub struct StoryScene {
    config: SceneConfig,
    progress: ScrollProgress,
    camera: Camera,
    rig: CameraRig,
    calibrator: SurfaceCalibrator,
    pond: Option<SceneAsset>,
    follower: PathFollower,
    hull: HullRocking,
    school: GatedProp,
    flock: Option<Flock>,
    lights: AmbientLightController,
    started: Instant,
    last_frame: Option<Instant>,
    torn_down: bool,
}

impl StoryScene {
    pub fn new(mut config: SceneConfig, aspect: f32, now: Instant) -> Result<Self> {
        let rig = CameraRig::story()?;
        let camera = rig.initial_camera(aspect);
        let school = GatedProp::school(config.school_model.take())?;
        let flock = config.flock.map(Flock::new).transpose()?;
        let mut calibrator = SurfaceCalibrator::new(config.base_scale, config.surface_bias)
            .with_markers(config.surface_markers);
        *calibrator.schedule_mut() = CalibrationSchedule::new(config.retry_delay);
        log::info!(
            "[scene] created pages={} flock={}",
            config.pages,
            flock.as_ref().map_or(0, Flock::len)
        );
        Ok(Self {
            progress: ScrollProgress::new(config.pages, config.scroll_damping_sec),
            config,
            camera,
            rig,
            calibrator,
            pond: None,
            follower: PathFollower::new(),
            hull: HullRocking::default(),
            school,
            flock,
            lights: AmbientLightController::default(),
            started: now,
            last_frame: None,
            torn_down: false,
        })
    }

    pub fn progress_mut(&mut self) -> &mut ScrollProgress {
        &mut self.progress
    }

    pub fn calibration(&self) -> Calibration {
        self.calibrator.calibration()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn pond(&self) -> Option<&SceneAsset> {
        self.pond.as_ref()
    }

    pub fn school(&self) -> &GatedProp {
        &self.school
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    /// The pond's geometry is available: fit and calibrate immediately, then
    /// arm the follow-up passes.
    pub fn attach_pond(&mut self, asset: SceneAsset, now: Instant) -> Option<FitReport> {
        if self.torn_down {
            log::warn!("[scene] pond attached after teardown; ignoring");
            return None;
        }
        self.pond = Some(asset);
        let report = self.recalibrate();
        self.calibrator.schedule_mut().arm(now);
        report
    }

    /// Show a loaded school model in place of the generated placeholder.
    pub fn attach_school(&mut self, asset: SceneAsset) {
        log::info!("[scene] external school model with {} parts", asset.parts().len());
        self.school.set_external(asset);
    }

    /// Viewport changed shape; refit on the next frame.
    pub fn resize(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.camera.aspect = aspect;
        }
        self.calibrator.schedule_mut().request_resize();
    }

    pub fn frame(&mut self, now: Instant) -> FrameOutput {
        let dt_sec = match self.last_frame {
            Some(prev) if now > prev => now.duration_since(prev).as_secs_f32(),
            Some(_) => 0.0,
            None => 1.0 / REFERENCE_FPS,
        };
        self.last_frame = Some(now);
        let elapsed_sec = if now > self.started {
            now.duration_since(self.started).as_secs_f32()
        } else {
            0.0
        };

        self.progress.advance(dt_sec);
        let t = self.progress.progress();

        if let Some(reason) = self.calibrator.schedule_mut().take_due(now) {
            self.run_pass(reason);
        }
        let calibration = self.calibrator.calibration();

        let camera = self.rig.update(t, dt_sec);
        camera.apply(&mut self.camera);
        let lights = self.lights.update(t);

        let boat = self
            .follower
            .update(t, elapsed_sec, dt_sec, calibration)
            .map(|follower| BoatPose {
                follower: *follower,
                hull: self.hull.local_transform(elapsed_sec),
            });

        let school = *self.school.update(t, calibration);
        let school_parts = self.school.placeholder_raw();
        let flock = match &mut self.flock {
            Some(f) => {
                f.update(t, elapsed_sec, dt_sec);
                f.transforms().copied().collect()
            }
            None => Vec::new(),
        };

        let pond = self.pond.as_ref().map(|p| {
            let mut tr = Transform::from_position(p.position());
            tr.set_uniform_scale(p.uniform_scale());
            tr
        });

        FrameOutput {
            progress: t,
            camera,
            lights,
            calibration,
            pond,
            boat,
            school,
            school_parts,
            flock,
        }
    }

    /// Cancel pending calibration passes; later frames still animate but
    /// never refit.
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.calibrator.schedule_mut().cancel();
        log::info!("[scene] torn down");
    }

    fn run_pass(&mut self, reason: PassReason) {
        log::debug!("[scene] calibration pass: {reason:?}");
        self.recalibrate();
    }

    fn recalibrate(&mut self) -> Option<FitReport> {
        let pond = self.pond.as_mut()?;
        let viewport_width = self.camera.viewport_size_at(pond.world_origin()).x;
        Some(
            self.calibrator
                .fit_and_calibrate(pond, viewport_width, self.config.fit_fraction),
        )
    }
}
