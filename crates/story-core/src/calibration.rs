//! Fit-to-viewport scaling and the surface-height broadcast.
//!
//! [`SurfaceCalibrator`] is the single writer of the [`Calibration`] value.
//! Dependents receive copies and must skip their update while it is unset.

use std::time::Duration;

use instant::Instant;

use crate::asset::CalibrationTarget;
use crate::constants::{
    CALIBRATION_RETRY_MS, FIT_FRACTION_MAX, FIT_FRACTION_MIN, POND_BASE_SCALE, SURFACE_BIAS,
    SURFACE_MARKERS,
};

/// Published surface height with a revision bumped on every fit pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Calibration {
    value: Option<f32>,
    revision: u64,
}

impl Calibration {
    pub const UNSET: Calibration = Calibration {
        value: None,
        revision: 0,
    };

    pub fn value(&self) -> Option<f32> {
        self.value
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Value to use for geometry that tolerates an unset calibration.
    pub fn value_or_zero(&self) -> f32 {
        self.value.unwrap_or(0.0)
    }

    fn publish(&mut self, surface_y: f32) {
        self.value = Some(surface_y);
        self.revision += 1;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceSource {
    MarkedPart,
    GroupOrigin,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitReport {
    pub scale: f32,
    pub surface_y: f32,
    pub source: SurfaceSource,
}

/// Uniform scale that makes `native_width` span `fit_fraction` of the viewport.
pub fn fit_scale(
    native_width: f32,
    viewport_width: f32,
    fit_fraction: f32,
    base_scale: f32,
) -> f32 {
    let width = if native_width.is_finite() && native_width > f32::EPSILON {
        native_width
    } else {
        1.0
    };
    let target = viewport_width * fit_fraction.clamp(FIT_FRACTION_MIN, FIT_FRACTION_MAX);
    target / width * base_scale
}

/// Surface height of an already-scaled asset: top of the first marked part,
/// or the asset's origin height when no part is marked.
pub fn measure_surface<A: CalibrationTarget + ?Sized>(
    asset: &A,
    markers: &[&str],
    bias: f32,
) -> (f32, SurfaceSource) {
    match asset.marked_part_bounds(markers) {
        Some(bounds) => (bounds.max.y + bias, SurfaceSource::MarkedPart),
        None => {
            let origin = asset.world_origin();
            let y = if origin.y.is_finite() { origin.y } else { 0.0 };
            (y + bias, SurfaceSource::GroupOrigin)
        }
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceCalibrator {
    base_scale: f32,
    bias: f32,
    markers: Vec<String>,
    calibration: Calibration,
    schedule: CalibrationSchedule,
}

impl Default for SurfaceCalibrator {
    fn default() -> Self {
        Self::new(POND_BASE_SCALE, SURFACE_BIAS)
    }
}

impl SurfaceCalibrator {
    pub fn new(base_scale: f32, bias: f32) -> Self {
        Self {
            base_scale,
            bias,
            markers: SURFACE_MARKERS.iter().map(|m| m.to_string()).collect(),
            calibration: Calibration::UNSET,
            schedule: CalibrationSchedule::default(),
        }
    }

    pub fn with_markers(mut self, markers: &[&str]) -> Self {
        self.markers = markers.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn schedule(&self) -> &CalibrationSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut CalibrationSchedule {
        &mut self.schedule
    }

    /// Scale `asset` to the viewport, then measure and publish the surface
    /// height. Publishes exactly once per call.
    pub fn fit_and_calibrate<A: CalibrationTarget + ?Sized>(
        &mut self,
        asset: &mut A,
        viewport_width: f32,
        fit_fraction: f32,
    ) -> FitReport {
        let native_width = asset.native_bounds().map(|b| b.size().x).unwrap_or(0.0);
        if viewport_width.is_finite() && viewport_width > 0.0 {
            let s = fit_scale(native_width, viewport_width, fit_fraction, self.base_scale);
            asset.apply_uniform_scale(s);
        } else {
            log::warn!("[calibrate] ignoring viewport width {viewport_width}; keeping scale");
        }

        let markers: Vec<&str> = self.markers.iter().map(String::as_str).collect();
        let (surface_y, source) = measure_surface(asset, &markers, self.bias);
        if source == SurfaceSource::GroupOrigin {
            log::debug!("[calibrate] no marked surface part; using group origin");
        }
        self.calibration.publish(surface_y);
        let scale = asset.uniform_scale();
        log::debug!(
            "[calibrate] rev={} scale={:.4} surface_y={:.4}",
            self.calibration.revision(),
            scale,
            surface_y
        );
        FitReport {
            scale,
            surface_y,
            source,
        }
    }
}

/// Why a calibration pass is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassReason {
    NextFrame,
    Retry,
    Resize,
}

/// Pending deferred calibration passes: one on the frame after the initial
/// pass, one after a short delay, and one per resize notification. Due passes
/// coalesce into a single run. Once cancelled nothing further is reported.
#[derive(Clone, Debug)]
pub struct CalibrationSchedule {
    next_frame: bool,
    retry_at: Option<Instant>,
    resize: bool,
    retry_delay: Duration,
    cancelled: bool,
}

impl Default for CalibrationSchedule {
    fn default() -> Self {
        Self::new(Duration::from_millis(CALIBRATION_RETRY_MS))
    }
}

impl CalibrationSchedule {
    pub fn new(retry_delay: Duration) -> Self {
        Self {
            next_frame: false,
            retry_at: None,
            resize: false,
            retry_delay,
            cancelled: false,
        }
    }

    /// Arm the follow-up passes after the initial pass ran at `now`.
    pub fn arm(&mut self, now: Instant) {
        if self.cancelled {
            return;
        }
        self.next_frame = true;
        self.retry_at = Some(now + self.retry_delay);
    }

    pub fn request_resize(&mut self) {
        if !self.cancelled {
            self.resize = true;
        }
    }

    /// Take the passes due at `now`, reporting the most specific reason.
    pub fn take_due(&mut self, now: Instant) -> Option<PassReason> {
        if self.cancelled {
            return None;
        }
        let retry_due = self.retry_at.is_some_and(|at| now >= at);
        if retry_due {
            self.retry_at = None;
        }
        let reason = if self.resize {
            Some(PassReason::Resize)
        } else if retry_due {
            Some(PassReason::Retry)
        } else if self.next_frame {
            Some(PassReason::NextFrame)
        } else {
            None
        };
        self.resize = false;
        self.next_frame = false;
        reason
    }

    pub fn is_pending(&self) -> bool {
        !self.cancelled && (self.next_frame || self.resize || self.retry_at.is_some())
    }

    pub fn cancel(&mut self) {
        self.cancelled = true;
        self.next_frame = false;
        self.retry_at = None;
        self.resize = false;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

