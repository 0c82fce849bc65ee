//! Wall-clock driven loading indicator: 0 → 95% over the first ramp, then
//! 95 → 100% over the second, completing exactly once at the total duration.
//!
//! Real asset progress is not tracked; the scene keeps loading in parallel
//! while the indicator runs its fixed schedule.

use instant::Instant;

use crate::constants::{RAMP1_MS, RAMP1_PERCENT, RAMP2_MS, TOTAL_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoaderPhase {
    Idle,
    RampingFast,
    RampingSlow,
    Done,
}

/// Phase for a given elapsed time since start.
pub fn phase_at(elapsed_ms: f64) -> LoaderPhase {
    if elapsed_ms <= RAMP1_MS {
        LoaderPhase::RampingFast
    } else if elapsed_ms <= TOTAL_MS {
        LoaderPhase::RampingSlow
    } else {
        LoaderPhase::Done
    }
}

/// Whole percent shown at `elapsed_ms`; non-decreasing and within \[0, 100\].
pub fn percent_at(elapsed_ms: f64) -> u8 {
    let elapsed = if elapsed_ms.is_nan() {
        0.0
    } else {
        elapsed_ms.max(0.0)
    };
    let p = if elapsed <= RAMP1_MS {
        elapsed / RAMP1_MS * RAMP1_PERCENT
    } else if elapsed <= TOTAL_MS {
        RAMP1_PERCENT + (elapsed - RAMP1_MS) / RAMP2_MS * (100.0 - RAMP1_PERCENT)
    } else {
        100.0
    };
    p.floor().min(100.0) as u8
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderState {
    pub phase_start: Instant,
    pub elapsed_ms: f64,
    pub percent: u8,
    pub phase: LoaderPhase,
}

/// Result of one timer tick. `completed` is true on exactly one tick per run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoaderTick {
    pub percent: u8,
    pub elapsed_ms: f64,
    pub phase: LoaderPhase,
    pub completed: bool,
}

#[derive(Clone, Debug, Default)]
pub struct LoadingTimer {
    state: Option<LoaderState>,
}

impl LoadingTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a run at `now`. A second start while running restarts from zero.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            log::debug!("[loader] restart requested; resetting elapsed time");
        }
        self.state = Some(LoaderState {
            phase_start: now,
            elapsed_ms: 0.0,
            percent: 0,
            phase: LoaderPhase::RampingFast,
        });
    }

    pub fn phase(&self) -> LoaderPhase {
        self.state.map_or(LoaderPhase::Idle, |s| s.phase)
    }

    pub fn state(&self) -> Option<&LoaderState> {
        self.state.as_ref()
    }

    pub fn is_running(&self) -> bool {
        matches!(
            self.phase(),
            LoaderPhase::RampingFast | LoaderPhase::RampingSlow
        )
    }

    /// Advance to `now`. Returns `None` when idle, cancelled or already done,
    /// which tells the host to stop scheduling ticks.
    pub fn tick(&mut self, now: Instant) -> Option<LoaderTick> {
        let state = self.state.as_mut()?;
        if state.phase == LoaderPhase::Done {
            return None;
        }
        let elapsed_ms = millis_between(state.phase_start, now);
        // Monotonic guard in case the host clock stutters.
        let elapsed_ms = elapsed_ms.max(state.elapsed_ms);
        let percent = percent_at(elapsed_ms).max(state.percent);
        let completed = elapsed_ms >= TOTAL_MS;
        state.elapsed_ms = elapsed_ms;
        state.percent = if completed { 100 } else { percent };
        state.phase = if completed {
            LoaderPhase::Done
        } else {
            phase_at(elapsed_ms)
        };
        if completed {
            log::info!("[loader] complete after {elapsed_ms:.0} ms");
        }
        Some(LoaderTick {
            percent: state.percent,
            elapsed_ms,
            phase: state.phase,
            completed,
        })
    }

    /// Stop without completing; later ticks report nothing.
    pub fn cancel(&mut self) {
        if self.state.take().is_some() {
            log::debug!("[loader] cancelled");
        }
    }
}

fn millis_between(start: Instant, now: Instant) -> f64 {
    if now > start {
        now.duration_since(start).as_secs_f64() * 1000.0
    } else {
        0.0
    }
}

/// Session-scoped "loader already shown" flag supplied by the host.
pub trait SessionFlag {
    fn seen(&self) -> bool;
    fn mark_seen(&mut self);
}

/// In-process flag for hosts without session storage.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemorySessionFlag {
    seen: bool,
}

impl SessionFlag for MemorySessionFlag {
    fn seen(&self) -> bool {
        self.seen
    }

    fn mark_seen(&mut self) {
        self.seen = true;
    }
}

pub fn should_show_loader<F: SessionFlag + ?Sized>(flag: &F) -> bool {
    !flag.seen()
}
