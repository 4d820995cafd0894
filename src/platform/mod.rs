//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (absolute timestamps to clamped deltas)
//! - Cancelling the self-re-arming frame loop

use std::cell::Cell;
use std::rc::Rc;

use crate::config::GameConfig;
use crate::consts::MAX_DT;
use crate::sim::clamp_dt;

/// Turns absolute frame timestamps into simulation deltas
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt,
        }
    }

    /// Clock clamping to the frame budget of `config`
    pub fn for_config(config: &GameConfig) -> Self {
        Self::new(config.max_dt)
    }

    /// Seconds since the previous call, clamped to `[0, max_dt]`.
    ///
    /// The first frame after creation or [`FrameClock::reset`] yields 0.
    pub fn delta(&mut self, now_ms: f64) -> f32 {
        if !now_ms.is_finite() {
            return 0.0;
        }
        let dt = match self.last_ms.replace(now_ms) {
            Some(prev) => ((now_ms - prev) / 1000.0) as f32,
            None => 0.0,
        };
        clamp_dt(dt, self.max_dt)
    }

    /// Forget the last timestamp (e.g. after the tab was hidden)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

/// Cancellation handle for the frame loop; clones share state
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
    #[cfg(target_arch = "wasm32")]
    pending_frame: Rc<Cell<Option<i32>>>,
}

impl LoopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the loop; it will not re-arm after the current frame
    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            if let (Some(id), Some(window)) = (self.pending_frame.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
        }
        log::info!("Frame loop cancelled");
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Remember the id of the queued animation frame
    #[cfg(target_arch = "wasm32")]
    pub fn set_pending_frame(&self, id: i32) {
        self.pending_frame.set(Some(id));
    }
}
