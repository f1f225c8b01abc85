//! Gesture debouncing — confirmation hysteresis and idle timeout over
//! the raw per-frame mode signal.
//!
//! Raw classification is noisy: single-frame misclassifications would
//! otherwise flicker the interaction mode and re-anchor gestures
//! mid-flight. A pending mode must be held continuously before it is
//! confirmed, and a hand that stops moving for too long force-releases
//! whatever is held (tracking can silently degrade without the raw
//! mode ever reverting to NONE).

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mode::{InteractionMode, RawMode};

// ── Feedback ───────────────────────────────────────────────

/// Human-readable gesture status for the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureFeedback {
    /// A pending mode is inside its confirmation window.
    Verifying,
    /// A mode is confirmed and driving transforms.
    Locked,
    /// The idle timeout force-released the gesture.
    IdleLock,
}

impl GestureFeedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verifying => "VERIFYING",
            Self::Locked => "LOCKED",
            Self::IdleLock => "IDLE LOCK",
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Debouncing thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Milliseconds a pending mode must be held before confirmation.
    pub confirm_ms: f64,
    /// Milliseconds without significant hand motion before the
    /// confirmed mode is forced back to NONE.
    pub idle_timeout_ms: f64,
    /// Minimum anchor displacement (normalized screen units) that
    /// counts as motion.
    pub motion_epsilon: f32,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            confirm_ms: 400.0,
            idle_timeout_ms: 2000.0,
            motion_epsilon: 0.005,
        }
    }
}

// ── Outcome ────────────────────────────────────────────────

/// Per-frame debouncer output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebounceOutcome {
    /// The hysteresis-stable mode for this frame.
    pub mode: InteractionMode,
    /// Status for the UI; None when nothing is pending or held.
    pub feedback: Option<GestureFeedback>,
}

// ── Debouncer ──────────────────────────────────────────────

/// Confirmation/idle state machine. One instance per interaction
/// surface, updated once per frame.
#[derive(Debug)]
pub struct GestureDebouncer {
    pub config: DebounceConfig,
    /// Candidate mode awaiting confirmation.
    pending: InteractionMode,
    /// When `pending` was last (re)set.
    confirmation_start_ms: f64,
    /// Last sampled anchor of the active hand.
    last_anchor: Option<Vec2>,
    /// When the active hand last moved beyond the epsilon.
    last_move_ms: f64,
}

impl GestureDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            pending: InteractionMode::None,
            confirmation_start_ms: 0.0,
            last_anchor: None,
            last_move_ms: 0.0,
        }
    }

    /// Feed one frame's raw mode and active-hand anchor.
    ///
    /// `now_ms` is the caller's monotonic clock; the debouncer never
    /// reads a clock itself.
    pub fn update(&mut self, raw: RawMode, anchor: Option<Vec2>, now_ms: f64) -> DebounceOutcome {
        // Restart the confirmation window on every raw-mode change.
        if raw.mode != self.pending {
            debug!(
                from = self.pending.as_str(),
                to = raw.mode.as_str(),
                "pending mode changed"
            );
            self.pending = raw.mode;
            self.confirmation_start_ms = now_ms;
        }

        // The confirmed mode is recomputed from scratch each frame: it
        // is the pending mode once held long enough, NONE before that.
        let held = now_ms - self.confirmation_start_ms >= self.config.confirm_ms;
        let mut confirmed = if held {
            self.pending
        } else {
            InteractionMode::None
        };

        // Motion tracking for the idle timeout.
        if let Some(pos) = anchor {
            match self.last_anchor {
                None => {
                    self.last_anchor = Some(pos);
                    self.last_move_ms = now_ms;
                }
                Some(prev) => {
                    if (pos - prev).length() > self.config.motion_epsilon {
                        self.last_anchor = Some(pos);
                        self.last_move_ms = now_ms;
                    }
                }
            }
        }

        let idle = now_ms - self.last_move_ms > self.config.idle_timeout_ms;
        if idle && confirmed != InteractionMode::None {
            debug!(mode = confirmed.as_str(), "idle lock forced release");
            confirmed = InteractionMode::None;
            return DebounceOutcome {
                mode: confirmed,
                feedback: Some(GestureFeedback::IdleLock),
            };
        }

        let feedback = if confirmed != InteractionMode::None {
            Some(GestureFeedback::Locked)
        } else if self.pending != InteractionMode::None {
            Some(GestureFeedback::Verifying)
        } else {
            None
        };

        DebounceOutcome {
            mode: confirmed,
            feedback,
        }
    }

    /// Reset to the startup state.
    pub fn reset(&mut self) {
        self.pending = InteractionMode::None;
        self.confirmation_start_ms = 0.0;
        self.last_anchor = None;
        self.last_move_ms = 0.0;
    }
}

// ── Tests ──────────────────────────────────────────────────
