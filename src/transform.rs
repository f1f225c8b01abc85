//! Transform execution — converts confirmed gestures plus hand motion
//! into incremental position/rotation/scale updates on the
//! manipulation target.
//!
//! Start references are captured exactly once, at the instant a mode
//! is confirmed, and every subsequent frame applies a delta relative
//! to them. MOVE eases toward its goal (lerp/slerp per frame); EDIT
//! and DUAL_SCALE are immediate.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mode::InteractionMode;
use crate::pose::{HandOrientation, HandPose};

// ── ObjectTransform ────────────────────────────────────────

/// The manipulation target's transform, as requested from the external
/// scene graph. The scene graph owns the object; the engine only owns
/// this view of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub position: Vec3,
    pub rotation: Quat,
    /// Non-uniform scale (EDIT stretches axes independently).
    pub scale: Vec3,
    pub visible: bool,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
        }
    }
}

// ── Indicator ──────────────────────────────────────────────

/// Observational per-mode indicator for external visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    Idle,
    Move,
    /// MOVE while the target hovers the drop zone.
    DeleteHover,
    Edit,
    DualScale,
}

impl IndicatorState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Move => "move",
            Self::DeleteHover => "delete-hover",
            Self::Edit => "edit",
            Self::DualScale => "dual-scale",
        }
    }

    /// Feedback tint (RGB 0..1): cyan idle, orange move, red over the
    /// drop zone, teal edit, green dual-scale.
    pub fn color(&self) -> [f32; 3] {
        match self {
            Self::Idle => [0.0, 0.847, 1.0],
            Self::Move => [1.0, 0.667, 0.0],
            Self::DeleteHover => [1.0, 0.0, 0.0],
            Self::Edit => [0.0, 1.0, 0.667],
            Self::DualScale => [0.0, 1.0, 0.0],
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Sensitivities and easing factors. Tuned against the orientation
/// approximation in the pose classifier; change them together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Screen-delta to world-translation gain.
    pub move_sensitivity: f32,
    /// Per-frame lerp factor toward the translation goal.
    pub position_easing: f32,
    /// Hand-pitch to object-pitch gain (about +X).
    pub pitch_sensitivity: f32,
    /// Hand-yaw gain (about Y, negated: mirrored camera).
    pub yaw_sensitivity: f32,
    /// Hand-roll gain (about Z, negated).
    pub roll_sensitivity: f32,
    /// Per-frame slerp factor toward the rotation goal.
    pub rotation_easing: f32,
    /// Screen-delta to scale gain for EDIT.
    pub stretch_sensitivity: f32,
    /// Lower clamp applied to every scale axis.
    pub min_scale: f32,
    /// Deltas at or below this magnitude are ignored.
    pub jitter_floor: f32,
    /// Idle spin increment per frame (radians about Y).
    pub idle_spin_rad: f32,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            move_sensitivity: 2.5,
            position_easing: 0.2,
            pitch_sensitivity: 2.0,
            yaw_sensitivity: 2.0,
            roll_sensitivity: 1.5,
            rotation_easing: 0.15,
            stretch_sensitivity: 3.0,
            min_scale: 0.2,
            jitter_floor: 0.005,
            idle_spin_rad: 0.002,
        }
    }
}

// ── Execution state ────────────────────────────────────────

/// Start references captured at mode entry. Valid only while
/// `active` holds and `mode != None`; never re-captured mid-gesture.
#[derive(Debug, Clone, Default)]
pub struct GestureExecState {
    pub active: bool,
    pub mode: InteractionMode,
    /// Hand anchor (MOVE) or grip point (EDIT) at entry.
    pub start_anchor: Option<Vec2>,
    pub start_orientation: HandOrientation,
    /// Pinch-pair distance at DUAL_SCALE entry; None when the entry
    /// frame lacked both midpoints.
    pub start_pinch_dist: Option<f32>,
    pub start_position: Vec3,
    pub start_rotation: Quat,
    pub start_scale: Vec3,
}

// ── Engine ─────────────────────────────────────────────────

/// Per-frame transform executor.
pub struct TransformEngine {
    pub config: TransformConfig,
    pub exec: GestureExecState,
}

impl TransformEngine {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            exec: GestureExecState::default(),
        }
    }

    /// Apply one frame of the confirmed mode to the target.
    ///
    /// On a mode change the new mode's start references are captured
    /// from the current poses before any delta is applied, so the
    /// entry frame itself is always a no-op. Returns the indicator
    /// state for external feedback.
    pub fn apply(
        &mut self,
        confirmed: InteractionMode,
        poses: &[HandPose],
        active_hand: Option<usize>,
        target: &mut ObjectTransform,
        drop_hovering: bool,
    ) -> IndicatorState {
        if confirmed != self.exec.mode {
            self.enter(confirmed, poses, active_hand, target);
        }

        match confirmed {
            InteractionMode::None => IndicatorState::Idle,
            InteractionMode::Move => {
                self.apply_move(poses, active_hand, target);
                if drop_hovering {
                    IndicatorState::DeleteHover
                } else {
                    IndicatorState::Move
                }
            }
            InteractionMode::Edit => {
                self.apply_edit(poses, active_hand, target);
                IndicatorState::Edit
            }
            InteractionMode::DualScale => {
                self.apply_dual_scale(poses, target);
                IndicatorState::DualScale
            }
        }
    }

    /// Ambient spin applied by the caller to the live object while no
    /// gesture is confirmed.
    pub fn idle_spin(&self, target: &mut ObjectTransform) {
        target.rotation = Quat::from_rotation_y(self.config.idle_spin_rad) * target.rotation;
    }

    /// Capture start references for a newly confirmed mode.
    fn enter(
        &mut self,
        mode: InteractionMode,
        poses: &[HandPose],
        active_hand: Option<usize>,
        target: &ObjectTransform,
    ) {
        debug!(
            from = self.exec.mode.as_str(),
            to = mode.as_str(),
            "gesture mode entered"
        );
        self.exec.mode = mode;
        self.exec.active = mode != InteractionMode::None;
        self.exec.start_anchor = None;
        self.exec.start_pinch_dist = None;

        let hand = active_hand.and_then(|i| poses.get(i));
        match mode {
            InteractionMode::None => {}
            InteractionMode::Move => {
                if let Some(hand) = hand {
                    self.exec.start_anchor = Some(hand.anchor);
                    self.exec.start_orientation = hand.orientation;
                    self.exec.start_position = target.position;
                    self.exec.start_rotation = target.rotation;
                }
            }
            InteractionMode::Edit => {
                if let Some(hand) = hand {
                    self.exec.start_anchor = Some(hand.grip_point());
                    self.exec.start_scale = target.scale;
                }
            }
            InteractionMode::DualScale => {
                if let Some((a, b)) = pinch_pair(poses) {
                    self.exec.start_pinch_dist = Some((a - b).length());
                    self.exec.start_scale = target.scale;
                }
            }
        }
    }

    fn apply_move(
        &mut self,
        poses: &[HandPose],
        active_hand: Option<usize>,
        target: &mut ObjectTransform,
    ) {
        let (Some(start), Some(hand)) = (
            self.exec.start_anchor,
            active_hand.and_then(|i| poses.get(i)),
        ) else {
            return;
        };

        let delta = hand.anchor - start;
        if delta.length() <= self.config.jitter_floor {
            return;
        }

        // Translation: ease toward start position + amplified delta.
        let goal = self.exec.start_position
            + Vec3::new(
                delta.x * self.config.move_sensitivity,
                delta.y * self.config.move_sensitivity,
                0.0,
            );
        target.position = target.position.lerp(goal, self.config.position_easing);

        // Rotation: compose per-axis deltas onto the start quaternion
        // (roll, then yaw, then pitch) and slerp toward the result.
        let d_pitch = hand.orientation.pitch - self.exec.start_orientation.pitch;
        let d_yaw = hand.orientation.yaw - self.exec.start_orientation.yaw;
        let d_roll = hand.orientation.roll - self.exec.start_orientation.roll;

        let q_roll = Quat::from_rotation_z(-d_roll * self.config.roll_sensitivity);
        let q_yaw = Quat::from_rotation_y(-d_yaw * self.config.yaw_sensitivity);
        let q_pitch = Quat::from_rotation_x(d_pitch * self.config.pitch_sensitivity);

        let goal = self.exec.start_rotation * q_roll * q_yaw * q_pitch;
        target.rotation = target.rotation.slerp(goal, self.config.rotation_easing);
    }

    fn apply_edit(
        &mut self,
        poses: &[HandPose],
        active_hand: Option<usize>,
        target: &mut ObjectTransform,
    ) {
        let (Some(start), Some(hand)) = (
            self.exec.start_anchor,
            active_hand.and_then(|i| poses.get(i)),
        ) else {
            return;
        };

        let delta = hand.grip_point() - start;
        if delta.length() <= self.config.jitter_floor {
            return;
        }

        let min = self.config.min_scale;
        let sx = (self.exec.start_scale.x + delta.x * self.config.stretch_sensitivity).max(min);
        let sy = (self.exec.start_scale.y + delta.y * self.config.stretch_sensitivity).max(min);
        // Depth follows the average of the stretched axes.
        let sz = (sx + sy) * 0.5;
        target.scale = Vec3::new(sx, sy, sz);
    }

    fn apply_dual_scale(&mut self, poses: &[HandPose], target: &mut ObjectTransform) {
        let Some((a, b)) = pinch_pair(poses) else {
            return;
        };
        // A zero starting distance would divide away the scale; skip
        // the update instead.
        let Some(start_dist) = self.exec.start_pinch_dist.filter(|d| *d > 0.0) else {
            return;
        };

        let factor = (a - b).length() / start_dist;
        let uniform = (self.exec.start_scale.x * factor).max(self.config.min_scale);
        target.scale = Vec3::splat(uniform);
    }
}

/// Both hands' pinch midpoints, when present.
fn pinch_pair(poses: &[HandPose]) -> Option<(Vec2, Vec2)> {
    let a = poses.first()?.pinch_midpoint?;
    let b = poses.get(1)?.pinch_midpoint?;
    Some((a, b))
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn test_pose(anchor: Vec2, midpoint: Option<Vec2>, is_fist: bool) -> HandPose {
    HandPose {
        anchor,
        pinch_midpoint: midpoint,
        is_fist,
        is_pinch: midpoint.is_some(),
        orientation: HandOrientation::default(),
    }
}

// ── Tests ──────────────────────────────────────────────────
