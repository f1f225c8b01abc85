//! Raw interaction-mode resolution — maps the current frame's hand
//! poses (0, 1, or 2 hands) to an unfiltered mode.
//!
//! Pure and stateless; re-evaluated from scratch every frame. The
//! debouncer is responsible for turning this noisy signal into a
//! stable confirmed mode.

use crate::pose::HandPose;

// ── InteractionMode ────────────────────────────────────────

/// Discrete interaction modes driving the transform engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// No qualifying gesture.
    #[default]
    None,
    /// Single-hand fist: translate and rotate (6-DOF).
    Move,
    /// Single-hand pinch: non-uniform stretch.
    Edit,
    /// Two-hand pinch: uniform scaling.
    DualScale,
}

impl InteractionMode {
    /// String representation for IPC and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Move => "move",
            Self::Edit => "edit",
            Self::DualScale => "dual-scale",
        }
    }

    /// Parse a mode from its string representation.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "move" => Some(Self::Move),
            "edit" => Some(Self::Edit),
            "dual-scale" => Some(Self::DualScale),
            _ => None,
        }
    }
}

// ── RawMode ────────────────────────────────────────────────

/// Resolution result: the raw mode plus which hand drives it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMode {
    pub mode: InteractionMode,
    /// Index into the pose list of the hand driving a single-hand
    /// mode. DUAL_SCALE uses both hands; NONE keeps the first hand
    /// (if any) for idle-motion tracking.
    pub active_hand: Option<usize>,
}

impl RawMode {
    pub const NONE: RawMode = RawMode {
        mode: InteractionMode::None,
        active_hand: None,
    };
}

/// Resolve the raw mode for this frame's poses, in rule order:
///
/// 1. Two hands both pinching → DUAL_SCALE.
/// 2. Any fist → MOVE, driven by the first fist in detector order.
/// 3. Any pinch → EDIT, driven by the first pinch in detector order.
/// 4. Otherwise → NONE.
///
/// Fist therefore outranks pinch when both hands qualify for different
/// single-hand gestures in the same frame. "First" is detector array
/// order — arbitrary, but deterministic.
pub fn resolve(poses: &[HandPose]) -> RawMode {
    if poses.len() >= 2 && poses[0].is_pinch && poses[1].is_pinch {
        return RawMode {
            mode: InteractionMode::DualScale,
            active_hand: Some(0),
        };
    }
    if let Some(i) = poses.iter().position(|p| p.is_fist) {
        return RawMode {
            mode: InteractionMode::Move,
            active_hand: Some(i),
        };
    }
    if let Some(i) = poses.iter().position(|p| p.is_pinch) {
        return RawMode {
            mode: InteractionMode::Edit,
            active_hand: Some(i),
        };
    }
    RawMode {
        mode: InteractionMode::None,
        active_hand: (!poses.is_empty()).then_some(0),
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::pose::HandOrientation;

    fn pose(is_fist: bool, is_pinch: bool) -> HandPose {
        HandPose {
            anchor: Vec2::ZERO,
            pinch_midpoint: is_pinch.then_some(Vec2::ZERO),
            is_fist,
            is_pinch,
            orientation: HandOrientation::default(),
        }
    }

    #[test]
    fn test_no_hands_is_none() {
        let raw = resolve(&[]);
        assert_eq!(raw.mode, InteractionMode::None);
        assert_eq!(raw.active_hand, None);
    }

    #[test]
    fn test_open_hand_is_none_but_tracked() {
        let raw = resolve(&[pose(false, false)]);
        assert_eq!(raw.mode, InteractionMode::None);
        assert_eq!(raw.active_hand, Some(0));
    }

    #[test]
    fn test_single_fist_is_move() {
        let raw = resolve(&[pose(true, false)]);
        assert_eq!(raw.mode, InteractionMode::Move);
        assert_eq!(raw.active_hand, Some(0));
    }

    #[test]
    fn test_single_pinch_is_edit() {
        let raw = resolve(&[pose(false, true)]);
        assert_eq!(raw.mode, InteractionMode::Edit);
        assert_eq!(raw.active_hand, Some(0));
    }

    #[test]
    fn test_double_pinch_is_dual_scale() {
        let raw = resolve(&[pose(false, true), pose(false, true)]);
        assert_eq!(raw.mode, InteractionMode::DualScale);
    }

    #[test]
    fn test_fist_outranks_pinch_across_hands() {
        // Pinch on the first hand, fist on the second: fist wins and
        // the second hand drives.
        let raw = resolve(&[pose(false, true), pose(true, false)]);
        assert_eq!(raw.mode, InteractionMode::Move);
        assert_eq!(raw.active_hand, Some(1));
    }

    #[test]
    fn test_first_fist_wins_when_both_fists() {
        let raw = resolve(&[pose(true, false), pose(true, false)]);
        assert_eq!(raw.mode, InteractionMode::Move);
        assert_eq!(raw.active_hand, Some(0));
    }

    #[test]
    fn test_fist_plus_pinch_is_not_dual_scale() {
        let raw = resolve(&[pose(true, false), pose(false, true)]);
        assert_eq!(raw.mode, InteractionMode::Move);
        assert_eq!(raw.active_hand, Some(0));
    }

    #[test]
    fn test_mode_roundtrip() {
        for s in ["none", "move", "edit", "dual-scale"] {
            let m = InteractionMode::from_str(s).unwrap();
            assert_eq!(m.as_str(), s);
        }
        assert_eq!(InteractionMode::from_str("bogus"), None);
    }
}
