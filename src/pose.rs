//! Hand pose classification — reduces a raw 21-point keypoint set to a
//! compact per-hand descriptor (fist/pinch flags, screen anchor, pinch
//! midpoint, palm orientation).
//!
//! Thresholds operate on normalized image-space distances and were
//! tuned against live camera tracking; see [`PoseConfig`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::landmarks::{HandLandmark, HandLandmarks};

// ── Orientation ────────────────────────────────────────────

/// Approximate hand orientation in radians.
///
/// Pitch and yaw come from the palm normal (cross product of the
/// wrist→index-base and wrist→pinky-base vectors); roll comes
/// independently from the 2-D angle of the index-base→pinky-base
/// segment. This is not a true rotation-matrix-to-Euler decomposition
/// and degrades at extreme wrist angles; the transform sensitivities
/// downstream are tuned against exactly this approximation, so it is
/// kept as-is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HandOrientation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

// ── HandPose ───────────────────────────────────────────────

/// Compact pose descriptor for one detected hand, rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandPose {
    /// Wrist position mapped to mirrored screen space, -1..1 per axis.
    pub anchor: Vec2,
    /// Thumb-tip/index-tip midpoint in the same space; present only
    /// while pinching.
    pub pinch_midpoint: Option<Vec2>,
    /// Closed fist (grab). Mutually exclusive with `is_pinch`.
    pub is_fist: bool,
    /// Thumb-index pinch. Suppressed while `is_fist` holds.
    pub is_pinch: bool,
    pub orientation: HandOrientation,
}

impl HandPose {
    /// The point driving EDIT-style interaction: the pinch midpoint
    /// when available, the wrist anchor otherwise.
    pub fn grip_point(&self) -> Vec2 {
        self.pinch_midpoint.unwrap_or(self.anchor)
    }
}

// ── Config ─────────────────────────────────────────────────

/// Classification thresholds, in normalized image units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoseConfig {
    /// A fingertip closer to the wrist than this fraction of the
    /// hand-size reference (wrist to middle-finger base) counts as
    /// curled even when still beyond its base knuckle.
    pub curl_ratio: f32,
    /// Minimum number of curled non-thumb fingers for a fist.
    pub fist_min_curled: usize,
    /// Maximum thumb-tip to index-base distance for a fist.
    pub fist_thumb_dist: f32,
    /// Maximum thumb-tip to index-tip distance for a pinch.
    pub pinch_dist: f32,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            curl_ratio: 0.6,
            fist_min_curled: 3,
            fist_thumb_dist: 0.15,
            pinch_dist: 0.08,
        }
    }
}

// ── Classifier ─────────────────────────────────────────────

/// Stateless keypoints→pose classifier.
#[derive(Debug, Clone, Default)]
pub struct PoseClassifier {
    pub config: PoseConfig,
}

impl PoseClassifier {
    pub fn new(config: PoseConfig) -> Self {
        Self { config }
    }

    /// Classify one hand's keypoint set into a [`HandPose`].
    pub fn classify(&self, hand: &HandLandmarks) -> HandPose {
        let is_fist = self.is_fist(hand);
        // Fist takes precedence: a tight fist often also brings the
        // thumb and index tips within pinch range.
        let is_pinch = !is_fist && self.is_pinch(hand);

        let anchor = to_screen(hand.get(HandLandmark::Wrist));
        let pinch_midpoint = is_pinch.then(|| {
            let thumb = hand.get(HandLandmark::ThumbTip);
            let index = hand.get(HandLandmark::IndexTip);
            to_screen((thumb + index) * 0.5)
        });

        let orientation = self.orientation(hand);
        trace!(fist = is_fist, pinch = is_pinch, "hand classified");

        HandPose {
            anchor,
            pinch_midpoint,
            is_fist,
            is_pinch,
            orientation,
        }
    }

    /// Curl test: the fingertip sits closer to the wrist than its base
    /// knuckle, or within `curl_ratio` of the hand-size reference.
    fn finger_curled(&self, hand: &HandLandmarks, tip: HandLandmark, base: HandLandmark) -> bool {
        let hand_size = hand.distance_2d(HandLandmark::Wrist, HandLandmark::MiddleMcp);
        let tip_dist = hand.distance_2d(HandLandmark::Wrist, tip);
        let base_dist = hand.distance_2d(HandLandmark::Wrist, base);
        tip_dist < base_dist || tip_dist < hand_size * self.config.curl_ratio
    }

    fn is_fist(&self, hand: &HandLandmarks) -> bool {
        let curled = HandLandmark::finger_tip_base_pairs()
            .iter()
            .filter(|(tip, base)| self.finger_curled(hand, *tip, *base))
            .count();
        let thumb_dist = hand.distance_2d(HandLandmark::ThumbTip, HandLandmark::IndexMcp);
        curled >= self.config.fist_min_curled && thumb_dist < self.config.fist_thumb_dist
    }

    fn is_pinch(&self, hand: &HandLandmarks) -> bool {
        hand.distance_2d(HandLandmark::ThumbTip, HandLandmark::IndexTip) < self.config.pinch_dist
    }

    fn orientation(&self, hand: &HandLandmarks) -> HandOrientation {
        let v1 = hand.vector(HandLandmark::Wrist, HandLandmark::IndexMcp);
        let v2 = hand.vector(HandLandmark::Wrist, HandLandmark::PinkyMcp);

        // Palm normal. A collinear (degenerate) palm yields the zero
        // vector and therefore zero pitch/yaw instead of NaN.
        let normal = v1.cross(v2).normalize_or_zero();
        let pitch = (-normal.y).clamp(-1.0, 1.0).asin();
        let yaw = normal.x.atan2(normal.z);

        // Roll from the knuckle line, independent of the normal.
        let index = hand.get(HandLandmark::IndexMcp);
        let pinky = hand.get(HandLandmark::PinkyMcp);
        let roll = (pinky.y - index.y).atan2(pinky.x - index.x);

        HandOrientation { pitch, yaw, roll }
    }
}

/// Map a normalized image-space point (x right, y down, 0..1) to
/// mirrored screen space (-1..1, y up). The mirror matches the
/// user-facing camera preview.
fn to_screen(p: Vec3) -> Vec2 {
    Vec2::new((1.0 - p.x) * 2.0 - 1.0, -p.y * 2.0 + 1.0)
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
pub(crate) fn open_hand() -> HandLandmarks {
    use crate::landmarks::LANDMARK_COUNT;

    // Upright open hand: wrist low in the image, knuckles above it,
    // fingertips well extended.
    let mut points = [Vec3::ZERO; LANDMARK_COUNT];
    points[HandLandmark::Wrist.index()] = Vec3::new(0.5, 0.8, 0.0);
    points[HandLandmark::ThumbTip.index()] = Vec3::new(0.30, 0.62, 0.0);
    points[HandLandmark::IndexMcp.index()] = Vec3::new(0.42, 0.60, -0.02);
    points[HandLandmark::IndexTip.index()] = Vec3::new(0.42, 0.38, 0.0);
    points[HandLandmark::MiddleMcp.index()] = Vec3::new(0.48, 0.60, -0.02);
    points[HandLandmark::MiddleTip.index()] = Vec3::new(0.48, 0.35, 0.0);
    points[HandLandmark::RingMcp.index()] = Vec3::new(0.54, 0.60, -0.02);
    points[HandLandmark::RingTip.index()] = Vec3::new(0.54, 0.37, 0.0);
    points[HandLandmark::PinkyMcp.index()] = Vec3::new(0.60, 0.60, -0.02);
    points[HandLandmark::PinkyTip.index()] = Vec3::new(0.60, 0.42, 0.0);
    HandLandmarks::new(points)
}

#[cfg(test)]
pub(crate) fn fist_hand() -> HandLandmarks {
    use crate::landmarks::LANDMARK_COUNT;

    // All four fingertips pulled back inside their base knuckles and
    // the thumb wrapped over the index base.
    let mut points = [Vec3::ZERO; LANDMARK_COUNT];
    points[HandLandmark::Wrist.index()] = Vec3::new(0.5, 0.8, 0.0);
    points[HandLandmark::ThumbTip.index()] = Vec3::new(0.44, 0.62, 0.0);
    points[HandLandmark::IndexMcp.index()] = Vec3::new(0.42, 0.60, -0.02);
    points[HandLandmark::IndexTip.index()] = Vec3::new(0.45, 0.70, 0.0);
    points[HandLandmark::MiddleMcp.index()] = Vec3::new(0.48, 0.60, -0.02);
    points[HandLandmark::MiddleTip.index()] = Vec3::new(0.48, 0.71, 0.0);
    points[HandLandmark::RingMcp.index()] = Vec3::new(0.54, 0.60, -0.02);
    points[HandLandmark::RingTip.index()] = Vec3::new(0.52, 0.70, 0.0);
    points[HandLandmark::PinkyMcp.index()] = Vec3::new(0.60, 0.60, -0.02);
    points[HandLandmark::PinkyTip.index()] = Vec3::new(0.57, 0.71, 0.0);
    HandLandmarks::new(points)
}

#[cfg(test)]
pub(crate) fn pinch_hand() -> HandLandmarks {
    // Open hand with the thumb and index tips brought together.
    let mut points = open_hand();
    set_point(&mut points, HandLandmark::ThumbTip, 0.43, 0.50, 0.0);
    set_point(&mut points, HandLandmark::IndexTip, 0.45, 0.48, 0.0);
    points
}

#[cfg(test)]
fn set_point(hand: &mut HandLandmarks, landmark: HandLandmark, x: f32, y: f32, z: f32) {
    hand.set(landmark, Vec3::new(x, y, z));
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_open_hand_is_neither_fist_nor_pinch() {
        let classifier = PoseClassifier::default();
        let pose = classifier.classify(&open_hand());
        assert!(!pose.is_fist);
        assert!(!pose.is_pinch);
        assert!(pose.pinch_midpoint.is_none());
    }

    #[test]
    fn test_fist_detection() {
        let classifier = PoseClassifier::default();
        let pose = classifier.classify(&fist_hand());
        assert!(pose.is_fist);
        assert!(!pose.is_pinch, "fist and pinch are mutually exclusive");
    }

    #[test]
    fn test_pinch_detection() {
        let classifier = PoseClassifier::default();
        let pose = classifier.classify(&pinch_hand());
        assert!(pose.is_pinch);
        assert!(!pose.is_fist);
        assert!(pose.pinch_midpoint.is_some());
    }

    #[test]
    fn test_fist_outranks_pinch_on_same_hand() {
        // A fist whose thumb tip also lands within pinch range of the
        // index tip must still classify as fist only.
        let mut hand = fist_hand();
        set_point(&mut hand, HandLandmark::IndexTip, 0.45, 0.64, 0.0);
        let classifier = PoseClassifier::default();
        let pose = classifier.classify(&hand);
        assert!(pose.is_fist);
        assert!(!pose.is_pinch);
    }

    #[test]
    fn test_anchor_mapping_is_mirrored() {
        // Image center maps to screen origin.
        let mut hand = open_hand();
        set_point(&mut hand, HandLandmark::Wrist, 0.5, 0.5, 0.0);
        let pose = PoseClassifier::default().classify(&hand);
        assert_relative_eq!(pose.anchor.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.anchor.y, 0.0, epsilon = 1e-6);

        // Left quarter of the image lands on the right half of the
        // screen (mirror), lower quarter lands below center.
        set_point(&mut hand, HandLandmark::Wrist, 0.25, 0.75, 0.0);
        let pose = PoseClassifier::default().classify(&hand);
        assert_relative_eq!(pose.anchor.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(pose.anchor.y, -0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_pinch_midpoint_between_tips() {
        let classifier = PoseClassifier::default();
        let pose = classifier.classify(&pinch_hand());
        let mid = pose.pinch_midpoint.unwrap();
        // Thumb tip (0.43, 0.50) and index tip (0.45, 0.48) midpoint is
        // (0.44, 0.49) in image space.
        assert_relative_eq!(mid.x, (1.0 - 0.44) * 2.0 - 1.0, epsilon = 1e-6);
        assert_relative_eq!(mid.y, -0.49 * 2.0 + 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_palm_facing_camera_has_zero_orientation() {
        use crate::landmarks::LANDMARK_COUNT;
        use glam::Vec3;

        // Symmetric flat palm in the image plane: the normal points
        // straight at the camera, the knuckle line is horizontal.
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        points[HandLandmark::Wrist.index()] = Vec3::new(0.5, 0.8, 0.0);
        points[HandLandmark::IndexMcp.index()] = Vec3::new(0.4, 0.6, 0.0);
        points[HandLandmark::PinkyMcp.index()] = Vec3::new(0.6, 0.6, 0.0);
        points[HandLandmark::MiddleMcp.index()] = Vec3::new(0.5, 0.6, 0.0);
        let hand = HandLandmarks::new(points);

        let pose = PoseClassifier::default().classify(&hand);
        assert_relative_eq!(pose.orientation.pitch, 0.0, epsilon = 1e-5);
        assert_relative_eq!(pose.orientation.yaw, 0.0, epsilon = 1e-5);
        assert_relative_eq!(pose.orientation.roll, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_roll_follows_knuckle_line() {
        let mut hand = open_hand();
        // Tilt the knuckle line 45° in the image plane.
        set_point(&mut hand, HandLandmark::IndexMcp, 0.40, 0.55, 0.0);
        set_point(&mut hand, HandLandmark::PinkyMcp, 0.55, 0.70, 0.0);
        let pose = PoseClassifier::default().classify(&hand);
        assert_relative_eq!(pose.orientation.roll, std::f32::consts::FRAC_PI_4, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_palm_yields_finite_orientation() {
        use crate::landmarks::LANDMARK_COUNT;
        use glam::Vec3;

        // Wrist and both knuckle anchors collinear: the cross product
        // vanishes and the classifier falls back to zero pitch/yaw.
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        points[HandLandmark::Wrist.index()] = Vec3::new(0.5, 0.8, 0.0);
        points[HandLandmark::IndexMcp.index()] = Vec3::new(0.5, 0.6, 0.0);
        points[HandLandmark::PinkyMcp.index()] = Vec3::new(0.5, 0.4, 0.0);
        let hand = HandLandmarks::new(points);

        let pose = PoseClassifier::default().classify(&hand);
        assert!(pose.orientation.pitch.is_finite());
        assert!(pose.orientation.yaw.is_finite());
    }

    #[test]
    fn test_grip_point_prefers_pinch_midpoint() {
        let classifier = PoseClassifier::default();
        let pinched = classifier.classify(&pinch_hand());
        assert_eq!(pinched.grip_point(), pinched.pinch_midpoint.unwrap());

        let open = classifier.classify(&open_hand());
        assert_eq!(open.grip_point(), open.anchor);
    }
}
