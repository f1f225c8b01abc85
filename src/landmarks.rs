//! Hand landmark data structures — the raw per-hand keypoint set
//! delivered by the external landmark detector.
//!
//! Models the 21-point hand topology (wrist + four joints per finger)
//! used by camera-based hand trackers. Coordinates are normalized image
//! space: x right and y down in 0..1, z an approximate depth relative
//! to the wrist.

use glam::Vec3;

// ── Landmark definitions ───────────────────────────────────

/// The 21 hand landmarks, in detector output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandLandmark {
    Wrist,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

/// Total number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

impl HandLandmark {
    /// Convert landmark enum to array index (0-20).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }

    /// The (tip, base-knuckle) landmark pairs of the four non-thumb
    /// fingers, used by the curl test.
    pub fn finger_tip_base_pairs() -> [(HandLandmark, HandLandmark); 4] {
        [
            (Self::IndexTip, Self::IndexMcp),
            (Self::MiddleTip, Self::MiddleMcp),
            (Self::RingTip, Self::RingMcp),
            (Self::PinkyTip, Self::PinkyMcp),
        ]
    }
}

// ── Keypoint set ───────────────────────────────────────────

/// One hand's complete ordered keypoint set for a single frame.
///
/// Rebuilt from scratch on every detector callback and discarded when a
/// newer result lands. The fixed-size array makes a short or reordered
/// keypoint list unrepresentable; filtering malformed detector output
/// is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandLandmarks {
    points: [Vec3; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec3; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Position of a single landmark.
    pub fn get(&self, landmark: HandLandmark) -> Vec3 {
        self.points[landmark.index()]
    }

    /// Image-plane (x/y only) distance between two landmarks.
    ///
    /// Classification thresholds were tuned against 2-D distances in
    /// normalized image space; z is deliberately ignored here.
    pub fn distance_2d(&self, a: HandLandmark, b: HandLandmark) -> f32 {
        let pa = self.get(a);
        let pb = self.get(b);
        (pb.truncate() - pa.truncate()).length()
    }

    /// Full 3-D vector from landmark `a` to landmark `b`.
    pub fn vector(&self, a: HandLandmark, b: HandLandmark) -> Vec3 {
        self.get(b) - self.get(a)
    }

    /// Overwrite a single landmark, for synthesising poses in tests.
    #[cfg(test)]
    pub(crate) fn set(&mut self, landmark: HandLandmark, point: Vec3) {
        self.points[landmark.index()] = point;
    }

    /// Rigid translation of the whole keypoint set, for synthesising
    /// hand motion in tests.
    #[cfg(test)]
    pub(crate) fn translated(&self, delta: Vec3) -> Self {
        let mut points = self.points;
        for p in &mut points {
            *p += delta;
        }
        Self { points }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_hand() -> HandLandmarks {
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        for (i, p) in points.iter_mut().enumerate() {
            *p = Vec3::new(i as f32 * 0.01, 0.5, 0.0);
        }
        HandLandmarks::new(points)
    }

    #[test]
    fn test_landmark_indices() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexMcp.index(), 5);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleMcp.index(), 9);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);
        assert_eq!(LANDMARK_COUNT, 21);
    }

    #[test]
    fn test_landmark_as_str() {
        assert_eq!(HandLandmark::Wrist.as_str(), "wrist");
        assert_eq!(HandLandmark::ThumbTip.as_str(), "thumb-tip");
        assert_eq!(HandLandmark::IndexTip.as_str(), "index-tip");
        assert_eq!(HandLandmark::PinkyTip.as_str(), "pinky-tip");
    }

    #[test]
    fn test_distance_2d_ignores_z() {
        let mut points = [Vec3::ZERO; LANDMARK_COUNT];
        points[HandLandmark::ThumbTip.index()] = Vec3::new(0.3, 0.4, 9.0);
        let hand = HandLandmarks::new(points);
        let dist = hand.distance_2d(HandLandmark::Wrist, HandLandmark::ThumbTip);
        assert!((dist - 0.5).abs() < 1e-6, "expected 0.5, got {}", dist);
    }

    #[test]
    fn test_vector() {
        let hand = flat_hand();
        let v = hand.vector(HandLandmark::Wrist, HandLandmark::IndexMcp);
        assert!((v.x - 0.05).abs() < 1e-6);
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_finger_pairs_cover_non_thumb_fingers() {
        let pairs = HandLandmark::finger_tip_base_pairs();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (HandLandmark::IndexTip, HandLandmark::IndexMcp));
        assert_eq!(pairs[3], (HandLandmark::PinkyTip, HandLandmark::PinkyMcp));
    }
}
