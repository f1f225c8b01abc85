//! Drop-to-delete detection — screen-space proximity of the
//! manipulation target to a fixed deletion anchor near the
//! bottom-right viewport corner.
//!
//! The hover flag is recomputed every frame; the delete itself fires
//! exactly once, on the frame where the confirmed mode releases (any
//! non-NONE → NONE transition) while the target hovers the zone. What
//! the delete *does* is the caller's business.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::mode::InteractionMode;

// ── Config ─────────────────────────────────────────────────

/// Drop-zone geometry, in viewport pixels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropZoneConfig {
    /// Anchor inset from the bottom-right corner, both axes.
    pub inset_px: f32,
    /// Hover radius around the anchor.
    pub radius_px: f32,
}

impl Default for DropZoneConfig {
    fn default() -> Self {
        Self {
            inset_px: 60.0,
            radius_px: 80.0,
        }
    }
}

// ── Outcome ────────────────────────────────────────────────

/// Per-frame detector output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropZoneOutcome {
    /// Target is currently inside the zone.
    pub hovering: bool,
    /// A qualifying release happened this frame.
    pub delete_fired: bool,
}

// ── Detector ───────────────────────────────────────────────

/// Tracks target proximity to the deletion anchor and edge-detects
/// gesture releases over it.
#[derive(Debug)]
pub struct DropZoneDetector {
    pub config: DropZoneConfig,
    hovering: bool,
    /// Confirmed mode seen on the previous frame, for the release
    /// edge.
    last_mode: InteractionMode,
}

impl DropZoneDetector {
    pub fn new(config: DropZoneConfig) -> Self {
        Self {
            config,
            hovering: false,
            last_mode: InteractionMode::None,
        }
    }

    /// Feed one frame: the target's projected screen position, the
    /// viewport size, and this frame's confirmed mode.
    pub fn update(
        &mut self,
        target_px: Vec2,
        viewport_px: Vec2,
        confirmed: InteractionMode,
    ) -> DropZoneOutcome {
        let anchor = viewport_px - Vec2::splat(self.config.inset_px);
        let was_hovering = self.hovering;
        self.hovering = target_px.distance(anchor) < self.config.radius_px;
        if self.hovering != was_hovering {
            debug!(hovering = self.hovering, "drop zone hover changed");
        }

        let delete_fired = self.last_mode != InteractionMode::None
            && confirmed == InteractionMode::None
            && self.hovering;
        if delete_fired {
            info!(released_from = self.last_mode.as_str(), "drop-to-delete fired");
        }
        self.last_mode = confirmed;

        DropZoneOutcome {
            hovering: self.hovering,
            delete_fired,
        }
    }

    /// Current hover state without advancing the edge detector.
    pub fn hovering(&self) -> bool {
        self.hovering
    }

    /// Reset to the startup state.
    pub fn reset(&mut self) {
        self.hovering = false;
        self.last_mode = InteractionMode::None;
    }
}

/// Map normalized device coordinates (-1..1, y up) to viewport pixels
/// (origin top-left, y down).
pub fn ndc_to_pixels(ndc: Vec2, viewport_px: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport_px.x,
        (-ndc.y * 0.5 + 0.5) * viewport_px.y,
    )
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(1920.0, 1080.0);

    // Anchor sits at (1860, 1020) for the default config.
    fn in_zone() -> Vec2 {
        Vec2::new(1850.0, 1010.0)
    }

    fn out_of_zone() -> Vec2 {
        Vec2::new(960.0, 540.0)
    }

    #[test]
    fn test_hover_by_proximity() {
        let mut det = DropZoneDetector::new(DropZoneConfig::default());
        let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
        assert!(out.hovering);

        let out = det.update(out_of_zone(), VIEWPORT, InteractionMode::None);
        assert!(!out.hovering);

        // Exactly on the radius boundary is outside (strict less-than).
        let boundary = Vec2::new(1860.0 - 80.0, 1020.0);
        let out = det.update(boundary, VIEWPORT, InteractionMode::None);
        assert!(!out.hovering);
    }

    #[test]
    fn test_delete_fires_once_on_release_over_zone() {
        let mut det = DropZoneDetector::new(DropZoneConfig::default());

        let out = det.update(in_zone(), VIEWPORT, InteractionMode::Move);
        assert!(out.hovering);
        assert!(!out.delete_fired);

        // Release over the zone: fires exactly once.
        let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
        assert!(out.delete_fired);

        // Subsequent NONE-and-hovering frames must not refire.
        let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
        assert!(out.hovering);
        assert!(!out.delete_fired);
    }

    #[test]
    fn test_no_fire_without_prior_active_mode() {
        let mut det = DropZoneDetector::new(DropZoneConfig::default());
        for _ in 0..3 {
            let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
            assert!(!out.delete_fired);
        }
    }

    #[test]
    fn test_leaving_zone_before_release_suppresses_delete() {
        let mut det = DropZoneDetector::new(DropZoneConfig::default());
        det.update(in_zone(), VIEWPORT, InteractionMode::Move);

        // Target dragged away, then released: no delete.
        let out = det.update(out_of_zone(), VIEWPORT, InteractionMode::None);
        assert!(!out.hovering);
        assert!(!out.delete_fired);
    }

    #[test]
    fn test_release_from_any_active_mode_fires() {
        for mode in [
            InteractionMode::Move,
            InteractionMode::Edit,
            InteractionMode::DualScale,
        ] {
            let mut det = DropZoneDetector::new(DropZoneConfig::default());
            det.update(in_zone(), VIEWPORT, mode);
            let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
            assert!(out.delete_fired, "release from {:?} must fire", mode);
        }
    }

    #[test]
    fn test_ndc_to_pixels() {
        let center = ndc_to_pixels(Vec2::ZERO, VIEWPORT);
        assert_eq!(center, Vec2::new(960.0, 540.0));

        // NDC (1, 1) is the top-right corner in pixel space.
        let corner = ndc_to_pixels(Vec2::new(1.0, 1.0), VIEWPORT);
        assert_eq!(corner, Vec2::new(1920.0, 0.0));

        let bottom_left = ndc_to_pixels(Vec2::new(-1.0, -1.0), VIEWPORT);
        assert_eq!(bottom_left, Vec2::new(0.0, 1080.0));
    }

    #[test]
    fn test_reset_clears_edge_state() {
        let mut det = DropZoneDetector::new(DropZoneConfig::default());
        det.update(in_zone(), VIEWPORT, InteractionMode::Move);
        det.reset();

        // The pre-reset Move frame must not arm a delete.
        let out = det.update(in_zone(), VIEWPORT, InteractionMode::None);
        assert!(!out.delete_fired);
    }
}
