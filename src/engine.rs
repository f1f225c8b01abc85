//! The interaction engine — one authoritative state struct and a
//! per-frame `tick()`.
//!
//! Per frame: classify the latest detection result, resolve the raw
//! mode, debounce it, test the drop zone, then drive the transform
//! engine against whichever object is the manipulation target (live
//! generated object or captured snapshot). Detection results arrive
//! asynchronously and latest-wins; the engine never blocks on the
//! detector.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::capture::{CaptureConfig, CaptureManager, CaptureSource};
use crate::debounce::{DebounceConfig, GestureDebouncer, GestureFeedback};
use crate::drop_zone::{ndc_to_pixels, DropZoneConfig, DropZoneDetector};
use crate::landmarks::HandLandmarks;
use crate::mode::{self, InteractionMode, RawMode};
use crate::pose::{HandPose, PoseClassifier, PoseConfig};
use crate::transform::{IndicatorState, ObjectTransform, TransformConfig, TransformEngine};

// ── External collaborators ─────────────────────────────────

/// View of the external renderer's camera, for projecting the target
/// into screen space.
pub trait CameraPort {
    /// Project a world position into normalized device coordinates
    /// (-1..1, y up).
    fn project(&self, world: Vec3) -> Vec2;
    /// Viewport size in pixels.
    fn viewport_px(&self) -> Vec2;
}

// ── Target identity ────────────────────────────────────────

/// Which object gestures currently manipulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManipulationTarget {
    /// The live generated object.
    Live,
    /// The captured snapshot plane.
    Captured,
}

impl ManipulationTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::Captured => "captured",
        }
    }
}

// ── Config ─────────────────────────────────────────────────

/// Aggregated engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub pose: PoseConfig,
    pub debounce: DebounceConfig,
    pub transform: TransformConfig,
    pub drop_zone: DropZoneConfig,
    pub capture: CaptureConfig,
}

// ── Events ─────────────────────────────────────────────────

/// Events emitted toward the UI layer, drained once per tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The confirmed mode changed.
    ModeChanged {
        from: InteractionMode,
        to: InteractionMode,
    },
    /// A gesture was released over the drop zone.
    DeleteFired { target: ManipulationTarget },
    /// A snapshot replaced the live object as the target.
    CaptureCreated,
    /// The snapshot was discarded; the live object is back.
    CaptureReleased,
    /// The live object's shape id changed (mesh swap is the shape
    /// library's job).
    ShapeChanged { id: String },
    /// Drop-to-delete fired with no capture active; the caller decides
    /// whether to tear the surface down.
    CloseRequested,
}

impl EngineEvent {
    /// Convert the event to an IPC s-expression.
    pub fn to_sexp(&self) -> String {
        match self {
            Self::ModeChanged { from, to } => format!(
                "(:type :event :event :mode-changed :from :{} :to :{})",
                from.as_str(),
                to.as_str(),
            ),
            Self::DeleteFired { target } => format!(
                "(:type :event :event :delete-fired :target :{})",
                target.as_str(),
            ),
            Self::CaptureCreated => "(:type :event :event :capture-created)".to_string(),
            Self::CaptureReleased => "(:type :event :event :capture-released)".to_string(),
            Self::ShapeChanged { id } => {
                format!("(:type :event :event :shape-changed :shape \"{}\")", id)
            }
            Self::CloseRequested => "(:type :event :event :close-requested)".to_string(),
        }
    }
}

// ── Frame output ───────────────────────────────────────────

/// Everything the UI layer needs from one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub mode: InteractionMode,
    pub feedback: Option<GestureFeedback>,
    pub indicator: IndicatorState,
    pub drop_hovering: bool,
    pub capture_active: bool,
    pub events: Vec<EngineEvent>,
}

impl FrameOutput {
    /// Output of a tick on a closed surface.
    fn inert() -> Self {
        Self {
            mode: InteractionMode::None,
            feedback: None,
            indicator: IndicatorState::Idle,
            drop_hovering: false,
            capture_active: false,
            events: Vec::new(),
        }
    }
}

// ── Engine ─────────────────────────────────────────────────

/// Central engine state. All mutation happens on the frame thread
/// through `&mut self`; there is no interior mutability and no hidden
/// reactivity.
pub struct HoloEngine {
    classifier: PoseClassifier,
    debouncer: GestureDebouncer,
    transform: TransformEngine,
    drop_zone: DropZoneDetector,
    capture: CaptureManager,

    /// Transform of the live generated object.
    pub live: ObjectTransform,
    shape_id: String,
    gestures_enabled: bool,
    closed: bool,

    /// Most recent completed detection, already classified.
    latest_poses: Vec<HandPose>,
    /// Guard against issuing two concurrent inference requests.
    inference_in_flight: bool,

    /// Confirmed mode as of the previous tick.
    confirmed_mode: InteractionMode,
    last_feedback: Option<GestureFeedback>,
    /// Command-side events waiting for the next tick's drain.
    pending_events: Vec<EngineEvent>,
}

impl HoloEngine {
    pub fn new(config: EngineConfig) -> Self {
        info!("interaction engine initialized");
        Self {
            classifier: PoseClassifier::new(config.pose),
            debouncer: GestureDebouncer::new(config.debounce),
            transform: TransformEngine::new(config.transform),
            drop_zone: DropZoneDetector::new(config.drop_zone),
            capture: CaptureManager::new(config.capture),
            live: ObjectTransform::default(),
            shape_id: "reactor".to_string(),
            gestures_enabled: true,
            closed: false,
            latest_poses: Vec::new(),
            inference_in_flight: false,
            confirmed_mode: InteractionMode::None,
            last_feedback: None,
            pending_events: Vec::new(),
        }
    }

    // ── Detection intake ──────────────────────────────────

    /// Claim the single inference slot before dispatching a camera
    /// frame to the detector. Returns false while a request is still
    /// in flight (the caller drops this frame's update — no queueing).
    pub fn begin_inference(&mut self) -> bool {
        if self.closed || self.inference_in_flight {
            return false;
        }
        self.inference_in_flight = true;
        true
    }

    /// Deliver a completed detection result (0–2 hands). Classifies
    /// immediately and replaces the previous result; called from the
    /// detector's completion path on the frame thread.
    pub fn submit_detection(&mut self, hands: &[HandLandmarks]) {
        self.inference_in_flight = false;
        if self.closed {
            return;
        }
        self.latest_poses = hands
            .iter()
            .take(2)
            .map(|h| self.classifier.classify(h))
            .collect();
    }

    /// The most recent classified poses, for HUD overlays.
    pub fn latest_poses(&self) -> &[HandPose] {
        &self.latest_poses
    }

    // ── Per-frame tick ────────────────────────────────────

    /// Advance one frame. `now_ms` is the caller's monotonic clock.
    pub fn tick(&mut self, now_ms: f64, camera: &impl CameraPort) -> FrameOutput {
        if self.closed {
            return FrameOutput::inert();
        }

        let mut events = std::mem::take(&mut self.pending_events);

        // 1. Raw mode for this frame's poses.
        let raw = if self.gestures_enabled {
            mode::resolve(&self.latest_poses)
        } else {
            RawMode::NONE
        };
        let anchor = raw
            .active_hand
            .and_then(|i| self.latest_poses.get(i))
            .map(|p| p.anchor);

        // 2. Debounce into the confirmed mode.
        let outcome = self.debouncer.update(raw, anchor, now_ms);
        let confirmed = outcome.mode;

        // 3. Drop-zone proximity of the current target, before any
        //    transform is applied this frame.
        let viewport = camera.viewport_px();
        let target_world = self.target_transform().position;
        let target_px = ndc_to_pixels(camera.project(target_world), viewport);
        let zone = self.drop_zone.update(target_px, viewport, confirmed);

        // 4. Mode transition bookkeeping and the delete trigger.
        if confirmed != self.confirmed_mode {
            debug!(
                from = self.confirmed_mode.as_str(),
                to = confirmed.as_str(),
                "confirmed mode changed"
            );
            events.push(EngineEvent::ModeChanged {
                from: self.confirmed_mode,
                to: confirmed,
            });
        }
        if zone.delete_fired {
            if self.capture.is_active() {
                self.capture.release();
                self.live.visible = true;
                events.push(EngineEvent::DeleteFired {
                    target: ManipulationTarget::Captured,
                });
                events.push(EngineEvent::CaptureReleased);
            } else {
                events.push(EngineEvent::DeleteFired {
                    target: ManipulationTarget::Live,
                });
                events.push(EngineEvent::CloseRequested);
            }
        }
        self.confirmed_mode = confirmed;

        // 5. Execute the confirmed mode on the target.
        let poses = std::mem::take(&mut self.latest_poses);
        let target = if let Some(snapshot) = self.capture.snapshot_mut() {
            &mut snapshot.transform
        } else {
            &mut self.live
        };
        let indicator = self
            .transform
            .apply(confirmed, &poses, raw.active_hand, target, zone.hovering);
        self.latest_poses = poses;

        // Ambient spin for the live object while no gesture holds it.
        if confirmed == InteractionMode::None && !self.capture.is_active() {
            self.transform.idle_spin(&mut self.live);
        }

        self.last_feedback = outcome.feedback;
        FrameOutput {
            mode: confirmed,
            feedback: outcome.feedback,
            indicator,
            drop_hovering: zone.hovering,
            capture_active: self.capture.is_active(),
            events,
        }
    }

    // ── Commands ──────────────────────────────────────────

    /// Swap which generated mesh is live. Mesh construction is the
    /// shape library's job; the live transform carries over.
    pub fn set_shape(&mut self, id: impl Into<String>) {
        if self.closed {
            return;
        }
        let id = id.into();
        if id != self.shape_id {
            info!(shape = %id, "live shape changed");
            self.shape_id = id.clone();
            self.pending_events.push(EngineEvent::ShapeChanged { id });
        }
    }

    /// When disabled, the raw mode reads NONE regardless of poses.
    pub fn set_gestures_enabled(&mut self, enabled: bool) {
        if self.gestures_enabled != enabled {
            info!(enabled, "gesture tracking toggled");
            self.gestures_enabled = enabled;
        }
    }

    /// Freeze the capture source's current frame into a snapshot and
    /// make it the manipulation target. No-op (returns false) when no
    /// frame is available or the surface is closed.
    pub fn capture(&mut self, source: &mut dyn CaptureSource) -> bool {
        if self.closed {
            return false;
        }
        if self.capture.capture(source) {
            self.live.visible = false;
            self.pending_events.push(EngineEvent::CaptureCreated);
            true
        } else {
            false
        }
    }

    /// Discard the snapshot and restore the live object as the
    /// target. No-op (returns false) when nothing is captured.
    pub fn release(&mut self) -> bool {
        if self.capture.release() {
            self.live.visible = true;
            self.pending_events.push(EngineEvent::CaptureReleased);
            true
        } else {
            false
        }
    }

    /// Tear the surface down: drop the snapshot, forget detection
    /// state, and make every further tick inert. Gesture state is
    /// deliberately not persisted across a teardown.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        info!("interaction surface closing");
        self.closed = true;
        self.capture.release();
        self.inference_in_flight = false;
        self.latest_poses.clear();
        self.debouncer.reset();
        self.drop_zone.reset();
        self.pending_events.clear();
    }

    // ── Observational state ───────────────────────────────

    pub fn mode(&self) -> InteractionMode {
        self.confirmed_mode
    }

    pub fn shape_id(&self) -> &str {
        &self.shape_id
    }

    pub fn capture_active(&self) -> bool {
        self.capture.is_active()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The current manipulation target's transform.
    pub fn target_transform(&self) -> &ObjectTransform {
        match self.capture.snapshot() {
            Some(snapshot) => &snapshot.transform,
            None => &self.live,
        }
    }

    /// Generate an IPC status s-expression.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:mode :{} :feedback {} :drop-hover {} :capture {} :gestures {} :shape \"{}\")",
            self.confirmed_mode.as_str(),
            self.last_feedback
                .map(|f| format!("\"{}\"", f.as_str()))
                .unwrap_or_else(|| "nil".to_string()),
            if self.drop_zone.hovering() { "t" } else { "nil" },
            if self.capture.is_active() { "t" } else { "nil" },
            if self.gestures_enabled { "t" } else { "nil" },
            self.shape_id,
        )
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
struct TestCamera {
    viewport: Vec2,
}

#[cfg(test)]
impl CameraPort for TestCamera {
    // Orthographic stand-in: world x/y pass through as NDC.
    fn project(&self, world: Vec3) -> Vec2 {
        world.truncate()
    }

    fn viewport_px(&self) -> Vec2 {
        self.viewport
    }
}

#[cfg(test)]
impl TestCamera {
    fn hd() -> Self {
        Self {
            viewport: Vec2::new(1920.0, 1080.0),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────


#[cfg(test)]
impl HoloEngine {
    /// Place the captured snapshot at a world position (tests only).
    fn capture_target_for_test(&mut self, position: Vec3) {
        if let Some(snapshot) = self.capture.snapshot_mut() {
            snapshot.transform.position = position;
        }
    }
}
