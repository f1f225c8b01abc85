//! Gesture-to-manipulation engine.
//!
//! Converts noisy per-frame hand-pose estimates into stable, continuous
//! transformations (move, rotate, scale, delete) of a displayed 3-D
//! object: raw keypoints are classified into compact poses, poses
//! resolve to a raw interaction mode, hysteresis and an idle timeout
//! debounce that into a confirmed mode, and the transform engine turns
//! hand deltas into eased 6-DOF updates on the manipulation target.
//! A drop zone deletes on release, and a capture manager can swap the
//! target for a depth-displaced snapshot of the camera view.
//!
//! The landmark detector, scene graph/renderer, and shape library are
//! external collaborators reached through narrow interfaces
//! ([`engine::CameraPort`], [`capture::CaptureSource`], plain transform
//! data). Everything here is single-threaded and tick-driven.

pub mod capture;
pub mod debounce;
pub mod drop_zone;
pub mod engine;
pub mod error;
pub mod landmarks;
pub mod mode;
pub mod pose;
pub mod transform;

pub use capture::{
    CameraFrame, CaptureConfig, CaptureManager, CaptureSource, CapturedSnapshot, PlaneSpec,
};
pub use debounce::{DebounceConfig, GestureDebouncer, GestureFeedback};
pub use drop_zone::{DropZoneConfig, DropZoneDetector};
pub use engine::{
    CameraPort, EngineConfig, EngineEvent, FrameOutput, HoloEngine, ManipulationTarget,
};
pub use error::{EngineError, Result};
pub use landmarks::{HandLandmark, HandLandmarks, LANDMARK_COUNT};
pub use mode::{InteractionMode, RawMode};
pub use pose::{HandOrientation, HandPose, PoseClassifier, PoseConfig};
pub use transform::{IndicatorState, ObjectTransform, TransformConfig, TransformEngine};

/// Re-export commonly used math types from glam.
pub use glam::{Quat, Vec2, Vec3};
