//! Error types for the interaction surface.
//!
//! The engine itself absorbs recoverable conditions as no-ops (missing
//! hands, missing camera frames, degenerate geometry); errors here are
//! the fatal startup/teardown failures a hosting surface reports to
//! the user as a one-line status. Nothing is retried automatically.

use thiserror::Error;

/// Fatal failures of the interaction surface.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Camera device missing or unopenable at startup.
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    /// Hand-landmark detector missing or failed to load at startup.
    #[error("hand detector unavailable: {0}")]
    DetectorUnavailable(String),
}

/// Result type alias for surface operations.
pub type Result<T> = std::result::Result<T, EngineError>;
