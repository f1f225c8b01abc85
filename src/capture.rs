//! Snapshot capture — freezes the current camera view into a textured,
//! depth-displaced planar target that temporarily replaces the live
//! object as the manipulation target.
//!
//! Depth is approximated from brightness (bright pixels displace
//! toward the viewer) with a contrast floor that flattens dark areas.
//! This is an explicit heuristic, not depth sensing. All products are
//! plain buffers for the external renderer to upload; dropping a
//! snapshot releases them.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::transform::ObjectTransform;

// ── Camera frame ───────────────────────────────────────────

/// One camera image, sampled on demand at capture time.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Tightly packed RGBA8 pixels, row-major from the top-left.
    pub pixels: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl CameraFrame {
    fn is_well_formed(&self) -> bool {
        self.width > 0 && self.height > 0 && self.pixels.len() == self.width * self.height * 4
    }
}

/// Provider of the current camera image. Queried only inside
/// `capture()`; returning None makes the capture a no-op.
pub trait CaptureSource {
    fn snapshot(&mut self) -> Option<CameraFrame>;
}

// ── Config ─────────────────────────────────────────────────

/// Snapshot pipeline parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Output texture/displacement resolution (square).
    pub resolution: usize,
    /// Plane side length in world units.
    pub plane_size: f32,
    /// Plane subdivisions per axis (displacement needs vertices).
    pub plane_segments: u32,
    /// Displacement strength in world units.
    pub displacement_scale: f32,
    /// Brightness values below this are flattened to zero depth.
    pub contrast_floor: u8,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: 512,
            plane_size: 1.5,
            plane_segments: 128,
            displacement_scale: 0.3,
            contrast_floor: 50,
        }
    }
}

// ── Snapshot data ──────────────────────────────────────────

/// Geometry parameters of the snapshot plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSpec {
    pub size: f32,
    pub segments: u32,
    pub displacement_scale: f32,
}

/// A captured snapshot: texture, brightness-derived displacement map,
/// plane geometry, and its own transform (it becomes the manipulation
/// target while active).
#[derive(Debug, Clone)]
pub struct CapturedSnapshot {
    /// RGBA8, `resolution`² pixels, mirrored to match the HUD preview.
    pub texture: Vec<u8>,
    /// Grayscale displacement, `resolution`² bytes.
    pub displacement: Vec<u8>,
    pub resolution: usize,
    pub plane: PlaneSpec,
    pub transform: ObjectTransform,
}

// ── Manager ────────────────────────────────────────────────

/// Owns the captured snapshot and the capture/release lifecycle.
/// Both operations are synchronous and idempotent-friendly: capturing
/// over an existing snapshot replaces it, releasing without one is a
/// no-op.
#[derive(Debug, Default)]
pub struct CaptureManager {
    pub config: CaptureConfig,
    snapshot: Option<CapturedSnapshot>,
}

impl CaptureManager {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            snapshot: None,
        }
    }

    /// Freeze the source's current frame into a new snapshot target.
    /// Returns false (and changes nothing) when no frame is available
    /// or the frame is malformed.
    pub fn capture(&mut self, source: &mut dyn CaptureSource) -> bool {
        let Some(frame) = source.snapshot() else {
            debug!("capture requested with no camera frame available");
            return false;
        };
        if !frame.is_well_formed() {
            debug!(
                width = frame.width,
                height = frame.height,
                bytes = frame.pixels.len(),
                "malformed camera frame ignored"
            );
            return false;
        }

        if self.snapshot.is_some() {
            debug!("replacing previous snapshot");
        }
        self.snapshot = Some(build_snapshot(&frame, &self.config));
        info!(
            resolution = self.config.resolution,
            "camera view captured as displaced plane"
        );
        true
    }

    /// Discard the snapshot, restoring the live object as the
    /// manipulation target. No-op when nothing is captured.
    pub fn release(&mut self) -> bool {
        if self.snapshot.take().is_some() {
            info!("snapshot released");
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&CapturedSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn snapshot_mut(&mut self) -> Option<&mut CapturedSnapshot> {
        self.snapshot.as_mut()
    }
}

/// Build the snapshot buffers: center-square crop, horizontal mirror,
/// nearest-neighbour resample, brightness→depth displacement.
fn build_snapshot(frame: &CameraFrame, config: &CaptureConfig) -> CapturedSnapshot {
    let res = config.resolution;
    let square = frame.width.min(frame.height);
    let crop_x = (frame.width - square) / 2;
    let crop_y = (frame.height - square) / 2;

    let mut texture = Vec::with_capacity(res * res * 4);
    let mut displacement = Vec::with_capacity(res * res);

    for y in 0..res {
        let src_y = crop_y + y * square / res;
        for x in 0..res {
            // Mirror horizontally so the snapshot matches what the
            // user saw in the mirrored preview.
            let src_x = crop_x + (res - 1 - x) * square / res;
            let i = (src_y * frame.width + src_x) * 4;
            let (r, g, b, a) = (
                frame.pixels[i],
                frame.pixels[i + 1],
                frame.pixels[i + 2],
                frame.pixels[i + 3],
            );
            texture.extend_from_slice(&[r, g, b, a]);

            let brightness = ((r as u16 + g as u16 + b as u16) / 3) as u8;
            displacement.push(if brightness < config.contrast_floor {
                0
            } else {
                brightness
            });
        }
    }

    CapturedSnapshot {
        texture,
        displacement,
        resolution: res,
        plane: PlaneSpec {
            size: config.plane_size,
            segments: config.plane_segments,
            displacement_scale: config.displacement_scale,
        },
        transform: ObjectTransform::default(),
    }
}

// ── Tests ──────────────────────────────────────────────────
