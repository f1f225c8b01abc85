//! holodeck-sim — drive the gesture engine with scripted synthetic
//! hand-landmark frames, no camera or detector hardware required.
//!
//! Prints engine events and status transitions as s-expressions, one
//! per line, so a scenario run doubles as a smoke test of the whole
//! classify → resolve → debounce → transform pipeline.

use clap::{Parser, ValueEnum};
use glam::{Vec2, Vec3};
use tracing::{info, warn};

use holodeck_engine::{
    CameraFrame, CameraPort, CaptureSource, EngineConfig, EngineError, HandLandmark,
    HandLandmarks, HoloEngine, LANDMARK_COUNT,
};

#[derive(Parser, Debug)]
#[command(name = "holodeck-sim", about = "Scripted gesture scenarios for the holodeck engine")]
struct Cli {
    /// Scenario to run
    #[arg(long, value_enum, default_value = "full")]
    scenario: Scenario,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Capture a synthetic camera snapshot before the gestures start
    #[arg(long)]
    capture: bool,

    /// Pretend the camera device is missing (startup failure path)
    #[arg(long)]
    no_camera: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Fist drag: confirm MOVE, glide, release
    Drag,
    /// Single pinch stretch: confirm EDIT, glide
    Stretch,
    /// Two-hand pinch spread: confirm DUAL_SCALE
    Zoom,
    /// Motionless fist: demonstrate the idle lock
    Idle,
    /// All of the above, in sequence
    Full,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "holodeck_engine=info,holodeck_sim=info".into()),
        )
        .init();

    info!(scenario = ?cli.scenario, fps = cli.fps, "holodeck-sim starting");

    let mut engine = HoloEngine::new(EngineConfig::default());
    let camera = SimCamera {
        viewport: Vec2::new(1920.0, 1080.0),
    };

    if cli.capture {
        let mut source = match SimCaptureSource::open(cli.no_camera) {
            Ok(source) => source,
            Err(e) => {
                // Fatal to the surface: surface the one-line status and
                // stop. Restarting is the host's job.
                println!("(:type :status :error \"{}\")", e);
                return Err(e.into());
            }
        };
        if engine.capture(&mut source) {
            info!("snapshot captured; gestures now target the snapshot");
        }
    }

    let frames = script(cli.scenario);
    let frame_ms = 1000.0 / cli.fps;
    let mut now = 0.0;
    let mut last_feedback = None;

    for hands in &frames {
        // Single in-flight inference slot; the synthetic detector
        // completes within the frame.
        if engine.begin_inference() {
            engine.submit_detection(hands);
        }

        let out = engine.tick(now, &camera);
        for event in &out.events {
            println!("[{:7.0}ms] {}", now, event.to_sexp());
        }
        if out.feedback != last_feedback {
            println!("[{:7.0}ms] {}", now, engine.status_sexp());
            last_feedback = out.feedback;
        }
        now += frame_ms;
    }

    let target = engine.target_transform();
    println!("final: {}", engine.status_sexp());
    println!(
        "final target: pos ({:.3} {:.3} {:.3}) scale ({:.3} {:.3} {:.3})",
        target.position.x,
        target.position.y,
        target.position.z,
        target.scale.x,
        target.scale.y,
        target.scale.z,
    );
    if engine.capture_active() {
        warn!("scenario ended with a live capture still active");
    }

    Ok(())
}

// ── Scenario scripts ───────────────────────────────────────

type Frame = Vec<HandLandmarks>;

fn script(scenario: Scenario) -> Vec<Frame> {
    match scenario {
        Scenario::Drag => drag_script(),
        Scenario::Stretch => stretch_script(),
        Scenario::Zoom => zoom_script(),
        Scenario::Idle => idle_script(),
        Scenario::Full => {
            let mut all = drag_script();
            all.extend(stretch_script());
            all.extend(zoom_script());
            all.extend(idle_script());
            all
        }
    }
}

fn drag_script() -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    frames.extend(std::iter::repeat_with(Vec::new).take(20));
    // Hold a fist long enough to confirm MOVE, then glide it across
    // a third of the image.
    for _ in 0..40 {
        frames.push(vec![hand(Vec2::new(0.5, 0.8), HandShape::Fist)]);
    }
    for i in 0..60 {
        let x = 0.5 - 0.003 * i as f32;
        frames.push(vec![hand(Vec2::new(x, 0.8), HandShape::Fist)]);
    }
    frames.extend(std::iter::repeat_with(Vec::new).take(20));
    frames
}

fn stretch_script() -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for _ in 0..40 {
        frames.push(vec![hand(Vec2::new(0.5, 0.7), HandShape::Pinch)]);
    }
    for i in 0..60 {
        let d = 0.002 * i as f32;
        frames.push(vec![hand(Vec2::new(0.5 - d, 0.7 - d), HandShape::Pinch)]);
    }
    frames.extend(std::iter::repeat_with(Vec::new).take(20));
    frames
}

fn zoom_script() -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for _ in 0..40 {
        frames.push(vec![
            hand(Vec2::new(0.38, 0.7), HandShape::Pinch),
            hand(Vec2::new(0.62, 0.7), HandShape::Pinch),
        ]);
    }
    for i in 0..60 {
        let spread = 0.002 * i as f32;
        frames.push(vec![
            hand(Vec2::new(0.38 - spread, 0.7), HandShape::Pinch),
            hand(Vec2::new(0.62 + spread, 0.7), HandShape::Pinch),
        ]);
    }
    frames.extend(std::iter::repeat_with(Vec::new).take(20));
    frames
}

fn idle_script() -> Vec<Frame> {
    // A motionless fist: confirms MOVE, then trips the 2 s idle lock.
    std::iter::repeat_with(|| vec![hand(Vec2::new(0.5, 0.8), HandShape::Fist)])
        .take(180)
        .collect()
}

// ── Synthetic hands ────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum HandShape {
    Fist,
    Pinch,
}

/// Build a synthetic keypoint set around a wrist position in
/// normalized image coordinates.
fn hand(wrist: Vec2, shape: HandShape) -> HandLandmarks {
    let mut points = [Vec3::ZERO; LANDMARK_COUNT];
    let mut set = |landmark: HandLandmark, dx: f32, dy: f32, z: f32| {
        points[landmark.index()] = Vec3::new(wrist.x + dx, wrist.y + dy, z);
    };

    set(HandLandmark::Wrist, 0.0, 0.0, 0.0);
    set(HandLandmark::IndexMcp, -0.08, -0.20, -0.02);
    set(HandLandmark::MiddleMcp, -0.02, -0.20, -0.02);
    set(HandLandmark::RingMcp, 0.04, -0.20, -0.02);
    set(HandLandmark::PinkyMcp, 0.10, -0.20, -0.02);

    match shape {
        HandShape::Fist => {
            // Fingertips pulled back toward the wrist, thumb over the
            // index base.
            set(HandLandmark::ThumbTip, -0.06, -0.18, 0.0);
            set(HandLandmark::IndexTip, -0.05, -0.10, 0.0);
            set(HandLandmark::MiddleTip, -0.02, -0.09, 0.0);
            set(HandLandmark::RingTip, 0.02, -0.10, 0.0);
            set(HandLandmark::PinkyTip, 0.07, -0.09, 0.0);
        }
        HandShape::Pinch => {
            // Thumb and index tips touching, other fingers extended.
            set(HandLandmark::ThumbTip, -0.07, -0.30, 0.0);
            set(HandLandmark::IndexTip, -0.05, -0.32, 0.0);
            set(HandLandmark::MiddleTip, -0.02, -0.45, 0.0);
            set(HandLandmark::RingTip, 0.04, -0.43, 0.0);
            set(HandLandmark::PinkyTip, 0.10, -0.38, 0.0);
        }
    }

    HandLandmarks::new(points)
}

// ── Sim collaborators ──────────────────────────────────────

/// Fixed pinhole camera five units back from the origin.
struct SimCamera {
    viewport: Vec2,
}

impl CameraPort for SimCamera {
    fn project(&self, world: Vec3) -> Vec2 {
        let depth = (5.0 - world.z).max(0.1);
        let focal = 1.0 / (75f32.to_radians() * 0.5).tan();
        let aspect = self.viewport.x / self.viewport.y;
        Vec2::new(world.x * focal / (aspect * depth), world.y * focal / depth)
    }

    fn viewport_px(&self) -> Vec2 {
        self.viewport
    }
}

/// Synthetic camera producing a diagonal gradient frame.
struct SimCaptureSource;

impl SimCaptureSource {
    fn open(disabled: bool) -> holodeck_engine::Result<Self> {
        if disabled {
            return Err(EngineError::CameraUnavailable(
                "disabled by --no-camera".to_string(),
            ));
        }
        Ok(Self)
    }
}

impl CaptureSource for SimCaptureSource {
    fn snapshot(&mut self) -> Option<CameraFrame> {
        let size = 64;
        let mut pixels = Vec::with_capacity(size * size * 4);
        for y in 0..size {
            for x in 0..size {
                let v = ((x + y) * 255 / (2 * size - 2)) as u8;
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        Some(CameraFrame {
            pixels,
            width: size,
            height: size,
        })
    }
}
