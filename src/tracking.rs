//! The tracking worker: drives a camera frame source through the landmark
//! detector once per advanced frame, classifies the result, and publishes
//! `TrackingEvent`s over a single channel. The frame loop applies them to the
//! store; nothing here touches shared state directly.

use crate::gesture::{
    Classification, GestureClassifier, HandLandmarks, Landmark, FINGERTIPS, LANDMARKS_PER_HAND,
    WRIST,
};
use crate::store::TrackingEvent;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    PermissionDenied,
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "camera access denied"),
        }
    }
}

impl std::error::Error for CameraError {}

/// One camera frame. The payload stays opaque to this module; detectors know
/// how to read the frames their paired source produces.
#[derive(Debug, Clone, Copy)]
pub struct CameraFrame {
    pub timestamp_ms: u64,
}

/// "Open camera" capability; the only failure surfaced is permission denial.
pub trait CameraAccess: Send {
    fn open(self: Box<Self>) -> Result<Box<dyn FrameSource>, CameraError>;
}

/// A live stream of frames, paced at the capture rate.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> CameraFrame;
}

/// Black-box landmark detector: slow fallible startup, then per-frame
/// detection returning zero or more hands of 21 points each.
pub trait HandDetector: Send {
    fn initialize(&mut self) -> anyhow::Result<()>;
    fn detect(&mut self, frame: &CameraFrame) -> Vec<HandLandmarks>;
}

pub struct TrackingSystem {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl TrackingSystem {
    pub fn start(
        camera: Box<dyn CameraAccess>,
        detector: Box<dyn HandDetector>,
        tx: Sender<TrackingEvent>,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = Arc::clone(&stop);
        let handle = thread::spawn(move || track_loop(camera, detector, tx, &stop_for_thread));
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for TrackingSystem {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

fn track_loop(
    camera: Box<dyn CameraAccess>,
    mut detector: Box<dyn HandDetector>,
    tx: Sender<TrackingEvent>,
    stop: &AtomicBool,
) {
    // Detector first: the camera stays closed until predictions can start.
    if detector.initialize().is_err() {
        let _ = tx.send(TrackingEvent::DetectorFailed);
        return;
    }
    let _ = tx.send(TrackingEvent::DetectorReady);

    let mut source = match camera.open() {
        Ok(source) => {
            let _ = tx.send(TrackingEvent::PermissionGranted);
            source
        }
        Err(CameraError::PermissionDenied) => {
            let _ = tx.send(TrackingEvent::PermissionDenied);
            return;
        }
    };

    let mut classifier = GestureClassifier::new();
    let mut last_timestamp = None;

    while !stop.load(Ordering::Relaxed) {
        let frame = source.next_frame();
        // The capture clock can lag the poll rate; an unadvanced timestamp
        // means nothing new to detect, so the tick is a no-op.
        if last_timestamp == Some(frame.timestamp_ms) {
            continue;
        }
        last_timestamp = Some(frame.timestamp_ms);

        let hands = detector.detect(&frame);
        let event = match classifier.classify(&hands, frame.timestamp_ms) {
            Classification::NoHand => TrackingEvent::HandLost,
            Classification::Hand {
                position,
                openness,
                swipe,
            } => TrackingEvent::Hand {
                position,
                openness,
                swipe,
            },
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

// ---------------------------------------------------------------------------
// Scripted implementations. No hardware or model file needed: the camera
// produces a 30 Hz timestamp clock and the detector synthesizes a hand
// choreography from it (wave, open/close cycle, periodic fast swipe, short
// dropouts), exercising every path a real detector would.
// ---------------------------------------------------------------------------

const CAPTURE_INTERVAL_MS: u64 = 33;
const POLL_INTERVAL: Duration = Duration::from_millis(8);

pub struct SimCamera {
    pub deny_permission: bool,
}

impl CameraAccess for SimCamera {
    fn open(self: Box<Self>) -> Result<Box<dyn FrameSource>, CameraError> {
        if self.deny_permission {
            return Err(CameraError::PermissionDenied);
        }
        Ok(Box::new(SimFrameSource {
            started: Instant::now(),
        }))
    }
}

struct SimFrameSource {
    started: Instant,
}

impl FrameSource for SimFrameSource {
    fn next_frame(&mut self) -> CameraFrame {
        // Poll faster than the capture clock advances, like a display loop
        // against a 30 fps video element, so consumers see repeat timestamps.
        thread::sleep(POLL_INTERVAL);
        let elapsed = self.started.elapsed().as_millis() as u64;
        CameraFrame {
            timestamp_ms: elapsed / CAPTURE_INTERVAL_MS * CAPTURE_INTERVAL_MS,
        }
    }
}

pub struct ScriptedDetector {
    pub init_delay: Duration,
    pub fail_init: bool,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        Self {
            init_delay: Duration::from_millis(1200),
            fail_init: false,
        }
    }
}

impl Default for ScriptedDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl HandDetector for ScriptedDetector {
    fn initialize(&mut self) -> anyhow::Result<()> {
        // Stand in for model download/compile latency.
        thread::sleep(self.init_delay);
        if self.fail_init {
            anyhow::bail!("landmark model unavailable");
        }
        Ok(())
    }

    fn detect(&mut self, frame: &CameraFrame) -> Vec<HandLandmarks> {
        let t = frame.timestamp_ms as f32 / 1000.0;
        let cycle = t % 13.0;

        // Brief tracking dropout once per cycle.
        if cycle > 12.2 {
            return Vec::new();
        }

        let mut x = 0.5 + 0.28 * (t * 0.4).sin();
        let y = 0.5 + 0.2 * (t * 0.27).cos();
        // Fast lateral jerk: a swipe as the detector would see one. The snap
        // back out of the window is a second large displacement inside the
        // cooldown, which the classifier must suppress.
        if (9.0..9.2).contains(&cycle) {
            x += 0.22;
        }

        // Hand opens and closes on an 8 second cycle.
        let spread = if t % 8.0 < 4.0 { 0.32 } else { 0.12 };
        vec![synthetic_hand(x, y, spread)]
    }
}

/// Build a plausible 21-point hand around a wrist position. Only the wrist
/// and fingertip indices drive classification; the rest are filled as
/// knuckle-ish midpoints.
fn synthetic_hand(wx: f32, wy: f32, spread: f32) -> HandLandmarks {
    let mut hand = [Landmark::default(); LANDMARKS_PER_HAND];
    hand[WRIST] = Landmark {
        x: wx,
        y: wy,
        z: 0.0,
    };
    for (finger, &tip) in FINGERTIPS.iter().enumerate() {
        // Fan the fingers upward from the wrist.
        let angle = std::f32::consts::FRAC_PI_2 + (finger as f32 - 1.5) * 0.25;
        let tx = wx + angle.cos() * spread;
        let ty = wy - angle.sin() * spread;
        hand[tip] = Landmark {
            x: tx,
            y: ty,
            z: 0.0,
        };
        for joint in 1..=3 {
            let f = joint as f32 / 4.0;
            hand[tip - joint] = Landmark {
                x: wx + (tx - wx) * (1.0 - f),
                y: wy + (ty - wy) * (1.0 - f),
                z: 0.0,
            };
        }
    }
    // Thumb gets a sideways stub so index 1..4 are not zeroed.
    for joint in 1..=4 {
        let f = joint as f32 / 4.0;
        hand[joint] = Landmark {
            x: wx + spread * 0.6 * f,
            y: wy - spread * 0.3 * f,
            z: 0.0,
        };
    }
    hand
}
