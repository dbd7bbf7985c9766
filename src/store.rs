//! Shared application state. The frame loop owns the single `Store`; the
//! tracking worker publishes `TrackingEvent`s over a channel and the loop
//! applies them here. That channel is the only write path besides the gallery
//! handler, which keeps the single-writer discipline structural rather than
//! conventional.

use crate::gesture::Openness;

/// Seed gallery shown before the user points the app at their own photos.
pub const DEFAULT_IMAGES: [&str; 9] = [
    "https://picsum.photos/id/1015/300/400",
    "https://picsum.photos/id/1016/300/400",
    "https://picsum.photos/id/1018/300/400",
    "https://picsum.photos/id/1020/300/400",
    "https://picsum.photos/id/1025/300/400",
    "https://picsum.photos/id/1035/300/400",
    "https://picsum.photos/id/1044/300/400",
    "https://picsum.photos/id/1050/300/400",
    "https://picsum.photos/id/1060/300/400",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorPhase {
    Uninitialized,
    Ready,
    Failed,
}

impl DetectorPhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

/// One message from the tracking worker per processed camera frame (plus the
/// one-shot lifecycle notices).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingEvent {
    DetectorReady,
    DetectorFailed,
    PermissionGranted,
    PermissionDenied,
    Hand {
        position: (f32, f32),
        openness: Openness,
        swipe: bool,
    },
    HandLost,
}

pub struct Store {
    chaos_level: f32,
    hand_position: (f32, f32),
    is_hand_detected: bool,
    permission_granted: bool,
    detector: DetectorPhase,
    zoomed_image_index: Option<usize>,
    images: Vec<String>,
    images_revision: u64,
}

impl Store {
    pub fn new(images: Vec<String>) -> Self {
        Self {
            chaos_level: 0.0,
            hand_position: (0.0, 0.0),
            is_hand_detected: false,
            permission_granted: false,
            detector: DetectorPhase::Uninitialized,
            zoomed_image_index: None,
            images,
            images_revision: 0,
        }
    }

    pub fn chaos_level(&self) -> f32 {
        self.chaos_level
    }

    pub fn hand_position(&self) -> (f32, f32) {
        self.hand_position
    }

    pub fn is_hand_detected(&self) -> bool {
        self.is_hand_detected
    }

    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    pub fn detector(&self) -> DetectorPhase {
        self.detector
    }

    pub fn zoomed_image_index(&self) -> Option<usize> {
        self.zoomed_image_index
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Monotonic gallery-change counter; consumers compare it to rebuild
    /// derived layouts instead of diffing the image list each frame.
    pub fn images_revision(&self) -> u64 {
        self.images_revision
    }

    pub fn apply(&mut self, event: TrackingEvent) {
        match event {
            TrackingEvent::DetectorReady => self.detector = DetectorPhase::Ready,
            TrackingEvent::DetectorFailed => self.detector = DetectorPhase::Failed,
            TrackingEvent::PermissionGranted => self.permission_granted = true,
            TrackingEvent::PermissionDenied => self.permission_granted = false,
            TrackingEvent::HandLost => self.is_hand_detected = false,
            TrackingEvent::Hand {
                position,
                openness,
                swipe,
            } => {
                self.is_hand_detected = true;
                self.hand_position = position;
                self.chaos_level = openness.chaos_target();
                if swipe && !self.images.is_empty() {
                    self.zoomed_image_index = Some(fastrand::usize(..self.images.len()));
                }
            }
        }
    }

    /// Replacing the gallery always drops the zoom target; a surviving index
    /// into a replaced list would point at the wrong photo.
    pub fn set_images(&mut self, images: Vec<String>) {
        self.images = images;
        self.zoomed_image_index = None;
        self.images_revision += 1;
    }

    pub fn set_chaos_level(&mut self, level: f32) {
        self.chaos_level = level;
    }
}
