//! Single-frame hand-landmark classification: openness, screen position, and
//! the debounced swipe trigger.

pub const LANDMARKS_PER_HAND: usize = 21;
pub const WRIST: usize = 0;
pub const FINGERTIPS: [usize; 4] = [8, 12, 16, 20];

/// Mean fingertip-to-wrist distance above this reads as an open hand.
pub const OPEN_DISTANCE: f32 = 0.25;
/// Per-frame displacement above this reads as a swipe.
pub const SWIPE_DISTANCE: f32 = 0.15;
pub const SWIPE_COOLDOWN_MS: u64 = 1000;

/// One detected keypoint in the detector's normalized frame space
/// (x and y in `[0, 1]`, z relative depth).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub type HandLandmarks = [Landmark; LANDMARKS_PER_HAND];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Openness {
    Open,
    Closed,
}

impl Openness {
    /// The discrete chaos-level target this gesture requests. Smoothing is the
    /// consumers' job; the classifier only ever says 0 or 1.
    pub fn chaos_target(self) -> f32 {
        match self {
            Self::Open => 1.0,
            Self::Closed => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    NoHand,
    Hand {
        position: (f32, f32),
        openness: Openness,
        swipe: bool,
    },
}

/// Wrist position remapped from `[0,1]` frame coordinates to `[-1,1]`, both
/// axes sign-flipped so on-screen motion mirrors the user's hand.
pub fn screen_position(hand: &HandLandmarks) -> (f32, f32) {
    let wrist = hand[WRIST];
    (-(wrist.x - 0.5) * 2.0, -(wrist.y - 0.5) * 2.0)
}

/// Open/closed heuristic: mean 2D distance from the four fingertips to the
/// wrist, thresholded. Exactly `OPEN_DISTANCE` counts as closed.
pub fn classify_openness(hand: &HandLandmarks) -> Openness {
    let wrist = hand[WRIST];
    let mut total = 0.0f32;
    for idx in FINGERTIPS {
        let tip = hand[idx];
        let dx = tip.x - wrist.x;
        let dy = tip.y - wrist.y;
        total += (dx * dx + dy * dy).sqrt();
    }
    if total / FINGERTIPS.len() as f32 > OPEN_DISTANCE {
        Openness::Open
    } else {
        Openness::Closed
    }
}

/// Per-frame classifier. Stateless except for swipe debouncing: the previous
/// frame's position and the last swipe time. Losing the hand clears the
/// position memory, so reacquisition can never fake a displacement spike.
pub struct GestureClassifier {
    last_position: Option<(f32, f32)>,
    last_swipe_ms: Option<u64>,
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            last_position: None,
            last_swipe_ms: None,
        }
    }

    pub fn classify(&mut self, hands: &[HandLandmarks], now_ms: u64) -> Classification {
        let Some(hand) = hands.first() else {
            self.last_position = None;
            return Classification::NoHand;
        };

        let position = screen_position(hand);

        let mut swipe = false;
        if let Some((px, py)) = self.last_position {
            let dx = position.0 - px;
            let dy = position.1 - py;
            if (dx * dx + dy * dy).sqrt() > SWIPE_DISTANCE {
                let ready = self
                    .last_swipe_ms
                    .map_or(true, |t| now_ms.saturating_sub(t) > SWIPE_COOLDOWN_MS);
                if ready {
                    swipe = true;
                    self.last_swipe_ms = Some(now_ms);
                }
            }
        }
        self.last_position = Some(position);

        Classification::Hand {
            position,
            openness: classify_openness(hand),
            swipe,
        }
    }
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}
