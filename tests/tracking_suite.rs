use tree_visualizer::gesture::{classify_openness, Classification, GestureClassifier, Openness};
use tree_visualizer::store::TrackingEvent;
use tree_visualizer::tracking::{
    CameraFrame, HandDetector, ScriptedDetector, SimCamera, TrackingSystem,
};
use std::sync::mpsc;
use std::time::Duration;

fn quick_detector(fail: bool) -> ScriptedDetector {
    ScriptedDetector {
        init_delay: Duration::ZERO,
        fail_init: fail,
    }
}

fn frame(timestamp_ms: u64) -> CameraFrame {
    CameraFrame { timestamp_ms }
}

// ── scripted choreography ──────────────────────────────────────────────────

#[test]
fn choreography_drops_the_hand_once_per_cycle() {
    let mut detector = quick_detector(false);
    assert!(detector.detect(&frame(12_500)).is_empty(), "dropout window");
    assert_eq!(detector.detect(&frame(1_000)).len(), 1);
}

#[test]
fn choreography_opens_and_closes_on_an_eight_second_cycle() {
    let mut detector = quick_detector(false);
    let open = &detector.detect(&frame(1_000))[0];
    assert_eq!(classify_openness(open), Openness::Open);
    let closed = &detector.detect(&frame(5_000))[0];
    assert_eq!(classify_openness(closed), Openness::Closed);
}

#[test]
fn choreography_swipe_window_yields_exactly_one_swipe() {
    let mut detector = quick_detector(false);
    let mut classifier = GestureClassifier::new();
    let mut swipes = 0;
    let mut t = 8_800u64;
    while t <= 9_400 {
        let hands = detector.detect(&frame(t));
        if let Classification::Hand { swipe: true, .. } = classifier.classify(&hands, t) {
            swipes += 1;
        }
        t += 33;
    }
    assert_eq!(
        swipes, 1,
        "the jerk into the window swipes; the snap back sits inside the cooldown"
    );
}

// ── worker lifecycle ───────────────────────────────────────────────────────

#[test]
fn worker_reports_ready_then_permission_then_hands() {
    let (tx, rx) = mpsc::channel();
    let _system = TrackingSystem::start(
        Box::new(SimCamera {
            deny_permission: false,
        }),
        Box::new(quick_detector(false)),
        tx,
    );

    let timeout = Duration::from_secs(2);
    assert_eq!(rx.recv_timeout(timeout).unwrap(), TrackingEvent::DetectorReady);
    assert_eq!(
        rx.recv_timeout(timeout).unwrap(),
        TrackingEvent::PermissionGranted
    );
    // The choreography starts with a hand on screen.
    match rx.recv_timeout(timeout).unwrap() {
        TrackingEvent::Hand { .. } => {}
        other => panic!("expected a hand frame, got {other:?}"),
    }
}

#[test]
fn permission_denial_stops_tracking_without_hand_frames() {
    let (tx, rx) = mpsc::channel();
    let _system = TrackingSystem::start(
        Box::new(SimCamera {
            deny_permission: true,
        }),
        Box::new(quick_detector(false)),
        tx,
    );

    let timeout = Duration::from_secs(2);
    assert_eq!(rx.recv_timeout(timeout).unwrap(), TrackingEvent::DetectorReady);
    assert_eq!(
        rx.recv_timeout(timeout).unwrap(),
        TrackingEvent::PermissionDenied
    );
    // The worker exits; the channel hangs up with no further traffic.
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}

#[test]
fn detector_failure_reports_and_stops() {
    let (tx, rx) = mpsc::channel();
    let _system = TrackingSystem::start(
        Box::new(SimCamera {
            deny_permission: false,
        }),
        Box::new(quick_detector(true)),
        tx,
    );

    let timeout = Duration::from_secs(2);
    assert_eq!(
        rx.recv_timeout(timeout).unwrap(),
        TrackingEvent::DetectorFailed
    );
    assert!(rx.recv_timeout(Duration::from_millis(300)).is_err());
}
