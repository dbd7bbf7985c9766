use tree_visualizer::animator::{
    blend, card_scale, decor_sway, foliage_drift, foliage_position, strobe_scale, twinkle_scale,
    MorphProgress, ZOOM_SPEED,
};
use tree_visualizer::geometry::{FoliageSeed, Vec3};

const DT: f32 = 1.0 / 60.0;
const MORPH_SPEED: f32 = 2.5;

fn ticks_to_converge(speed: f32, target: f32) -> usize {
    let mut progress = MorphProgress::new(speed);
    for tick in 1..=1000 {
        progress.tick(target, DT);
        if (progress.value() - target).abs() < 1e-3 {
            return tick;
        }
    }
    panic!("progress never converged");
}

// ── progress smoothing ─────────────────────────────────────────────────────

#[test]
fn progress_error_shrinks_every_tick() {
    let mut progress = MorphProgress::new(MORPH_SPEED);
    let mut err = 1.0f32;
    for _ in 0..400 {
        progress.tick(1.0, DT);
        let next = (progress.value() - 1.0).abs();
        assert!(next <= err, "error grew from {err} to {next}");
        err = next;
    }
    assert!(err < 1e-3);
}

#[test]
fn progress_converges_within_bounded_ticks() {
    assert!(ticks_to_converge(MORPH_SPEED, 1.0) <= 200);
    assert!(ticks_to_converge(MORPH_SPEED, 0.0) <= 1);
}

#[test]
fn progress_tracks_a_flipping_target_without_pops() {
    let mut progress = MorphProgress::new(MORPH_SPEED);
    for _ in 0..100 {
        progress.tick(1.0, DT);
    }
    let before = progress.value();
    progress.tick(0.0, DT);
    // One tick back toward zero moves a bounded step, never a jump.
    assert!(progress.value() < before);
    assert!(before - progress.value() < 0.1);
}

#[test]
fn huge_delta_lands_exactly_on_target() {
    let mut progress = MorphProgress::new(MORPH_SPEED);
    progress.tick(1.0, 10.0);
    assert_eq!(progress.value(), 1.0, "step factor must clamp at 1");
    progress.tick(0.0, 10.0);
    assert_eq!(progress.value(), 0.0);
}

#[test]
fn zoom_converges_faster_than_the_morph() {
    assert!(ticks_to_converge(ZOOM_SPEED, 1.0) < ticks_to_converge(MORPH_SPEED, 1.0));
}

// ── blending ───────────────────────────────────────────────────────────────

#[test]
fn blend_endpoints_are_exact() {
    let tree = Vec3::new(1.25, -3.5, 0.75);
    let chaos = Vec3::new(-20.0, 14.5, 3.25);
    assert_eq!(blend(tree, chaos, 0.0), tree);
    assert_eq!(blend(tree, chaos, 1.0), chaos);
    let mid = blend(tree, chaos, 0.5);
    assert!((mid.x - (tree.x + chaos.x) / 2.0).abs() < 1e-5);
}

// ── oscillation gating ─────────────────────────────────────────────────────

#[test]
fn oscillation_is_exactly_zero_at_rest() {
    for t in [0.0f32, 0.37, 2.4, 100.3] {
        assert_eq!(foliage_drift(0.0, t, 0.8), Vec3::ZERO);
        assert_eq!(foliage_drift(0.1, t, 0.8), Vec3::ZERO);
        assert_eq!(decor_sway(0.05, t, 1.2), Vec3::ZERO);
    }
}

#[test]
fn oscillation_wakes_above_the_threshold() {
    let drift = foliage_drift(0.5, 1.7, 0.3);
    assert!(drift.length() > 0.0);
    // Amplitude scales with progress.
    let full = foliage_drift(1.0, 1.7, 0.3);
    assert!(full.length() > drift.length());
    assert!(full.x.abs() <= 0.5 && full.y.abs() <= 0.5 && full.z.abs() <= 0.5);
}

#[test]
fn converged_foliage_sits_inside_the_chaos_envelope() {
    let seed = FoliageSeed {
        tree: Vec3::new(2.0, -4.0, 1.0),
        chaos: Vec3::new(-12.0, 8.0, 17.0),
        random: 0.42,
    };
    let mut progress = MorphProgress::new(MORPH_SPEED);
    for _ in 0..600 {
        progress.tick(1.0, DT);
    }
    // Drift adds at most 0.5 per axis at full chaos.
    for t in [0.0f32, 1.3, 7.9] {
        let pos = foliage_position(&seed, progress.value(), t);
        assert!((pos - seed.chaos).length() <= (3.0f32).sqrt() * 0.5 + 1e-2);
    }
}

// ── population modulation ──────────────────────────────────────────────────

#[test]
fn strobe_snaps_between_exactly_two_values() {
    let scale = 0.15f32;
    let mut on = 0;
    let mut off = 0;
    for i in 0..500 {
        let t = i as f32 * 0.013;
        let s = strobe_scale(scale, t, 3.7);
        if s == scale * 1.5 {
            on += 1;
        } else if s == 0.01 {
            off += 1;
        } else {
            panic!("strobe produced an in-between value: {s}");
        }
    }
    assert!(on > 0 && off > 0, "strobe must actually blink");
}

#[test]
fn twinkle_stays_within_its_band() {
    for i in 0..500 {
        let t = i as f32 * 0.017;
        let s = twinkle_scale(0.08, t, 2.2);
        assert!(s >= 0.08 * 0.7 - 1e-6 && s <= 0.08 * 1.3 + 1e-6);
    }
}

#[test]
fn card_scale_spans_base_to_zoomed() {
    assert_eq!(card_scale(0.0), 1.0);
    assert_eq!(card_scale(1.0), 3.5);
    assert!((card_scale(0.5) - 2.25).abs() < 1e-5);
}
