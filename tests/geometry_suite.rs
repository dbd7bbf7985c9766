use tree_visualizer::geometry::{
    card_seeds, flasher_seeds, foliage_seeds, light_seeds, ornament_seeds, sphere_volume_point,
    TreeParams, Vec3,
};

fn params() -> TreeParams {
    TreeParams {
        height: 12.0,
        radius: 4.5,
        chaos_radius: 25.0,
    }
}

fn horizontal_radius(p: Vec3) -> f32 {
    (p.x * p.x + p.z * p.z).sqrt()
}

// ── chaos sphere ───────────────────────────────────────────────────────────

#[test]
fn chaos_radii_are_volume_uniform() {
    let c = 25.0f32;
    let n = 20000;
    // Shell boundaries as fractions of the full radius; a volume-uniform
    // distribution puts (hi^3 - lo^3) of the mass in each shell.
    let edges = [0.0f32, 0.4, 0.6, 0.8, 1.0];
    let mut counts = [0usize; 4];
    for _ in 0..n {
        let r = sphere_volume_point(c).length();
        assert!(r <= c + 1e-3, "sample outside the sphere: {r}");
        for k in 0..4 {
            if r >= edges[k] * c && r < edges[k + 1] * c {
                counts[k] += 1;
            }
        }
    }
    for k in 0..4 {
        let expected = (edges[k + 1].powi(3) - edges[k].powi(3)) as f64 * n as f64;
        let got = counts[k] as f64;
        let tolerance = expected * 0.15;
        assert!(
            (got - expected).abs() < tolerance,
            "shell {k}: expected ~{expected:.0}, got {got} (density should grow as r^2)"
        );
    }
}

// ── tree cone ──────────────────────────────────────────────────────────────

#[test]
fn foliage_fills_a_cone_wide_at_the_base() {
    let p = params();
    let n = 2000;
    let seeds = foliage_seeds(n, &p);
    assert_eq!(seeds.len(), n);

    for (i, seed) in seeds.iter().enumerate() {
        let ratio = i as f32 / n as f32;
        assert!(seed.tree.y >= -p.height / 2.0 - 1e-4);
        assert!(seed.tree.y <= p.height / 2.0 + 1e-4);
        let r = horizontal_radius(seed.tree);
        assert!(
            r <= (1.0 - ratio) * p.radius + 0.5 + 1e-4,
            "needle {i} outside the jittered cone"
        );
        assert!((0.0..1.0).contains(&seed.random));
    }

    let decile = n / 10;
    let base: f32 = seeds[..decile]
        .iter()
        .map(|s| horizontal_radius(s.tree))
        .sum::<f32>()
        / decile as f32;
    let top: f32 = seeds[n - decile..]
        .iter()
        .map(|s| horizontal_radius(s.tree))
        .sum::<f32>()
        / decile as f32;
    assert!(base > top, "cone must narrow toward the top");
}

#[test]
fn lights_wind_a_deterministic_helix() {
    let p = params();
    let n = 50;
    let seeds = light_seeds(n, &p);
    for (i, seed) in seeds.iter().enumerate() {
        let t = i as f32 / n as f32;
        let theta = i as f32 * 0.5;
        let r = (1.0 - t) * p.radius * 1.05;
        let y = t * p.height - p.height / 2.0;
        assert!((seed.tree.x - r * theta.cos()).abs() < 1e-4);
        assert!((seed.tree.y - y).abs() < 1e-4);
        assert!((seed.tree.z - r * theta.sin()).abs() < 1e-4);
        assert_eq!(seed.scale, 0.08);
        assert_eq!(seed.rotation_speed, 0.0);
    }
}

// ── population presets ─────────────────────────────────────────────────────

#[test]
fn ornament_seeds_stay_in_their_ranges() {
    let p = params();
    for seed in ornament_seeds(500, &p) {
        assert!((0.2..=0.45).contains(&seed.scale));
        assert!((0.0..=std::f32::consts::PI).contains(&seed.phase));
        assert!((-1.0..=1.0).contains(&seed.rotation_speed));
        let r = seed.chaos.length();
        assert!(
            r >= p.chaos_radius * 0.5 - 1e-3 && r <= p.chaos_radius + 1e-3,
            "ornaments scatter on the outer shell, got {r}"
        );
        assert!(horizontal_radius(seed.tree) <= p.radius * 0.9 + 1e-4);
    }
}

#[test]
fn flasher_chaos_stays_in_its_cube() {
    let p = params();
    for seed in flasher_seeds(500, &p) {
        assert!(seed.chaos.x.abs() <= 10.0 + 1e-4);
        assert!(seed.chaos.y.abs() <= 10.0 + 1e-4);
        assert!(seed.chaos.z.abs() <= 10.0 + 1e-4);
    }
}

#[test]
fn cards_spiral_three_turns_and_scatter_forward() {
    let p = params();
    let n = 9;
    let seeds = card_seeds(n, &p);
    for (i, seed) in seeds.iter().enumerate() {
        let t = i as f32 / n as f32;
        let theta = t * std::f32::consts::PI * 6.0;
        assert!((seed.yaw + theta).abs() < 1e-4, "card faces along the spiral");
        assert!((-0.1..=0.1).contains(&seed.roll));
        assert!(seed.chaos.x.abs() <= 15.0 + 1e-4);
        assert!(seed.chaos.y.abs() <= 15.0 + 1e-4);
        assert!((10.0..=20.0).contains(&seed.chaos.z));
    }
}
