use crate::config::{Config, HandSource};
use crate::gallery;
use crate::raster::Rasterizer;
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::scene::Scene;
use crate::store::{DetectorPhase, Store, DEFAULT_IMAGES};
use crate::terminal::TerminalGuard;
use crate::tracking::{ScriptedDetector, SimCamera, TrackingSystem};
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use std::io::BufWriter;
use std::sync::mpsc;
use std::time::{Duration, Instant};

const HUD_ROWS: u16 = 2;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let (images, mut status) = initial_images(&cfg);
    let mut store = Store::new(images);

    let (tx, rx) = mpsc::channel();
    let _tracking = match cfg.hand {
        HandSource::Scripted => {
            let mut detector = ScriptedDetector::new();
            detector.fail_init = cfg.fail_detector;
            Some(TrackingSystem::start(
                Box::new(SimCamera {
                    deny_permission: cfg.deny_camera,
                }),
                Box::new(detector),
                tx,
            ))
        }
        HandSource::Off => None,
    };

    let _term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut renderer = HalfBlockRenderer::new();
    let mut raster = Rasterizer::new();
    let mut scene = Scene::new(&cfg);

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.0 < 4 || last_size.1 < 3 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x3, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut show_hud = true;
    let mut pointer = (0.0f32, 0.0f32);
    let mut fps = FpsCounter::new();

    let start = Instant::now();
    let mut last_frame = start;

    loop {
        // Drain input events (non-blocking).
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if k.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(k.code, KeyCode::Char('c'))
                    {
                        return Ok(());
                    }
                    match k.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char('i') | KeyCode::Char('I') => show_hud = !show_hud,
                        KeyCode::Char(' ') => {
                            // Manual form/unleash for running without tracking.
                            let level = if store.chaos_level() < 0.5 { 1.0 } else { 0.0 };
                            store.set_chaos_level(level);
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            if !cfg.images.is_empty() {
                                match gallery::load_batch(&cfg.images) {
                                    Ok(batch) => {
                                        store.set_images(batch);
                                        status = None;
                                    }
                                    Err(err) => status = Some(err.to_string()),
                                }
                            }
                        }
                        _ => {}
                    }
                }
                Event::Mouse(m) => {
                    if matches!(m.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
                        pointer = normalize_pointer(m.column, m.row, last_size);
                    }
                }
                Event::Resize(c, r) => last_size = (c, r),
                _ => {}
            }
        }

        // Size check once per frame (resize events can be missed in some terminals).
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
        }

        // Apply everything the tracking worker published since last frame.
        while let Ok(ev) = rx.try_recv() {
            store.apply(ev);
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32().max(1e-6);
        last_frame = now;
        let t = now.duration_since(start).as_secs_f32();

        let (term_cols, term_rows) = last_size;
        let hud_rows = if show_hud {
            HUD_ROWS.min(term_rows.saturating_sub(1))
        } else {
            0
        };
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);
        let w = term_cols as usize;
        let h = visual_rows as usize * 2;

        raster.resize(w, h);
        scene.advance(&store, pointer, dt);
        scene.draw(&mut raster, t);

        fps.tick();
        let hud = if show_hud {
            build_hud(&cfg, &store, scene.foliage.progress(), status.as_deref(), fps.fps())
        } else {
            String::new()
        };

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: raster.pixels(),
            hud: &hud,
            hud_rows,
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, &mut out)?;

        // Frame pacing.
        let target = Duration::from_secs_f32(1.0 / cfg.fps.max(1) as f32);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn initial_images(cfg: &Config) -> (Vec<String>, Option<String>) {
    let defaults = || DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect();
    if cfg.images.is_empty() {
        return (defaults(), None);
    }
    match gallery::load_batch(&cfg.images) {
        Ok(batch) => (batch, None),
        // A bad batch falls back to the seed gallery; the HUD carries the why.
        Err(err) => (defaults(), Some(err.to_string())),
    }
}

fn normalize_pointer(col: u16, row: u16, size: (u16, u16)) -> (f32, f32) {
    let (cols, rows) = size;
    let x = if cols > 1 {
        col as f32 / (cols - 1) as f32 * 2.0 - 1.0
    } else {
        0.0
    };
    let y = if rows > 1 {
        row as f32 / (rows - 1) as f32 * 2.0 - 1.0
    } else {
        0.0
    };
    (x, -y)
}

fn build_hud(
    cfg: &Config,
    store: &Store,
    morph: f32,
    status: Option<&str>,
    fps: f32,
) -> String {
    let hand = if store.is_hand_detected() {
        "tracked"
    } else {
        "lost"
    };
    let state = if store.chaos_level() > 0.5 {
        "UNLEASHED"
    } else {
        "FORMED"
    };
    let zoom = store
        .zoomed_image_index()
        .map(|i| format!("#{i}"))
        .unwrap_or_else(|| "-".to_string());
    let camera = match cfg.hand {
        HandSource::Off => "off",
        HandSource::Scripted => {
            if store.permission_granted() {
                "ok"
            } else if store.detector() == DetectorPhase::Failed {
                "idle"
            } else {
                "awaiting access"
            }
        }
    };

    let line1 = format!(
        "Hand: {} | State: {} | Morph: {:.2} | Zoom: {} | Detector: {} | Camera: {} | Photos: {} | FPS: {:>4.1}",
        hand,
        state,
        morph,
        zoom,
        store.detector().label(),
        camera,
        store.images().len(),
        fps,
    );
    let line2 = match status {
        Some(err) => format!("Gallery: {err}"),
        None => {
            "Keys: mouse move camera | space form/unleash | r reload photos | i HUD | q quit"
                .to_string()
        }
    };
    format!("{line1}\n{line2}")
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        if dt >= 0.5 {
            self.fps = (self.frames as f32) / dt;
            self.frames = 0;
            self.last = now;
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}
