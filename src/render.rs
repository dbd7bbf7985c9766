//! Terminal presentation of the rasterized frame. One cell shows two stacked
//! pixels via the upper-half-block glyph with truecolor fg/bg, with HUD text
//! on the bottom rows.

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

const HALF_BLOCK: char = '\u{2580}';

pub struct HalfBlockRenderer {
    last_fg: Option<(u8, u8, u8)>,
    last_bg: Option<(u8, u8, u8)>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }

    fn set_colors(
        &mut self,
        out: &mut dyn Write,
        fg: (u8, u8, u8),
        bg: (u8, u8, u8),
    ) -> std::io::Result<()> {
        if self.last_fg != Some(fg) {
            write!(out, "\x1b[38;2;{};{};{}m", fg.0, fg.1, fg.2)?;
            self.last_fg = Some(fg);
        }
        if self.last_bg != Some(bg) {
            write!(out, "\x1b[48;2;{};{};{}m", bg.0, bg.1, bg.2)?;
            self.last_bg = Some(bg);
        }
        Ok(())
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let w = frame.pixel_width;
        let h = frame.pixel_height;

        if cols == 0 || visual_rows == 0 || w == 0 || h == 0 {
            return Ok(());
        }
        // The pixel grid must be exactly cols x (2 * visual rows); anything
        // else means a resize raced the rasterizer, so skip the frame.
        if w != cols || h != visual_rows * 2 || frame.pixels_rgba.len() < w * h * 4 {
            return Ok(());
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        // Home, reset, and autowrap off while painting full-width rows.
        out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        for row in 0..visual_rows {
            let top = row * 2;
            let bot = top + 1;
            for x in 0..cols {
                let ti = (top * w + x) * 4;
                let bi = (bot * w + x) * 4;
                let fg = (
                    frame.pixels_rgba[ti],
                    frame.pixels_rgba[ti + 1],
                    frame.pixels_rgba[ti + 2],
                );
                let bg = (
                    frame.pixels_rgba[bi],
                    frame.pixels_rgba[bi + 1],
                    frame.pixels_rgba[bi + 2],
                );
                self.set_colors(out, fg, bg)?;
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        let mut hud_lines = frame.hud.lines();
        for i in 0..(frame.hud_rows as usize) {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
            if let Some(mut line) = hud_lines.next() {
                if line.len() > cols {
                    line = &line[..cols];
                }
                write!(out, "{line}")?;
            }
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
