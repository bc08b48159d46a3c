//! Terminal display: draws the surface with 24-bit half-block cells.
//!
//! Each character cell shows two vertically stacked pixels: `▀` with the
//! upper pixel as foreground and the lower one as background. Surfaces
//! larger than the terminal are downsampled by the smallest integer step
//! that fits. After the first frame only changed cells are written.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, execute, queue, style, terminal};
use log::debug;

use crate::config::{matches_binding, KeyBindings};
use crate::menubar::{menu_items, print_menu_item};
use crate::surface::Surface;
use crate::types::{FrameStatus, Pixel, Signal, BLACK};

use super::Display;

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Menu bar plus status bar.
const RESERVED_ROWS: u16 = 2;
const HALF_BLOCK: char = '\u{2580}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HalfBlock {
    pub top: Pixel,
    pub bottom: Pixel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: HalfBlock,
}

pub struct TerminalDisplay {
    stdout: io::Stdout,
    bindings: KeyBindings,
    title: String,
    grid: Vec<Vec<HalfBlock>>,
    needs_full: bool,
    raw: bool,
}

impl TerminalDisplay {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            stdout: io::stdout(),
            bindings,
            title: String::new(),
            grid: Vec::new(),
            needs_full: true,
            raw: false,
        }
    }

    fn restore(&mut self) -> Result<()> {
        if !self.raw {
            return Ok(());
        }
        self.raw = false;
        execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn render_menubar(&mut self) -> Result<()> {
        queue!(
            self.stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in menu_items(&self.bindings).iter().enumerate() {
            if i > 0 {
                queue!(self.stdout, style::Print("  "))?;
            }
            print_menu_item(&mut self.stdout, item)?;
        }
        Ok(())
    }

    fn render_full(&mut self) -> Result<()> {
        for (y, row) in self.grid.iter().enumerate() {
            queue!(self.stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                queue!(self.stdout, style::PrintStyledContent(styled(cell)))?;
            }
        }
        Ok(())
    }

    fn render_changes(&mut self, changes: &[CellChange]) -> Result<()> {
        for change in changes {
            queue!(
                self.stdout,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(styled(&change.cell)),
            )?;
        }
        Ok(())
    }

    fn render_status(&mut self, status: &FrameStatus, term_h: u16) -> Result<()> {
        let status_y = self.grid.len() as u16 + CANVAS_OFFSET;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        let text = format!(
            " {} | Frame {} | {:.1} fps | {} ",
            self.title,
            status.frame,
            status.fps,
            if status.looping { "looping" } else { "paused" },
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            self.stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, text)),
        )?;
        Ok(())
    }

    fn signal_for(&self, code: KeyCode, modifiers: KeyModifiers) -> Signal {
        let key = event::KeyEvent::new(code, modifiers);
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            return Signal::Quit;
        }
        let b = &self.bindings;
        if matches_binding(&b.quit, &key) || matches_binding(&b.quit_alt, &key) {
            Signal::Quit
        } else if matches_binding(&b.save, &key) {
            Signal::SaveFrame
        } else if matches_binding(&b.toggle_loop, &key) {
            Signal::ToggleLoop
        } else {
            Signal::None
        }
    }
}

impl Display for TerminalDisplay {
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        self.title = title.to_string();
        terminal::enable_raw_mode()?;
        self.raw = true;
        execute!(
            self.stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
            terminal::SetTitle(title),
        )?;
        self.needs_full = true;
        debug!("terminal display opened for {width}x{height} canvas");
        Ok(())
    }

    fn present(&mut self, surface: &Surface, status: &FrameStatus) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let rows = term_h.saturating_sub(RESERVED_ROWS);
        let Some(step) = scale_step(surface.width(), surface.height(), term_w, rows) else {
            return Ok(()); // Terminal too small to show anything.
        };

        let next = compose(surface, step);
        if self.needs_full || !same_shape(&self.grid, &next) {
            queue!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
            self.grid = next;
            self.render_menubar()?;
            self.render_full()?;
            self.needs_full = false;
        } else {
            let changes = diff(&self.grid, &next);
            self.grid = next;
            self.render_changes(&changes)?;
        }
        self.render_status(status, term_h)?;
        self.stdout.flush()?;
        Ok(())
    }

    fn poll_signal(&mut self) -> Result<Signal> {
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    let signal = self.signal_for(key.code, key.modifiers);
                    if signal != Signal::None {
                        return Ok(signal);
                    }
                }
                Event::Resize(_, _) => self.needs_full = true,
                _ => {}
            }
        }
        Ok(Signal::None)
    }

    fn close(&mut self) -> Result<()> {
        self.restore()
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

// ---------------------------------------------------------------------------
// Cell grid
// ---------------------------------------------------------------------------

/// Smallest integer step at which a `width × height` surface fits in
/// `cols × rows` half-block cells, or `None` if there is no room at all.
pub(crate) fn scale_step(width: u32, height: u32, cols: u16, rows: u16) -> Option<u32> {
    if cols == 0 || rows == 0 {
        return None;
    }
    let by_w = width.div_ceil(cols as u32);
    let by_h = height.div_ceil(rows as u32 * 2);
    Some(by_w.max(by_h).max(1))
}

/// Sample the surface every `step` pixels and pair rows into half-blocks.
pub(crate) fn compose(surface: &Surface, step: u32) -> Vec<Vec<HalfBlock>> {
    let cols = surface.width().div_ceil(step);
    let pixel_rows = surface.height().div_ceil(step);
    let sample = |cx: u32, py: u32| -> Pixel {
        surface
            .pixel((cx * step) as i32, (py * step) as i32)
            .unwrap_or(BLACK)
    };

    (0..pixel_rows.div_ceil(2))
        .map(|cy| {
            (0..cols)
                .map(|cx| HalfBlock {
                    top: sample(cx, cy * 2),
                    bottom: if cy * 2 + 1 < pixel_rows {
                        sample(cx, cy * 2 + 1)
                    } else {
                        BLACK
                    },
                })
                .collect()
        })
        .collect()
}

/// Compute a cell-level diff between two grids of the same shape.
pub(crate) fn diff(prev: &[Vec<HalfBlock>], next: &[Vec<HalfBlock>]) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
        for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
            if prev_cell != next_cell {
                changes.push(CellChange {
                    x: x as u16,
                    y: y as u16,
                    cell: *next_cell,
                });
            }
        }
    }
    changes
}

fn same_shape(a: &[Vec<HalfBlock>], b: &[Vec<HalfBlock>]) -> bool {
    a.len() == b.len() && a.first().map(Vec::len) == b.first().map(Vec::len)
}

fn styled(cell: &HalfBlock) -> style::StyledContent<char> {
    let mut cs = style::ContentStyle::default();
    cs.foreground_color = Some(to_ct_color(cell.top));
    cs.background_color = Some(to_ct_color(cell.bottom));
    style::StyledContent::new(cs, HALF_BLOCK)
}

fn to_ct_color([r, g, b]: Pixel) -> style::Color {
    style::Color::Rgb { r, g, b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use test_log::test;

    #[test]
    fn small_surface_is_not_scaled() {
        assert_eq!(scale_step(80, 40, 100, 30), Some(1));
    }

    #[test]
    fn large_surface_uses_smallest_fitting_step() {
        // 640 wide into 100 cols needs 7; 360 tall into 22 rows (44 px) needs 9.
        assert_eq!(scale_step(640, 360, 100, 22), Some(9));
        assert_eq!(scale_step(640, 10, 100, 22), Some(7));
    }

    #[test]
    fn no_room_means_no_step() {
        assert_eq!(scale_step(10, 10, 0, 5), None);
        assert_eq!(scale_step(10, 10, 5, 0), None);
    }

    #[test]
    fn compose_pairs_rows_into_half_blocks() {
        let mut s = Surface::new(2, 3).unwrap();
        s.set_pixel(0, 0, Color::rgb(1, 0, 0));
        s.set_pixel(0, 1, Color::rgb(2, 0, 0));
        s.set_pixel(1, 2, Color::rgb(3, 0, 0));
        let grid = compose(&s, 1);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].len(), 2);
        assert_eq!(grid[0][0], HalfBlock { top: [1, 0, 0], bottom: [2, 0, 0] });
        // Odd height: the last row's lower half is padding.
        assert_eq!(grid[1][1], HalfBlock { top: [3, 0, 0], bottom: BLACK });
    }

    #[test]
    fn compose_downsamples_by_step() {
        let mut s = Surface::new(4, 4).unwrap();
        s.set_pixel(2, 2, Color::WHITE);
        let grid = compose(&s, 2);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid[0].len(), 2);
        assert_eq!(grid[0][1].bottom, [255, 255, 255]);
        assert_eq!(grid[0][0].top, BLACK);
    }

    #[test]
    fn diff_reports_only_changed_cells() {
        let mut s = Surface::new(4, 4).unwrap();
        let before = compose(&s, 1);
        s.set_pixel(3, 3, Color::WHITE);
        let after = compose(&s, 1);
        let changes = diff(&before, &after);
        assert_eq!(changes.len(), 1);
        assert_eq!((changes[0].x, changes[0].y), (3, 1));
        assert_eq!(changes[0].cell.bottom, [255, 255, 255]);
        assert!(diff(&after, &after).is_empty());
    }

    #[test]
    fn keys_map_to_signals() {
        let d = TerminalDisplay::new(KeyBindings::default());
        let none = KeyModifiers::NONE;
        assert_eq!(d.signal_for(KeyCode::Char('q'), none), Signal::Quit);
        assert_eq!(d.signal_for(KeyCode::Esc, none), Signal::Quit);
        assert_eq!(d.signal_for(KeyCode::Char('c'), KeyModifiers::CONTROL), Signal::Quit);
        assert_eq!(d.signal_for(KeyCode::Char('s'), none), Signal::SaveFrame);
        assert_eq!(d.signal_for(KeyCode::Char(' '), none), Signal::ToggleLoop);
        assert_eq!(d.signal_for(KeyCode::Char('x'), none), Signal::None);
    }
}
