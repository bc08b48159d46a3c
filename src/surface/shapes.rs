//! Shape rasterizers: lines, rectangles, circles.
//!
//! Everything here is integer-only and clips per pixel through
//! `Surface::plot`, so partially visible shapes still draw their visible part.

use crate::types::{Color, Pixel};

use super::Surface;

/// Whether a closed shape is outlined or filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Paint {
    #[default]
    Stroke,
    Fill,
}

impl Paint {
    pub fn from_fill(fill: bool) -> Self {
        if fill { Paint::Fill } else { Paint::Stroke }
    }
}

impl Surface {
    /// Draw an 8-connected line from `(x0, y0)` to `(x1, y1)` inclusive.
    ///
    /// Bresenham over all eight octants; axis-aligned lines take a span path.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let px = color.pixel();
        let (x, y) = (x0 as i64, y0 as i64);
        let (x1, y1) = (x1 as i64, y1 as i64);

        if y == y1 {
            let (lo, hi) = if x <= x1 { (x, x1) } else { (x1, x) };
            self.fill_span(y, lo, hi + 1, px);
            return;
        }
        if x == x1 {
            let (lo, hi) = if y <= y1 { (y, y1) } else { (y1, y) };
            for yy in lo.max(0)..=hi.min(self.height as i64 - 1) {
                self.plot(x, yy, px);
            }
            return;
        }

        let (w, h) = (self.width as i64, self.height as i64);
        let (adx, ady) = ((x1 - x).abs(), (y1 - y).abs());
        let (sx, sy) = ((x1 - x).signum(), (y1 - y).signum());

        if adx >= ady {
            let steps = Axis { start: x, sign: sx, len: adx, size: w };
            let minor = Axis { start: y, sign: sy, len: ady, size: h };
            self.step_line(steps, minor, |a, b| (a, b), px);
        } else {
            let steps = Axis { start: y, sign: sy, len: ady, size: h };
            let minor = Axis { start: x, sign: sx, len: adx, size: w };
            self.step_line(steps, minor, |a, b| (b, a), px);
        }
    }

    /// Bresenham along `major`, one unit per step, with the minor offset at
    /// step `i` equal to `round_half_up(i * minor.len / major.len)`.
    ///
    /// Only the steps that can land on the surface are walked: the first one
    /// is found in closed form and the error term seeded from it, so a huge
    /// mostly off-screen segment costs as much as its visible part.
    fn step_line(
        &mut self,
        major: Axis,
        minor: Axis,
        to_xy: impl Fn(i64, i64) -> (i64, i64),
        px: Pixel,
    ) {
        let (Some((a_lo, a_hi)), Some((q_lo, q_hi))) = (major.visible_steps(), minor.visible_steps())
        else {
            return;
        };

        // Offset at step i is floor((i * step + major.len) / denom).
        let step = 2 * minor.len as i128;
        let denom = 2 * major.len as i128;
        let bias = major.len as i128;

        let i_lo = a_lo.max(ceil_div(q_lo as i128 * denom - bias, step) as i64);
        let i_hi = a_hi.min(ceil_div((q_hi as i128 + 1) * denom - bias, step) as i64 - 1);
        if i_lo > i_hi {
            return;
        }

        let seed = i_lo as i128 * step + bias;
        let mut q = seed.div_euclid(denom) as i64;
        let mut rem = seed.rem_euclid(denom);
        for i in i_lo..=i_hi {
            let (x, y) = to_xy(major.start + major.sign * i, minor.start + minor.sign * q);
            self.plot(x, y, px);
            rem += step;
            if rem >= denom {
                rem -= denom;
                q += 1;
            }
        }
    }

    /// Draw a `w × h` rectangle with its top-left corner at `(x, y)`.
    ///
    /// `w <= 0` or `h <= 0` draws nothing.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, paint: Paint) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x, y) = (x as i64, y as i64);
        let (right, bottom) = (x + w as i64 - 1, y + h as i64 - 1);

        match paint {
            Paint::Fill => {
                let px = color.pixel();
                for row in y.max(0)..=bottom.min(self.height as i64 - 1) {
                    self.fill_span(row, x, right + 1, px);
                }
            }
            Paint::Stroke => {
                let (l, t, r, b) = (clamp_i32(x), clamp_i32(y), clamp_i32(right), clamp_i32(bottom));
                self.draw_line(l, t, r, t, color);
                self.draw_line(l, b, r, b, color);
                self.draw_line(l, t, l, b, color);
                self.draw_line(r, t, r, b, color);
            }
        }
    }

    /// Draw a circle centred on `(cx, cy)`.
    ///
    /// With `d² = dx² + dy²` measured from the centre:
    /// - fill plots every pixel with `d² <= r² + r` (distance < r + ½),
    /// - stroke plots every pixel with `r² - r < d² <= r² + r`
    ///   (distance within ½ pixel of `r`).
    ///
    /// The stroke set is therefore always a subset of the fill set.
    /// `radius <= 0` draws nothing.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color, paint: Paint) {
        if radius <= 0 {
            return;
        }
        let px = color.pixel();
        let (cx, cy, r) = (cx as i64, cy as i64, radius as i64);
        let outer = r * r + r;
        let inner = r * r - r;

        let x_start = (cx - r).max(0);
        let x_end = (cx + r).min(self.width as i64 - 1);
        let y_start = (cy - r).max(0);
        let y_end = (cy + r).min(self.height as i64 - 1);

        for y in y_start..=y_end {
            let dy = y - cy;
            for x in x_start..=x_end {
                let dx = x - cx;
                let d2 = dx * dx + dy * dy;
                let hit = match paint {
                    Paint::Fill => d2 <= outer,
                    Paint::Stroke => d2 > inner && d2 <= outer,
                };
                if hit {
                    self.plot(x, y, px);
                }
            }
        }
    }
}

fn clamp_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// One axis of a line: where it starts, which way it moves, how far, and
/// the surface extent along that axis.
#[derive(Clone, Copy)]
struct Axis {
    start: i64,
    sign: i64,
    len: i64,
    size: i64,
}

impl Axis {
    /// Range of step counts `k` in `0..=len` for which
    /// `start + sign * k` lies in `0..size`.
    fn visible_steps(self) -> Option<(i64, i64)> {
        let (lo, hi) = match self.sign {
            0 => {
                if (0..self.size).contains(&self.start) {
                    (0, self.len)
                } else {
                    return None;
                }
            }
            1 => (-self.start, self.size - 1 - self.start),
            _ => (self.start - (self.size - 1), self.start),
        };
        let (lo, hi) = (lo.max(0), hi.min(self.len));
        (lo <= hi).then_some((lo, hi))
    }
}

/// Ceiling division for a positive divisor.
fn ceil_div(n: i128, d: i128) -> i128 {
    n.div_euclid(d) + i128::from(n.rem_euclid(d) != 0)
}
