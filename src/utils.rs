//! Small numeric and color helpers for sketches.

/// Re-map `value` from `[start1, stop1]` to `[start2, stop2]`. Does not clamp.
pub fn map_range(value: f64, start1: f64, stop1: f64, start2: f64, stop2: f64) -> f64 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

pub fn constrain(value: f64, low: f64, high: f64) -> f64 {
    low.max(high.min(value))
}

/// Linear interpolation; `amt` outside `[0, 1]` extrapolates.
pub fn lerp(start: f64, stop: f64, amt: f64) -> f64 {
    start + (stop - start) * amt
}

pub fn dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x2 - x1).hypot(y2 - y1)
}

/// Hue in `[0, 360)`, saturation and value in `[0, 1]`.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = max - min;

    let h = if diff == 0.0 {
        0.0
    } else if max == r {
        (60.0 * ((g - b) / diff) + 360.0) % 360.0
    } else if max == g {
        (60.0 * ((b - r) / diff) + 120.0) % 360.0
    } else {
        (60.0 * ((r - g) / diff) + 240.0) % 360.0
    };
    let s = if max == 0.0 { 0.0 } else { diff / max };

    (h, s, max)
}

/// Inverse of [`rgb_to_hsv`]. Channels are truncated, not rounded.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let channel = |u: f64| ((u + m) * 255.0).clamp(0.0, 255.0) as u8;
    (channel(r), channel(g), channel(b))
}
