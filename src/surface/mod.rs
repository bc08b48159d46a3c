//! Surface: the addressable pixel buffer.
//!
//! A `Surface` owns a `width × height` grid of RGB pixels stored row-major.
//! All drawing goes through it, and every write is bounds-checked per pixel:
//! coordinates outside the grid are silently dropped, never wrapped.
//!
//! The surface knows nothing about windows, files, or time. Displays and
//! image writers only read it through [`Surface::pixels`] and friends.

mod shapes;

use anyhow::{bail, Result};

pub use shapes::Paint;

use crate::types::{Color, Pixel, BLACK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Pixel>,
    strict_bounds: bool,
}

impl Surface {
    /// Create a black surface. Zero-sized surfaces are a configuration error.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Surface dimensions must be positive, got {width}x{height}");
        }
        Ok(Self {
            width,
            height,
            pixels: vec![BLACK; width as usize * height as usize],
            strict_bounds: false,
        })
    }

    /// Enable bounds assertions for [`Surface::set_pixel`] in debug builds.
    ///
    /// Release builds keep clipping silently either way; shapes always clip.
    pub fn with_strict_bounds(mut self, strict: bool) -> Self {
        self.strict_bounds = strict;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Fill every cell with `color`.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color.pixel());
    }

    /// Overwrite one cell. Out-of-range coordinates are a no-op.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.in_bounds(x, y) {
            if cfg!(debug_assertions) && self.strict_bounds {
                panic!(
                    "set_pixel({x}, {y}) outside {}x{} surface",
                    self.width, self.height
                );
            }
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx] = color.pixel();
    }

    /// Read one cell, or `None` when out of range.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Pixel> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// The whole buffer, row-major.
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    /// One row of pixels, or `None` past the bottom edge.
    pub fn row(&self, y: u32) -> Option<&[Pixel]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.pixels[start..start + self.width as usize])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.pixels.chunks_exact(self.width as usize)
    }

    /// Unchecked-by-caller plot used by the shape rasterizers.
    #[inline]
    fn plot(&mut self, x: i64, y: i64, px: Pixel) {
        if x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64 {
            let idx = self.index(x as u32, y as u32);
            self.pixels[idx] = px;
        }
    }

    /// Fill the half-open span `[x0, x1)` on row `y`, clipped.
    fn fill_span(&mut self, y: i64, x0: i64, x1: i64, px: Pixel) {
        if y < 0 || y >= self.height as i64 {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i64);
        if start >= end {
            return;
        }
        let row = self.index(0, y as u32);
        self.pixels[row + start as usize..row + end as usize].fill(px);
    }
}
