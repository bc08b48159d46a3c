//! Noise: deterministic, seedable scalar fields.
//!
//! A [`Noise`] value owns the permutation and value tables derived from its
//! seed. Sampling is pure: the same `(seed, coordinate)` always yields the
//! same output, across calls and across process restarts.
//!
//! Every sampler returns a value in `[0, 1)`. The lattice tiles every
//! 256 units along each axis.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;

const TABLE_SIZE: usize = 256;
const MASK: i32 = TABLE_SIZE as i32 - 1;

#[derive(Debug, Clone)]
pub struct Noise {
    seed: u64,
    /// Shuffled `0..256`, stored twice so chained lookups never wrap.
    perm: [u8; TABLE_SIZE * 2],
    values: [f32; TABLE_SIZE],
    gradients: [(f32, f32); TABLE_SIZE],
}

impl Default for Noise {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Noise {
    pub fn new(seed: u64) -> Self {
        // ChaCha output is fixed per seed across releases, so tables survive restarts.
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let mut shuffled: [u8; TABLE_SIZE] = std::array::from_fn(|i| i as u8);
        shuffled.shuffle(&mut rng);
        let perm = std::array::from_fn(|i| shuffled[i % TABLE_SIZE]);

        let values = std::array::from_fn(|_| rng.random::<f32>());

        // Evenly spaced unit vectors; the permutation decides which corner gets which.
        let gradients = std::array::from_fn(|i| {
            let angle = std::f32::consts::TAU * i as f32 / TABLE_SIZE as f32;
            (angle.cos(), angle.sin())
        });

        Self {
            seed,
            perm,
            values,
            gradients,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rebuild the tables for a new seed.
    pub fn reseed(&mut self, seed: u64) {
        *self = Self::new(seed);
    }

    // -----------------------------------------------------------------------
    // Lattice hashing
    // -----------------------------------------------------------------------

    #[inline]
    fn hash1(&self, ix: i32) -> usize {
        self.perm[(ix & MASK) as usize] as usize
    }

    #[inline]
    fn hash2(&self, ix: i32, iy: i32) -> usize {
        self.perm[self.hash1(ix) + (iy & MASK) as usize] as usize
    }

    #[inline]
    fn hash3(&self, ix: i32, iy: i32, iz: i32) -> usize {
        self.perm[self.hash2(ix, iy) + (iz & MASK) as usize] as usize
    }

    // -----------------------------------------------------------------------
    // Value noise
    // -----------------------------------------------------------------------

    /// 1D value noise.
    pub fn sample1(&self, x: f32) -> f32 {
        let (x0, fx) = split(x);
        let sx = smoothstep(fx);
        lerp(
            self.values[self.hash1(x0)],
            self.values[self.hash1(x0.wrapping_add(1))],
            sx,
        )
        .min(MAX_BELOW_ONE)
    }

    /// 2D value noise: smoothstep-weighted bilinear blend of lattice values.
    pub fn sample2(&self, x: f32, y: f32) -> f32 {
        let (x0, fx) = split(x);
        let (y0, fy) = split(y);
        let (x1, y1) = (x0.wrapping_add(1), y0.wrapping_add(1));
        let (sx, sy) = (smoothstep(fx), smoothstep(fy));

        let v00 = self.values[self.hash2(x0, y0)];
        let v10 = self.values[self.hash2(x1, y0)];
        let v01 = self.values[self.hash2(x0, y1)];
        let v11 = self.values[self.hash2(x1, y1)];

        lerp(lerp(v00, v10, sx), lerp(v01, v11, sx), sy).min(MAX_BELOW_ONE)
    }

    /// 3D value noise.
    pub fn sample3(&self, x: f32, y: f32, z: f32) -> f32 {
        let (x0, fx) = split(x);
        let (y0, fy) = split(y);
        let (z0, fz) = split(z);
        let (x1, y1, z1) = (x0.wrapping_add(1), y0.wrapping_add(1), z0.wrapping_add(1));
        let (sx, sy, sz) = (smoothstep(fx), smoothstep(fy), smoothstep(fz));

        let v = |ix, iy, iz| self.values[self.hash3(ix, iy, iz)];
        let front = lerp(
            lerp(v(x0, y0, z0), v(x1, y0, z0), sx),
            lerp(v(x0, y1, z0), v(x1, y1, z0), sx),
            sy,
        );
        let back = lerp(
            lerp(v(x0, y0, z1), v(x1, y0, z1), sx),
            lerp(v(x0, y1, z1), v(x1, y1, z1), sx),
            sy,
        );
        lerp(front, back, sz).min(MAX_BELOW_ONE)
    }

    // -----------------------------------------------------------------------
    // Gradient noise
    // -----------------------------------------------------------------------

    /// 2D Perlin gradient noise, remapped from `[-1, 1]` to `[0, 1)`.
    pub fn perlin2(&self, x: f32, y: f32) -> f32 {
        let (x0, fx) = split(x);
        let (y0, fy) = split(y);
        let (x1, y1) = (x0.wrapping_add(1), y0.wrapping_add(1));
        let (u, v) = (fade(fx), fade(fy));

        let dot = |ix, iy, dx: f32, dy: f32| {
            let (gx, gy) = self.gradients[self.hash2(ix, iy)];
            gx * dx + gy * dy
        };

        let d00 = dot(x0, y0, fx, fy);
        let d10 = dot(x1, y0, fx - 1.0, fy);
        let d01 = dot(x0, y1, fx, fy - 1.0);
        let d11 = dot(x1, y1, fx - 1.0, fy - 1.0);

        let result = lerp(lerp(d00, d10, u), lerp(d01, d11, u), v);
        ((result + 1.0) * 0.5).clamp(0.0, MAX_BELOW_ONE)
    }

    // -----------------------------------------------------------------------
    // Fractal sums
    // -----------------------------------------------------------------------

    /// Sum `octaves` layers of [`Noise::sample2`], each at double the
    /// frequency and half the amplitude of the last, normalised back to
    /// `[0, 1)`. Zero octaves is treated as one.
    pub fn fractal2(&self, x: f32, y: f32, octaves: u32) -> f32 {
        octave_sum(octaves, |freq| self.sample2(x * freq, y * freq))
    }

    /// [`Noise::fractal2`] over [`Noise::perlin2`].
    pub fn fractal_perlin2(&self, x: f32, y: f32, octaves: u32) -> f32 {
        octave_sum(octaves, |freq| self.perlin2(x * freq, y * freq))
    }

    // -----------------------------------------------------------------------
    // Grid sampling
    // -----------------------------------------------------------------------

    /// Sample a `width × height` lattice row-major at
    /// `(x * scale + offset.0, y * scale + offset.1)`.
    pub fn grid2(&self, width: u32, height: u32, scale: f32, offset: (f32, f32)) -> Vec<f32> {
        self.grid_with(width, height, scale, offset, |x, y| self.sample2(x, y))
    }

    /// [`Noise::grid2`] over [`Noise::perlin2`].
    pub fn perlin_grid2(&self, width: u32, height: u32, scale: f32, offset: (f32, f32)) -> Vec<f32> {
        self.grid_with(width, height, scale, offset, |x, y| self.perlin2(x, y))
    }

    fn grid_with(
        &self,
        width: u32,
        height: u32,
        scale: f32,
        (ox, oy): (f32, f32),
        sample: impl Fn(f32, f32) -> f32,
    ) -> Vec<f32> {
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let ny = y as f32 * scale + oy;
            for x in 0..width {
                out.push(sample(x as f32 * scale + ox, ny));
            }
        }
        out
    }
}

/// Largest `f32` strictly below 1.0.
const MAX_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

fn octave_sum(octaves: u32, sample: impl Fn(f32) -> f32) -> f32 {
    let mut total = 0.0;
    let mut norm = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    for _ in 0..octaves.max(1) {
        total += sample(frequency) * amplitude;
        norm += amplitude;
        amplitude *= 0.5;
        frequency *= 2.0;
    }
    (total / norm).min(MAX_BELOW_ONE)
}

/// Lattice cell and fractional offset within it.
#[inline]
fn split(v: f32) -> (i32, f32) {
    let cell = v.floor();
    (cell as i32, v - cell)
}

#[inline]
fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Perlin's quintic fade, `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn domain() -> impl Iterator<Item = (f32, f32)> {
        (0..40).flat_map(|i| (0..40).map(move |j| (i as f32 * 0.37 - 5.0, j as f32 * 0.29 - 3.0)))
    }

    #[test]
    fn same_seed_same_output() {
        let a = Noise::new(7);
        let b = Noise::new(7);
        for (x, y) in domain() {
            assert_eq!(a.sample2(x, y), b.sample2(x, y));
            assert_eq!(a.sample2(x, y), a.sample2(x, y));
            assert_eq!(a.perlin2(x, y), b.perlin2(x, y));
        }
    }

    #[test]
    fn seed_changes_output() {
        let a = Noise::new(1);
        let b = Noise::new(2);
        assert!(domain().any(|(x, y)| a.sample2(x, y) != b.sample2(x, y)));
        assert!(domain().any(|(x, y)| a.perlin2(x, y) != b.perlin2(x, y)));
        assert!((0..100).any(|i| a.sample1(i as f32 * 0.3) != b.sample1(i as f32 * 0.3)));
    }

    #[test]
    fn reseed_matches_fresh_instance() {
        let mut n = Noise::default();
        assert_eq!(n.seed(), DEFAULT_SEED);
        n.reseed(99);
        let fresh = Noise::new(99);
        assert_eq!(n.seed(), 99);
        for (x, y) in domain() {
            assert_eq!(n.sample2(x, y), fresh.sample2(x, y));
        }
    }

    #[test]
    fn outputs_stay_in_unit_interval() {
        let n = Noise::new(3);
        for (x, y) in domain() {
            for v in [
                n.sample1(x),
                n.sample2(x, y),
                n.sample3(x, y, x - y),
                n.perlin2(x, y),
                n.fractal2(x, y, 5),
                n.fractal_perlin2(x, y, 5),
            ] {
                assert!((0.0..1.0).contains(&v), "{v} out of range at ({x}, {y})");
            }
        }
    }

    #[test]
    fn value_noise_hits_table_values_on_lattice() {
        let n = Noise::new(11);
        for i in -3..3 {
            for j in -3..3 {
                let expected = n.values[n.hash2(i, j)];
                assert_eq!(n.sample2(i as f32, j as f32), expected);
            }
        }
    }

    #[test]
    fn perlin_is_one_half_on_lattice() {
        let n = Noise::new(5);
        for i in -4..4 {
            assert!((n.perlin2(i as f32, 2.0) - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn samplers_are_continuous() {
        let n = Noise::new(8);
        let step = 1e-3;
        for (x, y) in domain() {
            assert!((n.sample2(x, y) - n.sample2(x + step, y)).abs() < 0.01);
            assert!((n.perlin2(x, y) - n.perlin2(x, y + step)).abs() < 0.01);
            assert!((n.sample1(x) - n.sample1(x + step)).abs() < 0.01);
            assert!((n.sample3(x, y, 0.5) - n.sample3(x, y, 0.5 + step)).abs() < 0.01);
        }
    }

    #[test]
    fn lattice_tiles_every_256_units() {
        let n = Noise::new(13);
        assert_eq!(n.sample2(1.25, 2.5), n.sample2(1.25 + 256.0, 2.5));
    }

    #[test]
    fn single_octave_fractal_equals_base_sample() {
        let n = Noise::new(21);
        for (x, y) in domain().take(50) {
            assert_eq!(n.fractal2(x, y, 1), n.sample2(x, y));
            assert_eq!(n.fractal2(x, y, 0), n.sample2(x, y));
        }
    }

    #[test]
    fn fractal_is_weighted_octave_sum() {
        let n = Noise::new(4);
        let (x, y) = (3.3, 1.7);
        let expected = (n.sample2(x, y) + 0.5 * n.sample2(2.0 * x, 2.0 * y)
            + 0.25 * n.sample2(4.0 * x, 4.0 * y))
            / 1.75;
        assert!((n.fractal2(x, y, 3) - expected).abs() < 1e-6);
    }

    #[test]
    fn grid_matches_scalar_sampling() {
        let n = Noise::new(42);
        let (w, h, scale, off) = (13, 7, 0.05, (0.3, -2.0));
        let grid = n.grid2(w, h, scale, off);
        let pgrid = n.perlin_grid2(w, h, scale, off);
        assert_eq!(grid.len(), (w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                let (nx, ny) = (x as f32 * scale + off.0, y as f32 * scale + off.1);
                let i = (y * w + x) as usize;
                assert_eq!(grid[i], n.sample2(nx, ny));
                assert_eq!(pgrid[i], n.perlin2(nx, ny));
            }
        }
    }

    #[test]
    fn permutation_is_a_permutation() {
        let n = Noise::new(77);
        let mut seen = [false; TABLE_SIZE];
        for &p in &n.perm[..TABLE_SIZE] {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(n.perm[..TABLE_SIZE], n.perm[TABLE_SIZE..]);
    }

    #[test]
    fn tables_follow_seeded_chacha_stream() {
        let n = Noise::new(9);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut expected: Vec<u8> = (0..=255).collect();
        expected.shuffle(&mut rng);
        assert_eq!(n.perm[..TABLE_SIZE], expected[..]);
        for v in n.values {
            assert_eq!(v, rng.random::<f32>());
            assert!((0.0..1.0).contains(&v));
        }
    }
}
