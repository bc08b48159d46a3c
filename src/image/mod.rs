//! Image writing: persists a surface to disk as PNG.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ::image::{ImageFormat, RgbImage};
use anyhow::{Context, Result};

use crate::surface::Surface;

pub trait ImageWriter {
    /// Encode and persist `surface`, returning where it went.
    fn save(&mut self, surface: &Surface, name: &str) -> Result<PathBuf>;
}

/// Writes `{name}_{unix-seconds}.png` files into one output directory.
#[derive(Debug, Clone)]
pub struct PngWriter {
    dir: PathBuf,
}

impl PngWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write PNG to an exact path, creating parent directories as needed.
    /// The extension is not consulted.
    pub fn save_to(surface: &Surface, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        to_rgb_image(surface)?
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

impl ImageWriter for PngWriter {
    fn save(&mut self, surface: &Surface, name: &str) -> Result<PathBuf> {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let path = self.dir.join(format!("{}_{stamp}.png", sanitize(name)));
        Self::save_to(surface, &path)?;
        Ok(path)
    }
}

/// Copy the surface into an `image` buffer, row-major RGB.
pub fn to_rgb_image(surface: &Surface) -> Result<RgbImage> {
    RgbImage::from_raw(
        surface.width(),
        surface.height(),
        surface.pixels().as_flattened().to_vec(),
    )
    .context("Surface buffer does not match its dimensions")
}

/// Keep ASCII letters, digits, `-` and `_`; everything else becomes `_`.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "kanvas".into()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;
    use test_log::test;

    fn scratch_dir(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("kanvas-{tag}-{}", std::process::id()))
    }

    #[test]
    fn rgb_image_mirrors_surface() {
        let mut s = Surface::new(2, 1).unwrap();
        s.set_pixel(1, 0, Color::rgb(9, 8, 7));
        let img = to_rgb_image(&s).unwrap();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [9, 8, 7]);
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize("Noise Demo: Value (L)"), "Noise_Demo__Value__L_");
        assert_eq!(sanitize("a/b"), "a_b");
        assert_eq!(sanitize(""), "kanvas");
    }

    #[test]
    fn save_creates_directory_and_png() {
        let dir = scratch_dir("save");
        let mut w = PngWriter::new(&dir);
        let mut s = Surface::new(3, 2).unwrap();
        s.set_pixel(2, 1, Color::rgb(10, 20, 30));
        let path = w.save(&s, "my sketch").unwrap();
        assert!(path.starts_with(&dir));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("my_sketch_") && name.ends_with(".png"));

        let back = ::image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(2, 1).0, [10, 20, 30]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_to_writes_png_whatever_the_extension() {
        let dir = scratch_dir("save-to");
        let path = dir.join("frame.out");
        let s = Surface::new(1, 1).unwrap();
        PngWriter::save_to(&s, &path).unwrap();
        assert!(fs::read(&path).unwrap().starts_with(b"\x89PNG\r\n\x1a\n"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn save_to_fails_when_parent_is_a_file() {
        let blocker = scratch_dir("blocker");
        fs::write(&blocker, b"x").unwrap();
        let s = Surface::new(1, 1).unwrap();
        let err = PngWriter::save_to(&s, &blocker.join("out.png")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to create"));
        fs::remove_file(&blocker).unwrap();
    }
}
