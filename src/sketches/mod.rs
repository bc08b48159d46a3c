//! Bundled sketches.
//!
//! Each sketch lives in its own module with its state and `Sketch`
//! implementation side by side.

mod fractal_tree;
mod noise_field;
mod noise_flow;
mod orbit;
mod oscillating_line;
mod shapes;

pub use fractal_tree::FractalTree;
pub use noise_field::NoiseField;
pub use noise_flow::NoiseFlow;
pub use orbit::Orbit;
pub use oscillating_line::OscillatingLine;
pub use shapes::Shapes;

use crate::scheduler::Sketch;

/// Name and one-line description of every bundled sketch.
pub const CATALOG: &[(&str, &str)] = &[
    ("orbit", "five colored circles orbiting the center"),
    ("noise-field", "static value noise (left) beside Perlin noise (right)"),
    ("noise-flow", "a strip of Perlin noise drifting sideways"),
    ("oscillating-line", "a yellow line swaying up and down"),
    ("shapes", "outline line, rectangle and circle"),
    ("fractal-tree", "a recursive tree that sways with the frame count"),
];

pub fn by_name(name: &str) -> Option<Box<dyn Sketch>> {
    let sketch: Box<dyn Sketch> = match name {
        "orbit" => Box::new(Orbit),
        "noise-field" => Box::new(NoiseField::default()),
        "noise-flow" => Box::new(NoiseFlow::default()),
        "oscillating-line" => Box::new(OscillatingLine),
        "shapes" => Box::new(Shapes),
        "fractal-tree" => Box::new(FractalTree::default()),
        _ => return None,
    };
    Some(sketch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::HeadlessDisplay;
    use crate::image::ImageWriter;
    use crate::scheduler::Scheduler;
    use crate::surface::Surface;
    use anyhow::Result;
    use std::path::PathBuf;
    use test_log::test;

    struct NoSave;

    impl ImageWriter for NoSave {
        fn save(&mut self, _surface: &Surface, _name: &str) -> Result<PathBuf> {
            anyhow::bail!("saving disabled")
        }
    }

    #[test]
    fn every_catalog_entry_resolves() {
        for (name, _) in CATALOG {
            assert!(by_name(name).is_some(), "{name}");
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn every_sketch_draws_something() {
        for (name, _) in CATALOG {
            let mut sketch = by_name(name).unwrap();
            let mut surface = Surface::new(120, 90).unwrap();
            let mut display = HeadlessDisplay::new().with_tick_limit(3);
            let mut scheduler = Scheduler::new(1000.0).unwrap();
            scheduler
                .run(&mut sketch, &mut surface, &mut display, &mut NoSave)
                .unwrap();
            assert!(
                surface.pixels().iter().any(|p| *p != [0, 0, 0]),
                "{name} left the surface black"
            );
        }
    }
}
