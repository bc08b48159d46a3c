use std::path::Path;
use std::process;

use anyhow::{bail, Context, Result};

use kanvas::{image::PngWriter, sketches, SketchConfig};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const LIST_USAGE: &str = "kanvas list";
const RUN_USAGE: &str = "kanvas run <sketch> [--size WxH] [--fps N] [--title T] [--config path]";
const RENDER_USAGE: &str =
    "kanvas render <sketch> <ticks> <output.png> [--size WxH] [--fps N] [--title T] [--config path]";
const VERSION_USAGE: &str = "kanvas version";

fn run() -> Result<()> {
    let mut args = std::env::args().skip(1);

    match args.next().as_deref() {
        Some("list") => {
            list();
            Ok(())
        }
        Some("run") => {
            let name = args.next().context(RUN_USAGE)?;
            let config = session_config(&name, args.collect())?;
            let mut sketch = lookup(&name)?;
            kanvas::run(&mut sketch, &config)
        }
        Some("render") => {
            let name = args.next().context(RENDER_USAGE)?;
            let ticks = args.next().context(RENDER_USAGE)?;
            let ticks: u64 = ticks
                .parse()
                .with_context(|| format!("Invalid tick count '{ticks}'"))?;
            let output = args.next().context(RENDER_USAGE)?;
            let config = session_config(&name, args.collect())?;
            render(&name, ticks, Path::new(&output), &config)
        }
        Some("version") => {
            println!("kanvas {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => bail!(
            "kanvas: creative coding in the terminal\n\nUsage:\n  {LIST_USAGE}\n  {RUN_USAGE}\n  {RENDER_USAGE}\n  {VERSION_USAGE}"
        ),
    }
}

fn list() {
    let width = sketches::CATALOG.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, about) in sketches::CATALOG {
        println!("  {name:<width$}  {about}");
    }
}

fn lookup(name: &str) -> Result<Box<dyn kanvas::Sketch>> {
    match sketches::by_name(name) {
        Some(sketch) => Ok(sketch),
        None => bail!("Unknown sketch '{name}' (try `kanvas list`)"),
    }
}

fn render(name: &str, ticks: u64, output: &Path, config: &SketchConfig) -> Result<()> {
    let mut sketch = lookup(name)?;
    let surface = kanvas::render_headless(&mut sketch, config, ticks)?;
    PngWriter::save_to(&surface, output)?;
    eprintln!(
        "Rendered {ticks} ticks of {name} ({}x{}) -> {}",
        surface.width(),
        surface.height(),
        output.display(),
    );
    Ok(())
}

/// Start from the user config (or `--config`), then apply flag overrides.
/// The title defaults to the sketch name.
fn session_config(name: &str, flags: Vec<String>) -> Result<SketchConfig> {
    let mut flags = flags.into_iter();
    let mut config: Option<SketchConfig> = None;
    let mut size = None;
    let mut fps = None;
    let mut title = None;

    while let Some(flag) = flags.next() {
        let value = flags
            .next()
            .with_context(|| format!("Missing value for {flag}"))?;
        match flag.as_str() {
            "--size" => size = Some(parse_size(&value)?),
            "--fps" => {
                fps = Some(
                    value
                        .parse::<f64>()
                        .with_context(|| format!("Invalid frame rate '{value}'"))?,
                )
            }
            "--title" => title = Some(value),
            "--config" => config = Some(SketchConfig::load_from(&value)?),
            _ => bail!("Unknown flag '{flag}'"),
        }
    }

    let mut config = config.unwrap_or_else(|| SketchConfig {
        title: name.to_string(),
        ..SketchConfig::load()
    });
    if let Some((width, height)) = size {
        config.width = width;
        config.height = height;
    }
    if let Some(fps) = fps {
        config.target_fps = fps;
    }
    if let Some(title) = title {
        config.title = title;
    }
    config.validate()?;
    Ok(config)
}

fn parse_size(value: &str) -> Result<(u32, u32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .with_context(|| format!("Invalid size '{value}', expected WxH"))?;
    let width = w.parse().with_context(|| format!("Invalid width '{w}'"))?;
    let height = h.parse().with_context(|| format!("Invalid height '{h}'"))?;
    Ok((width, height))
}
