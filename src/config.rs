use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::scheduler::frame_period;

/// Startup parameters for one sketch session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    pub width: u32,
    pub height: u32,
    pub target_fps: f64,
    /// Passed through to the display; also the base name of saved frames.
    pub title: String,
    pub output_dir: PathBuf,
    pub key_bindings: KeyBindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: String,
    pub quit_alt: String,
    pub save: String,
    pub toggle_loop: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            quit: "q".into(),
            quit_alt: "Esc".into(),
            save: "s".into(),
            toggle_loop: "Space".into(),
        }
    }
}

impl Default for SketchConfig {
    fn default() -> Self {
        SketchConfig {
            width: 640,
            height: 360,
            target_fps: 60.0,
            title: "kanvas".into(),
            output_dir: PathBuf::from("output"),
            key_bindings: KeyBindings::default(),
        }
    }
}

impl SketchConfig {
    /// Load the user config, falling back to defaults when it is missing or
    /// unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid config at {} ({e}), using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Load an explicitly named config file. Unlike [`SketchConfig::load`],
    /// any problem is an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            bail!("Canvas size must be positive, got {}x{}", self.width, self.height);
        }
        frame_period(self.target_fps)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("kanvas");
        path.push("config.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire while Ctrl or Alt is held.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }

    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_are_valid() {
        let c = SketchConfig::default();
        assert_eq!((c.width, c.height), (640, 360));
        assert_eq!(c.target_fps, 60.0);
        assert_eq!(c.title, "kanvas");
        c.validate().unwrap();
    }

    #[test]
    fn validate_rejects_bad_sizes_and_rates() {
        for (w, h, fps) in [(0, 10, 60.0), (10, 0, 60.0), (10, 10, 0.0), (10, 10, -1.0), (10, 10, f64::NAN), (10, 10, 1e-30)] {
            let c = SketchConfig {
                width: w,
                height: h,
                target_fps: fps,
                ..SketchConfig::default()
            };
            assert!(c.validate().is_err(), "{w}x{h}@{fps}");
        }
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: SketchConfig =
            serde_json::from_str(r#"{"width": 320, "key_bindings": {"save": "Ctrl-s"}}"#).unwrap();
        assert_eq!(c.width, 320);
        assert_eq!(c.height, 360);
        assert_eq!(c.key_bindings.save, "Ctrl-s");
        assert_eq!(c.key_bindings.quit, "q");
    }

    #[test]
    fn load_from_reports_missing_file() {
        let err = SketchConfig::load_from("/definitely/not/here.json").unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read"));
    }

    #[test]
    fn load_from_reads_file() {
        let path = std::env::temp_dir().join(format!("kanvas-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"title": "Orbit", "target_fps": 30}"#).unwrap();
        let c = SketchConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(c.title, "Orbit");
        assert_eq!(c.target_fps, 30.0);
    }

    #[test]
    fn plain_bindings() {
        assert!(matches_binding("q", &key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(matches_binding("Esc", &key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(matches_binding("Space", &key(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(matches_binding("F5", &key(KeyCode::F(5), KeyModifiers::NONE)));
        assert!(!matches_binding("q", &key(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn plain_binding_ignores_modified_keys() {
        assert!(!matches_binding("s", &key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!matches_binding("s", &key(KeyCode::Char('s'), KeyModifiers::ALT)));
    }

    #[test]
    fn modifier_bindings() {
        assert!(matches_binding("Ctrl-s", &key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!matches_binding("Ctrl-s", &key(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(matches_binding("Alt-Enter", &key(KeyCode::Enter, KeyModifiers::ALT)));
    }

    #[test]
    fn multi_char_names_do_not_match_first_letter() {
        assert!(!matches_binding("Quit", &key(KeyCode::Char('Q'), KeyModifiers::NONE)));
    }
}
