use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::options::{BackgroundMode, DisplayOptions, Theme};

/// Startup configuration read from an optional JSON file. The file is only
/// ever read; clocks and settings changed at runtime are not written back.
#[derive(Debug, Clone, Default)]
pub struct StartupSettings {
    pub display: DisplayOptions,
    pub clocks: Vec<ClockSpec>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ClockSpec {
    pub timezone_id: String,
    pub label: Option<String>,
}

pub fn load_settings(path: &Path) -> Result<StartupSettings> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read settings file {}", path.display()))?;
    parse_settings_text(&content)
}

pub fn parse_settings_text(content: &str) -> Result<StartupSettings> {
    let raw = serde_json::from_str::<SettingsFile>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;

    if raw.version != 1 {
        bail!(
            "unsupported settings version {}; expected version 1",
            raw.version
        );
    }
    if !(0.0..=1.0).contains(&raw.display.tick_volume) {
        bail!(
            "tick_volume {} out of range; expected 0.0 to 1.0",
            raw.display.tick_volume
        );
    }

    let mut clocks = Vec::with_capacity(raw.clocks.len());
    for clock in raw.clocks {
        let timezone_id = clock.timezone.trim().to_string();
        if timezone_id.is_empty() {
            bail!("clock entries need a non-empty timezone");
        }
        clocks.push(ClockSpec {
            timezone_id,
            label: clock.label.filter(|label| !label.trim().is_empty()),
        });
    }

    let mut display = DisplayOptions::default();
    display.use_24_hour = raw.display.use_24_hour;
    display.show_seconds = raw.display.show_seconds;
    display.tick_enabled = raw.display.tick_enabled;
    display.chime_enabled = raw.display.chime_enabled;
    display.background = raw.display.background;
    display.theme = raw.display.theme;
    display.set_tick_volume(raw.display.tick_volume);

    Ok(StartupSettings { display, clocks })
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    version: u32,
    #[serde(default)]
    display: DisplayFile,
    #[serde(default)]
    clocks: Vec<ClockFile>,
}

#[derive(Debug, Deserialize)]
struct DisplayFile {
    #[serde(default = "default_true")]
    use_24_hour: bool,
    #[serde(default = "default_true")]
    show_seconds: bool,
    #[serde(default)]
    tick_enabled: bool,
    #[serde(default)]
    chime_enabled: bool,
    #[serde(default = "default_tick_volume")]
    tick_volume: f32,
    #[serde(default)]
    background: BackgroundMode,
    #[serde(default)]
    theme: Theme,
}

impl Default for DisplayFile {
    fn default() -> Self {
        Self {
            use_24_hour: true,
            show_seconds: true,
            tick_enabled: false,
            chime_enabled: false,
            tick_volume: default_tick_volume(),
            background: BackgroundMode::default(),
            theme: Theme::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClockFile {
    timezone: String,
    #[serde(default)]
    label: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_tick_volume() -> f32 {
    0.5
}
