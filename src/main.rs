mod animation;
mod audio;
mod background;
mod diagnostics;
mod error;
mod options;
mod registry;
mod render;
mod settings;
mod snapshot;
mod task;
mod time_source;
mod timezones;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::animation::{AnimationLoop, FrameContext};
use crate::audio::output::SynthOutput;
use crate::audio::synth::DEFAULT_SAMPLE_RATE;
use crate::options::{BackgroundMode, Theme};
use crate::registry::ClockRegistry;
use crate::settings::{StartupSettings, load_settings};
use crate::time_source::{parse_timezone, select_source};
use crate::timezones::{local_timezone_id, timezone_catalog};

const DIAGNOSTICS_DEFAULT_FPS: u16 = 60;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliBackground {
    Off,
    Gradient,
    Particles,
}

impl From<CliBackground> for BackgroundMode {
    fn from(value: CliBackground) -> Self {
        match value {
            CliBackground::Off => BackgroundMode::Off,
            CliBackground::Gradient => BackgroundMode::Gradient,
            CliBackground::Particles => BackgroundMode::Particles,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliTheme {
    Dark,
    Light,
    Pastel,
}

impl From<CliTheme> for Theme {
    fn from(value: CliTheme) -> Self {
        match value {
            CliTheme::Dark => Theme::Dark,
            CliTheme::Light => Theme::Light,
            CliTheme::Pastel => Theme::Pastel,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "worldclock",
    version,
    about = "Analog and digital clocks for several timezones at once"
)]
struct Cli {
    /// IANA timezone for an initial clock. Repeat for more clocks.
    #[arg(long = "tz", value_name = "ID")]
    timezones: Vec<String>,

    /// JSON startup settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    #[arg(long)]
    hour12: bool,

    #[arg(long)]
    hide_seconds: bool,

    #[arg(long)]
    tick: bool,

    #[arg(long)]
    chime: bool,

    #[arg(long)]
    volume: Option<f32>,

    #[arg(long, value_enum)]
    background: Option<CliBackground>,

    #[arg(long, value_enum)]
    theme: Option<CliTheme>,

    /// Pin the clock to a fixed RFC 3339 instant.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Print one rendered frame and exit.
    #[arg(long)]
    snapshot: bool,

    #[arg(long)]
    diagnostics: bool,

    /// Render target; omit to follow the display refresh.
    #[arg(long)]
    fps: Option<u16>,

    #[arg(long)]
    list_timezones: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Some(volume) = cli.volume
        && !(0.0..=1.0).contains(&volume)
    {
        bail!("--volume must be between 0.0 and 1.0");
    }
    if cli.fps == Some(0) {
        bail!("--fps must be greater than zero");
    }

    if cli.list_timezones {
        for zone in timezone_catalog() {
            println!("{zone}");
        }
        return Ok(());
    }

    let mut startup = match &cli.settings {
        Some(path) => load_settings(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => StartupSettings::default(),
    };
    apply_overrides(&cli, &mut startup);

    let local_zone_id = local_timezone_id();
    let local_zone = parse_timezone(&local_zone_id)?;
    let selected = select_source(cli.at);
    let registry = build_registry(&cli, &startup, &local_zone_id);
    info!(
        source = selected.label,
        local_zone = %local_zone_id,
        clocks = registry.len(),
        "worldclock starting"
    );

    if cli.diagnostics {
        diagnostics::run_diagnostics(
            &selected,
            local_zone,
            &startup.display,
            cli.fps.unwrap_or(DIAGNOSTICS_DEFAULT_FPS),
        );
        return Ok(());
    }

    if cli.snapshot {
        let (mut animation, _handle) = AnimationLoop::spawn(local_zone);
        let mut audio = SynthOutput::new(DEFAULT_SAMPLE_RATE);
        let context = FrameContext {
            registry: &registry,
            options: &startup.display,
        };
        if let Some(frame) = animation.run_frame(selected.source.now(), &context, &mut audio) {
            print!(
                "{}",
                snapshot::format_snapshot(&frame, &registry, &startup.display)
            );
        }
        return Ok(());
    }

    ui::app::run_gui(ui::app::GuiConfig {
        source: selected,
        registry,
        options: startup.display,
        local_zone,
        render_fps: cli.fps,
    })
}

fn apply_overrides(cli: &Cli, startup: &mut StartupSettings) {
    let display = &mut startup.display;
    if cli.hour12 {
        display.use_24_hour = false;
    }
    if cli.hide_seconds {
        display.show_seconds = false;
    }
    if cli.tick {
        display.tick_enabled = true;
    }
    if cli.chime {
        display.chime_enabled = true;
    }
    if let Some(volume) = cli.volume {
        display.set_tick_volume(volume);
    }
    if let Some(background) = cli.background {
        display.background = background.into();
    }
    if let Some(theme) = cli.theme {
        display.theme = theme.into();
    }
}

// Command-line zones win over the settings file; with neither, the local
// zone and UTC.
fn build_registry(cli: &Cli, startup: &StartupSettings, local_zone_id: &str) -> ClockRegistry {
    let mut registry = ClockRegistry::new();
    if !cli.timezones.is_empty() {
        for zone in &cli.timezones {
            registry.add(zone.trim());
        }
    } else if !startup.clocks.is_empty() {
        for clock in &startup.clocks {
            match &clock.label {
                Some(label) => registry.add_labeled(clock.timezone_id.as_str(), label.as_str()),
                None => registry.add(clock.timezone_id.as_str()),
            };
        }
    } else {
        registry.add(local_zone_id);
        registry.add("UTC");
    }
    registry
}
