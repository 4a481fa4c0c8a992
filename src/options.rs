use serde::Deserialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    Off,
    Gradient,
    #[default]
    Particles,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Pastel,
}

/// Shared display settings. Only settings actions write them; both frame
/// loops read them.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplayOptions {
    pub use_24_hour: bool,
    pub show_seconds: bool,
    pub tick_enabled: bool,
    pub chime_enabled: bool,
    tick_volume: f32,
    pub background: BackgroundMode,
    pub theme: Theme,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            use_24_hour: true,
            show_seconds: true,
            tick_enabled: false,
            chime_enabled: false,
            tick_volume: 0.5,
            background: BackgroundMode::default(),
            theme: Theme::default(),
        }
    }
}

impl DisplayOptions {
    pub fn tick_volume(&self) -> f32 {
        self.tick_volume
    }

    /// Clamps into `0.0..=1.0`; NaN is treated as silence.
    pub fn set_tick_volume(&mut self, volume: f32) {
        self.tick_volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }
}
