use std::time::{Duration, Instant};

use anyhow::Result;
use chrono_tz::Tz;
use eframe::egui::{
    self, Align, Color32, ComboBox, Layout, ProgressBar, RichText, ScrollArea, Sense, TextEdit,
    TopBottomPanel, Ui, vec2,
};

use crate::animation::{AnimationLoop, FrameContext, FrameOutput};
use crate::audio::playback::Playback;
use crate::background::{BackgroundAnimator, Viewport};
use crate::diagnostics::FrameStats;
use crate::error::ClockError;
use crate::options::{BackgroundMode, DisplayOptions, Theme};
use crate::registry::{ClockEntry, ClockId, ClockRegistry};
use crate::render::{ClockFace, placeholder_text};
use crate::task::TaskHandle;
use crate::time_source::SelectedTimeSource;
use crate::timezones::{POPULAR_TIMEZONES, timezone_catalog};
use crate::ui::backdrop::paint_background;
use crate::ui::face::paint_face;
use crate::ui::theme::{Palette, configure_theme, palette};

const CARD_WIDTH: f32 = 240.0;
const FACE_SIZE: f32 = 180.0;
// Peak of a full-volume chime note, used to scale the level meter.
const LEVEL_FULL_SCALE: f32 = 0.02;

pub struct GuiConfig {
    pub source: SelectedTimeSource,
    pub registry: ClockRegistry,
    pub options: DisplayOptions,
    pub local_zone: Tz,
    pub render_fps: Option<u16>,
}

pub fn run_gui(config: GuiConfig) -> Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("World Clock")
            .with_inner_size([1120.0, 720.0])
            .with_min_inner_size([560.0, 420.0]),
        ..Default::default()
    };

    let app = WorldClockApp::new(config);

    eframe::run_native(
        "World Clock",
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|err| anyhow::anyhow!("failed to launch World Clock window: {err}"))?;

    Ok(())
}

enum CardAction {
    Relabel(ClockId, String),
    Retune(ClockId, String),
    Remove(ClockId),
}

struct WorldClockApp {
    source: SelectedTimeSource,
    registry: ClockRegistry,
    options: DisplayOptions,
    local_zone: Tz,
    catalog: Vec<&'static str>,
    animation: AnimationLoop,
    background: BackgroundAnimator,
    // Dropping these stops both loops when the window goes away.
    _animation_handle: TaskHandle,
    _background_handle: TaskHandle,
    audio: Playback,
    audio_level: f32,
    dropped_cues: usize,
    applied_theme: Option<Theme>,
    started: Instant,
    render_step: Option<Duration>,
    render_stats: FrameStats,
    last_render_done: Option<Instant>,
    show_settings: bool,
    status_message: Option<(String, Instant)>,
}

impl WorldClockApp {
    fn new(config: GuiConfig) -> Self {
        let (animation, animation_handle) = AnimationLoop::spawn(config.local_zone);
        let (background, background_handle) = BackgroundAnimator::spawn(config.options.background);
        let render_step = config
            .render_fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps.max(1))));
        Self {
            source: config.source,
            registry: config.registry,
            options: config.options,
            local_zone: config.local_zone,
            catalog: timezone_catalog(),
            animation,
            background,
            _animation_handle: animation_handle,
            _background_handle: background_handle,
            audio: Playback::new(),
            audio_level: 0.0,
            dropped_cues: 0,
            applied_theme: None,
            started: Instant::now(),
            render_step,
            render_stats: FrameStats::new(120, render_step.unwrap_or(Duration::from_millis(17))),
            last_render_done: None,
            show_settings: false,
            status_message: None,
        }
    }

    fn set_status(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status_message = Some((text.into(), Instant::now() + ttl));
    }

    fn record_render_frame(&mut self) -> Duration {
        let done = Instant::now();
        let delta = self
            .last_render_done
            .map(|previous| done.saturating_duration_since(previous))
            .unwrap_or_default();
        if self.last_render_done.is_some() {
            self.render_stats.record_frame(delta);
        }
        self.last_render_done = Some(done);
        delta
    }

    fn update_audio_level(&mut self, since_last_frame: Duration) {
        let peak = self.audio.take_level(since_last_frame);
        self.audio_level = (peak / LEVEL_FULL_SCALE).clamp(0.0, 1.0);
    }

    fn apply_actions(&mut self, actions: Vec<CardAction>) {
        for action in actions {
            match action {
                CardAction::Relabel(id, label) => {
                    self.registry.set_label(id, label);
                }
                CardAction::Retune(id, timezone_id) => {
                    self.registry.set_timezone(id, timezone_id);
                }
                CardAction::Remove(id) => {
                    if let Some(removed) = self.registry.remove(id) {
                        self.set_status(
                            format!("Removed clock '{}'.", removed.display_label()),
                            Duration::from_secs(3),
                        );
                    }
                }
            }
        }
    }

    fn show_header(&mut self, ui: &mut Ui, colors: &Palette) {
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new("World Clock")
                    .size(24.0)
                    .color(colors.accent)
                    .strong(),
            );
            ui.separator();
            if ui.button("Add Clock").clicked() {
                let entry = self.registry.add(self.local_zone.name());
                self.set_status(
                    format!("Added clock for {}.", entry.timezone_id),
                    Duration::from_secs(2),
                );
            }
            if ui
                .button(if self.show_settings {
                    "Hide Settings"
                } else {
                    "Settings"
                })
                .clicked()
            {
                self.show_settings = !self.show_settings;
            }
            if let Some((msg, _)) = &self.status_message {
                ui.separator();
                ui.label(RichText::new(msg).color(colors.accent));
            }
        });
    }

    fn show_settings_panel(&mut self, ui: &mut Ui) {
        ui.heading(RichText::new("Settings").strong());
        ui.separator();

        ComboBox::from_label("Theme")
            .selected_text(theme_name(self.options.theme))
            .show_ui(ui, |ui| {
                for theme in [Theme::Dark, Theme::Light, Theme::Pastel] {
                    ui.selectable_value(&mut self.options.theme, theme, theme_name(theme));
                }
            });
        ComboBox::from_label("Background")
            .selected_text(background_name(self.options.background))
            .show_ui(ui, |ui| {
                for mode in [
                    BackgroundMode::Off,
                    BackgroundMode::Gradient,
                    BackgroundMode::Particles,
                ] {
                    ui.selectable_value(&mut self.options.background, mode, background_name(mode));
                }
            });

        ui.add_space(6.0);
        ui.checkbox(&mut self.options.use_24_hour, "24-hour time");
        ui.checkbox(&mut self.options.show_seconds, "Show seconds");

        ui.separator();
        ui.label(RichText::new("Sound").strong());
        ui.checkbox(&mut self.options.tick_enabled, "Tick every second");
        ui.checkbox(&mut self.options.chime_enabled, "Chime on the hour");
        let mut volume = self.options.tick_volume();
        if ui
            .add(egui::Slider::new(&mut volume, 0.0..=1.0).text("Volume"))
            .changed()
        {
            self.options.set_tick_volume(volume);
        }
        if self.audio.is_unlocked() {
            ui.add(ProgressBar::new(self.audio_level).desired_width(180.0).text("Output level"));
            let device = self.audio.device_name().unwrap_or("none, level meter only");
            ui.label(RichText::new(format!("Device: {device}")).size(12.0));
            ui.label(
                RichText::new(format!("Queued: {} ms", self.audio.queued().as_millis())).size(12.0),
            );
        } else {
            ui.label(
                RichText::new("Audio starts after the first click in the window.")
                    .color(Color32::from_rgb(255, 183, 95)),
            );
        }
    }

    fn show_clocks(&mut self, ui: &mut Ui, frame: Option<&FrameOutput>, colors: &Palette) {
        let mut actions = Vec::new();
        if self.registry.is_empty() {
            ui.label(RichText::new("No clocks. Use \"Add Clock\" to create one.").strong());
        }
        ScrollArea::vertical()
            .id_salt("clocks_scroll")
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    for entry in self.registry.all() {
                        let face = frame.and_then(|output| output.face(entry.id));
                        show_card(
                            ui,
                            entry,
                            face,
                            &self.options,
                            &self.catalog,
                            colors,
                            &mut actions,
                        );
                    }
                });
            });
        self.apply_actions(actions);
    }
}

fn show_card(
    ui: &mut Ui,
    entry: &ClockEntry,
    face: Option<&Result<ClockFace, ClockError>>,
    options: &DisplayOptions,
    catalog: &[&'static str],
    colors: &Palette,
    actions: &mut Vec<CardAction>,
) {
    egui::Frame::group(ui.style())
        .fill(colors.card)
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.with_layout(Layout::top_down(Align::Center), |ui| {
                let mut label = entry.label.clone();
                if ui
                    .add(
                        TextEdit::singleline(&mut label)
                            .hint_text(entry.timezone_id.as_str())
                            .desired_width(CARD_WIDTH - 16.0),
                    )
                    .changed()
                {
                    actions.push(CardAction::Relabel(entry.id, label));
                }

                let mut selected = entry.timezone_id.clone();
                ComboBox::from_id_salt(("timezone", entry.id))
                    .selected_text(selected.clone())
                    .width(CARD_WIDTH - 16.0)
                    .height(320.0)
                    .show_ui(ui, |ui| {
                        for zone in POPULAR_TIMEZONES {
                            ui.selectable_value(&mut selected, zone.to_string(), zone);
                        }
                        ui.separator();
                        for zone in catalog {
                            ui.selectable_value(&mut selected, zone.to_string(), *zone);
                        }
                    });
                if selected != entry.timezone_id {
                    actions.push(CardAction::Retune(entry.id, selected));
                }

                let (rect, _) = ui.allocate_exact_size(vec2(FACE_SIZE, FACE_SIZE), Sense::hover());
                let rendered = face.and_then(|result| result.as_ref().ok());
                paint_face(ui.painter(), rect, rendered, colors);

                match face {
                    Some(Ok(face)) => {
                        ui.label(RichText::new(&face.digital_text).size(30.0).strong().monospace());
                        ui.label(RichText::new(&face.date_text).size(14.0));
                    }
                    Some(Err(err)) => {
                        ui.label(
                            RichText::new(placeholder_text(options))
                                .size(30.0)
                                .strong()
                                .monospace(),
                        );
                        ui.label(
                            RichText::new(err.to_string())
                                .size(12.0)
                                .color(Color32::from_rgb(255, 124, 124)),
                        );
                    }
                    None => {
                        ui.label(RichText::new(placeholder_text(options)).size(30.0).monospace());
                    }
                }

                if ui
                    .add(
                        egui::Button::new(
                            RichText::new("Remove").color(Color32::from_rgb(255, 124, 124)),
                        )
                        .fill(Color32::from_rgba_unmultiplied(51, 20, 24, 160)),
                    )
                    .clicked()
                {
                    actions.push(CardAction::Remove(entry.id));
                }
            });
        });
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "Dark",
        Theme::Light => "Light",
        Theme::Pastel => "Pastel",
    }
}

fn background_name(mode: BackgroundMode) -> &'static str {
    match mode {
        BackgroundMode::Off => "Off",
        BackgroundMode::Gradient => "Gradient",
        BackgroundMode::Particles => "Particles",
    }
}

impl eframe::App for WorldClockApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self
            .status_message
            .as_ref()
            .is_some_and(|(_, expires_at)| Instant::now() >= *expires_at)
        {
            self.status_message = None;
        }

        if ctx.input(|input| input.pointer.any_pressed()) && self.audio.unlock() {
            self.set_status("Audio enabled.", Duration::from_secs(2));
        }

        if self.applied_theme != Some(self.options.theme) {
            configure_theme(ctx, self.options.theme);
            self.applied_theme = Some(self.options.theme);
        }
        let colors = palette(self.options.theme);

        let screen = ctx.screen_rect();
        let viewport = Viewport {
            width: screen.width(),
            height: screen.height(),
            pixels_per_point: ctx.pixels_per_point(),
        };
        if let Some(background) =
            self.background
                .step(self.options.background, viewport, self.started.elapsed())
        {
            let painter = ctx.layer_painter(egui::LayerId::background());
            paint_background(&painter, screen, &background);
        }

        let instant = self.source.source.now();
        let frame = self.animation.run_frame(
            instant,
            &FrameContext {
                registry: &self.registry,
                options: &self.options,
            },
            &mut self.audio,
        );
        if let Some(output) = &frame {
            self.dropped_cues += output.cues.dropped;
        }
        let since_last_frame = self.record_render_frame();
        self.update_audio_level(since_last_frame);

        TopBottomPanel::top("header")
            .resizable(false)
            .show(ctx, |ui| self.show_header(ui, &colors));

        TopBottomPanel::bottom("footer")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        RichText::new(format!(
                            "Source: {} | Clocks: {} | Frames: {} | Render FPS {:.0}/{:.0}",
                            self.source.label,
                            self.registry.len(),
                            self.animation.frames_run(),
                            self.render_stats.instant_fps(),
                            self.render_stats.rolling_fps(),
                        ))
                        .color(colors.fg.gamma_multiply(0.7)),
                    );
                    if self.dropped_cues > 0 {
                        ui.separator();
                        ui.label(
                            RichText::new(format!("Dropped cues: {}", self.dropped_cues))
                                .color(colors.fg.gamma_multiply(0.7)),
                        );
                    }
                    let cued = frame
                        .as_ref()
                        .is_some_and(|output| output.cues.ticks > 0 || output.cues.chimes > 0);
                    if cued {
                        ui.separator();
                        ui.label(RichText::new("\u{266a}").color(colors.accent));
                    }
                });
            });

        if self.show_settings {
            egui::SidePanel::right("settings_panel")
                .resizable(true)
                .min_width(260.0)
                .default_width(300.0)
                .frame(egui::Frame::side_top_panel(&ctx.style()).fill(colors.bg1))
                .show(ctx, |ui| self.show_settings_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().inner_margin(12.0))
            .show(ctx, |ui| self.show_clocks(ui, frame.as_ref(), &colors));

        match self.render_step {
            Some(step) => ctx.request_repaint_after(step),
            None => ctx.request_repaint(),
        }
    }
}
