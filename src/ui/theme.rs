use eframe::egui::{self, Color32};

use crate::options::Theme;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    pub bg1: Color32,
    pub bg2: Color32,
    pub card: Color32,
    pub fg: Color32,
    pub accent: Color32,
    pub dark: bool,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            bg1: Color32::from_rgb(0x0f, 0x17, 0x24),
            bg2: Color32::from_rgb(0x07, 0x10, 0x32),
            card: Color32::from_rgba_unmultiplied(255, 255, 255, 8),
            fg: Color32::from_rgb(0xe6, 0xee, 0xf8),
            accent: Color32::from_rgb(0xff, 0xd1, 0x66),
            dark: true,
        },
        Theme::Light => Palette {
            bg1: Color32::from_rgb(0xe6, 0xf0, 0xff),
            bg2: Color32::from_rgb(0xf7, 0xfb, 0xff),
            card: Color32::from_rgba_unmultiplied(0, 0, 0, 10),
            fg: Color32::from_rgb(0x06, 0x29, 0x3a),
            accent: Color32::from_rgb(0x2b, 0x9e, 0xb3),
            dark: false,
        },
        Theme::Pastel => Palette {
            bg1: Color32::from_rgb(0xff, 0xec, 0xf1),
            bg2: Color32::from_rgb(0xea, 0xf7, 0xff),
            card: Color32::from_rgba_unmultiplied(255, 255, 255, 128),
            fg: Color32::from_rgb(0x24, 0x3b, 0x4a),
            accent: Color32::from_rgb(0xff, 0x6b, 0x6b),
            dark: false,
        },
    }
}

/// Panels are left unfilled so the background animation shows through.
pub fn configure_theme(ctx: &egui::Context, theme: Theme) {
    let colors = palette(theme);
    let mut visuals = if colors.dark {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    };
    visuals.override_text_color = Some(colors.fg);
    visuals.panel_fill = Color32::TRANSPARENT;
    visuals.window_fill = colors.bg1;
    visuals.extreme_bg_color = colors.bg2;
    visuals.widgets.noninteractive.bg_fill = colors.card;
    visuals.selection.bg_fill = colors.accent;
    visuals.hyperlink_color = colors.accent;
    ctx.set_visuals(visuals);
}
