use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, pos2};

use crate::render::ClockFace;
use crate::ui::theme::Palette;

const SECOND_HAND: Color32 = Color32::from_rgb(255, 106, 106);

/// Screen position of a hand tip. Angles run clockwise from 12 o'clock and
/// screen y grows downwards.
pub fn hand_tip(center: Pos2, length: f32, angle_deg: f64) -> Pos2 {
    let radians = angle_deg.to_radians() as f32;
    pos2(
        center.x + length * radians.sin(),
        center.y - length * radians.cos(),
    )
}

/// Dial, hour marks and, when the frame produced one, the three hands.
pub fn paint_face(painter: &Painter, rect: Rect, face: Option<&ClockFace>, colors: &Palette) {
    let center = rect.center();
    let radius = rect.width().min(rect.height()) * 0.5 - 2.0;

    painter.circle_filled(center, radius, colors.card);
    painter.circle_stroke(center, radius, Stroke::new(2.0, colors.fg.gamma_multiply(0.6)));

    for mark in 0..12 {
        let angle = f64::from(mark) * 30.0;
        let inner = if mark % 3 == 0 { 0.78 } else { 0.86 };
        painter.line_segment(
            [
                hand_tip(center, radius * inner, angle),
                hand_tip(center, radius * 0.94, angle),
            ],
            Stroke::new(if mark % 3 == 0 { 2.5 } else { 1.2 }, colors.fg),
        );
    }

    let Some(face) = face else {
        return;
    };

    painter.line_segment(
        [center, hand_tip(center, radius * 0.5, face.hour_angle_deg)],
        Stroke::new(4.0, colors.fg),
    );
    painter.line_segment(
        [center, hand_tip(center, radius * 0.75, face.minute_angle_deg)],
        Stroke::new(2.5, colors.fg),
    );
    painter.line_segment(
        [center, hand_tip(center, radius * 0.88, face.second_angle_deg)],
        Stroke::new(1.2, SECOND_HAND),
    );
    painter.circle_filled(center, 3.5, colors.accent);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Pos2, b: Pos2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn hand_tips_follow_the_dial() {
        let center = pos2(100.0, 100.0);
        assert!(close(hand_tip(center, 10.0, 0.0), pos2(100.0, 90.0)));
        assert!(close(hand_tip(center, 10.0, 90.0), pos2(110.0, 100.0)));
        assert!(close(hand_tip(center, 10.0, 180.0), pos2(100.0, 110.0)));
        assert!(close(hand_tip(center, 10.0, 270.0), pos2(90.0, 100.0)));
    }
}
