use std::fmt::Write as _;

use crate::animation::FrameOutput;
use crate::options::DisplayOptions;
use crate::registry::ClockRegistry;
use crate::render::placeholder_text;

/// Plain-text rendering of one frame, one clock per line.
pub fn format_snapshot(
    frame: &FrameOutput,
    registry: &ClockRegistry,
    options: &DisplayOptions,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "instant {}", frame.instant.to_rfc3339());
    for render in &frame.clocks {
        let Some(entry) = registry.get(render.id) else {
            continue;
        };
        match &render.face {
            Ok(face) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:<24} {} {} hands {:.2}/{:.2}/{:.2}",
                    entry.display_label(),
                    entry.timezone_id,
                    face.digital_text,
                    face.date_text,
                    face.hour_angle_deg,
                    face.minute_angle_deg,
                    face.second_angle_deg,
                );
            }
            Err(err) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:<24} {} ({err})",
                    entry.display_label(),
                    entry.timezone_id,
                    placeholder_text(options),
                );
            }
        }
    }
    out
}
