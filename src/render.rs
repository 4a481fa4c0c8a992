use crate::options::DisplayOptions;
use crate::time_source::TimeFields;

/// Hand angles in degrees, clockwise from 12 o'clock, plus the readouts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockFace {
    pub hour_angle_deg: f64,
    pub minute_angle_deg: f64,
    pub second_angle_deg: f64,
    pub digital_text: String,
    pub date_text: String,
}

pub fn render(fields: &TimeFields, options: &DisplayOptions) -> ClockFace {
    let hour = f64::from(fields.hour24 % 12);
    let minute = f64::from(fields.minute);
    let second = f64::from(fields.second);

    ClockFace {
        hour_angle_deg: ((hour + minute / 60.0 + second / 3600.0) / 12.0) * 360.0,
        minute_angle_deg: ((minute + second / 60.0) / 60.0) * 360.0,
        second_angle_deg: (second / 60.0) * 360.0,
        digital_text: format_digital(fields, options),
        date_text: fields.calendar_date.clone(),
    }
}

pub fn display_hour(hour24: u32, use_24_hour: bool) -> u32 {
    if use_24_hour {
        hour24
    } else {
        ((hour24 + 11) % 12) + 1
    }
}

fn format_digital(fields: &TimeFields, options: &DisplayOptions) -> String {
    let hour = display_hour(fields.hour24, options.use_24_hour);
    if options.show_seconds {
        format!("{hour:02}:{:02}:{:02}", fields.minute, fields.second)
    } else {
        format!("{hour:02}:{:02}", fields.minute)
    }
}

/// Readout used when an entry cannot be rendered this frame.
pub fn placeholder_text(options: &DisplayOptions) -> &'static str {
    if options.show_seconds {
        "--:--:--"
    } else {
        "--:--"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(hour24: u32, minute: u32, second: u32) -> TimeFields {
        TimeFields {
            hour24,
            minute,
            second,
            calendar_date: "2024-01-01".to_string(),
        }
    }

    #[test]
    fn top_of_hour_has_no_fractional_hour_angle() {
        let options = DisplayOptions::default();
        for hour in 0..24 {
            let face = render(&fields(hour, 0, 0), &options);
            assert_eq!(face.hour_angle_deg, f64::from(hour % 12) / 12.0 * 360.0);
        }
    }

    #[test]
    fn second_angle_increases_and_wraps() {
        let options = DisplayOptions::default();
        let angles: Vec<f64> = (0..60)
            .map(|second| render(&fields(3, 0, second), &options).second_angle_deg)
            .collect();
        assert!(angles.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(angles[0], 0.0);
        assert!(angles[59] < 360.0);
    }

    #[test]
    fn hands_advance_continuously() {
        let face = render(&fields(3, 30, 30), &DisplayOptions::default());
        assert_eq!(face.second_angle_deg, 180.0);
        assert!((face.minute_angle_deg - 183.0).abs() < 1e-9);
        assert!((face.hour_angle_deg - 105.25).abs() < 1e-9);
    }

    #[test]
    fn twelve_hour_remap() {
        assert_eq!(display_hour(0, false), 12);
        assert_eq!(display_hour(12, false), 12);
        assert_eq!(display_hour(13, false), 1);
        assert_eq!(display_hour(23, false), 11);
        assert_eq!(display_hour(23, true), 23);
    }

    #[test]
    fn digital_text_respects_options() {
        let mut options = DisplayOptions::default();
        let sample = fields(13, 5, 9);
        assert_eq!(render(&sample, &options).digital_text, "13:05:09");

        options.use_24_hour = false;
        assert_eq!(render(&sample, &options).digital_text, "01:05:09");

        options.show_seconds = false;
        assert_eq!(render(&sample, &options).digital_text, "01:05");
        assert_eq!(placeholder_text(&options), "--:--");
    }

    #[test]
    fn date_text_is_passed_through() {
        let face = render(&fields(0, 0, 0), &DisplayOptions::default());
        assert_eq!(face.date_text, "2024-01-01");
    }
}
