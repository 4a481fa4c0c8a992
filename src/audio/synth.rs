//! Oscillator rendering for cue requests.

use std::f32::consts::TAU;

use crate::audio::cue::{CueRequest, Waveform};

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

// Linear ramp at both ends so notes start and stop without a click.
const EDGE_RAMP_SECS: f32 = 0.002;

pub fn samples_for(secs: f32, sample_rate: u32) -> usize {
    (secs.max(0.0) * sample_rate as f32).round() as usize
}

/// Renders one cue to mono PCM, excluding its start offset.
pub fn render_cue(cue: &CueRequest, sample_rate: u32) -> Vec<f32> {
    let len = samples_for(cue.duration_secs, sample_rate);
    let ramp = samples_for(EDGE_RAMP_SECS, sample_rate).clamp(1, (len / 2).max(1));
    let phase_step = cue.frequency_hz / sample_rate as f32;

    let mut phase = 0.0_f32;
    let mut samples = Vec::with_capacity(len);
    for index in 0..len {
        let raw = match cue.waveform {
            Waveform::Sine => (phase * TAU).sin(),
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        };
        let from_edge = index.min(len - 1 - index);
        let envelope = (from_edge as f32 / ramp as f32).min(1.0);
        samples.push(raw * cue.gain * envelope);

        phase += phase_step;
        if phase >= 1.0 {
            phase -= 1.0;
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue::{chime_cues, tick_cue};

    #[test]
    fn rendered_length_matches_duration() {
        let samples = render_cue(&tick_cue(1.0), 48_000);
        assert_eq!(samples.len(), 960);
    }

    #[test]
    fn amplitude_never_exceeds_gain() {
        for cue in chime_cues(1.0).iter().chain([tick_cue(1.0)].iter()) {
            let samples = render_cue(cue, DEFAULT_SAMPLE_RATE);
            let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
            assert!(peak <= cue.gain + f32::EPSILON);
            assert!(peak > 0.0);
        }
    }

    #[test]
    fn notes_start_and_end_silent() {
        let samples = render_cue(&chime_cues(1.0)[0], DEFAULT_SAMPLE_RATE);
        assert_eq!(samples.first().copied(), Some(0.0));
        assert_eq!(samples.last().copied(), Some(0.0));
    }

    #[test]
    fn zero_volume_renders_silence() {
        let samples = render_cue(&tick_cue(0.0), DEFAULT_SAMPLE_RATE);
        assert!(samples.iter().all(|sample| *sample == 0.0));
    }
}
