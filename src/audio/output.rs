use std::collections::VecDeque;

use crate::audio::cue::CueRequest;
use crate::audio::synth::{render_cue, samples_for};
use crate::error::ClockError;

pub trait AudioOutput {
    fn is_available(&self) -> bool;
    fn play(&mut self, cue: &CueRequest) -> Result<(), ClockError>;
}

const MAX_PENDING_SECS: f32 = 4.0;

/// Software mixer that starts locked. Until `unlock` is called every cue is
/// refused with `AudioUnavailable`; afterwards cues are rendered and mixed
/// into a pending buffer that the host drains at playback speed.
pub struct SynthOutput {
    sample_rate: u32,
    unlocked: bool,
    pending: VecDeque<f32>,
    max_pending: usize,
}

impl SynthOutput {
    pub fn new(sample_rate: u32) -> Self {
        let max_pending = samples_for(MAX_PENDING_SECS, sample_rate);
        Self {
            sample_rate,
            unlocked: false,
            pending: VecDeque::with_capacity(max_pending),
            max_pending,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns true only on the call that actually unlocked the output.
    pub fn unlock(&mut self) -> bool {
        if self.unlocked {
            return false;
        }
        self.unlocked = true;
        tracing::info!(sample_rate = self.sample_rate, "audio output unlocked");
        true
    }

    pub fn pending_samples(&self) -> usize {
        self.pending.len()
    }

    /// Moves up to `out.len()` mixed samples into `out`, zero-filling the
    /// rest. Returns how many real samples were written.
    pub fn drain_into(&mut self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.pending.len());
        for (slot, sample) in out.iter_mut().zip(self.pending.drain(..count)) {
            *slot = sample;
        }
        for slot in out.iter_mut().skip(count) {
            *slot = 0.0;
        }
        count
    }
}

impl AudioOutput for SynthOutput {
    fn is_available(&self) -> bool {
        self.unlocked
    }

    fn play(&mut self, cue: &CueRequest) -> Result<(), ClockError> {
        if !self.unlocked {
            return Err(ClockError::AudioUnavailable(
                "waiting for a user gesture to unlock audio",
            ));
        }

        let offset = samples_for(cue.start_offset_secs, self.sample_rate);
        let samples = render_cue(cue, self.sample_rate);
        let end = (offset + samples.len()).min(self.max_pending);
        if self.pending.len() < end {
            self.pending.resize(end, 0.0);
        }
        for (index, sample) in samples.into_iter().enumerate() {
            let Some(slot) = self.pending.get_mut(offset + index) else {
                break;
            };
            *slot += sample;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue::{chime_cues, tick_cue};

    #[test]
    fn locked_output_refuses_cues() {
        let mut output = SynthOutput::new(8_000);
        assert!(!output.is_available());
        let err = output.play(&tick_cue(1.0)).expect_err("locked");
        assert!(matches!(err, ClockError::AudioUnavailable(_)));
        assert_eq!(output.pending_samples(), 0);
    }

    #[test]
    fn unlock_reports_first_transition_only() {
        let mut output = SynthOutput::new(8_000);
        assert!(output.unlock());
        assert!(!output.unlock());
        assert!(output.is_available());
    }

    #[test]
    fn chime_notes_are_mixed_at_their_offsets() {
        let mut output = SynthOutput::new(8_000);
        output.unlock();
        for note in chime_cues(1.0) {
            output.play(&note).expect("play");
        }
        let last = chime_cues(1.0)[2];
        let expected =
            samples_for(last.start_offset_secs, 8_000) + samples_for(last.duration_secs, 8_000);
        assert_eq!(output.pending_samples(), expected);
    }

    #[test]
    fn pending_buffer_is_bounded() {
        let mut output = SynthOutput::new(8_000);
        output.unlock();
        let mut long = tick_cue(1.0);
        long.duration_secs = 10.0;
        output.play(&long).expect("play");
        assert_eq!(output.pending_samples(), samples_for(MAX_PENDING_SECS, 8_000));
    }

    #[test]
    fn drain_zero_fills_past_pending() {
        let mut output = SynthOutput::new(8_000);
        output.unlock();
        output.play(&tick_cue(1.0)).expect("play");
        let pending = output.pending_samples();
        let mut buffer = vec![1.0_f32; pending + 10];
        assert_eq!(output.drain_into(&mut buffer), pending);
        assert!(buffer[pending..].iter().all(|sample| *sample == 0.0));
        assert_eq!(output.pending_samples(), 0);
    }

    #[test]
    fn drained_tick_stays_within_its_gain() {
        let mut output = SynthOutput::new(8_000);
        output.unlock();
        output.play(&tick_cue(1.0)).expect("play");
        let mut buffer = vec![0.0_f32; output.pending_samples()];
        output.drain_into(&mut buffer);
        let peak = buffer.iter().fold(0.0_f32, |peak, sample| peak.max(sample.abs()));
        assert!(peak > 0.0 && peak <= 0.0007 + f32::EPSILON);
    }
}
