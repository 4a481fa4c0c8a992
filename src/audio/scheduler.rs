use crate::audio::cue::{chime_cues, tick_cue};
use crate::audio::output::AudioOutput;
use crate::options::DisplayOptions;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct CueOutcome {
    pub ticks: usize,
    pub chimes: usize,
    pub dropped: usize,
}

/// Edge-triggered tick plus level-triggered chime, evaluated against one
/// shared clock sample.
///
/// The tick fires when the second differs from the last ticked second and
/// then records it, so any number of evaluations inside one second yield a
/// single tick. The chime has no memory: it fires on every evaluation made
/// during second 0 of minute 0. Callers that evaluate once per display
/// refresh will hear it repeated for that whole second.
///
/// Clock discontinuities are not detected. A jump that lands on the second
/// last ticked produces no tick for that second.
#[derive(Debug, Default)]
pub struct AudioScheduler {
    last_tick_second: Option<u32>,
}

impl AudioScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_tick_second(&self) -> Option<u32> {
        self.last_tick_second
    }

    pub fn evaluate(
        &mut self,
        minute: u32,
        second: u32,
        options: &DisplayOptions,
        output: &mut dyn AudioOutput,
    ) -> CueOutcome {
        let mut outcome = CueOutcome::default();
        let volume = options.tick_volume();

        if options.tick_enabled && self.last_tick_second != Some(second) {
            self.last_tick_second = Some(second);
            outcome.ticks += 1;
            if let Err(err) = output.play(&tick_cue(volume)) {
                tracing::trace!(%err, second, "tick dropped");
                outcome.dropped += 1;
            }
        }

        if options.chime_enabled && minute == 0 && second == 0 {
            outcome.chimes += 1;
            for note in chime_cues(volume) {
                if let Err(err) = output.play(&note) {
                    tracing::trace!(%err, "chime note dropped");
                    outcome.dropped += 1;
                }
            }
        }

        outcome
    }
}
