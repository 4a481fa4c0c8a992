use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::audio::cue::CueRequest;
use crate::audio::output::{AudioOutput, SynthOutput};
use crate::audio::synth::{DEFAULT_SAMPLE_RATE, samples_for};
use crate::error::ClockError;

/// Mixer shared by the frame loop, which queues cues, and the consumer that
/// plays them.
pub type SharedMixer = Arc<Mutex<SynthOutput>>;

pub fn lock_mixer(mixer: &SharedMixer) -> MutexGuard<'_, SynthOutput> {
    mixer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Highest magnitude seen by the consumer since the last `take`. Stored as
/// f32 bits; magnitudes are never negative, so integer order is float order.
#[derive(Clone, Debug, Default)]
pub struct PeakMeter(Arc<AtomicU32>);

impl PeakMeter {
    pub fn record(&self, samples: &[f32]) {
        let peak = samples
            .iter()
            .fold(0.0_f32, |peak, sample| peak.max(sample.abs()));
        self.0.fetch_max(peak.to_bits(), Ordering::Relaxed);
    }

    pub fn take(&self) -> f32 {
        f32::from_bits(self.0.swap(0, Ordering::Relaxed))
    }
}

/// Audio path of the window. Cues go into the shared mixer. With the `sound`
/// feature the first gesture also opens the default output device, which
/// pulls the mix at its own rate. Without a device the frame loop drains the
/// mix in real time so the level meter still moves.
pub struct Playback {
    mixer: SharedMixer,
    meter: PeakMeter,
    #[cfg(feature = "sound")]
    device: Option<crate::audio::device::DeviceStream>,
    scratch: Vec<f32>,
}

impl Playback {
    pub fn new() -> Self {
        Self::with_mixer(SynthOutput::new(DEFAULT_SAMPLE_RATE))
    }

    fn with_mixer(mixer: SynthOutput) -> Self {
        Self {
            mixer: Arc::new(Mutex::new(mixer)),
            meter: PeakMeter::default(),
            #[cfg(feature = "sound")]
            device: None,
            scratch: Vec::new(),
        }
    }

    /// Handles the first user gesture. Returns true only on the call that
    /// unlocked playback.
    pub fn unlock(&mut self) -> bool {
        if self.is_unlocked() {
            return false;
        }
        #[cfg(feature = "sound")]
        self.open_device();
        lock_mixer(&self.mixer).unlock()
    }

    #[cfg(feature = "sound")]
    fn open_device(&mut self) {
        use crate::audio::device::DeviceStream;

        match DeviceStream::open(Arc::clone(&self.mixer), self.meter.clone()) {
            Ok(stream) => {
                tracing::info!(
                    device = %stream.name,
                    sample_rate = stream.sample_rate,
                    "audio device opened"
                );
                self.device = Some(stream);
            }
            Err(err) => {
                tracing::warn!("audio device unavailable, cues stay silent: {err:#}");
            }
        }
    }

    pub fn is_unlocked(&self) -> bool {
        lock_mixer(&self.mixer).is_available()
    }

    pub fn device_name(&self) -> Option<&str> {
        #[cfg(feature = "sound")]
        {
            self.device.as_ref().map(|stream| stream.name.as_str())
        }
        #[cfg(not(feature = "sound"))]
        {
            None
        }
    }

    /// Peak of what was played since the last call. `elapsed` is only used
    /// when no device is consuming the mix.
    pub fn take_level(&mut self, elapsed: Duration) -> f32 {
        if self.device_name().is_none() {
            let mut mixer = lock_mixer(&self.mixer);
            let count = samples_for(elapsed.as_secs_f32(), mixer.sample_rate());
            self.scratch.resize(count, 0.0);
            let written = mixer.drain_into(&mut self.scratch);
            self.meter.record(&self.scratch[..written]);
        }
        self.meter.take()
    }

    /// Mixed audio waiting to be played.
    pub fn queued(&self) -> Duration {
        let mixer = lock_mixer(&self.mixer);
        Duration::from_secs_f64(
            mixer.pending_samples() as f64 / f64::from(mixer.sample_rate().max(1)),
        )
    }
}

impl AudioOutput for Playback {
    fn is_available(&self) -> bool {
        self.is_unlocked()
    }

    fn play(&mut self, cue: &CueRequest) -> Result<(), ClockError> {
        lock_mixer(&self.mixer).play(cue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue::{chime_cues, tick_cue};

    #[test]
    fn meter_keeps_the_loudest_sample_until_taken() {
        let meter = PeakMeter::default();
        meter.record(&[0.1, -0.4, 0.2]);
        meter.record(&[0.3]);
        assert_eq!(meter.take(), 0.4);
        assert_eq!(meter.take(), 0.0);
    }

    #[test]
    fn locked_playback_refuses_cues() {
        let mut playback = Playback::with_mixer(SynthOutput::new(8_000));
        assert!(!playback.is_available());
        assert!(playback.play(&tick_cue(1.0)).is_err());
        assert_eq!(playback.queued(), Duration::ZERO);
    }

    #[test]
    fn unlocked_playback_queues_and_drains_in_real_time() {
        let mut playback = Playback::with_mixer(SynthOutput::new(8_000));
        assert!(playback.unlock());
        assert!(!playback.unlock());
        for note in chime_cues(1.0) {
            playback.play(&note).expect("play");
        }
        let queued = playback.queued();
        assert!(queued > Duration::from_millis(800));

        let level = playback.take_level(Duration::from_millis(100));
        assert!(level > 0.0 && level <= 0.02 + f32::EPSILON);
        assert!(playback.queued() < queued);
    }

    #[test]
    fn level_is_silent_once_the_mix_runs_dry() {
        let mut playback = Playback::with_mixer(SynthOutput::new(8_000));
        playback.unlock();
        playback.play(&tick_cue(1.0)).expect("play");
        assert!(playback.take_level(Duration::from_secs(1)) > 0.0);
        assert_eq!(playback.take_level(Duration::from_secs(1)), 0.0);
    }
}
