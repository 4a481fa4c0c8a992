use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::audio::output::AudioOutput;
use crate::audio::scheduler::{AudioScheduler, CueOutcome};
use crate::error::ClockError;
use crate::options::DisplayOptions;
use crate::registry::{ClockId, ClockRegistry};
use crate::render::{ClockFace, render};
use crate::task::{RepeatingTask, TaskHandle};
use crate::time_source::{fields_for, fields_in};

/// Everything one frame reads. Settings actions mutate the underlying
/// values between frames, never during one.
pub struct FrameContext<'a> {
    pub registry: &'a ClockRegistry,
    pub options: &'a DisplayOptions,
}

#[derive(Debug, Clone)]
pub struct ClockRender {
    pub id: ClockId,
    pub face: Result<ClockFace, ClockError>,
}

#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub instant: DateTime<Utc>,
    pub clocks: Vec<ClockRender>,
    pub cues: CueOutcome,
}

impl FrameOutput {
    pub fn face(&self, id: ClockId) -> Option<&Result<ClockFace, ClockError>> {
        self.clocks
            .iter()
            .find(|render| render.id == id)
            .map(|render| &render.face)
    }
}

/// Per-refresh clock update. One instant sample drives every registry entry
/// and the audio scheduler, whose cues follow the wall clock of `cue_zone`.
pub struct AnimationLoop {
    task: RepeatingTask,
    scheduler: AudioScheduler,
    cue_zone: Tz,
}

impl AnimationLoop {
    pub fn spawn(cue_zone: Tz) -> (Self, TaskHandle) {
        let (task, handle) = RepeatingTask::spawn("clock");
        let animation = Self {
            task,
            scheduler: AudioScheduler::new(),
            cue_zone,
        };
        (animation, handle)
    }

    /// Returns `None` once the task handle has been disposed of.
    pub fn run_frame(
        &mut self,
        instant: DateTime<Utc>,
        context: &FrameContext<'_>,
        audio: &mut dyn AudioOutput,
    ) -> Option<FrameOutput> {
        if !self.task.poll() {
            tracing::trace!(task = self.task.name(), "frame skipped after cancellation");
            return None;
        }
        Some(self.evaluate(instant, context, audio))
    }

    fn evaluate(
        &mut self,
        instant: DateTime<Utc>,
        context: &FrameContext<'_>,
        audio: &mut dyn AudioOutput,
    ) -> FrameOutput {
        let clocks = context
            .registry
            .all()
            .iter()
            .map(|entry| {
                let face = fields_for(instant, &entry.timezone_id)
                    .map(|fields| render(&fields, context.options));
                if let Err(err) = &face {
                    tracing::debug!(id = %entry.id, %err, "clock skipped this frame");
                }
                ClockRender { id: entry.id, face }
            })
            .collect();

        let wall = fields_in(instant, &self.cue_zone);
        let cues = self
            .scheduler
            .evaluate(wall.minute, wall.second, context.options, audio);

        FrameOutput {
            instant,
            clocks,
            cues,
        }
    }

    pub fn frames_run(&self) -> u64 {
        self.task.runs()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::audio::output::SynthOutput;

    fn new_year_2024() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn every_entry_is_rendered_from_one_sample() {
        let mut registry = ClockRegistry::new();
        let utc = registry.add("UTC");
        let tokyo = registry.add("Asia/Tokyo");
        let options = DisplayOptions::default();
        let (mut animation, _handle) = AnimationLoop::spawn(Tz::UTC);
        let mut audio = SynthOutput::new(8_000);

        let frame = animation
            .run_frame(
                new_year_2024(),
                &FrameContext {
                    registry: &registry,
                    options: &options,
                },
                &mut audio,
            )
            .expect("live task");

        let utc_face = frame.face(utc.id).expect("utc").as_ref().expect("face");
        assert_eq!(utc_face.digital_text, "00:00:00");
        assert_eq!(utc_face.date_text, "2024-01-01");
        let tokyo_face = frame.face(tokyo.id).expect("tokyo").as_ref().expect("face");
        assert_eq!(tokyo_face.digital_text, "09:00:00");
        assert_eq!(tokyo_face.date_text, "2024-01-01");
    }

    #[test]
    fn bad_entry_does_not_block_the_others() {
        let mut registry = ClockRegistry::new();
        let bad = registry.add("Nowhere/Special");
        let good = registry.add("UTC");
        let options = DisplayOptions::default();
        let (mut animation, _handle) = AnimationLoop::spawn(Tz::UTC);
        let mut audio = SynthOutput::new(8_000);
        let context = FrameContext {
            registry: &registry,
            options: &options,
        };

        let frame = animation
            .run_frame(new_year_2024(), &context, &mut audio)
            .expect("live task");
        assert!(matches!(
            frame.face(bad.id),
            Some(Err(ClockError::InvalidTimezone(_)))
        ));
        assert!(matches!(frame.face(good.id), Some(Ok(_))));

        let next = animation
            .run_frame(new_year_2024() + Duration::seconds(1), &context, &mut audio)
            .expect("loop keeps running");
        assert_eq!(next.clocks.len(), 2);
    }

    #[test]
    fn audio_follows_the_cue_zone_wall_clock() {
        let registry = ClockRegistry::new();
        let mut options = DisplayOptions::default();
        options.chime_enabled = true;
        let mut audio = SynthOutput::new(8_000);
        let context = FrameContext {
            registry: &registry,
            options: &options,
        };
        // 00:00:00 UTC is 05:30:00 in Kolkata: no chime there.
        let (mut kolkata, _k) = AnimationLoop::spawn(chrono_tz::Asia::Kolkata);
        let frame = kolkata
            .run_frame(new_year_2024(), &context, &mut audio)
            .expect("live");
        assert_eq!(frame.cues.chimes, 0);

        let (mut utc, _u) = AnimationLoop::spawn(Tz::UTC);
        let frame = utc
            .run_frame(new_year_2024(), &context, &mut audio)
            .expect("live");
        assert_eq!(frame.cues.chimes, 1);
        assert_eq!(frame.cues.dropped, 3);
    }

    #[test]
    fn cancelled_loop_stops_producing_frames() {
        let registry = ClockRegistry::new();
        let options = DisplayOptions::default();
        let mut audio = SynthOutput::new(8_000);
        let context = FrameContext {
            registry: &registry,
            options: &options,
        };
        let (mut animation, handle) = AnimationLoop::spawn(Tz::UTC);
        assert!(animation.run_frame(new_year_2024(), &context, &mut audio).is_some());
        handle.cancel();
        assert!(animation.run_frame(new_year_2024(), &context, &mut audio).is_none());
        assert_eq!(animation.frames_run(), 1);
    }
}
