use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono_tz::Tz;

use crate::animation::{AnimationLoop, FrameContext};
use crate::audio::output::SynthOutput;
use crate::audio::scheduler::CueOutcome;
use crate::audio::synth::DEFAULT_SAMPLE_RATE;
use crate::options::DisplayOptions;
use crate::registry::ClockRegistry;
use crate::time_source::SelectedTimeSource;
use crate::timezones::timezone_catalog;

pub struct FrameStats {
    total_frames: u64,
    late_frames: u64,
    last_frame: Duration,
    target_frame: Duration,
    window: VecDeque<Duration>,
    window_size: usize,
}

impl FrameStats {
    pub fn new(window_size: usize, target_frame: Duration) -> Self {
        let window_size = window_size.max(1);
        Self {
            total_frames: 0,
            late_frames: 0,
            last_frame: Duration::ZERO,
            target_frame,
            window: VecDeque::with_capacity(window_size),
            window_size,
        }
    }

    pub fn record_frame(&mut self, frame_time: Duration) {
        self.total_frames += 1;
        self.last_frame = frame_time;
        if frame_time > self.target_frame {
            self.late_frames += 1;
        }
        if self.window.len() == self.window_size {
            let _ = self.window.pop_front();
        }
        self.window.push_back(frame_time);
    }

    pub fn instant_fps(&self) -> f64 {
        if self.last_frame.is_zero() {
            return 0.0;
        }
        1.0 / self.last_frame.as_secs_f64()
    }

    pub fn rolling_fps(&self) -> f64 {
        let total_secs: f64 = self.window.iter().map(Duration::as_secs_f64).sum();
        if total_secs == 0.0 {
            return 0.0;
        }
        self.window.len() as f64 / total_secs
    }

    pub fn late_frames(&self) -> u64 {
        self.late_frames
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }
}

pub fn run_diagnostics(
    selected: &SelectedTimeSource,
    local_zone: Tz,
    options: &DisplayOptions,
    fps: u16,
) {
    let target = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
    println!("worldclock diagnostics");
    println!("Selected time source: {}", selected.label);
    println!("Local timezone: {}", local_zone.name());
    println!("Timezone catalog: {} zones", timezone_catalog().len());
    println!("Requested target FPS: {fps}");

    let mut registry = ClockRegistry::new();
    for zone in ["UTC", local_zone.name(), "Asia/Tokyo", "America/New_York"] {
        registry.add(zone);
    }
    let context = FrameContext {
        registry: &registry,
        options,
    };
    let (mut animation, _handle) = AnimationLoop::spawn(local_zone);
    let mut audio = SynthOutput::new(DEFAULT_SAMPLE_RATE);
    audio.unlock();

    println!("Running 1 second frame pacing benchmark...");
    let mut stats = FrameStats::new(256, target);
    let bench_end = Instant::now() + Duration::from_secs(1);
    let mut next_frame = Instant::now() + target;
    let mut failed_entries = 0usize;
    let mut cues = CueOutcome::default();
    while Instant::now() < bench_end {
        let frame_start = Instant::now();
        if let Some(frame) = animation.run_frame(selected.source.now(), &context, &mut audio) {
            failed_entries += frame.clocks.iter().filter(|c| c.face.is_err()).count();
            cues.ticks += frame.cues.ticks;
            cues.chimes += frame.cues.chimes;
            cues.dropped += frame.cues.dropped;
        }
        sleep_until(next_frame);
        stats.record_frame(frame_start.elapsed());
        next_frame += target;
    }

    println!("Benchmark summary:");
    println!("  Frames: {}", stats.total_frames());
    println!("  Late: {}", stats.late_frames());
    println!("  Rolling FPS: {:.1}", stats.rolling_fps());
    println!("  Failed clock renders: {failed_entries}");
    println!(
        "  Cues: {} ticks, {} chimes, {} dropped",
        cues.ticks, cues.chimes, cues.dropped
    );
}

pub fn sleep_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    std::thread::sleep(deadline.saturating_duration_since(now));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_fps_averages_the_window() {
        let mut stats = FrameStats::new(4, Duration::from_millis(20));
        for _ in 0..4 {
            stats.record_frame(Duration::from_millis(10));
        }
        assert!((stats.rolling_fps() - 100.0).abs() < 1e-6);
        assert!((stats.instant_fps() - 100.0).abs() < 1e-6);
        assert_eq!(stats.late_frames(), 0);
    }

    #[test]
    fn window_drops_oldest_frames() {
        let mut stats = FrameStats::new(2, Duration::from_millis(20));
        stats.record_frame(Duration::from_millis(100));
        stats.record_frame(Duration::from_millis(10));
        stats.record_frame(Duration::from_millis(10));
        assert!((stats.rolling_fps() - 100.0).abs() < 1e-6);
        assert_eq!(stats.late_frames(), 1);
        assert_eq!(stats.total_frames(), 3);
    }

    #[test]
    fn empty_stats_report_zero() {
        let stats = FrameStats::new(8, Duration::from_millis(16));
        assert_eq!(stats.instant_fps(), 0.0);
        assert_eq!(stats.rolling_fps(), 0.0);
    }
}
