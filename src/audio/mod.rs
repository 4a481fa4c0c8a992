pub mod cue;
#[cfg(feature = "sound")]
pub mod device;
pub mod output;
pub mod playback;
pub mod scheduler;
pub mod synth;
