#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
}

/// One oscillator note handed to the audio output.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CueRequest {
    pub waveform: Waveform,
    pub frequency_hz: f32,
    pub gain: f32,
    pub duration_secs: f32,
    pub start_offset_secs: f32,
}

const TICK_FREQUENCY_HZ: f32 = 900.0;
const TICK_DURATION_SECS: f32 = 0.02;
const TICK_GAIN_SCALE: f32 = 0.0007;

const CHIME_BASE_FREQUENCY_HZ: f32 = 600.0;
const CHIME_STEP_HZ: f32 = 100.0;
const CHIME_NOTE_SPACING_SECS: f32 = 0.18;
const CHIME_NOTE_DURATION_SECS: f32 = 0.5;
const CHIME_GAIN_SCALE: f32 = 0.02;
const CHIME_NOTES: usize = 3;

pub fn tick_cue(volume: f32) -> CueRequest {
    CueRequest {
        waveform: Waveform::Square,
        frequency_hz: TICK_FREQUENCY_HZ,
        gain: volume * TICK_GAIN_SCALE,
        duration_secs: TICK_DURATION_SECS,
        start_offset_secs: 0.0,
    }
}

/// Descending three-note chime.
pub fn chime_cues(volume: f32) -> [CueRequest; CHIME_NOTES] {
    std::array::from_fn(|index| {
        let step = index as f32;
        CueRequest {
            waveform: Waveform::Sine,
            frequency_hz: CHIME_BASE_FREQUENCY_HZ - step * CHIME_STEP_HZ,
            gain: volume * CHIME_GAIN_SCALE,
            duration_secs: CHIME_NOTE_DURATION_SECS,
            start_offset_secs: step * CHIME_NOTE_SPACING_SECS,
        }
    })
}
