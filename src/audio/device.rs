use anyhow::{Context, Result, bail};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};

use crate::audio::output::SynthOutput;
use crate::audio::playback::{PeakMeter, SharedMixer, lock_mixer};

/// Default output device playing the shared mono mix on every channel.
/// Dropping it stops the stream.
pub struct DeviceStream {
    _stream: Stream,
    pub name: String,
    pub sample_rate: u32,
}

impl DeviceStream {
    /// Resets the mixer to the device rate, so call it before the mixer is
    /// unlocked and holds anything.
    pub fn open(mixer: SharedMixer, meter: PeakMeter) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no default audio output device")?;
        let name = device.name().unwrap_or_else(|_| "unnamed device".to_string());
        let supported = device
            .default_output_config()
            .with_context(|| format!("unable to query output config of {name}"))?;
        let format = supported.sample_format();
        let config = supported.config();
        let sample_rate = config.sample_rate.0;
        *lock_mixer(&mixer) = SynthOutput::new(sample_rate);

        let stream = match format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer, meter)?,
            SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer, meter)?,
            SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer, meter)?,
            other => bail!("unsupported sample format {other:?} on {name}"),
        };
        stream
            .play()
            .with_context(|| format!("unable to start audio stream on {name}"))?;

        Ok(Self {
            _stream: stream,
            name,
            sample_rate,
        })
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    mixer: SharedMixer,
    meter: PeakMeter,
) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels.max(1));
    let mut mono = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                mono.resize(data.len() / channels, 0.0);
                lock_mixer(&mixer).drain_into(&mut mono);
                meter.record(&mono);
                for (frame, sample) in data.chunks_mut(channels).zip(&mono) {
                    frame.fill(T::from_sample(*sample));
                }
            },
            |err| tracing::warn!(%err, "audio stream error"),
            None,
        )
        .context("unable to build audio output stream")
}
