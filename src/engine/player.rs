//! Real-time audio playback using cpal

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, Device, SampleFormat, Stream, StreamConfig};
use log::{error, info, warn};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::Engine;

/// Failures opening the audio backend
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no output device available")]
    NoDevice,

    #[error("output device '{0}' not found")]
    DeviceNotFound(String),

    #[error("unsupported sample format {0:?}")]
    UnsupportedFormat(SampleFormat),

    #[error("failed to enumerate devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),

    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
}

/// An open output stream fed from a shared [`Engine`]
///
/// The stream runs for the player's whole lifetime; the engine decides
/// whether it produces sound. Dropping the player closes the stream.
pub struct Player {
    stream: Option<Stream>,
    device_name: String,
    sample_rate: u32,
}

impl Player {
    /// Open the named output device (or the default one) and start streaming
    ///
    /// The engine's sample rate is switched to the device's rate.
    pub fn open(
        engine: Arc<Mutex<Engine>>,
        device_name: Option<&str>,
        buffer_size: usize,
    ) -> Result<Self, AudioError> {
        let device = find_device(device_name)?;
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

        let supported = device.default_output_config()?;
        let sample_format = supported.sample_format();
        let mut config: StreamConfig = supported.into();
        config.buffer_size = BufferSize::Fixed(buffer_size as u32);

        if let Ok(mut eng) = engine.lock() {
            eng.set_sample_rate(config.sample_rate.0 as f64);
        }

        let stream = match sample_format {
            SampleFormat::F32 => build_stream::<f32>(&device, &config, engine.clone()),
            SampleFormat::I16 => build_stream::<i16>(&device, &config, engine.clone()),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, engine.clone()),
            other => return Err(AudioError::UnsupportedFormat(other)),
        };

        // Some backends reject a fixed buffer size; retry with their default
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                warn!("fixed buffer of {} frames rejected ({}), using device default", buffer_size, e);
                config.buffer_size = BufferSize::Default;
                match sample_format {
                    SampleFormat::F32 => build_stream::<f32>(&device, &config, engine)?,
                    SampleFormat::I16 => build_stream::<i16>(&device, &config, engine)?,
                    _ => build_stream::<u16>(&device, &config, engine)?,
                }
            }
        };

        stream.play()?;
        info!(
            "audio output open on '{}' ({} Hz, {} ch)",
            name, config.sample_rate.0, config.channels
        );

        Ok(Self {
            stream: Some(stream),
            device_name: name,
            sample_rate: config.sample_rate.0,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Close the output stream
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            info!("audio output closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.close();
    }
}

fn find_device(name: Option<&str>) -> Result<Device, AudioError> {
    let host = cpal::default_host();
    match name {
        Some(wanted) => host
            .output_devices()?
            .find(|d| d.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| AudioError::DeviceNotFound(wanted.to_string())),
        None => host.default_output_device().ok_or(AudioError::NoDevice),
    }
}

fn build_stream<T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>>(
    device: &Device,
    config: &StreamConfig,
    engine: Arc<Mutex<Engine>>,
) -> Result<Stream, AudioError> {
    let channels = config.channels as usize;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if let Ok(mut eng) = engine.try_lock() {
                for frame in data.chunks_mut(channels) {
                    let sample = T::from_sample(eng.process() as f32);
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = sample;
                    }
                }
            } else {
                // UI thread holds the engine; skip this buffer
                for sample in data.iter_mut() {
                    *sample = T::from_sample(0.0f32);
                }
            }
        },
        |err| {
            error!("audio stream error: {}", err);
        },
        None,
    )?;

    Ok(stream)
}

/// Get the default output device name
pub fn default_device_name() -> Option<String> {
    let host = cpal::default_host();
    host.default_output_device().and_then(|d| d.name().ok())
}

/// List output devices with their default sample rate and channel count
pub fn list_output_devices() -> Result<Vec<(String, u32, u16)>, AudioError> {
    let host = cpal::default_host();
    let mut devices = Vec::new();

    for device in host.output_devices()? {
        let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        if let Ok(config) = device.default_output_config() {
            devices.push((name, config.sample_rate().0, config.channels()));
        }
    }

    Ok(devices)
}
