//! WAV file recorder
//!
//! Renders the engine's output to mono WAV files.

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use super::Engine;
use crate::config::BitDepth;

/// WAV file recorder
pub struct Recorder {
    writer: WavWriter<BufWriter<File>>,
    bit_depth: BitDepth,
    sample_rate: u32,
    frames_written: u64,
    peak: f32,
}

impl Recorder {
    /// Create a new recorder
    ///
    /// # Arguments
    /// * `path` - Output file path
    /// * `sample_rate` - Sample rate in Hz
    /// * `bit_depth` - Sample format written to the file
    pub fn new(path: &Path, sample_rate: u32, bit_depth: BitDepth) -> Result<Self> {
        let spec = match bit_depth {
            BitDepth::Float32 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 32,
                sample_format: SampleFormat::Float,
            },
            BitDepth::Int16 => WavSpec {
                channels: 1,
                sample_rate,
                bits_per_sample: 16,
                sample_format: SampleFormat::Int,
            },
        };

        let writer = WavWriter::create(path, spec)
            .with_context(|| format!("failed to create WAV file: {:?}", path))?;

        Ok(Self {
            writer,
            bit_depth,
            sample_rate,
            frames_written: 0,
            peak: 0.0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Largest absolute sample value written so far
    pub fn peak(&self) -> f32 {
        self.peak
    }

    /// Get the duration recorded in seconds
    pub fn duration_secs(&self) -> f64 {
        self.frames_written as f64 / self.sample_rate as f64
    }

    /// Write a single sample, clipping to -1.0..1.0 for integer output
    pub fn write_sample(&mut self, sample: f32) -> Result<()> {
        self.peak = self.peak.max(sample.abs());
        let written = match self.bit_depth {
            BitDepth::Float32 => self.writer.write_sample(sample),
            BitDepth::Int16 => {
                let scaled = (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16;
                self.writer.write_sample(scaled)
            }
        };
        written.context("failed to write sample")?;
        self.frames_written += 1;
        Ok(())
    }

    /// Write a buffer of samples
    pub fn write_buffer(&mut self, buffer: &[f32]) -> Result<()> {
        for &sample in buffer {
            self.write_sample(sample)?;
        }
        Ok(())
    }

    /// Finalize the WAV file
    ///
    /// This must be called to properly close the file and write the header.
    pub fn finalize(self) -> Result<()> {
        self.writer.finalize().context("failed to finalize WAV file")
    }
}

/// What a render produced
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSummary {
    pub frames: u64,
    pub duration_secs: f64,
    pub peak: f32,
}

/// Render `duration_secs` of the engine's output into a WAV file
///
/// The engine is started for the render and stopped afterwards. `progress`
/// is called once per rendered second with the seconds done so far.
pub fn render_to_wav(
    engine: &mut Engine,
    path: &Path,
    duration_secs: f64,
    bit_depth: BitDepth,
    progress: impl FnMut(u64),
) -> Result<RenderSummary> {
    let sample_rate = engine.sample_rate().round() as u32;
    let total = (sample_rate as f64 * duration_secs.max(0.0)).round() as usize;
    let mut recorder = Recorder::new(path, sample_rate, bit_depth)?;

    render_chunks(engine, total, sample_rate as usize, progress, |chunk| {
        recorder.write_buffer(chunk)
    })?;

    let summary = RenderSummary {
        frames: recorder.frames_written(),
        duration_secs: recorder.duration_secs(),
        peak: recorder.peak(),
    };
    recorder.finalize()?;
    info!("rendered {:.2}s to {:?}", summary.duration_secs, path);

    Ok(summary)
}

/// Run the engine for `total` frames, handing `chunk_len` frames at a time to
/// `sink`. The engine is stopped again whether or not the sink fails.
fn render_chunks(
    engine: &mut Engine,
    total: usize,
    chunk_len: usize,
    mut progress: impl FnMut(u64),
    mut sink: impl FnMut(&[f32]) -> Result<()>,
) -> Result<()> {
    let mut buffer = vec![0.0f32; chunk_len.max(1)];
    let mut remaining = total;
    let mut chunks = 0;

    engine.start();
    let result = loop {
        if remaining == 0 {
            break Ok(());
        }
        let chunk = remaining.min(buffer.len());
        engine.fill_buffer(&mut buffer[..chunk]);
        if let Err(e) = sink(&buffer[..chunk]) {
            break Err(e);
        }
        remaining -= chunk;
        chunks += 1;
        progress(chunks);
    };
    engine.stop();

    result
}
