//! Microphone encoder using cpal capture and FLAC output
//!
//! Each open() starts a capture thread against the default input device.
//! Samples are buffered mono i16 at the device rate; stop() resamples them
//! to the session's sampling-rate tier and writes the FLAC file.
//!
//! The stream is confined to its own thread because cpal::Stream is not
//! Send; the handle only shares atomics and the sample buffer with it.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use rubato::{FftFixedIn, Resampler};
use tokio::time::Duration as TokioDuration;

use crate::application::ports::{AudioEncoder, EncoderError, EncoderHandle, EncoderSpec};

use super::flac::encode_to_flac;

/// Microphone encoder backed by cpal and flacenc
pub struct CpalEncoder;

impl CpalEncoder {
    /// Create a new cpal-based encoder
    pub fn new() -> Self {
        Self
    }

    /// Get the default input device
    fn get_input_device() -> Result<cpal::Device, EncoderError> {
        let host = cpal::default_host();
        host.default_input_device()
            .ok_or(EncoderError::NoAudioDevice)
    }

    /// Get a suitable input configuration, preferring the target rate
    fn get_input_config(
        device: &cpal::Device,
        target_rate: u32,
    ) -> Result<(StreamConfig, SampleFormat), EncoderError> {
        let supported_configs = device
            .supported_input_configs()
            .map_err(|e| EncoderError::StartFailed(format!("Failed to get configs: {}", e)))?;

        // Prefer mono, and configs whose range includes the target rate
        let mut best_config: Option<cpal::SupportedStreamConfigRange> = None;

        for config in supported_configs {
            // Only consider i16 or f32 formats
            if config.sample_format() != SampleFormat::I16
                && config.sample_format() != SampleFormat::F32
            {
                continue;
            }

            let includes_target = config.min_sample_rate().0 <= target_rate
                && config.max_sample_rate().0 >= target_rate;

            let is_better = match &best_config {
                None => true,
                Some(current) => {
                    let fewer_channels = config.channels() < current.channels();
                    let better_rate =
                        includes_target && current.min_sample_rate().0 > target_rate;
                    fewer_channels || better_rate
                }
            };
            if is_better {
                best_config = Some(config);
            }
        }

        let config_range = best_config.ok_or(EncoderError::StartFailed(
            "No suitable config found".into(),
        ))?;

        // Use the target sample rate if supported, otherwise the minimum
        let sample_rate = if config_range.min_sample_rate().0 <= target_rate
            && config_range.max_sample_rate().0 >= target_rate
        {
            SampleRate(target_rate)
        } else {
            config_range.min_sample_rate()
        };

        let sample_format = config_range.sample_format();
        let config = StreamConfig {
            channels: config_range.channels(),
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        Ok((config, sample_format))
    }

    /// Resample audio from the device rate to the target rate if needed
    fn resample(
        samples: &[i16],
        source_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<i16>, EncoderError> {
        if source_rate == target_rate {
            return Ok(samples.to_vec());
        }

        // Convert i16 to f32 for resampling
        let samples_f32: Vec<f32> = samples.iter().map(|&s| s as f32 / 32768.0).collect();

        // Calculate output length
        let ratio = target_rate as f64 / source_rate as f64;
        let output_len = (samples_f32.len() as f64 * ratio).ceil() as usize;

        // Use rubato for high-quality resampling
        let mut resampler = FftFixedIn::<f32>::new(
            source_rate as usize,
            target_rate as usize,
            1024, // Chunk size
            2,    // Sub-chunks
            1,    // Mono
        )
        .map_err(|e| EncoderError::WriteFailed(format!("Resampler init failed: {}", e)))?;

        let mut output = Vec::with_capacity(output_len);
        let mut input_pos = 0;

        while input_pos < samples_f32.len() {
            let frames_needed = resampler.input_frames_next();
            let end_pos = (input_pos + frames_needed).min(samples_f32.len());
            let chunk: Vec<Vec<f32>> = vec![samples_f32[input_pos..end_pos].to_vec()];

            // Pad if we don't have enough samples
            let chunk = if chunk[0].len() < frames_needed {
                let mut padded = chunk[0].clone();
                padded.resize(frames_needed, 0.0);
                vec![padded]
            } else {
                chunk
            };

            let resampled = resampler
                .process(&chunk, None)
                .map_err(|e| EncoderError::WriteFailed(format!("Resampling failed: {}", e)))?;

            output.extend(resampled[0].iter().map(|&s| (s * 32767.0) as i16));
            input_pos = end_pos;
        }

        // Trim to expected output length
        output.truncate(output_len);

        Ok(output)
    }

    /// Mix stereo to mono
    fn stereo_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels == 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|chunk| {
                let sum: i32 = chunk.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    }

    /// Resample to the session rate and write the FLAC file contents
    fn encode_session(
        samples: &[i16],
        device_rate: u32,
        target_rate: u32,
    ) -> Result<Vec<u8>, EncoderError> {
        let resampled = Self::resample(samples, device_rate, target_rate)?;
        encode_to_flac(&resampled, target_rate)
            .map_err(|e| EncoderError::WriteFailed(e.to_string()))
    }
}

impl Default for CpalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioEncoder for CpalEncoder {
    async fn open(&self, spec: EncoderSpec) -> Result<Box<dyn EncoderHandle>, EncoderError> {
        // Create the output file up front so a finalize-rename sees a file
        // even when the session captures nothing
        if let Some(parent) = spec.output_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| EncoderError::WriteFailed(e.to_string()))?;
        }
        tokio::fs::File::create(&spec.output_path)
            .await
            .map_err(|e| EncoderError::WriteFailed(e.to_string()))?;

        let audio_buffer: Arc<StdMutex<Vec<i16>>> = Arc::new(StdMutex::new(Vec::new()));
        let device_sample_rate = Arc::new(AtomicU32::new(0));
        let is_recording = Arc::new(AtomicBool::new(true));

        let target_rate = spec.sampling_rate.as_hz();
        let buffer_for_thread = Arc::clone(&audio_buffer);
        let rate_for_thread = Arc::clone(&device_sample_rate);
        let recording_for_thread = Arc::clone(&is_recording);

        // Capture thread: owns the stream until the recording flag clears
        std::thread::spawn(move || {
            let device = match CpalEncoder::get_input_device() {
                Ok(d) => d,
                Err(_) => {
                    recording_for_thread.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let (config, sample_format) =
                match CpalEncoder::get_input_config(&device, target_rate) {
                    Ok(c) => c,
                    Err(_) => {
                        recording_for_thread.store(false, Ordering::SeqCst);
                        return;
                    }
                };

            let channels = config.channels;
            rate_for_thread.store(config.sample_rate.0, Ordering::SeqCst);

            let buffer_clone = Arc::clone(&buffer_for_thread);
            let recording_clone = Arc::clone(&recording_for_thread);

            let stream_result = match sample_format {
                SampleFormat::I16 => device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if recording_clone.load(Ordering::SeqCst) {
                            let mono = CpalEncoder::stereo_to_mono(data, channels);
                            if let Ok(mut buffer) = buffer_clone.lock() {
                                buffer.extend_from_slice(&mono);
                            }
                        }
                    },
                    |err| eprintln!("Audio stream error: {}", err),
                    None,
                ),

                SampleFormat::F32 => {
                    let buffer_clone = Arc::clone(&buffer_for_thread);
                    let recording_clone = Arc::clone(&recording_for_thread);

                    device.build_input_stream(
                        &config,
                        move |data: &[f32], _: &cpal::InputCallbackInfo| {
                            if recording_clone.load(Ordering::SeqCst) {
                                let i16_data: Vec<i16> =
                                    data.iter().map(|&s| (s * 32767.0) as i16).collect();
                                let mono = CpalEncoder::stereo_to_mono(&i16_data, channels);
                                if let Ok(mut buffer) = buffer_clone.lock() {
                                    buffer.extend_from_slice(&mono);
                                }
                            }
                        },
                        |err| eprintln!("Audio stream error: {}", err),
                        None,
                    )
                }

                _ => {
                    recording_for_thread.store(false, Ordering::SeqCst);
                    return;
                }
            };

            let stream = match stream_result {
                Ok(s) => s,
                Err(_) => {
                    recording_for_thread.store(false, Ordering::SeqCst);
                    return;
                }
            };

            if stream.play().is_err() {
                recording_for_thread.store(false, Ordering::SeqCst);
                return;
            }

            // Keep the stream alive until stopped
            while recording_for_thread.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(100));
            }

            drop(stream);
        });

        // Give the thread a moment to start
        tokio::time::sleep(TokioDuration::from_millis(50)).await;

        // Check whether capture actually started
        if !is_recording.load(Ordering::SeqCst) {
            return Err(EncoderError::StartFailed(
                "Failed to start audio capture".into(),
            ));
        }

        Ok(Box::new(CpalSession {
            output_path: spec.output_path,
            target_rate,
            audio_buffer,
            device_sample_rate,
            is_recording,
        }))
    }
}

/// One live capture session
struct CpalSession {
    output_path: PathBuf,
    target_rate: u32,
    audio_buffer: Arc<StdMutex<Vec<i16>>>,
    device_sample_rate: Arc<AtomicU32>,
    is_recording: Arc<AtomicBool>,
}

#[async_trait]
impl EncoderHandle for CpalSession {
    async fn stop(self: Box<Self>) -> Result<(), EncoderError> {
        if !self.is_recording.swap(false, Ordering::SeqCst) {
            return Err(EncoderError::StopFailed(
                "Capture already stopped".to_string(),
            ));
        }

        // Give the capture thread a moment to wind down
        tokio::time::sleep(TokioDuration::from_millis(100)).await;

        let device_rate = self.device_sample_rate.load(Ordering::SeqCst);
        if device_rate == 0 {
            return Err(EncoderError::StopFailed("Sample rate not set".into()));
        }

        let samples = {
            let mut buffer = self
                .audio_buffer
                .lock()
                .unwrap_or_else(|e| e.into_inner());
            std::mem::take(&mut *buffer)
        };

        if samples.is_empty() {
            return Err(EncoderError::StopFailed(
                "No audio data captured".to_string(),
            ));
        }

        // Encode in a blocking task (CPU-intensive work)
        let target_rate = self.target_rate;
        let encoded = tokio::task::spawn_blocking(move || {
            CpalEncoder::encode_session(&samples, device_rate, target_rate)
        })
        .await
        .map_err(|e| EncoderError::WriteFailed(format!("Encode task error: {}", e)))??;

        tokio::fs::write(&self.output_path, encoded)
            .await
            .map_err(|e| EncoderError::WriteFailed(e.to_string()))?;

        Ok(())
    }

    fn output_path(&self) -> &Path {
        &self.output_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_to_mono_single_channel() {
        let mono = vec![100i16, 200, 300];
        let result = CpalEncoder::stereo_to_mono(&mono, 1);
        assert_eq!(result, mono);
    }

    #[test]
    fn stereo_to_mono_two_channels() {
        let stereo = vec![100i16, 200, 300, 400];
        let result = CpalEncoder::stereo_to_mono(&stereo, 2);
        assert_eq!(result, vec![150, 350]); // Average of each pair
    }

    #[test]
    fn resample_same_rate_is_identity() {
        let samples = vec![1i16, 2, 3, 4];
        let result = CpalEncoder::resample(&samples, 16_000, 16_000).unwrap();
        assert_eq!(result, samples);
    }

    #[test]
    fn resample_halves_length_for_downsampling() {
        let samples = vec![0i16; 32_000];
        let result = CpalEncoder::resample(&samples, 16_000, 8_000).unwrap();
        assert_eq!(result.len(), 16_000);
    }
}
