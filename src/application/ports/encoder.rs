//! Audio encoder port interface

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{BitRate, SamplingRate};

/// Encoder errors
#[derive(Debug, Clone, Error)]
pub enum EncoderError {
    #[error("Failed to start encoder: {0}")]
    StartFailed(String),

    #[error("Failed to stop encoder: {0}")]
    StopFailed(String),

    #[error("Failed to write output file: {0}")]
    WriteFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,
}

/// Parameters for one encoding session
#[derive(Debug, Clone)]
pub struct EncoderSpec {
    /// File the encoded audio is written to
    pub output_path: PathBuf,
    /// Encoding bit rate
    pub bit_rate: BitRate,
    /// Sampling rate derived from the bit rate tier
    pub sampling_rate: SamplingRate,
}

/// Port for opening encoding sessions.
///
/// Each call to `open` produces an exclusive handle; the previous handle
/// must be stopped (consumed) before the next one is opened.
#[async_trait]
pub trait AudioEncoder: Send + Sync {
    /// Prepare and start an encoding session against the given spec.
    async fn open(&self, spec: EncoderSpec) -> Result<Box<dyn EncoderHandle>, EncoderError>;
}

/// A live encoding session.
///
/// Stopping consumes the handle, releasing the capture resource and
/// finalizing the output file.
#[async_trait]
pub trait EncoderHandle: Send {
    /// Stop the session and finalize the output file.
    async fn stop(self: Box<Self>) -> Result<(), EncoderError>;

    /// Path the session writes to
    fn output_path(&self) -> &Path;
}
