//! Recording controller use case
//!
//! Owns the single live encoder handle, the current output path, and the
//! rotation timer. All commands are handled on one consumer, so transitions
//! never race: the previous handle is always stopped and dropped before the
//! next session is opened.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recording::{
    final_segment_path, generate_segment_file_name, BitRate, RecorderState, SamplingRate,
};

use super::command::ServiceCommand;
use super::ports::{AudioEncoder, EncoderError, EncoderHandle, EncoderSpec};
use super::rotation::RotationTimer;

/// Errors that terminate the controller
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Recording setup failed: {0}")]
    EncoderStart(#[from] EncoderError),
}

/// What the daemon loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep processing commands
    Continue,
    /// The controller has stopped; exit the loop
    Stop,
}

/// Controller construction parameters
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Directory segment files are written to
    pub output_dir: PathBuf,
}

/// The background recording controller.
///
/// State machine: IDLE <-> RECORDING. Start and rotate commands stop any
/// live session before opening the next one; finalize and the legacy stop
/// end the run and stop the controller.
pub struct MicController<E: AudioEncoder> {
    encoder: E,
    commands: mpsc::Sender<ServiceCommand>,
    output_dir: PathBuf,
    active: Option<Box<dyn EncoderHandle>>,
    current_path: Option<PathBuf>,
    bit_rate: BitRate,
    rotation_interval: Option<Duration>,
    rotation: RotationTimer,
    state: RecorderState,
    warnings: Vec<String>,
}

impl<E: AudioEncoder> MicController<E> {
    /// Create an idle controller.
    ///
    /// `commands` must be a sender for the same channel the daemon loop
    /// consumes; rotations re-enter the controller through it.
    pub fn new(encoder: E, settings: ControllerSettings, commands: mpsc::Sender<ServiceCommand>) -> Self {
        Self {
            encoder,
            commands,
            output_dir: settings.output_dir,
            active: None,
            current_path: None,
            bit_rate: BitRate::default(),
            rotation_interval: None,
            rotation: RotationTimer::new(),
            state: RecorderState::Idle,
            warnings: Vec::new(),
        }
    }

    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    /// Check whether a segment rotation is pending
    pub fn rotation_pending(&self) -> bool {
        self.rotation.is_scheduled()
    }

    /// Path of the segment currently being written, if any
    pub fn current_path(&self) -> Option<&PathBuf> {
        self.current_path.as_ref()
    }

    /// Drain the non-fatal fault messages collected since the last drain.
    /// The caller decides how to present them.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Handle one service command.
    ///
    /// An `Err` means the recording attempt is dead (encoder setup failed);
    /// the caller logs it and tears the controller down. All other faults
    /// are swallowed per the stop semantics and recorded as warnings the
    /// caller can drain.
    pub async fn handle(&mut self, command: ServiceCommand) -> Result<Flow, ControllerError> {
        match command {
            ServiceCommand::StartMic {
                file_name,
                bit_rate,
                auto_save_interval_minutes,
            } => {
                // The initial start pins the quality and rotation parameters
                // for the whole run; rotations keep them.
                self.bit_rate = BitRate::from_bps(bit_rate);
                self.rotation_interval = match auto_save_interval_minutes {
                    0 => None,
                    minutes => Some(Duration::from_secs(u64::from(minutes) * 60)),
                };
                self.begin_segment(Some(file_name)).await?;
                Ok(Flow::Continue)
            }
            ServiceCommand::SaveSegment { file_name } => {
                self.begin_segment(file_name).await?;
                Ok(Flow::Continue)
            }
            ServiceCommand::StopAndSaveFinal { final_file_name } => {
                self.stop_active_session().await;
                self.rename_last_segment(&final_file_name).await;
                self.rotation.cancel();
                self.state = RecorderState::Idle;
                Ok(Flow::Stop)
            }
            ServiceCommand::ResetTimer => {
                self.rotation.cancel();
                Ok(Flow::Continue)
            }
            ServiceCommand::StopMic => {
                self.stop_active_session().await;
                self.rotation.cancel();
                self.state = RecorderState::Idle;
                Ok(Flow::Stop)
            }
            ServiceCommand::Shutdown => {
                self.teardown().await;
                Ok(Flow::Stop)
            }
        }
    }

    /// Best-effort teardown: stop whatever is live, cancel the timer.
    pub async fn teardown(&mut self) {
        self.stop_active_session().await;
        self.rotation.cancel();
        self.state = RecorderState::Idle;
    }

    /// Stop and begin a segment: the shared path of start and rotate.
    async fn begin_segment(&mut self, file_name: Option<String>) -> Result<(), ControllerError> {
        // Remove the pending rotation before starting the new segment
        self.rotation.cancel();

        // Stop the previous session, if one exists
        self.stop_active_session().await;

        // Resolve the new output path: explicit name, else the previous
        // path, else a generated timestamp name
        let path = match file_name {
            Some(name) => self.output_dir.join(name),
            None => self
                .current_path
                .clone()
                .unwrap_or_else(|| self.output_dir.join(generate_segment_file_name())),
        };

        let spec = EncoderSpec {
            output_path: path.clone(),
            bit_rate: self.bit_rate,
            sampling_rate: SamplingRate::for_bit_rate(self.bit_rate),
        };

        match self.encoder.open(spec).await {
            Ok(handle) => {
                self.active = Some(handle);
                self.current_path = Some(path);
                self.state = RecorderState::Recording;

                // Reschedule the rotation if an interval was pinned
                if let Some(interval) = self.rotation_interval {
                    self.rotation.schedule(interval, self.commands.clone());
                }

                Ok(())
            }
            Err(e) => {
                // No retry: the recording attempt is terminal
                self.state = RecorderState::Idle;
                self.current_path = None;
                Err(ControllerError::EncoderStart(e))
            }
        }
    }

    /// Stop and release the live session. A stop fault from an already
    /// stopped encoder is recorded and swallowed.
    async fn stop_active_session(&mut self) {
        if let Some(handle) = self.active.take() {
            let path = handle.output_path().to_path_buf();
            if let Err(e) = handle.stop().await {
                self.warnings
                    .push(format!("Encoder stop fault for {}: {}", path.display(), e));
            }
        }
    }

    /// Rename the last output file to the final name, skipping silently if
    /// the source file does not exist.
    async fn rename_last_segment(&mut self, final_file_name: &str) {
        if let Some(source) = self.current_path.take() {
            if source.exists() {
                let dest = final_segment_path(&source, final_file_name);
                if let Err(e) = tokio::fs::rename(&source, &dest).await {
                    self.warnings
                        .push(format!("Final segment rename failed: {}", e));
                }
            }
        }
    }
}
