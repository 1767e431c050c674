//! Service commands consumed by the recording controller
//!
//! Commands arrive from the IPC dispatcher, the rotation timer, and the
//! signal handlers, all funneled through one mpsc channel so the controller
//! processes them strictly in order.

/// Commands for the recording controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCommand {
    /// Begin recording to the named file. Pins the bit rate and the
    /// rotation interval for this recording run.
    StartMic {
        file_name: String,
        bit_rate: u32,
        auto_save_interval_minutes: u32,
    },
    /// Rotate the segment: stop the current encoder and continue into a new
    /// file. A `None` file name reuses the previous path (or generates one).
    /// Bit rate and interval stay pinned from the initial start.
    SaveSegment { file_name: Option<String> },
    /// Stop recording and rename the last segment to the final name.
    StopAndSaveFinal { final_file_name: String },
    /// Cancel the pending rotation without touching the recording.
    ResetTimer,
    /// Legacy stop: stop recording, no rename.
    StopMic,
    /// External teardown (SIGINT/SIGTERM).
    Shutdown,
}
