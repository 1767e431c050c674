//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! the IPC endpoints, and the daemon runner.

pub mod args;
pub mod config_cmd;
pub mod daemon_app;
pub mod daemon_cmd;
pub mod ipc;
pub mod pid_file;
pub mod presenter;
pub mod protocol;
pub mod signals;

// Re-export commonly used types
pub use args::{Cli, Commands, ConfigAction, MicAction};
pub use daemon_app::{run_daemon, DaemonOptions};
pub use daemon_cmd::handle_mic_command;
pub use presenter::Presenter;

/// Exit code for success
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for runtime errors
pub const EXIT_ERROR: u8 = 1;

/// Exit code for usage errors
pub const EXIT_USAGE_ERROR: u8 = 2;
