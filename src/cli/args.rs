//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// Micseg - segmented background microphone recorder
#[derive(Parser, Debug)]
#[command(name = "micseg")]
#[command(version = "1.0.0")]
#[command(about = "Segmented background microphone recorder")]
#[command(long_about = None)]
pub struct Cli {
    /// Run as daemon (control via: micseg mic start/save/finish/...)
    #[arg(long)]
    pub daemon: bool,

    /// Directory segment files are written to
    #[arg(short = 'o', long, value_name = "DIR", requires = "daemon")]
    pub output_dir: Option<String>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to running daemon
    Mic {
        #[command(subcommand)]
        action: MicAction,
    },
}

/// Recorder control actions
#[derive(Subcommand, Debug, Clone)]
pub enum MicAction {
    /// Start recording a new segment run
    Start {
        /// Segment file name (generated if omitted)
        #[arg(short = 'f', long, value_name = "NAME")]
        file_name: Option<String>,

        /// Encoding bit rate in bits per second
        #[arg(short = 'b', long, value_name = "BPS")]
        bit_rate: Option<u32>,

        /// Minutes between automatic segment saves (0 disables)
        #[arg(short = 'i', long, value_name = "MINUTES")]
        interval: Option<u32>,
    },
    /// Save the current segment and continue recording
    Save {
        /// Next segment file name (previous path reused if omitted)
        #[arg(short = 'f', long, value_name = "NAME")]
        file_name: Option<String>,
    },
    /// Stop recording and rename the last segment to its final name
    Finish {
        /// Final file name
        final_file_name: String,
    },
    /// Cancel the pending automatic save
    ResetTimer,
    /// Stop recording without renaming (legacy)
    Stop,
    /// Show daemon status
    Status,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["output_dir", "bit_rate", "auto_save_interval_minutes"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["micseg"]);
        assert!(!cli.daemon);
        assert!(cli.output_dir.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_daemon() {
        let cli = Cli::parse_from(["micseg", "--daemon"]);
        assert!(cli.daemon);
    }

    #[test]
    fn cli_parses_daemon_with_output_dir() {
        let cli = Cli::parse_from(["micseg", "--daemon", "-o", "/tmp/recordings"]);
        assert!(cli.daemon);
        assert_eq!(cli.output_dir, Some("/tmp/recordings".to_string()));
    }

    #[test]
    fn cli_parses_mic_start() {
        let cli = Cli::parse_from(["micseg", "mic", "start", "-b", "128000", "-i", "5"]);
        if let Some(Commands::Mic {
            action:
                MicAction::Start {
                    file_name,
                    bit_rate,
                    interval,
                },
        }) = cli.command
        {
            assert!(file_name.is_none());
            assert_eq!(bit_rate, Some(128_000));
            assert_eq!(interval, Some(5));
        } else {
            panic!("Expected Mic Start command");
        }
    }

    #[test]
    fn cli_parses_mic_finish() {
        let cli = Cli::parse_from(["micseg", "mic", "finish", "meeting.flac"]);
        if let Some(Commands::Mic {
            action: MicAction::Finish { final_file_name },
        }) = cli.command
        {
            assert_eq!(final_file_name, "meeting.flac");
        } else {
            panic!("Expected Mic Finish command");
        }
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["micseg", "config", "set", "bit_rate", "64000"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "bit_rate");
            assert_eq!(value, "64000");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("output_dir"));
        assert!(is_valid_config_key("bit_rate"));
        assert!(is_valid_config_key("auto_save_interval_minutes"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        // Verify the CLI definition is valid
        Cli::command().debug_assert();
    }
}
