//! Micseg - segmented background microphone recorder
//!
//! A daemon records from the default microphone and writes timestamped
//! FLAC segments, rotating to a fresh segment on a configurable timer.
//! A thin CLI client drives it over a local IPC endpoint.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (bit rate, sampling tier, recorder state)
//! - **Application**: The recording controller, command types, and ports
//! - **Infrastructure**: Adapter implementations (cpal capture, FLAC, config)
//! - **CLI**: Argument parsing, IPC endpoints, and the daemon runner

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
