//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio stack and the filesystem.

pub mod config;
pub mod encoder;

// Re-export adapters
pub use config::XdgConfigStore;
pub use encoder::CpalEncoder;
