//! Encoder adapters

pub mod cpal_encoder;
pub mod flac;

pub use cpal_encoder::CpalEncoder;
