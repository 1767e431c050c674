//! Domain layer - value objects, entities, and errors

pub mod config;
pub mod error;
pub mod recording;
