//! Application layer - use cases and port interfaces

pub mod command;
pub mod controller;
pub mod ports;
pub mod rotation;

pub use command::ServiceCommand;
pub use controller::{ControllerError, ControllerSettings, Flow, MicController};
pub use rotation::RotationTimer;
