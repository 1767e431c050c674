//! Recording domain - quality tiers, segment naming, recorder state

pub mod quality;
pub mod segment;
pub mod state;

pub use quality::{BitRate, SamplingRate, DEFAULT_BIT_RATE_BPS};
pub use segment::{final_segment_path, generate_segment_file_name};
pub use state::RecorderState;
