//! Audio quality value objects
//!
//! The encoder is configured from a single caller-supplied bit rate; the
//! sampling rate is derived from it, never passed in from outside.

use std::fmt;

/// Default encoding bit rate (128 kbps)
pub const DEFAULT_BIT_RATE_BPS: u32 = 128_000;

/// Bit rates at or below this record at the telephony sampling rate
const LOW_TIER_MAX_BPS: u32 = 64_000;

/// Sampling rate for the low bit-rate tier
const LOW_TIER_HZ: u32 = 8_000;

/// Sampling rate for everything above the low tier
const HIGH_TIER_HZ: u32 = 16_000;

/// Value object for an audio encoding bit rate in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BitRate(u32);

impl BitRate {
    /// Create a bit rate from bits per second
    pub const fn from_bps(bps: u32) -> Self {
        Self(bps)
    }

    /// Get the bit rate in bits per second
    pub const fn as_bps(&self) -> u32 {
        self.0
    }
}

impl Default for BitRate {
    fn default() -> Self {
        Self(DEFAULT_BIT_RATE_BPS)
    }
}

impl fmt::Display for BitRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}bps", self.0)
    }
}

/// Value object for an audio sampling rate in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingRate(u32);

impl SamplingRate {
    /// Derive the sampling rate from the encoding bit rate.
    ///
    /// Two-tier policy: 64 kbps and below record at 8 kHz, everything
    /// above at 16 kHz.
    pub const fn for_bit_rate(bit_rate: BitRate) -> Self {
        if bit_rate.as_bps() <= LOW_TIER_MAX_BPS {
            Self(LOW_TIER_HZ)
        } else {
            Self(HIGH_TIER_HZ)
        }
    }

    /// Get the sampling rate in Hz
    pub const fn as_hz(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SamplingRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.0)
    }
}
