use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Layout of raw PCM audio (interleaved, fixed-width samples)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Width of a single sample (2 = 16-bit)
    pub bytes_per_sample: u16,
    /// Number of channels
    pub channels: u16,
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            bytes_per_sample: 2,
            channels: 1,
        }
    }
}

impl AudioFormat {
    /// Bytes produced per second of audio
    pub fn byte_rate(&self) -> u64 {
        self.sample_rate as u64 * self.bytes_per_sample as u64 * self.channels as u64
    }

    /// Number of bytes covering `duration` of audio in this format
    pub fn bytes_for(&self, duration: Duration) -> usize {
        (self.byte_rate() as u128 * duration.as_millis() / 1000) as usize
    }
}
