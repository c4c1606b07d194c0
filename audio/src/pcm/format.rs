//! PCM audio format definitions.

use std::time::Duration;

/// Signed 16-bit little-endian mono PCM at a fixed sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    L16Mono8K,
    #[default]
    L16Mono16K,
    L16Mono24K,
    L16Mono48K,
}

impl Format {
    /// Every supported format.
    pub const ALL: [Format; 4] = [
        Format::L16Mono8K,
        Format::L16Mono16K,
        Format::L16Mono24K,
        Format::L16Mono48K,
    ];

    /// Returns the format with the given sample rate, if supported.
    pub fn from_sample_rate(sample_rate: u32) -> Option<Format> {
        Self::ALL.into_iter().find(|f| f.sample_rate() == sample_rate)
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        match self {
            Format::L16Mono8K => 8000,
            Format::L16Mono16K => 16000,
            Format::L16Mono24K => 24000,
            Format::L16Mono48K => 48000,
        }
    }

    pub fn channels(&self) -> u32 {
        1
    }

    /// Bits per sample.
    pub fn depth(&self) -> u32 {
        16
    }

    pub fn bits_rate(&self) -> u32 {
        self.sample_rate() * self.channels() * self.depth()
    }

    pub fn bytes_rate(&self) -> u32 {
        self.bits_rate() / 8
    }

    /// Returns the number of bytes needed to hold `duration` of audio.
    pub fn bytes_in_duration(&self, duration: Duration) -> u64 {
        self.samples_in_duration(duration) * 2
    }

    /// Returns the number of samples in `duration`, rounded down.
    pub fn samples_in_duration(&self, duration: Duration) -> u64 {
        (self.sample_rate() as u128 * duration.as_nanos() / 1_000_000_000) as u64
    }

    /// Returns the playing time of `bytes` of audio.
    pub fn duration(&self, bytes: u64) -> Duration {
        let nanos = bytes as u128 * 1_000_000_000 / self.bytes_rate() as u128;
        Duration::from_nanos(nanos as u64)
    }
}
