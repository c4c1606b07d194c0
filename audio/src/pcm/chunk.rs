//! Audio chunk types.

use std::io::{self, Write};
use std::time::Duration;

use super::Format;

/// A chunk of audio data.
pub trait Chunk {
    /// Returns the length of the audio data in bytes.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn format(&self) -> Format;

    /// Writes the audio data to the writer.
    fn write_to(&self, w: &mut dyn Write) -> io::Result<u64>;

    /// Returns the playing time of the chunk.
    fn duration(&self) -> Duration {
        self.format().duration(self.len())
    }
}

/// A growable buffer of 16-bit samples.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataChunk {
    samples: Vec<i16>,
    format: Format,
}

impl DataChunk {
    /// Creates an empty chunk.
    pub fn new(format: Format) -> Self {
        Self {
            samples: Vec::new(),
            format,
        }
    }

    /// Creates a chunk from existing samples.
    pub fn from_samples(format: Format, samples: Vec<i16>) -> Self {
        Self { samples, format }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Appends samples at the end.
    pub fn extend_from_slice(&mut self, samples: &[i16]) {
        self.samples.extend_from_slice(samples);
    }

    /// Drops every sample from `len` on.
    pub fn truncate(&mut self, len: usize) {
        self.samples.truncate(len);
    }

    /// Appends `count` zero samples.
    pub fn extend_silence(&mut self, count: usize) {
        self.samples.resize(self.samples.len() + count, 0);
    }

    /// Returns the data as little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.samples.len() * 2);
        for s in &self.samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        data
    }
}

impl Chunk for DataChunk {
    fn len(&self) -> u64 {
        self.samples.len() as u64 * 2
    }

    fn format(&self) -> Format {
        self.format
    }

    fn write_to(&self, w: &mut dyn Write) -> io::Result<u64> {
        w.write_all(&self.to_bytes())?;
        Ok(self.len())
    }
}

/// A chunk that produces silence of a specified duration.
#[derive(Debug, Clone)]
pub struct SilenceChunk {
    len: u64,
    format: Format,
}

impl SilenceChunk {
    pub fn new(format: Format, duration: Duration) -> Self {
        Self {
            len: format.bytes_in_duration(duration),
            format,
        }
    }
}

/// Static buffer of zeros for writing silence efficiently.
static EMPTY_BYTES: [u8; 4096] = [0u8; 4096];

impl Chunk for SilenceChunk {
    fn len(&self) -> u64 {
        self.len
    }

    fn format(&self) -> Format {
        self.format
    }

    fn write_to(&self, w: &mut dyn Write) -> io::Result<u64> {
        let mut remaining = self.len;
        while remaining > 0 {
            let n = remaining.min(EMPTY_BYTES.len() as u64) as usize;
            w.write_all(&EMPTY_BYTES[..n])?;
            remaining -= n as u64;
        }
        Ok(self.len)
    }
}
