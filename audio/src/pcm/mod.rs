//! PCM (Pulse Code Modulation) audio format handling.
//!
//! - [`Format`]: sample rate / depth of 16-bit mono audio
//! - [`Chunk`]: trait for audio data that can be written out
//! - [`DataChunk`]: owned samples, the output of melody rendering
//! - [`SilenceChunk`]: silence of a given duration

mod chunk;
mod format;

pub use chunk::{Chunk, DataChunk, SilenceChunk};
pub use format::Format;
