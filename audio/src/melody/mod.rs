//! Notification melodies for the receiver's buzzer.
//!
//! Melodies are static tables of `(pitch, duration)` notes. They are played
//! by polling a [`PlaybackState`] from a periodic tick, which drives a
//! [`ToneSink`]: the buzzer on a device, or a [`PcmSink`] to render audio.
//!
//! # Example
//!
//! ```rust
//! use snailmail_audio::melody::{Event, Melody, RenderOptions};
//!
//! let melody = Event::NewMail.melody();
//! assert_eq!(melody.len(), 27);
//!
//! // Render to PCM data
//! let data = Melody::by_id("button_push").unwrap().render_bytes(&RenderOptions::default());
//! assert!(!data.is_empty());
//! ```

mod catalog;
mod pcm;
mod pitch;
mod player;
mod types;

pub use catalog::*;
pub use pcm::*;
pub use pitch::*;
pub use player::*;
pub use types::*;
