//! Sound support for the snail mail notifier.
//!
//! This crate provides:
//!
//! - `melody`: the pitch vocabulary, the built-in notification melodies and
//!   the non-blocking playback state machine that drives a tone output
//! - `pcm`: PCM audio format handling, used to render melodies to audio
//!
//! # Example
//!
//! ```rust
//! use snailmail_audio::melody::{Action, PlaybackState, Step, ToneLog, MELODY_BUTTON_PUSH};
//!
//! let mut log = ToneLog::default();
//! let mut state = PlaybackState::new(&MELODY_BUTTON_PUSH);
//! state.play(0);
//!
//! // Each tick is cheap; it only advances when the next note is due.
//! let mut now = 0;
//! while state.action == Action::Play {
//!     if let Step::Note(index, note) = state.tick(now, &mut log).unwrap() {
//!         println!("note {} -> {} Hz", index, note.pitch.frequency());
//!     }
//!     now += 10;
//! }
//! assert_eq!(log.tones().count(), 2);
//! ```

mod error;
pub mod melody;
pub mod pcm;

pub use error::{Error, Result};
pub use pcm::Format;
