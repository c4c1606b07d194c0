//! Non-blocking melody playback.
//!
//! A [`PlaybackState`] is polled from a periodic tick (a timer interrupt, a
//! main loop, a tokio interval). Every tick is O(1): it either returns
//! immediately or starts the next note on a [`ToneSink`] and schedules the
//! following advance. Nothing ever blocks for the length of a note.

use std::convert::Infallible;

use tracing::debug;

use super::types::{Melody, Note};

/// Default silence between two notes in milliseconds.
pub const DEFAULT_PAUSE_MS: u16 = 30;

/// Output stage driven by the player, usually a buzzer on a timer pin.
pub trait ToneSink {
    type Error;

    /// Starts a square tone that stops by itself after `duration_ms`.
    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Self::Error>;

    /// Silences the output immediately.
    fn no_tone(&mut self) -> Result<(), Self::Error>;
}

impl<S: ToneSink + ?Sized> ToneSink for &mut S {
    type Error = S::Error;

    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Self::Error> {
        (**self).tone(frequency_hz, duration_ms)
    }

    fn no_tone(&mut self) -> Result<(), Self::Error> {
        (**self).no_tone()
    }
}

/// Whether the player should advance through the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Stop,
    Play,
}

/// Outcome of one [`PlaybackState::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Stopped, nothing to do.
    Idle,
    /// Playing, the current note or pause has not elapsed yet.
    Waiting,
    /// The note at this index was started.
    Note(usize, Note),
    /// The last note elapsed and the player stopped.
    Finished,
}

/// Progress of one melody being played.
///
/// The melody is borrowed: it is either a static table or owned by the
/// caller, and always outlives the playback session.
#[derive(Debug, Clone)]
pub struct PlaybackState<'a> {
    pub melody: &'a Melody,
    pub action: Action,
    /// Ticks serviced since the last `play`, wrapping.
    pub calls: u16,
    /// Silence after each note in milliseconds.
    pub pause: u16,
    /// Clock time in milliseconds when the next note is due.
    pub next_call: u32,
    /// Index of the sounding note, `-1` before the first one.
    pub note_counter: i8,
}

impl<'a> PlaybackState<'a> {
    /// Creates a stopped player for `melody`.
    pub fn new(melody: &'a Melody) -> Self {
        Self {
            melody,
            action: Action::Stop,
            calls: 0,
            pause: DEFAULT_PAUSE_MS,
            next_call: 0,
            note_counter: -1,
        }
    }

    /// Sets the pause inserted after each note.
    pub fn with_pause(mut self, pause: u16) -> Self {
        self.pause = pause;
        self
    }

    /// Starts (or restarts) the melody; the first note sounds on the next
    /// tick at or after `now`.
    pub fn play(&mut self, now: u32) {
        debug!(melody = %self.melody.id, now, "play");
        self.action = Action::Play;
        self.calls = 0;
        self.next_call = now;
        self.note_counter = -1;
    }

    /// Stops playback and silences the sink.
    pub fn stop<S: ToneSink>(&mut self, sink: &mut S) -> Result<(), S::Error> {
        if self.action == Action::Play {
            debug!(melody = %self.melody.id, note = self.note_counter, "stop");
        }
        self.action = Action::Stop;
        self.note_counter = -1;
        sink.no_tone()
    }

    /// Services one scheduler tick at clock time `now` (milliseconds,
    /// wrapping).
    pub fn tick<S: ToneSink>(&mut self, now: u32, sink: &mut S) -> Result<Step, S::Error> {
        self.calls = self.calls.wrapping_add(1);

        if self.action == Action::Stop {
            return Ok(Step::Idle);
        }
        if !is_due(now, self.next_call) {
            return Ok(Step::Waiting);
        }

        let index = (self.note_counter as isize + 1) as usize;
        let Some(note) = self.melody.note(index) else {
            debug!(melody = %self.melody.id, calls = self.calls, "finished");
            self.stop(sink)?;
            return Ok(Step::Finished);
        };

        sink.tone(note.pitch.frequency() as u32, note.duration as u32)?;
        // The index is bounded by the melody length, which Melody keeps
        // within i8 range.
        self.note_counter = index as i8;
        self.next_call = now.wrapping_add(note.duration as u32 + self.pause as u32);
        Ok(Step::Note(index, note))
    }

    pub fn is_playing(&self) -> bool {
        self.action == Action::Play
    }

    /// Returns the note currently sounding or pausing.
    pub fn current_note(&self) -> Option<Note> {
        usize::try_from(self.note_counter)
            .ok()
            .and_then(|i| self.melody.note(i))
    }

    /// Returns how many notes have not been started yet.
    pub fn remaining(&self) -> usize {
        if self.action == Action::Stop {
            return 0;
        }
        let started = (self.note_counter as isize + 1) as usize;
        self.melody.len().saturating_sub(started)
    }
}

/// Wrap-aware `now >= deadline` for a free-running millisecond clock.
fn is_due(now: u32, deadline: u32) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}

/// Something that happened on a [`ToneLog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneEvent {
    Tone { frequency_hz: u32, duration_ms: u32 },
    Silence,
}

/// A sink that records every call, for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct ToneLog {
    events: Vec<ToneEvent>,
}

impl ToneLog {
    pub fn events(&self) -> &[ToneEvent] {
        &self.events
    }

    /// Returns the `(frequency, duration)` of each started tone.
    pub fn tones(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.events.iter().filter_map(|e| match *e {
            ToneEvent::Tone {
                frequency_hz,
                duration_ms,
            } => Some((frequency_hz, duration_ms)),
            ToneEvent::Silence => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl ToneSink for ToneLog {
    type Error = Infallible;

    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Infallible> {
        self.events.push(ToneEvent::Tone {
            frequency_hz,
            duration_ms,
        });
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Infallible> {
        self.events.push(ToneEvent::Silence);
        Ok(())
    }
}
