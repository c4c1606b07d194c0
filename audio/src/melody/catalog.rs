//! Built-in notification melodies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::pitch::Pitch::*;
use super::types::{Melody, Note};
use crate::error::{Error, Result};

/// All built-in melodies.
pub static ALL_MELODIES: &[&Melody] = &[&MELODY_NEW_MAIL, &MELODY_BUTTON_PUSH];

// ========== Melody Definitions ==========

/// Played when the mailbox reports new mail.
///
/// Three rising arpeggios (C major, Ab major, Bb major) ending on a long C5.
pub static MELODY_NEW_MAIL: Melody = Melody::from_static("new_mail", "New mail", &NEW_MAIL_NOTES);

#[rustfmt::skip]
static NEW_MAIL_NOTES: [Note; 27] = [
    // C major
    Note::new(G2, 100), Note::new(C3, 100), Note::new(E3, 100), Note::new(G3, 100),
    Note::new(C4, 100), Note::new(E4, 100), Note::new(G4, 300), Note::new(E4, 300),
    // Ab major
    Note::new(Ab2, 100), Note::new(C3, 100), Note::new(Eb3, 100), Note::new(Ab3, 100),
    Note::new(C4, 100), Note::new(Eb4, 100), Note::new(Ab4, 300), Note::new(Eb4, 300),
    // Bb major
    Note::new(Bb2, 100), Note::new(D3, 100), Note::new(F3, 100), Note::new(Bb3, 100),
    Note::new(D4, 100), Note::new(F4, 100), Note::new(Bb4, 300),
    Note::new(Bb4, 100), Note::new(Bb4, 100), Note::new(Bb4, 100),
    Note::new(C5, 600),
];

/// Played as feedback when the receiver's button is pushed.
pub static MELODY_BUTTON_PUSH: Melody =
    Melody::from_static("button_push", "Button push", &BUTTON_PUSH_NOTES);

static BUTTON_PUSH_NOTES: [Note; 2] = [Note::new(B5, 100), Note::new(E6, 200)];

impl Melody {
    /// Returns a built-in melody by its ID.
    pub fn by_id(id: &str) -> Option<&'static Melody> {
        ALL_MELODIES.iter().find(|m| m.id == id).copied()
    }

    /// Returns all built-in melody IDs.
    pub fn ids() -> Vec<&'static str> {
        ALL_MELODIES.iter().map(|m| &*m.id).collect()
    }
}

/// Device events that trigger a melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// The mailbox sender reported a new letter.
    NewMail,
    /// The acknowledge button on the receiver was pushed.
    ButtonPush,
}

impl Event {
    pub const ALL: [Event; 2] = [Event::NewMail, Event::ButtonPush];

    /// Returns the event identifier used in configuration files.
    pub fn id(self) -> &'static str {
        match self {
            Event::NewMail => "new_mail",
            Event::ButtonPush => "button_push",
        }
    }

    /// Returns the built-in melody bound to this event.
    pub fn melody(self) -> &'static Melody {
        match self {
            Event::NewMail => &MELODY_NEW_MAIL,
            Event::ButtonPush => &MELODY_BUTTON_PUSH,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Event {
    type Err = Error;

    /// Accepts `new_mail` as well as `new-mail`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('-', "_").to_ascii_lowercase();
        Event::ALL
            .into_iter()
            .find(|e| e.id() == normalized)
            .ok_or_else(|| Error::UnknownEvent(s.to_string()))
    }
}
