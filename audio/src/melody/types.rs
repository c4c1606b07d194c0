//! Core types for melody representation.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::pitch::Pitch;
use crate::error::{Error, Result};

/// Longest melody a [`PlaybackState`](super::PlaybackState) can index.
pub const MAX_NOTES: usize = i8::MAX as usize;

/// A single note: a pitch held for a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Note {
    pub pitch: Pitch,
    /// Duration in milliseconds.
    pub duration: u16,
}

impl Note {
    /// Creates a new note.
    pub const fn new(pitch: Pitch, duration: u16) -> Self {
        Self { pitch, duration }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.pitch, self.duration)
    }
}

impl FromStr for Note {
    type Err = Error;

    /// Parses `PITCH:DURATION`, e.g. `Bb4:300`.
    fn from_str(s: &str) -> Result<Self> {
        let (pitch, duration) = s
            .split_once(':')
            .ok_or_else(|| Error::InvalidNote(s.to_string()))?;
        let duration = duration
            .trim()
            .parse()
            .map_err(|_| Error::InvalidNote(s.to_string()))?;
        Ok(Note::new(pitch.parse()?, duration))
    }
}

impl Serialize for Note {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Notes are written either as `"G2:100"` or as `{pitch: G2, duration: 100}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NoteRepr {
    Short(String),
    Full { pitch: Pitch, duration: u16 },
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match NoteRepr::deserialize(deserializer)? {
            NoteRepr::Short(s) => s.parse().map_err(serde::de::Error::custom),
            NoteRepr::Full { pitch, duration } => Ok(Note::new(pitch, duration)),
        }
    }
}

/// An ordered, immutable sequence of notes.
///
/// Built-in melodies borrow `'static` tables; melodies loaded from
/// configuration own their notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Melody {
    /// Unique identifier
    pub id: Cow<'static, str>,
    /// Display name
    pub name: Cow<'static, str>,
    notes: Cow<'static, [Note]>,
}

impl Melody {
    /// Wraps a static note table.
    ///
    /// # Panics
    ///
    /// Panics if the table holds more than [`MAX_NOTES`] notes. In a
    /// `static` initializer this is a compile error.
    pub const fn from_static(id: &'static str, name: &'static str, notes: &'static [Note]) -> Self {
        assert!(notes.len() <= MAX_NOTES, "melody table exceeds MAX_NOTES");
        Self {
            id: Cow::Borrowed(id),
            name: Cow::Borrowed(name),
            notes: Cow::Borrowed(notes),
        }
    }

    /// Creates a melody from owned notes, validating them.
    pub fn new(id: impl Into<String>, name: impl Into<String>, notes: Vec<Note>) -> Result<Self> {
        let id = id.into();
        if notes.is_empty() {
            return Err(Error::EmptyMelody(id));
        }
        if notes.len() > MAX_NOTES {
            return Err(Error::MelodyTooLong {
                len: notes.len(),
                max: MAX_NOTES,
            });
        }
        if let Some(index) = notes.iter().position(|n| n.duration == 0) {
            return Err(Error::ZeroDuration { index });
        }

        let name = name.into();
        Ok(Self {
            name: Cow::Owned(if name.is_empty() { id.clone() } else { name }),
            id: Cow::Owned(id),
            notes: Cow::Owned(notes),
        })
    }

    /// Returns the notes in playing order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Returns the note at `index`.
    pub fn note(&self, index: usize) -> Option<Note> {
        self.notes.get(index).copied()
    }

    /// Returns the number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter()
    }

    /// Returns the sum of all note durations in milliseconds.
    pub fn total_duration(&self) -> u32 {
        self.notes.iter().map(|n| n.duration as u32).sum()
    }

    /// Returns the playing time in milliseconds when `pause` ms of silence
    /// follow every note.
    pub fn duration_with_pause(&self, pause: u16) -> u32 {
        self.total_duration() + self.notes.len() as u32 * pause as u32
    }
}

impl<'a> IntoIterator for &'a Melody {
    type Item = &'a Note;
    type IntoIter = std::slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

/// Serialized form of a user-defined melody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MelodyDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub notes: Vec<Note>,
}

impl MelodyDef {
    /// Validates the definition into a melody.
    pub fn to_melody(&self) -> Result<Melody> {
        Melody::new(self.id.clone(), self.name.clone(), self.notes.clone())
    }
}

impl From<&Melody> for MelodyDef {
    fn from(m: &Melody) -> Self {
        Self {
            id: m.id.to_string(),
            name: m.name.to_string(),
            notes: m.notes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::melody::pitch::Pitch::*;

    #[test]
    fn test_note_new() {
        let note = Note::new(A4, 500);
        assert_eq!(note.pitch, A4);
        assert_eq!(note.duration, 500);
    }

    #[test]
    fn test_note_display_and_parse() {
        let note = Note::new(Bb4, 300);
        assert_eq!(note.to_string(), "Bb4:300");
        assert_eq!("B4b:300".parse::<Note>().unwrap(), note);
        assert_eq!("Bb4: 300".parse::<Note>().unwrap(), note);
    }

    #[test]
    fn test_note_parse_invalid() {
        assert!(matches!("Bb4".parse::<Note>(), Err(Error::InvalidNote(_))));
        assert!(matches!("Bb4:x".parse::<Note>(), Err(Error::InvalidNote(_))));
        assert!(matches!("Bb4:70000".parse::<Note>(), Err(Error::InvalidNote(_))));
        assert!(matches!("Q4:100".parse::<Note>(), Err(Error::InvalidPitch(_))));
    }

    #[test]
    fn test_melody_new() {
        let m = Melody::new("chirp", "Chirp", vec![Note::new(C5, 50), Note::new(G5, 80)]).unwrap();
        assert_eq!(m.id, "chirp");
        assert_eq!(m.name, "Chirp");
        assert_eq!(m.len(), 2);
        assert!(!m.is_empty());
        assert_eq!(m.note(1), Some(Note::new(G5, 80)));
        assert_eq!(m.note(2), None);
    }

    #[test]
    fn test_melody_name_defaults_to_id() {
        let m = Melody::new("chirp", "", vec![Note::new(C5, 50)]).unwrap();
        assert_eq!(m.name, "chirp");
    }

    #[test]
    fn test_melody_new_rejects_empty() {
        let err = Melody::new("silent", "", vec![]).unwrap_err();
        assert_eq!(err, Error::EmptyMelody("silent".into()));
    }

    #[test]
    fn test_melody_new_rejects_zero_duration() {
        let notes = vec![Note::new(C4, 100), Note::new(D4, 0)];
        let err = Melody::new("bad", "", notes).unwrap_err();
        assert_eq!(err, Error::ZeroDuration { index: 1 });
    }

    #[test]
    fn test_melody_new_rejects_too_long() {
        let notes = vec![Note::new(C4, 10); MAX_NOTES + 1];
        let err = Melody::new("long", "", notes).unwrap_err();
        assert_eq!(err, Error::MelodyTooLong { len: 128, max: 127 });

        let notes = vec![Note::new(C4, 10); MAX_NOTES];
        assert!(Melody::new("just_fits", "", notes).is_ok());
    }

    #[test]
    fn test_from_static_accepts_max_notes() {
        static TABLE: [Note; MAX_NOTES] = [Note::new(C4, 10); MAX_NOTES];
        let m = Melody::from_static("long", "Long", &TABLE);
        assert_eq!(m.len(), MAX_NOTES);
    }

    #[test]
    #[should_panic(expected = "melody table exceeds MAX_NOTES")]
    fn test_from_static_rejects_oversized_table() {
        static TABLE: [Note; MAX_NOTES + 1] = [Note::new(C4, 10); MAX_NOTES + 1];
        let _ = Melody::from_static("too_long", "Too long", &TABLE);
    }

    #[test]
    fn test_melody_durations() {
        let m = Melody::new("m", "", vec![Note::new(C4, 100), Note::new(E4, 250)]).unwrap();
        assert_eq!(m.total_duration(), 350);
        assert_eq!(m.duration_with_pause(25), 400);
        assert_eq!(m.iter().count(), 2);
        assert_eq!((&m).into_iter().map(|n| n.duration).max(), Some(250));
    }

    #[test]
    fn test_melody_def_from_yaml() {
        let yaml = r#"
id: doorbell
name: Door bell
notes:
  - "E5:200"
  - C5:400
  - { pitch: G4, duration: 300 }
"#;
        let def: MelodyDef = serde_yaml::from_str(yaml).unwrap();
        let m = def.to_melody().unwrap();
        assert_eq!(
            m.notes(),
            &[Note::new(E5, 200), Note::new(C5, 400), Note::new(G4, 300)]
        );
    }

    #[test]
    fn test_melody_def_invalid_note() {
        let yaml = "id: x\nnotes: [\"Z9:100\"]\n";
        assert!(serde_yaml::from_str::<MelodyDef>(yaml).is_err());
    }

    #[test]
    fn test_melody_def_from_melody() {
        static NOTES: [Note; 1] = [Note::new(A4, 100)];
        let m = Melody::from_static("a", "A", &NOTES);
        let def = MelodyDef::from(&m);
        assert_eq!(def.id, "a");
        assert_eq!(def.to_melody().unwrap(), Melody::new("a", "A", NOTES.to_vec()).unwrap());
    }
}
