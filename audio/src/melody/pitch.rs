//! Pitch vocabulary for the buzzer.
//!
//! Covers the chromatic range C2..B6 which is what a piezo buzzer driven by a
//! timer output can reproduce usefully. Black keys are named with flats.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A note of the chromatic scale in a given octave.
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Pitch {
    // Octave 2
    C2, Db2, D2, Eb2, E2, F2, Gb2, G2, Ab2, A2, Bb2, B2,
    // Octave 3
    C3, Db3, D3, Eb3, E3, F3, Gb3, G3, Ab3, A3, Bb3, B3,
    // Octave 4
    C4, Db4, D4, Eb4, E4, F4, Gb4, G4, Ab4, A4, Bb4, B4,
    // Octave 5
    C5, Db5, D5, Eb5, E5, F5, Gb5, G5, Ab5, A5, Bb5, B5,
    // Octave 6
    C6, Db6, D6, Eb6, E6, F6, Gb6, G6, Ab6, A6, Bb6, B6,
}

use Pitch::*;

/// Frequencies in Hz, rounded equal temperament with A4 = 440 Hz.
const FREQUENCIES: [u16; 60] = [
    65, 69, 73, 78, 82, 87, 92, 98, 104, 110, 117, 123, // octave 2
    131, 139, 147, 156, 165, 175, 185, 196, 208, 220, 233, 247, // octave 3
    262, 277, 294, 311, 330, 349, 370, 392, 415, 440, 466, 494, // octave 4
    523, 554, 587, 622, 659, 698, 740, 784, 831, 880, 932, 988, // octave 5
    1047, 1109, 1175, 1245, 1319, 1397, 1480, 1568, 1661, 1760, 1865, 1976, // octave 6
];

const NAMES: [&str; 12] = ["C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B"];

/// MIDI note number of `C2`.
const MIDI_BASE: u8 = 36;
const LOWEST_OCTAVE: u8 = 2;

impl Pitch {
    /// Every pitch in ascending order.
    #[rustfmt::skip]
    pub const ALL: [Pitch; 60] = [
        C2, Db2, D2, Eb2, E2, F2, Gb2, G2, Ab2, A2, Bb2, B2,
        C3, Db3, D3, Eb3, E3, F3, Gb3, G3, Ab3, A3, Bb3, B3,
        C4, Db4, D4, Eb4, E4, F4, Gb4, G4, Ab4, A4, Bb4, B4,
        C5, Db5, D5, Eb5, E5, F5, Gb5, G5, Ab5, A5, Bb5, B5,
        C6, Db6, D6, Eb6, E6, F6, Gb6, G6, Ab6, A6, Bb6, B6,
    ];

    /// Returns the frequency in Hz.
    pub const fn frequency(self) -> u16 {
        FREQUENCIES[self as usize]
    }

    /// Returns the MIDI note number (C2 = 36, A4 = 69).
    pub const fn midi(self) -> u8 {
        MIDI_BASE + self as u8
    }

    /// Returns the octave number.
    pub const fn octave(self) -> u8 {
        LOWEST_OCTAVE + self as u8 / 12
    }

    /// Returns the pitch for a MIDI note number, if it is in range.
    pub fn from_midi(midi: u8) -> Option<Pitch> {
        midi.checked_sub(MIDI_BASE)
            .and_then(|i| Self::ALL.get(i as usize).copied())
    }

    /// Returns the note name without the octave, e.g. `Ab`.
    pub fn class_name(self) -> &'static str {
        NAMES[self as usize % 12]
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class_name(), self.octave())
    }
}

impl FromStr for Pitch {
    type Err = Error;

    /// Parses `Ab2`, `A2b` or `G#2`.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPitch(s.to_string());
        let mut chars = s.trim().chars();

        let letter = chars.next().ok_or_else(invalid)?;
        let base: i16 = match letter.to_ascii_uppercase() {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(invalid()),
        };

        let mut shift = 0i16;
        let mut octave: Option<i16> = None;
        for c in chars {
            match c {
                'b' if shift == 0 => shift = -1,
                '#' if shift == 0 => shift = 1,
                d if octave.is_none() && d.is_ascii_digit() => {
                    octave = d.to_digit(10).map(|v| v as i16);
                }
                _ => return Err(invalid()),
            }
        }

        let octave = octave.ok_or_else(invalid)?;
        let midi = (octave + 1) * 12 + base + shift;
        u8::try_from(midi)
            .ok()
            .and_then(Pitch::from_midi)
            .ok_or_else(invalid)
    }
}

impl Serialize for Pitch {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Pitch {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
