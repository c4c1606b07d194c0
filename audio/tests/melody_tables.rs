//! The built-in melody tables are the device's audible interface; these
//! tests pin them note for note.

use snailmail_audio::melody::{
    Action, Event, MELODY_BUTTON_PUSH, MELODY_NEW_MAIL, Melody, Note, PlaybackState, Step,
    ToneLog,
};

fn table(notes: &[(&str, u16)]) -> Vec<Note> {
    notes
        .iter()
        .map(|(pitch, duration)| Note::new(pitch.parse().unwrap(), *duration))
        .collect()
}

#[test]
fn new_mail_matches_table() {
    let expected = table(&[
        ("G2", 100), ("C3", 100), ("E3", 100), ("G3", 100),
        ("C4", 100), ("E4", 100), ("G4", 300), ("E4", 300),
        ("A2b", 100), ("C3", 100), ("E3b", 100), ("A3b", 100),
        ("C4", 100), ("E4b", 100), ("A4b", 300), ("E4b", 300),
        ("B2b", 100), ("D3", 100), ("F3", 100), ("B3b", 100),
        ("D4", 100), ("F4", 100), ("B4b", 300), ("B4b", 100),
        ("B4b", 100), ("B4b", 100), ("C5", 600),
    ]);
    assert_eq!(MELODY_NEW_MAIL.len(), 27);
    assert_eq!(MELODY_NEW_MAIL.notes(), expected.as_slice());
}

#[test]
fn button_push_matches_table() {
    let expected = table(&[("B5", 100), ("E6", 200)]);
    assert_eq!(MELODY_BUTTON_PUSH.len(), 2);
    assert_eq!(MELODY_BUTTON_PUSH.notes(), expected.as_slice());
}

#[test]
fn every_duration_is_positive() {
    for melody in [&MELODY_NEW_MAIL, &MELODY_BUTTON_PUSH] {
        assert!(melody.iter().all(|n| n.duration > 0), "{}", melody.id);
    }
}

#[test]
fn tables_survive_config_round_trip() {
    for melody in [&MELODY_NEW_MAIL, &MELODY_BUTTON_PUSH] {
        let def = snailmail_audio::melody::MelodyDef::from(melody);
        let yaml = serde_yaml::to_string(&def).unwrap();
        let back: snailmail_audio::melody::MelodyDef = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(&back.to_melody().unwrap(), melody);
    }
}

#[test]
fn events_play_their_melody_to_the_end() {
    for event in Event::ALL {
        let melody: &Melody = event.melody();
        let mut log = ToneLog::default();
        let mut state = PlaybackState::new(melody);
        state.play(0);

        let mut now = 0;
        let mut notes = 0;
        while state.action == Action::Play {
            if let Step::Note(..) = state.tick(now, &mut log).unwrap() {
                notes += 1;
            }
            now += 5;
        }
        assert_eq!(notes, melody.len(), "{}", event);
    }
}
