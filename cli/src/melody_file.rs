//! Loading user melodies from YAML or JSON files.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;
use snailmail_audio::melody::{Melody, MelodyDef};
use thiserror::Error;

/// Error type for melody file loading.
#[derive(Debug, Error)]
pub enum MelodyFileError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),
    #[error("failed to parse file (tried YAML and JSON)")]
    ParseFailed,
    #[error(transparent)]
    Invalid(#[from] snailmail_audio::Error),
}

/// Loads and validates a melody definition file.
pub fn load_melody(path: impl AsRef<Path>) -> Result<Melody, MelodyFileError> {
    let def: MelodyDef = load_file(path)?;
    Ok(def.to_melody()?)
}

/// Loads and validates a melody definition from stdin.
pub fn load_melody_from_stdin() -> Result<Melody, MelodyFileError> {
    let mut data = Vec::new();
    io::stdin().read_to_end(&mut data)?;
    let def: MelodyDef = parse_file(&data, "-")?;
    Ok(def.to_melody()?)
}

/// Loads a YAML or JSON file into the provided type.
pub fn load_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, MelodyFileError> {
    let data = fs::read(path.as_ref())?;
    parse_file(&data, path.as_ref())
}

/// Parses data based on file extension, or by trying YAML then JSON.
pub fn parse_file<T: DeserializeOwned>(data: &[u8], path: impl AsRef<Path>) -> Result<T, MelodyFileError> {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_slice(data)?),
        Some("json") => Ok(serde_json::from_slice(data)?),
        _ => {
            if let Ok(v) = serde_yaml::from_slice(data) {
                return Ok(v);
            }
            if let Ok(v) = serde_json::from_slice(data) {
                return Ok(v);
            }
            Err(MelodyFileError::ParseFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snailmail_audio::melody::{Note, Pitch};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "id: chime\nname: Chime\nnotes: [\"E5:150\", \"C5:300\"]").unwrap();

        let melody = load_melody(file.path()).unwrap();
        assert_eq!(melody.id, "chime");
        assert_eq!(
            melody.notes(),
            &[Note::new(Pitch::E5, 150), Note::new(Pitch::C5, 300)]
        );
    }

    #[test]
    fn test_load_json() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        writeln!(
            file,
            r#"{{"id": "beep", "notes": [{{"pitch": "A4", "duration": 80}}]}}"#
        )
        .unwrap();

        let melody = load_melody(file.path()).unwrap();
        assert_eq!(melody.name, "beep");
        assert_eq!(melody.notes(), &[Note::new(Pitch::A4, 80)]);
    }

    #[test]
    fn test_parse_unknown_extension() {
        let data = b"id: x\nnotes: [\"C4:100\"]";
        let def: MelodyDef = parse_file(data, "melody.txt").unwrap();
        assert_eq!(def.notes.len(), 1);
    }

    #[test]
    fn test_parse_invalid() {
        let data = b"invalid data {{{{";
        let result: Result<MelodyDef, _> = parse_file(data, "melody.txt");
        assert!(matches!(result, Err(MelodyFileError::ParseFailed)));
    }

    #[test]
    fn test_load_rejects_zero_duration() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        writeln!(file, "id: bad\nnotes: [\"C4:0\"]").unwrap();

        let err = load_melody(file.path()).unwrap_err();
        assert!(matches!(
            err,
            MelodyFileError::Invalid(snailmail_audio::Error::ZeroDuration { index: 0 })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_melody("/nonexistent/melody.yaml").unwrap_err();
        assert!(matches!(err, MelodyFileError::ReadFile(_)));
    }
}
