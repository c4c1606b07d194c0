//! Output utilities for CLI tools.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use snailmail_audio::pcm::Chunk;

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// YAML format (default).
    #[default]
    Yaml,
    /// JSON format.
    Json,
}

/// Output configuration.
pub struct Output {
    pub format: OutputFormat,
    pub file: Option<String>,
}

impl Output {
    /// Creates a new output configuration.
    pub fn new(format: OutputFormat, file: Option<String>) -> Self {
        Self { format, file }
    }

    /// Serializes `value` in the configured format.
    pub fn render<T: Serialize>(&self, value: &T) -> anyhow::Result<String> {
        Ok(match self.format {
            OutputFormat::Yaml => serde_yaml::to_string(value)?,
            OutputFormat::Json => serde_json::to_string_pretty(value)?,
        })
    }

    /// Outputs the result.
    pub fn write<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        let output = self.render(value)?;

        match &self.file {
            Some(path) => {
                let mut file = File::create(path)?;
                file.write_all(output.as_bytes())?;
            }
            None => {
                println!("{}", output);
            }
        }

        Ok(())
    }

    /// Writes PCM chunks back to back as raw little-endian samples.
    ///
    /// The `-o` file wins over `default_path`. Returns the path written and
    /// the number of bytes.
    pub fn write_chunks(
        &self,
        chunks: &[&dyn Chunk],
        default_path: &Path,
    ) -> anyhow::Result<(PathBuf, u64)> {
        let path = self
            .file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| default_path.to_path_buf());
        let mut writer = BufWriter::new(File::create(&path)?);
        let mut written = 0;
        for chunk in chunks {
            written += chunk.write_to(&mut writer)?;
        }
        writer.flush()?;
        Ok((path, written))
    }
}

/// Default file name for rendered audio of `id`.
pub fn pcm_file_name(id: &str) -> PathBuf {
    PathBuf::from(format!("{}.pcm", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snailmail_audio::pcm::{DataChunk, Format, SilenceChunk};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_render_formats() {
        let value = serde_json::json!({"id": "new_mail", "notes": 27});

        let yaml = Output::new(OutputFormat::Yaml, None).render(&value).unwrap();
        assert!(yaml.contains("id: new_mail"));

        let json = Output::new(OutputFormat::Json, None).render(&value).unwrap();
        assert!(json.contains("\"notes\": 27"));
    }

    #[test]
    fn test_write_chunks_prefers_output_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.pcm");
        let fallback = dir.path().join("fallback.pcm");
        let chunk = DataChunk::from_samples(Format::L16Mono8K, vec![1, -1, 256]);

        let out = Output::new(OutputFormat::Yaml, Some(target.to_string_lossy().into_owned()));
        let (written, bytes) = out.write_chunks(&[&chunk], &fallback).unwrap();

        assert_eq!(written, target);
        assert_eq!(bytes, 6);
        assert!(!fallback.exists());
        assert_eq!(std::fs::read(&target).unwrap(), vec![1, 0, 255, 255, 0, 1]);
    }

    #[test]
    fn test_write_chunks_default_path() {
        let dir = TempDir::new().unwrap();
        let fallback = dir.path().join(pcm_file_name("button_push"));
        let lead_in = SilenceChunk::new(Format::L16Mono8K, Duration::from_millis(1));
        let chunk = DataChunk::from_samples(Format::L16Mono8K, vec![-1; 4]);

        let (written, bytes) = Output::new(OutputFormat::Json, None)
            .write_chunks(&[&lead_in, &chunk], &fallback)
            .unwrap();
        assert_eq!(written, fallback);
        assert_eq!(bytes, 16 + 8);

        let data = std::fs::read(&fallback).unwrap();
        assert!(data[..16].iter().all(|&b| b == 0));
        assert!(data[16..].iter().all(|&b| b == 0xff));
    }
}
