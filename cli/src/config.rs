//! Configuration management for the notifier tools.
//!
//! Configuration is stored in ~/.snailmail/config.yaml and holds named
//! profiles, similar to kubectl's contexts. A profile describes how a
//! receiver sounds: output format, volume, note pause, which melody each
//! event plays, and any user-defined melodies.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use snailmail_audio::Format;
use snailmail_audio::melody::{Event, Melody, MelodyDef, RenderOptions, Waveform};
use tracing::debug;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".snailmail";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Name of the currently active profile.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub current_profile: String,

    /// Map of profile name to profile configuration.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub profiles: HashMap<String, Profile>,

    /// Path to the config file (not serialized).
    #[serde(skip)]
    config_path: PathBuf,
}

/// How one receiver sounds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    /// Output sample rate in Hz (optional, 16000 if zero).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sample_rate: u32,

    /// Volume 0.0-1.0 (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,

    /// Tone shape (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<Waveform>,

    /// Silence after each note in milliseconds (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pause: Option<u16>,

    /// Melody ID played for each event, overriding the built-in binding.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub bindings: HashMap<Event, String>,

    /// User-defined melodies, looked up before the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub melodies: Vec<MelodyDef>,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Config {
    /// Gets the default config directory.
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(DEFAULT_BASE_DIR))
    }

    /// Gets the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Returns the config file path.
    pub fn path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Saves the configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Adds or replaces a profile after validating it.
    pub fn add_profile(&mut self, name: &str, mut profile: Profile) -> anyhow::Result<()> {
        profile.name = name.to_string();
        profile.validate()?;
        self.profiles.insert(name.to_string(), profile);
        self.save()
    }

    /// Deletes a profile.
    pub fn delete_profile(&mut self, name: &str) -> anyhow::Result<()> {
        if self.profiles.remove(name).is_none() {
            anyhow::bail!("profile '{}' not found", name);
        }
        if self.current_profile == name {
            self.current_profile.clear();
        }
        self.save()
    }

    /// Sets the current profile.
    pub fn use_profile(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.profiles.contains_key(name) {
            anyhow::bail!("profile '{}' not found", name);
        }
        self.current_profile = name.to_string();
        self.save()
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn get_current_profile(&self) -> Option<&Profile> {
        if self.current_profile.is_empty() {
            return None;
        }
        self.profiles.get(&self.current_profile)
    }

    /// Resolves the profile by name, or the current profile if no name is given.
    pub fn resolve_profile(&self, name: Option<&str>) -> Option<&Profile> {
        match name {
            Some(n) if !n.is_empty() => self.get_profile(n),
            _ => self.get_current_profile(),
        }
    }

    /// Lists all profile names, sorted.
    pub fn list_profiles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Profile {
    /// Checks user melodies, bindings, volume range and sample rate.
    pub fn validate(&self) -> anyhow::Result<()> {
        for def in &self.melodies {
            def.to_melody()?;
        }
        for (event, id) in &self.bindings {
            if self.find_melody(id).is_err() {
                anyhow::bail!("event '{}' is bound to unknown melody '{}'", event, id);
            }
        }
        if let Some(volume) = self.volume {
            if !(0.0..=1.0).contains(&volume) {
                anyhow::bail!("volume {} is outside 0.0-1.0", volume);
            }
        }
        self.format()?;
        Ok(())
    }

    /// Returns the configured output format.
    pub fn format(&self) -> anyhow::Result<Format> {
        if self.sample_rate == 0 {
            return Ok(Format::default());
        }
        Format::from_sample_rate(self.sample_rate)
            .ok_or_else(|| anyhow::anyhow!("unsupported sample rate {}", self.sample_rate))
    }

    /// Builds render options from the profile, falling back to defaults.
    pub fn render_options(&self) -> anyhow::Result<RenderOptions> {
        let mut opts = RenderOptions::default().with_format(self.format()?);
        if let Some(volume) = self.volume {
            opts = opts.with_volume(volume);
        }
        if let Some(waveform) = self.waveform {
            opts = opts.with_waveform(waveform);
        }
        if let Some(pause) = self.pause {
            opts = opts.with_pause(pause);
        }
        Ok(opts)
    }

    /// Finds a melody by ID, user melodies first.
    pub fn find_melody(&self, id: &str) -> anyhow::Result<Melody> {
        if let Some(def) = self.melodies.iter().find(|d| d.id == id) {
            return Ok(def.to_melody()?);
        }
        Melody::by_id(id)
            .cloned()
            .ok_or_else(|| snailmail_audio::Error::UnknownMelody(id.to_string()).into())
    }

    /// Returns the melody that plays for `event`.
    pub fn melody_for_event(&self, event: Event) -> anyhow::Result<Melody> {
        match self.bindings.get(&event) {
            Some(id) => {
                debug!(%event, melody = %id, "using profile binding");
                self.find_melody(id)
            }
            None => Ok(event.melody().clone()),
        }
    }
}

/// Loads configuration, creating an empty file if none exists.
pub fn load_config(custom_path: Option<&str>) -> anyhow::Result<Config> {
    let config_path = match custom_path {
        Some(p) => PathBuf::from(p),
        None => Config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine config path"))?,
    };

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut cfg = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        serde_yaml::from_str(&content)?
    } else {
        let cfg = Config::default();
        let content = serde_yaml::to_string(&cfg)?;
        std::fs::write(&config_path, content)?;
        cfg
    };

    cfg.config_path = config_path;
    debug!(path = %cfg.config_path.display(), profiles = cfg.profiles.len(), "config loaded");

    Ok(cfg)
}
