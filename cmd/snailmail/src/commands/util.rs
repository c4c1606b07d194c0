//! Utility functions for CLI commands.

use snailmail_audio::melody::{Event, Melody};
use snailmail_cli::{
    Config, Output, OutputFormat, Profile, load_config, load_melody, load_melody_from_stdin,
};
use tracing::debug;

use crate::Cli;

/// Gets the global configuration.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    load_config(cli.config.as_deref())
}

/// Gets the profile to use.
///
/// Without `-p` and without a current profile the built-in defaults apply.
pub fn get_profile(cli: &Cli) -> anyhow::Result<Profile> {
    let cfg = get_config(cli)?;

    match cfg.resolve_profile(cli.profile.as_deref()) {
        Some(profile) => Ok(profile.clone()),
        None => match cli.profile.as_deref() {
            Some(name) if !name.is_empty() => anyhow::bail!("profile '{}' not found", name),
            _ => {
                debug!("no profile selected, using defaults");
                Ok(Profile::default())
            }
        },
    }
}

/// Resolves the melody a command operates on.
///
/// A `-f` file wins. Otherwise `target` names a melody, or an event whose
/// bound melody is used when no melody has that ID.
pub fn resolve_melody(cli: &Cli, profile: &Profile, target: Option<&str>) -> anyhow::Result<Melody> {
    if let Some(input) = cli.input.as_deref() {
        debug!(file = input, "loading melody file");
        let melody = if input == "-" {
            load_melody_from_stdin()?
        } else {
            load_melody(input)?
        };
        return Ok(melody);
    }

    let target = target
        .ok_or_else(|| anyhow::anyhow!("melody ID or event is required, or use -f flag"))?;

    match profile.find_melody(target) {
        Ok(melody) => Ok(melody),
        Err(err) if is_unknown_melody(&err) => match target.parse::<Event>() {
            Ok(event) => profile.melody_for_event(event),
            Err(_) => Err(err),
        },
        Err(err) => Err(err),
    }
}

fn is_unknown_melody(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<snailmail_audio::Error>(),
        Some(snailmail_audio::Error::UnknownMelody(_))
    )
}

/// Returns the output configuration from the global flags.
pub fn output(cli: &Cli) -> Output {
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    };
    Output::new(format, cli.output.clone())
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Formats bytes to human readable string.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
