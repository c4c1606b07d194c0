//! Configuration management commands.

use std::collections::HashMap;

use clap::{Args, Subcommand};
use snailmail_audio::melody::{Event, MelodyDef, Waveform};
use snailmail_cli::Profile;
use snailmail_cli::melody_file::load_file;

use super::{get_config, output, print_success};
use crate::Cli;

/// Manage CLI configuration.
///
/// Profiles allow you to keep several receiver setups, similar to
/// kubectl's context management.
///
/// Configuration is stored in ~/.snailmail/config.yaml
#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Subcommand)]
enum ConfigSubcommand {
    /// Add a new profile
    #[command(name = "add-profile")]
    AddProfile {
        /// Profile name
        name: String,
        /// Output sample rate in Hz (8000, 16000, 24000 or 48000)
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Volume 0.0-1.0
        #[arg(long)]
        volume: Option<f64>,
        /// Tone shape (square or sine)
        #[arg(long, value_parser = parse_waveform)]
        waveform: Option<Waveform>,
        /// Silence after each note in milliseconds
        #[arg(long)]
        pause: Option<u16>,
        /// Bind an event to a melody, as EVENT=MELODY (repeatable)
        #[arg(long = "bind", value_parser = parse_binding)]
        bindings: Vec<(Event, String)>,
        /// Melody definition file to include (repeatable)
        #[arg(long = "melody")]
        melody_files: Vec<String>,
    },
    /// Delete a profile
    #[command(name = "delete-profile")]
    DeleteProfile {
        /// Profile name
        name: String,
    },
    /// Set the current profile
    #[command(name = "use-profile")]
    UseProfile {
        /// Profile name
        name: String,
    },
    /// Display the current profile
    #[command(name = "get-profile")]
    GetProfile,
    /// List all profiles
    #[command(name = "list-profiles", alias = "get-profiles")]
    ListProfiles,
    /// View the current configuration
    View,
}

fn parse_waveform(s: &str) -> Result<Waveform, String> {
    match s.to_ascii_lowercase().as_str() {
        "square" => Ok(Waveform::Square),
        "sine" => Ok(Waveform::Sine),
        _ => Err(format!("unknown waveform '{}', expected square or sine", s)),
    }
}

fn parse_binding(s: &str) -> Result<(Event, String), String> {
    let (event, melody) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid binding '{}', expected EVENT=MELODY", s))?;
    let event: Event = event.parse().map_err(|e| format!("{}", e))?;
    if melody.is_empty() {
        return Err(format!("binding for '{}' has no melody", event));
    }
    Ok((event, melody.to_string()))
}

impl ConfigCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            ConfigSubcommand::AddProfile {
                name,
                sample_rate,
                volume,
                waveform,
                pause,
                bindings,
                melody_files,
            } => {
                let mut cfg = get_config(cli)?;

                let mut melodies = Vec::new();
                for path in melody_files {
                    let def: MelodyDef = load_file(path)?;
                    melodies.push(def);
                }

                let profile = Profile {
                    sample_rate: sample_rate.unwrap_or(0),
                    volume: *volume,
                    waveform: *waveform,
                    pause: *pause,
                    bindings: bindings.iter().cloned().collect::<HashMap<_, _>>(),
                    melodies,
                    ..Default::default()
                };

                cfg.add_profile(name, profile)?;
                print_success(&format!("Profile \"{}\" added successfully", name));
                Ok(())
            }

            ConfigSubcommand::DeleteProfile { name } => {
                let mut cfg = get_config(cli)?;
                cfg.delete_profile(name)?;
                print_success(&format!("Profile \"{}\" deleted", name));
                Ok(())
            }

            ConfigSubcommand::UseProfile { name } => {
                let mut cfg = get_config(cli)?;
                cfg.use_profile(name)?;
                print_success(&format!("Switched to profile \"{}\"", name));
                Ok(())
            }

            ConfigSubcommand::GetProfile => {
                let cfg = get_config(cli)?;
                if cfg.current_profile.is_empty() {
                    println!("No current profile set");
                } else {
                    println!("{}", cfg.current_profile);
                }
                Ok(())
            }

            ConfigSubcommand::ListProfiles => {
                let cfg = get_config(cli)?;

                if cfg.profiles.is_empty() {
                    println!("No profiles configured");
                    return Ok(());
                }

                println!(
                    "{:<8} {:<20} {:>11} {:>7} {}",
                    "CURRENT", "NAME", "SAMPLE_RATE", "VOLUME", "MELODIES"
                );

                for name in cfg.list_profiles() {
                    let Some(profile) = cfg.get_profile(name) else {
                        continue;
                    };
                    let current = if name == cfg.current_profile { "*" } else { "" };
                    let format = profile.format()?;
                    let volume = profile
                        .volume
                        .map(|v| format!("{:.2}", v))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<8} {:<20} {:>11} {:>7} {}",
                        current,
                        name,
                        format.sample_rate(),
                        volume,
                        profile.melodies.len()
                    );
                }

                Ok(())
            }

            ConfigSubcommand::View => {
                let cfg = get_config(cli)?;

                if cli.json {
                    return output(cli).write(&cfg);
                }

                println!("Config file: {}", cfg.path().display());
                println!("Current profile: {}", cfg.current_profile);
                println!("Profiles: {}", cfg.profiles.len());

                for name in cfg.list_profiles() {
                    let Some(profile) = cfg.get_profile(name) else {
                        continue;
                    };
                    let opts = profile.render_options()?;
                    println!("\n  {}:", name);
                    println!("    Sample rate: {} Hz", opts.format.sample_rate());
                    println!("    Volume: {:.2}", opts.volume);
                    println!("    Waveform: {:?}", opts.waveform);
                    println!("    Pause: {} ms", opts.pause);
                    for event in Event::ALL {
                        let melody = profile.melody_for_event(event)?;
                        println!("    On {}: {}", event, melody.id);
                    }
                    for def in &profile.melodies {
                        println!("    Melody {}: {} notes", def.id, def.notes.len());
                    }
                }

                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_waveform() {
        assert_eq!(parse_waveform("Sine").unwrap(), Waveform::Sine);
        assert_eq!(parse_waveform("square").unwrap(), Waveform::Square);
        assert!(parse_waveform("triangle").is_err());
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("new-mail=doorbell").unwrap(),
            (Event::NewMail, "doorbell".to_string())
        );
        assert_eq!(
            parse_binding("button_push=chirp").unwrap(),
            (Event::ButtonPush, "chirp".to_string())
        );
        assert!(parse_binding("doorbell").is_err());
        assert!(parse_binding("parcel=doorbell").is_err());
        assert!(parse_binding("new_mail=").is_err());
    }
}
