//! Melody inspection commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use snailmail_audio::melody::{ALL_MELODIES, Event, Melody, MelodyDef};

use super::{get_profile, output, resolve_melody};
use crate::Cli;

/// Inspect melodies.
///
/// Lists the built-in melodies together with those defined in the active
/// profile. `show` prints a melody in the file format accepted by `-f`.
#[derive(Args)]
pub struct MelodyCommand {
    #[command(subcommand)]
    command: MelodySubcommand,
}

#[derive(Subcommand)]
enum MelodySubcommand {
    /// List available melodies
    List,
    /// Show the notes of a melody
    Show {
        /// Melody ID or event name
        id: Option<String>,
    },
}

#[derive(Debug, Serialize)]
struct MelodySummary {
    id: String,
    name: String,
    notes: usize,
    duration_ms: u32,
    builtin: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<Event>,
}

impl MelodyCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        match &self.command {
            MelodySubcommand::List => self.list(cli),
            MelodySubcommand::Show { id } => self.show(cli, id.as_deref()),
        }
    }

    fn list(&self, cli: &Cli) -> anyhow::Result<()> {
        let profile = get_profile(cli)?;

        let mut summaries = Vec::new();
        for def in &profile.melodies {
            summaries.push(summarize(&def.to_melody()?, false));
        }
        for melody in ALL_MELODIES {
            if summaries.iter().all(|s| s.id != melody.id) {
                summaries.push(summarize(melody, true));
            }
        }
        for summary in &mut summaries {
            for event in Event::ALL {
                if profile.melody_for_event(event)?.id == summary.id {
                    summary.events.push(event);
                }
            }
        }

        if cli.json || cli.output.is_some() {
            return output(cli).write(&summaries);
        }

        println!(
            "{:<16} {:<20} {:>6} {:>10}  {}",
            "ID", "NAME", "NOTES", "DURATION", "EVENTS"
        );
        for s in &summaries {
            let events: Vec<&str> = s.events.iter().map(|e| e.id()).collect();
            println!(
                "{:<16} {:<20} {:>6} {:>8}ms  {}",
                s.id,
                s.name,
                s.notes,
                s.duration_ms,
                events.join(",")
            );
        }
        Ok(())
    }

    fn show(&self, cli: &Cli, id: Option<&str>) -> anyhow::Result<()> {
        let profile = get_profile(cli)?;
        let melody = resolve_melody(cli, &profile, id)?;
        output(cli).write(&MelodyDef::from(&melody))
    }
}

fn summarize(melody: &Melody, builtin: bool) -> MelodySummary {
    MelodySummary {
        id: melody.id.to_string(),
        name: melody.name.to_string(),
        notes: melody.len(),
        duration_ms: melody.total_duration(),
        builtin,
        events: Vec::new(),
    }
}
