//! PCM rendering command.

use std::time::Duration;

use clap::Args;
use snailmail_audio::pcm::SilenceChunk;
use snailmail_cli::pcm_file_name;
use tracing::debug;

use super::{format_bytes, get_profile, output, print_success, resolve_melody};
use crate::Cli;

/// Render a melody to raw PCM.
///
/// Writes signed 16-bit little-endian mono samples at the profile's sample
/// rate to `-o`, or to `<id>.pcm` in the current directory.
#[derive(Args)]
pub struct RenderCommand {
    /// Melody ID or event name
    target: Option<String>,

    /// Silence written before the melody, in milliseconds
    #[arg(long, default_value_t = 0)]
    lead_in: u64,
}

impl RenderCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let profile = get_profile(cli)?;
        let melody = resolve_melody(cli, &profile, self.target.as_deref())?;
        let opts = profile.render_options()?;

        debug!(
            melody = %melody.id,
            sample_rate = opts.format.sample_rate(),
            volume = opts.volume,
            waveform = ?opts.waveform,
            pause = opts.pause,
            "rendering"
        );
        let chunk = melody.render(&opts);
        let lead_in = SilenceChunk::new(opts.format, Duration::from_millis(self.lead_in));

        let (path, bytes) =
            output(cli).write_chunks(&[&lead_in, &chunk], &pcm_file_name(&melody.id))?;
        let duration = opts.format.duration(bytes);
        print_success(&format!(
            "Rendered \"{}\" to {} ({}, {} ms at {} Hz)",
            melody.name,
            path.display(),
            format_bytes(bytes),
            duration.as_millis(),
            opts.format.sample_rate()
        ));

        let result = serde_json::json!({
            "melody": melody.id,
            "notes": melody.len(),
            "sample_rate": opts.format.sample_rate(),
            "lead_in_ms": self.lead_in,
            "duration_ms": duration.as_millis() as u64,
            "bytes": bytes,
            "output_file": path.display().to_string(),
        });
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Ok(())
    }
}
