//! Event notification command.

use clap::Args;
use snailmail_audio::melody::Event;
use tracing::info;

use super::get_profile;
use super::play::{DEFAULT_TICK_MS, play_and_report};
use crate::Cli;

/// Play the melody bound to an event.
///
/// Events are `new-mail` (the mailbox reported a letter) and `button-push`
/// (the receiver's button was pressed). The active profile may rebind either
/// event to another melody.
#[derive(Args)]
pub struct NotifyCommand {
    /// Event name
    event: Event,

    /// Scheduler tick period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick: u64,
}

impl NotifyCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let profile = get_profile(cli)?;
        let melody = profile.melody_for_event(self.event)?;
        let opts = profile.render_options()?;

        info!(event = %self.event, melody = %melody.id, "notify");
        play_and_report(&melody, opts.pause, self.tick).await
    }
}
