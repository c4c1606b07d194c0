//! Real-time playback command.

use std::convert::Infallible;
use std::future::Future;
use std::time::Duration;

use clap::Args;
use snailmail_audio::melody::{Melody, PlaybackState, Step, ToneSink};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{get_profile, print_success, resolve_melody};
use crate::Cli;

/// Default scheduler period in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 10;

/// Play a melody in real time.
///
/// Drives the playback scheduler from a periodic timer, the way the
/// receiver's main loop does, and logs every tone it starts. Ctrl-C stops
/// playback.
#[derive(Args)]
pub struct PlayCommand {
    /// Melody ID or event name
    target: Option<String>,

    /// Scheduler tick period in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick: u64,
}

impl PlayCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let profile = get_profile(cli)?;
        let melody = resolve_melody(cli, &profile, self.target.as_deref())?;
        let opts = profile.render_options()?;

        play_and_report(&melody, opts.pause, self.tick).await
    }
}

/// Plays `melody` on a [`LogSink`] until it ends or Ctrl-C is pressed.
pub async fn play_and_report(melody: &Melody, pause: u16, tick_ms: u64) -> anyhow::Result<()> {
    if tick_ms == 0 {
        anyhow::bail!("tick period must be positive");
    }

    let shutdown = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let mut sink = LogSink;
    let played = match play_until(
        melody,
        pause,
        Duration::from_millis(tick_ms),
        &mut sink,
        shutdown,
    )
    .await
    {
        Ok(played) => played,
        Err(never) => match never {},
    };

    print_success(&format!(
        "Played {} of {} notes of \"{}\"",
        played,
        melody.len(),
        melody.name
    ));
    Ok(())
}

/// Runs the playback scheduler on a tokio interval.
///
/// Returns the number of notes started. Playback ends when the melody is
/// finished or `shutdown` resolves, whichever comes first.
pub async fn play_until<S, F>(
    melody: &Melody,
    pause: u16,
    tick: Duration,
    sink: &mut S,
    shutdown: F,
) -> Result<usize, S::Error>
where
    S: ToneSink,
    F: Future<Output = ()>,
{
    let start = Instant::now();
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut state = PlaybackState::new(melody).with_pause(pause);
    state.play(0);
    let mut played = 0;

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(melody = %melody.id, "interrupted");
                state.stop(sink)?;
                break;
            }
            _ = interval.tick() => {
                let now = start.elapsed().as_millis() as u32;
                match state.tick(now, sink)? {
                    Step::Note(..) => played += 1,
                    Step::Waiting => {}
                    Step::Finished | Step::Idle => break,
                }
            }
        }
    }

    debug!(melody = %melody.id, calls = state.calls, played, "playback done");
    Ok(played)
}

/// A sink that reports tones through tracing instead of a buzzer.
#[derive(Debug, Default)]
pub struct LogSink;

impl ToneSink for LogSink {
    type Error = Infallible;

    fn tone(&mut self, frequency_hz: u32, duration_ms: u32) -> Result<(), Infallible> {
        info!(frequency_hz, duration_ms, "tone");
        Ok(())
    }

    fn no_tone(&mut self) -> Result<(), Infallible> {
        debug!("silence");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snailmail_audio::melody::{MELODY_BUTTON_PUSH, MELODY_NEW_MAIL, ToneEvent, ToneLog};

    #[tokio::test(start_paused = true)]
    async fn test_play_until_finished() {
        let mut log = ToneLog::default();
        let start = Instant::now();

        let played = play_until(
            &MELODY_BUTTON_PUSH,
            30,
            Duration::from_millis(10),
            &mut log,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(played, 2);
        assert_eq!(log.tones().collect::<Vec<_>>(), vec![(988, 100), (1319, 200)]);
        assert_eq!(log.events().last(), Some(&ToneEvent::Silence));
        // B5 + pause, E6 + pause.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(360), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(380), "{:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_until_shutdown() {
        let mut log = ToneLog::default();

        let played = play_until(
            &MELODY_NEW_MAIL,
            30,
            Duration::from_millis(10),
            &mut log,
            tokio::time::sleep(Duration::from_millis(255)),
        )
        .await
        .unwrap();

        // Notes start at 0, 130 and 260ms.
        assert_eq!(played, 2);
        assert_eq!(log.tones().count(), 2);
        assert_eq!(log.events().last(), Some(&ToneEvent::Silence));
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_until_coarse_tick() {
        let mut log = ToneLog::default();

        let played = play_until(
            &MELODY_NEW_MAIL,
            0,
            Duration::from_millis(250),
            &mut log,
            std::future::pending(),
        )
        .await
        .unwrap();

        assert_eq!(played, MELODY_NEW_MAIL.len());
        assert_eq!(log.tones().count(), MELODY_NEW_MAIL.len());
    }

    #[tokio::test]
    async fn test_play_and_report_rejects_zero_tick() {
        assert!(play_and_report(&MELODY_BUTTON_PUSH, 0, 0).await.is_err());
    }
}
