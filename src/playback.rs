//! Fixed-rate replay of a frozen match snapshot.
//!
//! A background task advances a minute cursor once per tick and publishes the
//! reconstructed score on a `watch` channel. The cursor always stays inside
//! `[0, match_length]`; dropping the [`Playback`] handle cancels the task.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::analytics::replay::{clamp_cursor, score_at, ScoreLine};
use crate::models::Match;

/// State published after every cursor move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackFrame {
    pub minute: u32,
    pub score: ScoreLine,
    /// Cursor sits at full time
    pub finished: bool,
}

#[derive(Debug)]
enum Command {
    Pause,
    Resume,
    Seek(i64),
    Stop,
}

/// Handle to a running playback task.
pub struct Playback {
    commands: mpsc::Sender<Command>,
    frames: watch::Receiver<PlaybackFrame>,
    task: Option<JoinHandle<()>>,
}

fn frame_at(record: &Match, minute: u32, match_length: u32) -> PlaybackFrame {
    PlaybackFrame {
        minute,
        score: score_at(
            &record.events,
            &record.home_team_name,
            &record.away_team_name,
            minute,
        ),
        finished: minute >= match_length,
    }
}

impl Playback {
    /// Start playing `record` from minute 0, advancing one minute per `tick`.
    pub fn start(record: Arc<Match>, match_length: u32, tick: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (frame_tx, frame_rx) = watch::channel(frame_at(&record, 0, match_length));

        let task = tokio::spawn(run(record, match_length, tick, cmd_rx, frame_tx));

        Playback {
            commands: cmd_tx,
            frames: frame_rx,
            task: Some(task),
        }
    }

    /// A receiver that observes every published frame.
    pub fn frames(&self) -> watch::Receiver<PlaybackFrame> {
        self.frames.clone()
    }

    pub fn current(&self) -> PlaybackFrame {
        *self.frames.borrow()
    }

    pub async fn pause(&self) {
        self.send(Command::Pause).await;
    }

    /// Continue playing. Resuming at full time rewinds to minute 0.
    pub async fn resume(&self) {
        self.send(Command::Resume).await;
    }

    /// Jump to `minute`, clamped into `[0, match_length]`.
    pub async fn seek(&self, minute: i64) {
        self.send(Command::Seek(minute)).await;
    }

    async fn send(&self, cmd: Command) {
        if let Err(e) = self.commands.send(cmd).await {
            debug!("Playback task already ended, command {:?} dropped", e.0);
        }
    }

    /// Stop playback and wait for the task to exit.
    pub async fn stop(mut self) {
        self.send(Command::Stop).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for Playback {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    record: Arc<Match>,
    match_length: u32,
    tick: Duration,
    mut commands: mpsc::Receiver<Command>,
    frames: watch::Sender<PlaybackFrame>,
) {
    let mut cursor = 0u32;
    let mut playing = match_length > 0;
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // first tick completes immediately
    interval.tick().await;

    let publish = |minute: u32| {
        let frame = frame_at(&record, minute, match_length);
        let prev = frames.send_replace(frame);
        if prev.score != frame.score {
            info!(
                "Replay {}' {} {}-{} {}",
                minute, record.home_team_name, frame.score.home, frame.score.away, record.away_team_name
            );
        }
    };

    loop {
        tokio::select! {
            _ = interval.tick(), if playing => {
                cursor = (cursor + 1).min(match_length);
                if cursor >= match_length {
                    playing = false;
                }
                publish(cursor);
            }
            cmd = commands.recv() => {
                debug!("Playback command: {:?}", cmd);
                match cmd {
                    Some(Command::Pause) => playing = false,
                    Some(Command::Resume) => {
                        if cursor >= match_length {
                            cursor = 0;
                            publish(cursor);
                        }
                        playing = match_length > 0;
                        interval.reset();
                    }
                    Some(Command::Seek(minute)) => {
                        cursor = clamp_cursor(minute, match_length);
                        if cursor >= match_length {
                            playing = false;
                        }
                        publish(cursor);
                    }
                    Some(Command::Stop) | None => break,
                }
            }
        }
    }
    debug!("Playback of {} ended at minute {}", record.id, cursor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::tests::sample_match;
    use crate::models::{EventType, MatchEvent};

    fn record() -> Arc<Match> {
        Arc::new(sample_match(vec![
            MatchEvent::new(2, "Lions", EventType::Try),
            MatchEvent::new(3, "Lions", EventType::Conversion),
            MatchEvent::new(8, "Sharks", EventType::Penalty),
        ]))
    }

    const TICK: Duration = Duration::from_millis(200);

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_full_time() {
        let playback = Playback::start(record(), 10, TICK);
        let mut rx = playback.frames();
        assert_eq!(rx.borrow().minute, 0);

        let mut seen = Vec::new();
        loop {
            let frame = *rx.borrow_and_update();
            seen.push(frame.minute);
            if frame.finished {
                break;
            }
            rx.changed().await.unwrap();
        }

        let last = playback.current();
        assert_eq!(last.minute, 10);
        assert_eq!(last.score, ScoreLine { home: 7, away: 3 });
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_holds_cursor() {
        let playback = Playback::start(record(), 80, TICK);
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        playback.pause().await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        let held = playback.current().minute;
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(playback.current().minute, held);
        assert!(held < 80);

        playback.resume().await;
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(playback.current().minute > held);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_is_clamped() {
        let playback = Playback::start(record(), 80, TICK);
        let mut rx = playback.frames();
        playback.pause().await;
        tokio::time::sleep(Duration::from_millis(500)).await;
        rx.borrow_and_update();

        playback.seek(-5).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().minute, 0);

        playback.seek(500).await;
        rx.changed().await.unwrap();
        let frame = *rx.borrow_and_update();
        assert_eq!(frame.minute, 80);
        assert!(frame.finished);
        assert_eq!(frame.score, ScoreLine { home: 7, away: 3 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_ends_task() {
        let playback = Playback::start(record(), 80, TICK);
        let mut rx = playback.frames();
        playback.stop().await;
        while rx.changed().await.is_ok() {}
        assert!(rx.has_changed().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_commands_after_task_exit_are_ignored() {
        let mut playback = Playback::start(record(), 80, TICK);
        if let Some(task) = playback.task.take() {
            task.abort();
            let _ = task.await;
        }
        let before = playback.current();
        playback.pause().await;
        playback.seek(40).await;
        playback.resume().await;
        assert_eq!(playback.current(), before);
        playback.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let playback = Playback::start(record(), 80, TICK);
        let mut rx = playback.frames();
        drop(playback);
        // drain anything published before the abort landed
        while rx.changed().await.is_ok() {}
        assert!(rx.borrow().minute < 80);
    }
}
