//! Audio output for the terminal front-end.
//!
//! There is no speaker here: each payload is optionally written to disk and
//! "plays" for a duration estimated from its size. Completion is reported
//! over a channel that the main loop forwards to the controller.

use std::path::PathBuf;
use std::time::Duration;

use stacked_common::AudioPayload;
use stacked_conversation::{AudioPlayer, PlaybackError, PlaybackId};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

/// 16-bit mono at 22.05 kHz, the TTS service's usual output.
const BYTES_PER_SECOND: u64 = 44_100;
const MAX_PLAY_TIME: Duration = Duration::from_secs(120);

/// A payload ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackDone {
    pub id: PlaybackId,
    pub success: bool,
}

pub struct FileSink {
    output_dir: Option<PathBuf>,
    done_tx: mpsc::UnboundedSender<PlaybackDone>,
    paused: watch::Sender<bool>,
}

impl FileSink {
    pub fn new(output_dir: Option<PathBuf>) -> (Self, mpsc::UnboundedReceiver<PlaybackDone>) {
        let (done_tx, done_rx) = mpsc::unbounded_channel();
        let (paused, _) = watch::channel(false);
        let sink = Self {
            output_dir,
            done_tx,
            paused,
        };
        (sink, done_rx)
    }

    fn write(&self, id: PlaybackId, audio: &AudioPayload) -> Result<(), PlaybackError> {
        let Some(dir) = &self.output_dir else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::write(dir.join(format!("reply-{id}.wav")), audio.as_bytes()))
            .map_err(|e| PlaybackError::Unavailable(format!("{}: {e}", dir.display())))?;
        debug!(%id, dir = %dir.display(), "reply audio written");
        Ok(())
    }
}

/// How long a payload of `bytes` would take to play.
pub fn play_time(bytes: usize) -> Duration {
    let millis = (bytes as u64).saturating_mul(1000) / BYTES_PER_SECOND;
    Duration::from_millis(millis).min(MAX_PLAY_TIME)
}

impl AudioPlayer for FileSink {
    fn start(&self, id: PlaybackId, audio: &AudioPayload) -> Result<(), PlaybackError> {
        self.write(id, audio)?;

        let length = play_time(audio.len());
        let done_tx = self.done_tx.clone();
        let mut paused = self.paused.subscribe();
        info!(%id, secs = length.as_secs_f64(), "speaking");

        tokio::spawn(async move {
            tokio::time::sleep(length).await;
            while *paused.borrow_and_update() {
                if paused.changed().await.is_err() {
                    break;
                }
            }
            let _ = done_tx.send(PlaybackDone { id, success: true });
        });
        Ok(())
    }

    fn pause(&self) {
        self.paused.send_replace(true);
    }

    fn resume(&self) {
        self.paused.send_replace(false);
    }
}
