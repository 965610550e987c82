//! Strictly sequential audio playback.
//!
//! At most one payload plays at a time and it is always the head of the
//! queue. The player reports completion later through
//! [`PlaybackQueue::on_playback_finished`]; the queue itself never waits.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use stacked_common::{AudioPayload, Event, EventBus};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("player rejected payload: {0}")]
    Rejected(String),
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
}

/// Identifies one enqueued payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaybackId(u64);

impl PlaybackId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Audio output the queue drives.
///
/// `start` must return promptly. Implementations report the end of a
/// payload asynchronously, never from inside `start`.
pub trait AudioPlayer: Send + Sync {
    fn start(&self, id: PlaybackId, audio: &AudioPayload) -> Result<(), PlaybackError>;

    /// Pause the payload currently playing.
    fn pause(&self);

    /// Continue a paused payload.
    fn resume(&self);
}

struct QueuedAudio {
    id: PlaybackId,
    audio: AudioPayload,
    started: bool,
}

pub struct PlaybackQueue {
    items: VecDeque<QueuedAudio>,
    player: Arc<dyn AudioPlayer>,
    events: EventBus,
    next_id: u64,
    speaking: bool,
    suspended: bool,
}

impl PlaybackQueue {
    pub fn new(player: Arc<dyn AudioPlayer>, events: EventBus) -> Self {
        Self {
            items: VecDeque::new(),
            player,
            events,
            next_id: 1,
            speaking: false,
            suspended: false,
        }
    }

    /// Append a payload. It starts at once if the queue was idle.
    pub fn enqueue(&mut self, audio: AudioPayload) -> PlaybackId {
        let id = PlaybackId(self.next_id);
        self.next_id += 1;

        debug!(%id, bytes = audio.len(), queued = self.items.len(), "audio enqueued");
        self.items.push_back(QueuedAudio {
            id,
            audio,
            started: false,
        });
        self.advance();
        id
    }

    /// The head finished, failed, or was interrupted. It is removed either way
    /// and the next payload, if any, starts.
    pub fn on_playback_finished(&mut self, success: bool) {
        let Some(done) = self.items.pop_front() else {
            debug!("playback finished with an empty queue, ignoring");
            return;
        };

        if success {
            debug!(id = %done.id, remaining = self.items.len(), "audio finished");
        } else {
            warn!(id = %done.id, remaining = self.items.len(), "audio playback failed or was interrupted");
        }

        self.advance();
    }

    /// Pause output, e.g. for an incoming call. Nothing new starts until [`resume`](Self::resume).
    pub fn suspend(&mut self) {
        if self.suspended {
            return;
        }
        self.suspended = true;
        if self.head_started() {
            self.player.pause();
        }
        info!("playback suspended");
    }

    pub fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        info!("playback resumed");
        if self.head_started() {
            self.player.resume();
        } else {
            self.advance();
        }
    }

    /// True from the first payload starting until the queue drains.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Payloads waiting or playing.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Id of the payload currently playing.
    pub fn current(&self) -> Option<PlaybackId> {
        self.items.front().filter(|item| item.started).map(|item| item.id)
    }

    fn head_started(&self) -> bool {
        self.items.front().is_some_and(|item| item.started)
    }

    /// Start the head if nothing is playing. Heads the player refuses are
    /// dropped. Signals the end of speech once the queue drains.
    fn advance(&mut self) {
        while let Some(head) = self.items.front_mut() {
            if head.started || self.suspended {
                return;
            }
            match self.player.start(head.id, &head.audio) {
                Ok(()) => {
                    head.started = true;
                    if !self.speaking {
                        self.speaking = true;
                        self.events.publish(Event::SpeakingStarted);
                    }
                    return;
                }
                Err(e) => {
                    warn!(id = %head.id, error = %e, "could not start audio, skipping");
                    self.items.pop_front();
                }
            }
        }

        if self.speaking {
            self.speaking = false;
            self.events.publish(Event::SpeakingFinished);
        }
    }
}
