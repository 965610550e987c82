//! Cached, periodically refreshed view of the agent service.
//!
//! A poll fetches statuses and notifications concurrently and commits them
//! together only when both succeed. A failed poll is logged and the previous
//! snapshot stays in place.

mod types;


use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use stacked_common::{Event, EventBus, RepeatingTask};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::{AgentDirectory, AgentServiceError};
use crate::protocol::Thought;

pub use types::AgentSnapshot;

struct Cache {
    snapshot: AgentSnapshot,
    /// Sequence number of the poll that produced `snapshot`.
    seq: u64,
}

pub struct StatusPoller {
    directory: Arc<dyn AgentDirectory>,
    cache: RwLock<Cache>,
    next_seq: AtomicU64,
    events: EventBus,
}

impl StatusPoller {
    pub fn new(directory: Arc<dyn AgentDirectory>, events: EventBus) -> Self {
        Self {
            directory,
            cache: RwLock::new(Cache {
                snapshot: AgentSnapshot::default(),
                seq: 0,
            }),
            next_seq: AtomicU64::new(1),
            events,
        }
    }

    /// Fetch statuses and notifications and replace the cache with both.
    ///
    /// On any failure the cache is left untouched and the error returned.
    /// A poll that finishes after a newer one has already committed is
    /// discarded.
    pub async fn poll_once(&self) -> Result<AgentSnapshot, AgentServiceError> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);

        let (statuses, notifications) =
            tokio::join!(self.directory.agents(), self.directory.notifications());

        let snapshot = match (statuses, notifications) {
            (Ok(statuses), Ok(notifications)) => AgentSnapshot {
                statuses,
                notifications,
            },
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "agent poll failed, keeping previous snapshot");
                return Err(e);
            }
        };

        {
            let mut cache = self.cache.write().await;
            if seq < cache.seq {
                debug!(seq, committed = cache.seq, "discarding stale poll result");
                return Ok(cache.snapshot.clone());
            }
            cache.snapshot = snapshot.clone();
            cache.seq = seq;
        }

        debug!(
            agents = snapshot.statuses.len(),
            notifications = snapshot.notifications.len(),
            "agent snapshot updated"
        );
        self.events.publish(Event::AgentsUpdated {
            agents: snapshot.statuses.len(),
            notifications: snapshot.notifications.len(),
        });
        Ok(snapshot)
    }

    /// Ask the service to run an agent now, then refresh the snapshot.
    ///
    /// Only the trigger's own failure is returned; a failing re-poll is
    /// logged like any other poll failure.
    pub async fn trigger_agent(&self, agent_id: &str) -> Result<(), AgentServiceError> {
        self.directory.trigger(agent_id).await?;
        info!(agent_id, "agent triggered");
        let _ = self.poll_once().await;
        Ok(())
    }

    /// Recent thoughts of one agent, newest first. Not cached.
    pub async fn get_thoughts(
        &self,
        agent_id: &str,
        limit: u32,
    ) -> Result<Vec<Thought>, AgentServiceError> {
        self.directory.thoughts(agent_id, limit).await
    }

    /// The last committed snapshot.
    pub async fn snapshot(&self) -> AgentSnapshot {
        self.cache.read().await.snapshot.clone()
    }

    /// Poll every `period`, starting one period from now.
    ///
    /// Each poll runs as its own task, so stopping the schedule never cuts a
    /// request short.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> RepeatingTask {
        let poller = Arc::clone(self);
        RepeatingTask::spawn(period, move || {
            let poller = Arc::clone(&poller);
            Some(async move {
                let _ = poller.poll_once().await;
            })
        })
    }
}
