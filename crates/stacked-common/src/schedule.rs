//! Cancellable fixed-cadence background work.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// A task that runs `job` every `period`, first one period from now.
///
/// Each run is spawned on its own, so stopping the schedule leaves runs
/// already in flight alone. Dropping the handle stops the schedule.
#[derive(Debug)]
pub struct RepeatingTask {
    schedule: JoinHandle<()>,
}

impl RepeatingTask {
    /// `job` returning `None` ends the schedule.
    pub fn spawn<F, Fut>(period: Duration, mut job: F) -> Self
    where
        F: FnMut() -> Option<Fut> + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let schedule = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match job() {
                    Some(run) => {
                        tokio::spawn(run);
                    }
                    None => break,
                }
            }
        });
        Self { schedule }
    }

    /// Stop scheduling further runs.
    pub fn stop(&self) {
        self.schedule.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.schedule.is_finished()
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.schedule.abort();
    }
}
