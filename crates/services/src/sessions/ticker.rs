use log::debug;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::workflow::QuizEvent;

/// Background task that feeds one `QuizEvent::Tick` per period into the
/// controller's event channel.
///
/// At most one task runs per ticker. Every start gets a new generation, so
/// ticks still queued from an earlier task can be told apart and dropped.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
    generation: u64,
    driving: Option<u64>,
}

impl Ticker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop any running task, then spawn a new one driving countdown `epoch`.
    ///
    /// Must be called from within a tokio runtime. Returns the generation
    /// stamped on the new task's ticks.
    pub fn start(&mut self, epoch: u64, period: Duration, events: UnboundedSender<QuizEvent>) -> u64 {
        self.stop();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(QuizEvent::Tick { generation }).is_err() {
                    break;
                }
            }
        });

        debug!("[Ticker] Generation {generation} driving countdown {epoch}");
        self.handle = Some(handle);
        self.driving = Some(epoch);
        generation
    }

    /// Abort the running task, if any. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("[Ticker] Generation {} stopped", self.generation);
        }
        self.driving = None;
    }

    /// Countdown epoch the running task drives.
    #[must_use]
    pub fn driving(&self) -> Option<u64> {
        self.driving
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick stamped with `generation` comes from the running task.
    #[must_use]
    pub fn accepts(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn emits_ticks_with_its_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();

        let generation = ticker.start(7, Duration::from_secs(1), tx);

        assert_eq!(ticker.driving(), Some(7));
        assert!(ticker.accepts(generation));
        for _ in 0..3 {
            match rx.recv().await {
                Some(QuizEvent::Tick { generation: got }) => assert_eq!(got, generation),
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn restart_replaces_the_previous_generation() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();

        let first = ticker.start(1, Duration::from_secs(1), tx.clone());
        let second = ticker.start(2, Duration::from_secs(1), tx);

        assert_ne!(first, second);
        assert!(!ticker.accepts(first));
        assert!(ticker.accepts(second));
        assert_eq!(ticker.driving(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_silences_the_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        let generation = ticker.start(1, Duration::from_secs(1), tx);

        ticker.stop();
        ticker.stop();
        time::sleep(Duration::from_secs(5)).await;

        assert!(rx.try_recv().is_err());
        assert!(!ticker.is_running());
        assert!(!ticker.accepts(generation));
        assert_eq!(ticker.driving(), None);
    }
}
