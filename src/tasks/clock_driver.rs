//! Periodic pulse source that drives the countdown

use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{mpsc, Semaphore},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use super::QueueMessage;

/// Sends one pulse per unit interval onto the timer queue while started.
///
/// Each start opens a new generation; pulses from a cancelled generation
/// that were already queued are recognised and dropped by the loop. At most
/// one pulse is in flight: the next is not sent until the loop has finished
/// with the previous one.
#[derive(Debug)]
pub struct ClockDriver {
    queue: mpsc::Sender<QueueMessage>,
    unit: Duration,
    generation: u64,
    in_flight: Arc<Semaphore>,
    handle: Option<JoinHandle<()>>,
}

impl ClockDriver {
    pub fn new(queue: mpsc::Sender<QueueMessage>, unit: Duration) -> Self {
        Self {
            queue,
            unit,
            generation: 0,
            in_flight: Arc::new(Semaphore::new(1)),
            handle: None,
        }
    }

    pub fn unit(&self) -> Duration {
        self.unit
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start pulsing; no-op if already started
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }

        self.generation += 1;
        debug!("Clock driver started (generation {})", self.generation);
        self.handle = Some(tokio::spawn(pulse_task(
            self.queue.clone(),
            self.unit,
            self.generation,
            Arc::clone(&self.in_flight),
        )));
    }

    /// Stop pulsing; safe to call when already cancelled
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("Clock driver cancelled (generation {})", self.generation);
        }
    }

    /// Whether a pulse stamped with `generation` should still be applied
    pub fn accepts(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for ClockDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn pulse_task(
    queue: mpsc::Sender<QueueMessage>,
    unit: Duration,
    generation: u64,
    in_flight: Arc<Semaphore>,
) {
    // First pulse lands one full unit after start
    let mut interval = interval_at(Instant::now() + unit, unit);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let permit = match Arc::clone(&in_flight).acquire_owned().await {
            Ok(permit) => permit,
            Err(_) => break,
        };
        if queue
            .send(QueueMessage::Pulse { generation, permit })
            .await
            .is_err()
        {
            debug!("Timer queue closed, clock driver exiting");
            break;
        }
    }
}
