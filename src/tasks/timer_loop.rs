//! Timer event loop
//!
//! Every mutation of the timer happens here, one message at a time: clock
//! pulses and user inputs share a single queue.

use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot, watch, OwnedSemaphorePermit},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use super::ClockDriver;
use crate::{
    services::{dispatch_alarm, AlarmPlayer},
    state::{DisplayState, InputError, TimerCore, TimerEffect, TimerInput},
};

/// Capacity of the timer queue
const QUEUE_CAPACITY: usize = 64;

/// Messages processed by the timer event loop
#[derive(Debug)]
pub enum QueueMessage {
    /// User intent, answered with the resulting snapshot
    Input {
        input: TimerInput,
        reply: oneshot::Sender<Result<DisplayState, InputError>>,
    },
    /// Clock pulse; the permit is released once the pulse has been applied
    Pulse {
        generation: u64,
        permit: OwnedSemaphorePermit,
    },
    /// Stop the loop and the clock
    Shutdown,
}

/// Channels for talking to a spawned timer loop
#[derive(Debug)]
pub struct TimerHandle {
    pub queue: mpsc::Sender<QueueMessage>,
    pub snapshots: watch::Receiver<DisplayState>,
    pub task: JoinHandle<()>,
}

/// Spawn the timer loop with its own clock driver
pub fn spawn_timer_loop(core: TimerCore, alarm: Arc<dyn AlarmPlayer>) -> TimerHandle {
    let (queue_tx, queue_rx) = mpsc::channel(QUEUE_CAPACITY);
    let (snapshot_tx, snapshot_rx) = watch::channel(core.current_display_state());
    let clock = ClockDriver::new(queue_tx.clone(), core.unit_interval());

    let task = tokio::spawn(timer_event_loop(core, queue_rx, clock, alarm, snapshot_tx));

    TimerHandle {
        queue: queue_tx,
        snapshots: snapshot_rx,
        task,
    }
}

/// Drain the timer queue until shutdown
pub async fn timer_event_loop(
    mut core: TimerCore,
    mut queue: mpsc::Receiver<QueueMessage>,
    mut clock: ClockDriver,
    alarm: Arc<dyn AlarmPlayer>,
    snapshots: watch::Sender<DisplayState>,
) {
    info!("Starting timer event loop");
    snapshots.send_replace(core.current_display_state());

    while let Some(message) = queue.recv().await {
        match message {
            QueueMessage::Input { input, reply } => {
                debug!("Timer loop received input: {:?}", input);
                let result = core.handle(input).map(|t| {
                    apply_effects(&t.effects, &mut clock, &alarm);
                    t.state.display_state()
                });

                if let Err(e) = &result {
                    warn!("Rejected {} input: {}", input.name(), e);
                }
                snapshots.send_replace(core.current_display_state());

                if reply.send(result).is_err() {
                    debug!("Caller went away before the reply");
                }
            }
            QueueMessage::Pulse { generation, permit } => {
                if !clock.accepts(generation) {
                    debug!("Dropping stale pulse from generation {}", generation);
                    continue;
                }

                let t = core.on_tick();
                apply_effects(&t.effects, &mut clock, &alarm);
                snapshots.send_replace(core.current_display_state());
                drop(permit);
            }
            QueueMessage::Shutdown => {
                info!("Timer event loop shutting down");
                break;
            }
        }
    }

    clock.cancel();
}

fn apply_effects(effects: &[TimerEffect], clock: &mut ClockDriver, alarm: &Arc<dyn AlarmPlayer>) {
    for effect in effects {
        match effect {
            TimerEffect::StartClock => clock.start(),
            TimerEffect::StopClock => clock.cancel(),
            TimerEffect::PlayAlarm => {
                dispatch_alarm(Arc::clone(alarm));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use futures::future::{BoxFuture, FutureExt};

    use super::*;
    use crate::{
        services::PlaybackError,
        state::{PositiveDuration, PresetSelector},
    };

    #[derive(Default)]
    struct CountingAlarm {
        plays: AtomicUsize,
    }

    impl AlarmPlayer for CountingAlarm {
        fn play_alarm_sound(&self) -> BoxFuture<'static, Result<(), PlaybackError>> {
            self.plays.fetch_add(1, Ordering::SeqCst);
            async { Err(PlaybackError::DeviceUnavailable("test device".to_string())) }.boxed()
        }
    }

    fn spawn(total: u64) -> (TimerHandle, Arc<CountingAlarm>) {
        let alarm = Arc::new(CountingAlarm::default());
        let core = TimerCore::new(
            PositiveDuration::from_secs(total).unwrap(),
            PresetSelector::default(),
            Duration::from_secs(1),
        );
        let handle = spawn_timer_loop(core, Arc::clone(&alarm) as Arc<dyn AlarmPlayer>);
        (handle, alarm)
    }

    async fn send(handle: &TimerHandle, input: TimerInput) -> Result<DisplayState, InputError> {
        let (reply, rx) = oneshot::channel();
        handle
            .queue
            .send(QueueMessage::Input { input, reply })
            .await
            .unwrap();
        rx.await.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn counts_down_to_alarm() {
        let (handle, alarm) = spawn(5);
        let display = send(&handle, TimerInput::Start).await.unwrap();
        assert!(display.is_running);

        tokio::time::sleep(Duration::from_millis(4500)).await;
        let snapshot = *handle.snapshots.borrow();
        assert_eq!(snapshot.remaining_time, Duration::from_secs(1));
        assert!(snapshot.is_running);
        assert_eq!(alarm.plays.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = *handle.snapshots.borrow();
        assert_eq!(snapshot.remaining_time, Duration::ZERO);
        assert!(!snapshot.is_running);
        assert_eq!(alarm.plays.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(alarm.plays.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_freezes_remaining_time() {
        let (handle, _alarm) = spawn(60);
        send(&handle, TimerInput::Start).await.unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let display = send(&handle, TimerInput::Stop).await.unwrap();
        assert_eq!(display.remaining_time, Duration::from_secs(57));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(handle.snapshots.borrow().remaining_time, Duration::from_secs(57));
    }

    #[tokio::test(start_paused = true)]
    async fn scrubbing_does_not_interrupt_countdown() {
        let (handle, _alarm) = spawn(5400);
        send(&handle, TimerInput::SetDuration(Duration::from_secs(120))).await.unwrap();
        send(&handle, TimerInput::Start).await.unwrap();

        let display = send(
            &handle,
            TimerInput::DragMove {
                pointer_x: 150.0,
                track_width: 300.0,
            },
        )
        .await
        .unwrap();
        assert_eq!(display.remaining_time, Duration::from_secs(2700));
        assert!(display.is_running);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(handle.snapshots.borrow().remaining_time, Duration::from_secs(2698));
    }

    #[tokio::test(start_paused = true)]
    async fn start_on_empty_clock_is_ignored() {
        let (handle, alarm) = spawn(60);
        send(
            &handle,
            TimerInput::DragBegin {
                pointer_x: -10.0,
                track_width: 300.0,
            },
        )
        .await
        .unwrap();
        send(&handle, TimerInput::DragEnd).await.unwrap();

        let display = send(&handle, TimerInput::Start).await.unwrap();
        assert!(!display.is_running);
        assert_eq!(display.remaining_time, Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(alarm.plays.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_preset_is_reported() {
        let (handle, _alarm) = spawn(60);
        assert_eq!(
            send(&handle, TimerInput::Preset(7)).await,
            Err(InputError::UnknownPreset(7))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_ends_the_loop() {
        let (handle, _alarm) = spawn(60);
        send(&handle, TimerInput::Start).await.unwrap();
        handle.queue.send(QueueMessage::Shutdown).await.unwrap();
        handle.task.await.unwrap();
    }
}
