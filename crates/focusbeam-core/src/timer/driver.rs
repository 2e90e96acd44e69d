//! Countdown driver.
//!
//! Runs a [`SessionTimer`] on a tokio task and feeds it one tick per elapsed
//! second while it is running. Hosts never touch the timer directly: they
//! send [`Intent`]s through a [`TimerHandle`] and observe a
//! [`watch`] channel of snapshots plus a [`broadcast`] stream of events.
//!
//! The one-second wait is re-armed whenever the timer goes from stopped to
//! running and is not polled while stopped, so pausing cancels the pending
//! tick. A tick that still races in after a pause is dropped by
//! [`SessionTimer::tick`] itself.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::engine::{SessionTimer, Snapshot, Step};
use super::session::SessionType;
use crate::error::{CoreError, Result};
use crate::events::Event;

const TICK: Duration = Duration::from_secs(1);
const INTENT_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// A user action forwarded from a host to the session timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectType(SessionType),
    AdjustDuration { session: SessionType, delta_minutes: i64 },
    StepDuration(SessionType, Step),
    Start,
    Pause,
    Toggle,
    Reset,
    Shutdown,
}

pub struct TimerDriver;

impl TimerDriver {
    /// Spawn the driver task on the current tokio runtime.
    pub fn spawn(timer: SessionTimer) -> TimerHandle {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(timer.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let task = tokio::spawn(run(timer, intent_rx, snapshot_tx, event_tx.clone()));

        TimerHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
            events: event_tx,
            task,
        }
    }
}

/// Host-side handle to a running driver.
pub struct TimerHandle {
    intents: mpsc::Sender<Intent>,
    snapshots: watch::Receiver<Snapshot>,
    events: broadcast::Sender<Event>,
    task: JoinHandle<SessionTimer>,
}

impl TimerHandle {
    pub async fn send(&self, intent: Intent) -> Result<()> {
        self.intents.send(intent).await?;
        Ok(())
    }

    pub async fn toggle(&self) -> Result<()> {
        self.send(Intent::Toggle).await
    }

    pub async fn reset(&self) -> Result<()> {
        self.send(Intent::Reset).await
    }

    pub async fn select_type(&self, session: SessionType) -> Result<()> {
        self.send(Intent::SelectType(session)).await
    }

    pub async fn adjust_duration(&self, session: SessionType, delta_minutes: i64) -> Result<()> {
        self.send(Intent::AdjustDuration {
            session,
            delta_minutes,
        })
        .await
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified after every intent and tick.
    pub fn snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Stop the driver and hand back the timer in its final state.
    pub async fn shutdown(self) -> Result<SessionTimer> {
        // The task may already have exited; joining still yields the timer.
        let _ = self.intents.send(Intent::Shutdown).await;
        self.task.await.map_err(|e| {
            tracing::error!(error = %e, "timer driver task failed");
            CoreError::DriverStopped
        })
    }
}

async fn run(
    mut timer: SessionTimer,
    mut intents: mpsc::Receiver<Intent>,
    snapshots: watch::Sender<Snapshot>,
    events: broadcast::Sender<Event>,
) -> SessionTimer {
    let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let event = tokio::select! {
            intent = intents.recv() => {
                let Some(intent) = intent else {
                    tracing::debug!("all timer handles dropped, stopping driver");
                    break;
                };
                if intent == Intent::Shutdown {
                    break;
                }
                let was_running = timer.is_running();
                let event = apply(&mut timer, intent);
                if timer.is_running() && !was_running {
                    // A fresh second starts at the moment of (re)starting.
                    ticker.reset();
                }
                event
            }
            _ = ticker.tick(), if timer.is_running() => timer.tick(),
        };

        snapshots.send_replace(timer.snapshot());
        // No subscribers is fine.
        if let Some(event) = event {
            tracing::debug!(?event, "timer event");
            let _ = events.send(event);
        }
        let _ = events.send(timer.snapshot_event());
    }

    timer
}

fn apply(timer: &mut SessionTimer, intent: Intent) -> Option<Event> {
    match intent {
        Intent::SelectType(session) => timer.select_type(session),
        Intent::AdjustDuration {
            session,
            delta_minutes,
        } => timer.adjust_duration(session, delta_minutes),
        Intent::StepDuration(session, step) => timer.step_duration(session, step),
        Intent::Start => timer.start(),
        Intent::Pause => timer.pause(),
        Intent::Toggle => timer.toggle(),
        Intent::Reset => timer.reset(),
        Intent::Shutdown => None,
    }
}
