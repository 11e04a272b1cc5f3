//! Background loop firing the full rebuild.

use super::WeeklySchedule;
use crate::kanban::ports::BoardStore;
use crate::lifecycle::services::LifecycleController;
use mockable::Clock;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handle to the running rebuild loop.
///
/// Dropping the handle without calling [`Scheduler::shutdown_and_join`]
/// closes the channel, which also stops the loop.
pub struct Scheduler {
    shutdown_tx: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl Scheduler {
    /// Spawns the loop calling [`LifecycleController::kanban`] at each fire
    /// time of `schedule`, measured against `clock`.
    #[must_use]
    pub fn spawn<S, C>(
        controller: LifecycleController<S, C>,
        schedule: WeeklySchedule,
        clock: Arc<C>,
    ) -> Self
    where
        S: BoardStore + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let join = tokio::spawn(schedule_loop(controller, schedule, clock, shutdown_rx));
        Self { shutdown_tx, join }
    }

    /// Asks the loop to stop after any rebuild in flight.
    pub fn request_shutdown(&self) {
        if self.shutdown_tx.send(true).is_err() {
            tracing::debug!("scheduler loop already stopped");
        }
    }

    /// Stops the loop and waits for it to exit.
    pub async fn shutdown_and_join(self) {
        self.request_shutdown();
        if let Err(err) = self.join.await {
            tracing::warn!(error = %err, "scheduler task ended abnormally");
        }
    }
}

async fn schedule_loop<S, C>(
    controller: LifecycleController<S, C>,
    schedule: WeeklySchedule,
    clock: Arc<C>,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let mut last_fired = None;
    loop {
        if *shutdown_rx.borrow() {
            break;
        }
        let now = clock.local();
        let reference = last_fired.filter(|fired| *fired > now).unwrap_or(now);
        let Some(next) = schedule.next_fire(&reference) else {
            tracing::warn!(?schedule, "schedule never fires; stopping scheduler");
            break;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::debug!(next = %next, "next kanban rebuild scheduled");

        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            () = tokio::time::sleep(wait) => {}
        }

        last_fired = Some(next);
        match controller.kanban().await {
            Ok(outcome) => tracing::info!(%outcome, "scheduled kanban rebuild finished"),
            Err(err) => tracing::warn!(error = %err, "scheduled kanban rebuild failed"),
        }
    }
}
