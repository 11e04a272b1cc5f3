//! Timed focus session port.

use super::CapabilityResult;
use crate::task::domain::DurationUnits;
use async_trait::async_trait;

/// External timer that tracks a focus session.
#[async_trait]
pub trait SessionTimer: Send + Sync {
    /// Starts a timer called `name` for `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`super::CapabilityError`] when the timer cannot be started.
    async fn start_timer(&self, name: &str, duration: DurationUnits) -> CapabilityResult<()>;

    /// Stops whichever timer is running. Stopping an idle timer succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`super::CapabilityError`] when the timer cannot be reached.
    async fn stop_timer(&self) -> CapabilityResult<()>;
}
