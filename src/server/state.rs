//! Shared application context built once at start-up.

use crate::config::{ConfigError, ReallifeConfig};
use crate::kanban::{
    adapters::MarkdownBoardStore,
    ports::{BoardStore, BoardStoreError, ScheduledDateReadiness},
    services::{BoardGate, SyncEngine},
};
use crate::lifecycle::{
    adapters::{
        CanvasAnnotationStore, PromptCheckpoint,
        desktop::{DialogPrompt, OsaScript, ShortcutsTimer},
    },
    services::{Capabilities, LifecycleController},
};
use crate::scheduler::{Scheduler, WeeklySchedule};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Handles shared by the router and the scheduler.
pub struct AppContext<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    controller: LifecycleController<S, C>,
    clock: Arc<C>,
}

impl<S, C> Clone for AppContext<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, C> AppContext<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Bundles a controller with the clock it was built over.
    #[must_use]
    pub const fn new(controller: LifecycleController<S, C>, clock: Arc<C>) -> Self {
        Self { controller, clock }
    }

    /// Returns the lifecycle controller.
    #[must_use]
    pub const fn controller(&self) -> &LifecycleController<S, C> {
        &self.controller
    }

    /// Starts the weekly rebuild loop.
    #[must_use]
    pub fn spawn_scheduler(&self, schedule: WeeklySchedule) -> Scheduler {
        Scheduler::spawn(self.controller.clone(), schedule, Arc::clone(&self.clock))
    }
}

/// Context wired to the markdown board and the macOS desktop.
pub type DesktopContext = AppContext<MarkdownBoardStore, DefaultClock>;

/// Errors that stop the client from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The board document path is unusable.
    #[error(transparent)]
    Board(#[from] BoardStoreError),
    /// Logging could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TryInitError),
    /// The listener could not be bound or the server failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DesktopContext {
    /// Wires the production adapters described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Board`] when the board path has no file name.
    pub fn from_config(config: &ReallifeConfig) -> Result<Self, StartupError> {
        let store = Arc::new(MarkdownBoardStore::new(&config.board_path)?);
        let clock = Arc::new(DefaultClock);
        let sync = SyncEngine::new(
            Arc::new(BoardGate::new(store)),
            Arc::clone(&clock),
            Arc::new(ScheduledDateReadiness),
            config.order_key,
        );
        let templates = Arc::new(config.prompts.clone());
        let prompt = Arc::new(DialogPrompt::new(OsaScript::system()));
        let capabilities = Capabilities {
            prompt: prompt.clone(),
            timer: Arc::new(ShortcutsTimer::new(
                OsaScript::system(),
                config.shortcuts.clone(),
            )),
            annotations: Arc::new(CanvasAnnotationStore::new(config.canvases.clone())),
            checkpoint: Arc::new(PromptCheckpoint::new(prompt, Arc::clone(&templates))),
        };
        let controller = LifecycleController::new(
            sync,
            Arc::clone(&clock),
            capabilities,
            templates,
            config.policy,
        );
        tracing::info!(board = %config.board_path, "desktop context ready");
        Ok(Self::new(controller, clock))
    }
}
