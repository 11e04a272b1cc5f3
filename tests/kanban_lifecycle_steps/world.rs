//! Shared world state for kanban lifecycle BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use reallife::kanban::{
    adapters::InMemoryBoardStore,
    domain::Board,
    ports::ScheduledDateReadiness,
    services::{BoardGate, OrderKey, SyncEngine},
};
use reallife::lifecycle::{
    adapters::{InMemoryAnnotationStore, PromptCheckpoint, RecordingTimer, ScriptedPrompt},
    domain::{PromptReply, PromptTemplates},
    services::{Capabilities, LifecycleController, SyncPolicy},
};
use rstest::fixture;

/// Clock pinned to midday on 2025-03-10.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioClock;

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }
}

/// Controller type used by the BDD world.
pub type TestController = LifecycleController<InMemoryBoardStore, ScenarioClock>;

/// Scenario world for kanban lifecycle behaviour tests.
pub struct LifecycleWorld {
    /// Board store shared with the controller.
    pub store: Arc<InMemoryBoardStore>,
    /// Controller driven by the steps.
    pub controller: TestController,
    /// Rendered outcome of the last operation.
    pub last_outcome: Option<String>,
}

impl LifecycleWorld {
    /// Creates a world over an empty board. Every prompt is dismissed, so
    /// background sessions leave the board alone.
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBoardStore::with_board(Board::new()));
        let clock = Arc::new(ScenarioClock);
        let sync = SyncEngine::new(
            Arc::new(BoardGate::new(Arc::clone(&store))),
            Arc::clone(&clock),
            Arc::new(ScheduledDateReadiness),
            OrderKey::Code,
        );
        let templates = Arc::new(PromptTemplates::default());
        let prompt = Arc::new(ScriptedPrompt::with_fallback(PromptReply::Dismissed));
        let capabilities = Capabilities {
            prompt: prompt.clone(),
            timer: Arc::new(RecordingTimer::new()),
            annotations: Arc::new(InMemoryAnnotationStore::with_repositories(["repoA"])),
            checkpoint: Arc::new(PromptCheckpoint::new(prompt, Arc::clone(&templates))),
        };
        let controller = LifecycleController::new(
            sync,
            clock,
            capabilities,
            templates,
            SyncPolicy::default(),
        );

        Self {
            store,
            controller,
            last_outcome: None,
        }
    }
}

impl Default for LifecycleWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> LifecycleWorld {
    LifecycleWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
