//! Controller harness over in-memory adapters.

use std::sync::Arc;

use crate::kanban::{
    adapters::InMemoryBoardStore,
    domain::Board,
    ports::ScheduledDateReadiness,
    services::{BoardGate, OrderKey, SyncEngine},
};
use crate::lifecycle::{
    adapters::{InMemoryAnnotationStore, PromptCheckpoint, RecordingTimer, ScriptedPrompt},
    domain::{PromptReply, PromptRequest, PromptTemplates},
    ports::{CapabilityResult, Prompt},
    services::{Capabilities, LifecycleController, SyncPolicy},
};
use crate::test_support::FixedClock;
use async_trait::async_trait;
use tokio::sync::Semaphore;

/// Controller over the in-memory store and a fixed clock.
pub type TestController = LifecycleController<InMemoryBoardStore, FixedClock>;

/// Controller plus the adapters a test inspects afterwards.
pub struct Harness {
    /// Board store shared with the controller.
    pub store: Arc<InMemoryBoardStore>,
    /// Timer recording start and stop calls.
    pub timer: RecordingTimer,
    /// Annotation store for `repoA` and `repoB`.
    pub annotations: InMemoryAnnotationStore,
    /// Controller under test.
    pub controller: TestController,
}

/// Builds a harness over `board` with the given prompt and timer.
pub fn harness_with<P>(board: Board, prompt: P, timer: RecordingTimer) -> Harness
where
    P: Prompt + Clone + 'static,
{
    let store = Arc::new(InMemoryBoardStore::with_board(board));
    let clock = Arc::new(FixedClock::on(2025, 3, 10));
    let sync = SyncEngine::new(
        Arc::new(BoardGate::new(Arc::clone(&store))),
        Arc::clone(&clock),
        Arc::new(ScheduledDateReadiness),
        OrderKey::Code,
    );
    let templates = Arc::new(PromptTemplates::default());
    let annotations = InMemoryAnnotationStore::with_repositories(["repoA", "repoB"]);
    let capabilities = Capabilities {
        prompt: Arc::new(prompt.clone()),
        timer: Arc::new(timer.clone()),
        annotations: Arc::new(annotations.clone()),
        checkpoint: Arc::new(PromptCheckpoint::new(Arc::new(prompt), Arc::clone(&templates))),
    };
    let controller = LifecycleController::new(
        sync,
        clock,
        capabilities,
        templates,
        SyncPolicy::default(),
    );
    Harness {
        store,
        timer,
        annotations,
        controller,
    }
}

/// Builds a harness with a fresh recording timer.
pub fn harness(board: Board, prompt: ScriptedPrompt) -> Harness {
    harness_with(board, prompt, RecordingTimer::new())
}

/// Board holding `items` in the running pool.
pub fn running(items: &[&str]) -> Board {
    Board::new()
        .with_items(crate::kanban::domain::Pool::Running, items)
        .expect("fixture board is valid")
}

/// Prompt that waits for a permit before answering from a script.
#[derive(Clone)]
pub struct GatedPrompt {
    permits: Arc<Semaphore>,
    inner: ScriptedPrompt,
}

impl GatedPrompt {
    /// Wraps `inner` with no permits issued.
    pub fn new(inner: ScriptedPrompt) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
            inner,
        }
    }

    /// Lets `count` prompts answer.
    pub fn release(&self, count: usize) {
        self.permits.add_permits(count);
    }
}

#[async_trait]
impl Prompt for GatedPrompt {
    async fn confirm(&self, request: &PromptRequest) -> CapabilityResult<PromptReply> {
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
        self.inner.confirm(request).await
    }
}
