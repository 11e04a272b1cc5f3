//! Lifecycle controller: the entry points behind the HTTP surface.

use super::session::{self, SessionContext};
use super::tracker::{SessionLedger, SessionTracker};
use crate::kanban::{
    domain::{Board, KanbanDomainError, Pool},
    ports::{BoardStore, OrderCheckpoint},
    services::{BoardGate, SyncEngine, SyncError, TransactionError},
};
use crate::lifecycle::{
    domain::{
        LifecycleOutcome, PromptTemplates, SessionId, SessionReport, StatusView, TemplateError,
        Tip, TipError,
    },
    ports::{AnnotationError, AnnotationStore, Prompt, SessionTimer},
};
use crate::task::domain::{ACTION_PREFIX, Decoded, TaskItem, TaskStatus, decode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Service-level errors for lifecycle operations.
///
/// Operator-facing "nothing to do" results are [`LifecycleOutcome`] values,
/// not errors.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// A board transaction failed.
    #[error(transparent)]
    Transaction(#[from] TransactionError),
    /// A sync phase failed.
    #[error(transparent)]
    Sync(#[from] SyncError),
    /// Tip text was malformed.
    #[error(transparent)]
    Tip(#[from] TipError),
    /// The annotation store rejected a tip.
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    /// A prompt template failed to render.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// The request is missing data it needs.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for lifecycle operations.
pub type LifecycleResult<T> = Result<T, LifecycleError>;

/// External capabilities a controller drives.
#[derive(Clone)]
pub struct Capabilities {
    /// Operator dialogs.
    pub prompt: Arc<dyn Prompt>,
    /// Session timer.
    pub timer: Arc<dyn SessionTimer>,
    /// Repository canvases.
    pub annotations: Arc<dyn AnnotationStore>,
    /// Ordering checkpoint used by full rebuilds.
    pub checkpoint: Arc<dyn OrderCheckpoint>,
}

/// Capacity policy for the two rebuild paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncPolicy {
    /// Bound used by `add_kanban` when the request names none.
    pub add_capacity: usize,
    /// Bound used by the full rebuild; `None` promotes every ready item.
    pub rebuild_capacity: Option<usize>,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            add_capacity: 6,
            rebuild_capacity: None,
        }
    }
}

/// Source of tasks for [`LifecycleController::build_flexible`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexibleKind {
    /// A single ad-hoc task.
    #[default]
    Flex,
    /// The whole backlog.
    Pool,
}

/// Drives the current task through start, session and close.
///
/// Every board-mutating entry point takes one operation lock, so the
/// scheduled rebuild never interleaves with operator actions. Sessions run
/// in the background and take the lock only around their own mutations.
pub struct LifecycleController<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    inner: Arc<SessionContext<S, C>>,
    sync: Arc<SyncEngine<S, C>>,
    policy: SyncPolicy,
}

impl<S, C> Clone for LifecycleController<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            sync: Arc::clone(&self.sync),
            policy: self.policy,
        }
    }
}

impl<S, C> LifecycleController<S, C>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a controller over `sync`.
    #[must_use]
    pub fn new(
        sync: SyncEngine<S, C>,
        clock: Arc<C>,
        capabilities: Capabilities,
        templates: Arc<PromptTemplates>,
        policy: SyncPolicy,
    ) -> Self {
        let inner = SessionContext {
            gate: Arc::clone(sync.gate()),
            clock,
            capabilities,
            templates,
            op_lock: Mutex::new(()),
            ledger: SessionLedger::default(),
            tracker: SessionTracker::default(),
        };
        Self {
            inner: Arc::new(inner),
            sync: Arc::new(sync),
            policy,
        }
    }

    fn gate(&self) -> &BoardGate<S> {
        &self.inner.gate
    }

    /// Returns the decoded head of the running pool.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transaction`] when the board cannot be read.
    pub async fn receive(&self) -> LifecycleResult<Option<Decoded>> {
        let board = self.gate().snapshot().await?;
        Ok(board.head(Pool::Running).map(decode))
    }

    /// Marks a pending current task running and dispatches its session.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transaction`] when the board update fails.
    pub async fn start(&self) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        self.start_locked().await
    }

    /// Completes a running current task and dispatches the resolution
    /// follow-up.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transaction`] when the board update fails.
    pub async fn close(&self) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        self.close_locked().await
    }

    /// Starts a pending task, closes a running one, or reports completion.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transaction`] when the board update fails.
    pub async fn run(&self) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let board = self.gate().snapshot().await?;
        match current_task(&board).map(|task| task.status()) {
            Some(TaskStatus::Pending) => self.start_locked().await,
            Some(TaskStatus::Running) => self.close_locked().await,
            Some(TaskStatus::Done) | None => Ok(LifecycleOutcome::AllComplete),
        }
    }

    /// Full rebuild with the operator ordering checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Sync`] from the first failing phase.
    pub async fn kanban(&self) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let checkpoint = self.inner.capabilities.checkpoint.as_ref();
        let report = self
            .sync
            .rebuild(checkpoint, self.policy.rebuild_capacity)
            .await?;
        if report.aborted {
            return Ok(LifecycleOutcome::RebuildAborted);
        }
        Ok(LifecycleOutcome::Rebuilt(report))
    }

    /// Bounded rebuild without a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Sync`] from the first failing phase.
    pub async fn add_kanban(&self, max_p: Option<usize>) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let capacity = max_p.unwrap_or(self.policy.add_capacity);
        let report = self.sync.add(capacity).await?;
        Ok(LifecycleOutcome::Rebuilt(report))
    }

    /// Replaces the running pool with `tasks`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Sync`] when the board update fails.
    pub async fn update_tasks(&self, tasks: &[String]) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let count = self.sync.update_running(tasks).await?;
        Ok(LifecycleOutcome::TasksUpdated { count })
    }

    /// Publishes one ad-hoc task or the whole backlog as the running pool.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidRequest`] when `kind` is
    /// [`FlexibleKind::Flex`] and no task is given, or
    /// [`LifecycleError::Sync`] when the board update fails.
    pub async fn build_flexible(
        &self,
        task: Option<&str>,
        kind: FlexibleKind,
        action: bool,
    ) -> LifecycleResult<LifecycleOutcome> {
        let _guard = self.inner.op_lock.lock().await;
        let tasks: Vec<String> = match kind {
            FlexibleKind::Flex => {
                let text = task
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .ok_or_else(|| {
                        LifecycleError::InvalidRequest("flex build needs a task".to_owned())
                    })?;
                vec![text.to_owned()]
            }
            FlexibleKind::Pool => self
                .gate()
                .snapshot()
                .await?
                .get_tasks_in(Pool::Backlog)
                .to_vec(),
        };
        let published: Vec<String> = tasks
            .into_iter()
            .map(|text| {
                if action && !text.starts_with(ACTION_PREFIX) {
                    format!("{ACTION_PREFIX}{text}")
                } else {
                    text
                }
            })
            .collect();
        let count = self.sync.update_running(&published).await?;
        Ok(LifecycleOutcome::TasksUpdated { count })
    }

    /// Adds a `<type>:<repo>:<question>:<detail>` tip card.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Tip`] for malformed text or
    /// [`LifecycleError::Annotation`] when the canvas cannot be updated.
    pub async fn tips(&self, text: &str) -> LifecycleResult<LifecycleOutcome> {
        let tip = Tip::parse(text)?;
        self.inner
            .capabilities
            .annotations
            .add_card(tip.repository(), &tip.card_text(), tip.kind().colour())
            .await?;
        Ok(LifecycleOutcome::TipAdded {
            repository: tip.repository().to_owned(),
        })
    }

    /// Returns pool counts and the current task.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::Transaction`] when the board cannot be read.
    pub async fn status(&self) -> LifecycleResult<StatusView> {
        let board = self.gate().snapshot().await?;
        Ok(StatusView {
            pools: board
                .counts()
                .into_iter()
                .map(|(pool, count)| (pool.as_str().to_owned(), count))
                .collect(),
            current: board.head(Pool::Running).map(|head| decode(head).display_message()),
            active_sessions: self.inner.tracker.active(),
        })
    }

    /// Returns whether the session `id` has completed its task.
    #[must_use]
    pub fn is_settled(&self, id: SessionId) -> bool {
        self.inner.ledger.is_settled(id)
    }

    /// Waits for every background session and returns their reports.
    pub async fn wait_for_sessions(&self) -> Vec<SessionReport> {
        self.inner.tracker.wait_all().await
    }

    async fn start_locked(&self) -> LifecycleResult<LifecycleOutcome> {
        let started = self
            .gate()
            .transact(|board| {
                let Some(task) = current_task(board) else {
                    return Ok(None);
                };
                if task.status() != TaskStatus::Pending {
                    return Ok(None);
                }
                let running = task.with_status(TaskStatus::Running);
                board.replace(Pool::Running, task.raw_text(), running.raw_text())?;
                Ok(Some(running))
            })
            .await?;
        let Some(task) = started else {
            return Ok(LifecycleOutcome::NothingToStart);
        };

        let id = SessionId::new();
        let message = task.display_message();
        tracing::info!(session = %id, task = %task, "dispatching action session");
        let context = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { session::run_action(context, id, task).await });
        self.inner.tracker.track(handle);
        Ok(LifecycleOutcome::Started {
            task: message,
            session: id,
        })
    }

    async fn close_locked(&self) -> LifecycleResult<LifecycleOutcome> {
        let closed = self
            .gate()
            .transact(|board| {
                let Some(task) = current_task(board) else {
                    return Ok(None);
                };
                if task.status() != TaskStatus::Running {
                    return Ok(None);
                }
                complete_in(board, &task)?;
                Ok(Some(task))
            })
            .await?;
        let Some(task) = closed else {
            return Ok(LifecycleOutcome::NothingToClose);
        };

        let id = SessionId::new();
        self.inner.ledger.settle(id);
        let message = task.display_message();
        tracing::info!(session = %id, task = %task, "task closed, dispatching follow-up");
        let context = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { session::run_follow_up(context, id, task).await });
        self.inner.tracker.track(handle);
        Ok(LifecycleOutcome::Closed { task: message })
    }
}

/// Returns the head of the running pool when it is an actionable task.
fn current_task(board: &Board) -> Option<TaskItem> {
    board
        .head(Pool::Running)
        .map(decode)
        .and_then(|decoded| decoded.as_task().cloned())
}

/// Moves `task` from running to done, storing it without prefix or marker.
pub(super) fn complete_in(board: &mut Board, task: &TaskItem) -> Result<(), KanbanDomainError> {
    board.pop(task.raw_text(), Pool::Running)?;
    let done = task.with_status(TaskStatus::Done).without_action();
    board.insert(done.raw_text(), Pool::Done)
}
