//! Background action sessions and their resolution follow-up.

use super::controller::{Capabilities, complete_in};
use super::tracker::{SessionLedger, SessionTracker};
use crate::kanban::{
    domain::{KanbanDomainError, Pool},
    ports::BoardStore,
    services::{BoardGate, TransactionError},
};
use crate::lifecycle::{
    domain::{
        Marker, PromptContext, PromptKind, PromptReply, PromptTemplates, SessionId, SessionReport,
        SessionStage, TemplateError,
    },
    ports::CapabilityError,
};
use crate::task::domain::{TaskItem, TaskStatus};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// State shared between the controller and its background sessions.
pub(super) struct SessionContext<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    pub(super) gate: Arc<BoardGate<S>>,
    pub(super) clock: Arc<C>,
    pub(super) capabilities: Capabilities,
    pub(super) templates: Arc<PromptTemplates>,
    pub(super) op_lock: Mutex<()>,
    pub(super) ledger: SessionLedger,
    pub(super) tracker: SessionTracker,
}

#[derive(Debug, Error)]
enum SessionFailure {
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

enum Step {
    Finished,
    Dismissed,
}

fn prompt_context(task: &TaskItem) -> PromptContext {
    PromptContext {
        repository: task.repository().to_owned(),
        title: task.title().to_owned(),
        task: format!(
            "{}{}{}",
            task.repository(),
            task.descriptor().separator().as_char(),
            task.title()
        ),
        units: task.duration_units().value(),
        minutes: task.duration_units().minutes(),
        ready: Vec::new(),
    }
}

impl<S, C> SessionContext<S, C>
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    async fn ask(
        &self,
        kind: PromptKind,
        context: &PromptContext,
    ) -> Result<PromptReply, SessionFailure> {
        let request = self.templates.render(kind, context)?;
        Ok(self.capabilities.prompt.confirm(&request).await?)
    }

    /// Start prompt, timer, timer-end prompt. No board access.
    async fn drive(&self, task: &TaskItem) -> Result<Step, SessionFailure> {
        let context = prompt_context(task);
        if self.ask(PromptKind::SessionStart, &context).await? != PromptReply::Accepted {
            return Ok(Step::Dismissed);
        }

        let timer = &self.capabilities.timer;
        timer
            .start_timer(&task.session_name(), task.duration_units())
            .await?;
        let reply = self.ask(PromptKind::TimerEnd, &context).await;
        let stopped = timer.stop_timer().await;
        let answered = reply?;
        stopped?;
        if answered == PromptReply::Accepted {
            Ok(Step::Finished)
        } else {
            Ok(Step::Dismissed)
        }
    }

    /// Completes the task once. Returns `false` when it was already settled.
    ///
    /// A store failure leaves the session unsettled so a retry can complete it.
    async fn complete(&self, id: SessionId, task: &TaskItem) -> Result<bool, TransactionError> {
        let _guard = self.op_lock.lock().await;
        if self.ledger.is_settled(id) {
            return Ok(false);
        }
        match self.gate.transact(|board| complete_in(board, task)).await {
            Ok(()) => {
                self.ledger.settle(id);
                Ok(true)
            }
            Err(TransactionError::Domain(KanbanDomainError::NotFound { .. })) => {
                self.ledger.settle(id);
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Three-way resolution question. `None` when the operator walks away.
    async fn resolve(&self, task: &TaskItem) -> Result<Option<Marker>, SessionFailure> {
        let context = prompt_context(task);
        let marker = match self.ask(PromptKind::Resolution, &context).await? {
            PromptReply::Accepted => Some(Marker::Resolved),
            PromptReply::Dismissed => None,
            PromptReply::Declined => match self.ask(PromptKind::Revisit, &context).await? {
                PromptReply::Accepted => Some(Marker::Revisit),
                PromptReply::Declined => Some(Marker::StillOpen),
                PromptReply::Dismissed => None,
            },
        };
        Ok(marker)
    }

    /// Moves a completed task back to the ready pool as pending.
    async fn reschedule(&self, task: &TaskItem) -> Result<String, TransactionError> {
        let done = task.with_status(TaskStatus::Done).without_action();
        let pending = task.with_status(TaskStatus::Pending).without_action();
        let _guard = self.op_lock.lock().await;
        self.gate
            .transact(|board| {
                board.pop(done.raw_text(), Pool::Done)?;
                board.insert(pending.raw_text(), Pool::Ready)
            })
            .await?;
        Ok(format!(
            "revisit scheduled {}",
            self.clock.local().date_naive()
        ))
    }

    async fn follow_up(&self, id: SessionId, task: &TaskItem) -> SessionReport {
        let mut report =
            SessionReport::new(id, task.raw_text().to_owned(), SessionStage::Completed);
        let marker = match self.resolve(task).await {
            Ok(Some(marker)) => marker,
            Ok(None) => {
                tracing::info!(session = %id, "resolution prompt dismissed");
                return report;
            }
            Err(err) => {
                tracing::warn!(session = %id, error = %err, "resolution prompt failed");
                return report;
            }
        };
        report.marker = Some(marker);

        let note = if marker == Marker::Revisit {
            match self.reschedule(task).await {
                Ok(note) => Some(note),
                Err(err) => {
                    tracing::warn!(session = %id, error = %err, "could not return task to ready");
                    None
                }
            }
        } else {
            None
        };

        if let Err(err) = self
            .capabilities
            .annotations
            .annotate(task.repository(), task.title(), marker, note.as_deref())
            .await
        {
            tracing::warn!(session = %id, error = %err, "annotation skipped");
            report.annotation_error = Some(err.to_string());
        }
        tracing::info!(session = %id, %marker, "session resolved");
        report
    }
}

/// Runs the full action session for a task already marked running.
pub(super) async fn run_action<S, C>(
    context: Arc<SessionContext<S, C>>,
    id: SessionId,
    task: TaskItem,
) -> SessionReport
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    let stopped = |stage| SessionReport::new(id, task.raw_text().to_owned(), stage);
    match context.drive(&task).await {
        Ok(Step::Finished) => {}
        Ok(Step::Dismissed) => {
            tracing::info!(session = %id, task = %task, "session dismissed, task stays running");
            return stopped(SessionStage::Dismissed);
        }
        Err(err) => {
            tracing::warn!(session = %id, error = %err, "session capability failed");
            return stopped(SessionStage::CapabilityFailed(err.to_string()));
        }
    }

    match context.complete(id, &task).await {
        Ok(true) => tracing::info!(session = %id, task = %task, "task completed"),
        Ok(false) => {
            tracing::info!(session = %id, "task already settled elsewhere");
            return stopped(SessionStage::AlreadySettled);
        }
        Err(err) => {
            tracing::error!(session = %id, error = %err, "could not complete task");
            return stopped(SessionStage::BoardFailed(err.to_string()));
        }
    }
    context.follow_up(id, &task).await
}

/// Runs only the resolution follow-up for a task closed by hand.
pub(super) async fn run_follow_up<S, C>(
    context: Arc<SessionContext<S, C>>,
    id: SessionId,
    task: TaskItem,
) -> SessionReport
where
    S: BoardStore,
    C: Clock + Send + Sync,
{
    context.follow_up(id, &task).await
}
