//! Controller entry point tests.

use super::support::{harness, running};
use crate::kanban::domain::{Board, Pool};
use crate::lifecycle::{
    adapters::ScriptedPrompt,
    domain::{CardColour, LifecycleOutcome, PromptReply},
    ports::AnnotationError,
    services::{FlexibleKind, LifecycleError},
};
use crate::task::domain::Decoded;
use eyre::{bail, ensure};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_running_pool_has_nothing_to_start() -> eyre::Result<()> {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    ensure!(h.controller.receive().await?.is_none(), "receive should be empty");
    let outcome = h.controller.start().await?;

    assert_eq!(outcome, LifecycleOutcome::NothingToStart);
    assert_eq!(outcome.to_string(), "nothing to start");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn receive_decodes_head_of_running_pool() -> eyre::Result<()> {
    let h = harness(
        running(&["A!2P repoA$Fix bug (待办)", "A!1P repoB$Later (待办)"]),
        ScriptedPrompt::accepting(),
    );

    let Some(Decoded::Task(task)) = h.controller.receive().await? else {
        bail!("expected a task at the head of the running pool");
    };

    assert_eq!(task.title(), "Fix bug");
    assert_eq!(task.display_message(), "repoA$Fix bug (待办)");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn notes_are_not_started() -> eyre::Result<()> {
    let h = harness(running(&["just a reminder"]), ScriptedPrompt::accepting());

    assert_eq!(h.controller.start().await?, LifecycleOutcome::NothingToStart);
    assert_eq!(h.store.persist_count()?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn close_on_pending_task_changes_nothing() -> eyre::Result<()> {
    let h = harness(running(&["A!2P repoA$Fix bug (待办)"]), ScriptedPrompt::accepting());
    let before = h.store.board()?;

    let outcome = h.controller.close().await?;

    assert_eq!(outcome, LifecycleOutcome::NothingToClose);
    assert_eq!(outcome.to_string(), "nothing to close");
    assert_eq!(h.store.board()?, before);
    assert_eq!(h.store.persist_count()?, 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn close_moves_running_task_to_done() -> eyre::Result<()> {
    let h = harness(running(&["A!2P repoA$Fix bug (进行中)"]), ScriptedPrompt::accepting());

    let outcome = h.controller.close().await?;
    let reports = h.controller.wait_for_sessions().await;

    assert_eq!(
        outcome,
        LifecycleOutcome::Closed {
            task: "repoA$Fix bug (进行中)".to_owned()
        }
    );
    assert_eq!(reports.len(), 1);
    assert_eq!(h.store.board()?.get_tasks_in(Pool::Done), ["2P repoA$Fix bug"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recurring_task_can_be_closed_again() -> eyre::Result<()> {
    let board = running(&["A!2P repoA$Daily review (进行中)"])
        .with_items(Pool::Done, ["2P repoA$Daily review"])?;
    let h = harness(board, ScriptedPrompt::accepting());

    let outcome = h.controller.close().await?;
    h.controller.wait_for_sessions().await;

    ensure!(
        matches!(outcome, LifecycleOutcome::Closed { .. }),
        "expected close, got {outcome:?}"
    );
    let board = h.store.board()?;
    ensure!(board.get_tasks_in(Pool::Running).is_empty(), "running pool should be empty");
    assert_eq!(
        board.get_tasks_in(Pool::Done),
        ["2P repoA$Daily review", "2P repoA$Daily review"]
    );
    Ok(())
}

#[rstest]
#[case(&[], "all tasks complete")]
#[case(&["A!2P repoA$Done already"], "all tasks complete")]
#[case(&["A!2P repoA$Fix bug (进行中)"], "task: repoA$Fix bug (进行中) closed")]
#[case(&["A!2P repoA$Fix bug (待办)"], "task: repoA$Fix bug (进行中) started")]
#[tokio::test(flavor = "multi_thread")]
async fn run_dispatches_on_current_status(
    #[case] items: &[&str],
    #[case] expected: &str,
) -> eyre::Result<()> {
    let h = harness(running(items), ScriptedPrompt::accepting());

    let outcome = h.controller.run().await?;
    h.controller.wait_for_sessions().await;

    assert_eq!(outcome.to_string(), expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn kanban_rebuild_aborts_when_checkpoint_dismissed() -> eyre::Result<()> {
    let board = Board::new().with_items(Pool::Backlog, ["2P repoA$Due @{2025-03-01}"])?;
    let h = harness(board, ScriptedPrompt::with_fallback(PromptReply::Dismissed));

    let outcome = h.controller.kanban().await?;

    assert_eq!(outcome, LifecycleOutcome::RebuildAborted);
    let after = h.store.board()?;
    assert_eq!(after.get_tasks_in(Pool::Ready), ["2P repoA$Due @{2025-03-01}"]);
    ensure!(after.get_tasks_in(Pool::Running).is_empty(), "nothing should be promoted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn add_kanban_uses_requested_bound() -> eyre::Result<()> {
    let board = Board::new().with_items(
        Pool::Ready,
        ["1P repoA$One (待办)", "1P repoA$Two (待办)", "1P repoA$Three (待办)"],
    )?;
    let h = harness(board, ScriptedPrompt::accepting());

    let outcome = h.controller.add_kanban(Some(2)).await?;

    let LifecycleOutcome::Rebuilt(report) = outcome else {
        bail!("expected a rebuild report, got {outcome:?}");
    };
    assert_eq!(report.promoted, 2);
    assert_eq!(
        h.store.board()?.get_tasks_in(Pool::Running),
        ["A!1P repoA$One (待办)", "A!1P repoA$Two (待办)"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn build_flexible_publishes_backlog() -> eyre::Result<()> {
    let board = Board::new().with_items(Pool::Backlog, ["1P repoA$One (待办)", "a note"])?;
    let h = harness(board, ScriptedPrompt::accepting());

    h.controller
        .build_flexible(None, FlexibleKind::Pool, true)
        .await?;

    let after = h.store.board()?;
    assert_eq!(
        after.get_tasks_in(Pool::Running),
        ["A!1P repoA$One (待办)", "A!a note"]
    );
    ensure!(after.get_tasks_in(Pool::Backlog).is_empty(), "backlog should be drained");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn build_flexible_requires_task_for_flex() {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    let result = h
        .controller
        .build_flexible(Some("  "), FlexibleKind::Flex, true)
        .await;

    assert!(matches!(result, Err(LifecycleError::InvalidRequest(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_tasks_replaces_running_pool() -> eyre::Result<()> {
    let h = harness(running(&["A!1P repoB$Old (待办)"]), ScriptedPrompt::accepting());

    let outcome = h
        .controller
        .update_tasks(&["A!3P repoA$New (待办)".to_owned()])
        .await?;

    assert_eq!(outcome, LifecycleOutcome::TasksUpdated { count: 1 });
    let after = h.store.board()?;
    assert_eq!(after.get_tasks_in(Pool::Running), ["A!3P repoA$New (待办)"]);
    assert_eq!(after.get_tasks_in(Pool::Ready), ["1P repoB$Old (待办)"]);
    Ok(())
}

#[rstest]
#[case("bug:repoA:Crash on save:stack trace attached", CardColour::YELLOW)]
#[case("prefer:repoA:Shorter prompts:use fewer words", CardColour::ORANGE)]
#[case("research:repoB:Look at caching:later", CardColour::NEUTRAL)]
#[tokio::test(flavor = "multi_thread")]
async fn tips_add_coloured_card(#[case] text: &str, #[case] colour: CardColour) -> eyre::Result<()> {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    h.controller.tips(text).await?;

    let cards = h.annotations.cards();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards.first().map(|card| card.colour), Some(colour));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tip_card_text_joins_question_and_detail() -> eyre::Result<()> {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    h.controller
        .tips("bug:repoA:Crash on save:see log: line 3")
        .await?;

    assert_eq!(
        h.annotations.cards().first().map(|card| card.text.clone()),
        Some("bug:Crash on save\nsee log: line 3".to_owned())
    );
    Ok(())
}

#[rstest]
#[case("bug:repoA:only three")]
#[case("nonsense")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_tip_is_rejected(#[case] text: &str) {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    assert!(matches!(h.controller.tips(text).await, Err(LifecycleError::Tip(_))));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tip_for_unknown_repository_fails() {
    let h = harness(Board::new(), ScriptedPrompt::accepting());

    let result = h.controller.tips("bug:unknown:q:d").await;

    assert!(matches!(
        result,
        Err(LifecycleError::Annotation(AnnotationError::UnknownRepository(_)))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_reports_counts_and_current_task() -> eyre::Result<()> {
    let board = Board::new()
        .with_items(Pool::Backlog, ["a", "b"])?
        .with_items(Pool::Running, ["A!2P repoA$Fix bug (待办)"])?;
    let h = harness(board, ScriptedPrompt::accepting());

    let status = h.controller.status().await?;

    assert_eq!(status.pools.get("backlog"), Some(&2));
    assert_eq!(status.pools.get("running"), Some(&1));
    assert_eq!(status.pools.get("done"), Some(&0));
    assert_eq!(status.current.as_deref(), Some("repoA$Fix bug (待办)"));
    assert_eq!(status.active_sessions, 0);
    Ok(())
}
