//! Sync engine tests: readiness, ordering, promotion and rebuilds.

use std::sync::Arc;

use crate::kanban::{
    adapters::InMemoryBoardStore,
    domain::{Board, Pool},
    ports::{CheckpointDecision, CheckpointError, OrderCheckpoint, ScheduledDateReadiness},
    services::{BoardGate, OrderKey, SyncEngine, SyncError},
};
use crate::test_support::FixedClock;
use async_trait::async_trait;
use chrono::NaiveDate;
use eyre::ensure;
use mockall::mock;
use rstest::{fixture, rstest};

type TestEngine = SyncEngine<InMemoryBoardStore, FixedClock>;

mock! {
    pub Checkpoint {}

    #[async_trait]
    impl OrderCheckpoint for Checkpoint {
        async fn review_order(&self, ready: &[String]) -> Result<CheckpointDecision, CheckpointError>;
    }
}

fn engine_over(board: Board) -> (Arc<InMemoryBoardStore>, TestEngine) {
    let store = Arc::new(InMemoryBoardStore::with_board(board));
    let gate = Arc::new(BoardGate::new(Arc::clone(&store)));
    let engine = SyncEngine::new(
        gate,
        Arc::new(FixedClock::on(2025, 3, 10)),
        Arc::new(ScheduledDateReadiness),
        OrderKey::Code,
    );
    (store, engine)
}

#[fixture]
fn backlog_board() -> Board {
    Board::new()
        .with_items(
            Pool::Backlog,
            [
                "2P zeta$Due today @{2025-03-10}",
                "undated note",
                "1P alpha$Overdue @{2025-03-01}",
                "3P beta$Next week @{2025-03-17}",
            ],
        )
        .expect("fixture board is valid")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_ready_promotes_due_items_in_backlog_order(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);

    let promoted = engine.sync_ready().await?;

    assert_eq!(promoted, 2);
    let board = store.board()?;
    assert_eq!(
        board.get_tasks_in(Pool::Ready),
        ["2P zeta$Due today @{2025-03-10}", "1P alpha$Overdue @{2025-03-01}"]
    );
    assert_eq!(
        board.get_tasks_in(Pool::Backlog),
        ["undated note", "3P beta$Next week @{2025-03-17}"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_ready_is_idempotent(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);

    engine.sync_ready().await?;
    let first = store.board()?;
    let second_promoted = engine.sync_ready().await?;

    assert_eq!(second_promoted, 0);
    assert_eq!(store.board()?, first);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_predicate_overrides_schedule(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);
    let notes_only = |item: &str, _today: NaiveDate| !item.contains('$');

    engine.sync_ready_with(&notes_only).await?;

    assert_eq!(store.board()?.get_tasks_in(Pool::Ready), ["undated note"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn code_order_is_stable_and_idempotent() -> eyre::Result<()> {
    let board = Board::new().with_items(
        Pool::Ready,
        [
            "2P zeta$First zeta (待办)",
            "loose note",
            "1P alpha$First alpha (待办)",
            "1P zeta$Second zeta (待办)",
            "3P alpha$Second alpha (待办)",
        ],
    )?;
    let (store, engine) = engine_over(board);

    engine.sync_order(OrderKey::Code).await?;
    let ordered = store.board()?;
    engine.sync_order(OrderKey::Code).await?;

    assert_eq!(
        ordered.get_tasks_in(Pool::Ready),
        [
            "1P alpha$First alpha (待办)",
            "3P alpha$Second alpha (待办)",
            "2P zeta$First zeta (待办)",
            "1P zeta$Second zeta (待办)",
            "loose note",
        ]
    );
    assert_eq!(store.board()?, ordered);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn priority_order_puts_untagged_last() -> eyre::Result<()> {
    let board = Board::new().with_items(
        Pool::Ready,
        ["untagged one", "urgent #p1", "later #p3", "untagged two", "also urgent #p1"],
    )?;
    let (store, engine) = engine_over(board);

    engine.sync_order(OrderKey::Priority).await?;

    assert_eq!(
        store.board()?.get_tasks_in(Pool::Ready),
        ["urgent #p1", "also urgent #p1", "later #p3", "untagged one", "untagged two"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sync_run_moves_single_ready_item() -> eyre::Result<()> {
    let board = Board::new().with_items(Pool::Ready, ["2P repoA$Fix bug (待办)"])?;
    let (store, engine) = engine_over(board);

    engine.sync_run(Some(1)).await?;

    let after = store.board()?;
    assert_eq!(after.get_tasks_in(Pool::Running), ["2P repoA$Fix bug (待办)"]);
    ensure!(after.get_tasks_in(Pool::Ready).is_empty(), "ready pool should be empty");
    Ok(())
}

#[rstest]
#[case(Some(0), 0)]
#[case(Some(2), 2)]
#[case(Some(10), 4)]
#[case(None, 4)]
#[tokio::test(flavor = "multi_thread")]
async fn sync_run_respects_capacity(
    #[case] max_p: Option<usize>,
    #[case] expected: usize,
) -> eyre::Result<()> {
    let board = Board::new()
        .with_items(Pool::Ready, ["a", "b", "c", "d"])?
        .with_items(Pool::Running, ["already running"])?;
    let (store, engine) = engine_over(board);

    let promoted = engine.sync_run(max_p).await?;

    assert_eq!(promoted, expected);
    assert_eq!(store.board()?.len(Pool::Running), 1 + expected);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rebuild_publishes_after_checkpoint(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);
    let mut checkpoint = MockCheckpoint::new();
    checkpoint
        .expect_review_order()
        .withf(|ready| ready.len() == 2)
        .times(1)
        .returning(|_| Ok(CheckpointDecision::Proceed));

    let report = engine.rebuild(&checkpoint, None).await?;

    assert_eq!(report.readied, 2);
    assert_eq!(report.promoted, 2);
    assert_eq!(report.published, 2);
    assert_eq!(
        store.board()?.get_tasks_in(Pool::Running),
        ["A!1P alpha$Overdue @{2025-03-01}", "A!2P zeta$Due today @{2025-03-10}"]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn abort_at_checkpoint_skips_promotion(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);
    let mut checkpoint = MockCheckpoint::new();
    checkpoint
        .expect_review_order()
        .times(1)
        .returning(|_| Ok(CheckpointDecision::Abort));

    let report = engine.rebuild(&checkpoint, None).await?;

    ensure!(report.aborted, "rebuild should report the abort");
    let board = store.board()?;
    assert_eq!(board.len(Pool::Ready), 2);
    ensure!(board.get_tasks_in(Pool::Running).is_empty(), "nothing should run");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn checkpoint_failure_surfaces(backlog_board: Board) -> eyre::Result<()> {
    let (_store, engine) = engine_over(backlog_board);
    let mut checkpoint = MockCheckpoint::new();
    checkpoint
        .expect_review_order()
        .returning(|_| Err(CheckpointError("dialog closed".to_owned())));

    let result = engine.rebuild(&checkpoint, None).await;

    ensure!(
        matches!(result, Err(SyncError::Checkpoint(_))),
        "expected checkpoint error, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bounded_add_limits_promotion(backlog_board: Board) -> eyre::Result<()> {
    let (store, engine) = engine_over(backlog_board);

    let report = engine.add(1).await?;

    assert_eq!(report.promoted, 1);
    let board = store.board()?;
    assert_eq!(board.get_tasks_in(Pool::Running), ["A!1P alpha$Overdue @{2025-03-01}"]);
    assert_eq!(board.get_tasks_in(Pool::Ready), ["2P zeta$Due today @{2025-03-10}"]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn update_running_returns_unlisted_items_to_ready() -> eyre::Result<()> {
    let board = Board::new()
        .with_items(Pool::Backlog, ["1P repoA$From backlog (待办)"])?
        .with_items(Pool::Ready, ["queued"])?
        .with_items(Pool::Running, ["A!2P repoB$Keep (待办)", "A!1P repoC$Drop (待办)"])?;
    let (store, engine) = engine_over(board);

    let tasks = vec![
        "A!2P repoB$Keep (待办)".to_owned(),
        "A!1P repoA$From backlog (待办)".to_owned(),
    ];
    let written = engine.update_running(&tasks).await?;

    assert_eq!(written, 2);
    let after = store.board()?;
    assert_eq!(after.get_tasks_in(Pool::Running), tasks.as_slice());
    assert_eq!(after.get_tasks_in(Pool::Ready), ["1P repoC$Drop (待办)", "queued"]);
    ensure!(after.get_tasks_in(Pool::Backlog).is_empty(), "backlog item should move");
    Ok(())
}
