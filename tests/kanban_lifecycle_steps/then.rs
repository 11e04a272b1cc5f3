//! Then steps for kanban lifecycle BDD scenarios.

use super::world::LifecycleWorld;
use reallife::kanban::domain::Pool;
use rstest_bdd_macros::then;

fn pool_is(world: &LifecycleWorld, pool: Pool, item: &str) -> Result<(), eyre::Report> {
    let board = world.store.board()?;
    let items = board.get_tasks_in(pool);
    if items != [item] {
        return Err(eyre::eyre!("expected {pool} to hold only {item:?}, found {items:?}"));
    }
    Ok(())
}

#[then(r#"the running pool is "{item}""#)]
fn running_pool_is(world: &LifecycleWorld, item: String) -> Result<(), eyre::Report> {
    pool_is(world, Pool::Running, &item)
}

#[then(r#"the done pool is "{item}""#)]
fn done_pool_is(world: &LifecycleWorld, item: String) -> Result<(), eyre::Report> {
    pool_is(world, Pool::Done, &item)
}

#[then("the backlog holds {count:usize} item")]
fn backlog_count(world: &LifecycleWorld, count: usize) -> Result<(), eyre::Report> {
    let found = world.store.board()?.get_tasks_in(Pool::Backlog).len();
    if found != count {
        return Err(eyre::eyre!("expected {count} backlog items, found {found}"));
    }
    Ok(())
}

#[then(r#"the outcome is "{message}""#)]
fn outcome_is(world: &LifecycleWorld, message: String) -> Result<(), eyre::Report> {
    let outcome = world
        .last_outcome
        .as_deref()
        .ok_or_else(|| eyre::eyre!("no operation ran in this scenario"))?;
    if outcome != message {
        return Err(eyre::eyre!("expected outcome {message:?}, got {outcome:?}"));
    }
    Ok(())
}
