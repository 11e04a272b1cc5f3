//! Given steps for kanban lifecycle BDD scenarios.

use super::world::LifecycleWorld;
use reallife::kanban::domain::Pool;
use rstest_bdd_macros::given;

fn seed(world: &LifecycleWorld, pool: Pool, item: &str) -> Result<(), eyre::Report> {
    let mut board = world.store.board()?;
    board.insert(item, pool)?;
    world.store.overwrite(board)?;
    Ok(())
}

#[given(r#"the backlog holds "{item}""#)]
fn backlog_holds(world: &mut LifecycleWorld, item: String) -> Result<(), eyre::Report> {
    seed(world, Pool::Backlog, &item)
}

#[given(r#"the running pool holds "{item}""#)]
fn running_pool_holds(world: &mut LifecycleWorld, item: String) -> Result<(), eyre::Report> {
    seed(world, Pool::Running, &item)
}
