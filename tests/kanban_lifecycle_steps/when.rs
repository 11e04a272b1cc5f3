//! When steps for kanban lifecycle BDD scenarios.

use super::world::{LifecycleWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the kanban is rebuilt with capacity {capacity:usize}")]
fn kanban_rebuilt(world: &mut LifecycleWorld, capacity: usize) -> Result<(), eyre::Report> {
    let outcome = run_async(world.controller.add_kanban(Some(capacity)))
        .wrap_err("bounded rebuild in scenario")?;
    world.last_outcome = Some(outcome.to_string());
    Ok(())
}

#[when("the operator runs the current task")]
fn operator_runs(world: &mut LifecycleWorld) -> Result<(), eyre::Report> {
    let outcome = run_async(world.controller.run()).wrap_err("run in scenario")?;
    run_async(world.controller.wait_for_sessions());
    world.last_outcome = Some(outcome.to_string());
    Ok(())
}
