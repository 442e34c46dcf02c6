//! Then steps for recurring task BDD scenarios.

use super::world::RecurringWorld;
use cadence::task::{domain::Task, ports::TaskRepository};
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn only_successor(world: &RecurringWorld) -> Result<&Task, eyre::Report> {
    match world.last_spawned.as_slice() {
        [successor] => Ok(successor),
        other => Err(eyre::eyre!(
            "expected exactly one successor, found {}",
            other.len()
        )),
    }
}

#[then("the number of spawned successors is {count:usize}")]
fn spawned_count(world: &RecurringWorld, count: usize) -> Result<(), eyre::Report> {
    eyre::ensure!(
        world.last_spawned.len() == count,
        "expected {count} successors, found {}",
        world.last_spawned.len()
    );
    Ok(())
}

#[then(r#"the successor is titled "{title}""#)]
fn successor_titled(world: &RecurringWorld, title: String) -> Result<(), eyre::Report> {
    let successor = only_successor(world)?;
    eyre::ensure!(
        successor.title().as_str() == title,
        "expected title {title}, found {}",
        successor.title()
    );
    Ok(())
}

#[then("the successor is not completed")]
fn successor_not_completed(world: &RecurringWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(
        !only_successor(world)?.is_completed(),
        "successor should start incomplete"
    );
    Ok(())
}

#[then("the successor references the original task")]
fn successor_references_original(world: &RecurringWorld) -> Result<(), eyre::Report> {
    let source = world.current_task()?.id();
    let successor = only_successor(world)?;
    eyre::ensure!(
        successor.original_task_id() == Some(source),
        "expected successor of task {source}, found {:?}",
        successor.original_task_id()
    );
    Ok(())
}

#[then(r#"the successor next occurs at "{expected}""#)]
fn successor_next_occurrence(world: &RecurringWorld, expected: String) -> Result<(), eyre::Report> {
    let wanted = DateTime::parse_from_rfc3339(&expected)
        .wrap_err("parse expected occurrence")?
        .with_timezone(&Utc);
    let actual = only_successor(world)?.next_occurrence();
    eyre::ensure!(
        actual == Some(wanted),
        "expected next occurrence {wanted}, found {actual:?}"
    );
    Ok(())
}

#[then("the store holds {count:usize} tasks")]
fn store_holds(world: &RecurringWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = world.repository.all().wrap_err("list stored tasks")?;
    eyre::ensure!(
        stored.len() == count,
        "expected {count} stored tasks, found {}",
        stored.len()
    );
    Ok(())
}

#[then("the original task is still completed")]
fn original_still_completed(world: &RecurringWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let stored = world
        .repository
        .find_by_id(id)
        .wrap_err("look up original task")?
        .ok_or_else(|| eyre::eyre!("original task {id} is missing"))?;
    eyre::ensure!(stored.is_completed(), "original task should stay completed");
    eyre::ensure!(
        !stored.recurrence_active(),
        "original task should have recurrence disabled"
    );
    Ok(())
}
