//! When steps for recurring task BDD scenarios.

use super::world::RecurringWorld;
use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when("the recurrence processor runs")]
fn processor_runs(world: &mut RecurringWorld) -> Result<(), eyre::Report> {
    world.last_spawned = world
        .processor()
        .process(None)
        .wrap_err("run recurrence pass")?;
    Ok(())
}

#[when(r#"the recurrence processor runs with reference "{reference}""#)]
fn processor_runs_with_reference(
    world: &mut RecurringWorld,
    reference: String,
) -> Result<(), eyre::Report> {
    let moment = DateTime::parse_from_rfc3339(&reference)
        .wrap_err("parse scenario reference")?
        .with_timezone(&Utc);
    world.last_spawned = world
        .processor()
        .process(Some(moment))
        .wrap_err("run recurrence pass with reference")?;
    Ok(())
}

#[when("recurrence is disabled for the original task")]
fn recurrence_disabled_for_original(world: &mut RecurringWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let disabled = world
        .service
        .disable_recurrence(id)
        .wrap_err("disable recurrence after a pass")?;
    world.current_task = Some(disabled);
    Ok(())
}
