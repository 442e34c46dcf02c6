//! Given steps for recurring task BDD scenarios.

use super::world::RecurringWorld;
use cadence::task::{domain::SpawnPolicy, services::CreateTaskRequest};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"the spawn policy "{policy}""#)]
fn spawn_policy(world: &mut RecurringWorld, policy: String) -> Result<(), eyre::Report> {
    world.policy = SpawnPolicy::try_from(policy.as_str())
        .map_err(|err| eyre::eyre!("invalid spawn policy in scenario: {err}"))?;
    Ok(())
}

#[given(r#"a "{rule}" recurring task titled "{title}""#)]
fn recurring_task(
    world: &mut RecurringWorld,
    rule: String,
    title: String,
) -> Result<(), eyre::Report> {
    let created = world
        .service
        .create(CreateTaskRequest::new(title).with_recurrence(rule))
        .wrap_err("create recurring task for scenario")?;
    world.current_task = Some(created);
    Ok(())
}

#[given("the task is completed")]
fn task_is_completed(world: &mut RecurringWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let completed = world
        .service
        .mark_complete(id)
        .wrap_err("complete task in scenario setup")?;
    world.current_task = Some(completed);
    Ok(())
}

#[given("recurrence is disabled for the task")]
fn recurrence_is_disabled(world: &mut RecurringWorld) -> Result<(), eyre::Report> {
    let id = world.current_task()?.id();
    let disabled = world
        .service
        .disable_recurrence(id)
        .wrap_err("disable recurrence in scenario setup")?;
    world.current_task = Some(disabled);
    Ok(())
}
