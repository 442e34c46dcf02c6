//! Batched successor append tests for [`InMemoryTaskRepository`].

use crate::in_memory::helpers::{
    clock, persisted_daily, repo, store_completed, store_task, stored_ids,
};
use cadence::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{RecurrenceRule, Task},
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::rstest;

fn next_day() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 2, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[rstest]
fn plan_sees_only_the_pre_pass_collection(repo: InMemoryTaskRepository, clock: DefaultClock) {
    store_completed(&repo, &clock, "One", Some(RecurrenceRule::Daily)).expect("store");
    store_completed(&repo, &clock, "Two", Some(RecurrenceRule::Weekly)).expect("store");

    let mut planned = Vec::new();
    let spawned = repo
        .append_successors(&mut |task: &Task| {
            planned.push(task.id().value());
            Some(task.successor_draft(next_day(), &clock))
        })
        .expect("append successors");

    assert_eq!(planned, vec![1, 2]);
    assert_eq!(spawned.len(), 2);
    assert_eq!(stored_ids(&repo).expect("ids"), vec![1, 2, 3, 4]);
}

#[rstest]
fn sources_are_marked_and_successors_linked(repo: InMemoryTaskRepository, clock: DefaultClock) {
    let source = store_completed(&repo, &clock, "One", Some(RecurrenceRule::Daily))
        .expect("store");
    let untouched = store_task(&repo, &clock, "Two", Some(RecurrenceRule::Daily))
        .expect("store");

    let spawned = repo
        .append_successors(&mut |task: &Task| {
            task.is_completed()
                .then(|| task.successor_draft(next_day(), &clock))
        })
        .expect("append successors");

    let successor = spawned.first().expect("one successor");
    assert_eq!(successor.original_task_id(), Some(source.id()));
    assert_eq!(successor.next_occurrence(), Some(next_day()));

    let reloaded = repo
        .find_by_id(source.id())
        .expect("lookup")
        .expect("source present");
    assert!(reloaded.successor_spawned());
    let other = repo
        .find_by_id(untouched.id())
        .expect("lookup")
        .expect("task present");
    assert!(!other.successor_spawned());
}

#[rstest]
fn empty_plan_changes_nothing(repo: InMemoryTaskRepository, clock: DefaultClock) {
    store_completed(&repo, &clock, "One", Some(RecurrenceRule::Daily)).expect("store");

    let spawned = repo
        .append_successors(&mut |_: &Task| None)
        .expect("append successors");

    assert!(spawned.is_empty());
    assert_eq!(repo.peek_next_id().expect("peek").value(), 2);
}

#[rstest]
fn exhausted_ids_leave_the_collection_unchanged(repo: InMemoryTaskRepository, clock: DefaultClock) {
    let last = persisted_daily(u64::MAX, "Last").expect("persisted task");
    repo.store(&last).expect("store");

    let result = repo.append_successors(&mut |task: &Task| {
        Some(task.successor_draft(next_day(), &clock))
    });

    assert!(matches!(result, Err(TaskRepositoryError::IdSpaceExhausted)));
    assert_eq!(stored_ids(&repo).expect("ids"), vec![u64::MAX]);
    let reloaded = repo
        .find_by_id(last.id())
        .expect("lookup")
        .expect("task present");
    assert!(!reloaded.successor_spawned());
}
