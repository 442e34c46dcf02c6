//! Command-line sessions driven through the shell over one task list.

use cadence::cli::{self, Cli, TaskStyle};
use cadence::config::AppConfig;
use clap::Parser;
use rstest::{fixture, rstest};
use std::io::Cursor;

#[fixture]
fn config() -> AppConfig {
    AppConfig::default()
}

/// Runs `script` through `cadence shell` and returns everything written.
fn run_script(config: &AppConfig, extra_args: &[&str], script: &str) -> String {
    let mut argv = vec!["cadence"];
    argv.extend_from_slice(extra_args);
    argv.push("shell");
    let parsed = Cli::try_parse_from(argv).expect("valid arguments");

    let mut out = Vec::new();
    cli::run(&parsed, config, TaskStyle::PLAIN, Cursor::new(script), &mut out)
        .expect("session runs");
    String::from_utf8(out).expect("utf-8 output")
}

#[rstest]
fn daily_exercise_session(config: AppConfig) {
    let output = run_script(
        &config,
        &[],
        concat!(
            "add \"Daily Exercise\" \"Morning workout\" --recur daily -p high --tags health\n",
            "complete 1\n",
            "process --reference 2025-06-01T07:00:00Z\n",
            "list-recurring --active true\n",
        ),
    );

    assert!(output.contains("Task added: [ ] 1: Daily Exercise (high)"));
    assert!(output.contains("Task 1 marked as complete."));
    assert!(output.contains("Created 1 recurring task instance(s)."));
    assert!(output.contains("[next: 2025-06-02 07:00]"));
    assert!(output.contains("[from #1]"));
    assert!(output.contains("Recurring tasks (active) (2 tasks):"));
}

#[rstest]
fn errors_are_reported_and_the_session_continues(config: AppConfig) {
    let output = run_script(
        &config,
        &[],
        concat!(
            "# comments and blank lines are skipped\n",
            "\n",
            "complete 7\n",
            "add \"\"\n",
            "add Chore --recur hourly\n",
            "disable-recurrence 0\n",
            "add \"Still running\"\n",
        ),
    );

    assert!(output.contains("Error: task not found: 7"));
    assert!(output.contains("Error: task title cannot be empty"));
    assert!(output.contains("Task added: [ ] 1: Still running (medium)"));
}

#[rstest]
fn exit_stops_reading(config: AppConfig) {
    let output = run_script(&config, &[], "add First\nexit\nadd Second\n");

    assert!(output.contains("First"));
    assert!(!output.contains("Second"));
}

#[rstest]
fn nested_shell_is_rejected(config: AppConfig) {
    let output = run_script(&config, &[], "shell\n");
    assert!(output.contains("Error: the shell command cannot be nested"));
}

#[rstest]
fn once_per_completion_override_spawns_once(config: AppConfig) {
    let output = run_script(
        &config,
        &["--spawn-policy", "once-per-completion"],
        concat!(
            "add Stretch --recur daily\n",
            "complete 1\n",
            "process\n",
            "process\n",
            "list\n",
        ),
    );

    assert!(output.contains("Created 1 recurring task instance(s)."));
    assert!(output.contains("Created 0 recurring task instance(s)."));
    assert!(output.contains("Task list (2 tasks):"));
}

#[rstest]
fn list_filters_sorts_and_renders_json(config: AppConfig) {
    let output = run_script(
        &config,
        &[],
        concat!(
            "add \"write report\" -p low --tags work\n",
            "add \"Book flights\" -p high --tags work,travel --due-date 2025-04-15\n",
            "list --tag work --sort priority\n",
            "list --status complete\n",
            "list --priority h --json\n",
        ),
    );

    let sorted = output
        .find("1. [ ] 2: Book flights")
        .zip(output.find("2. [ ] 1: write report"));
    assert!(sorted.is_some_and(|(first, second)| first < second), "{output}");
    assert!(output.contains("No tasks found."));
    assert!(output.contains("\"title\": \"Book flights\""));
}

#[rstest]
fn next_reports_the_following_occurrence(config: AppConfig) {
    let output = run_script(
        &config,
        &[],
        concat!(
            "add Rent --recur monthly\n",
            "add Milk\n",
            "next 1 --from 2025-01-31\n",
            "next 2\n",
        ),
    );

    assert!(output.contains("Task 1 next occurs at 2025-02-28T00:00:00+00:00."));
    assert!(output.contains("Task 2 is not a recurring task."));
}

#[rstest]
#[case("never", false)]
#[case("always", true)]
#[case("auto", true)]
fn color_flag_resolves_against_a_terminal(#[case] choice: &str, #[case] expected: bool) {
    let parsed =
        Cli::try_parse_from(["cadence", "--color", choice, "list"]).expect("valid arguments");
    assert_eq!(parsed.color.enabled(true), expected);
    assert!(!parsed.color.enabled(false) || choice == "always");
}

#[rstest]
fn never_color_keeps_listings_plain(config: AppConfig) {
    let parsed =
        Cli::try_parse_from(["cadence", "--color", "never", "shell"]).expect("valid arguments");
    let style = TaskStyle::new(parsed.color.enabled(true));

    let mut out = Vec::new();
    let script = Cursor::new("add Stretch -p high\nlist\n");
    cli::run(&parsed, &config, style, script, &mut out).expect("session runs");
    let output = String::from_utf8(out).expect("utf-8 output");

    assert!(output.contains("1. [ ] 1: Stretch (high)"), "{output}");
    assert!(!output.contains('\u{1b}'), "{output:?}");
}
