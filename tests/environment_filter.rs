use airflow_ext::schedule::is_enabled;
use airflow_ext_test_utils::builders::{JobScheduleBuilder, ScheduleBuilder};
use serde_json::json;

#[test]
fn schedule_without_annotations_is_enabled_everywhere() {
    let schedule = ScheduleBuilder::new("foo").build_typed();
    for env in ["dev", "prod", "(unknown)", ""] {
        assert!(is_enabled(&schedule, env), "env {env:?}");
    }
}

#[test]
fn empty_airbyte_block_is_enabled() {
    let schedule = ScheduleBuilder::new("foo").airbyte(json!({})).build_typed();
    assert!(is_enabled(&schedule, "prod"));
}

#[test]
fn disabled_wins_over_matching_environment() {
    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "disabled": true, "environments": ["prod"] }))
        .build_typed();
    assert!(!is_enabled(&schedule, "prod"));
    assert!(!is_enabled(&schedule, "dev"));
}

#[test]
fn disabled_false_without_environments_is_enabled() {
    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "disabled": false }))
        .build_typed();
    assert!(is_enabled(&schedule, "anything"));
}

#[test]
fn null_disabled_reads_as_not_disabled() {
    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "disabled": null, "environments": ["prod"] }))
        .build_typed();
    assert!(is_enabled(&schedule, "prod"));
    assert!(!is_enabled(&schedule, "dev"));

    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "disabled": null }))
        .build_typed();
    assert!(is_enabled(&schedule, "dev"));
}

#[test]
fn environments_restrict_enablement() {
    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "environments": ["dev", "staging"] }))
        .build_typed();
    assert!(is_enabled(&schedule, "dev"));
    assert!(is_enabled(&schedule, "staging"));
    assert!(!is_enabled(&schedule, "prod"));
}

#[test]
fn empty_environment_list_disables_everywhere() {
    let schedule = ScheduleBuilder::new("foo")
        .airbyte(json!({ "environments": [] }))
        .build_typed();
    assert!(!is_enabled(&schedule, "dev"));
}

#[test]
fn job_schedules_use_the_same_rules() {
    let job = JobScheduleBuilder::new("nightly", "load")
        .airbyte(json!({ "environments": ["prod"] }))
        .task("tap-foo target-bar")
        .build_typed();
    assert!(is_enabled(&job, "prod"));
    assert!(!is_enabled(&job, "dev"));
}

#[test]
fn unrelated_annotations_are_ignored() {
    let schedule: airflow_ext::schedule::Schedule = serde_json::from_value(json!({
        "name": "foo",
        "cron_interval": "@daily",
        "annotations": { "other_tool": { "disabled": true } }
    }))
    .unwrap();
    assert!(is_enabled(&schedule, "prod"));
}
