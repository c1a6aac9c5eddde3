use std::collections::BTreeSet;

use airflow_ext::schedule::{Annotations, EnablementAnnotation, Schedule, is_enabled};
use proptest::prelude::*;

fn schedule_with(annotations: Option<Annotations>) -> Schedule {
    Schedule {
        name: "prop".to_string(),
        cron_interval: Some("@daily".to_string()),
        interval: Some("@daily".to_string()),
        start_date: None,
        extractor: None,
        loader: None,
        transform: None,
        annotations,
    }
}

fn env_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

proptest! {
    #[test]
    fn disabled_is_never_enabled(
        env in env_name(),
        environments in proptest::option::of(proptest::collection::btree_set(env_name(), 0..5)),
    ) {
        let schedule = schedule_with(Some(Annotations {
            airbyte: Some(EnablementAnnotation { disabled: true, environments }),
        }));
        prop_assert!(!is_enabled(&schedule, &env));
    }

    #[test]
    fn missing_annotations_are_always_enabled(env in ".*") {
        prop_assert!(is_enabled(&schedule_with(None), &env));
        prop_assert!(is_enabled(&schedule_with(Some(Annotations::default())), &env));
    }

    #[test]
    fn environment_affinity_is_membership(
        env in env_name(),
        environments in proptest::collection::btree_set(env_name(), 0..5),
    ) {
        let expected = environments.contains(&env);
        let schedule = schedule_with(Some(Annotations {
            airbyte: Some(EnablementAnnotation {
                disabled: false,
                environments: Some(environments.into_iter().collect::<BTreeSet<_>>()),
            }),
        }));
        prop_assert_eq!(is_enabled(&schedule, &env), expected);
    }
}
