// src/schedule/filter.rs

//! Per-environment enablement of schedules.

use tracing::debug;

use crate::schedule::model::{Annotations, JobSchedule, Schedule};

/// Anything carrying a schedule name and optional annotations.
pub trait Annotated {
    fn schedule_name(&self) -> &str;
    fn annotations(&self) -> Option<&Annotations>;
}

impl Annotated for Schedule {
    fn schedule_name(&self) -> &str {
        &self.name
    }

    fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }
}

impl Annotated for JobSchedule {
    fn schedule_name(&self) -> &str {
        &self.name
    }

    fn annotations(&self) -> Option<&Annotations> {
        self.annotations.as_ref()
    }
}

/// Decide whether `schedule` is enabled for `environment_name`.
///
/// Rules, in order:
/// 1. no `annotations.airbyte` block: enabled
/// 2. `disabled: true`: disabled, whatever the environments say
/// 3. no `environments` key: enabled
/// 4. otherwise enabled only if the environment is listed
pub fn is_enabled<S: Annotated + ?Sized>(schedule: &S, environment_name: &str) -> bool {
    let Some(airbyte) = schedule.annotations().and_then(|a| a.airbyte.as_ref()) else {
        return true;
    };

    if airbyte.is_empty() {
        return true;
    }

    if airbyte.disabled {
        debug!(schedule = %schedule.schedule_name(), "schedule is disabled");
        return false;
    }

    let Some(environments) = airbyte.environments.as_ref() else {
        return true;
    };

    if environments.contains(environment_name) {
        return true;
    }

    debug!(
        schedule = %schedule.schedule_name(),
        environment = %environment_name,
        "schedule is not enabled for environment"
    );
    false
}
