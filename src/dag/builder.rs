// src/dag/builder.rs

//! Turn schedule records into job graphs.
//!
//! - elt schedules become a single `extract_load` task.
//! - job schedules become one task per entry of `job.tasks`, chained in
//!   order.

use tracing::{debug, info};

use crate::config::{GeneratorContext, shell_quote};
use crate::dag::model::{DefaultArgs, JobGraphDefinition, epoch};
use crate::dag::registry::JobGraphRegistry;
use crate::errors::GeneratorError;
use crate::schedule::{JobSchedule, Schedule, is_enabled, is_run_once};

/// Prefix shared by every generated job graph id.
pub const DAG_ID_PREFIX: &str = "meltano";

/// Task id of the single task in an elt job graph.
pub const EXTRACT_LOAD_TASK_ID: &str = "extract_load";

/// Build the job graph for one elt schedule.
///
/// Returns `None` for run-once schedules. Enablement is not checked here.
pub fn build_elt_job_graph(
    schedule: &Schedule,
    ctx: &GeneratorContext,
) -> Option<JobGraphDefinition> {
    if is_run_once(schedule.cron_interval.as_deref()) {
        info!(
            schedule = %schedule.name,
            "no job graph created because the schedule interval is `@once`"
        );
        return None;
    }

    let mut args = DefaultArgs::default();
    if let Some(start_date) = schedule.start_date {
        args = args.with_start_date(start_date);
    }

    let dag_id = format!("{DAG_ID_PREFIX}_{}", schedule.name);
    let mut dag = JobGraphDefinition::new(dag_id, args, schedule.interval.clone());

    for label in [&schedule.extractor, &schedule.loader] {
        if let Some(label) = label.as_deref().filter(|l| !l.is_empty()) {
            dag.tag(label);
        }
    }
    if let Some(tag) = schedule.transform.as_ref().and_then(|t| t.tag()) {
        dag.tag(tag);
    }

    dag.chain_task(
        EXTRACT_LOAD_TASK_ID,
        ctx.meltano_command(&format!("schedule run {}", shell_quote(&schedule.name))),
    );

    Some(dag)
}

/// Build the job graph for one job schedule.
///
/// Returns `None` when the record has no nested job or is run-once.
/// Enablement is not checked here.
pub fn build_job_graph(
    schedule: &JobSchedule,
    ctx: &GeneratorContext,
) -> Option<JobGraphDefinition> {
    let Some(ref job) = schedule.job else {
        info!(
            schedule = %schedule.name,
            "no job graph created, the schedule was passed to the job builder but has no job"
        );
        return None;
    };

    if is_run_once(schedule.cron_interval.as_deref()) {
        info!(
            schedule = %schedule.name,
            "no job graph created because the schedule interval is `@once`"
        );
        return None;
    }

    let base_id = format!("{DAG_ID_PREFIX}_{}_{}", schedule.name, job.name);
    let args = DefaultArgs::default().with_start_date(schedule.start_date.unwrap_or_else(epoch));

    let mut dag = JobGraphDefinition::new(&base_id, args, schedule.cron_interval.clone());
    dag.tag(format!("schedule:{}", schedule.name))
        .tag(format!("job:{}", job.name));

    for (idx, task) in job.tasks.iter().enumerate() {
        let run_args = task.run_args();
        debug!(schedule = %schedule.name, task = idx, run_args = %run_args, "adding task");
        dag.chain_task(
            format!("{base_id}_task{idx}"),
            ctx.meltano_command(&format!("run {run_args}")),
        );
    }

    Some(dag)
}

/// Register job graphs for every enabled elt schedule.
///
/// Returns how many job graphs were registered.
pub fn register_elt_schedules(
    schedules: &[Schedule],
    ctx: &GeneratorContext,
    registry: &mut JobGraphRegistry,
) -> Result<usize, GeneratorError> {
    let mut registered = 0;
    for schedule in schedules {
        debug!(schedule = %schedule.name, ?schedule, "considering elt schedule");
        if !is_enabled(schedule, &ctx.environment_name) {
            continue;
        }
        if let Some(dag) = build_elt_job_graph(schedule, ctx) {
            dag.execution_order()?;
            registry.register(&schedule.name, dag)?;
            registered += 1;
        }
    }
    Ok(registered)
}

/// Register job graphs for every enabled job schedule.
///
/// Returns how many job graphs were registered.
pub fn register_job_schedules(
    schedules: &[JobSchedule],
    ctx: &GeneratorContext,
    registry: &mut JobGraphRegistry,
) -> Result<usize, GeneratorError> {
    let mut registered = 0;
    for schedule in schedules {
        debug!(schedule = %schedule.name, ?schedule, "considering job schedule");
        if !is_enabled(schedule, &ctx.environment_name) {
            continue;
        }
        if let Some(dag) = build_job_graph(schedule, ctx) {
            dag.execution_order()?;
            registry.register(&schedule.name, dag)?;
            registered += 1;
        }
    }
    Ok(registered)
}
