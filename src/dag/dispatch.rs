// src/dag/dispatch.rs

use tracing::info;

use crate::config::GeneratorContext;
use crate::dag::builder::{register_elt_schedules, register_job_schedules};
use crate::dag::registry::JobGraphRegistry;
use crate::errors::GeneratorError;
use crate::schedule::{ScheduleExport, ScheduleSource, read_export};

/// Route every record of `export` to its builder and collect the results.
///
/// v2 `elt` records and all v1 records go to the elt builder, v2 `job`
/// records to the job builder. Any error discards the whole registry.
pub fn generate(
    export: &ScheduleExport,
    ctx: &GeneratorContext,
) -> Result<JobGraphRegistry, GeneratorError> {
    let mut registry = JobGraphRegistry::new(ctx.duplicate_policy);

    match export {
        ScheduleExport::V2 { elt, job } => {
            info!(elt = elt.len(), job = job.len(), "received v2 style schedule export");
            register_elt_schedules(elt, ctx, &mut registry)?;
            register_job_schedules(job, ctx, &mut registry)?;
        }
        ScheduleExport::V1(elt) => {
            info!(elt = elt.len(), "received v1 style schedule export");
            register_elt_schedules(elt, ctx, &mut registry)?;
        }
    }

    info!(
        job_graphs = registry.len(),
        environment = %ctx.environment_name,
        "job graph generation complete"
    );
    Ok(registry)
}

/// Read one export from `source` and generate its job graphs.
pub async fn generate_from_source(
    source: &dyn ScheduleSource,
    ctx: &GeneratorContext,
) -> Result<JobGraphRegistry, GeneratorError> {
    let export = read_export(source).await?;
    generate(&export, ctx)
}
