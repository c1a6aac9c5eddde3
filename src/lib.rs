// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod extension;
pub mod logging;
pub mod schedule;

use std::path::PathBuf;

use anyhow::Context;
use tracing::debug;

use crate::cli::{CliArgs, Command, OutputFormat};
use crate::config::{ProcessEnv, load_generator_context};
use crate::dag::{DuplicatePolicy, JobGraphDefinition, JobGraphRegistry, generate_from_source};
use crate::errors::Result;
use crate::extension::{AirflowExtension, DescribeFormat};
use crate::schedule::CommandScheduleSource;

/// High-level entry point used by `main.rs`.
///
/// Dispatches one subcommand. Failures of a wrapped airflow process come
/// back as `ProcessError::Failed`, so callers can exit with the child's code.
pub async fn run(args: CliArgs) -> Result<()> {
    match args.command {
        Command::Initialize { force } => {
            let ext = AirflowExtension::from_env()?;
            ext.initialize(force).await?;
            Ok(())
        }
        Command::Invoke { command_args } => {
            let ext = AirflowExtension::from_env()?;
            debug!(?command_args, "called");
            ext.pass_through(&command_args).await
        }
        Command::Describe { format } => {
            println!("{}", describe(format)?);
            Ok(())
        }
        Command::Generate {
            format,
            on_duplicate,
            dry_run,
        } => {
            let registry = generate_job_graphs(on_duplicate).await?;
            if dry_run {
                print_dry_run(&registry);
            } else {
                println!("{}", render_job_graphs(&registry, format)?);
            }
            Ok(())
        }
    }
}

pub fn describe(format: DescribeFormat) -> Result<String> {
    AirflowExtension::describe().formatted(format)
}

/// Run the generator against the live `meltano` project.
pub async fn generate_job_graphs(policy: DuplicatePolicy) -> Result<JobGraphRegistry> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let ctx = load_generator_context(&ProcessEnv, &cwd).with_duplicate_policy(policy);
    let source = CommandScheduleSource::new(&ctx);
    Ok(generate_from_source(&source, &ctx).await?)
}

/// Serialize the registry as a list of job graphs, sorted by id.
pub fn render_job_graphs(registry: &JobGraphRegistry, format: OutputFormat) -> Result<String> {
    let graphs: Vec<&JobGraphDefinition> = registry.iter().collect();
    let rendered = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(&graphs).context("rendering job graphs as JSON")?
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(&graphs).context("rendering job graphs as YAML")?
        }
    };
    Ok(rendered)
}

/// Simple dry-run output: job graphs, their trigger, tags and tasks.
fn print_dry_run(registry: &JobGraphRegistry) {
    println!("airflow_extension generate dry-run");
    println!("job graphs ({}):", registry.len());
    for dag in registry.iter() {
        println!("  - {}", dag.dag_id);
        if let Some(schedule) = registry.source_schedule(&dag.dag_id) {
            println!("      schedule: {schedule}");
        }
        match dag.schedule_interval {
            Some(ref interval) => println!("      interval: {interval}"),
            None => println!("      interval: (none)"),
        }
        println!("      tags: {:?}", dag.tags);
        if let Some(start) = dag.default_args.start_date {
            println!("      start_date: {start}");
        }
        for task in dag.tasks() {
            println!("      task {}: {}", task.task_id, task.bash_command);
            if let Some(ref upstream) = task.upstream {
                println!("        after: {upstream}");
            }
        }
    }

    debug!("dry-run complete (nothing registered)");
}
