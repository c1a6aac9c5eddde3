// src/schedule/source.rs

//! Where schedule exports come from.
//!
//! The generator talks to a [`ScheduleSource`] instead of spawning
//! `meltano` directly, so tests can hand it canned JSON.

use std::future::Future;
use std::pin::Pin;

use tracing::{debug, info};

use crate::config::GeneratorContext;
use crate::errors::{GeneratorError, ProcessError};
use crate::exec::{Invoker, StdioMode, log_subprocess_error};
use crate::schedule::model::ScheduleExport;

/// Trait abstracting how the raw export text is obtained.
pub trait ScheduleSource: Send + Sync {
    /// Return the raw JSON text of the export.
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + '_>>;
}

/// Production source: runs `<meltano-bin> schedule list --format=json` from
/// the project root.
#[derive(Debug, Clone)]
pub struct CommandScheduleSource {
    invoker: Invoker,
}

impl CommandScheduleSource {
    pub const ARGS: [&'static str; 3] = ["schedule", "list", "--format=json"];

    pub fn new(ctx: &GeneratorContext) -> Self {
        Self::from_invoker(Invoker::new(ctx.meltano_program()).with_cwd(&ctx.project_root))
    }

    pub fn from_invoker(invoker: Invoker) -> Self {
        Self { invoker }
    }
}

impl ScheduleSource for CommandScheduleSource {
    fn fetch(&self) -> Pin<Box<dyn Future<Output = Result<String, GeneratorError>> + Send + '_>> {
        Box::pin(async move {
            let cmd = format!("{} {}", self.invoker.bin().display(), Self::ARGS.join(" "));
            match self.invoker.run(&Self::ARGS, StdioMode::Capture).await {
                Ok(output) => Ok(output.stdout),
                Err(err) => {
                    log_subprocess_error(&cmd, &err, "schedule listing failed");
                    let reason = match err {
                        ProcessError::Failed { code, .. } => {
                            format!("'{cmd}' exited with code {code}")
                        }
                        other => other.to_string(),
                    };
                    Err(GeneratorError::SourceUnavailable(reason))
                }
            }
        })
    }
}

/// Fetch and parse one export from `source`.
///
/// Blank output is treated as an unavailable source rather than as an empty
/// export.
pub async fn read_export(source: &dyn ScheduleSource) -> Result<ScheduleExport, GeneratorError> {
    let text = source.fetch().await?;
    if text.trim().is_empty() {
        return Err(GeneratorError::SourceUnavailable(
            "schedule listing produced no output".to_string(),
        ));
    }
    debug!(bytes = text.len(), "received schedule export");

    let export = ScheduleExport::from_json(&text)?;
    info!(
        version = export.version(),
        records = export.len(),
        "parsed schedule export"
    );
    Ok(export)
}
