// src/errors.rs

//! Crate-wide error types.
//!
//! - [`GeneratorError`] covers the schedule-to-job-graph pass. Every variant
//!   is fatal to the pass: no partial registry is ever handed back.
//! - [`ProcessError`] covers subprocess invocation.
//! - [`ExtensionError`] is what the Airflow extension surface returns.
//!
//! Binaries use `anyhow` on top of these, like any other caller.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("schedule source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed schedule export: {0}")]
    MalformedExport(String),

    #[error("unknown schedule export schema: {0}")]
    UnknownSchema(String),

    #[error("duplicate job identifier '{dag_id}' (from schedule '{schedule}')")]
    DuplicateJobIdentifier { dag_id: String, schedule: String },

    #[error("invalid job graph '{dag_id}': {reason}")]
    InvalidJobGraph { dag_id: String, reason: String },
}

impl From<serde_json::Error> for GeneratorError {
    fn from(err: serde_json::Error) -> Self {
        GeneratorError::MalformedExport(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to spawn '{cmd}': {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{cmd}' exited with code {code}")]
    Failed {
        cmd: String,
        code: i32,
        stderr: Option<String>,
    },

    #[error("IO error while running '{cmd}': {source}")]
    Io {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
}

impl ProcessError {
    /// Exit code to surface as our own when this error ends the process.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::Failed { code, .. } => *code,
            _ => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtensionError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ExtensionError {
    /// Exit code for the binaries: a failed child keeps its own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            ExtensionError::Process(err) => err.exit_code(),
            _ => 1,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ExtensionError>;
