// src/extension/mod.rs

//! The Meltano-facing extension surface around the `airflow` CLI.

pub mod airflow;
pub mod assets;
pub mod describe;

pub use airflow::AirflowExtension;
pub use assets::{BundledFile, InstallOutcome};
pub use describe::{Describe, DescribeFormat};
