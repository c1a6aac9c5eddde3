// src/dag/mod.rs

//! Job graph generation.
//!
//! - [`model`] holds the job graph definition handed to the scheduler.
//! - [`builder`] turns single schedule records into job graphs.
//! - [`dispatch`] routes a whole export to the builders.
//! - [`registry`] collects the results of one run.

pub mod builder;
pub mod dispatch;
pub mod model;
pub mod registry;

pub use builder::{build_elt_job_graph, build_job_graph};
pub use dispatch::{generate, generate_from_source};
pub use model::{DefaultArgs, JobGraphDefinition, TaskNode};
pub use registry::{DuplicatePolicy, JobGraphRegistry};
