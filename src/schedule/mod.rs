// src/schedule/mod.rs

//! Schedule exports as produced by `meltano schedule list --format=json`.
//!
//! - [`model`] holds the typed export (v1 and v2 shapes).
//! - [`source`] obtains the raw export text.
//! - [`filter`] decides which schedules are enabled for an environment.

pub mod filter;
pub mod model;
pub mod source;

pub use filter::{Annotated, is_enabled};
pub use model::{
    Annotations, EnablementAnnotation, JobSchedule, JobSpec, Schedule, ScheduleExport, TaskSpec,
    Transform, is_run_once,
};
pub use source::{CommandScheduleSource, ScheduleSource, read_export};
