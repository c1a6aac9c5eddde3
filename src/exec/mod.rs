// src/exec/mod.rs

//! Process execution layer.
//!
//! Everything that spawns a child process goes through [`Invoker`], built on
//! `tokio::process::Command`:
//!
//! - [`Invoker::run`] captures output and is used for short helper calls
//!   (`airflow --help`, `airflow db init`, `meltano schedule list`).
//! - [`Invoker::run_and_log`] streams output live and is used for the
//!   user-facing pass-through.

pub mod invoker;

pub use invoker::{Invoker, ProcessOutput, StdioMode, log_subprocess_error};
