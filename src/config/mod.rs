// src/config/mod.rs

//! Configuration for the extension and the generator.
//!
//! Responsibilities:
//! - Define the resolved configuration types (`model.rs`).
//! - Abstract environment access and `$VAR` expansion (`env.rs`).
//! - Resolve configuration from an environment (`loader.rs`).

pub mod env;
pub mod loader;
pub mod model;

pub use env::{EnvLookup, ProcessEnv, expand_vars};
pub use loader::{load_extension_config, load_generator_context, resolve_meltano_bin};
pub use model::{APP_NAME, ExtensionConfig, GeneratorContext, shell_quote};
