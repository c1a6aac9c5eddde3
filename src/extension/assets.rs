// src/extension/assets.rs

//! Files bundled into the binary and installed by `initialize`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::ExtensionConfig;
use crate::errors::Result;

pub const DAG_GENERATOR: &str = include_str!("../../files/orchestrate/meltano_dag_generator.py");
pub const DAGS_README: &str = include_str!("../../files/orchestrate/README.md");
pub const GITIGNORE: &str = include_str!("../../files/dot-gitignore");

/// A bundled file and where it lands.
#[derive(Debug, Clone)]
pub struct BundledFile {
    pub path: PathBuf,
    pub contents: &'static str,
}

/// Everything `initialize` installs for `config`.
pub fn bundled_files(config: &ExtensionConfig) -> Vec<BundledFile> {
    vec![
        BundledFile {
            path: config.dags_path.join("meltano_dag_generator.py"),
            contents: DAG_GENERATOR,
        },
        BundledFile {
            path: config.dags_path.join("README.md"),
            contents: DAGS_README,
        },
        BundledFile {
            path: config.gitignore_path(),
            contents: GITIGNORE,
        },
    ]
}

/// What [`install`] did with one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Created,
    /// Already present with the bundled content.
    Unchanged,
    /// Present with different content and left alone.
    Kept,
    /// Present with different content and replaced (`force`).
    Overwritten,
}

/// Install `file` unless it already exists.
///
/// With `force`, an existing file is replaced when its BLAKE3 digest differs
/// from the bundled copy.
pub fn install(file: &BundledFile, force: bool) -> Result<InstallOutcome> {
    let path = file.path.as_path();

    if !path.exists() {
        warn!(path = %path.display(), "bundled file not found, will be auto-generated");
        write(path, file.contents)?;
        return Ok(InstallOutcome::Created);
    }

    let existing = fs::read(path)?;
    if blake3::hash(&existing) == blake3::hash(file.contents.as_bytes()) {
        debug!(path = %path.display(), "bundled file already up to date");
        return Ok(InstallOutcome::Unchanged);
    }

    if force {
        info!(path = %path.display(), "overwriting locally modified bundled file");
        write(path, file.contents)?;
        Ok(InstallOutcome::Overwritten)
    } else {
        debug!(path = %path.display(), "keeping locally modified bundled file");
        Ok(InstallOutcome::Kept)
    }
}

fn write(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}
