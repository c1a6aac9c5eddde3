// src/config/model.rs

use std::path::{Path, PathBuf};

use crate::dag::DuplicatePolicy;

/// Name under which this extension is known to Meltano.
pub const APP_NAME: &str = "airflow_extension";

/// Symlink Meltano maintains to its own executable, relative to the project.
pub const MELTANO_BIN_LINK: &str = ".meltano/run/bin";

/// Fallback when the symlink is missing: rely on `PATH`.
pub const MELTANO_BIN_FALLBACK: &str = "meltano";

/// Environment name used when `MELTANO_ENVIRONMENT` is unset.
pub const UNKNOWN_ENVIRONMENT: &str = "(unknown)";

/// Everything the Airflow extension needs to know about its installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Binary used for every Airflow call.
    pub airflow_bin: String,

    /// `$AIRFLOW_HOME`.
    pub airflow_home: PathBuf,

    /// `$AIRFLOW_CONFIG`, defaulting to `<home>/config/airflow.cfg`.
    pub airflow_cfg_path: PathBuf,

    /// `$AIRFLOW__CORE__DAGS_FOLDER`, defaulting to `<home>/orchestrate/dags`.
    pub dags_path: PathBuf,
}

impl ExtensionConfig {
    pub fn gitignore_path(&self) -> PathBuf {
        self.airflow_home.join(".gitignore")
    }
}

/// Inputs to one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorContext {
    /// Meltano project root; every generated command `cd`s here first.
    pub project_root: PathBuf,

    /// Meltano executable as written into generated commands.
    pub meltano_bin: String,

    /// Active Meltano environment for the enablement filter.
    pub environment_name: String,

    pub duplicate_policy: DuplicatePolicy,
}

impl GeneratorContext {
    pub fn new(project_root: impl Into<PathBuf>, meltano_bin: impl Into<String>) -> Self {
        Self {
            project_root: project_root.into(),
            meltano_bin: meltano_bin.into(),
            environment_name: UNKNOWN_ENVIRONMENT.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_environment(mut self, name: impl Into<String>) -> Self {
        self.environment_name = name.into();
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Path to spawn for the Meltano executable.
    ///
    /// Relative paths with a directory component are anchored at the project
    /// root; bare names are left for `PATH` lookup.
    pub fn meltano_program(&self) -> PathBuf {
        let bin = Path::new(&self.meltano_bin);
        if bin.is_relative() && bin.components().count() > 1 {
            self.project_root.join(bin)
        } else {
            bin.to_path_buf()
        }
    }

    /// Shell command run by every generated task: `cd <root>; <bin> <args>`.
    pub fn meltano_command(&self, args: &str) -> String {
        format!(
            "cd {}; {} {}",
            shell_quote(&self.project_root.to_string_lossy()),
            shell_quote(&self.meltano_bin),
            args
        )
    }
}

/// Quote `word` for a POSIX shell. Words made only of safe characters are
/// returned as is.
pub fn shell_quote(word: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c);
    if !word.is_empty() && word.chars().all(safe) {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}
