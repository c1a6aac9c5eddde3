// src/extension/airflow.rs

use std::fs;

use tracing::{debug, info};

use crate::config::{EnvLookup, ExtensionConfig, ProcessEnv, load_extension_config};
use crate::errors::Result;
use crate::exec::{Invoker, StdioMode, log_subprocess_error};
use crate::extension::assets::{InstallOutcome, bundled_files, install};
use crate::extension::describe::{CommandKind, Describe, ExtensionCommand};

/// Airflow wrapped as a Meltano extension.
#[derive(Debug, Clone)]
pub struct AirflowExtension {
    config: ExtensionConfig,
    invoker: Invoker,
}

impl AirflowExtension {
    pub fn new(config: ExtensionConfig) -> Self {
        // Keeps airflow installable without GPL deps.
        let invoker = Invoker::new(&config.airflow_bin)
            .with_env("SLUGIFY_USES_TEXT_UNIDECODE", "yes")
            .with_env("AIRFLOW_HOME", config.airflow_home.to_string_lossy())
            .with_env("AIRFLOW_CONFIG", config.airflow_cfg_path.to_string_lossy())
            .with_env(
                "AIRFLOW__CORE__DAGS_FOLDER",
                config.dags_path.to_string_lossy(),
            );
        Self { config, invoker }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&ProcessEnv)
    }

    pub fn from_lookup(env: &dyn EnvLookup) -> Result<Self> {
        Ok(Self::new(load_extension_config(env)?))
    }

    pub fn config(&self) -> &ExtensionConfig {
        &self.config
    }

    /// Hooks run before any Airflow command: make sure a config file and a
    /// metadata database exist.
    pub async fn pre_invoke(&self) -> Result<()> {
        self.create_config().await?;
        self.initdb().await
    }

    pub async fn post_invoke(&self) -> Result<()> {
        Ok(())
    }

    /// Prepare Airflow and install the bundled DAG generator files.
    ///
    /// Existing files are left alone unless `force` is set.
    pub async fn initialize(&self, force: bool) -> Result<Vec<InstallOutcome>> {
        self.pre_invoke().await?;

        fs::create_dir_all(&self.config.dags_path)?;

        let mut outcomes = Vec::new();
        for file in bundled_files(&self.config) {
            let outcome = install(&file, force)?;
            debug!(path = %file.path.display(), ?outcome, "bundled file");
            outcomes.push(outcome);
        }
        info!(dags_path = %self.config.dags_path.display(), "initialized airflow extension");
        Ok(outcomes)
    }

    /// Run `airflow <command_name> <args..>`, streaming its output.
    ///
    /// A failed child comes back as `ProcessError::Failed` carrying the
    /// child's exit code.
    pub async fn invoke(&self, command_name: Option<&str>, args: &[String]) -> Result<()> {
        self.pre_invoke().await?;

        let cmd = match command_name {
            Some(name) => format!("airflow {name}"),
            None => "airflow".to_string(),
        };
        if let Err(err) = self.invoker.run_and_log(command_name, args).await {
            log_subprocess_error(&cmd, &err, "airflow invocation failed");
            return Err(err.into());
        }

        self.post_invoke().await
    }

    /// Entry point of the `airflow_invoker` binary: everything is passed
    /// through unchanged.
    pub async fn pass_through(&self, args: &[String]) -> Result<()> {
        match args.split_first() {
            Some((command, rest)) => self.invoke(Some(command.as_str()), rest).await,
            None => self.invoke(None, &[]).await,
        }
    }

    pub fn describe() -> Describe {
        Describe {
            commands: vec![
                ExtensionCommand {
                    name: "airflow_extension".to_string(),
                    description: "airflow extension commands".to_string(),
                    kind: CommandKind::Extension,
                },
                ExtensionCommand {
                    name: "airflow_invoker".to_string(),
                    description: "airflow pass through invoker".to_string(),
                    kind: CommandKind::Invoker,
                },
            ],
        }
    }

    async fn create_config(&self) -> Result<()> {
        if let Some(parent) = self.config.airflow_cfg_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Airflow writes a default airflow.cfg on first start.
        if let Err(err) = self.invoker.run(&["--help"], StdioMode::Discard).await {
            log_subprocess_error("airflow --help", &err, "initial airflow invocation failed");
            return Err(err.into());
        }
        Ok(())
    }

    async fn initdb(&self) -> Result<()> {
        if let Err(err) = self.invoker.run(&["db", "init"], StdioMode::Capture).await {
            log_subprocess_error("airflow db init", &err, "airflow db init failed");
            return Err(err.into());
        }
        Ok(())
    }
}
