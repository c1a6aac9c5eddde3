// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::config::env::{EnvLookup, expand_vars};
use crate::config::model::{
    APP_NAME, ExtensionConfig, GeneratorContext, MELTANO_BIN_FALLBACK, MELTANO_BIN_LINK,
    UNKNOWN_ENVIRONMENT,
};
use crate::errors::{ExtensionError, Result};

/// Resolve the extension configuration from the environment.
///
/// - `AIRFLOW_HOME`, or `airflow_extension_AIRFLOW_HOME`, is required.
/// - `AIRFLOW_CONFIG` overrides the config file location.
/// - `AIRFLOW__CORE__DAGS_FOLDER` overrides the DAGs folder; `$VAR`
///   references in it are expanded.
pub fn load_extension_config(env: &dyn EnvLookup) -> Result<ExtensionConfig> {
    let airflow_home = env
        .get_non_empty("AIRFLOW_HOME")
        .or_else(|| env.get_non_empty(&format!("{APP_NAME}_AIRFLOW_HOME")))
        .map(PathBuf::from)
        .ok_or_else(|| {
            error!("AIRFLOW_HOME not found in environment, unable to function without it");
            ExtensionError::ConfigError("AIRFLOW_HOME is not set".to_string())
        })?;

    let airflow_cfg_path = env
        .get_non_empty("AIRFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| airflow_home.join("config").join("airflow.cfg"));

    let dags_path = env
        .get_non_empty("AIRFLOW__CORE__DAGS_FOLDER")
        .map(|raw| PathBuf::from(expand_vars(&raw, env)))
        .unwrap_or_else(|| airflow_home.join("orchestrate").join("dags"));

    let config = ExtensionConfig {
        airflow_bin: "airflow".to_string(),
        airflow_home,
        airflow_cfg_path,
        dags_path,
    };
    debug!(?config, "resolved extension config");
    Ok(config)
}

/// Resolve the generator context from the environment.
///
/// `cwd` is the project root fallback when `MELTANO_PROJECT_ROOT` is unset.
pub fn load_generator_context(env: &dyn EnvLookup, cwd: &Path) -> GeneratorContext {
    let project_root = env
        .get_non_empty("MELTANO_PROJECT_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|| cwd.to_path_buf());

    let meltano_bin = resolve_meltano_bin(&project_root);

    let environment_name = env
        .get_non_empty("MELTANO_ENVIRONMENT")
        .unwrap_or_else(|| UNKNOWN_ENVIRONMENT.to_string());

    GeneratorContext::new(project_root, meltano_bin).with_environment(environment_name)
}

/// Prefer the project's `.meltano/run/bin` symlink, else fall back to `PATH`.
pub fn resolve_meltano_bin(project_root: &Path) -> String {
    if project_root.join(MELTANO_BIN_LINK).exists() {
        return MELTANO_BIN_LINK.to_string();
    }
    warn!(
        link = MELTANO_BIN_LINK,
        "a symlink to the 'meltano' executable could not be found, falling back on PATH"
    );
    MELTANO_BIN_FALLBACK.to_string()
}
