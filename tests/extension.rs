use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use airflow_ext::config::{
    ExtensionConfig, expand_vars, load_extension_config, load_generator_context,
};
use airflow_ext::errors::ExtensionError;
use airflow_ext::extension::assets::{DAG_GENERATOR, GITIGNORE};
use airflow_ext::extension::{AirflowExtension, DescribeFormat, InstallOutcome};

type TestResult = Result<(), Box<dyn Error>>;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn extension_config_defaults_derive_from_airflow_home() -> TestResult {
    let env = lookup(&[("AIRFLOW_HOME", "/opt/airflow")]);
    let config = load_extension_config(&env)?;

    assert_eq!(config.airflow_home, PathBuf::from("/opt/airflow"));
    assert_eq!(config.airflow_cfg_path, PathBuf::from("/opt/airflow/config/airflow.cfg"));
    assert_eq!(config.dags_path, PathBuf::from("/opt/airflow/orchestrate/dags"));
    assert_eq!(config.gitignore_path(), PathBuf::from("/opt/airflow/.gitignore"));
    Ok(())
}

#[test]
fn extension_config_honours_overrides() -> TestResult {
    let env = lookup(&[
        ("airflow_extension_AIRFLOW_HOME", "/srv/af"),
        ("AIRFLOW_CONFIG", "/etc/airflow.cfg"),
        ("AIRFLOW__CORE__DAGS_FOLDER", "${MELTANO_PROJECT_ROOT}/orchestrate/$DAGS"),
        ("MELTANO_PROJECT_ROOT", "/project"),
        ("DAGS", "dags"),
    ]);
    let config = load_extension_config(&env)?;

    assert_eq!(config.airflow_home, PathBuf::from("/srv/af"));
    assert_eq!(config.airflow_cfg_path, PathBuf::from("/etc/airflow.cfg"));
    assert_eq!(config.dags_path, PathBuf::from("/project/orchestrate/dags"));
    Ok(())
}

#[test]
fn missing_airflow_home_is_a_config_error() {
    let env = lookup(&[("AIRFLOW_HOME", "")]);
    let err = load_extension_config(&env).unwrap_err();
    assert!(matches!(err, ExtensionError::ConfigError(_)), "got {err:?}");
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn unknown_variables_are_left_unexpanded() {
    let env = lookup(&[("A", "x")]);
    assert_eq!(expand_vars("$A/${A}/$B/${B}", &env), "x/x/$B/${B}");
}

#[test]
fn generator_context_from_environment() -> TestResult {
    let project = tempfile::tempdir()?;
    let root = project.path().to_string_lossy().into_owned();

    let env = lookup(&[("MELTANO_PROJECT_ROOT", root.as_str()), ("MELTANO_ENVIRONMENT", "prod")]);
    let ctx = load_generator_context(&env, Path::new("/elsewhere"));
    assert_eq!(ctx.project_root, project.path().to_path_buf());
    assert_eq!(ctx.meltano_bin, "meltano");
    assert_eq!(ctx.environment_name, "prod");

    fs::create_dir_all(project.path().join(".meltano/run"))?;
    fs::write(project.path().join(".meltano/run/bin"), "")?;
    let ctx = load_generator_context(&env, Path::new("/elsewhere"));
    assert_eq!(ctx.meltano_bin, ".meltano/run/bin");
    assert_eq!(ctx.meltano_program(), project.path().join(".meltano/run/bin"));

    let ctx = load_generator_context(&lookup(&[]), Path::new("/elsewhere"));
    assert_eq!(ctx.project_root, PathBuf::from("/elsewhere"));
    assert_eq!(ctx.environment_name, "(unknown)");
    Ok(())
}

#[test]
fn describe_formats() -> TestResult {
    let describe = AirflowExtension::describe();

    assert_eq!(
        describe.formatted(DescribeFormat::Text)?,
        r#"commands: ["airflow_extension", "airflow_invoker"]"#
    );

    let json: serde_json::Value = serde_json::from_str(&describe.formatted(DescribeFormat::Json)?)?;
    assert_eq!(json["commands"]["airflow_extension"], "invoke airflow_extension");
    assert_eq!(json["commands"]["airflow_invoker"], "invoke airflow_invoker");

    let yaml = describe.formatted(DescribeFormat::Yaml)?;
    assert!(yaml.contains("airflow_invoker: invoke airflow_invoker"), "{yaml}");
    Ok(())
}

/// Extension whose "airflow" is coreutils `true`, so every hook succeeds.
fn fake_extension(home: &Path) -> AirflowExtension {
    AirflowExtension::new(ExtensionConfig {
        airflow_bin: "true".to_string(),
        airflow_home: home.to_path_buf(),
        airflow_cfg_path: home.join("config").join("airflow.cfg"),
        dags_path: home.join("orchestrate").join("dags"),
    })
}

#[cfg(unix)]
#[tokio::test]
async fn initialize_installs_bundled_files_once() -> TestResult {
    let home = tempfile::tempdir()?;
    let ext = fake_extension(home.path());

    let outcomes = ext.initialize(false).await?;
    assert_eq!(outcomes, vec![InstallOutcome::Created; 3]);
    assert!(home.path().join("config").is_dir());

    let generator = home.path().join("orchestrate/dags/meltano_dag_generator.py");
    assert_eq!(fs::read_to_string(&generator)?, DAG_GENERATOR);
    assert_eq!(fs::read_to_string(home.path().join(".gitignore"))?, GITIGNORE);

    let outcomes = ext.initialize(false).await?;
    assert_eq!(outcomes, vec![InstallOutcome::Unchanged; 3]);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn initialize_keeps_local_edits_unless_forced() -> TestResult {
    let home = tempfile::tempdir()?;
    let ext = fake_extension(home.path());
    let gitignore = home.path().join(".gitignore");
    fs::write(&gitignore, "my-own-rules\n")?;

    let outcomes = ext.initialize(false).await?;
    assert_eq!(outcomes[2], InstallOutcome::Kept);
    assert_eq!(fs::read_to_string(&gitignore)?, "my-own-rules\n");

    let outcomes = ext.initialize(true).await?;
    assert_eq!(outcomes[2], InstallOutcome::Overwritten);
    assert_eq!(fs::read_to_string(&gitignore)?, GITIGNORE);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn invoke_runs_hooks_then_the_command() -> TestResult {
    let home = tempfile::tempdir()?;
    let ext = fake_extension(home.path());
    ext.pass_through(&["version".to_string()]).await?;
    ext.invoke(None, &[]).await?;
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_pre_invoke_hook_propagates_its_exit_code() -> TestResult {
    let home = tempfile::tempdir()?;
    let ext = AirflowExtension::new(ExtensionConfig {
        airflow_bin: "false".to_string(),
        ..fake_extension(home.path()).config().clone()
    });

    let err = ext.pass_through(&["version".to_string()]).await.unwrap_err();
    assert!(matches!(err, ExtensionError::Process(_)), "got {err:?}");
    assert_eq!(err.exit_code(), 1);
    Ok(())
}
