use std::error::Error;
use std::fs;

use airflow_ext::dag::generate_from_source;
use airflow_ext::errors::GeneratorError;
use airflow_ext::exec::Invoker;
use airflow_ext::schedule::{CommandScheduleSource, ScheduleExport, read_export};
use airflow_ext_test_utils::builders::{ExportBuilder, JobScheduleBuilder, ScheduleBuilder};
use airflow_ext_test_utils::fake_source::FakeScheduleSource;
use airflow_ext_test_utils::{init_tracing, test_context, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn reads_and_generates_from_a_source() -> TestResult {
    init_tracing();
    let text = ExportBuilder::v2()
        .elt(ScheduleBuilder::new("foo"))
        .job(JobScheduleBuilder::new("bar", "baz").task("a"))
        .to_json();
    let source = FakeScheduleSource::new(text);

    let registry = generate_from_source(&source, &test_context("dev")).await?;

    assert_eq!(source.fetches(), 1);
    assert_eq!(registry.len(), 2);
    Ok(())
}

#[tokio::test]
async fn blank_output_is_source_unavailable() {
    let source = FakeScheduleSource::new("  \n");
    let err = read_export(&source).await.unwrap_err();
    assert!(matches!(err, GeneratorError::SourceUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn failing_source_aborts_generation() {
    let source = FakeScheduleSource::failing("meltano exploded");
    let err = generate_from_source(&source, &test_context("dev"))
        .await
        .unwrap_err();
    assert!(matches!(err, GeneratorError::SourceUnavailable(_)), "got {err:?}");
}

#[tokio::test]
async fn invalid_json_is_malformed_export() {
    let source = FakeScheduleSource::new("Meltano 3.0: not json");
    let err = read_export(&source).await.unwrap_err();
    assert!(matches!(err, GeneratorError::MalformedExport(_)), "got {err:?}");
}

// `sh schedule list --format=json` executes the file named `schedule` in the
// working directory, which stands in for the meltano executable.
#[cfg(unix)]
#[tokio::test]
async fn command_source_runs_in_the_project_root() -> TestResult {
    let dir = tempfile::tempdir()?;
    let export = ExportBuilder::v1().elt(ScheduleBuilder::new("foo")).to_json();
    fs::write(
        dir.path().join("schedule"),
        format!("[ \"$1 $2\" = \"list --format=json\" ] || exit 9\ncat <<'EOF'\n{export}\nEOF\n"),
    )?;

    let source = CommandScheduleSource::from_invoker(Invoker::new("sh").with_cwd(dir.path()));
    let parsed = with_timeout(read_export(&source)).await?;

    assert!(matches!(parsed, ScheduleExport::V1(ref elt) if elt[0].name == "foo"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn command_source_failure_is_source_unavailable() -> TestResult {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("schedule"), "echo 'no project found' >&2\nexit 2\n")?;

    let source = CommandScheduleSource::from_invoker(Invoker::new("sh").with_cwd(dir.path()));
    let err = with_timeout(read_export(&source)).await.unwrap_err();

    match err {
        GeneratorError::SourceUnavailable(reason) => assert!(reason.contains("code 2"), "{reason}"),
        other => panic!("unexpected error {other:?}"),
    }
    Ok(())
}
