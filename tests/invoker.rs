use std::error::Error;

use airflow_ext::errors::ProcessError;
use airflow_ext::exec::{Invoker, StdioMode};
use airflow_ext_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[cfg(unix)]
#[tokio::test]
async fn run_captures_stdout() -> TestResult {
    let output = Invoker::new("sh")
        .run(&["-c", "echo hello"], StdioMode::Capture)
        .await?;
    assert_eq!(output.code, 0);
    assert_eq!(output.stdout.trim(), "hello");
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_discards_stdout_when_asked() -> TestResult {
    let output = Invoker::new("sh")
        .run(&["-c", "echo hello"], StdioMode::Discard)
        .await?;
    assert!(output.stdout.is_empty());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_failure_keeps_code_and_stderr() {
    let err = Invoker::new("sh")
        .run(&["-c", "echo oops >&2; exit 4"], StdioMode::Capture)
        .await
        .unwrap_err();
    match err {
        ProcessError::Failed { code, stderr, .. } => {
            assert_eq!(code, 4);
            assert_eq!(stderr.as_deref().map(str::trim), Some("oops"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn env_and_cwd_are_applied() -> TestResult {
    let dir = tempfile::tempdir()?;
    let output = Invoker::new("sh")
        .with_cwd(dir.path())
        .with_env("AIRFLOW_EXT_TEST", "42")
        .run(&["-c", "echo $AIRFLOW_EXT_TEST; pwd"], StdioMode::Capture)
        .await?;
    let mut lines = output.stdout.lines();
    assert_eq!(lines.next(), Some("42"));
    let pwd = std::fs::canonicalize(lines.next().ok_or("no pwd")?)?;
    assert_eq!(pwd, std::fs::canonicalize(dir.path())?);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_and_log_succeeds_and_drains_both_pipes() -> TestResult {
    init_tracing();
    // Enough output on both pipes to block a child whose pipes are not read.
    let script = "i=0; while [ $i -lt 2000 ]; do echo out $i; echo err $i >&2; i=$((i+1)); done";
    with_timeout(Invoker::new("sh").run_and_log(Some("-c"), &[script])).await?;
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_and_log_surfaces_the_exact_exit_code() {
    init_tracing();
    let err = with_timeout(Invoker::new("sh").run_and_log(Some("-c"), &["exit 7"]))
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Failed { code: 7, .. }), "got {err:?}");
    assert_eq!(err.exit_code(), 7);
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let err = Invoker::new("/nonexistent/airflow")
        .run_and_log(None, &[] as &[&str])
        .await
        .unwrap_err();
    assert!(matches!(err, ProcessError::Spawn { .. }), "got {err:?}");
    assert_eq!(err.exit_code(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn run_and_log_keeps_draining_after_invalid_utf8() -> TestResult {
    init_tracing();
    let script = "printf 'bad \\377\\376 line\\n'; printf 'bad \\377\\376 line\\n' >&2; \
                  i=0; while [ $i -lt 20000 ]; do echo line $i; i=$((i+1)); done; exit 0";
    with_timeout(Invoker::new("sh").run_and_log(Some("-c"), &[script])).await?;
    Ok(())
}
