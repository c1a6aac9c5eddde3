// src/exec/invoker.rs

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, copy, sink};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

use crate::errors::ProcessError;

/// What to do with the child's stdout in [`Invoker::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Capture it into [`ProcessOutput::stdout`].
    #[default]
    Capture,
    /// Send it to `/dev/null`.
    Discard,
}

/// Captured result of a successful [`Invoker::run`].
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Minimal invoker for one external binary.
#[derive(Debug, Clone)]
pub struct Invoker {
    bin: PathBuf,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl Invoker {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Run the child from this directory instead of ours.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Extra environment variable for every child, on top of ours.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.bin);
        cmd.args(args);
        if let Some(ref cwd) = self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.envs(self.env.iter().map(|(k, v)| (k, v)));
        cmd
    }

    fn describe<S: AsRef<OsStr>>(&self, args: &[S]) -> String {
        let mut parts = vec![self.bin.display().to_string()];
        parts.extend(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()));
        parts.join(" ")
    }

    /// Run to completion, capturing stderr (and stdout unless discarded).
    ///
    /// Nothing is logged here; a non-zero exit comes back as
    /// [`ProcessError::Failed`] carrying the captured stderr.
    pub async fn run<S: AsRef<OsStr>>(
        &self,
        args: &[S],
        stdout: StdioMode,
    ) -> Result<ProcessOutput, ProcessError> {
        let description = self.describe(args);
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::null()).stderr(Stdio::piped());
        match stdout {
            StdioMode::Capture => cmd.stdout(Stdio::piped()),
            StdioMode::Discard => cmd.stdout(Stdio::null()),
        };

        debug!(cmd = %description, "running subprocess");

        let output = cmd.output().await.map_err(|source| ProcessError::Spawn {
            cmd: description.clone(),
            source,
        })?;

        let code = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ProcessError::Failed {
                cmd: description,
                code,
                stderr: Some(stderr),
            });
        }

        Ok(ProcessOutput {
            code,
            stdout,
            stderr,
        })
    }

    /// Run and stream the child's stdout and stderr through the logger.
    ///
    /// Both pipes are drained concurrently so neither can fill up and block
    /// the child. Returns once the child has exited and both pipes are closed.
    pub async fn run_and_log<S: AsRef<OsStr>>(
        &self,
        sub_command: Option<&str>,
        args: &[S],
    ) -> Result<(), ProcessError> {
        let mut popen_args: Vec<&OsStr> = Vec::with_capacity(args.len() + 1);
        if let Some(sub) = sub_command {
            popen_args.push(OsStr::new(sub));
        }
        popen_args.extend(args.iter().map(AsRef::as_ref));

        let description = self.describe(&popen_args);
        let mut cmd = self.command(&popen_args);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        info!(cmd = %description, "invoking");

        let mut child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            cmd: description.clone(),
            source,
        })?;

        let stdout_task = child
            .stdout
            .take()
            .map(|out| tokio::spawn(log_stdio(out, "stdout")));
        let stderr_task = child
            .stderr
            .take()
            .map(|err| tokio::spawn(log_stdio(err, "stderr")));

        let status = child.wait().await.map_err(|source| ProcessError::Io {
            cmd: description.clone(),
            source,
        })?;

        for task in [stdout_task, stderr_task].into_iter().flatten() {
            if let Err(err) = task.await {
                warn!(cmd = %description, error = %err, "output reader task failed");
            }
        }

        let code = status.code().unwrap_or(-1);
        debug!(cmd = %description, exit_code = code, "subprocess exited");

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::Failed {
                cmd: description,
                code,
                stderr: None,
            })
        }
    }
}

/// Log each line of `reader` until EOF.
///
/// Lines need not be valid UTF-8. The pipe is drained to EOF even after a
/// read error.
async fn log_stdio<R>(reader: R, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                info!(stdio_stream = stream, "{}", line.trim_end());
            }
            Err(err) => {
                warn!(stdio_stream = stream, error = %err, "error reading child output");
                if copy(&mut reader, &mut sink()).await.is_err() {
                    break;
                }
            }
        }
    }
}

/// Log a subprocess failure, replaying any captured stderr line by line.
pub fn log_subprocess_error(cmd: &str, err: &ProcessError, error_message: &str) {
    if let ProcessError::Failed {
        stderr: Some(stderr),
        ..
    } = err
    {
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            warn!(cmd = %cmd, stdio_stream = "stderr", "{}", line);
        }
    }
    error!(
        cmd = %cmd,
        returncode = err.exit_code(),
        error_message = %error_message,
        "error invoking {}",
        cmd
    );
}
