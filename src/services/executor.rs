//! Runs a compiled command and collects its output.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::ExecError;
use crate::models::ExecutionResult;

/// Exit code reported when the command could not be run at all.
pub const INFRASTRUCTURE_FAILURE: i32 = -1;

/// How long a cancelled child gets to exit after SIGTERM before it is killed.
const TERMINATE_GRACE: Duration = Duration::from_secs(2);

const READ_BUFFER_SIZE: usize = 8192;

/// Destination for forwarded process output.
pub type OutputSink<'a> = &'a mut (dyn AsyncWrite + Unpin + Send);

struct Outcome {
    status: ExitStatus,
    captured: Vec<u8>,
    cancelled: bool,
}

/// Run `argv` and wait for it to finish.
///
/// stdout is piped when `capture` is set or a stdout sink is given; stderr
/// is piped only when a stderr sink is given. Otherwise the child inherits
/// the parent's streams. Both pipes are drained concurrently. Captured stdout
/// becomes the match list; without capture it is streamed to the sink as it
/// arrives.
///
/// Never fails: when the command cannot be started the result carries
/// [`INFRASTRUCTURE_FAILURE`] and no matches.
pub async fn execute(
    argv: &[String],
    capture: bool,
    stdout_sink: Option<OutputSink<'_>>,
    stderr_sink: Option<OutputSink<'_>>,
    cancel: &CancellationToken,
) -> ExecutionResult {
    match run(argv, capture, stdout_sink, stderr_sink, cancel).await {
        Ok(outcome) => {
            let mut result = ExecutionResult::new(argv.to_vec());
            result.exit_code = exit_code(outcome.status);
            result.cancelled = outcome.cancelled;
            if capture {
                result.matches = split_matches(&outcome.captured);
            }
            debug!(
                exit_code = result.exit_code,
                matches = result.matches.len(),
                cancelled = result.cancelled,
                "search command finished"
            );
            result
        }
        Err(e) => {
            warn!(error = %e, "search command could not be run");
            ExecutionResult::infrastructure_failure(argv.to_vec(), INFRASTRUCTURE_FAILURE)
        }
    }
}

async fn run(
    argv: &[String],
    capture: bool,
    stdout_sink: Option<OutputSink<'_>>,
    stderr_sink: Option<OutputSink<'_>>,
    cancel: &CancellationToken,
) -> Result<Outcome, ExecError> {
    let (program, args) = argv.split_first().ok_or(ExecError::EmptyCommand)?;

    let intercept_stdout = capture || stdout_sink.is_some();
    let intercept_stderr = stderr_sink.is_some();

    let mut command = Command::new(program);
    command
        .args(args)
        .stdout(if intercept_stdout {
            Stdio::piped()
        } else {
            Stdio::inherit()
        })
        .stderr(if intercept_stderr {
            Stdio::piped()
        } else {
            Stdio::inherit()
        })
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ExecError::SpawnError {
        program: program.clone(),
        source,
    })?;

    let stdout = if intercept_stdout {
        Some(child.stdout.take().ok_or(ExecError::PipeError("stdout"))?)
    } else {
        None
    };
    let stderr = if intercept_stderr {
        Some(child.stderr.take().ok_or(ExecError::PipeError("stderr"))?)
    } else {
        None
    };

    let finished = {
        let drain_and_wait = async {
            let (captured, _) = tokio::join!(
                pump(stdout, capture, stdout_sink),
                pump(stderr, false, stderr_sink)
            );
            child.wait().await.map(|status| (status, captured))
        };

        tokio::select! {
            finished = drain_and_wait => Some(finished),
            _ = cancel.cancelled() => None,
        }
    };

    match finished {
        Some(finished) => {
            let (status, captured) = finished.map_err(ExecError::WaitError)?;
            Ok(Outcome {
                status,
                captured,
                cancelled: false,
            })
        }
        None => {
            debug!("search cancelled, terminating child");
            let status = terminate(&mut child).await?;
            Ok(Outcome {
                status,
                captured: Vec::new(),
                cancelled: true,
            })
        }
    }
}

/// Copy everything from `reader` into the capture buffer or the sink.
///
/// Sink write errors are logged and further output is discarded; the pipe
/// is still drained so the child never blocks on a full buffer.
async fn pump<R>(reader: Option<R>, capture: bool, mut sink: Option<OutputSink<'_>>) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(mut reader) = reader else {
        return captured;
    };

    let mut buffer = [0u8; READ_BUFFER_SIZE];
    loop {
        let n = match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "failed to read child output");
                break;
            }
        };

        if capture {
            captured.extend_from_slice(&buffer[..n]);
            continue;
        }

        let failed = match sink.as_deref_mut() {
            Some(out) => out.write_all(&buffer[..n]).await.err(),
            None => None,
        };
        if let Some(e) = failed {
            debug!(error = %e, "output sink closed");
            sink = None;
        }
    }

    if let Some(out) = sink.as_deref_mut()
        && let Err(e) = out.flush().await
    {
        debug!(error = %e, "failed to flush output sink");
    }
    captured
}

#[cfg(unix)]
fn send_sigterm(child: &Child) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(e) = kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            debug!(error = %e, pid, "failed to send SIGTERM");
        }
    }
}

#[cfg(not(unix))]
fn send_sigterm(_child: &Child) {}

/// SIGTERM first, then a hard kill if the child ignores it.
async fn terminate(child: &mut Child) -> Result<ExitStatus, ExecError> {
    send_sigterm(child);

    match tokio::time::timeout(TERMINATE_GRACE, child.wait()).await {
        Ok(status) => status.map_err(ExecError::WaitError),
        Err(_) => {
            child.kill().await.map_err(ExecError::WaitError)?;
            child.wait().await.map_err(ExecError::WaitError)
        }
    }
}

/// `128 + signal` for signal-terminated children, otherwise the exit code.
fn exit_code(status: ExitStatus) -> i32 {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(INFRASTRUCTURE_FAILURE)
}

/// Split captured stdout into match paths.
///
/// A trailing `\r` is stripped from each line and blank lines are dropped.
pub fn split_matches(captured: &[u8]) -> Vec<PathBuf> {
    captured
        .split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(bytes_to_path)
        .collect()
}

#[cfg(unix)]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn bytes_to_path(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
