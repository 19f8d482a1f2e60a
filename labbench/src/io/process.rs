//! Child-process plumbing: spawn with piped stdin, bounded capture, timeout.

use std::io::{ErrorKind, Read, Write};
use std::process::{ChildStdin, Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Captured result of one child-process run.
#[derive(Debug)]
pub struct ScriptOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl ScriptOutput {
    /// Notice appended to displayed output when a stream was cut short.
    pub fn truncation_notice(dropped: usize) -> String {
        if dropped > 0 {
            format!("\n[output truncated, {dropped} bytes dropped]\n")
        } else {
            String::new()
        }
    }
}

/// Run `cmd` with `input` piped to stdin, capturing stdout/stderr.
///
/// Both streams are drained on reader threads while the child runs, so a
/// chatty script cannot deadlock on a full pipe. The payload is written on
/// its own thread: a script that never reads stdin would otherwise block the
/// caller once the payload exceeds the OS pipe buffer, and the timeout would
/// never start. At most `output_limit_bytes` of each stream is kept; the
/// rest is counted and discarded. If the child is still alive after
/// `timeout` it is killed and `timed_out` is set.
pub fn run_script(
    mut cmd: Command,
    input: &[u8],
    timeout: Duration,
    output_limit_bytes: usize,
) -> Result<ScriptOutput> {
    cmd.stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(timeout_secs = timeout.as_secs(), "spawning lab script");
    let mut child = cmd.spawn().context("spawn lab script")?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;
    let stdout_handle = thread::spawn(move || drain_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || drain_limited(stderr, output_limit_bytes));

    let child_stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("stdin was not piped"))?;
    let payload = input.to_vec();
    let stdin_handle = thread::spawn(move || feed_stdin(child_stdin, &payload));

    let mut timed_out = false;
    let status = match child.wait_timeout(timeout).context("wait for lab script")? {
        Some(status) => status,
        None => {
            warn!(timeout_secs = timeout.as_secs(), "lab script timed out, killing");
            timed_out = true;
            child.kill().context("kill lab script")?;
            child.wait().context("wait for lab script after kill")?
        }
    };

    let (stdout, stdout_truncated) = join_reader(stdout_handle).context("collect stdout")?;
    let (stderr, stderr_truncated) = join_reader(stderr_handle).context("collect stderr")?;
    // The child is gone by now, so a backed-up writer has unblocked with a
    // pipe error at worst.
    stdin_handle
        .join()
        .map_err(|_| anyhow!("stdin writer thread panicked"))??;
    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "script output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "lab script finished");
    Ok(ScriptOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

fn feed_stdin(mut stdin: ChildStdin, payload: &[u8]) -> Result<()> {
    match stdin.write_all(payload) {
        Ok(()) => Ok(()),
        // The script may exit (or crash) without draining stdin; its exit
        // status is the interesting outcome then, not the pipe error.
        Err(err) if err.kind() == ErrorKind::BrokenPipe => {
            debug!("lab script closed stdin before the payload was consumed");
            Ok(())
        }
        Err(err) => Err(err).context("write payload to stdin"),
    }
}

fn drain_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut kept = Vec::new();
    let mut dropped = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read script output")?;
        if n == 0 {
            break;
        }
        let room = limit.saturating_sub(kept.len());
        let take = n.min(room);
        kept.extend_from_slice(&chunk[..take]);
        dropped += n - take;
    }
    Ok((kept, dropped))
}

fn join_reader(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    handle
        .join()
        .map_err(|_| anyhow!("output reader thread panicked"))?
}
