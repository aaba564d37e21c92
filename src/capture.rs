use std::process::{Child, ChildStdout, Command, Stdio};

use log::{error, info};

use crate::process::{Drain, ProcessError};

const PROGRAM: &str = "rtmpdump";

/// A running rtmpdump process capturing a live stream for a bounded
/// duration. Stdout carries the raw captured bytes; stderr is drained in
/// the background so verbose output cannot stall the capture.
#[derive(Debug)]
pub struct CaptureHandle {
    program: String,
    child: Child,
    stderr: Drain,
    debug: bool,
}

impl CaptureHandle {
    pub fn spawn(url: &str, duration_seconds: u64, debug: bool) -> Result<Self, ProcessError> {
        let mut command = Command::new(PROGRAM);
        command.args(["-v", "-r", url, "--stop", &duration_seconds.to_string()]);
        Self::spawn_command(command, debug)
    }

    pub(crate) fn spawn_command(mut command: Command, debug: bool) -> Result<Self, ProcessError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                program: program.clone(),
                source,
            })?;
        let stderr = Drain::spawn(child.stderr.take().expect("stderr is piped"));
        Ok(CaptureHandle {
            program,
            child,
            stderr,
            debug,
        })
    }

    /// Hands the raw output pipe to the consumer. Must be called before
    /// [`CaptureHandle::wait`] so something is reading the pipe while the
    /// capture tool is still writing to it.
    pub fn take_stdout(&mut self) -> ChildStdout {
        self.child.stdout.take().expect("stdout already taken")
    }

    /// Blocks until the capture tool exits. A non-zero exit logs the
    /// accumulated stderr text and is fatal to the run.
    pub fn wait(mut self) -> Result<(), ProcessError> {
        let status = self.child.wait()?;
        let diagnostics = String::from_utf8_lossy(&self.stderr.join()?).into_owned();
        if !status.success() {
            error!("{diagnostics}");
            return Err(ProcessError::ExitFailure {
                program: self.program,
                status,
            });
        }
        if self.debug {
            info!("{} logs:\n{diagnostics}", self.program);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    #[test]
    fn stdout_streams_captured_bytes() {
        let mut capture = CaptureHandle::spawn_command(sh("printf 'stream-bytes'"), false).unwrap();
        let mut raw = Vec::new();
        capture.take_stdout().read_to_end(&mut raw).unwrap();
        capture.wait().unwrap();
        assert_eq!(raw, b"stream-bytes");
    }

    #[test]
    fn nonzero_exit_is_surfaced_with_status() {
        let mut capture =
            CaptureHandle::spawn_command(sh("echo 'handshake failed' >&2; exit 7"), false).unwrap();
        let _raw = capture.take_stdout();
        let err = capture.wait().unwrap_err();
        match err {
            ProcessError::ExitFailure { program, status } => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(7));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_capture_binary_fails_to_spawn() {
        let err =
            CaptureHandle::spawn_command(Command::new("no-such-capture-tool-9914"), false)
                .unwrap_err();
        assert!(matches!(err, ProcessError::SpawnFailed { .. }));
    }
}
