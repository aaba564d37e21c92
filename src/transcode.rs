use std::process::{Child, Command, Stdio};

use log::{error, info};

use crate::cli::AudioParams;
use crate::process::{Drain, ProcessError};

const PROGRAM: &str = "ffmpeg";

/// A running ffmpeg process re-encoding the capture stream.
///
/// Stdin is wired to the capture tool's stdout pipe; stdout and stderr are
/// drained in the background so ffmpeg never blocks on a full pipe while
/// it still has input left to consume.
pub struct TranscodeHandle {
    program: String,
    child: Child,
    stdout: Drain,
    stderr: Drain,
    debug: bool,
}

impl TranscodeHandle {
    pub fn spawn(
        input: impl Into<Stdio>,
        params: &AudioParams,
        debug: bool,
    ) -> Result<Self, ProcessError> {
        let mut command = Command::new(PROGRAM);
        command
            .args(["-y", "-i", "pipe:0"])
            .args(["-ar", &params.sample_rate])
            .args(["-ab", &params.data_rate])
            .args(["-ac", &params.channels])
            .args(["-f", &params.output_format])
            .arg("-")
            .stdin(input.into());
        Self::spawn_command(command, debug)
    }

    pub(crate) fn spawn_command(mut command: Command, debug: bool) -> Result<Self, ProcessError> {
        let program = command.get_program().to_string_lossy().into_owned();
        let mut child = command
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                program: program.clone(),
                source,
            })?;
        let stdout = Drain::spawn(child.stdout.take().expect("stdout is piped"));
        let stderr = Drain::spawn(child.stderr.take().expect("stderr is piped"));
        Ok(TranscodeHandle {
            program,
            child,
            stdout,
            stderr,
            debug,
        })
    }

    /// Blocks until the transcoder has drained its input and flushed the
    /// complete result, then returns the transcoded bytes. A non-zero exit
    /// logs the accumulated stderr text and discards any partial output.
    pub fn wait(mut self) -> Result<Vec<u8>, ProcessError> {
        let status = self.child.wait()?;
        let output = self.stdout.join()?;
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
        Ok(output)
    }
}
