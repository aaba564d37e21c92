use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("`{0}` command not found. Please ensure it is installed and in your PATH.")]
    CommandNotFound(String),
    #[error("Failed to run `{0}`: {1}")]
    CommandFailed(String, String),
    #[error("Failed to start `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` exited with {status}")]
    ExitFailure { program: String, status: ExitStatus },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Probe that an external binary can be launched at all. The probe's exit
/// status is irrelevant (rtmpdump exits non-zero on `--help`); only a
/// failure to start the process counts.
pub fn check_dependency(cmd: &str, probe_arg: &str) -> Result<(), ProcessError> {
    match Command::new(cmd)
        .arg(probe_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                Err(ProcessError::CommandNotFound(cmd.to_string()))
            } else {
                Err(ProcessError::CommandFailed(cmd.to_string(), e.to_string()))
            }
        }
    }
}

/// Reads a child pipe to EOF on its own thread.
///
/// rtmpdump under `-v` is chatty on stderr and ffmpeg writes the entire
/// transcoded stream to stdout. Leaving either pipe undrained while the
/// main thread waits on the other process stalls the whole pipeline once
/// the pipe buffer fills, so each pipe gets a dedicated reader.
#[derive(Debug)]
pub struct Drain {
    handle: thread::JoinHandle<io::Result<Vec<u8>>>,
}

impl Drain {
    pub fn spawn<R>(mut reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        let handle = thread::spawn(move || {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            Ok(buf)
        });
        Drain { handle }
    }

    /// Blocks until the pipe reaches EOF and returns everything read.
    pub fn join(self) -> io::Result<Vec<u8>> {
        self.handle
            .join()
            .map_err(|_| io::Error::other("pipe reader thread panicked"))?
    }
}
