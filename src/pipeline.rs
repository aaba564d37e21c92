use log::info;

use crate::capture::CaptureHandle;
use crate::cli::Config;
use crate::process::ProcessError;
use crate::transcode::TranscodeHandle;

/// Runs the capture → transcode pipeline to completion and returns the
/// fully transcoded bytes.
///
/// Ordering is load-bearing: the transcoder must be spawned, and thus
/// reading the pipe, before the capture process is waited on. Otherwise
/// the capture tool blocks forever once the pipe buffer fills. Capture is
/// waited on first so a capture failure aborts the run before any
/// transcode output is consumed.
pub fn run(config: &Config) -> Result<Vec<u8>, ProcessError> {
    let mut capture = CaptureHandle::spawn(&config.rtmp_url, config.rtmp_duration, config.debug)?;
    let raw = capture.take_stdout();
    let transcode = TranscodeHandle::spawn(raw, &config.audio, config.debug)?;

    info!(
        "capturing {} for {}s",
        config.rtmp_url, config.rtmp_duration
    );
    capture.wait()?;

    info!("capture finished, waiting for transcode to flush");
    transcode.wait()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::{Command, Stdio};

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.args(["-c", script]);
        command
    }

    #[test]
    fn transcoder_consumes_the_capture_stream() {
        let mut capture = CaptureHandle::spawn_command(sh("printf 'raw audio'"), false).unwrap();
        let raw = capture.take_stdout();
        let mut consumer = sh("cat");
        consumer.stdin(Stdio::from(raw));
        let transcode = TranscodeHandle::spawn_command(consumer, false).unwrap();

        capture.wait().unwrap();
        assert_eq!(transcode.wait().unwrap(), b"raw audio");
    }

    #[test]
    fn capture_failure_aborts_before_transcode_output_is_read() {
        let mut capture = CaptureHandle::spawn_command(sh("exit 9"), false).unwrap();
        let raw = capture.take_stdout();
        let mut consumer = sh("cat");
        consumer.stdin(Stdio::from(raw));
        let transcode = TranscodeHandle::spawn_command(consumer, false).unwrap();

        let err = capture.wait().unwrap_err();
        assert!(matches!(err, ProcessError::ExitFailure { .. }));
        // Mirrors the coordinator: the transcode buffer is never read.
        drop(transcode);
    }

    #[test]
    fn transcode_failure_is_surfaced_after_a_clean_capture() {
        let mut capture = CaptureHandle::spawn_command(sh("printf 'raw'"), false).unwrap();
        let raw = capture.take_stdout();
        let mut consumer = sh("cat > /dev/null; exit 3");
        consumer.stdin(Stdio::from(raw));
        let transcode = TranscodeHandle::spawn_command(consumer, false).unwrap();

        capture.wait().unwrap();
        let err = transcode.wait().unwrap_err();
        assert!(matches!(err, ProcessError::ExitFailure { .. }));
    }
}
