// Encoder process control and diagnostic-stream scanning

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;
use tracing::debug;

use super::types::{CRF_MAX, FrameScanner};

/// A failure to drive the encoder process itself (spawn, stream capture,
/// wait). Distinct from the encoder exiting non-zero, which is reported
/// through the returned [`ExitStatus`].
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to spawn ffmpeg: {0}")]
    Spawn(std::io::Error),

    #[error("failed to capture ffmpeg diagnostic stream")]
    MissingStderr,

    #[error("failed to wait for ffmpeg: {0}")]
    Wait(std::io::Error),
}

/// Runs the encoder for one job and scans its diagnostic stream for
/// `frame=<number>` progress markers.
pub struct EncodeSession {
    ffmpeg: PathBuf,
}

impl EncodeSession {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Encode `input` into `output`, invoking `on_frame` for every progress
    /// marker found in the encoder's diagnostic output, and return the
    /// process exit status.
    ///
    /// The diagnostic stream is read line-by-line for the whole process
    /// lifetime; the loop only ends at EOF, i.e. once the process has exited
    /// and every buffered line has been drained. stdout is discarded at the
    /// OS level so an unread pipe can never stall the child.
    pub fn run<F>(
        &self,
        input: &Path,
        output: &Path,
        crf: u32,
        mut on_frame: F,
    ) -> Result<ExitStatus, EncodeError>
    where
        F: FnMut(u64),
    {
        let mut cmd = build_encode_cmd(&self.ffmpeg, input, output, crf);
        debug!(
            input = %input.display(),
            output = %output.display(),
            crf,
            "spawning encoder"
        );

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EncodeError::Spawn)?;

        let stderr = child.stderr.take().ok_or(EncodeError::MissingStderr)?;
        let reader = BufReader::new(stderr);
        let mut scanner = FrameScanner::new();

        for line in reader.lines().map_while(Result::ok) {
            if let Some(frame) = scanner.scan_line(&line) {
                on_frame(frame);
            }
        }

        let status = child.wait().map_err(EncodeError::Wait)?;
        debug!(%status, "encoder exited");
        Ok(status)
    }
}

/// Build the fixed encode command: HEVC video at the given CRF with the
/// "slow" preset, audio copied verbatim, existing output overwritten.
pub fn build_encode_cmd(ffmpeg: &Path, input: &Path, output: &Path, crf: u32) -> Command {
    let crf = crf.min(CRF_MAX as u32);

    let mut cmd = Command::new(ffmpeg);
    cmd.arg("-i").arg(input);
    cmd.arg("-vcodec").arg("libx265");
    cmd.arg("-crf").arg(crf.to_string());
    cmd.arg("-preset").arg("slow");
    cmd.arg("-acodec").arg("copy");
    cmd.arg("-y");
    cmd.arg(output);
    cmd
}
