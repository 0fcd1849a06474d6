// Frame-count probing via ffprobe

use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

use super::bus::EventBus;

/// A probe failure. Recoverable: the caller marks the job failed and moves
/// on to the next one; nothing here should abort the batch.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run ffprobe: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("ffprobe exited with {0}")]
    NonZeroExit(std::process::ExitStatus),

    #[error("failed to parse ffprobe report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("no readable frame count in ffprobe report")]
    MissingFrameCount,
}

#[derive(Debug, Deserialize)]
struct FfprobeReport {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    nb_read_frames: Option<String>,
}

/// Count the readable frames of the first video stream by fully reading it.
///
/// Reading every frame can take seconds on large inputs, so a log line goes
/// out on the bus before the tool is invoked. A result of zero is possible
/// and is treated by the caller the same as an error.
pub fn probe_frame_count(ffprobe: &Path, input: &Path, bus: &EventBus) -> Result<u64, ProbeError> {
    bus.log(format!(
        "Getting total frames of the video {}...",
        input.display()
    ));

    let output = Command::new(ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-count_frames",
            "-show_entries",
            "stream=nb_read_frames",
            "-of",
            "json",
        ])
        .arg(input)
        .output()?;

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit(output.status));
    }

    let report = String::from_utf8_lossy(&output.stdout);
    debug!(input = %input.display(), report = %report.trim(), "ffprobe report");
    parse_frame_count(&report)
}

/// Parse the frame count out of an ffprobe JSON report.
fn parse_frame_count(json: &str) -> Result<u64, ProbeError> {
    let report: FfprobeReport = serde_json::from_str(json)?;
    report
        .streams
        .first()
        .and_then(|stream| stream.nb_read_frames.as_deref())
        .and_then(|frames| frames.parse().ok())
        .ok_or(ProbeError::MissingFrameCount)
}
