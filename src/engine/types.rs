use regex::Regex;
use std::fmt;
use std::path::PathBuf;

/// Lowest CRF the encoder accepts (best quality, largest file).
pub const CRF_MIN: i64 = 0;
/// Highest CRF the encoder accepts (worst quality, smallest file).
pub const CRF_MAX: i64 = 51;

/// Clamp a requested CRF into the encoder's accepted range.
/// Out-of-range values are clamped silently, not rejected.
pub fn clamp_crf(requested: i64) -> u32 {
    requested.clamp(CRF_MIN, CRF_MAX) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Probing,
    Encoding,
    Succeeded,
    Failed,
}

/// Why a job ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The prober could not be run, produced an unparseable report, or
    /// reported zero frames. Also covers zero-byte inputs rejected pre-flight.
    ProbeUnavailable,
    /// The encoder process did not exit with status zero.
    EncodeNonZeroExit,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ProbeUnavailable => write!(f, "probe unavailable"),
            FailureReason::EncodeNonZeroExit => write!(f, "encoder exited with an error"),
        }
    }
}

/// One input-file-to-output-file transcode request.
///
/// Owned and mutated only by the runner; observers see event snapshots,
/// never the job itself. Discarded once its terminal event is emitted.
#[derive(Debug, Clone)]
pub struct Job {
    pub index: usize,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub crf: u32,
    pub total_frames: u64,
    pub status: JobStatus,
    pub last_error: Option<String>,
}

impl Job {
    /// Create a new pending job. The requested CRF is clamped here so an
    /// out-of-range value can never reach the encoder command line.
    pub fn new(index: usize, input_path: PathBuf, output_path: PathBuf, crf: i64) -> Self {
        Self {
            index,
            input_path,
            output_path,
            crf: clamp_crf(crf),
            total_frames: 0,
            status: JobStatus::Pending,
            last_error: None,
        }
    }
}

/// Paths of the two external tools. Both default to PATH resolution.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

/// Emitted zero or more times per job while the encoder runs.
///
/// `current_frame` is non-decreasing within a job. It may overshoot
/// `total_frames` by a small margin (containers disagree on exact counts);
/// that is not an error, only [`ProgressEvent::percent`] clamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub job_index: usize,
    pub current_frame: u64,
    pub total_frames: u64,
}

impl ProgressEvent {
    /// Completion percentage for display, clamped to 100.
    pub fn percent(&self) -> f64 {
        if self.total_frames == 0 {
            return 0.0;
        }
        (self.current_frame as f64 / self.total_frames as f64 * 100.0).min(100.0)
    }
}

/// Emitted at most once per job, only on success.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionEvent {
    pub job_index: usize,
    pub output_path: PathBuf,
    pub compressed_size_bytes: u64,
    pub compression_percent: f64,
}

/// Emitted at most once per job, mutually exclusive with [`CompletionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEvent {
    pub job_index: usize,
    pub reason: FailureReason,
}

/// Free-form narration for a human observer. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub text: String,
}

/// The single terminal outcome of a job.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalEvent {
    Completed(CompletionEvent),
    Failed(FailureEvent),
}

impl TerminalEvent {
    pub fn job_index(&self) -> usize {
        match self {
            TerminalEvent::Completed(ev) => ev.job_index,
            TerminalEvent::Failed(ev) => ev.job_index,
        }
    }
}

/// Scanner for the encoder's diagnostic stream (`frame=<number>` markers).
///
/// ffmpeg repeats its stats line many times per second; frame numbers may
/// repeat, and a stale line may regress. Duplicates pass through, regressions
/// are dropped so emitted frames never decrease.
#[derive(Debug)]
pub struct FrameScanner {
    pattern: Regex,
    last_frame: u64,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"frame=\s*(\d+)").expect("frame pattern is valid"),
            last_frame: 0,
        }
    }

    /// Extract the frame number from one diagnostic line, if any.
    /// Non-matching lines return `None` and are not errors.
    pub fn scan_line(&mut self, line: &str) -> Option<u64> {
        let caps = self.pattern.captures(line)?;
        let frame = caps.get(1)?.as_str().parse::<u64>().ok()?;
        if frame < self.last_frame {
            return None;
        }
        self.last_frame = frame;
        Some(frame)
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}
