// Core job-running engine - independent of any front-end

pub mod bus;
pub mod encode;
pub mod ffmpeg_info;
pub mod probe;
pub mod runner;
pub mod scan;
pub mod types;

pub use bus::EventBus;
pub use encode::{EncodeError, EncodeSession, build_encode_cmd};
pub use ffmpeg_info::{ffmpeg_version, ffprobe_version};
pub use probe::{ProbeError, probe_frame_count};
pub use runner::{BatchSummary, JobRunner, derive_output_path};
pub use scan::{expand_inputs, is_video_file};
pub use types::{
    CompletionEvent, FailureEvent, FailureReason, FrameScanner, Job, JobStatus, LogLine,
    ProgressEvent, TerminalEvent, ToolPaths, clamp_crf,
};
