// Sequential batch orchestration: probe → encode → stats per job

use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::bus::EventBus;
use super::encode::EncodeSession;
use super::probe::probe_frame_count;
use super::types::{
    CompletionEvent, FailureEvent, FailureReason, Job, JobStatus, ProgressEvent, ToolPaths,
};
use crate::stats::{compression_percent, format_bytes};

/// Outcome of a whole batch: "processed N of M jobs successfully".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives an ordered list of jobs to completion, one at a time.
///
/// Each job walks `Pending → Probing → {Failed | Encoding} → {Succeeded |
/// Failed}`. A failed job emits exactly one [`FailureEvent`] and the batch
/// moves on; nothing a single job does can abort the batch. The runner is
/// meant to be moved onto a worker thread, with observers consuming bus
/// events rather than sharing state with it.
pub struct JobRunner {
    jobs: Vec<Job>,
    tools: ToolPaths,
    bus: Arc<EventBus>,
}

impl JobRunner {
    /// Build the batch. Rejects a malformed submission (empty input list,
    /// uncreatable output directory) synchronously, before any job starts.
    pub fn new(
        inputs: Vec<PathBuf>,
        output_dir: &Path,
        crf: i64,
        tools: ToolPaths,
        bus: Arc<EventBus>,
    ) -> Result<Self> {
        ensure!(!inputs.is_empty(), "no input files to compress");
        fs::create_dir_all(output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;

        let jobs = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let output = derive_output_path(&input, output_dir);
                Job::new(index, input, output, crf)
            })
            .collect();

        Ok(Self { jobs, tools, bus })
    }

    /// Run every job in submission order and report how many succeeded.
    pub fn run(mut self) -> BatchSummary {
        let mut jobs = std::mem::take(&mut self.jobs);
        let mut summary = BatchSummary {
            total: jobs.len(),
            ..Default::default()
        };

        for job in &mut jobs {
            if self.run_job(job) {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
        }

        summary
    }

    fn run_job(&self, job: &mut Job) -> bool {
        job.status = JobStatus::Probing;
        debug!(job = job.index, input = %job.input_path.display(), "probing");

        let total_frames = match self.probe_job(job) {
            Ok(frames) => frames,
            Err(detail) => {
                self.fail(
                    job,
                    FailureReason::ProbeUnavailable,
                    detail,
                    "Compression aborted",
                );
                return false;
            }
        };
        job.total_frames = total_frames;

        job.status = JobStatus::Encoding;
        self.bus.log(format!(
            "Starting compression for {} with CRF value: {}",
            job.input_path.display(),
            job.crf
        ));

        let session = EncodeSession::new(&self.tools.ffmpeg);
        let bus = &self.bus;
        let job_index = job.index;
        let result = session.run(&job.input_path, &job.output_path, job.crf, |current_frame| {
            bus.publish_progress(ProgressEvent {
                job_index,
                current_frame,
                total_frames,
            });
        });

        match result {
            Ok(status) if status.success() => {}
            Ok(status) => {
                self.fail(
                    job,
                    FailureReason::EncodeNonZeroExit,
                    format!("encoder exited with {status}"),
                    "Error: Compression failed",
                );
                return false;
            }
            Err(err) => {
                self.fail(
                    job,
                    FailureReason::EncodeNonZeroExit,
                    err.to_string(),
                    "Error: Compression failed",
                );
                return false;
            }
        }

        // The encoder exited zero, so the output file must exist; the input
        // was stat'ed pre-flight. A stat failure here still fails the job so
        // the one-terminal-event invariant holds.
        let sizes = fs::metadata(&job.input_path)
            .and_then(|original| fs::metadata(&job.output_path).map(|out| (original.len(), out.len())));
        let (original_size, compressed_size) = match sizes {
            Ok(sizes) if sizes.0 > 0 => sizes,
            Ok(_) | Err(_) => {
                self.fail(
                    job,
                    FailureReason::EncodeNonZeroExit,
                    "could not read input/output file sizes".to_string(),
                    "Error: Compression failed",
                );
                return false;
            }
        };

        let percent = compression_percent(original_size, compressed_size);
        job.status = JobStatus::Succeeded;

        self.bus
            .log(format!("File {} compressed successfully!", job.index + 1));
        self.bus
            .log(format!("Compressed file: {}", job.output_path.display()));
        self.bus
            .log(format!("Compressed size: {}", format_bytes(compressed_size)));
        self.bus.log(format!("Compression rate: {percent:.2}%"));

        self.bus.publish_completion(CompletionEvent {
            job_index: job.index,
            output_path: job.output_path.clone(),
            compressed_size_bytes: compressed_size,
            compression_percent: percent,
        });
        true
    }

    /// Pre-flight plus probe. A zero-byte input is rejected here so the
    /// stats division can never see a zero original size, and zero reported
    /// frames is folded into the same failure as an unusable probe.
    fn probe_job(&self, job: &Job) -> Result<u64, String> {
        let empty_input = fs::metadata(&job.input_path)
            .map(|metadata| metadata.len() == 0)
            .unwrap_or(false);
        if empty_input {
            return Err("input file is empty".to_string());
        }

        match probe_frame_count(&self.tools.ffprobe, &job.input_path, &self.bus) {
            Ok(0) => Err("probe reported zero frames".to_string()),
            Ok(frames) => Ok(frames),
            Err(err) => Err(err.to_string()),
        }
    }

    fn fail(&self, job: &mut Job, reason: FailureReason, detail: String, narration: &str) {
        warn!(job = job.index, input = %job.input_path.display(), %detail, "job failed");
        job.status = JobStatus::Failed;
        self.bus.log(format!(
            "{} for {}: {}",
            narration,
            job.input_path.display(),
            detail
        ));
        job.last_error = Some(detail);

        self.bus.publish_failure(FailureEvent {
            job_index: job.index,
            reason,
        });
    }
}

/// Derive the output path for an input: base name with the extension
/// stripped, a fixed `_compressed` suffix, and a literal `.mp4` container
/// extension regardless of the input's original container.
pub fn derive_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("output");
    output_dir.join(format!("{stem}_compressed.mp4"))
}
