use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tracing_subscriber::EnvFilter;

use ffpress::cli::{self, Cli, Commands};
use ffpress::config::Config;
use ffpress::engine::{
    EventBus, JobRunner, TerminalEvent, expand_inputs, ffmpeg_version, ffprobe_version,
    probe_frame_count,
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Some(Commands::CheckFfmpeg) => check_ffmpeg(&config),
        Some(Commands::Probe { file }) => probe_one(&config, &file),
        Some(Commands::InitConfig) => init_config(),
        None => run_batch(cli, &config),
    }
}

fn check_ffmpeg(config: &Config) -> Result<()> {
    println!("{}", ffmpeg_version(&config.tools.ffmpeg)?);
    println!("{}", ffprobe_version(&config.tools.ffprobe)?);
    Ok(())
}

fn probe_one(config: &Config, file: &Path) -> Result<()> {
    let bus = EventBus::new();
    let frames = probe_frame_count(&config.tools.ffprobe, file, &bus)
        .with_context(|| format!("failed to probe {}", file.display()))?;
    println!("{}: {frames} frames", file.display());
    Ok(())
}

fn init_config() -> Result<()> {
    let path = Config::config_path()?;
    if Config::exists() {
        println!("Config file already exists: {}", path.display());
    } else {
        Config::default().save()?;
        println!("Created default config: {}", path.display());
    }
    Ok(())
}

/// Run the batch on a worker thread while this thread's observers print the
/// event streams. Per-job failures never fail the process; only an invalid
/// submission does.
fn run_batch(cli: Cli, config: &Config) -> Result<()> {
    let inputs = expand_inputs(cli.inputs);
    let output_dir = cli
        .output_dir
        .context("an output directory is required (-o/--output-dir)")?;
    let crf = cli.crf.unwrap_or(config.defaults.crf);

    let bus = Arc::new(EventBus::new());
    let runner = JobRunner::new(inputs, &output_dir, crf, config.tool_paths(), Arc::clone(&bus))?;

    let log_rx = bus.subscribe_log();
    let progress_rx = bus.subscribe_progress();
    let terminal_rx = bus.subscribe_terminal();

    let worker = thread::spawn(move || runner.run());

    let log_printer = thread::spawn(move || {
        for line in log_rx {
            println!("{}", line.text);
        }
    });
    let progress_printer = thread::spawn(move || {
        for event in progress_rx {
            println!(
                "File {} - Current frame: {}/{} ({:.1}%)",
                event.job_index + 1,
                event.current_frame,
                event.total_frames,
                event.percent()
            );
        }
    });

    let summary = worker
        .join()
        .map_err(|_| anyhow!("worker thread panicked"))?;

    // The printers' channels disconnect once the last bus handle drops.
    drop(bus);
    log_printer
        .join()
        .map_err(|_| anyhow!("log printer panicked"))?;
    progress_printer
        .join()
        .map_err(|_| anyhow!("progress printer panicked"))?;

    println!("======================");
    for event in terminal_rx.try_iter() {
        match event {
            TerminalEvent::Completed(done) => println!(
                "[{}] ok: {} ({:.2}% smaller)",
                done.job_index + 1,
                done.output_path.display(),
                done.compression_percent
            ),
            TerminalEvent::Failed(failed) => {
                println!("[{}] failed: {}", failed.job_index + 1, failed.reason)
            }
        }
    }
    println!(
        "Processed {} of {} jobs successfully.",
        summary.succeeded, summary.total
    );

    Ok(())
}
