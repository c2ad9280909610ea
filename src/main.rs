mod audio;
mod cli;
mod config;
mod denoise;
mod encode;
mod pipeline;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use denoise::mask::EdgeMode;
use denoise::{DenoiseParams, Strength};
use encode::ffmpeg::{OutputKind, Transcoder};
use pipeline::{Job, Progress};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Config values apply only where the CLI is still at its default
    let mut fallback_kind = OutputKind::default();
    if let Some(path) = config::find_config(cli.config.clone()) {
        if let Some(cfg) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            if cli.strength == Strength::default() {
                match Strength::new(cfg.denoise.strength) {
                    Ok(strength) => cli.strength = strength,
                    Err(err) => log::warn!("Ignoring config strength: {}", err),
                }
            }
            if cli.edge_mode == EdgeMode::default() {
                cli.edge_mode = cfg.denoise.edge_mode;
            }
            if cli.ffmpeg.as_os_str() == "ffmpeg" {
                cli.ffmpeg = cfg.transcoder.program;
            }
            if let Some(kind) = cfg.output.format {
                fallback_kind = kind;
            }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    let (output, kind) =
        pipeline::resolve_output(input, cli.output.as_deref(), cli.format, fallback_kind);

    log::info!("hush - spectral noise reduction");
    log::info!("Input: {}", input.display());
    log::info!("Output: {} ({})", output.display(), kind);
    log::info!("Strength: {}, mask edges: {:?}", cli.strength, cli.edge_mode);

    let job = Job {
        input: input.clone(),
        output,
        kind,
        params: DenoiseParams {
            strength: cli.strength,
            edge_mode: cli.edge_mode,
        },
    };

    let transcoder = Transcoder::new(&cli.ffmpeg);
    log::debug!("Transcoder: {}", transcoder.program().display());
    let (worker, events) = pipeline::spawn(job, transcoder)?;

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>3}% {msg}")?
            .progress_chars("=>-"),
    );

    let mut outcome = None;
    for event in events {
        match event {
            Progress::Stage { percent, label } => {
                pb.set_position(percent as u64);
                pb.set_message(label);
            }
            Progress::Finished(summary) => outcome = Some(Ok(summary)),
            Progress::Failed(message) => outcome = Some(Err(message)),
        }
    }

    if worker.join().is_err() {
        pb.abandon_with_message("Error: worker panicked");
        anyhow::bail!("Noise reduction worker panicked");
    }

    match outcome {
        Some(Ok(summary)) => {
            pb.finish_with_message("Processing complete!");
            log::info!(
                "Wrote {} samples at {}Hz to {} ({})",
                summary.samples,
                summary.sample_rate,
                summary.output.display(),
                summary.kind
            );
            Ok(())
        }
        Some(Err(message)) => {
            pb.abandon_with_message(format!("Error: {}", message));
            anyhow::bail!(message)
        }
        None => anyhow::bail!("Worker exited without reporting a result"),
    }
}
