use anyhow::{Context, Result};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::audio::decode::{self, decode_audio};
use crate::audio::wav::write_wav;
use crate::denoise::{self, DenoiseParams};
use crate::encode::ffmpeg::{OutputKind, Transcoder};

const TEMP_PREFIX: &str = "_hush_";

/// Rejected before any work is done.
#[derive(Debug, Error, PartialEq)]
pub enum JobError {
    #[error("Please select an input file")]
    MissingInput,
    #[error("Please select an output file")]
    MissingOutput,
    #[error("Input file not found: {0}")]
    InputNotFound(PathBuf),
}

#[derive(Clone, Debug)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: OutputKind,
    pub params: DenoiseParams,
}

impl Job {
    pub fn validate(&self) -> Result<(), JobError> {
        if self.input.as_os_str().is_empty() {
            return Err(JobError::MissingInput);
        }
        if self.output.as_os_str().is_empty() {
            return Err(JobError::MissingOutput);
        }
        if !self.input.is_file() {
            return Err(JobError::InputNotFound(self.input.clone()));
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Summary {
    pub output: PathBuf,
    pub kind: OutputKind,
    pub samples: usize,
    pub sample_rate: u32,
}

/// Events sent from the worker. `Finished` or `Failed` is always the last one.
#[derive(Debug)]
pub enum Progress {
    Stage { percent: u8, label: &'static str },
    Finished(Summary),
    Failed(String),
}

/// Run `job` on a worker thread, reporting progress over the returned channel.
pub fn spawn(job: Job, transcoder: Transcoder) -> Result<(JoinHandle<()>, Receiver<Progress>)> {
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new()
        .name("hush-worker".into())
        .spawn(move || {
            let event = match run(&job, &transcoder, &tx) {
                Ok(summary) => {
                    send(&tx, 100, "Processing complete!");
                    Progress::Finished(summary)
                }
                Err(err) => {
                    log::error!("{:#}", err);
                    Progress::Failed(format!("{:#}", err))
                }
            };
            let _ = tx.send(event);
        })
        .context("Failed to start worker thread")?;
    Ok((handle, rx))
}

/// Execute `job` on the current thread.
///
/// Temporary WAV files live next to the input (for conversion) and next to
/// the output (for encoding) and are removed on every exit path.
pub fn run(job: &Job, transcoder: &Transcoder, tx: &Sender<Progress>) -> Result<Summary> {
    job.validate()?;
    send(tx, 0, "Processing...");

    // Keeps the converted input alive until decoding is done.
    let mut converted: Option<NamedTempFile> = None;
    if !decode::is_native(&job.input) {
        send(tx, 10, "Converting input file...");
        let temp = temp_wav(parent_dir(&job.input))?;
        transcoder
            .to_native(&job.input, temp.path())
            .context("Error converting input file")?;
        converted = Some(temp);
    }
    let source = converted.as_ref().map_or(job.input.as_path(), |t| t.path());

    send(tx, 20, "Loading audio file...");
    let audio = decode_audio(source)?;
    drop(converted);

    send(tx, 40, "Reducing noise...");
    let denoised = denoise::reduce_noise(&audio.samples, &job.params);

    send(tx, 80, "Converting to final format...");
    let mut staged = temp_wav(parent_dir(&job.output))?;
    write_wav(BufWriter::new(staged.as_file_mut()), &denoised, audio.sample_rate)?;

    if job.kind.is_passthrough() {
        staged
            .persist(&job.output)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to move output into {}", job.output.display()))?;
    } else {
        transcoder
            .encode(staged.path(), &job.output, job.kind)
            .context("Error converting output file")?;
    }

    log::info!("Done! Output: {}", job.output.display());
    Ok(Summary {
        output: job.output.clone(),
        kind: job.kind,
        samples: denoised.len(),
        sample_rate: audio.sample_rate,
    })
}

fn send(tx: &Sender<Progress>, percent: u8, label: &'static str) {
    log::info!("[{:>3}%] {}", percent, label);
    // A dropped receiver only means nobody is watching.
    let _ = tx.send(Progress::Stage { percent, label });
}

fn temp_wav(dir: &Path) -> Result<NamedTempFile> {
    tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".wav")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))
}

fn parent_dir(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Work out the output path and kind.
///
/// An explicit `format` wins, then the output path's extension, then
/// `fallback`. Without an output path the result is
/// `<input stem>_denoised.<ext>` beside the input. An output path whose
/// extension disagrees with the kind gets its extension replaced.
pub fn resolve_output(
    input: &Path,
    output: Option<&Path>,
    format: Option<OutputKind>,
    fallback: OutputKind,
) -> (PathBuf, OutputKind) {
    let kind = format
        .or_else(|| output.and_then(OutputKind::from_path))
        .unwrap_or(fallback);

    let path = match output {
        Some(path) if OutputKind::from_path(path) == Some(kind) => path.to_path_buf(),
        Some(path) => {
            let fixed = path.with_extension(kind.extension());
            log::warn!(
                "Output {} does not match format {}, writing {}",
                path.display(),
                kind,
                fixed.display()
            );
            fixed
        }
        None => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "denoised_audio".into());
            input.with_file_name(format!("{}_denoised.{}", stem, kind.extension()))
        }
    };

    (path, kind)
}
