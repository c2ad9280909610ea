use clap::ValueEnum;
use serde::Deserialize;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Sample rate of the native intermediate produced from non-native inputs.
pub const NATIVE_SAMPLE_RATE: u32 = 44100;

const MP3_ARGS: &[&str] = &["-codec:a", "libmp3lame", "-q:a", "0"];
const OGG_ARGS: &[&str] = &["-codec:a", "libvorbis", "-q:a", "10"];
const FLAC_ARGS: &[&str] = &["-codec:a", "flac"];

/// Output containers the pipeline can produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Wav,
    Mp3,
    Ogg,
    Flac,
}

impl OutputKind {
    pub const ALL: [OutputKind; 4] = [Self::Wav, Self::Mp3, Self::Ogg, Self::Flac];

    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
        }
    }

    /// Encoder arguments placed between the input and output paths, or
    /// `None` when the native intermediate already is this kind.
    pub fn codec_args(self) -> Option<&'static [&'static str]> {
        match self {
            Self::Wav => None,
            Self::Mp3 => Some(MP3_ARGS),
            Self::Ogg => Some(OGG_ARGS),
            Self::Flac => Some(FLAC_ARGS),
        }
    }

    pub fn is_passthrough(self) -> bool {
        self.codec_args().is_none()
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("Failed to spawn {program}. Is ffmpeg installed?")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}:\n{stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("Failed to copy native audio: {0}")]
    Copy(#[source] std::io::Error),
}

/// Captured output of a successful transcoder run.
#[derive(Debug)]
pub struct TranscodeOutput {
    pub stdout: String,
    pub stderr: String,
}

/// External command-line transcoder (ffmpeg-compatible argument syntax).
#[derive(Clone, Debug)]
pub struct Transcoder {
    program: PathBuf,
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Transcoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the transcoder to completion. A non-zero exit is an error carrying
    /// the tool's stderr.
    pub fn run<I, S>(&self, args: I) -> Result<TranscodeOutput, TranscodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let program = self.program.display().to_string();
        log::debug!("Running {} {:?}", program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| TranscodeError::Spawn {
                program: program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(TranscodeError::Failed {
                program,
                status: output.status,
                stderr,
            });
        }

        Ok(TranscodeOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr,
        })
    }

    /// Convert any supported input into the native intermediate:
    /// 16-bit PCM WAV at [`NATIVE_SAMPLE_RATE`].
    pub fn to_native(&self, input: &Path, dest: &Path) -> Result<(), TranscodeError> {
        let rate = NATIVE_SAMPLE_RATE.to_string();
        let args: Vec<&OsStr> = vec![
            "-y".as_ref(),
            "-i".as_ref(),
            input.as_os_str(),
            "-acodec".as_ref(),
            "pcm_s16le".as_ref(),
            "-ar".as_ref(),
            rate.as_ref(),
            dest.as_os_str(),
        ];
        let output = self.run(args)?;
        log_output(&output);
        log::info!("Converted {} to native WAV", input.display());
        Ok(())
    }

    /// Encode the native intermediate `src` into `dest` as `kind`. Passthrough
    /// kinds are copied without running the transcoder.
    pub fn encode(&self, src: &Path, dest: &Path, kind: OutputKind) -> Result<(), TranscodeError> {
        let Some(codec) = kind.codec_args() else {
            std::fs::copy(src, dest).map_err(TranscodeError::Copy)?;
            log::info!("Copied {} as {}", dest.display(), kind);
            return Ok(());
        };

        let mut args: Vec<&OsStr> = vec!["-y".as_ref(), "-i".as_ref(), src.as_os_str()];
        args.extend(codec.iter().map(|a| OsStr::new(a)));
        args.push(dest.as_os_str());
        let output = self.run(args)?;
        log_output(&output);
        log::info!("Encoded {} as {}", dest.display(), kind);
        Ok(())
    }
}

fn log_output(output: &TranscodeOutput) {
    if !output.stdout.is_empty() {
        log::trace!("transcoder stdout:\n{}", output.stdout);
    }
    if let Some(last) = output.stderr.lines().last() {
        log::debug!("transcoder: {}", last);
    }
}
