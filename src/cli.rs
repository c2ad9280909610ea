use clap::Parser;
use std::path::PathBuf;

use crate::denoise::mask::EdgeMode;
use crate::denoise::Strength;
use crate::encode::ffmpeg::OutputKind;

#[derive(Parser, Debug)]
#[command(name = "hush", about = "Remove steady background noise from audio recordings")]
pub struct Cli {
    /// Input audio file (WAV; MP3, OGG, FLAC, M4A are converted with ffmpeg).
    /// The first ~100ms should contain only background noise.
    pub input: Option<PathBuf>,

    /// Output file [default: <input>_denoised.<format> next to the input]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format. Inferred from the output extension when omitted
    #[arg(short, long, value_enum)]
    pub format: Option<OutputKind>,

    /// Noise reduction strength (0.1-6.0, higher removes more)
    #[arg(short, long, default_value_t = Strength::default())]
    pub strength: Strength,

    /// How mask smoothing treats the first/last frame and bin
    #[arg(long, value_enum, default_value_t = EdgeMode::Replicate)]
    pub edge_mode: EdgeMode,

    /// Transcoder executable used for non-WAV input and output
    #[arg(long, default_value = "ffmpeg")]
    pub ffmpeg: PathBuf,

    /// Config file [default: ./hush.toml, then ~/.config/hush/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
