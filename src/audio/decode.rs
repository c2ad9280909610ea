use anyhow::{Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::normalize_peak;

/// Extension of the container decoded without the transcoder.
pub const NATIVE_EXTENSION: &str = "wav";

pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioData {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            0.0
        } else {
            self.samples.len() as f32 / self.sample_rate as f32
        }
    }
}

/// Whether `path` can be decoded directly or must be transcoded first.
pub fn is_native(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(NATIVE_EXTENSION))
}

/// Decode a native file into mono samples in [-1, 1].
///
/// Multi-channel audio is averaged down to one channel. If the result still
/// exceeds full scale (float WAVs can), it is divided by its peak.
pub fn decode_audio(path: &Path) -> Result<AudioData> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("Failed to probe audio format")?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .context("No audio tracks found")?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track.codec_params.sample_rate.context("Unknown sample rate")?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Failed to create audio decoder")?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(err)) => {
                log::warn!("Skipping undecodable packet: {}", err);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        // Downmix to mono
        if channels == 1 {
            all_samples.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(channels) {
                let mono: f32 = frame_samples.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        }
    }

    if let Some(peak) = normalize_peak(&mut all_samples) {
        log::info!("Input peak {:.3} exceeds full scale, normalized", peak);
    }

    let audio = AudioData {
        samples: all_samples,
        sample_rate,
    };

    log::info!(
        "Decoded audio: {} samples, {}Hz, {} channel(s), {:.1}s",
        audio.samples.len(),
        sample_rate,
        channels,
        audio.duration_secs()
    );

    Ok(audio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_detection_ignores_case() {
        assert!(is_native(Path::new("take1.wav")));
        assert!(is_native(Path::new("/tmp/TAKE1.WAV")));
        assert!(!is_native(Path::new("take1.mp3")));
        assert!(!is_native(Path::new("wav")));
    }

    #[test]
    fn stereo_is_averaged_to_mono() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..1000 {
            writer.write_sample(16384i16).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 22050);
        assert_eq!(audio.samples.len(), 1000);
        assert!(audio.samples.iter().all(|&s| (s - 0.25).abs() < 1e-4));
    }

    #[test]
    fn hot_float_input_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hot.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0.5f32, -2.0, 1.0, 0.0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.samples, vec![0.25, -1.0, 0.5, 0.0]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = decode_audio(Path::new("/nonexistent/hush.wav")).err().unwrap();
        assert!(err.to_string().contains("Failed to open audio file"));
    }
}
