use anyhow::{Context, Result};
use std::io::{Seek, Write};

/// Sample format of the native intermediate handed to the transcoder.
pub fn native_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Quantize a [-1, 1] sample to 16-bit PCM.
pub fn to_pcm16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Write mono samples as a 16-bit PCM WAV stream.
pub fn write_wav<W: Write + Seek>(writer: W, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut wav = hound::WavWriter::new(writer, native_spec(sample_rate))
        .context("Failed to start WAV stream")?;
    for &sample in samples {
        wav.write_sample(to_pcm16(sample))
            .context("Failed to write WAV samples")?;
    }
    wav.finalize().context("Failed to finalize WAV stream")?;

    log::debug!("Wrote {} samples of 16-bit PCM at {}Hz", samples.len(), sample_rate);
    Ok(())
}
