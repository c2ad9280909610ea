//! Stationary-noise reduction by spectral masking.
//!
//! The noise spectrum is estimated once from the leading frames of the
//! signal and held fixed for the rest of it. Callers whose recordings do not
//! start with noise-only audio will see the wanted signal attenuated instead.

pub mod grid;
pub mod mask;
pub mod stft;
#[cfg(test)]
pub(crate) mod test_signal;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::audio::normalize_peak;
use grid::Grid;
use mask::EdgeMode;
use stft::{Spectrogram, Stft};

pub const WINDOW_LEN: usize = 2048;
pub const HOP_LEN: usize = WINDOW_LEN / 2;

pub const MIN_STRENGTH: f32 = 0.1;
pub const MAX_STRENGTH: f32 = 6.0;

#[derive(Debug, Error, PartialEq)]
pub enum StrengthError {
    #[error("strength must be a number, got '{0}'")]
    Unparsable(String),
    #[error("strength {0} is outside the range {min}..={max}", min = MIN_STRENGTH, max = MAX_STRENGTH)]
    OutOfRange(f32),
}

/// Noise-profile multiplier. Higher values subtract more and risk eating
/// into the wanted signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Strength(f32);

impl Strength {
    pub fn new(value: f32) -> Result<Self, StrengthError> {
        if (MIN_STRENGTH..=MAX_STRENGTH).contains(&value) {
            Ok(Self(value))
        } else {
            Err(StrengthError::OutOfRange(value))
        }
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

impl FromStr for Strength {
    type Err = StrengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f32 = s
            .trim()
            .parse()
            .map_err(|_| StrengthError::Unparsable(s.to_string()))?;
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DenoiseParams {
    pub strength: Strength,
    pub edge_mode: EdgeMode,
}

/// Reusable denoiser holding the planned FFTs. Holds no per-signal state, so
/// one instance can process any number of signals.
pub struct Denoiser {
    stft: Stft,
}

impl Default for Denoiser {
    fn default() -> Self {
        Self::new()
    }
}

impl Denoiser {
    pub fn new() -> Self {
        Self {
            stft: Stft::new(WINDOW_LEN, HOP_LEN),
        }
    }

    /// Denoise a mono signal in [-1, 1]. The result has the same length and
    /// is rescaled into [-1, 1] only if resynthesis pushed it past full scale.
    pub fn reduce_noise(&self, samples: &[f32], params: &DenoiseParams) -> Vec<f32> {
        if samples.is_empty() {
            return Vec::new();
        }

        let spectrum = self.stft.forward(samples);
        let magnitude = spectrum.map(|c| c.norm());
        let profile = mask::noise_profile(&magnitude);
        self.apply_profile(samples.len(), spectrum, &magnitude, &profile, params)
    }

    fn apply_profile(
        &self,
        len: usize,
        mut spectrum: Spectrogram,
        magnitude: &Grid<f32>,
        profile: &[f32],
        params: &DenoiseParams,
    ) -> Vec<f32> {
        let raw = mask::compute_mask(magnitude, profile, params.strength.get());
        let smoothed = mask::median_filter(&raw, params.edge_mode);

        log::debug!(
            "Mask: {} bins x {} frames, mean gain {:.3} (raw {:.3}), strength {}",
            smoothed.bins(),
            smoothed.frames(),
            mean(smoothed.values()),
            mean(raw.values()),
            params.strength
        );

        // Real gain on the complex value scales magnitude and keeps phase.
        spectrum.zip_with(&smoothed, |c, gain| c * gain);

        let mut output = self.stft.inverse(&spectrum);
        output.resize(len, 0.0);

        if let Some(peak) = normalize_peak(&mut output) {
            log::debug!("Output peak {:.3} rescaled to full scale", peak);
        }
        output
    }
}

/// Convenience wrapper for a single run.
pub fn reduce_noise(samples: &[f32], params: &DenoiseParams) -> Vec<f32> {
    Denoiser::new().reduce_noise(samples, params)
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f32>() / values.len() as f32
    }
}
