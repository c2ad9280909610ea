//! Deterministic synthetic signals for the transform tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SAMPLE_RATE: f32 = 44100.0;

pub fn sine(len: usize, freq: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / SAMPLE_RATE).sin())
        .collect()
}

/// Seeded uniform white noise in `[-amplitude, amplitude]`.
pub fn noise(len: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen_range(-amplitude..=amplitude)).collect()
}

pub fn mix(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noise_is_seeded_and_bounded() {
        let a = noise(4096, 0.25, 17);
        assert_eq!(a, noise(4096, 0.25, 17));
        assert_ne!(a, noise(4096, 0.25, 18));
        assert!(a.iter().all(|s| (-0.25..=0.25).contains(s)));
        let mean = a.iter().sum::<f32>() / a.len() as f32;
        assert!(mean.abs() < 0.02, "mean {}", mean);
    }
}
