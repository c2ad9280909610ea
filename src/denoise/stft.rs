use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::grid::Grid;

pub type Spectrogram = Grid<Complex<f32>>;

/// Overlap-added window energy below this is treated as uncovered.
const NOLA_FLOOR: f32 = 1e-10;

/// Short-time Fourier transform with a periodic Hann window.
///
/// The forward transform pads `window_len / 2` zeros on both sides of the
/// signal and then zero-extends the tail to a whole number of hops, so every
/// input sample is covered by two frames. The inverse is a weighted
/// overlap-add normalized by the summed squared window, with the boundary
/// padding trimmed off again.
pub struct Stft {
    window_len: usize,
    hop: usize,
    window: Vec<f32>,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
}

impl Stft {
    pub fn new(window_len: usize, hop: usize) -> Self {
        assert!(window_len >= 2 && window_len % 2 == 0, "window length must be even");
        assert!(hop > 0 && hop <= window_len, "hop must be within (0, window_len]");

        let mut planner = FftPlanner::<f32>::new();
        Self {
            window_len,
            hop,
            window: hann_window(window_len),
            forward: planner.plan_fft_forward(window_len),
            inverse: planner.plan_fft_inverse(window_len),
        }
    }

    /// Number of one-sided frequency bins per frame.
    pub fn bins(&self) -> usize {
        self.window_len / 2 + 1
    }

    /// Number of frames produced for a signal of `len` samples.
    pub fn frame_count(&self, len: usize) -> usize {
        let tail = (self.hop - len % self.hop) % self.hop;
        (len + tail) / self.hop + 1
    }

    pub fn forward(&self, samples: &[f32]) -> Spectrogram {
        let pad = self.window_len / 2;
        let bins = self.bins();
        let frames = self.frame_count(samples.len());
        let mut spectrum = Grid::filled(bins, frames, Complex::new(0.0, 0.0));
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.window_len];

        for frame in 0..frames {
            let start = frame * self.hop;
            for (i, slot) in buffer.iter_mut().enumerate() {
                let sample = (start + i)
                    .checked_sub(pad)
                    .and_then(|idx| samples.get(idx))
                    .copied()
                    .unwrap_or(0.0);
                *slot = Complex::new(sample * self.window[i], 0.0);
            }
            self.forward.process(&mut buffer);
            spectrum.frame_mut(frame).copy_from_slice(&buffer[..bins]);
        }

        spectrum
    }

    /// Reconstruct a time-domain signal. The result covers the padded frame
    /// span minus the boundary padding, so it is at least as long as the
    /// original signal and usually a little longer.
    pub fn inverse(&self, spectrum: &Spectrogram) -> Vec<f32> {
        assert_eq!(spectrum.bins(), self.bins(), "bin count does not match window");

        let n = self.window_len;
        let frames = spectrum.frames();
        if frames == 0 {
            return Vec::new();
        }

        let total = (frames - 1) * self.hop + n;
        let mut output = vec![0.0f32; total];
        let mut norm = vec![0.0f32; total];
        let mut buffer = vec![Complex::new(0.0f32, 0.0); n];
        let scale = 1.0 / n as f32;

        for frame in 0..frames {
            let half = spectrum.frame(frame);
            // Rebuild the Hermitian-symmetric full spectrum of a real frame.
            buffer[0] = Complex::new(half[0].re, 0.0);
            buffer[n / 2] = Complex::new(half[n / 2].re, 0.0);
            for k in 1..n / 2 {
                buffer[k] = half[k];
                buffer[n - k] = half[k].conj();
            }
            self.inverse.process(&mut buffer);

            let start = frame * self.hop;
            for (i, value) in buffer.iter().enumerate() {
                let w = self.window[i];
                output[start + i] += value.re * scale * w;
                norm[start + i] += w * w;
            }
        }

        for (sample, &energy) in output.iter_mut().zip(&norm) {
            if energy > NOLA_FLOOR {
                *sample /= energy;
            }
        }

        let pad = n / 2;
        output.truncate(total - pad);
        output.drain(..pad);
        output
    }
}

/// Periodic Hann window (DFT-even), which satisfies the overlap-add
/// constraint exactly at 50% overlap.
fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / size as f32).cos())
        })
        .collect()
}
