use clap::ValueEnum;
use serde::Deserialize;

use super::grid::Grid;

/// Leading frames averaged into the noise profile (~100ms at 2048/1024).
pub const PROFILE_FRAMES: usize = 10;

/// How the median filter treats neighbors that fall outside the mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Out-of-range neighbors repeat the nearest edge element.
    #[default]
    Replicate,
    /// Out-of-range neighbors count as zero gain.
    Zero,
}

/// Mean magnitude per bin over the first [`PROFILE_FRAMES`] frames, or over
/// every frame when the signal is shorter than that.
pub fn noise_profile(magnitude: &Grid<f32>) -> Vec<f32> {
    let frames = magnitude.frames().min(PROFILE_FRAMES);
    let mut profile = vec![0.0f32; magnitude.bins()];
    if frames == 0 {
        return profile;
    }

    for frame in 0..frames {
        for (acc, &m) in profile.iter_mut().zip(magnitude.frame(frame)) {
            *acc += m;
        }
    }
    for value in &mut profile {
        *value /= frames as f32;
    }
    profile
}

/// Soft suppression gain per cell:
/// `(magnitude - profile * strength) / (magnitude + eps)`, clamped to [0, 1].
pub fn compute_mask(magnitude: &Grid<f32>, profile: &[f32], strength: f32) -> Grid<f32> {
    assert_eq!(profile.len(), magnitude.bins(), "profile length must match bin count");

    Grid::from_fn(magnitude.bins(), magnitude.frames(), |bin, frame| {
        let m = magnitude.get(bin, frame);
        ((m - profile[bin] * strength) / (m + f32::EPSILON)).clamp(0.0, 1.0)
    })
}

/// 3×3 median over (bin, frame) neighborhoods.
pub fn median_filter(mask: &Grid<f32>, edge: EdgeMode) -> Grid<f32> {
    let bins = mask.bins();
    let frames = mask.frames();

    Grid::from_fn(bins, frames, |bin, frame| {
        let mut window = [0.0f32; 9];
        let mut n = 0;
        for df in -1isize..=1 {
            for db in -1isize..=1 {
                window[n] = neighbor(mask, bin as isize + db, frame as isize + df, edge);
                n += 1;
            }
        }
        let (_, median, _) = window.select_nth_unstable_by(4, f32::total_cmp);
        *median
    })
}

fn neighbor(mask: &Grid<f32>, bin: isize, frame: isize, edge: EdgeMode) -> f32 {
    let bins = mask.bins() as isize;
    let frames = mask.frames() as isize;
    let inside = (0..bins).contains(&bin) && (0..frames).contains(&frame);
    match edge {
        _ if inside => mask.get(bin as usize, frame as usize),
        EdgeMode::Zero => 0.0,
        EdgeMode::Replicate => {
            mask.get(bin.clamp(0, bins - 1) as usize, frame.clamp(0, frames - 1) as usize)
        }
    }
}
