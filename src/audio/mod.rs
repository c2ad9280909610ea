pub mod decode;
pub mod wav;

/// Rescale `samples` into [-1, 1] by their peak absolute value if any sample
/// lies outside that range. Returns the peak when a rescale happened.
pub fn normalize_peak(samples: &mut [f32]) -> Option<f32> {
    let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    if peak <= 1.0 {
        return None;
    }
    for sample in samples.iter_mut() {
        *sample /= peak;
    }
    Some(peak)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_in_range_signal_alone() {
        let mut samples = vec![0.5, -1.0, 0.25];
        assert_eq!(normalize_peak(&mut samples), None);
        assert_eq!(samples, vec![0.5, -1.0, 0.25]);
    }

    #[test]
    fn rescales_by_peak() {
        let mut samples = vec![1.0, -4.0, 2.0];
        assert_eq!(normalize_peak(&mut samples), Some(4.0));
        assert_eq!(samples, vec![0.25, -1.0, 0.5]);
    }
}
