/// Dense (frequency bin, time frame) matrix.
///
/// Storage is frame-major: all bins of frame 0, then all bins of frame 1, and
/// so on, which keeps each analysis frame contiguous for the FFT.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    bins: usize,
    frames: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn filled(bins: usize, frames: usize, value: T) -> Self {
        Self {
            bins,
            frames,
            data: vec![value; bins * frames],
        }
    }

    pub fn from_fn(bins: usize, frames: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(bins * frames);
        for frame in 0..frames {
            for bin in 0..bins {
                data.push(f(bin, frame));
            }
        }
        Self { bins, frames, data }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    #[inline]
    pub fn get(&self, bin: usize, frame: usize) -> T {
        self.data[frame * self.bins + bin]
    }

    pub fn frame(&self, frame: usize) -> &[T] {
        &self.data[frame * self.bins..(frame + 1) * self.bins]
    }

    pub fn frame_mut(&mut self, frame: usize) -> &mut [T] {
        &mut self.data[frame * self.bins..(frame + 1) * self.bins]
    }

    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Elementwise transform into a grid of the same shape.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            bins: self.bins,
            frames: self.frames,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Elementwise combination with another grid of the same shape.
    pub fn zip_with<U: Copy>(&mut self, other: &Grid<U>, f: impl Fn(T, U) -> T) {
        assert_eq!(
            (self.bins, self.frames),
            (other.bins, other.frames),
            "grid shapes differ"
        );
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = f(*a, b);
        }
    }
}
