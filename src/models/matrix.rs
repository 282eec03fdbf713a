/// Compact bit matrix for binarized images and sampled module grids
///
/// `true` is foreground (dark), `false` is background (light).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl BitMatrix {
    /// Create a new all-background matrix with given dimensions
    pub fn new(width: usize, height: usize) -> Self {
        let bytes_needed = (width * height).div_ceil(8);
        Self {
            width,
            height,
            data: vec![0; bytes_needed],
        }
    }

    /// Get matrix width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get matrix height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get bit at (x, y); out-of-range reads are background
    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let index = y * self.width + x;
        (self.data[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Signed lookup used by samplers that may probe past the border
    pub fn get_signed(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    /// Set bit at (x, y); out-of-range writes are ignored
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        let mask = 1 << (index % 8);
        if value {
            self.data[index / 8] |= mask;
        } else {
            self.data[index / 8] &= !mask;
        }
    }

    /// Toggle bit at (x, y)
    pub fn toggle(&mut self, x: usize, y: usize) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = y * self.width + x;
        self.data[index / 8] ^= 1 << (index % 8);
    }

    /// Swap rows and columns (mirror across the main diagonal)
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.height, self.width);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.set(y, x, true);
                }
            }
        }
        out
    }

    /// Number of foreground bits
    pub fn count_set(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }
}

impl Default for BitMatrix {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
