use crate::models::BitMatrix;

/// Maximal stretch of same-coloured pixels on one row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    /// Foreground (bar) run
    pub dark: bool,
    /// First pixel of the run
    pub start: usize,
    /// Length in pixels
    pub len: usize,
}

impl Run {
    /// One past the last pixel of the run
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Run-length encode row `y`, left to right
pub fn row_runs(matrix: &BitMatrix, y: usize) -> Vec<Run> {
    let width = matrix.width();
    let mut runs = Vec::new();
    if width == 0 || y >= matrix.height() {
        return runs;
    }

    let mut run_start = 0usize;
    let mut current = matrix.get(0, y);
    for x in 1..width {
        let color = matrix.get(x, y);
        if color != current {
            runs.push(Run {
                dark: current,
                start: run_start,
                len: x - run_start,
            });
            run_start = x;
            current = color;
        }
    }
    runs.push(Run {
        dark: current,
        start: run_start,
        len: width - run_start,
    });
    runs
}
