/// Mask application for QR data modules
use crate::decoder::function_mask::FunctionMask;
use crate::models::{BitMatrix, MaskPattern};

/// XOR every data module with `mask_pattern`
///
/// Function modules are left alone. Applying the same mask twice restores
/// the original grid, so this both masks and unmasks.
pub fn apply_mask(grid: &mut BitMatrix, mask_pattern: MaskPattern, func: &FunctionMask) {
    let size = grid.width().min(grid.height());

    for y in 0..size {
        for x in 0..size {
            if !func.is_function(x, y) && mask_pattern.is_masked(y, x) {
                grid.toggle(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_mask() {
        let mut grid = BitMatrix::new(21, 21);
        grid.set(10, 10, true);
        grid.set(10, 11, true);

        let func = FunctionMask::new(1);
        apply_mask(&mut grid, MaskPattern::Pattern0, &func);

        // Pattern0: (row + col) % 2 == 0
        assert!(!grid.get(10, 10));
        assert!(grid.get(10, 11));
        assert!(grid.get(11, 11));
        // Finder modules are function modules and stay untouched
        assert!(!grid.get(0, 0));
    }

    #[test]
    fn test_mask_is_involution() {
        let func = FunctionMask::new(2);
        let mut grid = BitMatrix::new(25, 25);
        for i in 0..25 {
            grid.set(i, (i * 7) % 25, true);
        }
        let original = grid.clone();
        apply_mask(&mut grid, MaskPattern::Pattern5, &func);
        assert_ne!(grid, original);
        apply_mask(&mut grid, MaskPattern::Pattern5, &func);
        assert_eq!(grid, original);
    }
}
