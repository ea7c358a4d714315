//! Binary morphology: one-pass 4-connected erosion and dilation.
//!
//! Both operate on binarized grids (samples 0 or `max_value`). A pass
//! copies the grid into a second buffer, paints the 4-neighbors of every
//! source pixel holding the propagated value, then swaps the result back —
//! the source is never read and written in the same pass.

use crate::grid::Grid;

/// Paints the 4-neighbors of every pixel equal to `value` with `value`.
fn expand_region(grid: &mut Grid, value: u16) {
    let width = grid.width();
    let height = grid.height();
    let mut out = grid.clone();

    for row in 0..height {
        for col in 0..width {
            if grid.get(row, col) != value {
                continue;
            }
            if row > 0 {
                out.set(row - 1, col, value);
            }
            if row + 1 < height {
                out.set(row + 1, col, value);
            }
            if col > 0 {
                out.set(row, col - 1, value);
            }
            if col + 1 < width {
                out.set(row, col + 1, value);
            }
        }
    }

    *grid = out;
}

/// Erodes foreground by one pixel: background (0) grows into it.
pub fn erode(grid: &mut Grid) {
    expand_region(grid, 0);
}

/// Dilates foreground (`max_value`) by one pixel.
pub fn dilate(grid: &mut Grid) {
    let max_value = grid.max_value();
    expand_region(grid, max_value);
}
