//! Simple in-place pixel operations and sub-window extraction.

use crate::grid::{Grid, Point};
use crate::util::{GrayLabError, GrayLabResult};

impl Grid {
    /// Inverts brightness in place: `sample <- max_value - sample`.
    pub fn invert(&mut self) {
        let max_value = self.max_value();
        for sample in self.data_mut() {
            *sample = max_value - *sample;
        }
    }

    /// Draws the outline of the rectangle spanned by top-left `p1` and
    /// bottom-right `p2` with `max_value` pixels.
    ///
    /// Panics if `p2` is above or left of `p1` or either corner is out of
    /// bounds; callers hand in points that index this grid.
    pub fn mark_rect(&mut self, p1: Point, p2: Point) {
        assert!(p1.row <= p2.row && p1.col <= p2.col);
        assert!(p2.row < self.height() && p2.col < self.width());

        let max_value = self.max_value();
        for row in p1.row..=p2.row {
            self.set(row, p1.col, max_value);
            self.set(row, p2.col, max_value);
        }
        for col in p1.col..=p2.col {
            self.set(p1.row, col, max_value);
            self.set(p2.row, col, max_value);
        }
    }

    /// Outlines the placement of a `tpl_height x tpl_width` window whose
    /// top-left corner sits at `at`, clamping the bottom/right edge to the
    /// grid.
    pub fn mark_window(&mut self, tpl_height: usize, tpl_width: usize, at: Point) {
        let p2 = Point {
            row: (at.row + tpl_height).min(self.height() - 1),
            col: (at.col + tpl_width).min(self.width() - 1),
        };
        self.mark_rect(at, p2);
    }

    /// Copies a `height x width` sub-window with top-left corner `at` into
    /// a new grid.
    pub fn cutout(&self, at: Point, height: usize, width: usize) -> GrayLabResult<Grid> {
        Grid::checked_dims(width, height)?;
        if at.row + height > self.height() || at.col + width > self.width() {
            return Err(GrayLabError::WindowOutOfBounds {
                row: at.row,
                col: at.col,
                width,
                height,
                img_width: self.width(),
                img_height: self.height(),
            });
        }

        let mut out = self.blank_with_shape(width, height);
        for row in 0..height {
            for col in 0..width {
                out.set(row, col, self.get(at.row + row, at.col + col));
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::grid::{Grid, Point};
    use crate::util::GrayLabError;

    #[test]
    fn invert_reflects_about_max() {
        let mut grid = Grid::new(2, 2, 100, vec![0, 25, 75, 100]).unwrap();
        grid.invert();
        assert_eq!(grid.samples(), &[100, 75, 25, 0]);
    }

    #[test]
    fn mark_rect_outlines_without_filling() {
        let mut grid = Grid::filled(4, 4, 255, 0).unwrap();
        grid.mark_rect(Point { row: 0, col: 0 }, Point { row: 3, col: 3 });
        // Corners and edges are set, the interior is untouched.
        assert_eq!(grid.get(0, 0), 255);
        assert_eq!(grid.get(3, 3), 255);
        assert_eq!(grid.get(0, 2), 255);
        assert_eq!(grid.get(2, 0), 255);
        assert_eq!(grid.get(1, 1), 0);
        assert_eq!(grid.get(2, 2), 0);
    }

    #[test]
    fn mark_window_clamps_to_grid_edge() {
        let mut grid = Grid::filled(4, 4, 255, 0).unwrap();
        grid.mark_window(3, 3, Point { row: 2, col: 2 });
        assert_eq!(grid.get(3, 3), 255);
        assert_eq!(grid.get(2, 2), 255);
    }

    #[test]
    fn cutout_copies_the_window() {
        let grid = Grid::new(3, 3, 255, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        let sub = grid.cutout(Point { row: 1, col: 1 }, 2, 2).unwrap();
        assert_eq!(sub.samples(), &[5, 6, 8, 9]);
        assert_eq!(sub.max_value(), 255);
    }

    #[test]
    fn cutout_rejects_escaping_window() {
        let grid = Grid::filled(3, 3, 255, 0).unwrap();
        let err = grid.cutout(Point { row: 2, col: 0 }, 2, 2).unwrap_err();
        assert!(matches!(err, GrayLabError::WindowOutOfBounds { .. }));
    }
}
