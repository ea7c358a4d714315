//! Connected-component labeling via bounded-queue flood fill.
//!
//! Input is a binarized grid whose foreground pixels equal `max_value`.
//! Labels are assigned in row-major discovery order starting at 1 and
//! written back into the grid samples; 0 stays background. The traversal
//! keeps an explicit per-pixel state in scratch instead of reusing "still
//! equals `max_value`" as the unvisited marker, so a label value can never
//! be confused with unvisited foreground mid-pass.

use std::collections::VecDeque;

use crate::grid::{Grid, Point};
use crate::trace::{trace_event, trace_span};
use crate::util::{GrayLabError, GrayLabResult};

pub mod props;

/// Default flood-fill queue capacity.
pub const DEFAULT_QUEUE_CAPACITY: usize = 65536;

/// Per-pixel traversal state: unvisited foreground pixels move to
/// `Labeled` the moment they are enqueued, which prevents duplicate
/// enqueues.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CellState {
    Background,
    Foreground,
    Labeled(u16),
}

/// Labels every 8-connected foreground region of a binarized grid in
/// place and returns the highest label assigned.
///
/// `queue_capacity` bounds the flood-fill FIFO and with it the worst-case
/// working memory per component; it is a runtime parameter precisely so
/// tests can drive the overflow path. Two distinct failures exist:
///
/// - [`GrayLabError::QueueOverflow`]: the queue would exceed its bound.
///   The current component is abandoned partway; pixels of it that were
///   already reached keep the failed label, and `completed_labels` is one
///   less than that label.
/// - [`GrayLabError::LabelSpaceExhausted`]: the next label would collide
///   with `max_value` (the foreground sentinel in the samples). The
///   component just finished is complete and counted in
///   `completed_labels`.
///
/// Either way the grid is left in its partially labeled state for the
/// caller to inspect, retry with a larger bound, or discard.
pub fn label_regions(grid: &mut Grid, queue_capacity: usize) -> GrayLabResult<u16> {
    let _span = trace_span!(
        "label_regions",
        width = grid.width(),
        height = grid.height(),
        queue_capacity = queue_capacity
    )
    .entered();

    let width = grid.width();
    let height = grid.height();
    let max_value = grid.max_value();

    let mut states: Vec<CellState> = grid
        .samples()
        .iter()
        .map(|&sample| {
            if sample == max_value {
                CellState::Foreground
            } else {
                CellState::Background
            }
        })
        .collect();

    let mut next_label: u16 = 1;
    for row in 0..height {
        for col in 0..width {
            if states[row * width + col] != CellState::Foreground {
                continue;
            }

            let label = next_label;
            if !fill_region(
                grid,
                &mut states,
                Point { row, col },
                label,
                queue_capacity,
            ) {
                trace_event!("label_queue_overflow", failed_label = label);
                return Err(GrayLabError::QueueOverflow {
                    completed_labels: label - 1,
                    capacity: queue_capacity,
                });
            }

            next_label += 1;
            if next_label >= max_value {
                trace_event!("label_space_exhausted", completed = label);
                return Err(GrayLabError::LabelSpaceExhausted {
                    completed_labels: label,
                    max_value,
                });
            }
        }
    }

    trace_event!("labels_assigned", count = next_label - 1);
    Ok(next_label - 1)
}

/// Flood-fills one component from `seed`, writing `label` into the grid
/// samples and the state array. Returns false when the bounded queue
/// would overflow.
fn fill_region(
    grid: &mut Grid,
    states: &mut [CellState],
    seed: Point,
    label: u16,
    queue_capacity: usize,
) -> bool {
    let width = grid.width();
    let height = grid.height();

    let mut queue: VecDeque<Point> = VecDeque::with_capacity(queue_capacity.min(1024));

    // Marking happens at enqueue time, not dequeue time.
    let mut enqueue = |queue: &mut VecDeque<Point>,
                       grid: &mut Grid,
                       states: &mut [CellState],
                       p: Point|
     -> bool {
        if queue.len() == queue_capacity {
            return false;
        }
        queue.push_back(p);
        states[p.row * width + p.col] = CellState::Labeled(label);
        grid.set(p.row, p.col, label);
        true
    };

    if !enqueue(&mut queue, grid, states, seed) {
        return false;
    }

    // Peek-expand-pop: the pixel being expanded stays in the queue while
    // its neighbors are enqueued, so the capacity bounds the full
    // traversal frontier. A capacity of 1 therefore overflows on any
    // component larger than one pixel.
    while let Some(p) = queue.front().copied() {
        // Every neighbor probe is bounds-guarded per axis; no wraparound.
        let row_lo = if p.row >= 1 { p.row - 1 } else { p.row };
        let row_hi = if p.row + 1 < height { p.row + 1 } else { p.row };
        let col_lo = if p.col >= 1 { p.col - 1 } else { p.col };
        let col_hi = if p.col + 1 < width { p.col + 1 } else { p.col };

        for row in row_lo..=row_hi {
            for col in col_lo..=col_hi {
                if (row, col) == (p.row, p.col) {
                    continue;
                }
                if states[row * width + col] == CellState::Foreground
                    && !enqueue(&mut queue, grid, states, Point { row, col })
                {
                    return false;
                }
            }
        }

        queue.pop_front();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::{label_regions, DEFAULT_QUEUE_CAPACITY};
    use crate::grid::Grid;
    use crate::threshold::binarize;
    use crate::util::GrayLabError;

    fn binary_grid(width: usize, height: usize, foreground: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::filled(width, height, 255, 0).unwrap();
        for &(row, col) in foreground {
            grid.set(row, col, 255);
        }
        grid
    }

    #[test]
    fn two_distant_pixels_get_scan_order_labels() {
        let mut grid = binary_grid(8, 8, &[(1, 1), (6, 6)]);
        let label_max = label_regions(&mut grid, DEFAULT_QUEUE_CAPACITY).unwrap();
        assert_eq!(label_max, 2);
        assert_eq!(grid.get(1, 1), 1);
        assert_eq!(grid.get(6, 6), 2);
    }

    #[test]
    fn diagonal_pixels_are_one_component() {
        let mut grid = binary_grid(4, 4, &[(0, 0), (1, 1), (2, 2)]);
        let label_max = label_regions(&mut grid, DEFAULT_QUEUE_CAPACITY).unwrap();
        assert_eq!(label_max, 1);
        assert_eq!(grid.get(2, 2), 1);
    }

    #[test]
    fn labeling_after_binarize_covers_a_block() {
        let mut grid = Grid::filled(5, 5, 255, 0).unwrap();
        for row in 1..4 {
            for col in 1..4 {
                grid.set(row, col, 200);
            }
        }
        binarize(&mut grid, 100);
        let label_max = label_regions(&mut grid, DEFAULT_QUEUE_CAPACITY).unwrap();
        assert_eq!(label_max, 1);
        let ones = grid.samples().iter().filter(|&&s| s == 1).count();
        assert_eq!(ones, 9);
    }

    #[test]
    fn queue_capacity_one_overflows_on_two_pixel_component() {
        let mut grid = binary_grid(4, 4, &[(1, 1), (1, 2)]);
        let err = label_regions(&mut grid, 1).unwrap_err();
        assert_eq!(
            err,
            GrayLabError::QueueOverflow {
                completed_labels: 0,
                capacity: 1,
            }
        );
        // The failed component keeps its (uncounted) label on the pixels
        // that were already reached.
        assert_eq!(grid.get(1, 1), 1);
    }

    #[test]
    fn overflow_reports_highest_completed_label() {
        // One single-pixel component completes, then a cross-shaped
        // component needs three frontier entries and overflows a
        // capacity-2 queue.
        let mut grid = binary_grid(
            8,
            8,
            &[(0, 0), (3, 4), (4, 3), (4, 4), (4, 5), (5, 4)],
        );
        let err = label_regions(&mut grid, 2).unwrap_err();
        assert_eq!(
            err,
            GrayLabError::QueueOverflow {
                completed_labels: 1,
                capacity: 2,
            }
        );
        assert_eq!(grid.get(0, 0), 1);
    }

    #[test]
    fn label_space_exhaustion_counts_the_finished_component() {
        // max_value 3: foreground sentinel is 3, so only labels 1 and 2
        // are representable. The third component exhausts the space right
        // after the second completes.
        let mut grid = Grid::filled(7, 1, 3, 0).unwrap();
        grid.set(0, 0, 3);
        grid.set(0, 2, 3);
        grid.set(0, 4, 3);
        let err = label_regions(&mut grid, DEFAULT_QUEUE_CAPACITY).unwrap_err();
        assert_eq!(
            err,
            GrayLabError::LabelSpaceExhausted {
                completed_labels: 2,
                max_value: 3,
            }
        );
        assert_eq!(grid.get(0, 0), 1);
        assert_eq!(grid.get(0, 2), 2);
        // The third component was never started.
        assert_eq!(grid.get(0, 4), 3);
    }

    #[test]
    fn labels_may_equal_values_below_max_without_confusion() {
        // A label value equal to an ordinary (non-sentinel) sample value
        // must not re-trigger labeling; the explicit state array makes
        // this impossible by construction.
        let mut grid = Grid::filled(6, 1, 255, 0).unwrap();
        grid.set(0, 0, 255);
        grid.set(0, 2, 255);
        grid.set(0, 4, 255);
        let label_max = label_regions(&mut grid, DEFAULT_QUEUE_CAPACITY).unwrap();
        assert_eq!(label_max, 3);
        assert_eq!(grid.samples(), &[1, 0, 2, 0, 3, 0]);
    }
}
