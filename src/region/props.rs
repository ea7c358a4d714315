//! Per-region shape statistics and heuristic best-region extraction.

use crate::grid::Grid;
use crate::trace::{trace_event, trace_span};

/// Shape statistics for one labeled region.
///
/// Centroids and moments are reals; the central moments are relative to
/// the centroid. `angle_deg` is the principal-axis orientation, always in
/// `[0, 90]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Props {
    /// Pixel count of the region.
    pub area: usize,
    /// Centroid row.
    pub centroid_row: f64,
    /// Centroid column.
    pub centroid_col: f64,
    /// Second-order central moment over columns.
    pub m20: f64,
    /// Second-order central moment over rows.
    pub m02: f64,
    /// Mixed second-order central moment.
    pub m11: f64,
    /// Principal-axis orientation in degrees, in `[0, 90]`.
    pub angle_deg: f64,
}

/// Outcome of a best-region extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The winning label; all pixels outside it were zeroed.
    Extracted {
        /// Label of the winning region.
        label: u16,
    },
    /// No region qualified; the grid was left unchanged.
    NotFound,
}

/// Accumulates area, centroid and second-order central moments for every
/// label in `[0, label_max]` of a finished label map, in one full scan.
///
/// Index 0 holds the background; callers conventionally ignore it. Labels
/// with no pixels yield a zeroed entry.
pub fn region_props(grid: &Grid, label_max: u16) -> Vec<Props> {
    struct Acc {
        area: usize,
        sum_row: u64,
        sum_col: u64,
        m20: f64,
        m02: f64,
        m11: f64,
    }

    let mut accs: Vec<Acc> = (0..=label_max as usize)
        .map(|_| Acc {
            area: 0,
            sum_row: 0,
            sum_col: 0,
            m20: 0.0,
            m02: 0.0,
            m11: 0.0,
        })
        .collect();

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let label = grid.get(row, col);
            if label > label_max {
                continue;
            }
            let acc = &mut accs[label as usize];
            acc.area += 1;
            acc.sum_row += row as u64;
            acc.sum_col += col as u64;
            acc.m20 += (col * col) as f64;
            acc.m02 += (row * row) as f64;
            acc.m11 += row as f64 * col as f64;
        }
    }

    accs.into_iter()
        .map(|acc| {
            if acc.area == 0 {
                return Props::default();
            }
            let area = acc.area as f64;
            let cx = acc.sum_col as f64 / area;
            let cy = acc.sum_row as f64 / area;

            // Shift the raw moments to the centroid frame.
            let m20 = acc.m20 - area * cx * cx;
            let m02 = acc.m02 - area * cy * cy;
            let m11 = acc.m11 - area * cx * cy;

            let angle_deg = (0.5 * (2.0 * m11).atan2(m20 - m02)).abs().to_degrees();
            // |atan2| / 2 cannot exceed a right angle; tolerate only the
            // last-bit rounding of the degree conversion.
            assert!((0.0..=90.0 + 1e-9).contains(&angle_deg));
            let angle_deg = angle_deg.min(90.0);

            Props {
                area: acc.area,
                centroid_row: cy,
                centroid_col: cx,
                m20,
                m02,
                m11,
                angle_deg,
            }
        })
        .collect()
}

/// Picks the best-scoring region and zeroes everything else in `grid`.
///
/// Only labels whose area is at least 1% of the total image area qualify;
/// the score `area * (1 - (90 - angle) / 90)` rewards large regions whose
/// principal axis stands closest to upright. When nothing qualifies the
/// grid is returned unchanged and `NotFound` is reported — a non-fatal
/// outcome, not an error.
pub fn extract_best_region(
    grid: &mut Grid,
    label_map: &Grid,
    props: &[Props],
    label_max: u16,
) -> ExtractOutcome {
    debug_assert_eq!(grid.width(), label_map.width());
    debug_assert_eq!(grid.height(), label_map.height());

    let _span = trace_span!("extract_best_region", label_max = label_max).entered();

    let total_area = grid.width() * grid.height();
    let mut best_score = 0.0f64;
    let mut best_label: u16 = 0;
    for label in 1..=label_max {
        let p = &props[label as usize];
        assert!(p.angle_deg <= 90.0);

        if p.area < total_area / 100 {
            continue;
        }

        let uprightness = 1.0 - (90.0 - p.angle_deg) / 90.0;
        let score = p.area as f64 * uprightness;
        if score > best_score {
            best_score = score;
            best_label = label;
        }
    }

    if best_label == 0 {
        trace_event!("extract_no_region");
        return ExtractOutcome::NotFound;
    }

    for row in 0..grid.height() {
        for col in 0..grid.width() {
            if label_map.get(row, col) != best_label {
                grid.set(row, col, 0);
            }
        }
    }

    trace_event!("extract_done", label = best_label);
    ExtractOutcome::Extracted { label: best_label }
}
