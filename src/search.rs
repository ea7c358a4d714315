//! Exhaustive template matching over every placement where the template
//! fits inside the target.
//!
//! Two independent metrics: sum of absolute differences with
//! branch-and-bound early exit, and normalized cross-correlation. Ties go
//! to the first placement in row-major order, and the feature-gated rayon
//! variants reproduce exactly that by merging per-row bests in row order.

use crate::grid::{Grid, Point};
use crate::trace::{trace_event, trace_span};
use crate::util::{GrayLabError, GrayLabResult};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Best placement under the sum-of-absolute-differences metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SadMatch {
    /// Top-left corner of the best placement.
    pub at: Point,
    /// Total absolute difference at that placement.
    pub distance: u64,
}

/// Best placement under normalized cross-correlation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NccMatch {
    /// Top-left corner of the best placement.
    pub at: Point,
    /// Correlation score at that placement, 1.0 for an exact match.
    pub score: f64,
}

fn check_fit(target: &Grid, template: &Grid) -> GrayLabResult<(usize, usize)> {
    if template.width() > target.width() || template.height() > target.height() {
        return Err(GrayLabError::TemplateTooLarge {
            tpl_width: template.width(),
            tpl_height: template.height(),
            img_width: target.width(),
            img_height: target.height(),
        });
    }
    Ok((
        target.height() - template.height(),
        target.width() - template.width(),
    ))
}

#[inline]
fn abs_diff(a: u16, b: u16) -> u64 {
    if a > b {
        (a - b) as u64
    } else {
        (b - a) as u64
    }
}

/// Evaluates the SAD at one placement, giving up the instant the running
/// sum reaches `bound`. Returns `None` when the placement was pruned.
#[inline]
fn sad_at(target: &Grid, template: &Grid, row: usize, col: usize, bound: u64) -> Option<u64> {
    let mut dist = 0u64;
    for tpl_row in 0..template.height() {
        let img_row = &target.row(row + tpl_row)[col..col + template.width()];
        let t_row = template.row(tpl_row);
        for (&img_px, &tpl_px) in img_row.iter().zip(t_row) {
            dist += abs_diff(img_px, tpl_px);
            // Branch-and-bound: once the partial sum is no better than the
            // best placement so far, the rest of this window cannot win.
            if dist >= bound {
                return None;
            }
        }
    }
    Some(dist)
}

/// Finds the placement minimizing the sum of absolute per-pixel
/// differences.
///
/// The early exit against the best distance so far is part of the
/// contract, not an optimization detail: it changes nothing about the
/// result but is what makes exhaustive search tractable on large targets.
pub fn find_nearest_region(target: &Grid, template: &Grid) -> GrayLabResult<SadMatch> {
    let (max_row, max_col) = check_fit(target, template)?;
    let _span = trace_span!(
        "find_nearest_region",
        placements = (max_row + 1) * (max_col + 1)
    )
    .entered();

    let mut best = SadMatch {
        at: Point::default(),
        distance: u64::MAX,
    };
    for row in 0..=max_row {
        for col in 0..=max_col {
            if let Some(dist) = sad_at(target, template, row, col, best.distance) {
                best = SadMatch {
                    at: Point { row, col },
                    distance: dist,
                };
            }
        }
    }

    trace_event!("nearest_found", distance = best.distance);
    Ok(best)
}

/// Sum of squared samples over an entire grid.
fn squared_sum(grid: &Grid) -> u64 {
    grid.samples()
        .iter()
        .map(|&px| px as u64 * px as u64)
        .sum()
}

/// Evaluates dot product and region squared sum at one placement; no
/// early exit, the normalization needs the full window.
#[inline]
fn ncc_at(target: &Grid, template: &Grid, row: usize, col: usize, tpl_sqsum: u64) -> f64 {
    let mut dot = 0u64;
    let mut region_sqsum = 0u64;
    for tpl_row in 0..template.height() {
        let img_row = &target.row(row + tpl_row)[col..col + template.width()];
        let t_row = template.row(tpl_row);
        for (&img_px, &tpl_px) in img_row.iter().zip(t_row) {
            dot += img_px as u64 * tpl_px as u64;
            region_sqsum += img_px as u64 * img_px as u64;
        }
    }
    dot as f64 / ((tpl_sqsum as f64).sqrt() * (region_sqsum as f64).sqrt())
}

/// Finds the placement maximizing normalized cross-correlation.
///
/// The template's squared sum is computed once up front. An all-zero
/// window yields a NaN score and is never selected, matching the
/// "similarity undefined there" reading of the metric.
pub fn find_similar_region(target: &Grid, template: &Grid) -> GrayLabResult<NccMatch> {
    let (max_row, max_col) = check_fit(target, template)?;
    let _span = trace_span!(
        "find_similar_region",
        placements = (max_row + 1) * (max_col + 1)
    )
    .entered();

    let tpl_sqsum = squared_sum(template);

    let mut best = NccMatch {
        at: Point::default(),
        score: 0.0,
    };
    for row in 0..=max_row {
        for col in 0..=max_col {
            let score = ncc_at(target, template, row, col, tpl_sqsum);
            if score > best.score {
                best = NccMatch {
                    at: Point { row, col },
                    score,
                };
            }
        }
    }

    trace_event!("similar_found", score = best.score);
    Ok(best)
}

/// Row-parallel [`find_nearest_region`].
///
/// Each worker owns a disjoint range of placement rows and prunes against
/// its local best; the per-row results are then merged sequentially in row
/// order, so ties resolve to the same placement as the sequential scan.
#[cfg(feature = "rayon")]
pub fn find_nearest_region_par(target: &Grid, template: &Grid) -> GrayLabResult<SadMatch> {
    let (max_row, max_col) = check_fit(target, template)?;

    let row_bests: Vec<SadMatch> = (0..=max_row)
        .into_par_iter()
        .map(|row| {
            let mut best = SadMatch {
                at: Point { row, col: 0 },
                distance: u64::MAX,
            };
            for col in 0..=max_col {
                if let Some(dist) = sad_at(target, template, row, col, best.distance) {
                    best = SadMatch {
                        at: Point { row, col },
                        distance: dist,
                    };
                }
            }
            best
        })
        .collect();

    let mut best = SadMatch {
        at: Point::default(),
        distance: u64::MAX,
    };
    for row_best in row_bests {
        if row_best.distance < best.distance {
            best = row_best;
        }
    }
    Ok(best)
}

/// Row-parallel [`find_similar_region`] with the same deterministic merge
/// as [`find_nearest_region_par`].
#[cfg(feature = "rayon")]
pub fn find_similar_region_par(target: &Grid, template: &Grid) -> GrayLabResult<NccMatch> {
    let (max_row, max_col) = check_fit(target, template)?;
    let tpl_sqsum = squared_sum(template);

    let row_bests: Vec<NccMatch> = (0..=max_row)
        .into_par_iter()
        .map(|row| {
            let mut best = NccMatch {
                at: Point { row, col: 0 },
                score: 0.0,
            };
            for col in 0..=max_col {
                let score = ncc_at(target, template, row, col, tpl_sqsum);
                if score > best.score {
                    best = NccMatch {
                        at: Point { row, col },
                        score,
                    };
                }
            }
            best
        })
        .collect();

    let mut best = NccMatch {
        at: Point::default(),
        score: 0.0,
    };
    for row_best in row_bests {
        if row_best.score > best.score {
            best = row_best;
        }
    }
    Ok(best)
}
