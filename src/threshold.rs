//! Dynamic-range analysis, contrast stretching and Otsu binarization.

use crate::grid::{Grid, MinMax};
use crate::trace::{trace_event, trace_span};

/// Outcome of a contrast adjustment. The no-op cases are informational,
/// not errors: the grid is simply left unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContrastOutcome {
    /// The linear stretch was applied.
    Stretched,
    /// All samples share one value; stretching would divide by zero.
    Flat,
    /// The observed range already spans `[0, max_value]`.
    FullRange,
}

/// Scans the whole grid once and returns the observed sample extremes.
pub fn find_min_max(grid: &Grid) -> MinMax {
    let mut mm = MinMax {
        min: grid.max_value(),
        max: 0,
    };
    for &sample in grid.samples() {
        if sample < mm.min {
            mm.min = sample;
        }
        if sample > mm.max {
            mm.max = sample;
        }
    }
    mm
}

/// Linearly stretches samples so `mm.min` maps to 0 and `mm.max` to
/// `max_value`: `new = max_value * (old - min) / (max - min)`.
pub fn adjust_contrast(grid: &mut Grid, mm: MinMax) -> ContrastOutcome {
    if mm.max == mm.min {
        return ContrastOutcome::Flat;
    }
    if mm.min == 0 && mm.max == grid.max_value() {
        return ContrastOutcome::FullRange;
    }

    let max_value = grid.max_value() as u32;
    let min = mm.min as u32;
    let diff = (mm.max - mm.min) as u32;
    for sample in grid.data_mut() {
        *sample = (max_value * (*sample as u32 - min) / diff) as u16;
    }
    ContrastOutcome::Stretched
}

/// Finds the binarization threshold maximizing between-class variance
/// (Otsu's method).
///
/// The cumulative foreground fraction `omega` and weighted-mean
/// contribution `mu` are built with running sums, one O(max_value) pass
/// rather than an O(max_value^2) re-summation per candidate. Floating
/// accumulation introduces error relative to an exact integer derivation;
/// at the supported ranges (max_value <= 16 bit) it is far below the
/// decision margin.
pub fn find_threshold(grid: &Grid) -> u16 {
    let _span = trace_span!("find_threshold", max_value = grid.max_value()).entered();

    let max = grid.max_value() as usize;
    let total = grid.samples().len() as f64;

    let mut histogram = vec![0usize; max + 1];
    for &sample in grid.samples() {
        histogram[sample as usize] += 1;
    }

    let mut omega = vec![0.0f64; max + 1];
    let mut mu = vec![0.0f64; max + 1];
    omega[0] = histogram[0] as f64 / total;
    mu[0] = 0.0;
    for value in 1..=max {
        omega[value] = omega[value - 1] + histogram[value] as f64 / total;
        mu[value] = mu[value - 1] + (value * histogram[value]) as f64 / total;
    }

    let mu_last = mu[max];
    let mut best_var = 0.0f64;
    let mut best = grid.max_value();
    for candidate in 0..=max {
        // Empty low class: not a valid split (and a zero denominator).
        if omega[candidate] == 0.0 {
            continue;
        }
        // Empty high class: no further candidate can change anything.
        if omega[candidate] == 1.0 {
            break;
        }

        let spread = mu_last * omega[candidate] - mu[candidate];
        let var = spread * spread / (omega[candidate] * (1.0 - omega[candidate]));
        if var > best_var {
            best_var = var;
            best = candidate as u16;
        }
    }

    trace_event!("threshold_found", threshold = best);
    best
}

/// Binarizes in place: samples strictly above `threshold` become
/// `max_value`, the rest 0.
pub fn binarize(grid: &mut Grid, threshold: u16) {
    let max_value = grid.max_value();
    for sample in grid.data_mut() {
        *sample = if *sample > threshold { max_value } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::{adjust_contrast, binarize, find_min_max, find_threshold, ContrastOutcome};
    use crate::grid::{Grid, MinMax};

    #[test]
    fn min_max_finds_extremes() {
        let grid = Grid::new(3, 2, 255, vec![12, 7, 200, 45, 7, 199]).unwrap();
        assert_eq!(find_min_max(&grid), MinMax { min: 7, max: 200 });
    }

    #[test]
    fn contrast_stretch_maps_extremes_to_full_range() {
        let mut grid = Grid::new(3, 1, 255, vec![50, 100, 150]).unwrap();
        let mm = find_min_max(&grid);
        assert_eq!(adjust_contrast(&mut grid, mm), ContrastOutcome::Stretched);
        assert_eq!(grid.samples(), &[0, 127, 255]);
    }

    #[test]
    fn contrast_no_ops_are_reported() {
        let mut flat = Grid::filled(2, 2, 255, 42).unwrap();
        let mm = find_min_max(&flat);
        assert_eq!(adjust_contrast(&mut flat, mm), ContrastOutcome::Flat);
        assert_eq!(flat.samples(), &[42; 4]);

        let mut full = Grid::new(2, 1, 255, vec![0, 255]).unwrap();
        let mm = find_min_max(&full);
        assert_eq!(adjust_contrast(&mut full, mm), ContrastOutcome::FullRange);
        assert_eq!(full.samples(), &[0, 255]);
    }

    #[test]
    fn otsu_splits_a_bimodal_image() {
        // Two tight clusters around 40 and 200.
        let mut samples = vec![38, 40, 42, 41, 39, 40];
        samples.extend([198, 200, 202, 201, 199, 200]);
        let grid = Grid::new(6, 2, 255, samples).unwrap();
        let threshold = find_threshold(&grid);
        assert!((42..198).contains(&threshold), "threshold = {threshold}");
    }

    #[test]
    fn otsu_on_flat_image_defaults_to_max() {
        let grid = Grid::filled(4, 4, 255, 9).unwrap();
        // omega jumps straight to 1.0 at value 9, so no candidate improves
        // on the default.
        assert_eq!(find_threshold(&grid), 255);
    }

    #[test]
    fn binarize_is_strictly_greater_than() {
        let mut grid = Grid::new(4, 1, 255, vec![9, 10, 11, 255]).unwrap();
        binarize(&mut grid, 10);
        assert_eq!(grid.samples(), &[0, 0, 255, 255]);
    }
}
