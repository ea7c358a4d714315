//! Inverse-mapped geometric transforms with bilinear interpolation.
//!
//! Every destination pixel is resolved by mapping back into source space
//! and interpolating over the 2x2 neighborhood around the integer base
//! coordinate. The edge policies differ on purpose: `scale` copies the
//! base pixel when it sits on the last row or column (a nearest fallback
//! exists), while `rotate` and `affine` write 0 there (no well-defined
//! nearest pixel under a general inverse map). Do not unify them.

use crate::grid::{Grid, MAX_DIM};
use crate::trace::{trace_event, trace_span};
use crate::util::{GrayLabError, GrayLabResult};

/// Affine map `(X, Y) = A * (x, y) + (c, f)` with `A = [[a, b], [d, e]]`.
///
/// Valid only when the linear part is invertible, i.e.
/// `det = a * e - b * d != 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineArgs {
    /// Row 1, column 1 of the linear part.
    pub a: f64,
    /// Row 1, column 2 of the linear part.
    pub b: f64,
    /// X translation.
    pub c: f64,
    /// Row 2, column 1 of the linear part.
    pub d: f64,
    /// Row 2, column 2 of the linear part.
    pub e: f64,
    /// Y translation.
    pub f: f64,
}

impl AffineArgs {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 0.0,
        e: 1.0,
        f: 0.0,
    };

    /// Determinant of the linear part.
    pub fn det(&self) -> f64 {
        self.a * self.e - self.b * self.d
    }
}

/// Splits a non-negative real coordinate into its integer base and
/// fractional offset.
#[inline]
fn split(coord: f64) -> (usize, f64) {
    let base = coord.trunc();
    (base as usize, coord - base)
}

/// Bilinear interpolation over the 2x2 neighborhood at `(row_base,
/// col_base)` with fractional weights `(row_dist, col_dist)`, truncated to
/// the sample type. The caller guarantees a full neighborhood exists.
#[inline]
fn bilinear(grid: &Grid, row_base: usize, col_base: usize, row_dist: f64, col_dist: f64) -> u16 {
    let p00 = grid.get(row_base, col_base) as f64;
    let p10 = grid.get(row_base + 1, col_base) as f64;
    let p01 = grid.get(row_base, col_base + 1) as f64;
    let p11 = grid.get(row_base + 1, col_base + 1) as f64;

    (p00 * (1.0 - row_dist) * (1.0 - col_dist)
        + p10 * row_dist * (1.0 - col_dist)
        + p01 * (1.0 - row_dist) * col_dist
        + p11 * row_dist * col_dist) as u16
}

/// Interpolates the source at real coordinate `(row, col)`, writing 0 when
/// the base pixel sits on the last row or column.
#[inline]
fn bilinear_or_zero(grid: &Grid, row: f64, col: f64) -> u16 {
    let (row_base, row_dist) = split(row);
    let (col_base, col_dist) = split(col);
    if row_base == grid.height() - 1 || col_base == grid.width() - 1 {
        0
    } else {
        bilinear(grid, row_base, col_base, row_dist, col_dist)
    }
}

/// Resamples `grid` to `round(factor * dimension)` per axis.
///
/// Fails before any allocation when a resulting dimension exceeds
/// [`MAX_DIM`] or rounds to zero (including non-positive factors). Where
/// the inverse-mapped base coordinate lies on the last source row or
/// column the base pixel is copied without interpolation.
pub fn scale(grid: &Grid, height_factor: f64, width_factor: f64) -> GrayLabResult<Grid> {
    let new_height = (height_factor * grid.height() as f64).round();
    let new_width = (width_factor * grid.width() as f64).round();

    if !new_height.is_finite()
        || !new_width.is_finite()
        || new_height > MAX_DIM as f64
        || new_width > MAX_DIM as f64
    {
        return Err(GrayLabError::DimensionTooLarge {
            width: if new_width.is_finite() {
                new_width.max(0.0) as usize
            } else {
                usize::MAX
            },
            height: if new_height.is_finite() {
                new_height.max(0.0) as usize
            } else {
                usize::MAX
            },
            limit: MAX_DIM,
        });
    }
    if new_height < 1.0 || new_width < 1.0 {
        return Err(GrayLabError::ZeroSizedResult {
            width: 0.0f64.max(new_width) as usize,
            height: 0.0f64.max(new_height) as usize,
        });
    }

    let new_height = new_height as usize;
    let new_width = new_width as usize;
    let _span = trace_span!(
        "scale",
        src_width = grid.width(),
        src_height = grid.height(),
        dst_width = new_width,
        dst_height = new_height
    )
    .entered();

    let mut out = grid.blank_with_shape(new_width, new_height);
    for row in 0..new_height {
        for col in 0..new_width {
            let (row_base, row_dist) = split(row as f64 / height_factor);
            let (col_base, col_dist) = split(col as f64 / width_factor);

            let value = if row_base == grid.height() - 1 || col_base == grid.width() - 1 {
                // Base pixel on the image edge: no neighbor to interpolate
                // with, copy it as-is.
                grid.get(row_base, col_base)
            } else {
                bilinear(grid, row_base, col_base, row_dist, col_dist)
            };
            out.set(row, col, value);
        }
    }

    Ok(out)
}

/// Rotates `grid` by `theta` radians about `(center_row, center_col)`,
/// keeping the input dimensions. Destination pixels whose inverse-mapped
/// source coordinate falls outside `[0, dim - 1]` on either axis are 0.
pub fn rotate(grid: &Grid, theta: f64, center_row: f64, center_col: f64) -> Grid {
    let _span = trace_span!("rotate", width = grid.width(), height = grid.height()).entered();

    let (sin_t, cos_t) = theta.sin_cos();
    let mut out = grid.blank_like();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            // Inverse rotation: where did this destination pixel come from?
            let dx = col as f64 - center_col;
            let dy = row as f64 - center_row;
            let src_col = cos_t * dx + sin_t * dy + center_col;
            let src_row = -sin_t * dx + cos_t * dy + center_row;

            if src_col >= 0.0
                && src_col <= (grid.width() - 1) as f64
                && src_row >= 0.0
                && src_row <= (grid.height() - 1) as f64
            {
                out.set(row, col, bilinear_or_zero(grid, src_row, src_col));
            }
        }
    }
    out
}

/// Applies the inverse of the affine map in `args` to every destination
/// pixel, with the same edge policy as [`rotate`]. Fails on a singular
/// matrix before touching the grid.
pub fn affine(grid: &Grid, args: AffineArgs) -> GrayLabResult<Grid> {
    let det = args.det();
    if det == 0.0 {
        return Err(GrayLabError::SingularMatrix { det });
    }

    let _span = trace_span!("affine", width = grid.width(), height = grid.height()).entered();

    let mut out = grid.blank_like();
    for row in 0..grid.height() {
        for col in 0..grid.width() {
            let dx = col as f64 - args.c;
            let dy = row as f64 - args.f;
            let src_col = (args.e * dx - args.b * dy) / det;
            let src_row = (-args.d * dx + args.a * dy) / det;

            if src_col >= 0.0
                && src_col <= (grid.width() - 1) as f64
                && src_row >= 0.0
                && src_row <= (grid.height() - 1) as f64
            {
                out.set(row, col, bilinear_or_zero(grid, src_row, src_col));
            }
        }
    }

    trace_event!("affine_done", det = det);
    Ok(out)
}
