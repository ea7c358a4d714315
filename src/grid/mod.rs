//! The pixel-grid data model.
//!
//! `Grid` owns a dense row-major buffer of `u16` samples together with the
//! declared maximum intensity and an opaque format tag. Grids are value
//! objects: shape-changing transforms produce a new grid, in-place filters
//! mutate samples without changing shape. All pixel accesses must be in
//! bounds; violating that is a programming error and panics rather than
//! returning a runtime error.

use crate::util::{GrayLabError, GrayLabResult};

pub mod ops;

/// Maximum width and height a grid may have, per axis.
pub const MAX_DIM: usize = 4096;

/// An (row, column) coordinate pair into a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    /// Row index (y).
    pub row: usize,
    /// Column index (x).
    pub col: usize,
}

/// Minimum and maximum sample values observed in a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MinMax {
    /// Smallest observed sample.
    pub min: u16,
    /// Largest observed sample.
    pub max: u16,
}

/// Owned single-channel raster image.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    max_value: u16,
    format: String,
    data: Vec<u16>,
}

impl Grid {
    /// Creates a grid from row-major samples, rejecting any sample above
    /// `max_value`.
    pub fn new(
        width: usize,
        height: usize,
        max_value: u16,
        samples: Vec<u16>,
    ) -> GrayLabResult<Self> {
        let grid = Self::from_raw(width, height, max_value, samples)?;
        for (idx, &sample) in grid.data.iter().enumerate() {
            if sample > max_value {
                return Err(GrayLabError::SampleExceedsMax {
                    sample,
                    row: idx / grid.width,
                    col: idx % grid.width,
                    max_value,
                });
            }
        }
        Ok(grid)
    }

    /// Creates a grid from row-major samples, clamping any sample above
    /// `max_value`. This is the lenient constructor variant for decoders
    /// that prefer clamping over rejection.
    pub fn new_clamped(
        width: usize,
        height: usize,
        max_value: u16,
        mut samples: Vec<u16>,
    ) -> GrayLabResult<Self> {
        for sample in &mut samples {
            if *sample > max_value {
                *sample = max_value;
            }
        }
        Self::from_raw(width, height, max_value, samples)
    }

    /// Creates a grid with every sample set to `value`.
    pub fn filled(width: usize, height: usize, max_value: u16, value: u16) -> GrayLabResult<Self> {
        let count = Self::checked_dims(width, height)?;
        Self::new(width, height, max_value, vec![value; count])
    }

    fn from_raw(
        width: usize,
        height: usize,
        max_value: u16,
        samples: Vec<u16>,
    ) -> GrayLabResult<Self> {
        let count = Self::checked_dims(width, height)?;
        if samples.len() != count {
            return Err(GrayLabError::BufferSizeMismatch {
                needed: count,
                got: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            max_value,
            format: String::from("P2"),
            data: samples,
        })
    }

    /// Validates dimensions against the zero and `MAX_DIM` bounds and
    /// returns the sample count. Runs before any allocation.
    pub(crate) fn checked_dims(width: usize, height: usize) -> GrayLabResult<usize> {
        if width == 0 || height == 0 {
            return Err(GrayLabError::InvalidDimensions { width, height });
        }
        if width > MAX_DIM || height > MAX_DIM {
            return Err(GrayLabError::DimensionTooLarge {
                width,
                height,
                limit: MAX_DIM,
            });
        }
        // MAX_DIM * MAX_DIM fits comfortably in usize.
        Ok(width * height)
    }

    /// Returns the grid width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the declared maximum sample value.
    pub fn max_value(&self) -> u16 {
        self.max_value
    }

    /// Returns the opaque format tag, forwarded unchanged to the encoder.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Replaces the opaque format tag.
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    /// Returns the row-major sample buffer for serialization.
    pub fn samples(&self) -> &[u16] {
        &self.data
    }

    /// Returns a contiguous slice for row `row`.
    pub fn row(&self, row: usize) -> &[u16] {
        debug_assert!(row < self.height);
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    /// Returns the sample at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u16 {
        debug_assert!(row < self.height && col < self.width);
        self.data[row * self.width + col]
    }

    /// Overwrites the sample at `(row, col)`. Panics when out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u16) {
        debug_assert!(row < self.height && col < self.width);
        self.data[row * self.width + col] = value;
    }

    /// Mutable access to the raw buffer for the in-place passes.
    pub(crate) fn data_mut(&mut self) -> &mut [u16] {
        &mut self.data
    }

    /// Builds an empty sibling grid with the same shape, max value and
    /// format tag, for transforms that compute into a second buffer.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            max_value: self.max_value,
            format: self.format.clone(),
            data: vec![0; self.width * self.height],
        }
    }

    /// Like `blank_like` with a different shape; dimensions must already
    /// have been validated.
    pub(crate) fn blank_with_shape(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            max_value: self.max_value,
            format: self.format.clone(),
            data: vec![0; width * height],
        }
    }
}
