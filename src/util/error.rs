//! Error types for graylab.

use thiserror::Error;

/// Result alias for graylab operations.
pub type GrayLabResult<T> = std::result::Result<T, GrayLabError>;

/// Errors that can occur when constructing grids or running algorithms.
///
/// Resource-exhaustion variants (`QueueOverflow`, `LabelSpaceExhausted`)
/// may leave the grid partially labeled; they carry the highest fully
/// completed label so the caller can decide whether to retry with a larger
/// bound or accept the partial result.
#[derive(Debug, Error, PartialEq)]
pub enum GrayLabError {
    /// Width or height is zero.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },
    /// A requested or resulting dimension exceeds the maximum bound.
    #[error("image too large: {width}x{height} exceeds limit {limit}")]
    DimensionTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Per-axis limit.
        limit: usize,
    },
    /// The sample buffer length disagrees with `width * height`.
    #[error("buffer size mismatch: needed {needed}, got {got}")]
    BufferSizeMismatch {
        /// Expected number of samples.
        needed: usize,
        /// Provided number of samples.
        got: usize,
    },
    /// A sample exceeds the declared maximum value.
    #[error("sample {sample} at ({row}, {col}) exceeds max value {max_value}")]
    SampleExceedsMax {
        /// Offending sample value.
        sample: u16,
        /// Row of the offending sample.
        row: usize,
        /// Column of the offending sample.
        col: usize,
        /// Declared maximum value.
        max_value: u16,
    },
    /// A transform would produce a zero-sized grid.
    #[error("resulting image would be zero-sized ({width}x{height})")]
    ZeroSizedResult {
        /// Resulting width.
        width: usize,
        /// Resulting height.
        height: usize,
    },
    /// The affine matrix is singular and cannot be inverted.
    #[error("affine matrix is singular (det = {det})")]
    SingularMatrix {
        /// Determinant of the linear part.
        det: f64,
    },
    /// The template does not fit inside the target on at least one axis.
    #[error("template {tpl_width}x{tpl_height} does not fit in target {img_width}x{img_height}")]
    TemplateTooLarge {
        /// Template width.
        tpl_width: usize,
        /// Template height.
        tpl_height: usize,
        /// Target width.
        img_width: usize,
        /// Target height.
        img_height: usize,
    },
    /// A requested sub-window leaves the grid.
    #[error("window {width}x{height} at ({row}, {col}) leaves the {img_width}x{img_height} grid")]
    WindowOutOfBounds {
        /// Top-left row of the window.
        row: usize,
        /// Top-left column of the window.
        col: usize,
        /// Window width.
        width: usize,
        /// Window height.
        height: usize,
        /// Grid width.
        img_width: usize,
        /// Grid height.
        img_height: usize,
    },
    /// The flood-fill queue hit its configured capacity.
    ///
    /// The component being traversed is aborted mid-fill; its pixels that
    /// were already reached keep the label `completed_labels + 1`, which is
    /// not counted as completed.
    #[error(
        "flood-fill queue overflowed (capacity {capacity}, {completed_labels} labels completed)"
    )]
    QueueOverflow {
        /// Highest fully completed label.
        completed_labels: u16,
        /// Configured queue capacity.
        capacity: usize,
    },
    /// The label counter reached the foreground sentinel value.
    ///
    /// Unlike `QueueOverflow`, the component that triggered this condition
    /// was labeled completely, so `completed_labels` includes it.
    #[error("label space exhausted at max value {max_value} ({completed_labels} labels completed)")]
    LabelSpaceExhausted {
        /// Highest fully completed label.
        completed_labels: u16,
        /// The grid's maximum sample value.
        max_value: u16,
    },
    /// Fewer features than requested clusters.
    #[error("k-means needs at least {needed} features, got {got}")]
    TooFewFeatures {
        /// Requested cluster count.
        needed: usize,
        /// Provided feature count.
        got: usize,
    },
}
