//! GrayLab analyzes and geometrically transforms single-channel raster
//! images held as dense in-memory pixel grids.
//!
//! The crate provides inverse-mapped resampling (scale, rotate, affine),
//! Otsu thresholding, bounded-queue connected-component labeling, region
//! moments and best-region extraction, exhaustive SAD/NCC template
//! matching, and scalar k-means clustering. Image decoding/encoding and
//! argument parsing live outside: callers construct a [`Grid`] from
//! decoded samples and read it back for serialization.
//!
//! Optional features: `rayon` for row-parallel template scans and
//! `tracing` for span/event instrumentation of the expensive passes.

pub mod cluster;
pub mod grid;
pub mod morph;
pub mod region;
pub mod resample;
pub mod search;
pub mod threshold;
mod trace;
pub mod util;

pub use cluster::{kmeans, Feature};
pub use grid::{Grid, MinMax, Point, MAX_DIM};
pub use morph::{dilate, erode};
pub use region::props::{extract_best_region, region_props, ExtractOutcome, Props};
pub use region::{label_regions, DEFAULT_QUEUE_CAPACITY};
pub use resample::{affine, rotate, scale, AffineArgs};
pub use search::{find_nearest_region, find_similar_region, NccMatch, SadMatch};
#[cfg(feature = "rayon")]
pub use search::{find_nearest_region_par, find_similar_region_par};
pub use threshold::{adjust_contrast, binarize, find_min_max, find_threshold, ContrastOutcome};
pub use util::{GrayLabError, GrayLabResult};
