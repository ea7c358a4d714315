//! Scalar k-means clustering.
//!
//! Reusable by callers to group one-dimensional features such as region
//! areas or match positions. Seeding is deterministic (the first `k`
//! feature values), so a given input always produces the same clustering.

use crate::util::{GrayLabError, GrayLabResult};

/// A scalar feature together with its current cluster assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Feature {
    /// The feature value.
    pub value: u64,
    /// Index of the cluster this feature belongs to.
    pub cluster: usize,
}

impl Feature {
    /// Creates a feature assigned to cluster 0.
    pub fn new(value: u64) -> Self {
        Self { value, cluster: 0 }
    }
}

struct Cluster {
    centroid: u64,
    members: usize,
    sum: u64,
}

/// Clusters `features` into `k` groups by absolute distance to integer
/// centroids, rewriting each feature's `cluster` index, and returns the
/// final centroids.
///
/// Centroids are seeded from the first `k` feature values. Each iteration
/// assigns every feature to its nearest centroid (ties to the lowest
/// cluster index), recomputes centroids as `sum / count`, and stops once
/// no centroid moves. Every cluster keeps at least one member when the
/// seed values are distinct; an emptied cluster is a seeding pathology
/// (duplicate seeds) and is asserted rather than silently handled.
pub fn kmeans(features: &mut [Feature], k: usize) -> GrayLabResult<Vec<u64>> {
    if k == 0 || features.len() < k {
        return Err(GrayLabError::TooFewFeatures {
            needed: k.max(1),
            got: features.len(),
        });
    }

    for feature in features.iter_mut() {
        feature.cluster = 0;
    }

    let mut clusters: Vec<Cluster> = features[..k]
        .iter()
        .map(|feature| Cluster {
            centroid: feature.value,
            members: 0,
            sum: 0,
        })
        .collect();

    loop {
        for feature in features.iter_mut() {
            let mut min_dist = u64::MAX;
            for (idx, cluster) in clusters.iter().enumerate() {
                let dist = cluster.centroid.abs_diff(feature.value);
                if dist < min_dist {
                    min_dist = dist;
                    feature.cluster = idx;
                }
            }
            clusters[feature.cluster].members += 1;
            clusters[feature.cluster].sum += feature.value;
        }

        let mut finished = true;
        for cluster in &mut clusters {
            assert!(cluster.members != 0, "cluster emptied by duplicate seeds");

            let old_centroid = cluster.centroid;
            cluster.centroid = cluster.sum / cluster.members as u64;
            if cluster.centroid != old_centroid {
                finished = false;
            }

            cluster.members = 0;
            cluster.sum = 0;
        }

        if finished {
            return Ok(clusters.into_iter().map(|c| c.centroid).collect());
        }
    }
}
