use scene_core::{Correspondence, DetectionVerdict};

/// Reduce a correspondence set to a verdict.
///
/// `found` iff at least `count_threshold` correspondences survived the ratio
/// test; no geometric consistency is checked. `total_count` is the size of
/// the reference collection.
pub fn decide(correspondences: &[Correspondence], total_count: usize, count_threshold: usize) -> DetectionVerdict {
    let matched_count = correspondences.len();
    DetectionVerdict {
        found: matched_count >= count_threshold,
        matched_count,
        total_count,
    }
}
