use scene_core::DescriptorCollection;
use rayon::prelude::*;
use log::debug;
use crate::error::MatchResult;
use crate::configured_matcher::ConfiguredMatcher;
use crate::types::Detection;

/// Run independent `(reference, query)` detections in parallel.
///
/// Every pair gets its own exclusion mask; results come back in input order,
/// and a failing pair does not affect the others.
pub fn match_batch(
    matcher: &ConfiguredMatcher,
    pairs: &[(&DescriptorCollection, &DescriptorCollection)],
) -> Vec<MatchResult<Detection>> {
    debug!("batch matching {} pairs", pairs.len());
    pairs
        .par_iter()
        .map(|(reference, query)| matcher.detect(reference, query))
        .collect()
}
