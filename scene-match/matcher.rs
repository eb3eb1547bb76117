use scene_core::{euclidean_distance, Correspondence, CorrespondenceSet, DescriptorCollection};
use log::{debug, trace};
use crate::error::{MatchError, MatchResult};
use crate::types::{ExclusionPolicy, NeighborPair};

/// Exhaustive nearest-neighbour matcher with a ratio test and greedy
/// one-to-one exclusion.
///
/// Each reference feature is visited once, in collection order, and yields at
/// most one correspondence. A query feature withdrawn by the exclusion policy
/// is skipped by every later reference feature of the same call.
#[derive(Debug, Clone)]
pub struct DescriptorMatcher {
    ratio_threshold: f32,
    exclusion: ExclusionPolicy,
}

impl DescriptorMatcher {
    /// Creates a matcher, rejecting ratios outside (0, 1]
    pub fn new(ratio_threshold: f32, exclusion: ExclusionPolicy) -> MatchResult<Self> {
        validate_ratio(ratio_threshold)?;
        Ok(Self { ratio_threshold, exclusion })
    }

    /// Find correspondences from `reference` into `query`.
    ///
    /// Empty input on either side yields an empty set. Differing descriptor
    /// dimensionality fails before any distance is computed.
    pub fn match_collections(
        &self,
        reference: &DescriptorCollection,
        query: &DescriptorCollection,
    ) -> MatchResult<CorrespondenceSet> {
        let (ref_dim, query_dim) = match (reference.dimension(), query.dimension()) {
            (Some(r), Some(q)) => (r, q),
            _ => {
                debug!("empty collection ({} x {}), no correspondences", reference.len(), query.len());
                return Ok(CorrespondenceSet::new());
            }
        };
        if ref_dim != query_dim {
            return Err(MatchError::DimensionMismatch { reference: ref_dim, query: query_dim });
        }

        let query_descriptors = query.descriptors();
        let mut excluded = vec![false; query.len()];
        let mut matches = CorrespondenceSet::with_capacity(reference.len().min(query.len()));

        for (i, (feature, descriptor)) in reference.iter().enumerate() {
            let mut neighbors = NeighborPair::new();

            for (j, candidate) in query_descriptors.iter().enumerate() {
                if excluded[j] {
                    continue;
                }
                neighbors.offer(j, euclidean_distance(descriptor, candidate));
            }

            let Some(winner) = neighbors.accepted(self.ratio_threshold) else {
                continue;
            };

            let query_feature = query.features()[winner];
            trace!("reference {} -> query {} ({:?})", i, winner, neighbors.nearest);
            matches.push(Correspondence { reference: *feature, query: query_feature });

            let withdrawn = match self.exclusion {
                ExclusionPolicy::Winner => winner,
                ExclusionPolicy::LastVisited => query.len() - 1,
            };
            excluded[withdrawn] = true;
        }

        debug!(
            "matched {}/{} reference features against {} query features (ratio {}, {:?})",
            matches.len(),
            reference.len(),
            query.len(),
            self.ratio_threshold,
            self.exclusion
        );

        Ok(matches)
    }

    pub fn ratio_threshold(&self) -> f32 {
        self.ratio_threshold
    }

    pub fn exclusion(&self) -> ExclusionPolicy {
        self.exclusion
    }
}

pub(crate) fn validate_ratio(ratio_threshold: f32) -> MatchResult<()> {
    // NaN fails both comparisons
    if ratio_threshold > 0.0 && ratio_threshold <= 1.0 {
        Ok(())
    } else {
        Err(MatchError::InvalidRatio(ratio_threshold))
    }
}

/// Match with the default `Winner` exclusion policy
pub fn match_descriptors(
    reference: &DescriptorCollection,
    query: &DescriptorCollection,
    ratio_threshold: f32,
) -> MatchResult<CorrespondenceSet> {
    DescriptorMatcher::new(ratio_threshold, ExclusionPolicy::Winner)?.match_collections(reference, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_core::Feature;

    fn collection(points: &[[f32; 2]]) -> DescriptorCollection {
        let features = points.iter().map(|p| Feature::new(p[0], p[1])).collect();
        let descriptors = points.iter().map(|p| p.to_vec()).collect();
        DescriptorCollection::new(features, descriptors).unwrap()
    }

    #[test]
    fn test_exact_matches_with_distractor() {
        let reference = collection(&[[0.0, 0.0], [10.0, 10.0], [20.0, 20.0]]);
        let query = collection(&[[0.0, 0.0], [10.0, 10.0], [20.0, 20.0], [5.0, 5.0]]);

        let matches = match_descriptors(&reference, &query, 0.6).unwrap();
        assert_eq!(matches.len(), 3);
        for m in &matches {
            assert_eq!(m.reference, m.query);
        }
    }

    #[test]
    fn test_equidistant_candidates_rejected() {
        let reference = collection(&[[0.0, 0.0]]);
        let query = collection(&[[1.0, 0.0], [0.0, 1.0]]);

        let matches = match_descriptors(&reference, &query, 1.0).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_query() {
        let reference = collection(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0], [3.0, 3.0], [4.0, 4.0]]);
        let matches = match_descriptors(&reference, &DescriptorCollection::empty(), 0.6).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_empty_reference() {
        let query = collection(&[[0.0, 0.0]]);
        let matches = match_descriptors(&DescriptorCollection::empty(), &query, 0.6).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_single_candidate_always_matches() {
        let reference = collection(&[[0.0, 0.0]]);
        let query = collection(&[[100.0, 100.0]]);

        let matches = match_descriptors(&reference, &query, 0.1).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_winner_is_excluded() {
        // Both reference features are nearest to query 0; the second falls
        // back to query 1 once query 0 is claimed.
        let reference = collection(&[[0.0, 0.0], [0.5, 0.0]]);
        let query = collection(&[[0.0, 0.0], [50.0, 0.0]]);

        let matches = match_descriptors(&reference, &query, 0.6).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].query, Feature::new(0.0, 0.0));
        assert_eq!(matches[1].query, Feature::new(50.0, 0.0));
    }

    #[test]
    fn test_last_visited_excludes_final_index() {
        let reference = collection(&[[0.0, 0.0], [0.5, 0.0]]);
        let query = collection(&[[0.0, 0.0], [50.0, 0.0]]);

        let matcher = DescriptorMatcher::new(0.6, ExclusionPolicy::LastVisited).unwrap();
        let matches = matcher.match_collections(&reference, &query).unwrap();

        // Query 1 is withdrawn instead of the winner, so query 0 serves both.
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].query, Feature::new(0.0, 0.0));
        assert_eq!(matches[1].query, Feature::new(0.0, 0.0));
    }

    #[test]
    fn test_dimension_mismatch() {
        let reference = collection(&[[0.0, 0.0]]);
        let query = DescriptorCollection::new(vec![Feature::new(0.0, 0.0)], vec![vec![0.0; 3]]).unwrap();

        let result = match_descriptors(&reference, &query, 0.6);
        assert!(matches!(result, Err(MatchError::DimensionMismatch { reference: 2, query: 3 })));
    }

    #[test]
    fn test_nan_candidate_does_not_hide_exact_match() {
        let reference = collection(&[[0.0, 0.0]]);
        let query = collection(&[[f32::NAN, 0.0], [0.0, 0.0], [50.0, 50.0]]);

        let matches = match_descriptors(&reference, &query, 0.6).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].query, Feature::new(0.0, 0.0));
    }

    #[test]
    fn test_invalid_ratio() {
        for ratio in [0.0, -0.5, 1.01, f32::NAN] {
            let result = DescriptorMatcher::new(ratio, ExclusionPolicy::Winner);
            assert!(matches!(result, Err(MatchError::InvalidRatio(_))), "ratio {} accepted", ratio);
        }
        assert!(DescriptorMatcher::new(1.0, ExclusionPolicy::Winner).is_ok());
    }

    #[test]
    fn test_invalid_ratio_checked_before_empty_shortcut() {
        let result = match_descriptors(&DescriptorCollection::empty(), &DescriptorCollection::empty(), 2.0);
        assert!(matches!(result, Err(MatchError::InvalidRatio(_))));
    }

    #[test]
    fn test_deterministic() {
        let reference = collection(&[[0.0, 1.0], [3.0, 2.0], [7.0, 7.0], [1.0, 9.0]]);
        let query = collection(&[[0.1, 1.2], [2.8, 2.1], [6.0, 8.0], [9.0, 0.0], [1.0, 8.5]]);

        let first = match_descriptors(&reference, &query, 0.8).unwrap();
        for _ in 0..10 {
            assert_eq!(match_descriptors(&reference, &query, 0.8).unwrap(), first);
        }
    }
}
