use scene_core::{Correspondence, CorrespondenceSet, DescriptorCollection, DetectionVerdict};
use crate::error::MatchResult;
use crate::matcher::DescriptorMatcher;
use crate::builder::MatcherBuilder;
use crate::decision::decide;
use crate::types::Detection;

/// A matcher bound to a count threshold, running match and decision together.
#[derive(Debug, Clone)]
pub struct ConfiguredMatcher {
    pub(crate) matcher: DescriptorMatcher,
    pub(crate) config: MatcherBuilder,
}

impl ConfiguredMatcher {
    /// Correspondences from `reference` into `query`.
    pub fn match_collections(
        &self,
        reference: &DescriptorCollection,
        query: &DescriptorCollection,
    ) -> MatchResult<CorrespondenceSet> {
        self.matcher.match_collections(reference, query)
    }

    /// Verdict for an existing correspondence set.
    pub fn decide(&self, correspondences: &[Correspondence], total_count: usize) -> DetectionVerdict {
        decide(correspondences, total_count, self.config.count_threshold_value())
    }

    /// Match `reference` into `query` and decide whether the reference is present.
    ///
    /// # Returns
    /// The correspondences and a verdict whose `total_count` is `reference.len()`.
    pub fn detect(&self, reference: &DescriptorCollection, query: &DescriptorCollection) -> MatchResult<Detection> {
        let correspondences = self.match_collections(reference, query)?;
        let verdict = self.decide(&correspondences, reference.len());
        Ok(Detection { correspondences, verdict })
    }

    /// Get a reference to the underlying `DescriptorMatcher`.
    pub fn matcher(&self) -> &DescriptorMatcher {
        &self.matcher
    }

    /// Get a summary of the matcher's configuration.
    pub fn config_summary(&self) -> String {
        self.config.summary()
    }

    pub fn count_threshold(&self) -> usize {
        self.config.count_threshold_value()
    }

    pub fn n_threads(&self) -> usize {
        self.config.n_threads()
    }
}
