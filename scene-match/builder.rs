use scene_core::MatchConfig;
use crate::error::MatchResult;
use crate::matcher::DescriptorMatcher;
use crate::config::MatcherConfig;
use crate::configured_matcher::ConfiguredMatcher;
use crate::types::ExclusionPolicy;

/// Builder for creating a `ConfiguredMatcher`
#[derive(Debug, Clone)]
pub struct MatcherBuilder {
    config: MatchConfig,
    exclusion: ExclusionPolicy,
}

impl Default for MatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
            exclusion: ExclusionPolicy::default(),
        }
    }

    /// Set the nearest / second-nearest ratio, in (0, 1]
    pub fn ratio_threshold(mut self, ratio: f32) -> Self {
        self.config.ratio_threshold = ratio;
        self
    }

    /// Set the minimum number of correspondences for a positive verdict
    pub fn count_threshold(mut self, count: usize) -> Self {
        self.config.count_threshold = count;
        self
    }

    /// Set the number of threads for batch matching
    pub fn threads(mut self, n_threads: usize) -> Self {
        self.config.n_threads = n_threads;
        self
    }

    /// Set the exclusion policy
    pub fn exclusion(mut self, policy: ExclusionPolicy) -> Self {
        self.exclusion = policy;
        self
    }

    pub fn preset_strict(self) -> Self {
        Self::from_config(MatcherConfig::strict_preset())
    }

    pub fn preset_balanced(self) -> Self {
        Self::from_config(MatcherConfig::balanced_preset())
    }

    pub fn preset_lenient(self) -> Self {
        Self::from_config(MatcherConfig::lenient_preset())
    }

    /// Build configured matcher
    pub fn build(self) -> MatchResult<ConfiguredMatcher> {
        let matcher = DescriptorMatcher::new(self.config.ratio_threshold, self.exclusion)?;
        Ok(ConfiguredMatcher {
            matcher,
            config: self,
        })
    }

    /// Generate summary of current configuration
    pub fn summary(&self) -> String {
        format!(
            "MatcherBuilder: ratio={}, min_matches={}, threads={}, exclusion={:?}",
            self.config.ratio_threshold, self.config.count_threshold, self.config.n_threads, self.exclusion
        )
    }

    /// Create builder from existing configuration
    pub fn from_config(config: MatcherConfig) -> Self {
        Self {
            config: config.core,
            exclusion: config.exclusion,
        }
    }

    /// Convert to MatcherConfig
    pub fn to_config(self) -> MatcherConfig {
        MatcherConfig {
            core: self.config,
            exclusion: self.exclusion,
            name: None,
            description: None,
            version: None,
        }
    }

    pub fn count_threshold_value(&self) -> usize {
        self.config.count_threshold
    }

    pub fn n_threads(&self) -> usize {
        self.config.n_threads
    }
}
