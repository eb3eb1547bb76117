use scene_core::MatchConfig;
use crate::error::MatchResult;
use crate::types::ExclusionPolicy;
use crate::builder::MatcherBuilder;
use crate::matcher::validate_ratio;

#[cfg(feature = "serde")]
use serde::{Serialize, Deserialize};

/// Complete matcher configuration with all settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatcherConfig {
    /// Query index withdrawn after each accepted match
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclusion: ExclusionPolicy,
    /// Metadata
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub version: Option<String>,
    /// Ratio test and decision thresholds; last so TOML writes it as a table
    pub core: MatchConfig,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MatcherConfig {
    /// Create new configuration with default settings
    pub fn new() -> Self {
        Self {
            core: MatchConfig::default(),
            exclusion: ExclusionPolicy::Winner,
            name: None,
            description: None,
            version: None,
        }
    }

    /// Strict preset: fewer, less ambiguous correspondences
    pub fn strict_preset() -> Self {
        Self {
            core: MatchConfig {
                ratio_threshold: 0.5,
                count_threshold: 10,
                n_threads: num_cpus::get(),
            },
            exclusion: ExclusionPolicy::Winner,
            name: Some("Strict".to_string()),
            description: Some("Tight ratio test for cluttered scenes".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Balanced preset matching the library defaults
    pub fn balanced_preset() -> Self {
        Self {
            core: MatchConfig {
                ratio_threshold: 0.6,
                count_threshold: 10,
                n_threads: num_cpus::get(),
            },
            exclusion: ExclusionPolicy::Winner,
            name: Some("Balanced".to_string()),
            description: Some("Default ratio and count thresholds".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Lenient preset: Lowe's 0.8 ratio, more correspondences
    pub fn lenient_preset() -> Self {
        Self {
            core: MatchConfig {
                ratio_threshold: 0.8,
                count_threshold: 10,
                n_threads: num_cpus::get(),
            },
            exclusion: ExclusionPolicy::Winner,
            name: Some("Lenient".to_string()),
            description: Some("Loose ratio test for low-texture references".to_string()),
            version: Some("1.0".to_string()),
        }
    }

    /// Add metadata to configuration
    pub fn with_metadata(mut self, name: &str, description: &str) -> Self {
        self.name = Some(name.to_string());
        self.description = Some(description.to_string());
        self.version = Some("1.0".to_string());
        self
    }

    /// Convert to MatcherBuilder for further customization
    pub fn to_builder(self) -> MatcherBuilder {
        MatcherBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "MatcherConfig: ratio={}, min_matches={}, threads={}, exclusion={:?}",
            self.core.ratio_threshold, self.core.count_threshold, self.core.n_threads, self.exclusion
        )
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> MatchResult<()> {
        validate_ratio(self.core.ratio_threshold)
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Serialize to JSON string
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatchError;

    #[test]
    fn test_presets_validate() {
        for cfg in [
            MatcherConfig::new(),
            MatcherConfig::strict_preset(),
            MatcherConfig::balanced_preset(),
            MatcherConfig::lenient_preset(),
        ] {
            assert!(cfg.validate().is_ok(), "{}", cfg.summary());
        }
    }

    #[test]
    fn test_preset_ordering() {
        let strict = MatcherConfig::strict_preset().core.ratio_threshold;
        let balanced = MatcherConfig::balanced_preset().core.ratio_threshold;
        let lenient = MatcherConfig::lenient_preset().core.ratio_threshold;
        assert!(strict < balanced && balanced < lenient);
    }

    #[test]
    fn test_invalid_ratio_rejected() {
        let mut cfg = MatcherConfig::new();
        cfg.core.ratio_threshold = 1.5;
        assert!(matches!(cfg.validate(), Err(MatchError::InvalidRatio(_))));
    }

    #[test]
    fn test_metadata_and_summary() {
        let cfg = MatcherConfig::new().with_metadata("Box", "box_in_scene runs");
        assert_eq!(cfg.name.as_deref(), Some("Box"));
        assert!(cfg.summary().contains("ratio=0.6"));
        assert!(cfg.summary().contains("min_matches=10"));
    }

    #[test]
    fn test_new_uses_library_defaults() {
        assert_eq!(MatcherConfig::new().core, MatchConfig::default());
    }

    #[cfg(feature = "serde")]
    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scene-match-{}-{}", std::process::id(), name))
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_save_load_json_file() {
        let path = temp_path("config.json");
        let mut cfg = MatcherConfig::lenient_preset().with_metadata("Cup", "cup-in-scene variants");
        cfg.exclusion = ExclusionPolicy::LastVisited;

        cfg.save_json(&path).unwrap();
        assert_eq!(MatcherConfig::load_json(&path).unwrap(), cfg);
        std::fs::remove_file(path).ok();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_save_load_toml_file() {
        let path = temp_path("config.toml");
        let cfg = MatcherConfig::strict_preset();

        let text = cfg.to_toml().unwrap();
        assert!(text.contains("[core]"));

        cfg.save_toml(&path).unwrap();
        assert_eq!(MatcherConfig::load_toml(&path).unwrap(), cfg);
        std::fs::remove_file(path).ok();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_load_rejects_invalid_ratio_file() {
        let path = temp_path("invalid.json");
        let mut cfg = MatcherConfig::new();
        cfg.core.ratio_threshold = 0.0;
        cfg.save_json(&path).unwrap();

        let err = MatcherConfig::load_json(&path).unwrap_err();
        assert!(matches!(err.downcast_ref::<MatchError>(), Some(MatchError::InvalidRatio(_))));
        std::fs::remove_file(path).ok();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_round_trip_keeps_policy() {
        let mut cfg = MatcherConfig::strict_preset();
        cfg.exclusion = ExclusionPolicy::LastVisited;
        let json = cfg.to_json().unwrap();
        assert!(json.contains("last-visited"));
        assert_eq!(MatcherConfig::from_json(&json).unwrap(), cfg);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_toml_defaults_policy_and_validates() {
        let toml_str = "[core]\nratio_threshold = 0.7\ncount_threshold = 4\nn_threads = 2\n";
        let cfg = MatcherConfig::from_toml(toml_str).unwrap();
        assert_eq!(cfg.exclusion, ExclusionPolicy::Winner);
        assert_eq!(cfg.core.count_threshold, 4);

        let bad = "[core]\nratio_threshold = 0.0\ncount_threshold = 4\nn_threads = 2\n";
        assert!(MatcherConfig::from_toml(bad).is_err());

        let negative = "[core]\nratio_threshold = 0.6\ncount_threshold = -1\nn_threads = 2\n";
        assert!(MatcherConfig::from_toml(negative).is_err());
    }
}
