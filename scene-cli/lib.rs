use std::path::Path;

use scene_core::{init_thread_pool, CollectionError, CollectionParts, DescriptorCollection};
use scene_match::{ConfiguredMatcher, Detection, MatchError, MatcherBuilder, MatcherConfig};
use serde::Serialize;

pub use scene_core::{self, DetectionVerdict as Verdict, Feature as SceneFeature};
pub use scene_match::{self, ExclusionPolicy};

#[derive(Debug)]
pub enum SceneError {
    Match(MatchError),
    Collection(CollectionError),
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::Match(e) => write!(f, "Matching error: {}", e),
            SceneError::Collection(e) => write!(f, "Collection error: {}", e),
            SceneError::Io(e) => write!(f, "I/O error: {}", e),
            SceneError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<MatchError> for SceneError {
    fn from(err: MatchError) -> Self {
        SceneError::Match(err)
    }
}

impl From<CollectionError> for SceneError {
    fn from(err: CollectionError) -> Self {
        SceneError::Collection(err)
    }
}

impl From<std::io::Error> for SceneError {
    fn from(err: std::io::Error) -> Self {
        SceneError::Io(err)
    }
}

impl From<serde_json::Error> for SceneError {
    fn from(err: serde_json::Error) -> Self {
        SceneError::Parse(err.to_string())
    }
}

impl From<Box<dyn std::error::Error>> for SceneError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        let err = match err.downcast::<MatchError>() {
            Ok(e) => return SceneError::Match(*e),
            Err(err) => err,
        };
        match err.downcast::<std::io::Error>() {
            Ok(e) => SceneError::Io(*e),
            Err(err) => SceneError::Parse(err.to_string()),
        }
    }
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Read a descriptor collection written by an extractor as
/// `{"features": [{"x", "y"}...], "descriptors": [[...]...]}`
pub fn load_collection<P: AsRef<Path>>(path: P) -> SceneResult<DescriptorCollection> {
    let content = std::fs::read_to_string(path)?;
    let parts: CollectionParts = serde_json::from_str(&content)?;
    Ok(DescriptorCollection::new(parts.features, parts.descriptors)?)
}

/// Read a matcher configuration; `.toml` files are parsed as TOML, anything
/// else as JSON
pub fn load_config<P: AsRef<Path>>(path: P) -> SceneResult<MatcherConfig> {
    let path = path.as_ref();
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => MatcherConfig::load_toml(path)?,
        _ => MatcherConfig::load_json(path)?,
    };
    Ok(config)
}

/// JSON report for one reference/query pair: verdict and pixel-coordinate pairs
#[derive(Debug, Serialize)]
pub struct DetectionReport {
    pub verdict: Verdict,
    pub correspondences: Vec<((i32, i32), (i32, i32))>,
}

impl From<&Detection> for DetectionReport {
    fn from(d: &Detection) -> Self {
        Self {
            verdict: d.verdict,
            correspondences: d.correspondences.iter().map(|c| c.pixel_pair()).collect(),
        }
    }
}

/// High-level reference-in-scene detector: ratio-test matching followed by
/// the count-threshold decision
pub struct SceneMatcher {
    matcher: ConfiguredMatcher,
}

impl SceneMatcher {
    /// Create a detector from a configuration, sizing the global thread pool
    pub fn new(cfg: MatcherConfig) -> SceneResult<Self> {
        // The global pool can only be built once per process; later
        // matchers share it.
        if let Err(e) = init_thread_pool(cfg.core.n_threads) {
            log::warn!("keeping existing thread pool, {} threads not applied: {}", cfg.core.n_threads, e);
        }

        let matcher = MatcherBuilder::from_config(cfg).build()?;
        Ok(Self { matcher })
    }

    /// Match and decide for in-memory collections
    pub fn detect(&self, reference: &DescriptorCollection, query: &DescriptorCollection) -> SceneResult<Detection> {
        Ok(self.matcher.detect(reference, query)?)
    }

    /// Load both collections from disk, then match and decide
    pub fn detect_files<P: AsRef<Path>, Q: AsRef<Path>>(&self, reference: P, query: Q) -> SceneResult<Detection> {
        let reference = load_collection(reference)?;
        let query = load_collection(query)?;
        log::info!("loaded {} reference and {} query features", reference.len(), query.len());
        self.detect(&reference, &query)
    }

    /// Independent pairs in parallel, results in input order
    pub fn detect_many(
        &self,
        pairs: &[(&DescriptorCollection, &DescriptorCollection)],
    ) -> Vec<SceneResult<Detection>> {
        scene_match::match_batch(&self.matcher, pairs)
            .into_iter()
            .map(|r| r.map_err(SceneError::from))
            .collect()
    }

    /// Get matcher configuration summary
    pub fn config_summary(&self) -> String {
        self.matcher.config_summary()
    }
}
