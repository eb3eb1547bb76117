#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Feature ≙ detected point of interest, location in image-pixel space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feature {
    pub x: f32,
    pub y: f32,
}

impl Feature {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Integer pixel coordinate `(x, y)`, truncated toward zero
    pub fn pixel(&self) -> (i32, i32) {
        (self.x as i32, self.y as i32)
    }
}

/// Fixed-length real-valued appearance vector (e.g. 128-D SIFT)
pub type Descriptor = Vec<f32>;

/// Euclidean (L2) distance between two descriptors of equal length
#[inline]
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(p, q)| {
            let d = p - q;
            d * d
        })
        .sum::<f32>()
        .sqrt()
}

#[derive(Debug, Clone, PartialEq)]
pub enum CollectionError {
    LengthMismatch { features: usize, descriptors: usize },
    InconsistentDimension { index: usize, expected: usize, actual: usize },
}

impl std::fmt::Display for CollectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectionError::LengthMismatch { features, descriptors } => {
                write!(f, "Collection length mismatch: {} features, {} descriptors", features, descriptors)
            }
            CollectionError::InconsistentDimension { index, expected, actual } => {
                write!(f, "Descriptor {} has dimension {} (collection dimension is {})", index, actual, expected)
            }
        }
    }
}

impl std::error::Error for CollectionError {}

/// Ordered (feature, descriptor) pairs as produced by an extractor.
///
/// Index order is the extractor's order and is preserved: it is the scan
/// order of the matcher. All descriptors share one dimensionality.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CollectionParts", into = "CollectionParts"))]
pub struct DescriptorCollection {
    features: Vec<Feature>,
    descriptors: Vec<Descriptor>,
}

/// Serialized layout of a `DescriptorCollection`: two parallel lists
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollectionParts {
    pub features: Vec<Feature>,
    pub descriptors: Vec<Descriptor>,
}

impl DescriptorCollection {
    pub fn new(features: Vec<Feature>, descriptors: Vec<Descriptor>) -> Result<Self, CollectionError> {
        if features.len() != descriptors.len() {
            return Err(CollectionError::LengthMismatch {
                features: features.len(),
                descriptors: descriptors.len(),
            });
        }

        if let Some(first) = descriptors.first() {
            let expected = first.len();
            if let Some((index, d)) = descriptors.iter().enumerate().find(|(_, d)| d.len() != expected) {
                return Err(CollectionError::InconsistentDimension { index, expected, actual: d.len() });
            }
        }

        Ok(Self { features, descriptors })
    }

    /// Empty collection (no features detected)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Descriptor dimensionality, `None` when the collection is empty
    pub fn dimension(&self) -> Option<usize> {
        self.descriptors.first().map(Vec::len)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn feature(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    /// Iterate `(feature, descriptor)` pairs in extractor order
    pub fn iter(&self) -> impl Iterator<Item = (&Feature, &[f32])> + '_ {
        self.features.iter().zip(self.descriptors.iter().map(Vec::as_slice))
    }
}

impl TryFrom<CollectionParts> for DescriptorCollection {
    type Error = CollectionError;

    fn try_from(parts: CollectionParts) -> Result<Self, Self::Error> {
        Self::new(parts.features, parts.descriptors)
    }
}

impl From<DescriptorCollection> for CollectionParts {
    fn from(c: DescriptorCollection) -> Self {
        Self { features: c.features, descriptors: c.descriptors }
    }
}

/// Accepted pairing of a reference feature with a query feature
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Correspondence {
    pub reference: Feature,
    pub query: Feature,
}

impl Correspondence {
    /// Integer pixel coordinates of both ends, `(reference, query)`
    pub fn pixel_pair(&self) -> ((i32, i32), (i32, i32)) {
        (self.reference.pixel(), self.query.pixel())
    }
}

/// Correspondences in reference scan order, at most one per reference feature
pub type CorrespondenceSet = Vec<Correspondence>;

/// Detection outcome for one (reference, query) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectionVerdict {
    pub found: bool,
    pub matched_count: usize,
    /// Size of the reference collection
    pub total_count: usize,
}

impl std::fmt::Display for DetectionVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let found = if self.found { "True" } else { "False" };
        write!(
            f,
            "Found: {:5}, matched: {}/{} keypoint(s)",
            found, self.matched_count, self.total_count
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchConfig {
    /// Nearest must be closer than `ratio_threshold * second nearest`, in (0, 1]
    pub ratio_threshold: f32,
    /// Minimum correspondences for a positive verdict
    pub count_threshold: usize,
    pub n_threads: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ratio_threshold: 0.6,
            count_threshold: 10,
            n_threads: num_cpus::get().max(1),
        }
    }
}

/// Initialize Rayon thread pool with the specified number of threads
pub fn init_thread_pool(n_threads: usize) -> Result<(), rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .build_global()
}
