use scene_core::{CorrespondenceSet, DetectionVerdict};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which query index is withdrawn from later scans after a match is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ExclusionPolicy {
    /// The accepted nearest candidate
    #[default]
    Winner,
    /// The index the inner scan ended on, i.e. always the final query index.
    /// Legacy behaviour, kept for reproducing earlier results.
    LastVisited,
}

impl std::str::FromStr for ExclusionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "winner" => Ok(ExclusionPolicy::Winner),
            "last-visited" => Ok(ExclusionPolicy::LastVisited),
            other => Err(format!("unknown exclusion policy '{}' (expected winner or last-visited)", other)),
        }
    }
}

/// Nearest / second-nearest tracking for one reference descriptor
#[derive(Debug, Clone, Copy)]
pub(crate) struct NeighborPair {
    pub nearest: Option<(usize, f32)>,
    pub second: f32,
}

impl NeighborPair {
    pub(crate) fn new() -> Self {
        Self { nearest: None, second: f32::INFINITY }
    }

    /// Strict `<` against a `+inf` start: the first-scanned candidate wins
    /// ties, and NaN or infinite distances are never taken
    #[inline]
    pub(crate) fn offer(&mut self, index: usize, dist: f32) {
        let best = self.nearest.map_or(f32::INFINITY, |(_, d)| d);
        if dist < best {
            self.second = best;
            self.nearest = Some((index, dist));
        } else if dist < self.second {
            self.second = dist;
        }
    }

    /// Ratio test; a lone candidate faces `+inf` and passes
    #[inline]
    pub(crate) fn accepted(&self, ratio_threshold: f32) -> Option<usize> {
        match self.nearest {
            Some((index, best)) if best < ratio_threshold * self.second => Some(index),
            _ => None,
        }
    }
}

/// Correspondences together with the verdict derived from them
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Detection {
    pub correspondences: CorrespondenceSet,
    pub verdict: DetectionVerdict,
}
