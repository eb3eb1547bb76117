//! Nearest-neighbour ratio matching between two descriptor collections and
//! the count-threshold detection decision built on top of it.

mod error;
mod types;
mod matcher;
mod decision;
mod config;
mod builder;
mod configured_matcher;
mod batch;

pub use error::{MatchError, MatchResult};
pub use types::{Detection, ExclusionPolicy};
pub use matcher::{match_descriptors, DescriptorMatcher};
pub use decision::decide;
pub use config::MatcherConfig;
pub use builder::MatcherBuilder;
pub use configured_matcher::ConfiguredMatcher;
pub use batch::match_batch;

pub use scene_core::{
    Correspondence, CorrespondenceSet, DescriptorCollection, DetectionVerdict, Feature, MatchConfig,
};
