#[derive(Debug, Clone, PartialEq)]
pub enum MatchError {
    DimensionMismatch { reference: usize, query: usize },
    InvalidRatio(f32),
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchError::DimensionMismatch { reference, query } => {
                write!(f, "Descriptor dimension mismatch: reference {}, query {}", reference, query)
            }
            MatchError::InvalidRatio(r) => {
                write!(f, "Invalid ratio threshold: {} (must be in (0, 1])", r)
            }
        }
    }
}

impl std::error::Error for MatchError {}

pub type MatchResult<T> = Result<T, MatchError>;
