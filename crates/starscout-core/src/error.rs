//! Domain-level error taxonomy for StarScout.

/// StarScout domain errors.
///
/// Ordinary missing or zero-valued candidate data never produces an error:
/// it degrades to failing checks and low scores. These variants cover
/// contract violations and infrastructure faults only.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("invalid criteria: {0}")]
    InvalidCriteria(String),

    #[error("assessment source error: {0}")]
    AssessmentSource(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for StarScout domain operations.
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scout_error_display() {
        let err = ScoutError::InvalidCriteria("min_stars must be positive".to_string());
        assert!(err.to_string().contains("invalid criteria"));

        let err = ScoutError::AssessmentSource("backend unreachable".to_string());
        assert!(err.to_string().contains("assessment source"));
    }
}
