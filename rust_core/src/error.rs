/// All errors that can occur while reading or writing the match store.
#[derive(thiserror::Error, Debug)]
pub enum MatchdayError {
    /// A referenced team, player or match does not exist.
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Input was rejected before touching the store (duplicate team name,
    /// empty roster, illegal status transition, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The underlying store operation failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl MatchdayError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        MatchdayError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        MatchdayError::Validation(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MatchdayError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, MatchdayError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, MatchdayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = MatchdayError::not_found("team", 42);
        assert_eq!(err.to_string(), "team not found: 42");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_persistence_from_sqlx() {
        let err: MatchdayError = sqlx::Error::Protocol("connection reset".to_string()).into();
        assert!(matches!(err, MatchdayError::Persistence(_)));
        assert!(err.to_string().starts_with("persistence failure"));
    }
}
