//! Domain error types.
//!
//! These errors represent validation failures and data inconsistencies
//! in the domain layer. They are distinct from API/IO errors.

/// Domain-level errors for validation and data loading.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// Route has no legs
    #[error("route must have at least one leg")]
    EmptyRoute,

    /// Consecutive legs don't meet at the same location
    #[error("legs do not connect: {0} then {1}")]
    LegsNotConnected(String, String),

    /// Dataset document is not valid JSON of the expected shape
    #[error("invalid dataset: {0}")]
    InvalidDataset(#[from] serde_json::Error),

    /// Dataset file could not be read
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyRoute;
        assert_eq!(err.to_string(), "route must have at least one leg");

        let err = DomainError::LegsNotConnected("ORD".into(), "DEN".into());
        assert_eq!(err.to_string(), "legs do not connect: ORD then DEN");

        let json_err = serde_json::from_str::<u32>("x").unwrap_err();
        let err = DomainError::from(json_err);
        assert!(err.to_string().starts_with("invalid dataset: "));
    }

    #[test]
    fn bad_timestamp_is_invalid_dataset() {
        let json = r#"{"itineraries":[{"onward":[{
            "carrier":{"name":"AA"},"flightNumber":"1","source":"SEA","destination":"ORD",
            "departureTimeStamp":"noon","arrivalTimeStamp":"2024-05-01T1200",
            "class":"Y","fareBasis":"Q1"}]}]}"#;

        let err = crate::domain::Dataset::from_json(json).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDataset(_)));
        assert!(err.to_string().contains("invalid timestamp \"noon\""));
    }
}
