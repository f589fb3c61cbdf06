/// Local, synchronous failures raised by the registry, weight sets and the
/// scoring engine. None of them are retryable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("criterion '{key}' is already registered in '{category}'")]
    DuplicateKey { category: String, key: String },
    #[error(
        "criterion '{key}' has invalid bounds (min {min}, max {max}, step {step}, default {default})"
    )]
    InvalidBounds {
        key: String,
        min: f64,
        max: f64,
        step: f64,
        default: f64,
    },
    #[error("'{key}' was not found in '{category}'")]
    NotFound { category: String, key: String },
    #[error("criterion '{key}' is not registered in '{category}'")]
    UnknownCriterion { category: String, key: String },
    #[error("name must not be blank")]
    EmptyName,
    #[error("feature '{key}' has value {value}, expected a number in [0, 1]")]
    OutOfRange { key: String, value: f64 },
    #[error("weight for '{key}' must be a finite number")]
    InvalidWeight { key: String },
    #[error("category '{0}' has no registered criteria")]
    UnknownCategory(String),
    #[error("total weight {total} would exceed the target of {target}")]
    ExceedsTarget { total: f64, target: f64 },
}
