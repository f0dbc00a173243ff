//! Error types for profile construction.

use thiserror::Error;

/// Errors returned by [`crate::build_profile`] and the config validators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// The vehicle envelope or step distance cannot describe a flyable corridor.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The sample/flag sequences are malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The envelope constructor did not settle within its repair budget.
    #[error("corridor unreachable after {rounds} repair rounds")]
    UnreachableCorridor { rounds: usize },
}

impl ProfileError {
    /// Short machine-readable kind, used by API layers.
    pub fn kind(&self) -> &'static str {
        match self {
            ProfileError::InvalidConfiguration(_) => "invalid_configuration",
            ProfileError::InvalidInput(_) => "invalid_input",
            ProfileError::UnreachableCorridor { .. } => "unreachable_corridor",
        }
    }
}
