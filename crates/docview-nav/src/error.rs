//! Error types for version resolution and address handling.

use thiserror::Error;

/// Errors that can occur while resolving versions or decoding addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NavError {
    /// The project has no published versions.
    #[error("project '{project}' has no published versions")]
    EmptyVersionSet {
        /// Project that was queried.
        project: String,
    },

    /// The requested version or tag is not in the fetched set.
    #[error("version '{requested}' not found for project '{project}'")]
    UnknownVersion {
        /// Project that was queried.
        project: String,
        /// Version token that failed to resolve.
        requested: String,
    },

    /// The version service could not be reached or answered with an error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// An address could not be decoded into a navigation tuple.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Settings could not be loaded or are inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error while reading a settings or versions file.
    #[error("I/O error: {0}")]
    Io(String),

    /// Failed to parse JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl NavError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::EmptyVersionSet { .. } => "This project has no published documentation.",
            Self::UnknownVersion { .. } => "The requested documentation version does not exist.",
            Self::Fetch(_) => "Could not load the list of documentation versions.",
            Self::InvalidAddress(_) => "The documentation link is malformed.",
            Self::Config(_) | Self::Io(_) | Self::JsonParse(_) => "An unexpected error occurred.",
        }
    }

    /// Returns whether the view should render its not-found state for this error.
    ///
    /// Fetch failures count as an empty version set.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EmptyVersionSet { .. } | Self::UnknownVersion { .. } | Self::Fetch(_)
        )
    }

    /// Returns whether this error is potentially recoverable with a retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Io(_))
    }
}

impl From<reqwest::Error> for NavError {
    fn from(err: reqwest::Error) -> Self {
        Self::Fetch(err.to_string())
    }
}

impl From<std::io::Error> for NavError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NavError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse(err.to_string())
    }
}

impl From<toml::de::Error> for NavError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for navigation operations.
pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = NavError::EmptyVersionSet {
            project: "demo".to_string(),
        };
        assert!(err.user_message().contains("no published"));

        let err = NavError::UnknownVersion {
            project: "demo".to_string(),
            requested: "9.9.9".to_string(),
        };
        assert!(err.user_message().contains("does not exist"));
        assert_eq!(
            err.to_string(),
            "version '9.9.9' not found for project 'demo'"
        );
    }

    #[test]
    fn test_not_found_classification() {
        assert!(NavError::Fetch("timeout".to_string()).is_not_found());
        assert!(
            NavError::EmptyVersionSet {
                project: "demo".to_string()
            }
            .is_not_found()
        );
        assert!(!NavError::InvalidAddress("x".to_string()).is_not_found());
    }

    #[test]
    fn test_retryable() {
        assert!(NavError::Fetch("timeout".to_string()).is_retryable());
        assert!(
            !NavError::UnknownVersion {
                project: "a".to_string(),
                requested: "b".to_string()
            }
            .is_retryable()
        );
    }
}
