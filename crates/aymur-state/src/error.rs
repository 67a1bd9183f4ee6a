//! # State Layer Errors
//!
//! Error types for session persistence and shop configuration.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      State Error Categories                             │
//! │                                                                         │
//! │  ┌───────────────────┐        ┌───────────────────────┐                │
//! │  │    StoreError     │        │      ConfigError      │                │
//! │  │                   │        │                       │                │
//! │  │  Io               │        │  Io                   │                │
//! │  │  Serde            │        │  Parse / Serialize    │                │
//! │  │  NoPath           │        │  Invalid { field }    │                │
//! │  └───────────────────┘        │  NoPath               │                │
//! │                               └───────────────────────┘                │
//! │                                                                         │
//! │  StateError wraps both for callers that cross both surfaces.           │
//! │                                                                         │
//! │  NOTE: inside PosState mutations, store failures are DEMOTED to a      │
//! │  tracing::warn! - the in-memory session is the source of truth and a   │
//! │  failed write-through never fails the mutation.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Store Error
// =============================================================================

/// Session persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file I/O failed.
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot (de)serialization failed.
    #[error("Session snapshot serialization failed: {0}")]
    Serde(#[from] serde_json::Error),

    /// No platform data directory could be determined.
    #[error("No session file path available")]
    NoPath,
}

// =============================================================================
// Config Error
// =============================================================================

/// Shop configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the config file failed.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML file did not parse.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Serializing the config to TOML failed.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A field failed validation.
    #[error("Invalid config {field}: {reason}")]
    Invalid { field: String, reason: String },

    /// No platform config directory could be determined.
    #[error("No config path available")]
    NoPath,
}

impl ConfigError {
    /// Shorthand for an invalid-field error.
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// State Error
// =============================================================================

/// Umbrella error for callers crossing both the store and config surfaces.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl StateError {
    /// True if the underlying failure came from session persistence.
    pub fn is_store(&self) -> bool {
        matches!(self, StateError::Store(_))
    }

    /// True if the underlying failure came from configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, StateError::Config(_))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
