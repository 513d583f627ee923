//! # Service Error Type
//!
//! Unified error type for the service boundary.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Retail Service                     │
//! │                                                                         │
//! │  Caller                      Rust Service                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  service.checkout("Ann", ..)                                            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Method                                                  │  │
//! │  │  Result<T, ServiceError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Lookup miss? ──── CoreError::MemberNotFound ──────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Bad input? ────── CoreError::Validation ─────── ServiceError ─►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  { "code": "NOT_FOUND", "message": "Member not found: Ann" }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use retail_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from every service method.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Widget: available 1, requested 2"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for service responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Member, item or category does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough stock for the request
    InsufficientStock,

    /// Transaction limits exceeded
    TransactionError,

    /// Inventory and category views disagree
    InconsistentState,

    /// Anything else
    Internal,
}

impl ServiceError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ServiceError {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ServiceError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to service errors.
impl From<CoreError> for ServiceError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let code = match err {
            CoreError::MemberNotFound(_)
            | CoreError::ItemNotFound(_)
            | CoreError::CategoryNotFound(_)
            | CoreError::MemberIdNotFound(_) => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } | CoreError::OutOfStock(_) => {
                ErrorCode::InsufficientStock
            }
            CoreError::TransactionTooLarge { .. } | CoreError::AmountOverflow => {
                ErrorCode::TransactionError
            }
            CoreError::RegistryInconsistency { .. } => {
                tracing::error!(error = %message, "Registry inconsistency");
                ErrorCode::InconsistentState
            }
            CoreError::InvalidAmount { .. }
            | CoreError::QuantityTooLarge { .. }
            | CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ServiceError { code, message }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ServiceError {}

/// Result type for service methods.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading or saving [`crate::ServiceConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("No config path available")]
    NoConfigPath,
}

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::internal(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
