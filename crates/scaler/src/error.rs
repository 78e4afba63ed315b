//! Scaling parameter errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating scaling parameters.
///
/// Every variant is an operator error: the parameters file will not fix
/// itself, so callers should not retry.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// The parameters file does not exist
    #[error("Params file {} does not exist", .0.display())]
    NotFound(PathBuf),

    /// The parameters file exists but could not be read
    #[error("Params file {} is not readable: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or lacks the `replicas` section
    #[error("Malformed scaling parameters: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A ladder key is not a non-negative integer
    #[error("Invalid core threshold {0:?}: expected a non-negative integer")]
    InvalidThreshold(String),

    /// Two ladder keys resolve to the same core count
    #[error("Duplicate core threshold {0}")]
    DuplicateThreshold(u32),

    /// A ladder value is not a positive replica count
    #[error("Invalid replica count {replicas} for core threshold {threshold}: must be at least 1")]
    InvalidReplicas { threshold: u32, replicas: i64 },
}
