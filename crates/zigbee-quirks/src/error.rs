//! Error types for quirk registration and loading

use thiserror::Error;
use zigbee_core::NodeDescriptorError;

/// Errors raised while validating, registering or loading quirks
///
/// A device that matches no quirk is not an error; the host simply keeps the
/// observed model.
#[derive(Error, Debug)]
pub enum QuirkError {
    /// Signature lists no manufacturer/model identity
    #[error("Quirk {0} has no manufacturer/model identity")]
    NoIdentity(String),

    /// Identity with an empty manufacturer or model string
    #[error("Quirk {0} has an empty manufacturer or model name")]
    EmptyIdentity(String),

    /// Signature declares no endpoints
    #[error("Quirk {0} declares no endpoints")]
    NoEndpoints(String),

    /// Endpoint ID outside 1-254
    #[error("Quirk {quirk}: invalid endpoint ID {endpoint}")]
    InvalidEndpoint { quirk: String, endpoint: u8 },

    /// Replacement endpoint the signature never observes
    #[error("Quirk {quirk}: replacement endpoint {endpoint} is not in the signature")]
    UnknownReplacementEndpoint { quirk: String, endpoint: u8 },

    /// Node descriptor bitfield overflow
    #[error("Quirk {quirk}: invalid node descriptor: {source}")]
    InvalidNodeDescriptor {
        quirk: String,
        #[source]
        source: NodeDescriptorError,
    },

    /// Another quirk already claims the same identity with the same signature
    #[error("Quirk {quirk} conflicts with already registered quirk {existing}")]
    ConflictingSignature { quirk: String, existing: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error (custom quirk files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
