//! Zigbee device quirks
//!
//! A quirk pairs the signature a host observes when interviewing a device
//! with a replacement model the host should use instead. This crate provides
//! the quirk data model, validation, an init-once registry with signature
//! matching, a small host facade that applies quirks to interviewed devices,
//! and the built-in quirk definitions.

pub mod config;
pub mod error;
pub mod host;
pub mod persistence;
pub mod quirk;
pub mod quirks;
pub mod registry;
pub mod signature;

pub use config::{MatchPolicy, QuirkConfig};
pub use error::QuirkError;
pub use host::{EffectiveDevice, QuirkEvent, QuirkHost};
pub use quirk::QuirkDescriptor;
pub use registry::{QuirkRegistry, QuirkRegistryBuilder};
pub use signature::{EndpointReplacement, EndpointSignature, ModelInfo, Replacement, Signature};

#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
