//! Quirk registry
//!
//! Quirks are registered through a [`QuirkRegistryBuilder`] when the host
//! starts. [`QuirkRegistryBuilder::build`] freezes the set; the resulting
//! [`QuirkRegistry`] is read-only and can be shared across threads behind an
//! `Arc`.

use crate::config::{MatchPolicy, QuirkConfig};
use crate::error::QuirkError;
use crate::persistence;
use crate::quirk::QuirkDescriptor;
use crate::quirks;
use crate::signature::ModelInfo;
use std::collections::HashMap;
use std::sync::Arc;
use zigbee_core::ZigbeeDevice;

/// Mutable registry used during startup
#[derive(Debug, Default)]
pub struct QuirkRegistryBuilder {
    policy: MatchPolicy,
    quirks: Vec<Arc<QuirkDescriptor>>,
    /// Indices into `quirks`, in registration order
    by_identity: HashMap<ModelInfo, Vec<usize>>,
}

impl QuirkRegistryBuilder {
    #[must_use]
    pub fn new(policy: MatchPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Validate and register a quirk
    ///
    /// Returns `Ok(false)` when an identical quirk is already registered.
    #[allow(clippy::missing_errors_doc)]
    pub fn register(&mut self, quirk: QuirkDescriptor) -> Result<bool, QuirkError> {
        quirk.validate()?;

        for identity in &quirk.signature.models_info {
            for &idx in self.by_identity.get(identity).into_iter().flatten() {
                let existing = &self.quirks[idx];
                if **existing == quirk {
                    tracing::debug!("Quirk {} already registered", quirk.name);
                    return Ok(false);
                }
                if existing.signature.endpoints == quirk.signature.endpoints
                    && existing.signature.node_descriptor == quirk.signature.node_descriptor
                {
                    return Err(QuirkError::ConflictingSignature {
                        quirk: quirk.name.clone(),
                        existing: existing.name.clone(),
                    });
                }
            }
        }

        let idx = self.quirks.len();
        for identity in &quirk.signature.models_info {
            let slots = self.by_identity.entry(identity.clone()).or_default();
            if !slots.contains(&idx) {
                slots.push(idx);
            }
        }
        tracing::info!(
            "Registered quirk {} for {:?}",
            quirk.name,
            quirk
                .signature
                .models_info
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        );
        self.quirks.push(Arc::new(quirk));
        Ok(true)
    }

    /// Register every built-in quirk
    #[allow(clippy::missing_errors_doc)]
    pub fn register_builtin(&mut self) -> Result<(), QuirkError> {
        for quirk in quirks::builtin() {
            self.register(quirk)?;
        }
        Ok(())
    }

    /// Freeze the registry
    #[must_use]
    pub fn build(self) -> QuirkRegistry {
        QuirkRegistry {
            policy: self.policy,
            quirks: self.quirks,
            by_identity: self.by_identity,
        }
    }
}

/// Read-only set of registered quirks
#[derive(Debug)]
pub struct QuirkRegistry {
    policy: MatchPolicy,
    quirks: Vec<Arc<QuirkDescriptor>>,
    by_identity: HashMap<ModelInfo, Vec<usize>>,
}

impl QuirkRegistry {
    #[must_use]
    pub fn builder(policy: MatchPolicy) -> QuirkRegistryBuilder {
        QuirkRegistryBuilder::new(policy)
    }

    /// Registry holding only the built-in quirks
    #[allow(clippy::missing_errors_doc)]
    pub fn with_builtin(policy: MatchPolicy) -> Result<Self, QuirkError> {
        let mut builder = Self::builder(policy);
        builder.register_builtin()?;
        Ok(builder.build())
    }

    /// Build the registry described by a configuration
    ///
    /// Built-in quirks must be valid; invalid custom quirks are skipped with
    /// a warning.
    #[allow(clippy::missing_errors_doc)]
    pub async fn load(config: &QuirkConfig) -> Result<Self, QuirkError> {
        let mut builder = Self::builder(config.match_policy);
        if config.enable_builtin_quirks {
            builder.register_builtin()?;
        }

        if let Some(ref path) = config.custom_quirks_path {
            for quirk in persistence::load_custom_quirks(path).await {
                let name = quirk.name.clone();
                if let Err(e) = builder.register(quirk) {
                    tracing::warn!("Skipping custom quirk {}: {}", name, e);
                }
            }
        }

        let registry = builder.build();
        tracing::info!(
            "Quirk registry ready: {} quirks, policy {:?}",
            registry.len(),
            registry.policy
        );
        Ok(registry)
    }

    /// Find the quirk to apply to an interviewed device
    #[must_use]
    pub fn find(&self, device: &ZigbeeDevice) -> Option<&Arc<QuirkDescriptor>> {
        let identity = ModelInfo::of_device(device)?;
        let candidates = self.by_identity.get(&identity)?;

        let mut matching = candidates
            .iter()
            .map(|&idx| &self.quirks[idx])
            .filter(|quirk| quirk.matches(device));

        let found = match self.policy {
            MatchPolicy::FirstRegistered => matching.next(),
            MatchPolicy::MostSpecific => {
                matching.fold(None, |best: Option<&Arc<QuirkDescriptor>>, quirk| match best {
                    Some(b) if b.specificity() >= quirk.specificity() => Some(b),
                    _ => Some(quirk),
                })
            }
        };

        match found {
            Some(quirk) => tracing::debug!(
                "Device {} matched quirk {}",
                device.ieee_address_string(),
                quirk.name
            ),
            None => tracing::debug!(
                "No quirk signature matched device {} ({})",
                device.ieee_address_string(),
                identity
            ),
        }
        found
    }

    /// Quirks registered for a manufacturer/model identity
    pub fn quirks_for<'a>(
        &'a self,
        manufacturer: &str,
        model: &str,
    ) -> impl Iterator<Item = &'a Arc<QuirkDescriptor>> + 'a {
        self.by_identity
            .get(&ModelInfo::new(manufacturer, model))
            .into_iter()
            .flatten()
            .map(move |&idx| &self.quirks[idx])
    }

    /// All quirks in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<QuirkDescriptor>> {
        self.quirks.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.quirks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quirks.is_empty()
    }

    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }
}
