//! Quirk descriptor: a signature paired with its replacement

use crate::error::QuirkError;
use crate::signature::{Replacement, Signature};
use serde::{Deserialize, Serialize};
use zigbee_core::ZigbeeDevice;

/// Valid application endpoint IDs (0 is ZDO, 255 is broadcast)
const ENDPOINT_RANGE: std::ops::RangeInclusive<u8> = 1..=254;

/// A device quirk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuirkDescriptor {
    /// Unique, human-readable quirk name
    pub name: String,
    /// What the host observes when interviewing the device
    pub signature: Signature,
    /// What the host uses instead once the signature matched
    pub replacement: Replacement,
}

impl QuirkDescriptor {
    /// Check the descriptor for configuration defects
    #[allow(clippy::missing_errors_doc)]
    pub fn validate(&self) -> Result<(), QuirkError> {
        if self.signature.models_info.is_empty() {
            return Err(QuirkError::NoIdentity(self.name.clone()));
        }
        if self
            .signature
            .models_info
            .iter()
            .any(|m| m.manufacturer.is_empty() || m.model.is_empty())
        {
            return Err(QuirkError::EmptyIdentity(self.name.clone()));
        }
        if self.signature.endpoints.is_empty() || self.replacement.endpoints.is_empty() {
            return Err(QuirkError::NoEndpoints(self.name.clone()));
        }

        for endpoint in self.signature.endpoints.keys() {
            if !ENDPOINT_RANGE.contains(endpoint) {
                return Err(QuirkError::InvalidEndpoint {
                    quirk: self.name.clone(),
                    endpoint: *endpoint,
                });
            }
        }

        for endpoint in self.replacement.endpoints.keys() {
            if !self.signature.endpoints.contains_key(endpoint) {
                return Err(QuirkError::UnknownReplacementEndpoint {
                    quirk: self.name.clone(),
                    endpoint: *endpoint,
                });
            }
        }

        for descriptor in [
            self.signature.node_descriptor,
            self.replacement.node_descriptor,
        ]
        .into_iter()
        .flatten()
        {
            descriptor
                .validate()
                .map_err(|source| QuirkError::InvalidNodeDescriptor {
                    quirk: self.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Check an interviewed device against the signature
    #[must_use]
    pub fn matches(&self, device: &ZigbeeDevice) -> bool {
        self.signature.matches(device)
    }

    /// Build the effective device model for a matched device
    #[must_use]
    pub fn apply(&self, device: &ZigbeeDevice) -> ZigbeeDevice {
        self.replacement.apply(device)
    }

    #[must_use]
    pub fn specificity(&self) -> usize {
        self.signature.specificity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::{EndpointReplacement, EndpointSignature, ModelInfo};
    use std::collections::BTreeMap;
    use zigbee_core::cluster::{id, profiles};
    use zigbee_core::NodeDescriptorError;

    fn descriptor() -> QuirkDescriptor {
        QuirkDescriptor {
            name: "acme.Plug".to_string(),
            signature: Signature {
                models_info: vec![ModelInfo::new("Acme", "Plug")],
                endpoints: BTreeMap::from([(
                    1,
                    EndpointSignature {
                        profile_id: Some(profiles::HA),
                        device_type: Some(0x0051),
                        input_clusters: Some(vec![id::BASIC, id::ON_OFF, id::METERING]),
                        output_clusters: Some(vec![id::OTA]),
                    },
                )]),
                node_descriptor: None,
            },
            replacement: Replacement {
                endpoints: BTreeMap::from([(
                    1,
                    EndpointReplacement {
                        input_clusters: vec![
                            id::BASIC,
                            id::ON_OFF,
                            id::METERING,
                            id::ELECTRICAL_MEASUREMENT,
                        ],
                        output_clusters: vec![id::OTA],
                        ..Default::default()
                    },
                )]),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_valid_descriptor() {
        assert!(descriptor().validate().is_ok());
    }

    #[test]
    fn test_replacement_endpoint_must_be_observed() {
        let mut quirk = descriptor();
        quirk
            .replacement
            .endpoints
            .insert(2, EndpointReplacement::default());
        assert!(matches!(
            quirk.validate(),
            Err(QuirkError::UnknownReplacementEndpoint { endpoint: 2, .. })
        ));
    }

    #[test]
    fn test_zdo_endpoint_rejected() {
        let mut quirk = descriptor();
        let sig = quirk.signature.endpoints.remove(&1).unwrap();
        quirk.signature.endpoints.insert(0, sig);
        quirk.replacement.endpoints.clear();
        quirk
            .replacement
            .endpoints
            .insert(0, EndpointReplacement::default());
        assert!(matches!(
            quirk.validate(),
            Err(QuirkError::InvalidEndpoint { endpoint: 0, .. })
        ));
    }

    #[test]
    fn test_missing_identity_rejected() {
        let mut quirk = descriptor();
        quirk.signature.models_info.clear();
        assert!(matches!(quirk.validate(), Err(QuirkError::NoIdentity(_))));

        quirk.signature.models_info.push(ModelInfo::new("Acme", ""));
        assert!(matches!(quirk.validate(), Err(QuirkError::EmptyIdentity(_))));
    }

    #[test]
    fn test_node_descriptor_overflow_rejected() {
        let mut quirk = descriptor();
        quirk.replacement.node_descriptor = Some(zigbee_core::NodeDescriptor {
            logical_type: 9,
            complex_descriptor_available: 0,
            user_descriptor_available: 0,
            reserved: 0,
            aps_flags: 0,
            frequency_band: 8,
            mac_capability_flags: 0x8E,
            manufacturer_code: 0x1234,
            maximum_buffer_size: 82,
            maximum_incoming_transfer_size: 82,
            server_mask: 0x2C00,
            maximum_outgoing_transfer_size: 82,
            descriptor_capability_field: 0,
        });

        match quirk.validate() {
            Err(QuirkError::InvalidNodeDescriptor { source, .. }) => assert_eq!(
                source,
                NodeDescriptorError::FieldOverflow {
                    field: "logical_type",
                    value: 9,
                    bits: 3,
                }
            ),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
