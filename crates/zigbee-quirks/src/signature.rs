//! Signature and replacement data models

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use zigbee_core::{Endpoint, NodeDescriptor, ZigbeeDevice};

/// Manufacturer/model identity reported by the Basic cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelInfo {
    pub manufacturer: String,
    pub model: String,
}

impl ModelInfo {
    #[must_use]
    pub fn new(manufacturer: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            manufacturer: manufacturer.into(),
            model: model.into(),
        }
    }

    /// Identity of an interviewed device, if both Basic attributes were read
    #[must_use]
    pub fn of_device(device: &ZigbeeDevice) -> Option<Self> {
        match (&device.manufacturer, &device.model) {
            (Some(manufacturer), Some(model)) => Some(Self::new(manufacturer, model)),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.manufacturer, self.model)
    }
}

/// What the host must observe on one endpoint
///
/// Absent fields are not compared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSignature {
    #[serde(default)]
    pub profile_id: Option<u16>,
    #[serde(default)]
    pub device_type: Option<u16>,
    #[serde(default)]
    pub input_clusters: Option<Vec<u16>>,
    #[serde(default)]
    pub output_clusters: Option<Vec<u16>>,
}

impl EndpointSignature {
    /// Check an observed endpoint against this signature
    #[must_use]
    pub fn matches(&self, endpoint: &Endpoint) -> bool {
        self.profile_id.map_or(true, |p| p == endpoint.profile_id)
            && self.device_type.map_or(true, |d| d == endpoint.device_id)
            && self
                .input_clusters
                .as_deref()
                .map_or(true, |c| same_clusters(c, &endpoint.in_clusters))
            && self
                .output_clusters
                .as_deref()
                .map_or(true, |c| same_clusters(c, &endpoint.out_clusters))
    }

    /// Number of constrained fields
    #[must_use]
    pub fn specificity(&self) -> usize {
        usize::from(self.profile_id.is_some())
            + usize::from(self.device_type.is_some())
            + usize::from(self.input_clusters.is_some())
            + usize::from(self.output_clusters.is_some())
    }
}

/// Cluster lists are compared as sets
fn same_clusters(expected: &[u16], observed: &[u16]) -> bool {
    let expected: BTreeSet<u16> = expected.iter().copied().collect();
    let observed: BTreeSet<u16> = observed.iter().copied().collect();
    expected == observed
}

/// The device as the host discovers it on the network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub models_info: Vec<ModelInfo>,
    pub endpoints: BTreeMap<u8, EndpointSignature>,
    #[serde(default)]
    pub node_descriptor: Option<NodeDescriptor>,
}

impl Signature {
    /// Check whether an identity is listed in this signature
    #[must_use]
    pub fn identifies(&self, identity: &ModelInfo) -> bool {
        self.models_info.contains(identity)
    }

    /// Structural match against an interviewed device
    #[must_use]
    pub fn matches(&self, device: &ZigbeeDevice) -> bool {
        let Some(identity) = ModelInfo::of_device(device) else {
            return false;
        };
        if !self.identifies(&identity) {
            return false;
        }

        let observed = device.endpoint_ids();
        if observed.len() != self.endpoints.len()
            || !observed.iter().all(|id| self.endpoints.contains_key(id))
        {
            return false;
        }

        let endpoints_match = self.endpoints.iter().all(|(id, sig)| {
            device
                .endpoint(*id)
                .is_some_and(|endpoint| sig.matches(endpoint))
        });
        if !endpoints_match {
            return false;
        }

        match &self.node_descriptor {
            Some(expected) => device.node_descriptor.as_ref() == Some(expected),
            None => true,
        }
    }

    /// Number of constrained fields, used to rank overlapping quirks
    #[must_use]
    pub fn specificity(&self) -> usize {
        self.endpoints
            .values()
            .map(EndpointSignature::specificity)
            .sum::<usize>()
            + self.endpoints.len()
            + usize::from(self.node_descriptor.is_some())
    }
}

/// What the host uses for one endpoint once matched
///
/// Absent profile and device type are inherited from the observed endpoint;
/// absent cluster lists mean no clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointReplacement {
    #[serde(default)]
    pub profile_id: Option<u16>,
    #[serde(default)]
    pub device_type: Option<u16>,
    #[serde(default)]
    pub input_clusters: Vec<u16>,
    #[serde(default)]
    pub output_clusters: Vec<u16>,
}

/// The corrected model substituted for a matched device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub endpoints: BTreeMap<u8, EndpointReplacement>,
    #[serde(default)]
    pub node_descriptor: Option<NodeDescriptor>,
}

impl Replacement {
    /// Build the effective device model from an observed one
    ///
    /// Addresses and link state are kept; endpoints become exactly the
    /// replacement endpoints.
    #[must_use]
    pub fn apply(&self, observed: &ZigbeeDevice) -> ZigbeeDevice {
        let mut device = observed.clone();

        device.endpoints = self
            .endpoints
            .iter()
            .map(|(id, rep)| {
                let original = observed.endpoint(*id);
                Endpoint {
                    id: *id,
                    profile_id: rep
                        .profile_id
                        .or(original.map(|e| e.profile_id))
                        .unwrap_or_default(),
                    device_id: rep
                        .device_type
                        .or(original.map(|e| e.device_id))
                        .unwrap_or_default(),
                    in_clusters: rep.input_clusters.clone(),
                    out_clusters: rep.output_clusters.clone(),
                }
            })
            .collect();

        if let Some(descriptor) = self.node_descriptor {
            device.device_type = descriptor.logical_type().into();
            device.node_descriptor = Some(descriptor);
        }
        if let Some(ref manufacturer) = self.manufacturer {
            device.manufacturer = Some(manufacturer.clone());
        }
        if let Some(ref model) = self.model {
            device.model = Some(model.clone());
        }

        device
    }
}
