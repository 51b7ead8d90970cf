//! Zigbee device representation

use crate::node_descriptor::{LogicalType, NodeDescriptor};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Zigbee device types (network role)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Coordinator,
    Router,
    EndDevice,
}

impl From<LogicalType> for DeviceType {
    fn from(value: LogicalType) -> Self {
        match value {
            LogicalType::Coordinator => DeviceType::Coordinator,
            LogicalType::Router => DeviceType::Router,
            LogicalType::EndDevice | LogicalType::Reserved(_) => DeviceType::EndDevice,
        }
    }
}

/// A Zigbee device as seen by the host after interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZigbeeDevice {
    /// IEEE address (EUI-64)
    pub ieee_address: [u8; 8],
    /// Network short address
    pub nwk_address: u16,
    /// Device type (network role)
    pub device_type: DeviceType,
    /// Manufacturer name (from Basic cluster)
    pub manufacturer: Option<String>,
    /// Model identifier (from Basic cluster)
    pub model: Option<String>,
    /// Node descriptor reported by the device
    #[serde(default)]
    pub node_descriptor: Option<NodeDescriptor>,
    /// Device endpoints
    pub endpoints: Vec<Endpoint>,
    /// Last seen timestamp
    #[serde(skip)]
    pub last_seen: Option<Instant>,
    /// Link quality indicator (0-255)
    pub lqi: Option<u8>,
    /// Is device reachable
    pub available: bool,
}

impl ZigbeeDevice {
    /// Create a new device with just address info
    #[must_use]
    pub fn new(ieee_address: [u8; 8], nwk_address: u16) -> Self {
        Self {
            ieee_address,
            nwk_address,
            device_type: DeviceType::EndDevice,
            manufacturer: None,
            model: None,
            node_descriptor: None,
            endpoints: Vec::new(),
            last_seen: None,
            lqi: None,
            available: true,
        }
    }

    /// Get IEEE address as hex string
    #[must_use]
    pub fn ieee_address_string(&self) -> String {
        self.ieee_address
            .iter()
            .rev() // IEEE addresses are typically displayed in reverse byte order
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }

    /// Get a display name (model or IEEE address)
    #[must_use]
    pub fn display_name(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.ieee_address_string())
    }

    /// Look up an endpoint by ID
    #[must_use]
    pub fn endpoint(&self, id: u8) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// Endpoint IDs in ascending order
    #[must_use]
    pub fn endpoint_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.endpoints.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// A device endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Endpoint ID (1-254)
    pub id: u8,
    /// Profile ID (e.g., 0x0104 for Home Automation)
    pub profile_id: u16,
    /// Device ID within the profile
    pub device_id: u16,
    /// Input (server) clusters
    pub in_clusters: Vec<u16>,
    /// Output (client) clusters
    pub out_clusters: Vec<u16>,
}

impl Endpoint {
    /// Check if endpoint has a specific cluster
    #[must_use]
    pub fn has_cluster(&self, cluster_id: u16) -> bool {
        self.in_clusters.contains(&cluster_id) || self.out_clusters.contains(&cluster_id)
    }

    /// Check if this is an IAS zone sensor (smoke, contact, motion, ...)
    #[must_use]
    pub fn is_ias_zone(&self) -> bool {
        self.in_clusters.contains(&crate::cluster::id::IAS_ZONE)
    }

    /// Check if this endpoint reports battery state
    #[must_use]
    pub fn has_power_config(&self) -> bool {
        self.in_clusters.contains(&crate::cluster::id::POWER_CONFIG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{id, profiles};

    #[test]
    fn test_ieee_address_string() {
        let device = ZigbeeDevice::new([0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x00], 0x1234);
        assert_eq!(device.ieee_address_string(), "00:11:22:33:44:55:66:77");
        assert_eq!(device.display_name(), "00:11:22:33:44:55:66:77");
    }

    #[test]
    fn test_endpoint_lookup() {
        let mut device = ZigbeeDevice::new([0; 8], 0x0001);
        device.endpoints.push(Endpoint {
            id: 10,
            profile_id: profiles::HA,
            device_id: 0x0402,
            in_clusters: vec![id::BASIC, id::POWER_CONFIG, id::IAS_ZONE],
            out_clusters: vec![],
        });
        device.endpoints.push(Endpoint {
            id: 1,
            profile_id: profiles::HA,
            device_id: 0x0002,
            in_clusters: vec![id::BASIC],
            out_clusters: vec![id::OTA],
        });

        assert_eq!(device.endpoint_ids(), vec![1, 10]);
        let ep = device.endpoint(10).unwrap();
        assert!(ep.is_ias_zone());
        assert!(ep.has_power_config());
        assert!(device.endpoint(1).unwrap().has_cluster(id::OTA));
        assert!(device.endpoint(2).is_none());
    }
}
