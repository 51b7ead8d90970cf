//! Quirk host: applies registered quirks to interviewed devices

use crate::registry::QuirkRegistry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use zigbee_core::ZigbeeDevice;

/// Quirk events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuirkEvent {
    /// A quirk replaced the observed model of a device
    QuirkApplied {
        ieee_address: [u8; 8],
        quirk: String,
    },
    /// No quirk matched; the observed model is used as-is
    NoQuirk { ieee_address: [u8; 8] },
    /// A device left and its effective model was dropped
    DeviceLeft { ieee_address: [u8; 8] },
}

/// The model the host uses for a device
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDevice {
    pub device: ZigbeeDevice,
    /// Name of the applied quirk, if any
    pub quirk: Option<String>,
}

/// Applies quirks and keeps the effective device models
pub struct QuirkHost {
    registry: Arc<QuirkRegistry>,
    /// Effective models (keyed by IEEE address)
    devices: Arc<DashMap<[u8; 8], EffectiveDevice>>,
    /// Event broadcaster
    event_tx: broadcast::Sender<QuirkEvent>,
}

impl QuirkHost {
    #[must_use]
    pub fn new(registry: Arc<QuirkRegistry>) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            registry,
            devices: Arc::new(DashMap::new()),
            event_tx,
        }
    }

    /// Match an interviewed device and record its effective model
    pub fn on_device_interviewed(&self, device: ZigbeeDevice) -> EffectiveDevice {
        let ieee_address = device.ieee_address;

        let effective = match self.registry.find(&device) {
            Some(quirk) => {
                tracing::info!(
                    "Applying quirk {} to {} ({})",
                    quirk.name,
                    device.display_name(),
                    device.ieee_address_string()
                );
                EffectiveDevice {
                    device: quirk.apply(&device),
                    quirk: Some(quirk.name.clone()),
                }
            }
            None => EffectiveDevice {
                device,
                quirk: None,
            },
        };

        self.devices.insert(ieee_address, effective.clone());

        let event = match effective.quirk {
            Some(ref quirk) => QuirkEvent::QuirkApplied {
                ieee_address,
                quirk: quirk.clone(),
            },
            None => QuirkEvent::NoQuirk { ieee_address },
        };
        let _ = self.event_tx.send(event);

        effective
    }

    /// Drop the effective model of a device that left the network
    pub fn on_device_left(&self, ieee_address: &[u8; 8]) -> Option<EffectiveDevice> {
        let removed = self.devices.remove(ieee_address).map(|(_, device)| device);
        if removed.is_some() {
            let _ = self.event_tx.send(QuirkEvent::DeviceLeft {
                ieee_address: *ieee_address,
            });
        }
        removed
    }

    /// Subscribe to quirk events
    pub fn subscribe(&self) -> broadcast::Receiver<QuirkEvent> {
        self.event_tx.subscribe()
    }

    /// Get the effective model of a device
    #[must_use]
    pub fn get_device(&self, ieee_address: &[u8; 8]) -> Option<EffectiveDevice> {
        self.devices.get(ieee_address).map(|r| r.value().clone())
    }

    /// Get all effective models
    #[must_use]
    pub fn get_devices(&self) -> Vec<EffectiveDevice> {
        self.devices.iter().map(|r| r.value().clone()).collect()
    }

    #[must_use]
    pub fn registry(&self) -> &QuirkRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchPolicy;
    use crate::quirks::gammatroniques::{MANUFACTURER, SMOKE_DETECTOR_MODEL};
    use zigbee_core::cluster::{id, profiles};
    use zigbee_core::{Endpoint, NodeDescriptor};

    fn host() -> QuirkHost {
        let registry = QuirkRegistry::with_builtin(MatchPolicy::FirstRegistered).unwrap();
        QuirkHost::new(Arc::new(registry))
    }

    fn device(ieee_address: [u8; 8], model: &str) -> ZigbeeDevice {
        let mut device = ZigbeeDevice::new(ieee_address, 0x2200);
        device.manufacturer = Some(MANUFACTURER.to_string());
        device.model = Some(model.to_string());
        device.node_descriptor = NodeDescriptor::parse(&[
            0x02, 0x40, 0x84, 0x13, 0x12, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03,
        ])
        .ok();
        device.endpoints.push(Endpoint {
            id: 10,
            profile_id: profiles::HA,
            device_id: 0x0402,
            in_clusters: vec![id::BASIC, id::POWER_CONFIG, id::IAS_ZONE],
            out_clusters: vec![],
        });
        device
    }

    #[tokio::test]
    async fn test_quirk_applied() {
        crate::init_test_tracing();
        let host = host();
        let mut rx = host.subscribe();
        let ieee = [1, 0, 0, 0, 0, 0, 0, 1];

        let effective = host.on_device_interviewed(device(ieee, SMOKE_DETECTOR_MODEL));
        assert_eq!(effective.quirk.as_deref(), Some("gammatroniques.SmokeDetector"));
        assert!(!effective.device.node_descriptor.unwrap().is_mains_powered());

        assert_eq!(
            rx.recv().await.unwrap(),
            QuirkEvent::QuirkApplied {
                ieee_address: ieee,
                quirk: "gammatroniques.SmokeDetector".to_string(),
            }
        );

        let stored = host.get_device(&ieee).unwrap();
        assert_eq!(stored.device.node_descriptor.unwrap().mac_capability_flags, 128);
    }

    #[tokio::test]
    async fn test_unmatched_device_kept_as_observed() {
        let host = host();
        let mut rx = host.subscribe();
        let ieee = [2, 0, 0, 0, 0, 0, 0, 2];

        let effective = host.on_device_interviewed(device(ieee, "CO Detector"));
        assert!(effective.quirk.is_none());
        assert_eq!(
            effective.device.node_descriptor.unwrap().mac_capability_flags,
            0x84
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            QuirkEvent::NoQuirk { ieee_address: ieee }
        );
    }

    #[tokio::test]
    async fn test_device_left() {
        let host = host();
        let ieee = [3, 0, 0, 0, 0, 0, 0, 3];
        host.on_device_interviewed(device(ieee, SMOKE_DETECTOR_MODEL));
        assert_eq!(host.get_devices().len(), 1);

        let mut rx = host.subscribe();
        assert!(host.on_device_left(&ieee).is_some());
        assert!(host.on_device_left(&ieee).is_none());
        assert!(host.get_device(&ieee).is_none());
        assert_eq!(
            rx.recv().await.unwrap(),
            QuirkEvent::DeviceLeft { ieee_address: ieee }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_interviews() {
        let host = Arc::new(host());
        let mut handles = Vec::new();
        for i in 0..16u8 {
            let host = Arc::clone(&host);
            handles.push(tokio::spawn(async move {
                host.on_device_interviewed(device([i; 8], SMOKE_DETECTOR_MODEL))
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().quirk.is_some());
        }
        assert_eq!(host.get_devices().len(), 16);
    }
}
