//! GammaTroniques devices

use crate::quirk::QuirkDescriptor;
use crate::signature::{EndpointReplacement, EndpointSignature, ModelInfo, Replacement, Signature};
use std::collections::BTreeMap;
use zigbee_core::cluster::{id, profiles, HaDeviceType};
use zigbee_core::node_descriptor::frequency_band;
use zigbee_core::NodeDescriptor;

pub const MANUFACTURER: &str = "GammaTroniques";
pub const SMOKE_DETECTOR_MODEL: &str = "Smoke Detector";

/// Endpoint carrying the smoke sensor clusters
pub const SMOKE_DETECTOR_ENDPOINT: u8 = 10;

/// Corrected MAC capability flags for the smoke detector.
///
/// The firmware announces 132 (0x84, allocate address | mains powered), but
/// the detector runs on batteries: bit 2 (mains powered) is cleared, 132 & 0b1111_1011.
pub const SMOKE_DETECTOR_MAC_CAPABILITY_FLAGS: u8 = 128;

/// Manufacturer code announced by the firmware
pub const SMOKE_DETECTOR_MANUFACTURER_CODE: u16 = 4627;

fn smoke_detector_clusters() -> Vec<u16> {
    vec![id::BASIC, id::POWER_CONFIG, id::IAS_ZONE]
}

/// Battery-powered end device on 2.4 GHz
fn smoke_detector_node_descriptor() -> NodeDescriptor {
    NodeDescriptor {
        logical_type: 2,
        complex_descriptor_available: 0,
        user_descriptor_available: 0,
        reserved: 0,
        aps_flags: 0,
        frequency_band: frequency_band::GHZ_2_4,
        mac_capability_flags: SMOKE_DETECTOR_MAC_CAPABILITY_FLAGS,
        manufacturer_code: SMOKE_DETECTOR_MANUFACTURER_CODE,
        maximum_buffer_size: 64,
        maximum_incoming_transfer_size: 0,
        server_mask: 0,
        maximum_outgoing_transfer_size: 0,
        descriptor_capability_field: 3,
    }
}

/// GammaTroniques battery smoke detector
#[must_use]
pub fn smoke_detector() -> QuirkDescriptor {
    QuirkDescriptor {
        name: "gammatroniques.SmokeDetector".to_string(),
        signature: Signature {
            models_info: vec![ModelInfo::new(MANUFACTURER, SMOKE_DETECTOR_MODEL)],
            endpoints: BTreeMap::from([(
                SMOKE_DETECTOR_ENDPOINT,
                EndpointSignature {
                    profile_id: Some(profiles::HA),
                    device_type: Some(HaDeviceType::IasZone.into()),
                    input_clusters: Some(smoke_detector_clusters()),
                    output_clusters: None,
                },
            )]),
            node_descriptor: None,
        },
        replacement: Replacement {
            manufacturer: None,
            model: None,
            endpoints: BTreeMap::from([(
                SMOKE_DETECTOR_ENDPOINT,
                EndpointReplacement {
                    profile_id: Some(profiles::HA),
                    device_type: Some(HaDeviceType::IasZone.into()),
                    input_clusters: smoke_detector_clusters(),
                    output_clusters: Vec::new(),
                },
            )]),
            node_descriptor: Some(smoke_detector_node_descriptor()),
        },
    }
}
