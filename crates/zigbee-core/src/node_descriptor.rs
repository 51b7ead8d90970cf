//! ZDO node descriptor

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoded length of a node descriptor
pub const NODE_DESCRIPTOR_LEN: usize = 13;

/// Node descriptor errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NodeDescriptorError {
    #[error("Node descriptor too short: {0} bytes")]
    TooShort(usize),

    #[error("Field {field} value {value} does not fit in {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u8,
        bits: u8,
    },
}

/// Logical node type (bits 0-2 of the first descriptor byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalType {
    Coordinator,
    Router,
    EndDevice,
    Reserved(u8),
}

impl From<u8> for LogicalType {
    fn from(value: u8) -> Self {
        match value {
            0 => LogicalType::Coordinator,
            1 => LogicalType::Router,
            2 => LogicalType::EndDevice,
            v => LogicalType::Reserved(v),
        }
    }
}

/// MAC capability flag bits
pub mod mac_capability {
    pub const FULL_FUNCTION_DEVICE: u8 = 0b0000_0010;
    pub const MAINS_POWERED: u8 = 0b0000_0100;
    pub const RX_ON_WHEN_IDLE: u8 = 0b0000_1000;
    pub const ALLOCATE_ADDRESS: u8 = 0b1000_0000;
}

/// Frequency band bits
pub mod frequency_band {
    pub const GHZ_2_4: u8 = 0b0_1000;
}

/// Node descriptor as carried in a ZDO Node_Desc_rsp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// 3 bits
    pub logical_type: u8,
    /// 1 bit
    pub complex_descriptor_available: u8,
    /// 1 bit
    pub user_descriptor_available: u8,
    /// 3 bits
    pub reserved: u8,
    /// 3 bits
    pub aps_flags: u8,
    /// 5 bits
    pub frequency_band: u8,
    pub mac_capability_flags: u8,
    pub manufacturer_code: u16,
    pub maximum_buffer_size: u8,
    pub maximum_incoming_transfer_size: u16,
    pub server_mask: u16,
    pub maximum_outgoing_transfer_size: u16,
    pub descriptor_capability_field: u8,
}

impl NodeDescriptor {
    /// Parse a node descriptor from its 13-byte wire form
    pub fn parse(data: &[u8]) -> Result<Self, NodeDescriptorError> {
        if data.len() < NODE_DESCRIPTOR_LEN {
            return Err(NodeDescriptorError::TooShort(data.len()));
        }

        Ok(Self {
            logical_type: data[0] & 0x07,
            complex_descriptor_available: (data[0] >> 3) & 0x01,
            user_descriptor_available: (data[0] >> 4) & 0x01,
            reserved: (data[0] >> 5) & 0x07,
            aps_flags: data[1] & 0x07,
            frequency_band: (data[1] >> 3) & 0x1F,
            mac_capability_flags: data[2],
            manufacturer_code: u16::from_le_bytes([data[3], data[4]]),
            maximum_buffer_size: data[5],
            maximum_incoming_transfer_size: u16::from_le_bytes([data[6], data[7]]),
            server_mask: u16::from_le_bytes([data[8], data[9]]),
            maximum_outgoing_transfer_size: u16::from_le_bytes([data[10], data[11]]),
            descriptor_capability_field: data[12],
        })
    }

    /// Serialize to the 13-byte wire form
    ///
    /// Bitfields wider than their slot are masked; call [`Self::validate`]
    /// first to reject them instead.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; NODE_DESCRIPTOR_LEN] {
        let mut data = [0u8; NODE_DESCRIPTOR_LEN];
        data[0] = (self.logical_type & 0x07)
            | ((self.complex_descriptor_available & 0x01) << 3)
            | ((self.user_descriptor_available & 0x01) << 4)
            | ((self.reserved & 0x07) << 5);
        data[1] = (self.aps_flags & 0x07) | ((self.frequency_band & 0x1F) << 3);
        data[2] = self.mac_capability_flags;
        data[3..5].copy_from_slice(&self.manufacturer_code.to_le_bytes());
        data[5] = self.maximum_buffer_size;
        data[6..8].copy_from_slice(&self.maximum_incoming_transfer_size.to_le_bytes());
        data[8..10].copy_from_slice(&self.server_mask.to_le_bytes());
        data[10..12].copy_from_slice(&self.maximum_outgoing_transfer_size.to_le_bytes());
        data[12] = self.descriptor_capability_field;
        data
    }

    /// Check every bitfield fits its declared width
    pub fn validate(&self) -> Result<(), NodeDescriptorError> {
        let fields: [(&'static str, u8, u8); 6] = [
            ("logical_type", self.logical_type, 3),
            (
                "complex_descriptor_available",
                self.complex_descriptor_available,
                1,
            ),
            ("user_descriptor_available", self.user_descriptor_available, 1),
            ("reserved", self.reserved, 3),
            ("aps_flags", self.aps_flags, 3),
            ("frequency_band", self.frequency_band, 5),
        ];

        for (field, value, bits) in fields {
            if u16::from(value) >= (1u16 << bits) {
                return Err(NodeDescriptorError::FieldOverflow { field, value, bits });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn logical_type(&self) -> LogicalType {
        LogicalType::from(self.logical_type)
    }

    #[must_use]
    pub fn is_mains_powered(&self) -> bool {
        (self.mac_capability_flags & mac_capability::MAINS_POWERED) != 0
    }

    #[must_use]
    pub fn is_receiver_on_when_idle(&self) -> bool {
        (self.mac_capability_flags & mac_capability::RX_ON_WHEN_IDLE) != 0
    }

    #[must_use]
    pub fn is_full_function_device(&self) -> bool {
        (self.mac_capability_flags & mac_capability::FULL_FUNCTION_DEVICE) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeDescriptor {
        NodeDescriptor {
            logical_type: 2,
            complex_descriptor_available: 0,
            user_descriptor_available: 0,
            reserved: 0,
            aps_flags: 0,
            frequency_band: frequency_band::GHZ_2_4,
            mac_capability_flags: 0x84,
            manufacturer_code: 0x1213,
            maximum_buffer_size: 64,
            maximum_incoming_transfer_size: 0,
            server_mask: 0,
            maximum_outgoing_transfer_size: 0,
            descriptor_capability_field: 3,
        }
    }

    #[test]
    fn test_encode_layout() {
        let bytes = sample().to_bytes();
        assert_eq!(
            bytes,
            [0x02, 0x40, 0x84, 0x13, 0x12, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03]
        );
    }

    #[test]
    fn test_parse_matches_encode() {
        let desc = sample();
        assert_eq!(NodeDescriptor::parse(&desc.to_bytes()), Ok(desc));
    }

    #[test]
    fn test_parse_too_short() {
        let result = NodeDescriptor::parse(&[0x02, 0x40]);
        assert_eq!(result, Err(NodeDescriptorError::TooShort(2)));
    }

    #[test]
    fn test_capability_flags() {
        let desc = sample();
        assert!(desc.is_mains_powered());
        assert!(!desc.is_receiver_on_when_idle());
        assert!(!desc.is_full_function_device());
        assert_eq!(desc.logical_type(), LogicalType::EndDevice);

        let router = NodeDescriptor {
            logical_type: 1,
            mac_capability_flags: mac_capability::ALLOCATE_ADDRESS
                | mac_capability::RX_ON_WHEN_IDLE
                | mac_capability::MAINS_POWERED
                | mac_capability::FULL_FUNCTION_DEVICE,
            ..sample()
        };
        assert_eq!(router.mac_capability_flags, 0x8E);
        assert!(router.is_full_function_device());
        assert!(router.is_receiver_on_when_idle());
        assert_eq!(router.logical_type(), LogicalType::Router);
    }

    #[test]
    fn test_validate_field_overflow() {
        let mut desc = sample();
        assert!(desc.validate().is_ok());

        desc.frequency_band = 0x20;
        assert_eq!(
            desc.validate(),
            Err(NodeDescriptorError::FieldOverflow {
                field: "frequency_band",
                value: 0x20,
                bits: 5,
            })
        );
    }
}
