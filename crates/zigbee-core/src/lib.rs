//! Zigbee abstraction layer
//!
//! Shared vocabulary for Zigbee devices: cluster and profile identifiers,
//! the device/endpoint model a host builds during interview, and the ZDO
//! node descriptor.

pub mod cluster;
pub mod device;
pub mod node_descriptor;

pub use cluster::HaDeviceType;
pub use device::{DeviceType, Endpoint, ZigbeeDevice};
pub use node_descriptor::{LogicalType, NodeDescriptor, NodeDescriptorError};
