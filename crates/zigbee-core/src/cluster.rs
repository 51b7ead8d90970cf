//! ZCL (Zigbee Cluster Library) definitions

/// Common ZCL cluster IDs
pub mod id {
    // General Clusters
    pub const BASIC: u16 = 0x0000;
    pub const POWER_CONFIG: u16 = 0x0001;
    pub const DEVICE_TEMP: u16 = 0x0002;
    pub const IDENTIFY: u16 = 0x0003;
    pub const GROUPS: u16 = 0x0004;
    pub const SCENES: u16 = 0x0005;
    pub const ON_OFF: u16 = 0x0006;
    pub const LEVEL_CONTROL: u16 = 0x0008;
    pub const ALARMS: u16 = 0x0009;
    pub const TIME: u16 = 0x000A;
    pub const OTA: u16 = 0x0019;
    pub const POLL_CONTROL: u16 = 0x0020;
    pub const GREEN_POWER_PROXY: u16 = 0x0021;

    // Measurement Clusters
    pub const TEMPERATURE_MEASUREMENT: u16 = 0x0402;
    pub const HUMIDITY_MEASUREMENT: u16 = 0x0405;
    pub const OCCUPANCY_SENSING: u16 = 0x0406;

    // Security Clusters
    pub const IAS_ZONE: u16 = 0x0500;
    pub const IAS_ACE: u16 = 0x0501;
    pub const IAS_WD: u16 = 0x0502;

    // Smart Energy
    pub const METERING: u16 = 0x0702;

    // Home Automation
    pub const METER_IDENTIFICATION: u16 = 0x0B01;
    pub const ELECTRICAL_MEASUREMENT: u16 = 0x0B04;

    // Manufacturer specific range
    pub const MANUFACTURER_SPECIFIC_FIRST: u16 = 0xFC00;
    pub const MANUFACTURER_SPECIFIC_LAST: u16 = 0xFFFF;
}

/// Check whether a cluster ID lies in the manufacturer-specific range
#[must_use]
pub fn is_manufacturer_specific(cluster_id: u16) -> bool {
    cluster_id >= id::MANUFACTURER_SPECIFIC_FIRST
}

/// Application profile IDs
pub mod profiles {
    /// Zigbee Device Object
    pub const ZDO: u16 = 0x0000;
    /// Zigbee Home Automation
    pub const HA: u16 = 0x0104;
    /// Zigbee Green Power
    pub const ZGP: u16 = 0xA1E0;
}

/// Home Automation profile device types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum HaDeviceType {
    OnOffSwitch = 0x0000,
    LevelControlSwitch = 0x0001,
    OnOffOutput = 0x0002,
    RemoteControl = 0x0006,
    SimpleSensor = 0x000C,
    SmartPlug = 0x0051,
    MeterInterface = 0x0053,
    OnOffLight = 0x0100,
    DimmableLight = 0x0101,
    ColorDimmableLight = 0x0102,
    TemperatureSensor = 0x0302,
    IasControl = 0x0400,
    IasAncillaryControl = 0x0401,
    IasZone = 0x0402,
    IasWarningDevice = 0x0403,
}

impl From<HaDeviceType> for u16 {
    fn from(value: HaDeviceType) -> Self {
        value as u16
    }
}

impl TryFrom<u16> for HaDeviceType {
    type Error = u16;

    fn try_from(value: u16) -> Result<Self, u16> {
        match value {
            0x0000 => Ok(HaDeviceType::OnOffSwitch),
            0x0001 => Ok(HaDeviceType::LevelControlSwitch),
            0x0002 => Ok(HaDeviceType::OnOffOutput),
            0x0006 => Ok(HaDeviceType::RemoteControl),
            0x000C => Ok(HaDeviceType::SimpleSensor),
            0x0051 => Ok(HaDeviceType::SmartPlug),
            0x0053 => Ok(HaDeviceType::MeterInterface),
            0x0100 => Ok(HaDeviceType::OnOffLight),
            0x0101 => Ok(HaDeviceType::DimmableLight),
            0x0102 => Ok(HaDeviceType::ColorDimmableLight),
            0x0302 => Ok(HaDeviceType::TemperatureSensor),
            0x0400 => Ok(HaDeviceType::IasControl),
            0x0401 => Ok(HaDeviceType::IasAncillaryControl),
            0x0402 => Ok(HaDeviceType::IasZone),
            0x0403 => Ok(HaDeviceType::IasWarningDevice),
            _ => Err(value),
        }
    }
}
