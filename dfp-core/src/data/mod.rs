//! Data types, signal sets and configuration

pub mod category;
pub mod components;
pub mod options;
pub mod types;

pub use category::SignalCategory;
pub use components::{AggregateSignalSet, CollectedValue};
pub use options::FingerprintOptions;
pub use types::{
    BasicInfo, BatteryInfo, ConnectionInfo, DeviceHardware, DeviceInfo, DeviceType,
    FeaturesInfo, HardwareInfo, IpInfo, NetworkInfo, ScreenInfo, Signal, StorageInfo,
};
