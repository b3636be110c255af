//! Collected signal records
//!
//! One record type per signal category. Field names serialize in camelCase
//! and optional sub-fields are omitted when absent, so the canonical text of a
//! record only depends on what was actually observed.

use serde::{Deserialize, Serialize};

use super::category::SignalCategory;

// ============================================================================
// Basic
// ============================================================================

/// Browser/host identity strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
}

// ============================================================================
// Screen
// ============================================================================

/// Primary display characteristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenInfo {
    pub color_depth: u32,
    /// "<width>x<height>"
    pub resolution: String,
    /// Orientation type, "unknown" when the platform has no orientation API
    pub orientation: String,
}

// ============================================================================
// Hardware
// ============================================================================

/// Battery state at sampling time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub charging: bool,
    /// Charge level in 0.0..=1.0
    pub level: f64,
}

/// Host hardware characteristics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareInfo {
    pub timezone: String,
    /// Logical core count, 0 when unknown
    pub hardware_concurrency: u32,
    /// Approximate memory in GB, 0 when unknown
    pub device_memory: f64,
    pub touch_support: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery_info: Option<BatteryInfo>,
}

// ============================================================================
// Network
// ============================================================================

/// Connection quality estimate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub effective_type: String,
    /// Mbit/s
    pub downlink: f64,
    /// Round trip time in ms
    pub rtt: f64,
}

/// Result of the remote IP/geolocation lookup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IpInfo {
    pub ip: String,
    pub country: String,
    pub region: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub connection: ConnectionInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_info: Option<IpInfo>,
}

// ============================================================================
// Features
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturesInfo {
    pub cookies_enabled: bool,
    /// Detected fonts, in candidate order
    pub fonts: Vec<String>,
    /// Rolling hash of the rendered probe scene, empty without a 2D context
    pub canvas: String,
    /// Rolling hash of GPU vendor/renderer, empty without WebGL
    pub webgl: String,
    pub audio_context: bool,
}

// ============================================================================
// Device
// ============================================================================

/// Coarse device class derived from the user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Tablet,
    Mobile,
    Desktop,
}

impl Default for DeviceType {
    fn default() -> Self {
        Self::Desktop
    }
}

impl DeviceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
        }
    }
}

/// Presence flags for optional hardware interfaces
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceHardware {
    pub bluetooth: bool,
    pub usb: bool,
    pub nfc: bool,
    pub vibration: bool,
}

/// Storage quota and usage in bytes, zeroed when unavailable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageInfo {
    pub quota: f64,
    pub usage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub hardware: DeviceHardware,
    pub storage: StorageInfo,
}

// ============================================================================
// Signal
// ============================================================================

/// A successfully collected record for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Signal {
    Basic(BasicInfo),
    Screen(ScreenInfo),
    Hardware(HardwareInfo),
    Network(NetworkInfo),
    Features(FeaturesInfo),
    Device(DeviceInfo),
}

impl Signal {
    /// Category this record belongs to
    pub fn category(&self) -> SignalCategory {
        match self {
            Self::Basic(_) => SignalCategory::Basic,
            Self::Screen(_) => SignalCategory::Screen,
            Self::Hardware(_) => SignalCategory::Hardware,
            Self::Network(_) => SignalCategory::Network,
            Self::Features(_) => SignalCategory::Features,
            Self::Device(_) => SignalCategory::Device,
        }
    }
}

impl From<BasicInfo> for Signal {
    fn from(v: BasicInfo) -> Self {
        Self::Basic(v)
    }
}

impl From<ScreenInfo> for Signal {
    fn from(v: ScreenInfo) -> Self {
        Self::Screen(v)
    }
}

impl From<HardwareInfo> for Signal {
    fn from(v: HardwareInfo) -> Self {
        Self::Hardware(v)
    }
}

impl From<NetworkInfo> for Signal {
    fn from(v: NetworkInfo) -> Self {
        Self::Network(v)
    }
}

impl From<FeaturesInfo> for Signal {
    fn from(v: FeaturesInfo) -> Self {
        Self::Features(v)
    }
}

impl From<DeviceInfo> for Signal {
    fn from(v: DeviceInfo) -> Self {
        Self::Device(v)
    }
}
