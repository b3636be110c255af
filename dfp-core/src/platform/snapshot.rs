//! Signal sources replayed from a captured snapshot
//!
//! A [`PlatformSnapshot`] is a plain JSON document describing what a device
//! reported: identity strings, display, hardware, connection, fonts and the
//! raw rendering readback. Absent optional fields behave like a platform that
//! lacks the capability.

use std::path::Path;

use async_trait::async_trait;
use dfp_error::{FingerprintError, Result};
use serde::{Deserialize, Serialize};

use super::render::{DebugRendererInfo, RecordedSurface, RenderSurface};
use super::{
    BasicSource, ConnectionEstimate, DeviceSource, FeaturesSource, HardwareCapability,
    HardwareSource, NetworkSource, Probe, ScreenSource, StorageEstimate,
};
use crate::constants::fallback;
use crate::data::{BatteryInfo, IpInfo};

fn default_language() -> String {
    fallback::LANGUAGE.to_string()
}

fn default_timezone() -> String {
    fallback::TIMEZONE.to_string()
}

/// Everything a device reported, as captured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlatformSnapshot {
    pub user_agent: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub platform: String,

    pub color_depth: u32,
    pub screen_width: u32,
    pub screen_height: u32,
    pub orientation: Option<String>,

    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub hardware_concurrency: Option<u32>,
    pub device_memory: Option<f64>,
    pub touch_support: bool,
    pub battery: Option<BatteryInfo>,

    pub connection: Option<ConnectionEstimate>,
    pub ip_info: Option<IpInfo>,

    pub cookies_enabled: bool,
    /// Installed font families, matched case-insensitively
    pub fonts: Vec<String>,
    /// RGBA readback of the probe scene, absent without a 2D context
    pub canvas_pixels: Option<Vec<u8>>,
    pub webgl: Option<DebugRendererInfo>,
    pub audio_context: bool,

    pub bluetooth: bool,
    pub usb: bool,
    pub nfc: bool,
    pub vibration: bool,
    pub storage: Option<StorageEstimate>,
}

impl Default for PlatformSnapshot {
    fn default() -> Self {
        Self {
            user_agent: String::new(),
            language: default_language(),
            platform: String::new(),
            color_depth: 0,
            screen_width: 0,
            screen_height: 0,
            orientation: None,
            timezone: default_timezone(),
            hardware_concurrency: None,
            device_memory: None,
            touch_support: false,
            battery: None,
            connection: None,
            ip_info: None,
            cookies_enabled: false,
            fonts: Vec::new(),
            canvas_pixels: None,
            webgl: None,
            audio_context: false,
            bluetooth: false,
            usb: false,
            nfc: false,
            vibration: false,
            storage: None,
        }
    }
}

impl PlatformSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| FingerprintError::file_read(path, e))?;
        Self::from_json(&content)
    }
}

/// Source set answering from a [`PlatformSnapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotPlatform {
    snapshot: PlatformSnapshot,
}

impl SnapshotPlatform {
    pub fn new(snapshot: PlatformSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &PlatformSnapshot {
        &self.snapshot
    }
}

impl BasicSource for SnapshotPlatform {
    fn user_agent(&self) -> String {
        self.snapshot.user_agent.clone()
    }

    fn language(&self) -> String {
        self.snapshot.language.clone()
    }

    fn platform(&self) -> String {
        self.snapshot.platform.clone()
    }
}

impl ScreenSource for SnapshotPlatform {
    fn color_depth(&self) -> u32 {
        self.snapshot.color_depth
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.snapshot.screen_width, self.snapshot.screen_height)
    }

    fn orientation(&self) -> Probe<String> {
        Probe::from_option(self.snapshot.orientation.clone())
    }
}

#[async_trait]
impl HardwareSource for SnapshotPlatform {
    fn timezone(&self) -> String {
        self.snapshot.timezone.clone()
    }

    fn hardware_concurrency(&self) -> Probe<u32> {
        Probe::from_option(self.snapshot.hardware_concurrency)
    }

    fn device_memory(&self) -> Probe<f64> {
        Probe::from_option(self.snapshot.device_memory)
    }

    fn touch_support(&self) -> bool {
        self.snapshot.touch_support
    }

    async fn battery(&self) -> Probe<BatteryInfo> {
        Probe::from_option(self.snapshot.battery.clone())
    }
}

#[async_trait]
impl NetworkSource for SnapshotPlatform {
    fn connection(&self) -> Probe<ConnectionEstimate> {
        Probe::from_option(self.snapshot.connection.clone())
    }

    async fn ip_info(&self) -> Probe<IpInfo> {
        Probe::from_option(self.snapshot.ip_info.clone())
    }
}

#[async_trait]
impl FeaturesSource for SnapshotPlatform {
    fn cookies_enabled(&self) -> bool {
        self.snapshot.cookies_enabled
    }

    async fn check_font(&self, query: &str) -> Probe<bool> {
        let query = query.to_lowercase();
        let found = self.snapshot.fonts.iter().any(|font| {
            let quoted = format!("\"{}\"", font.to_lowercase());
            query.contains(&quoted)
        });
        Probe::Supported(found)
    }

    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RenderSurface> {
        Box::new(RecordedSurface::new(
            width,
            height,
            self.snapshot.canvas_pixels.clone(),
            self.snapshot.webgl.clone(),
        ))
    }

    fn audio_context(&self) -> bool {
        self.snapshot.audio_context
    }
}

#[async_trait]
impl DeviceSource for SnapshotPlatform {
    fn user_agent(&self) -> String {
        self.snapshot.user_agent.clone()
    }

    fn capability(&self, capability: HardwareCapability) -> Probe<()> {
        let present = match capability {
            HardwareCapability::Bluetooth => self.snapshot.bluetooth,
            HardwareCapability::Usb => self.snapshot.usb,
            HardwareCapability::Nfc => self.snapshot.nfc,
            HardwareCapability::Vibration => self.snapshot.vibration,
        };
        if present {
            Probe::Supported(())
        } else {
            Probe::Unsupported
        }
    }

    async fn storage_estimate(&self) -> Probe<StorageEstimate> {
        Probe::from_option(self.snapshot.storage.clone())
    }
}
