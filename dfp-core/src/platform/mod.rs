//! Platform signal sources
//!
//! Every platform API the collectors read is behind one trait per category.
//! Optional capabilities are explicit probes returning a tri-state
//! [`Probe`], so "not available here" and "tried and failed" stay distinct
//! and each probe can be replaced by a fake in tests.
//!
//! Two source sets ship with the crate:
//!
//! - [`NativePlatform`] answers from the host OS (`/proc`, `/sys`, env,
//!   `statvfs`, an HTTP lookup)
//! - [`SnapshotPlatform`] answers from a deserialized [`PlatformSnapshot`]

pub mod native;
pub mod render;
pub mod snapshot;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data::{BatteryInfo, IpInfo};

pub use native::NativePlatform;
pub use render::{
    canvas_fingerprint, webgl_fingerprint, Canvas2d, DebugRendererInfo, NullSurface,
    RecordedSurface, RenderSurface, WebGlContext,
};
pub use snapshot::{PlatformSnapshot, SnapshotPlatform};

// ============================================================================
// Probe
// ============================================================================

/// Result of querying an optional platform capability
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    /// Capability present, value read
    Supported(T),
    /// Capability absent on this platform (expected, not an error)
    Unsupported,
    /// Capability present but the read failed
    Failed(String),
}

impl<T> Probe<T> {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }

    /// The value if supported, discarding the reason otherwise
    pub fn supported(self) -> Option<T> {
        match self {
            Self::Supported(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Probe<U> {
        match self {
            Self::Supported(v) => Probe::Supported(f(v)),
            Self::Unsupported => Probe::Unsupported,
            Self::Failed(reason) => Probe::Failed(reason),
        }
    }

    /// Supported on `Some`, unsupported on `None`
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Supported(v),
            None => Self::Unsupported,
        }
    }
}

// ============================================================================
// Raw probe payloads
// ============================================================================

/// Network Information API values, each possibly missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionEstimate {
    pub effective_type: Option<String>,
    pub downlink: Option<f64>,
    pub rtt: Option<f64>,
}

/// Storage estimate in bytes, each possibly missing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageEstimate {
    pub quota: Option<f64>,
    pub usage: Option<f64>,
}

/// Optional hardware interfaces checked by the device collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareCapability {
    Bluetooth,
    Usb,
    Nfc,
    Vibration,
}

// ============================================================================
// Source traits
// ============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait BasicSource: Send + Sync {
    fn user_agent(&self) -> String;
    fn language(&self) -> String;
    fn platform(&self) -> String;
}

#[cfg_attr(test, mockall::automock)]
pub trait ScreenSource: Send + Sync {
    fn color_depth(&self) -> u32;
    /// (width, height) in pixels
    fn dimensions(&self) -> (u32, u32);
    fn orientation(&self) -> Probe<String>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HardwareSource: Send + Sync {
    /// IANA timezone name
    fn timezone(&self) -> String;
    fn hardware_concurrency(&self) -> Probe<u32>;
    /// Approximate memory in GB
    fn device_memory(&self) -> Probe<f64>;
    fn touch_support(&self) -> bool;
    async fn battery(&self) -> Probe<BatteryInfo>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkSource: Send + Sync {
    fn connection(&self) -> Probe<ConnectionEstimate>;
    /// Remote IP/geolocation lookup, best-effort
    async fn ip_info(&self) -> Probe<IpInfo>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeaturesSource: Send + Sync {
    fn cookies_enabled(&self) -> bool;
    /// Check a CSS font query such as `12px "Arial", monospace`
    async fn check_font(&self, query: &str) -> Probe<bool>;
    /// A fresh off-screen surface, never reused between calls
    fn create_surface(&self, width: u32, height: u32) -> Box<dyn RenderSurface>;
    fn audio_context(&self) -> bool;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceSource: Send + Sync {
    fn user_agent(&self) -> String;
    fn capability(&self, capability: HardwareCapability) -> Probe<()>;
    async fn storage_estimate(&self) -> Probe<StorageEstimate>;
}

// ============================================================================
// Platform bundle
// ============================================================================

/// One source per category, shared by the collectors
#[derive(Clone)]
pub struct Platform {
    pub basic: Arc<dyn BasicSource>,
    pub screen: Arc<dyn ScreenSource>,
    pub hardware: Arc<dyn HardwareSource>,
    pub network: Arc<dyn NetworkSource>,
    pub features: Arc<dyn FeaturesSource>,
    pub device: Arc<dyn DeviceSource>,
}

impl Platform {
    /// Use a single type that implements every source trait
    pub fn from_source<S>(source: Arc<S>) -> Self
    where
        S: BasicSource
            + ScreenSource
            + HardwareSource
            + NetworkSource
            + FeaturesSource
            + DeviceSource
            + 'static,
    {
        Self {
            basic: source.clone(),
            screen: source.clone(),
            hardware: source.clone(),
            network: source.clone(),
            features: source.clone(),
            device: source,
        }
    }

    /// Sources backed by the host operating system
    pub fn native() -> Self {
        Self::from_source(Arc::new(NativePlatform::new()))
    }

    /// Sources backed by a captured snapshot
    pub fn snapshot(snapshot: PlatformSnapshot) -> Self {
        Self::from_source(Arc::new(SnapshotPlatform::new(snapshot)))
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
