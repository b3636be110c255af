use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use dfp_error::{FingerprintError, Result};
use regex::Regex;
use serde_json::json;

use super::Collector;
use crate::data::{DeviceHardware, DeviceInfo, DeviceType, Signal, SignalCategory, StorageInfo};
use crate::logger::Logger;
use crate::platform::{DeviceSource, HardwareCapability, Probe};

// ASCII-only case folding: no Kelvin sign for `k`, no long s for `s`
const TABLET_PATTERN: &str = r"(?i-u)tablet|ipad|playbook|silk";
const MOBILE_PATTERN: &str =
    r"Mobile|Android|iP(hone|od)|IEMobile|BlackBerry|Kindle|Silk-Accelerated|(hpw|web)OS|Opera M(obi|ini)";

static TABLET_RE: OnceLock<Option<Regex>> = OnceLock::new();
static MOBILE_RE: OnceLock<Option<Regex>> = OnceLock::new();

fn is_match(cell: &'static OnceLock<Option<Regex>>, pattern: &str, text: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .map(|re| re.is_match(text))
        .unwrap_or(false)
}

/// Characters that end a line for the `mobi` scan
const LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// An "android" with no "mobi" after it on the same line
fn is_android_tablet(user_agent: &str) -> bool {
    let lower = user_agent.to_ascii_lowercase();
    lower.match_indices("android").any(|(pos, word)| {
        let rest = &lower[pos + word.len()..];
        let line = rest.split(&LINE_TERMINATORS[..]).next().unwrap_or_default();
        !line.contains("mobi")
    })
}

/// Device class from a user agent string; tablet wins over mobile
pub fn classify_device_type(user_agent: &str) -> DeviceType {
    if is_match(&TABLET_RE, TABLET_PATTERN, user_agent) || is_android_tablet(user_agent) {
        DeviceType::Tablet
    } else if is_match(&MOBILE_RE, MOBILE_PATTERN, user_agent) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

/// Device class, hardware interface flags and storage estimate
pub struct DeviceCollector {
    source: Arc<dyn DeviceSource>,
    logger: Logger,
}

impl DeviceCollector {
    pub fn new(source: Arc<dyn DeviceSource>, logger: Logger) -> Self {
        Self { source, logger }
    }

    fn has(&self, capability: HardwareCapability) -> bool {
        self.source.capability(capability).is_supported()
    }
}

#[async_trait]
impl Collector for DeviceCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Device
    }

    async fn collect(&self) -> Result<Signal> {
        let storage = match self.source.storage_estimate().await {
            Probe::Supported(estimate) => StorageInfo {
                quota: estimate.quota.unwrap_or(0.0),
                usage: estimate.usage.unwrap_or(0.0),
            },
            Probe::Unsupported => StorageInfo::default(),
            Probe::Failed(reason) => {
                let err = FingerprintError::probe("storage_estimate", reason);
                self.logger
                    .warn("Storage info not available", Some(&json!(err.to_string())));
                StorageInfo::default()
            }
        };

        Ok(DeviceInfo {
            device_type: classify_device_type(&self.source.user_agent()),
            hardware: DeviceHardware {
                bluetooth: self.has(HardwareCapability::Bluetooth),
                usb: self.has(HardwareCapability::Usb),
                nfc: self.has(HardwareCapability::Nfc),
                vibration: self.has(HardwareCapability::Vibration),
            },
            storage,
        }
        .into())
    }
}
