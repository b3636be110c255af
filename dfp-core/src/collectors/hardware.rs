use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::{FingerprintError, Result};
use serde_json::json;

use super::Collector;
use crate::data::{HardwareInfo, Signal, SignalCategory};
use crate::logger::Logger;
use crate::platform::{HardwareSource, Probe};

/// Timezone, cores, memory, touch and battery
pub struct HardwareCollector {
    source: Arc<dyn HardwareSource>,
    logger: Logger,
}

impl HardwareCollector {
    pub fn new(source: Arc<dyn HardwareSource>, logger: Logger) -> Self {
        Self { source, logger }
    }
}

#[async_trait]
impl Collector for HardwareCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Hardware
    }

    async fn collect(&self) -> Result<Signal> {
        let battery_info = match self.source.battery().await {
            Probe::Supported(battery) => Some(battery),
            Probe::Unsupported => None,
            Probe::Failed(reason) => {
                let err = FingerprintError::probe("battery", reason);
                self.logger
                    .warn("Battery info not available", Some(&json!(err.to_string())));
                None
            }
        };

        Ok(HardwareInfo {
            timezone: self.source.timezone(),
            hardware_concurrency: self.source.hardware_concurrency().supported().unwrap_or(0),
            device_memory: self.source.device_memory().supported().unwrap_or(0.0),
            touch_support: self.source.touch_support(),
            battery_info,
        }
        .into())
    }
}
