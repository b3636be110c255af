//! Signal collectors
//!
//! One collector per [`SignalCategory`]. Each holds an `Arc` to its signal
//! source and turns raw probes into the category record, absorbing probe
//! failures into fallbacks. The orchestrator iterates an explicit
//! [`CollectorTable`] in declaration order.

mod basic;
mod device;
mod features;
mod hardware;
mod network;
mod screen;

use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::Result;

use crate::data::{Signal, SignalCategory};
use crate::logger::Logger;
use crate::platform::Platform;

pub use basic::BasicCollector;
pub use device::{classify_device_type, DeviceCollector};
pub use features::{detect_fonts, FeaturesCollector};
pub use hardware::HardwareCollector;
pub use network::NetworkCollector;
pub use screen::ScreenCollector;

/// A producer of one category record
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Collector: Send + Sync {
    fn category(&self) -> SignalCategory;
    async fn collect(&self) -> Result<Signal>;
}

/// Ordered `(category, collector)` pairs run by the orchestrator
pub type CollectorTable = Vec<(SignalCategory, Arc<dyn Collector>)>;

/// The six built-in collectors over `platform`, in declaration order
pub fn default_table(platform: &Platform, logger: Logger) -> CollectorTable {
    let collectors: [Arc<dyn Collector>; 6] = [
        Arc::new(BasicCollector::new(platform.basic.clone())),
        Arc::new(ScreenCollector::new(platform.screen.clone())),
        Arc::new(HardwareCollector::new(platform.hardware.clone(), logger)),
        Arc::new(NetworkCollector::new(platform.network.clone(), logger)),
        Arc::new(FeaturesCollector::new(platform.features.clone())),
        Arc::new(DeviceCollector::new(platform.device.clone(), logger)),
    ];
    collectors
        .into_iter()
        .map(|collector| (collector.category(), collector))
        .collect()
}
