use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::Result;

use super::Collector;
use crate::constants::fallback;
use crate::data::{ScreenInfo, Signal, SignalCategory};
use crate::platform::{Probe, ScreenSource};

/// Color depth, resolution and orientation of the primary display
pub struct ScreenCollector {
    source: Arc<dyn ScreenSource>,
}

impl ScreenCollector {
    pub fn new(source: Arc<dyn ScreenSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Collector for ScreenCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Screen
    }

    async fn collect(&self) -> Result<Signal> {
        let (width, height) = self.source.dimensions();
        let orientation = match self.source.orientation() {
            Probe::Supported(o) => o,
            _ => fallback::ORIENTATION.to_string(),
        };

        Ok(ScreenInfo {
            color_depth: self.source.color_depth(),
            resolution: format!("{}x{}", width, height),
            orientation,
        }
        .into())
    }
}
