use std::sync::Arc;

use async_trait::async_trait;
use dfp_error::Result;

use super::Collector;
use crate::data::{BasicInfo, Signal, SignalCategory};
use crate::platform::BasicSource;

/// User agent, locale and platform string
pub struct BasicCollector {
    source: Arc<dyn BasicSource>,
}

impl BasicCollector {
    pub fn new(source: Arc<dyn BasicSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Collector for BasicCollector {
    fn category(&self) -> SignalCategory {
        SignalCategory::Basic
    }

    async fn collect(&self) -> Result<Signal> {
        Ok(BasicInfo {
            user_agent: self.source.user_agent(),
            language: self.source.language(),
            platform: self.source.platform(),
        }
        .into())
    }
}
