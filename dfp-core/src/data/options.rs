//! Orchestrator configuration

use std::time::Duration;

use dfp_error::{FingerprintError, Result};
use serde::{Deserialize, Serialize};

use super::category::SignalCategory;
use crate::constants::defaults;

fn default_cache() -> bool {
    defaults::CACHE
}

fn default_timeout() -> u64 {
    defaults::TIMEOUT_MS
}

fn default_debug() -> bool {
    defaults::DEBUG
}

/// Configuration for a [`crate::DeviceFingerprint`] instance
///
/// Every field is optional when deserialized; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FingerprintOptions {
    /// Reuse the first computed fingerprint (default true)
    #[serde(default = "default_cache")]
    pub cache: bool,
    /// Per-collector deadline in milliseconds (default 5000)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Categories to collect; `None` collects all of them
    #[serde(default)]
    pub components: Option<Vec<SignalCategory>>,
    /// Emit informational diagnostics (default false)
    #[serde(default = "default_debug")]
    pub debug: bool,
}

impl Default for FingerprintOptions {
    fn default() -> Self {
        Self {
            cache: default_cache(),
            timeout: default_timeout(),
            components: None,
            debug: default_debug(),
        }
    }
}

impl FingerprintOptions {
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_components(mut self, components: impl IntoIterator<Item = SignalCategory>) -> Self {
        self.components = Some(components.into_iter().collect());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Whether the component filter admits this category
    pub fn includes(&self, category: SignalCategory) -> bool {
        match &self.components {
            Some(list) => list.contains(&category),
            None => true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(FingerprintError::invalid_config(
                "timeout",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
