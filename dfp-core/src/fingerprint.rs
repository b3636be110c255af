//! Fingerprint orchestrator
//!
//! [`DeviceFingerprint`] owns the configuration, runs the enabled collectors
//! concurrently with failure isolation, assembles the [`AggregateSignalSet`],
//! digests it and caches the result.
//!
//! Every collector runs as its own tokio task under the configured timeout.
//! A collector that returns `Err`, panics or overruns its deadline is
//! recorded as the `"error"` sentinel for its category; the other categories
//! are unaffected and generation still succeeds. Only canonicalization or
//! hashing failures make [`DeviceFingerprint::generate`] fail.

use dfp_error::{FingerprintError, Result};
use parking_lot::RwLock;
use serde_json::json;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::collectors::{default_table, Collector, CollectorTable};
use crate::data::{AggregateSignalSet, CollectedValue, FingerprintOptions};
use crate::hash::{hash_object_with, HashAlgorithm};
use crate::logger::Logger;
use crate::platform::Platform;

/// Whether a digest is currently cached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintState {
    Idle,
    Cached,
}

pub struct DeviceFingerprint {
    options: FingerprintOptions,
    logger: Logger,
    table: CollectorTable,
    algorithm: HashAlgorithm,
    /// Last digest together with the signal set it was computed from
    latest: RwLock<(Option<String>, AggregateSignalSet)>,
    /// Serializes generation so concurrent callers share one run
    generation: Mutex<()>,
}

impl DeviceFingerprint {
    /// Orchestrator over the host platform
    pub fn new(options: FingerprintOptions) -> Result<Self> {
        Self::with_platform(options, Platform::native())
    }

    /// Orchestrator over an arbitrary source set
    pub fn with_platform(options: FingerprintOptions, platform: Platform) -> Result<Self> {
        let logger = Logger::new(options.debug);
        let table = default_table(&platform, logger);
        Self::with_collectors(options, table)
    }

    /// Orchestrator over an explicit collector table
    pub fn with_collectors(options: FingerprintOptions, table: CollectorTable) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            logger: Logger::new(options.debug),
            options,
            table,
            algorithm: HashAlgorithm::preferred(),
            latest: RwLock::new((None, AggregateSignalSet::new())),
            generation: Mutex::new(()),
        })
    }

    /// Digest with an explicit algorithm instead of the preferred one
    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn options(&self) -> &FingerprintOptions {
        &self.options
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// Last generated digest, if any, without generating
    pub fn cached(&self) -> Option<String> {
        self.latest.read().0.clone()
    }

    /// Idle until a digest exists; always Idle with caching disabled
    pub fn state(&self) -> FingerprintState {
        if self.options.cache && self.latest.read().0.is_some() {
            FingerprintState::Cached
        } else {
            FingerprintState::Idle
        }
    }

    /// Snapshot of the most recent Aggregate Signal Set
    ///
    /// Empty before the first generation.
    pub fn get_components(&self) -> AggregateSignalSet {
        self.latest.read().1.clone()
    }

    /// Last digest and the signal set it was computed from, read together
    pub fn latest(&self) -> (Option<String>, AggregateSignalSet) {
        self.latest.read().clone()
    }

    /// Produce the fingerprint, reusing the cached digest when caching is on
    pub async fn generate(&self) -> Result<String> {
        let _guard = self.generation.lock().await;

        if self.options.cache {
            if let Some(fingerprint) = self.cached() {
                self.logger.log("Using cached fingerprint", None);
                return Ok(fingerprint);
            }
        }

        let components = self.collect_components().await;
        let fingerprint = match hash_object_with(&components, self.algorithm) {
            Ok(fingerprint) => fingerprint,
            Err(e) => {
                self.logger
                    .error("Failed to generate fingerprint", Some(&json!(e.to_string())));
                return Err(e);
            }
        };

        *self.latest.write() = (Some(fingerprint.clone()), components);
        self.logger
            .log("Generated new fingerprint", Some(&json!(fingerprint)));
        Ok(fingerprint)
    }

    /// Run every enabled collector and gather results in table order
    ///
    /// The deadline is awaited outside the collector tasks, so a collector
    /// that blocks its worker thread still turns into `"error"` on time.
    async fn collect_components(&self) -> AggregateSignalSet {
        let timeout = self.options.timeout_duration();
        let deadline = Instant::now() + timeout;

        let handles: Vec<_> = self
            .table
            .iter()
            .filter(|(category, _)| self.options.includes(*category))
            .map(|(category, collector)| {
                debug!(category = %category, "Spawning collector");
                let collector = collector.clone();
                let task = tokio::spawn(async move { collector.collect().await });
                (*category, task)
            })
            .collect();

        let mut components = AggregateSignalSet::new();
        for (category, mut task) in handles {
            let outcome = match tokio::time::timeout_at(deadline, &mut task).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => Err(FingerprintError::collector(
                    category.as_str(),
                    format!("collector task aborted: {}", join_error),
                )),
                Err(_) => {
                    task.abort();
                    Err(FingerprintError::Timeout(format!(
                        "{} collector exceeded {} ms",
                        category,
                        timeout.as_millis()
                    )))
                }
            };
            let value = match outcome {
                Ok(signal) => CollectedValue::from(signal),
                Err(e) => {
                    self.logger.error(
                        &format!("Failed to collect {} information", category),
                        Some(&json!(e.to_string())),
                    );
                    CollectedValue::Error
                }
            };
            components.insert(category, value);
        }
        components
    }
}

impl std::fmt::Debug for DeviceFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceFingerprint")
            .field("options", &self.options)
            .field("algorithm", &self.algorithm)
            .field("collectors", &self.table.len())
            .field("state", &self.state())
            .finish()
    }
}
