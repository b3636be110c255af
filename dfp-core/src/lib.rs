//! devicefp Core Library
//!
//! Samples a fixed set of environment signals and reduces them to one
//! deterministic digest usable as a cookie-independent correlation key.
//!
//! # Features
//!
//! - **Collectors**: six independent signal collectors (basic, screen,
//!   hardware, network, features, device) with per-probe fallbacks
//! - **Failure Isolation**: a failing, panicking or slow collector only
//!   turns its own category into `"error"`
//! - **Canonical Digests**: order-preserving canonical JSON hashed with
//!   truncated SHA-256 (or the legacy rolling hash)
//! - **Pluggable Platforms**: host OS sources, captured snapshots, or
//!   mock sources in tests
//!
//! # Module Structure
//!
//! - `data/` - Signal records, the Aggregate Signal Set, options
//! - `platform/` - Signal source traits and their implementations
//! - `collectors/` - One collector per signal category
//!
//! # Example
//!
//! ```no_run
//! use dfp_core::{DeviceFingerprint, FingerprintOptions, SignalCategory};
//!
//! # async fn run() -> dfp_core::Result<()> {
//! let options = FingerprintOptions::default()
//!     .with_components([SignalCategory::Basic, SignalCategory::Hardware]);
//! let fingerprint = DeviceFingerprint::new(options)?;
//! let digest = fingerprint.generate().await?;
//! println!("{}", digest);
//! # Ok(())
//! # }
//! ```

// Grouped modules
pub mod collectors;
pub mod data;
pub mod platform;

// Standalone modules
pub mod constants;
pub mod fingerprint;
pub mod hash;
pub mod logger;

pub use dfp_error::{FingerprintError, Result};

pub use collectors::{classify_device_type, default_table, Collector, CollectorTable};
pub use data::{
    AggregateSignalSet, BasicInfo, BatteryInfo, CollectedValue, ConnectionInfo, DeviceHardware,
    DeviceInfo, DeviceType, FeaturesInfo, FingerprintOptions, HardwareInfo, IpInfo, NetworkInfo,
    ScreenInfo, Signal, SignalCategory, StorageInfo,
};
pub use fingerprint::{DeviceFingerprint, FingerprintState};
pub use hash::{canonicalize, hash_object, hash_object_with, hash_string, rolling_hash, HashAlgorithm};
pub use logger::Logger;
pub use platform::{NativePlatform, Platform, PlatformSnapshot, Probe, SnapshotPlatform};
