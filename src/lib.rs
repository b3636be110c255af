/*
 * This file is part of devicefp.
 *
 * Copyright (C) 2025 devicefp contributors
 *
 * devicefp is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * devicefp is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with devicefp. If not, see <https://www.gnu.org/licenses/>.
 */

//! devicefp - device fingerprinting from environment signals
//!
//! Re-exports the core pipeline and adds the application layer: options
//! loading from the user config file and environment, tracing setup, and a
//! lazily-built shared instance.

pub mod config;
pub mod logger;

use lazy_static::lazy_static;

pub use dfp_core::*;

lazy_static! {
    static ref SHARED: std::result::Result<DeviceFingerprint, String> = config::load_options()
        .and_then(DeviceFingerprint::new)
        .map_err(|e| e.to_string());
}

/// Process-wide instance over the host platform, built on first use
///
/// Options come from [`config::load_options`] at that moment. A configuration
/// error is reported on every call.
pub fn shared() -> Result<&'static DeviceFingerprint> {
    SHARED.as_ref().map_err(|e| FingerprintError::config(e.clone()))
}

/// Generate with the shared instance
pub async fn generate() -> Result<String> {
    shared()?.generate().await
}
