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

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use dfp_core::{FingerprintError, FingerprintOptions, Result, SignalCategory};

pub const ENV_DEBUG: &str = "DEVICEFP_DEBUG";
pub const ENV_CACHE: &str = "DEVICEFP_CACHE";
pub const ENV_TIMEOUT_MS: &str = "DEVICEFP_TIMEOUT_MS";
pub const ENV_COMPONENTS: &str = "DEVICEFP_COMPONENTS";

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("devicefp").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home)
            .join(".config")
            .join("devicefp")
            .join("config.json");
    }
    PathBuf::from("/etc/devicefp/config.json")
}

/// Options from the user config file (if any) plus environment overrides
///
/// A missing config file is not an error; a malformed one is.
pub fn load_options() -> Result<FingerprintOptions> {
    let path = config_path();
    let options = match fs::read_to_string(&path) {
        Ok(data) => parse_options(&data)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => FingerprintOptions::default(),
        Err(e) => return Err(FingerprintError::file_read(path, e)),
    };
    let options = apply_env_overrides(options, |key| env::var(key).ok())?;
    options.validate()?;
    Ok(options)
}

/// Options from an explicit file, without environment overrides
pub fn load_options_from(path: &Path) -> Result<FingerprintOptions> {
    let data = fs::read_to_string(path).map_err(|e| FingerprintError::file_read(path, e))?;
    let options = parse_options(&data)?;
    options.validate()?;
    Ok(options)
}

fn parse_options(data: &str) -> Result<FingerprintOptions> {
    Ok(serde_json::from_str(data)?)
}

/// Apply `DEVICEFP_*` overrides read through `lookup`
pub fn apply_env_overrides<F>(mut options: FingerprintOptions, lookup: F) -> Result<FingerprintOptions>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_DEBUG) {
        options.debug = parse_flag(ENV_DEBUG, &v)?;
    }
    if let Some(v) = lookup(ENV_CACHE) {
        options.cache = parse_flag(ENV_CACHE, &v)?;
    }
    if let Some(v) = lookup(ENV_TIMEOUT_MS) {
        options.timeout = v
            .trim()
            .parse()
            .map_err(|_| FingerprintError::invalid_config(ENV_TIMEOUT_MS, format!("not a number: {}", v)))?;
    }
    if let Some(v) = lookup(ENV_COMPONENTS) {
        options.components = Some(parse_components(&v)?);
    }
    Ok(options)
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(FingerprintError::invalid_config(
            key,
            format!("expected a boolean, got {:?}", other),
        )),
    }
}

/// Comma-separated category names; blank entries are skipped
fn parse_components(value: &str) -> Result<Vec<SignalCategory>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
