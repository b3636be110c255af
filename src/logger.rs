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

pub const ENV_LOG: &str = "DEVICEFP_LOG";

const DEFAULT_FILTER: &str = "info";

/// Install a stderr tracing subscriber filtered by `DEVICEFP_LOG`
///
/// Returns false when a global subscriber is already installed.
pub fn init_logging() -> bool {
    let filter = env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    init_logging_with(&filter)
}

pub fn init_logging_with(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        // Either this or another test in the binary installs the subscriber first
        let _ = init_logging_with("debug");
        assert!(!init_logging_with("info"));
    }
}
