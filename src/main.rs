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

use std::path::PathBuf;
use std::process::ExitCode;

use devicefp::config;
use devicefp::logger::init_logging;
use devicefp::{DeviceFingerprint, FingerprintOptions, Platform, PlatformSnapshot};
use tracing::error;

fn print_help() {
    println!("Usage: devicefp [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --config <path>     Read options from this file instead of the user config");
    println!("  --snapshot <path>   Fingerprint a captured platform snapshot (JSON)");
    println!("  --components        Also print the collected signal set");
    println!("  -h, --help          Show this help");
}

struct Args {
    config: Option<PathBuf>,
    snapshot: Option<PathBuf>,
    show_components: bool,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut args = Args {
        config: None,
        snapshot: None,
        show_components: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().ok_or("--config requires a path argument")?;
                args.config = Some(PathBuf::from(path));
            }
            "--snapshot" => {
                let path = iter.next().ok_or("--snapshot requires a path argument")?;
                args.snapshot = Some(PathBuf::from(path));
            }
            "--components" => args.show_components = true,
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(Some(args))
}

async fn run(args: Args) -> devicefp::Result<()> {
    let options: FingerprintOptions = match &args.config {
        Some(path) => config::load_options_from(path)?,
        None => config::load_options()?,
    };
    let platform = match &args.snapshot {
        Some(path) => Platform::snapshot(PlatformSnapshot::load(path)?),
        None => Platform::native(),
    };

    let fingerprint = DeviceFingerprint::with_platform(options, platform)?;
    let digest = fingerprint.generate().await?;
    println!("{}", digest);

    if args.show_components {
        let components = serde_json::to_string_pretty(&fingerprint.get_components())?;
        println!("{}", components);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_help();
            return ExitCode::FAILURE;
        }
    };

    init_logging();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
