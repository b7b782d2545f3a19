// Copyright 2024 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

mod cli;
#[cfg(not(feature = "vendor"))]
mod demo;
mod process;
mod scan;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ace_bluetooth::{api::BleAdapter, AceAdapter};

use crate::{
    cli::Cli,
    scan::{scan_for_target, DeviceTracker},
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` overrides the level picked by `--verbose`.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    process::drop_privileges(cli.uid, cli.gid)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        hostname = %process::hostname()?,
        "kbt-scan"
    );

    #[cfg(not(feature = "vendor"))]
    demo::seed();

    let mut adapter = AceAdapter::default()
        .await
        .context("failed to initialize ACE adapter")?;
    adapter
        .register_beacon()
        .await
        .context("failed to register beacon client")?;

    let mut tracker = DeviceTracker::new(cli.name_prefix.as_str());
    let found = scan_for_target(&mut adapter, &mut tracker, cli.timeout())
        .await
        .context("failed to scan")?;

    match found {
        Some(device) => info!(
            address = %device.address(),
            devices_seen = tracker.seen(),
            "found {}",
            device.display_name()
        ),
        None => info!(devices_seen = tracker.seen(), "scan finished"),
    }
    Ok(())
}
