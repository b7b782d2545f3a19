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

//! Command-line interface definitions and parsing

use std::time::Duration;

use clap::Parser;

/// User and group the ACE stack expects its clients to run as.
pub const BLUETOOTH_UID: u32 = 1003;
pub const BLUETOOTH_GID: u32 = 1003;

/// Scan for BLE beacons through the ACE Bluetooth stack.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Stop as soon as a device whose name starts with this prefix shows up
    #[arg(short, long, default_value = "Lightblue")]
    pub name_prefix: String,

    /// Give up after this many seconds
    #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// User to switch to when started as root
    #[arg(long, default_value_t = BLUETOOTH_UID)]
    pub uid: u32,

    /// Group to switch to when started as root
    #[arg(long, default_value_t = BLUETOOTH_GID)]
    pub gid: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
