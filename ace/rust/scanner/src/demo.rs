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

//! Devices the emulated stack reports when `kbt-scan` is built without the
//! `vendor` feature.

use ace_bluetooth::ace::emulator::{self, EmulatedDevice};
use tracing::warn;

pub fn seed() {
    warn!("Built without the vendor feature, scanning the emulated ACE stack");
    emulator::set_devices(vec![
        EmulatedDevice::new([0x4c, 0x1d, 0x96, 0x0a, 0x21, 0x7e], -78),
        EmulatedDevice::new([0x60, 0x64, 0x05, 0xd1, 0x33, 0x0c], -64)
            .with_name("Kindle Remote")
            .with_tx_power(-6),
        EmulatedDevice::new([0x4c, 0x1d, 0x96, 0x0a, 0x21, 0x7e], -77),
        EmulatedDevice::new([0xd0, 0x39, 0x72, 0xb7, 0x8a, 0x15], -51)
            .with_name("Lightblue Bean")
            .with_tx_power(4),
    ]);
}
