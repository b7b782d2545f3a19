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

//! The scan loop: de-duplicate devices by address and stop on the first
//! device whose name matches the requested prefix.

use std::{collections::HashSet, time::Duration};

use ace_bluetooth::{api::BleAdapter, BleAddress, BleAdvertisement, BluetoothError};
use tracing::{debug, error, info};

/// What a scan result means to the scanner.
#[derive(Debug, PartialEq, Eq)]
pub enum Sighting {
    /// Address already reported.
    Repeat,
    /// First sighting of a device that doesn't advertise a name.
    Unnamed,
    /// First sighting of a device matching the name prefix.
    Target,
    /// First sighting of any other named device.
    Other,
}

pub struct DeviceTracker {
    name_prefix: String,
    seen: HashSet<BleAddress>,
}

impl DeviceTracker {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        DeviceTracker {
            name_prefix: name_prefix.into(),
            seen: HashSet::new(),
        }
    }

    pub fn classify(&mut self, advertisement: &BleAdvertisement) -> Sighting {
        if !self.seen.insert(advertisement.address()) {
            return Sighting::Repeat;
        }

        match advertisement.name() {
            None => Sighting::Unnamed,
            Some(name) if name.starts_with(&self.name_prefix) => Sighting::Target,
            Some(_) => Sighting::Other,
        }
    }

    pub fn seen(&self) -> usize {
        self.seen.len()
    }
}

/// Scan until a target device shows up or `timeout` elapses, then stop the
/// scan. Returns the target, if found.
pub async fn scan_for_target<A: BleAdapter>(
    adapter: &mut A,
    tracker: &mut DeviceTracker,
    timeout: Duration,
) -> Result<Option<BleAdvertisement>, BluetoothError> {
    adapter.start_scan()?;

    let search = async {
        loop {
            let device = adapter.next_advertisement().await?;
            let address = device.address();
            let tx_power = device.tx_power().unwrap_or(0);

            match tracker.classify(&device) {
                // quietly ignore devices we've already seen
                Sighting::Repeat => continue,
                Sighting::Unnamed => debug!(
                    address = %address,
                    rssi = device.rssi(),
                    tx_power,
                    "found unnamed device"
                ),
                Sighting::Target => {
                    info!(
                        address = %address,
                        rssi = device.rssi(),
                        tx_power,
                        "found {} device, stopping scan",
                        device.display_name()
                    );
                    break Ok::<_, BluetoothError>(device);
                }
                Sighting::Other => info!(
                    name = device.display_name(),
                    address = %address,
                    rssi = device.rssi(),
                    tx_power,
                    "found device"
                ),
            }
        }
    };

    let outcome = tokio::time::timeout(timeout, search).await;
    let found = match outcome {
        Ok(Ok(device)) => Some(device),
        Ok(Err(err)) => {
            error!(error = %err, "scan failed");
            stop(adapter);
            return Err(err);
        }
        Err(_) => {
            info!(
                "No device found within {} seconds, stopping scan",
                timeout.as_secs()
            );
            None
        }
    };

    stop(adapter);
    Ok(found)
}

fn stop<A: BleAdapter>(adapter: &mut A) {
    if let Err(err) = adapter.stop_scan() {
        error!(error = %err, "failed to stop scan");
    }
}
