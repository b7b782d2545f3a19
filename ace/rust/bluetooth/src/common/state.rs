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

use std::fmt;

use super::{BleAdvertisement, BluetoothError};

/// Power state of the local Bluetooth radio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RadioState {
    Disabled,
    Enabled,
    Enabling,
    Disabling,
}

/// State of a beacon scan instance, as reported by the scan state callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanState {
    Failed,
    Queued,
    Started,
    Paused,
    Stopped,
    Unknown(i32),
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScanState::Failed => "failed",
            ScanState::Queued => "queued",
            ScanState::Started => "started",
            ScanState::Paused => "paused",
            ScanState::Stopped => "stopped",
            ScanState::Unknown(_) => "unknown",
        };
        f.write_str(s)
    }
}

/// State of a beacon advertisement instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvState {
    Failed,
    Queued,
    Started,
    Paused,
    Stopped,
    Unknown(i32),
}

/// Power mode the stack uses for an advertisement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerMode {
    UltraLow,
    Low,
    Medium,
    High,
    Unknown(i32),
}

/// Mode an advertisement instance is broadcast in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BeaconMode {
    LowLatency,
    Balanced,
    LowPower,
    Unknown(i32),
}

/// Everything the stack tells a registered beacon client, decoded into owned
/// values. Produced by the stack callbacks, consumed by the adapter.
/// Identifies the scan instance an event was raised for. The stack's handle
/// is only compared, never dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanInstance(usize);

impl ScanInstance {
    pub(crate) const fn new(raw: usize) -> Self {
        ScanInstance(raw)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BeaconEvent {
    AdvStateChanged {
        state: AdvState,
        power_mode: PowerMode,
        beacon_mode: BeaconMode,
    },
    ScanStateChanged {
        scan: ScanInstance,
        state: ScanState,
        /// Scan interval in units of 1.25 ms.
        interval: u32,
        /// Scan window in units of 1.25 ms.
        window: u32,
    },
    ScanResult {
        scan: ScanInstance,
        advertisement: BleAdvertisement,
    },
    ClientRegistered(Result<(), BluetoothError>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_state_display() {
        assert_eq!(ScanState::Failed.to_string(), "failed");
        assert_eq!(ScanState::Queued.to_string(), "queued");
        assert_eq!(ScanState::Started.to_string(), "started");
        assert_eq!(ScanState::Paused.to_string(), "paused");
        assert_eq!(ScanState::Stopped.to_string(), "stopped");
        assert_eq!(ScanState::Unknown(42).to_string(), "unknown");
    }
}
