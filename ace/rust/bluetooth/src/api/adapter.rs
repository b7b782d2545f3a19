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

use async_trait::async_trait;

use crate::common::{BleAdvertisement, BluetoothError};

/// Concrete types implementing this trait are Bluetooth Central devices.
/// They provide methods for scanning for nearby advertisements.
#[async_trait]
pub trait BleAdapter: Sized {
    /// Retrieve the system-default Bluetooth adapter, with its radio on.
    async fn default() -> Result<Self, BluetoothError>;

    /// Begin scanning for nearby advertisements.
    fn start_scan(&mut self) -> Result<(), BluetoothError>;

    /// Stop scanning for nearby advertisements.
    fn stop_scan(&mut self) -> Result<(), BluetoothError>;

    /// Poll next received advertisement. Only valid between `start_scan()`
    /// and `stop_scan()`.
    async fn next_advertisement(
        &mut self,
    ) -> Result<BleAdvertisement, BluetoothError>;
}
