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

mod address;
mod advertisement;
mod error;
mod state;

pub use address::BleAddress;
pub use advertisement::{BleAdvertisement, UNKNOWN_NAME};
pub use error::BluetoothError;
pub use state::{
    AdvState, BeaconEvent, BeaconMode, PowerMode, RadioState, ScanInstance,
    ScanState,
};
