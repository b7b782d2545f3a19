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

use super::BleAddress;

/// Name reported for devices whose advertisement carries no local name.
pub const UNKNOWN_NAME: &str = "<unknown>";

/// Holds data related to an incoming BLE Advertisement. This includes
/// information about the advertisement (e.g. address of sender) as well as
/// data sections extracted from the advertisement.
///
/// Everything is copied out of the stack's scan record while the scan
/// callback runs, so an advertisement stays valid after the record is gone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BleAdvertisement {
    address: BleAddress,
    rssi: i32,
    name: Option<String>,
    tx_power: Option<i32>,
}

impl BleAdvertisement {
    /// Construct a new `BleAdvertisement` instance.
    pub fn new(address: BleAddress, rssi: i32) -> Self {
        BleAdvertisement {
            address,
            rssi,
            name: None,
            tx_power: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_tx_power(mut self, tx_power: i32) -> Self {
        self.tx_power = Some(tx_power);
        self
    }

    /// Retrieve the `BleAddress` that emitted this advertisement.
    pub fn address(&self) -> BleAddress {
        self.address
    }

    /// Received signal strength, in dBm.
    pub fn rssi(&self) -> i32 {
        self.rssi
    }

    /// Local name carried by the advertisement, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Local name, or [`UNKNOWN_NAME`] when the device didn't send one.
    pub fn display_name(&self) -> &str {
        self.name().unwrap_or(UNKNOWN_NAME)
    }

    /// Advertised TX power level, in dBm.
    pub fn tx_power(&self) -> Option<i32> {
        self.tx_power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: BleAddress = BleAddress::new([1, 2, 3, 4, 5, 6]);

    #[test]
    fn advertisement_without_name() {
        let adv = BleAdvertisement::new(ADDR, -70);
        assert_eq!(adv.address(), ADDR);
        assert_eq!(adv.rssi(), -70);
        assert_eq!(adv.name(), None);
        assert_eq!(adv.display_name(), "<unknown>");
        assert_eq!(adv.tx_power(), None);
    }

    #[test]
    fn advertisement_with_name_and_tx_power() {
        let adv = BleAdvertisement::new(ADDR, -42)
            .with_name("Lightblue Bean")
            .with_tx_power(-8);
        assert_eq!(adv.name(), Some("Lightblue Bean"));
        assert_eq!(adv.display_name(), "Lightblue Bean");
        assert_eq!(adv.tx_power(), Some(-8));
    }
}
