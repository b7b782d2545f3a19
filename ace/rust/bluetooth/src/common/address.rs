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

use std::{fmt, str::FromStr};

use super::BluetoothError;

/// Struct representing a 48-bit BLE Address. Bytes are kept in the order
/// the ACE stack reports them, which is also the order they are printed in.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub struct BleAddress {
    val: [u8; 6],
}

impl BleAddress {
    /// `BleAddress` constructor.
    pub const fn new(val: [u8; 6]) -> Self {
        BleAddress { val }
    }

    /// Raw address bytes.
    pub fn octets(&self) -> [u8; 6] {
        self.val
    }
}

impl From<[u8; 6]> for BleAddress {
    fn from(val: [u8; 6]) -> Self {
        BleAddress::new(val)
    }
}

impl From<BleAddress> for [u8; 6] {
    fn from(addr: BleAddress) -> Self {
        addr.val
    }
}

impl fmt::Display for BleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.val;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for BleAddress {
    type Err = BluetoothError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || BluetoothError::BadValue(format!("invalid address `{s}`"));

        let mut val = [0u8; 6];
        let mut parts = s.split(':');
        for byte in val.iter_mut() {
            let part = parts.next().ok_or_else(bad)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(bad());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| bad())?;
        }
        if parts.next().is_some() {
            return Err(bad());
        }

        Ok(BleAddress { val })
    }
}
