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

use libc::c_int;

use super::{ffi::*, sys};
use crate::common::{BleAddress, BleAdvertisement};

/// Copy everything this crate exposes out of a scan record.
///
/// # Safety
///
/// `record` must be null or point at a scan record the stack handed to the
/// scan result callback that is currently running.
pub(crate) unsafe fn copy_advertisement(
    record: *mut aceBT_BeaconScanRecord_t,
) -> Option<BleAdvertisement> {
    let raw = record.as_ref()?;
    let mut advertisement =
        BleAdvertisement::new(BleAddress::from(raw.addr), raw.rssi);

    if let Some(name) = extract_name(record) {
        advertisement = advertisement.with_name(name);
    }
    if let Some(tx_power) = extract_tx_power(record) {
        advertisement = advertisement.with_tx_power(tx_power);
    }

    Some(advertisement)
}

unsafe fn extract_name(record: *mut aceBT_BeaconScanRecord_t) -> Option<String> {
    let mut name = aceBT_bdName_t::zeroed();
    let len = sys::aceBT_scanRecordExtractName(record, &mut name);
    if len <= 0 {
        return None;
    }

    let len = (len as usize).min(ACEBT_MAX_NAME_LEN);
    // Some stacks count the terminating NUL.
    let bytes = name.name[..len].split(|b| *b == 0).next().unwrap_or(&[]);
    if bytes.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(bytes).into_owned())
    }
}

unsafe fn extract_tx_power(record: *mut aceBT_BeaconScanRecord_t) -> Option<i32> {
    let mut tx_power: c_int = 0;
    if sys::aceBT_scanRecordExtractTxPower(record, &mut tx_power) == 1 {
        Some(tx_power)
    } else {
        None
    }
}
