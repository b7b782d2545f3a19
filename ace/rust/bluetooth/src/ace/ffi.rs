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

//! Declarations mirroring the ACE Bluetooth SDK headers
//! (`ace/ace_status.h`, `ace/bluetooth_session_api.h`,
//! `ace/bluetooth_common_api.h`, `ace/bluetooth_beacon_api.h`).
//!
//! Names follow the C headers so call sites read like the SDK
//! documentation. Enum-typed parameters are carried as their raw C integer
//! type and decoded in `super::types`; the stack may hand us values newer
//! than this table.

#![allow(non_camel_case_types, non_snake_case, dead_code)]

use std::mem;

use libc::{c_int, c_void, size_t};

use super::callbacks::{
    advChangeCallback, onBeaconClientRegistered, scanChangeCallback,
    scanResultCallback,
};

// ace_status.h / bluetooth_common_api.h
pub type ace_status_t = c_int;
pub type aceBT_status_t = ace_status_t;

pub const ACE_STATUS_OK: ace_status_t = 0;
pub const ACEBT_STATUS_SUCCESS: ace_status_t = ACE_STATUS_OK;
pub const ACEBT_STATUS_FAIL: ace_status_t = 1;
pub const ACEBT_STATUS_NOT_READY: ace_status_t = 2;
pub const ACEBT_STATUS_NOMEM: ace_status_t = 3;
pub const ACEBT_STATUS_BUSY: ace_status_t = 4;
pub const ACEBT_STATUS_DONE: ace_status_t = 5;
pub const ACEBT_STATUS_UNSUPPORTED: ace_status_t = 6;
pub const ACEBT_STATUS_PARM_INVALID: ace_status_t = 7;

pub type aceBT_state_t = c_int;
pub const ACEBT_STATE_DISABLED: aceBT_state_t = 0;
pub const ACEBT_STATE_ENABLED: aceBT_state_t = 1;
pub const ACEBT_STATE_ENABLING: aceBT_state_t = 2;
pub const ACEBT_STATE_DISABLING: aceBT_state_t = 3;

pub const ACEBT_MAC_ADDR_LEN: usize = 6;
pub const ACEBT_MAX_NAME_LEN: usize = 249;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct aceBT_bdAddr_t {
    pub address: [u8; ACEBT_MAC_ADDR_LEN],
}

#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct aceBT_bdName_t {
    pub name: [u8; ACEBT_MAX_NAME_LEN],
}

impl aceBT_bdName_t {
    pub const fn zeroed() -> Self {
        aceBT_bdName_t {
            name: [0; ACEBT_MAX_NAME_LEN],
        }
    }
}

// bluetooth_session_api.h
pub type aceBT_sessionHandle = *mut c_void;
pub type aceBT_sessionType_t = c_int;
pub const ACEBT_SESSION_TYPE_CLASSIC: aceBT_sessionType_t = 0;
pub const ACEBT_SESSION_TYPE_BLE: aceBT_sessionType_t = 1;
pub const ACEBT_SESSION_TYPE_DUAL_MODE: aceBT_sessionType_t = 2;

// bluetooth_beacon_api.h
pub type aceBT_advInstanceHandle = *mut c_void;
pub type aceBT_scanInstanceHandle = *mut c_void;

pub type aceBT_BeaconClientId = c_int;
pub const ACE_BEACON_CLIENT_TYPE_MONEYPENNY: aceBT_BeaconClientId = 1;

pub type aceBT_beaconAdvState_t = c_int;
pub const ACEBT_BEACON_ADV_FAILED: aceBT_beaconAdvState_t = 0;
pub const ACEBT_BEACON_ADV_QUEUED: aceBT_beaconAdvState_t = 1;
pub const ACEBT_BEACON_ADV_STARTED: aceBT_beaconAdvState_t = 2;
pub const ACEBT_BEACON_ADV_PAUSED: aceBT_beaconAdvState_t = 3;
pub const ACEBT_BEACON_ADV_STOPPED: aceBT_beaconAdvState_t = 4;

pub type aceBT_beaconPowerMode_t = c_int;
pub const ACEBT_BEACON_ADV_TX_POWER_ULTRA_LOW: aceBT_beaconPowerMode_t = 0;
pub const ACEBT_BEACON_ADV_TX_POWER_LOW: aceBT_beaconPowerMode_t = 1;
pub const ACEBT_BEACON_ADV_TX_POWER_MEDIUM: aceBT_beaconPowerMode_t = 2;
pub const ACEBT_BEACON_ADV_TX_POWER_HIGH: aceBT_beaconPowerMode_t = 3;

pub type aceBT_beaconAdvMode_t = c_int;
pub const ACEBT_BEACON_ADV_MODE_LOW_LATENCY: aceBT_beaconAdvMode_t = 0;
pub const ACEBT_BEACON_ADV_MODE_BALANCED: aceBT_beaconAdvMode_t = 1;
pub const ACEBT_BEACON_ADV_MODE_LOW_POWER: aceBT_beaconAdvMode_t = 2;

pub type aceBT_beaconScanState_t = c_int;
pub const ACEBT_BEACON_SCAN_FAILED: aceBT_beaconScanState_t = 0;
pub const ACEBT_BEACON_SCAN_QUEUED: aceBT_beaconScanState_t = 1;
pub const ACEBT_BEACON_SCAN_STARTED: aceBT_beaconScanState_t = 2;
pub const ACEBT_BEACON_SCAN_PAUSED: aceBT_beaconScanState_t = 3;
pub const ACEBT_BEACON_SCAN_STOPPED: aceBT_beaconScanState_t = 4;

/// Leading fields of a beacon scan record. The stack's record continues
/// past these (raw advertising data), which is only reachable through the
/// `aceBT_scanRecordExtract*` functions. Records are owned by the stack
/// and only valid for the duration of the scan result callback.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct aceBT_BeaconScanRecord_t {
    pub addr: aceBT_bdAddr_t,
    pub rssi: c_int,
}

pub type beacon_advChangeCallback = Option<
    unsafe extern "C" fn(
        adv_instance: aceBT_advInstanceHandle,
        state: aceBT_beaconAdvState_t,
        power_mode: aceBT_beaconPowerMode_t,
        beacon_mode: aceBT_beaconAdvMode_t,
    ),
>;

pub type beacon_scanChangeCallback = Option<
    unsafe extern "C" fn(
        scan_instance: aceBT_scanInstanceHandle,
        state: aceBT_beaconScanState_t,
        interval: u32,
        window: u32,
    ),
>;

pub type beacon_scanResultsCallback = Option<
    unsafe extern "C" fn(
        scan_instance: aceBT_scanInstanceHandle,
        record: *mut aceBT_BeaconScanRecord_t,
    ),
>;

pub type beacon_onBeaconClientRegistered =
    Option<unsafe extern "C" fn(status: aceBT_status_t)>;

/// Callback set handed to `aceBT_RegisterBeaconClient`. The stack keeps a
/// pointer to it for as long as the client stays registered.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct aceBT_beaconCallbacks_t {
    /// Must equal `size_of::<aceBT_beaconCallbacks_t>()`, otherwise the
    /// stack rejects the registration.
    pub size: size_t,
    pub advStateChanged: beacon_advChangeCallback,
    pub scanStateChanged: beacon_scanChangeCallback,
    pub scanResults: beacon_scanResultsCallback,
    pub onclientRegistered: beacon_onBeaconClientRegistered,
}

impl aceBT_beaconCallbacks_t {
    /// The callback set of this crate.
    pub const fn new() -> Self {
        aceBT_beaconCallbacks_t {
            size: mem::size_of::<aceBT_beaconCallbacks_t>(),
            // Advertisement state changed
            advStateChanged: Some(advChangeCallback),
            // Scan state changed
            scanStateChanged: Some(scanChangeCallback),
            // Scan results
            scanResults: Some(scanResultCallback),
            // Beacon client registration
            onclientRegistered: Some(onBeaconClientRegistered),
        }
    }
}

/// Passed to `aceBT_RegisterBeaconClient`.
pub static BEACON_CALLBACKS: aceBT_beaconCallbacks_t =
    aceBT_beaconCallbacks_t::new();
