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

//! Entry points of the ACE Bluetooth stack used by this crate. With the
//! `vendor` feature they are the real `libace_bt` symbols; otherwise the
//! in-process emulator answers with the same signatures.

#![allow(non_snake_case)]

cfg_if::cfg_if! {
    if #[cfg(feature = "vendor")] {
        use libc::{c_int, c_void};

        use super::ffi::*;

        extern "C" {
            pub fn aceBT_openSession(
                session_type: aceBT_sessionType_t,
                callbacks: *mut c_void,
                session_handle: *mut aceBT_sessionHandle,
            ) -> ace_status_t;

            pub fn aceBT_getRadioState(state: *mut aceBT_state_t) -> ace_status_t;

            pub fn aceBT_enableRadio(session_handle: aceBT_sessionHandle) -> ace_status_t;

            pub fn aceBT_RegisterBeaconClient(
                session_handle: aceBT_sessionHandle,
                callbacks: *const aceBT_beaconCallbacks_t,
            ) -> ace_status_t;

            pub fn aceBT_startBeaconScanWithDefaultParams(
                session_handle: aceBT_sessionHandle,
                client_id: aceBT_BeaconClientId,
                scan_instance: *mut aceBT_scanInstanceHandle,
            ) -> ace_status_t;

            pub fn aceBT_stopBeaconScan(scan_instance: aceBT_scanInstanceHandle) -> ace_status_t;

            /// Returns the name length, or a non-positive value when the
            /// record carries no name.
            pub fn aceBT_scanRecordExtractName(
                record: *mut aceBT_BeaconScanRecord_t,
                name: *mut aceBT_bdName_t,
            ) -> c_int;

            /// Returns the number of TX power bytes found (1 on success).
            pub fn aceBT_scanRecordExtractTxPower(
                record: *mut aceBT_BeaconScanRecord_t,
                tx_power: *mut c_int,
            ) -> c_int;
        }
    } else {
        pub use super::emulator::{
            aceBT_RegisterBeaconClient, aceBT_enableRadio, aceBT_getRadioState,
            aceBT_openSession, aceBT_scanRecordExtractName,
            aceBT_scanRecordExtractTxPower, aceBT_startBeaconScanWithDefaultParams,
            aceBT_stopBeaconScan,
        };
    }
}
