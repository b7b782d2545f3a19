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

//! In-process stand-in for `libace_bt`, used when the crate is built
//! without the `vendor` feature.
//!
//! The functions below have the signatures of the vendor entry points and
//! drive the registered callbacks from their own threads, the way the real
//! stack does. The behaviour is scripted through the safe helpers
//! (`reset`, `set_radio_state`, `set_devices`, `force_status`, ...), which
//! act on one process-wide state.

#![allow(non_snake_case)]

use std::{
    ptr,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    thread,
    time::Duration,
};

use libc::{c_int, c_void};
use tracing::debug;

use super::ffi::*;
use crate::common::{RadioState, ScanState};

/// Interval and window reported for scans started with default parameters,
/// in units of 1.25 ms.
pub const DEFAULT_SCAN_INTERVAL: u32 = 400;
pub const DEFAULT_SCAN_WINDOW: u32 = 40;

const IDLE_POLL: Duration = Duration::from_millis(5);

static SESSION_TOKEN: u8 = 0;
/// Scan handles are never reused, so events can be told apart per scan.
static NEXT_SCAN_ID: AtomicUsize = AtomicUsize::new(1);

fn session_handle() -> aceBT_sessionHandle {
    ptr::addr_of!(SESSION_TOKEN) as *mut c_void
}

fn scan_handle(id: usize) -> aceBT_scanInstanceHandle {
    id as aceBT_scanInstanceHandle
}

/// Entry points whose status can be forced with [`force_status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmulatedCall {
    OpenSession,
    GetRadioState,
    EnableRadio,
    RegisterBeaconClient,
    StartBeaconScan,
    StopBeaconScan,
}

/// A remote device the emulated scanner reports.
#[derive(Clone, Debug)]
pub struct EmulatedDevice {
    address: [u8; ACEBT_MAC_ADDR_LEN],
    rssi: i32,
    name: Option<Vec<u8>>,
    tx_power: Option<i32>,
}

impl EmulatedDevice {
    pub fn new(address: [u8; ACEBT_MAC_ADDR_LEN], rssi: i32) -> Self {
        EmulatedDevice {
            address,
            rssi,
            name: None,
            tx_power: None,
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        self.with_raw_name(name.as_bytes().to_vec())
    }

    /// Name section bytes exactly as they appear over the air.
    pub fn with_raw_name(mut self, name: Vec<u8>) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_tx_power(mut self, tx_power: i32) -> Self {
        self.tx_power = Some(tx_power);
        self
    }
}

/// Scan record as the emulator lays it out: the public record prefix
/// followed by the data only the extract functions may look at.
#[repr(C)]
pub struct EmulatedRecord {
    record: aceBT_BeaconScanRecord_t,
    name: Option<Vec<u8>>,
    tx_power: Option<i32>,
}

impl EmulatedRecord {
    pub fn new(device: &EmulatedDevice) -> Self {
        EmulatedRecord {
            record: aceBT_BeaconScanRecord_t {
                addr: aceBT_bdAddr_t {
                    address: device.address,
                },
                rssi: device.rssi,
            },
            name: device.name.clone(),
            tx_power: device.tx_power,
        }
    }

    pub fn as_mut_ptr(&mut self) -> *mut aceBT_BeaconScanRecord_t {
        &mut self.record
    }
}

struct EmulatorState {
    radio: aceBT_state_t,
    polls_until_enabled: u32,
    pending_polls: Option<u32>,
    session_open: bool,
    callbacks: Option<aceBT_beaconCallbacks_t>,
    registration_status: ace_status_t,
    devices: Vec<EmulatedDevice>,
    forced: Vec<(EmulatedCall, ace_status_t)>,
    scan_fails: bool,
    silent_registration: bool,
    scan: Option<ActiveScan>,
}

struct ActiveScan {
    id: usize,
    stop: Arc<AtomicBool>,
}

impl EmulatorState {
    const fn new() -> Self {
        EmulatorState {
            radio: ACEBT_STATE_ENABLED,
            polls_until_enabled: 0,
            pending_polls: None,
            session_open: false,
            callbacks: None,
            registration_status: ACE_STATUS_OK,
            devices: Vec::new(),
            forced: Vec::new(),
            scan_fails: false,
            silent_registration: false,
            scan: None,
        }
    }

    fn forced(&self, call: EmulatedCall) -> Option<ace_status_t> {
        self.forced
            .iter()
            .find(|(forced_call, _)| *forced_call == call)
            .map(|(_, status)| *status)
    }

    fn stop_scan(&mut self) {
        if let Some(scan) = self.scan.take() {
            scan.stop.store(true, Ordering::Release);
        }
    }
}

static STATE: Mutex<EmulatorState> = Mutex::new(EmulatorState::new());

fn state() -> MutexGuard<'static, EmulatorState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restore the defaults: radio on, no session, no client, no devices, no
/// forced statuses. A running scan is stopped.
pub fn reset() {
    let mut state = state();
    state.stop_scan();
    *state = EmulatorState::new();
}

pub fn set_radio_state(radio: RadioState) {
    let mut state = state();
    state.radio = radio.into();
    state.pending_polls = None;
}

pub fn radio_state() -> RadioState {
    RadioState::try_from(state().radio).unwrap_or(RadioState::Disabled)
}

/// After `aceBT_enableRadio`, report `Enabling` for this many radio state
/// queries before reporting `Enabled`.
pub fn enable_radio_after_polls(polls: u32) {
    state().polls_until_enabled = polls;
}

/// Bring the radio up without `aceBT_enableRadio`: report `Enabling` for
/// this many radio state queries, then `Enabled`.
pub fn power_up_after_polls(polls: u32) {
    let mut state = state();
    state.radio = ACEBT_STATE_ENABLING;
    state.pending_polls = Some(polls);
}

/// Devices reported, in order, by every scan started afterwards.
pub fn set_devices(devices: Vec<EmulatedDevice>) {
    state().devices = devices;
}

/// Make `call` return `status` until the next `reset()`.
pub fn force_status(call: EmulatedCall, status: ace_status_t) {
    let mut state = state();
    state.forced.retain(|(forced_call, _)| *forced_call != call);
    state.forced.push((call, status));
}

/// Status delivered through the registration callback.
pub fn set_registration_status(status: ace_status_t) {
    state().registration_status = status;
}

/// Accept registrations without ever calling `onclientRegistered`.
pub fn silence_registration(silent: bool) {
    state().silent_registration = silent;
}

/// Make scans report `Failed` instead of starting.
pub fn fail_scans(fail: bool) {
    state().scan_fails = fail;
}

pub fn is_registered() -> bool {
    state().callbacks.is_some()
}

pub fn is_scanning() -> bool {
    state().scan.is_some()
}

pub unsafe extern "C" fn aceBT_openSession(
    session_type: aceBT_sessionType_t,
    _callbacks: *mut c_void,
    session_handle_out: *mut aceBT_sessionHandle,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::OpenSession) {
        return status;
    }
    if session_handle_out.is_null() {
        return ACEBT_STATUS_PARM_INVALID;
    }

    debug!(session_type, "emulator: session opened");
    state.session_open = true;
    *session_handle_out = session_handle();
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_getRadioState(
    radio_state: *mut aceBT_state_t,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::GetRadioState) {
        return status;
    }
    if radio_state.is_null() {
        return ACEBT_STATUS_PARM_INVALID;
    }

    match state.pending_polls.take() {
        Some(0) => state.radio = ACEBT_STATE_ENABLED,
        Some(polls) => state.pending_polls = Some(polls - 1),
        None => (),
    }
    *radio_state = state.radio;
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_enableRadio(
    session: aceBT_sessionHandle,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::EnableRadio) {
        return status;
    }
    if !state.session_open || session != session_handle() {
        return ACEBT_STATUS_PARM_INVALID;
    }

    if state.radio != ACEBT_STATE_ENABLED {
        state.radio = ACEBT_STATE_ENABLING;
        state.pending_polls = Some(state.polls_until_enabled);
    }
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_RegisterBeaconClient(
    session: aceBT_sessionHandle,
    callbacks: *const aceBT_beaconCallbacks_t,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::RegisterBeaconClient) {
        return status;
    }
    if !state.session_open || session != session_handle() {
        return ACEBT_STATUS_PARM_INVALID;
    }
    let Some(callbacks) = callbacks.as_ref() else {
        return ACEBT_STATUS_PARM_INVALID;
    };
    if callbacks.size != std::mem::size_of::<aceBT_beaconCallbacks_t>() {
        return ACEBT_STATUS_PARM_INVALID;
    }

    let status = state.registration_status;
    if status == ACE_STATUS_OK {
        state.callbacks = Some(*callbacks);
    }
    if state.silent_registration {
        return ACE_STATUS_OK;
    }
    if let Some(on_registered) = callbacks.onclientRegistered {
        thread::spawn(move || unsafe { on_registered(status) });
    }
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_startBeaconScanWithDefaultParams(
    session: aceBT_sessionHandle,
    client_id: aceBT_BeaconClientId,
    scan_instance: *mut aceBT_scanInstanceHandle,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::StartBeaconScan) {
        return status;
    }
    if !state.session_open || session != session_handle() || scan_instance.is_null() {
        return ACEBT_STATUS_PARM_INVALID;
    }
    let Some(callbacks) = state.callbacks else {
        return ACEBT_STATUS_NOT_READY;
    };
    if state.scan.is_some() {
        return ACEBT_STATUS_BUSY;
    }

    let id = NEXT_SCAN_ID.fetch_add(1, Ordering::Relaxed);
    debug!(client_id, id, "emulator: beacon scan starting");
    let stop = Arc::new(AtomicBool::new(false));
    state.scan = Some(ActiveScan {
        id,
        stop: stop.clone(),
    });
    *scan_instance = scan_handle(id);

    let devices = state.devices.clone();
    let fails = state.scan_fails;
    thread::spawn(move || run_scan(callbacks, id, devices, fails, stop));
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_stopBeaconScan(
    scan_instance: aceBT_scanInstanceHandle,
) -> ace_status_t {
    let mut state = state();
    if let Some(status) = state.forced(EmulatedCall::StopBeaconScan) {
        return status;
    }
    match &state.scan {
        Some(scan) if scan_instance == scan_handle(scan.id) => (),
        _ => return ACEBT_STATUS_PARM_INVALID,
    }

    state.stop_scan();
    ACE_STATUS_OK
}

pub unsafe extern "C" fn aceBT_scanRecordExtractName(
    record: *mut aceBT_BeaconScanRecord_t,
    name: *mut aceBT_bdName_t,
) -> c_int {
    let (Some(record), Some(name)) =
        ((record as *const EmulatedRecord).as_ref(), name.as_mut())
    else {
        return 0;
    };
    let Some(bytes) = &record.name else {
        return 0;
    };

    let len = bytes.len().min(ACEBT_MAX_NAME_LEN);
    name.name[..len].copy_from_slice(&bytes[..len]);
    len as c_int
}

pub unsafe extern "C" fn aceBT_scanRecordExtractTxPower(
    record: *mut aceBT_BeaconScanRecord_t,
    tx_power: *mut c_int,
) -> c_int {
    let (Some(record), Some(tx_power)) =
        ((record as *const EmulatedRecord).as_ref(), tx_power.as_mut())
    else {
        return 0;
    };

    match record.tx_power {
        Some(value) => {
            *tx_power = value;
            1
        }
        None => 0,
    }
}

fn run_scan(
    callbacks: aceBT_beaconCallbacks_t,
    id: usize,
    devices: Vec<EmulatedDevice>,
    fails: bool,
    stop: Arc<AtomicBool>,
) {
    let report_state = |state: ScanState| {
        let raw = match state {
            ScanState::Failed => ACEBT_BEACON_SCAN_FAILED,
            ScanState::Started => ACEBT_BEACON_SCAN_STARTED,
            _ => ACEBT_BEACON_SCAN_STOPPED,
        };
        if let Some(on_change) = callbacks.scanStateChanged {
            unsafe {
                on_change(
                    scan_handle(id),
                    raw,
                    DEFAULT_SCAN_INTERVAL,
                    DEFAULT_SCAN_WINDOW,
                )
            };
        }
    };

    if fails {
        report_state(ScanState::Failed);
        return;
    }
    report_state(ScanState::Started);

    for device in &devices {
        if stop.load(Ordering::Acquire) {
            break;
        }
        let mut record = EmulatedRecord::new(device);
        if let Some(on_result) = callbacks.scanResults {
            unsafe { on_result(scan_handle(id), record.as_mut_ptr()) };
        }
    }

    while !stop.load(Ordering::Acquire) {
        thread::sleep(IDLE_POLL);
    }
    report_state(ScanState::Stopped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ace::test_lock;

    fn open_session() -> aceBT_sessionHandle {
        let mut session = ptr::null_mut();
        assert_eq!(
            unsafe { aceBT_openSession(ACEBT_SESSION_TYPE_BLE, ptr::null_mut(), &mut session) },
            ACE_STATUS_OK
        );
        assert!(!session.is_null());
        session
    }

    #[test]
    fn registration_rejects_wrong_size_tag() {
        let _guard = test_lock();
        reset();
        let session = open_session();

        let mut callbacks = BEACON_CALLBACKS;
        callbacks.size -= 1;
        let status = unsafe { aceBT_RegisterBeaconClient(session, &callbacks) };
        assert_eq!(status, ACEBT_STATUS_PARM_INVALID);
        assert!(!is_registered());
    }

    #[test]
    fn registration_requires_session() {
        let _guard = test_lock();
        reset();

        let status = unsafe {
            aceBT_RegisterBeaconClient(session_handle(), &BEACON_CALLBACKS)
        };
        assert_eq!(status, ACEBT_STATUS_PARM_INVALID);
    }

    #[test]
    fn scan_requires_registration() {
        let _guard = test_lock();
        reset();
        let session = open_session();

        let mut scan = ptr::null_mut();
        let status = unsafe {
            aceBT_startBeaconScanWithDefaultParams(
                session,
                ACE_BEACON_CLIENT_TYPE_MONEYPENNY,
                &mut scan,
            )
        };
        assert_eq!(status, ACEBT_STATUS_NOT_READY);
        assert!(scan.is_null());
    }

    #[test]
    fn radio_enables_after_polls() {
        let _guard = test_lock();
        reset();
        set_radio_state(RadioState::Disabled);
        enable_radio_after_polls(2);
        let session = open_session();

        assert_eq!(unsafe { aceBT_enableRadio(session) }, ACE_STATUS_OK);
        let mut raw = ACEBT_STATE_DISABLED;
        for expected in [ACEBT_STATE_ENABLING, ACEBT_STATE_ENABLING, ACEBT_STATE_ENABLED] {
            assert_eq!(unsafe { aceBT_getRadioState(&mut raw) }, ACE_STATUS_OK);
            assert_eq!(raw, expected);
        }
        assert_eq!(radio_state(), RadioState::Enabled);
    }

    #[test]
    fn forced_status_wins_until_reset() {
        let _guard = test_lock();
        reset();
        force_status(EmulatedCall::OpenSession, ACEBT_STATUS_NOMEM);

        let mut session = ptr::null_mut();
        let status = unsafe {
            aceBT_openSession(ACEBT_SESSION_TYPE_BLE, ptr::null_mut(), &mut session)
        };
        assert_eq!(status, ACEBT_STATUS_NOMEM);

        reset();
        open_session();
    }

    #[test]
    fn every_scan_gets_a_new_handle() {
        let _guard = test_lock();
        reset();
        silence_registration(true);
        let session = open_session();
        assert_eq!(
            unsafe { aceBT_RegisterBeaconClient(session, &BEACON_CALLBACKS) },
            ACE_STATUS_OK
        );

        let mut handles = Vec::new();
        for _ in 0..2 {
            let mut scan = ptr::null_mut();
            let status = unsafe {
                aceBT_startBeaconScanWithDefaultParams(
                    session,
                    ACE_BEACON_CLIENT_TYPE_MONEYPENNY,
                    &mut scan,
                )
            };
            assert_eq!(status, ACE_STATUS_OK);
            assert_eq!(unsafe { aceBT_stopBeaconScan(scan) }, ACE_STATUS_OK);
            handles.push(scan);
        }
        assert_ne!(handles[0], handles[1]);
    }

    #[test]
    fn stop_without_scan_is_invalid() {
        let _guard = test_lock();
        reset();
        assert_eq!(
            unsafe { aceBT_stopBeaconScan(ptr::null_mut()) },
            ACEBT_STATUS_PARM_INVALID
        );
    }
}
