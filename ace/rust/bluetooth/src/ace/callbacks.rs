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

//! Callbacks registered with the stack through `BEACON_CALLBACKS`.
//!
//! The stack calls these on its own threads. Each one decodes its arguments
//! into an owned `BeaconEvent` and hands it to the active adapter through a
//! process-wide sink. Callbacks must not block or unwind, so a missing sink
//! or a full channel only drops the event.

#![allow(non_snake_case)]

use std::sync::{Mutex, PoisonError};

use futures::channel::mpsc::{self, Receiver, Sender};
use tracing::{debug, error, info, warn};

use super::{ffi::*, record, status};
use crate::common::{
    AdvState, BeaconEvent, BeaconMode, BluetoothError, PowerMode, ScanInstance,
    ScanState,
};

/// Events buffered between the stack threads and the adapter.
const EVENT_CHANNEL_CAPACITY: usize = 64;

static EVENT_SINK: Mutex<Option<Sender<BeaconEvent>>> = Mutex::new(None);

/// Route callback events to a new channel. Only one receiver may exist per
/// process.
pub(crate) fn install_sink() -> Result<Receiver<BeaconEvent>, BluetoothError> {
    let mut sink = EVENT_SINK.lock().unwrap_or_else(PoisonError::into_inner);
    if sink.is_some() {
        return Err(BluetoothError::FailedPrecondition(String::from(
            "an ACE adapter is already active in this process",
        )));
    }

    let (sender, receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    *sink = Some(sender);
    Ok(receiver)
}

/// Drop the sender; the receiver sees the end of the stream.
pub(crate) fn clear_sink() {
    EVENT_SINK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
}

fn dispatch(event: BeaconEvent) {
    let mut sink = EVENT_SINK.lock().unwrap_or_else(PoisonError::into_inner);
    match sink.as_mut() {
        Some(sender) => {
            if let Err(err) = sender.try_send(event) {
                error!("Error while forwarding beacon event: {:?}", err);
            }
        }
        None => debug!("No adapter listening, dropping {:?}", event),
    }
}

/// Fired by the stack when an advertisement instance changes state.
pub unsafe extern "C" fn advChangeCallback(
    adv_instance: aceBT_advInstanceHandle,
    state: aceBT_beaconAdvState_t,
    power_mode: aceBT_beaconPowerMode_t,
    beacon_mode: aceBT_beaconAdvMode_t,
) {
    let state = AdvState::from_raw(state);
    let power_mode = PowerMode::from_raw(power_mode);
    let beacon_mode = BeaconMode::from_raw(beacon_mode);
    info!(
        ?adv_instance,
        ?state,
        ?power_mode,
        ?beacon_mode,
        "Beacon advertisement state changed"
    );

    dispatch(BeaconEvent::AdvStateChanged {
        state,
        power_mode,
        beacon_mode,
    });
}

/// Fired by the stack when a scan instance starts, stops, pauses or fails.
/// `interval` and `window` are in units of 1.25 ms.
pub unsafe extern "C" fn scanChangeCallback(
    scan_instance: aceBT_scanInstanceHandle,
    state: aceBT_beaconScanState_t,
    interval: u32,
    window: u32,
) {
    let state = ScanState::from_raw(state);
    info!(
        ?scan_instance,
        %state,
        interval,
        window,
        "Beacon scan state changed"
    );

    dispatch(BeaconEvent::ScanStateChanged {
        scan: ScanInstance::from(scan_instance),
        state,
        interval,
        window,
    });
}

/// Fired by the stack once per scan result. `record` is only valid until
/// this function returns, so it is copied before dispatching.
pub unsafe extern "C" fn scanResultCallback(
    scan_instance: aceBT_scanInstanceHandle,
    record: *mut aceBT_BeaconScanRecord_t,
) {
    match record::copy_advertisement(record) {
        Some(advertisement) => dispatch(BeaconEvent::ScanResult {
            scan: ScanInstance::from(scan_instance),
            advertisement,
        }),
        None => warn!("Scan result callback received a null record"),
    }
}

/// Fired by the stack when the beacon client registration completes.
pub unsafe extern "C" fn onBeaconClientRegistered(status: aceBT_status_t) {
    let result = status::check(status);
    match &result {
        Ok(()) => info!(status, "Beacon client registered successfully"),
        Err(err) => {
            error!(status, error = %err, "Beacon client registration failed")
        }
    }

    dispatch(BeaconEvent::ClientRegistered(result));
}

#[cfg(all(test, not(feature = "vendor")))]
mod tests {
    use std::ptr;

    use futures::StreamExt;

    use super::*;
    use crate::ace::{
        emulator::{self, EmulatedDevice, EmulatedRecord},
        test_lock,
    };

    #[test]
    fn second_sink_is_rejected() {
        let _guard = test_lock();
        let _receiver = install_sink().unwrap();
        assert!(matches!(
            install_sink(),
            Err(BluetoothError::FailedPrecondition(_))
        ));
        clear_sink();
        assert!(install_sink().is_ok());
        clear_sink();
    }

    #[test]
    fn callbacks_forward_decoded_events() {
        let _guard = test_lock();
        emulator::reset();
        let mut receiver = install_sink().unwrap();

        let device = EmulatedDevice::new([9, 8, 7, 6, 5, 4], -33).with_name("tag");
        let mut record = EmulatedRecord::new(&device);
        let scan_instance = 0x5ca0usize as aceBT_scanInstanceHandle;
        unsafe {
            scanChangeCallback(
                scan_instance,
                ACEBT_BEACON_SCAN_STARTED,
                8,
                4,
            );
            scanResultCallback(scan_instance, record.as_mut_ptr());
            scanResultCallback(scan_instance, ptr::null_mut());
            onBeaconClientRegistered(ACEBT_STATUS_BUSY);
            advChangeCallback(
                ptr::null_mut(),
                ACEBT_BEACON_ADV_STARTED,
                ACEBT_BEACON_ADV_TX_POWER_LOW,
                ACEBT_BEACON_ADV_MODE_LOW_POWER,
            );
        }
        clear_sink();

        let events: Vec<BeaconEvent> =
            futures::executor::block_on(receiver.by_ref().collect());
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            BeaconEvent::ScanStateChanged {
                scan: ScanInstance::new(0x5ca0),
                state: ScanState::Started,
                interval: 8,
                window: 4,
            }
        );
        match &events[1] {
            BeaconEvent::ScanResult { scan, advertisement } => {
                assert_eq!(*scan, ScanInstance::new(0x5ca0));
                assert_eq!(advertisement.address().to_string(), "09:08:07:06:05:04");
                assert_eq!(advertisement.name(), Some("tag"));
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert_eq!(
            events[2],
            BeaconEvent::ClientRegistered(Err(BluetoothError::Busy))
        );
        assert_eq!(
            events[3],
            BeaconEvent::AdvStateChanged {
                state: AdvState::Started,
                power_mode: PowerMode::Low,
                beacon_mode: BeaconMode::LowPower,
            }
        );
    }

    #[test]
    fn events_without_sink_are_dropped() {
        let _guard = test_lock();
        clear_sink();
        unsafe { onBeaconClientRegistered(ACE_STATUS_OK) };
    }
}
