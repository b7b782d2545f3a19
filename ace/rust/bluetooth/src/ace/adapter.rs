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

use std::{ptr, time::Duration};

use async_trait::async_trait;
use futures::{channel::mpsc::Receiver, StreamExt};
use libc::c_void;
use tracing::{debug, error, info, warn};

use super::{callbacks, ffi::*, status, sys};
use crate::{
    api,
    common::{
        BeaconEvent, BleAdvertisement, BluetoothError, RadioState, ScanInstance,
        ScanState,
    },
};

/// Radio state queries made after asking the stack to enable the radio.
const RADIO_ENABLE_RETRIES: usize = 10;
/// Delay between two radio state queries.
const RADIO_POLL_DELAY: Duration = Duration::from_millis(500);
/// How long the stack gets to confirm a beacon client registration.
const REGISTRATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Opaque handle owned by the stack. The stack accepts its handles from any
/// thread.
struct Handle(*mut c_void);

unsafe impl Send for Handle {}

/// Concrete type implementing `api::BleAdapter` on top of the ACE stack.
///
/// Only one adapter can exist per process: the stack callbacks have no
/// user data pointer, so they reach the adapter through a process-wide
/// event sink.
pub struct AceAdapter {
    session: Handle,
    scan: Option<Handle>,
    /// Decoded callback events, in the order the stack raised them.
    events: Receiver<BeaconEvent>,
}

impl AceAdapter {
    /// Open a BLE session without touching the radio.
    pub fn open() -> Result<Self, BluetoothError> {
        let events = callbacks::install_sink()?;

        let mut session = ptr::null_mut();
        let result = status::check(unsafe {
            sys::aceBT_openSession(
                ACEBT_SESSION_TYPE_BLE,
                ptr::null_mut(),
                &mut session,
            )
        });
        if let Err(err) = result {
            error!(error = %err, "Failed to open ACE session");
            callbacks::clear_sink();
            return Err(err);
        }
        info!(session_handle = ?session, "Opened ACE session");

        Ok(AceAdapter {
            session: Handle(session),
            scan: None,
            events,
        })
    }

    /// Current power state of the radio.
    pub fn radio_state(&self) -> Result<RadioState, BluetoothError> {
        let mut radio_state = ACEBT_STATE_DISABLED;
        status::check(unsafe { sys::aceBT_getRadioState(&mut radio_state) })
            .map_err(|err| {
                error!(error = %err, "Failed to get radio state");
                err
            })?;

        RadioState::try_from(radio_state)
    }

    /// Ask the stack to power the radio on and wait until it reports
    /// `Enabled`.
    pub async fn enable_radio(&mut self) -> Result<(), BluetoothError> {
        if self.session.0.is_null() {
            return Err(BluetoothError::FailedPrecondition(String::from(
                "session handle is nil, cannot enable radio",
            )));
        }
        info!(session_handle = ?self.session.0, "Enabling radio");

        // The radio may still come up, so keep polling.
        if let Err(err) =
            status::check(unsafe { sys::aceBT_enableRadio(self.session.0) })
        {
            error!(error = %err, "Failed to enable radio");
        }

        for _ in 0..RADIO_ENABLE_RETRIES {
            if self.radio_state()? == RadioState::Enabled {
                debug!("Radio is enabled, quitting retry loop");
                return Ok(());
            }
            tokio::time::sleep(RADIO_POLL_DELAY).await;
        }

        Err(BluetoothError::Timeout(format!(
            "radio did not enable after {} retries",
            RADIO_ENABLE_RETRIES
        )))
    }

    /// Register `BEACON_CALLBACKS` with the stack and wait for the stack to
    /// confirm the registration through `onclientRegistered`.
    pub async fn register_beacon(&mut self) -> Result<(), BluetoothError> {
        status::check(unsafe {
            sys::aceBT_RegisterBeaconClient(self.session.0, &BEACON_CALLBACKS)
        })
        .map_err(|err| {
            error!(error = %err, "Failed to register beacon client");
            err
        })?;

        let events = &mut self.events;
        let confirmation = async {
            loop {
                match events.next().await {
                    Some(BeaconEvent::ClientRegistered(result)) => break result,
                    Some(event) => {
                        debug!("Skipping {:?} while registering", event)
                    }
                    None => {
                        break Err(BluetoothError::Internal(String::from(
                            "event stream closed during registration",
                        )))
                    }
                }
            }
        };

        tokio::time::timeout(REGISTRATION_TIMEOUT, confirmation)
            .await
            .map_err(|_| {
                BluetoothError::Timeout(String::from(
                    "no beacon client registration callback",
                ))
            })?
    }

    /// Whether `start_scan()` succeeded and `stop_scan()` hasn't been called.
    pub fn is_scanning(&self) -> bool {
        self.scan.is_some()
    }

    /// Drop events still buffered from earlier scans.
    fn discard_pending_events(&mut self) {
        let mut discarded = 0;
        while let Ok(Some(_)) = self.events.try_next() {
            discarded += 1;
        }
        if discarded > 0 {
            debug!(discarded, "Discarded stale beacon events");
        }
    }
}

#[async_trait]
impl api::BleAdapter for AceAdapter {
    async fn default() -> Result<Self, BluetoothError> {
        let mut adapter = AceAdapter::open()?;

        let state = adapter.radio_state()?;
        if state != RadioState::Enabled {
            info!(?state, "Radio is not enabled");
            adapter.enable_radio().await?;
        }

        Ok(adapter)
    }

    fn start_scan(&mut self) -> Result<(), BluetoothError> {
        if self.scan.is_some() {
            return Err(BluetoothError::FailedPrecondition(String::from(
                "scan already in progress",
            )));
        }

        self.discard_pending_events();

        let mut scan = ptr::null_mut();
        status::check(unsafe {
            sys::aceBT_startBeaconScanWithDefaultParams(
                self.session.0,
                ACE_BEACON_CLIENT_TYPE_MONEYPENNY,
                &mut scan,
            )
        })
        .map_err(|err| {
            error!(error = %err, "Failed to start beacon scan");
            err
        })?;

        self.scan = Some(Handle(scan));
        info!("Started beacon scan");
        Ok(())
    }

    fn stop_scan(&mut self) -> Result<(), BluetoothError> {
        let Some(scan) = &self.scan else {
            return Err(BluetoothError::FailedPrecondition(String::from(
                "no scan in progress",
            )));
        };

        status::check(unsafe { sys::aceBT_stopBeaconScan(scan.0) }).map_err(
            |err| {
                error!(error = %err, "Failed to stop beacon scan");
                err
            },
        )?;

        self.scan = None;
        info!("Stopped beacon scan");
        Ok(())
    }

    async fn next_advertisement(
        &mut self,
    ) -> Result<BleAdvertisement, BluetoothError> {
        let Some(current) =
            self.scan.as_ref().map(|scan| ScanInstance::from(scan.0))
        else {
            return Err(BluetoothError::FailedPrecondition(String::from(
                "device scanning hasn't started, please call `start_scan()`",
            )));
        };

        // State changes are logged by the callbacks; only results and scan
        // failures of the current scan matter to the caller.
        loop {
            let event = self.events.next().await.ok_or_else(|| {
                BluetoothError::Internal(String::from(
                    "Event returned from stream is None.",
                ))
            })?;

            match event {
                BeaconEvent::ScanResult {
                    scan,
                    advertisement,
                } if scan == current => break Ok(advertisement),
                BeaconEvent::ScanStateChanged {
                    scan,
                    state: ScanState::Failed,
                    ..
                } if scan == current => break Err(BluetoothError::Failed),
                _ => (),
            }
        }
    }
}

impl Drop for AceAdapter {
    fn drop(&mut self) {
        if self.scan.is_some() {
            if let Err(err) = api::BleAdapter::stop_scan(self) {
                warn!(error = %err, "Failed to stop beacon scan on drop");
            }
        }
        callbacks::clear_sink();
    }
}

#[cfg(all(test, not(feature = "vendor")))]
mod tests {
    use super::*;
    use crate::{
        ace::{
            emulator::{self, EmulatedCall, EmulatedDevice},
            test_lock,
        },
        api::BleAdapter,
        common::BleAddress,
    };

    #[tokio::test]
    async fn default_keeps_enabled_radio() {
        let _guard = test_lock();
        emulator::reset();

        let adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.radio_state(), Ok(RadioState::Enabled));
        assert!(!adapter.is_scanning());
    }

    #[tokio::test(start_paused = true)]
    async fn default_enables_disabled_radio() {
        let _guard = test_lock();
        emulator::reset();
        emulator::set_radio_state(RadioState::Disabled);
        emulator::enable_radio_after_polls(3);

        let adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.radio_state(), Ok(RadioState::Enabled));
    }

    #[tokio::test(start_paused = true)]
    async fn radio_that_never_enables_times_out() {
        let _guard = test_lock();
        emulator::reset();
        emulator::set_radio_state(RadioState::Disabled);
        emulator::enable_radio_after_polls(u32::MAX);

        let result = AceAdapter::default().await;
        assert!(matches!(result, Err(BluetoothError::Timeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn enable_failure_is_logged_and_polling_continues() {
        let _guard = test_lock();
        emulator::reset();
        emulator::force_status(EmulatedCall::EnableRadio, ACEBT_STATUS_FAIL);
        emulator::power_up_after_polls(2);

        let adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.radio_state(), Ok(RadioState::Enabled));
    }

    #[tokio::test]
    async fn enable_radio_requires_session_handle() {
        let _guard = test_lock();
        emulator::reset();

        let mut adapter = AceAdapter {
            session: Handle(ptr::null_mut()),
            scan: None,
            events: callbacks::install_sink().unwrap(),
        };
        assert!(matches!(
            adapter.enable_radio().await,
            Err(BluetoothError::FailedPrecondition(_))
        ));
    }

    #[tokio::test]
    async fn radio_state_error_is_returned() {
        let _guard = test_lock();
        emulator::reset();
        emulator::force_status(EmulatedCall::GetRadioState, ACEBT_STATUS_NOT_READY);

        let result = AceAdapter::default().await;
        assert!(matches!(result, Err(BluetoothError::NotReady)));
    }

    #[tokio::test]
    async fn failed_session_releases_sink() {
        let _guard = test_lock();
        emulator::reset();
        emulator::force_status(EmulatedCall::OpenSession, ACEBT_STATUS_NOMEM);

        assert!(matches!(
            AceAdapter::open(),
            Err(BluetoothError::OutOfMemory)
        ));

        emulator::reset();
        assert!(AceAdapter::open().is_ok());
    }

    #[tokio::test]
    async fn only_one_adapter_per_process() {
        let _guard = test_lock();
        emulator::reset();

        let _first = AceAdapter::open().unwrap();
        assert!(matches!(
            AceAdapter::open(),
            Err(BluetoothError::FailedPrecondition(_))
        ));
    }

    #[tokio::test]
    async fn register_waits_for_callback() {
        let _guard = test_lock();
        emulator::reset();

        let mut adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.register_beacon().await, Ok(()));
        assert!(emulator::is_registered());
    }

    #[tokio::test]
    async fn register_reports_callback_failure() {
        let _guard = test_lock();
        emulator::reset();
        emulator::set_registration_status(ACEBT_STATUS_FAIL);

        let mut adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.register_beacon().await, Err(BluetoothError::Failed));
        assert!(!emulator::is_registered());
    }

    #[tokio::test(start_paused = true)]
    async fn register_times_out_without_callback() {
        let _guard = test_lock();
        emulator::reset();
        emulator::silence_registration(true);

        let mut adapter = AceAdapter::default().await.unwrap();
        assert!(matches!(
            adapter.register_beacon().await,
            Err(BluetoothError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn register_fails_when_event_stream_closes() {
        let _guard = test_lock();
        emulator::reset();
        emulator::silence_registration(true);

        let mut adapter = AceAdapter::default().await.unwrap();
        callbacks::clear_sink();
        assert!(matches!(
            adapter.register_beacon().await,
            Err(BluetoothError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn register_reports_synchronous_failure() {
        let _guard = test_lock();
        emulator::reset();
        emulator::force_status(EmulatedCall::RegisterBeaconClient, ACEBT_STATUS_BUSY);

        let mut adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.register_beacon().await, Err(BluetoothError::Busy));
    }

    #[tokio::test]
    async fn scan_before_registration_is_not_ready() {
        let _guard = test_lock();
        emulator::reset();

        let mut adapter = AceAdapter::default().await.unwrap();
        assert_eq!(adapter.start_scan(), Err(BluetoothError::NotReady));
        assert!(!adapter.is_scanning());
    }

    #[tokio::test]
    async fn scan_preconditions() {
        let _guard = test_lock();
        emulator::reset();

        let mut adapter = AceAdapter::default().await.unwrap();
        assert!(matches!(
            adapter.stop_scan(),
            Err(BluetoothError::FailedPrecondition(_))
        ));
        assert!(matches!(
            adapter.next_advertisement().await,
            Err(BluetoothError::FailedPrecondition(_))
        ));

        adapter.register_beacon().await.unwrap();
        adapter.start_scan().unwrap();
        assert!(matches!(
            adapter.start_scan(),
            Err(BluetoothError::FailedPrecondition(_))
        ));

        adapter.stop_scan().unwrap();
        assert!(!adapter.is_scanning());
        assert!(!emulator::is_scanning());
    }

    #[tokio::test]
    async fn scan_delivers_copied_results() {
        let _guard = test_lock();
        emulator::reset();
        emulator::set_devices(vec![
            EmulatedDevice::new([1, 1, 1, 1, 1, 1], -40)
                .with_name("Lightblue Bean")
                .with_tx_power(-4),
            EmulatedDevice::new([2, 2, 2, 2, 2, 2], -80),
        ]);

        let mut adapter = AceAdapter::default().await.unwrap();
        adapter.register_beacon().await.unwrap();
        adapter.start_scan().unwrap();

        let first = adapter.next_advertisement().await.unwrap();
        assert_eq!(first.address().to_string(), "01:01:01:01:01:01");
        assert_eq!(first.name(), Some("Lightblue Bean"));
        assert_eq!(first.tx_power(), Some(-4));
        assert_eq!(first.rssi(), -40);

        let second = adapter.next_advertisement().await.unwrap();
        assert_eq!(second.address().to_string(), "02:02:02:02:02:02");
        assert_eq!(second.name(), None);

        adapter.stop_scan().unwrap();
    }

    #[tokio::test]
    async fn new_scan_ignores_results_of_stopped_scan() {
        let _guard = test_lock();
        emulator::reset();
        emulator::set_devices(vec![
            EmulatedDevice::new([1; 6], -40),
            EmulatedDevice::new([2; 6], -50),
        ]);

        let mut adapter = AceAdapter::default().await.unwrap();
        adapter.register_beacon().await.unwrap();
        adapter.start_scan().unwrap();
        let first = adapter.next_advertisement().await.unwrap();
        assert_eq!(first.address(), BleAddress::new([1; 6]));
        adapter.stop_scan().unwrap();

        emulator::set_devices(vec![EmulatedDevice::new([9; 6], -60)]);
        adapter.start_scan().unwrap();
        let next = adapter.next_advertisement().await.unwrap();
        assert_eq!(next.address(), BleAddress::new([9; 6]));
        adapter.stop_scan().unwrap();
    }

    #[tokio::test]
    async fn scan_failure_surfaces() {
        let _guard = test_lock();
        emulator::reset();
        emulator::fail_scans(true);

        let mut adapter = AceAdapter::default().await.unwrap();
        adapter.register_beacon().await.unwrap();
        adapter.start_scan().unwrap();

        assert_eq!(
            adapter.next_advertisement().await,
            Err(BluetoothError::Failed)
        );
    }

    #[tokio::test]
    async fn drop_stops_running_scan() {
        let _guard = test_lock();
        emulator::reset();

        {
            let mut adapter = AceAdapter::default().await.unwrap();
            adapter.register_beacon().await.unwrap();
            adapter.start_scan().unwrap();
            assert!(emulator::is_scanning());
        }

        assert!(!emulator::is_scanning());
        assert!(AceAdapter::open().is_ok());
    }
}
