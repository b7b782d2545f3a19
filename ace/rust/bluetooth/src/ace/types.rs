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

//! Decoding of the raw enum values the stack hands across the FFI boundary.

use super::ffi::*;
use crate::common::{
    AdvState, BeaconMode, BleAddress, BluetoothError, PowerMode, RadioState,
    ScanInstance, ScanState,
};

impl TryFrom<aceBT_state_t> for RadioState {
    type Error = BluetoothError;

    fn try_from(state: aceBT_state_t) -> Result<Self, Self::Error> {
        match state {
            ACEBT_STATE_DISABLED => Ok(RadioState::Disabled),
            ACEBT_STATE_ENABLED => Ok(RadioState::Enabled),
            ACEBT_STATE_ENABLING => Ok(RadioState::Enabling),
            ACEBT_STATE_DISABLING => Ok(RadioState::Disabling),
            other => Err(BluetoothError::BadValue(format!(
                "unknown radio state: {other}"
            ))),
        }
    }
}

impl From<RadioState> for aceBT_state_t {
    fn from(state: RadioState) -> Self {
        match state {
            RadioState::Disabled => ACEBT_STATE_DISABLED,
            RadioState::Enabled => ACEBT_STATE_ENABLED,
            RadioState::Enabling => ACEBT_STATE_ENABLING,
            RadioState::Disabling => ACEBT_STATE_DISABLING,
        }
    }
}

impl ScanState {
    pub(crate) fn from_raw(state: aceBT_beaconScanState_t) -> Self {
        match state {
            ACEBT_BEACON_SCAN_FAILED => ScanState::Failed,
            ACEBT_BEACON_SCAN_QUEUED => ScanState::Queued,
            ACEBT_BEACON_SCAN_STARTED => ScanState::Started,
            ACEBT_BEACON_SCAN_PAUSED => ScanState::Paused,
            ACEBT_BEACON_SCAN_STOPPED => ScanState::Stopped,
            other => ScanState::Unknown(other),
        }
    }
}

impl AdvState {
    pub(crate) fn from_raw(state: aceBT_beaconAdvState_t) -> Self {
        match state {
            ACEBT_BEACON_ADV_FAILED => AdvState::Failed,
            ACEBT_BEACON_ADV_QUEUED => AdvState::Queued,
            ACEBT_BEACON_ADV_STARTED => AdvState::Started,
            ACEBT_BEACON_ADV_PAUSED => AdvState::Paused,
            ACEBT_BEACON_ADV_STOPPED => AdvState::Stopped,
            other => AdvState::Unknown(other),
        }
    }
}

impl PowerMode {
    pub(crate) fn from_raw(mode: aceBT_beaconPowerMode_t) -> Self {
        match mode {
            ACEBT_BEACON_ADV_TX_POWER_ULTRA_LOW => PowerMode::UltraLow,
            ACEBT_BEACON_ADV_TX_POWER_LOW => PowerMode::Low,
            ACEBT_BEACON_ADV_TX_POWER_MEDIUM => PowerMode::Medium,
            ACEBT_BEACON_ADV_TX_POWER_HIGH => PowerMode::High,
            other => PowerMode::Unknown(other),
        }
    }
}

impl BeaconMode {
    pub(crate) fn from_raw(mode: aceBT_beaconAdvMode_t) -> Self {
        match mode {
            ACEBT_BEACON_ADV_MODE_LOW_LATENCY => BeaconMode::LowLatency,
            ACEBT_BEACON_ADV_MODE_BALANCED => BeaconMode::Balanced,
            ACEBT_BEACON_ADV_MODE_LOW_POWER => BeaconMode::LowPower,
            other => BeaconMode::Unknown(other),
        }
    }
}

impl From<aceBT_scanInstanceHandle> for ScanInstance {
    fn from(handle: aceBT_scanInstanceHandle) -> Self {
        ScanInstance::new(handle as usize)
    }
}

impl From<aceBT_bdAddr_t> for BleAddress {
    fn from(addr: aceBT_bdAddr_t) -> Self {
        BleAddress::new(addr.address)
    }
}

impl From<BleAddress> for aceBT_bdAddr_t {
    fn from(addr: BleAddress) -> Self {
        aceBT_bdAddr_t {
            address: addr.octets(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radio_state_round_trips_known_values() {
        for state in [
            RadioState::Disabled,
            RadioState::Enabled,
            RadioState::Enabling,
            RadioState::Disabling,
        ] {
            let raw: aceBT_state_t = state.into();
            assert_eq!(RadioState::try_from(raw), Ok(state));
        }
    }

    #[test]
    fn radio_state_rejects_unknown_value() {
        assert!(matches!(
            RadioState::try_from(77),
            Err(BluetoothError::BadValue(_))
        ));
    }

    #[test]
    fn scan_state_from_raw() {
        assert_eq!(
            ScanState::from_raw(ACEBT_BEACON_SCAN_FAILED),
            ScanState::Failed
        );
        assert_eq!(
            ScanState::from_raw(ACEBT_BEACON_SCAN_QUEUED),
            ScanState::Queued
        );
        assert_eq!(
            ScanState::from_raw(ACEBT_BEACON_SCAN_STARTED),
            ScanState::Started
        );
        assert_eq!(
            ScanState::from_raw(ACEBT_BEACON_SCAN_PAUSED),
            ScanState::Paused
        );
        assert_eq!(
            ScanState::from_raw(ACEBT_BEACON_SCAN_STOPPED),
            ScanState::Stopped
        );
        assert_eq!(ScanState::from_raw(-3), ScanState::Unknown(-3));
    }

    #[test]
    fn adv_arguments_keep_unknown_values() {
        assert_eq!(AdvState::from_raw(99), AdvState::Unknown(99));
        assert_eq!(PowerMode::from_raw(99), PowerMode::Unknown(99));
        assert_eq!(BeaconMode::from_raw(99), BeaconMode::Unknown(99));
        assert_eq!(
            PowerMode::from_raw(ACEBT_BEACON_ADV_TX_POWER_HIGH),
            PowerMode::High
        );
        assert_eq!(
            BeaconMode::from_raw(ACEBT_BEACON_ADV_MODE_BALANCED),
            BeaconMode::Balanced
        );
    }

    #[test]
    fn scan_instance_follows_handle() {
        let mut a = 0u8;
        let mut b = 0u8;
        let first = ScanInstance::from(&mut a as *mut u8 as aceBT_scanInstanceHandle);
        assert_eq!(
            first,
            ScanInstance::from(&mut a as *mut u8 as aceBT_scanInstanceHandle)
        );
        assert_ne!(
            first,
            ScanInstance::from(&mut b as *mut u8 as aceBT_scanInstanceHandle)
        );
    }

    #[test]
    fn address_conversion() {
        let raw = aceBT_bdAddr_t {
            address: [0xde, 0xad, 0xbe, 0xef, 0x00, 0x01],
        };
        let addr = BleAddress::from(raw);
        assert_eq!(addr.to_string(), "de:ad:be:ef:00:01");
        assert_eq!(aceBT_bdAddr_t::from(addr), raw);
    }
}
