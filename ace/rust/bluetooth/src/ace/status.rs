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

use super::ffi::*;
use crate::common::BluetoothError;

/// Turn a status returned by (or reported through a callback of) the stack
/// into a `Result`.
pub(crate) fn check(status: ace_status_t) -> Result<(), BluetoothError> {
    match status {
        ACE_STATUS_OK => Ok(()),
        ACEBT_STATUS_NOMEM => Err(BluetoothError::OutOfMemory),
        ACEBT_STATUS_BUSY => Err(BluetoothError::Busy),
        ACEBT_STATUS_PARM_INVALID => Err(BluetoothError::InvalidParameter),
        ACEBT_STATUS_NOT_READY => Err(BluetoothError::NotReady),
        ACEBT_STATUS_FAIL => Err(BluetoothError::Failed),
        other => Err(BluetoothError::Unknown(other)),
    }
}
