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

use thiserror::Error;

/// Library error type.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Clone)]
pub enum BluetoothError {
    /// `ACEBT_STATUS_NOMEM`.
    #[error("ACE out of memory")]
    OutOfMemory,
    /// `ACEBT_STATUS_BUSY`.
    #[error("ACE is busy connecting another device")]
    Busy,
    /// `ACEBT_STATUS_PARM_INVALID`.
    #[error("ACE request contains invalid parameters")]
    InvalidParameter,
    /// `ACEBT_STATUS_NOT_READY`. The Bluetooth server has not finished
    /// starting up, or the radio is off.
    #[error("ACE server not ready")]
    NotReady,
    /// `ACEBT_STATUS_FAIL`, or a failure the stack reported through a
    /// callback (e.g. a scan moving to the failed state).
    #[error("ACE failed")]
    Failed,
    /// A status code the library doesn't know about.
    #[error("ACE unknown error: {0}")]
    Unknown(i32),
    /// Indicates that the operation was rejected because the system is not in
    /// a state required for the operation's execution.
    /// E.g. The user calls `stop_scan()` or polls the advertisement stream
    /// before calling `start_scan()`.
    #[error("failed precondition: {0}")]
    FailedPrecondition(String),
    /// The stack didn't reach the expected state in time.
    #[error("timed out: {0}")]
    Timeout(String),
    /// Reported when a value can't be turned into the requested type, e.g.
    /// a malformed address string or a radio state outside the known range.
    #[error("bad value: {0}")]
    BadValue(String),
    /// Reported when a bug occurs inside the library. Whenever a seemingly
    /// impossible error condition arises where you could call `expect()`,
    /// return this error instead.
    #[error("internal error: {0}")]
    Internal(String),
}
