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

//! Process identity helpers.

use std::{ffi::CStr, io};

use anyhow::{Context, Result};
use tracing::info;

/// Switch to `uid`/`gid` when running as root. The ACE stack refuses
/// clients running as root. The group goes first; it can't be changed once
/// root is given up.
pub fn drop_privileges(uid: u32, gid: u32) -> Result<()> {
    if unsafe { libc::geteuid() } == 0 {
        if unsafe { libc::setgid(gid) } != 0 {
            return Err(io::Error::last_os_error())
                .with_context(|| format!("failed to set GID to {gid}"));
        }
        if unsafe { libc::setuid(uid) } != 0 {
            return Err(io::Error::last_os_error())
                .with_context(|| format!("failed to set UID to {uid}"));
        }
    }

    let (uid, gid) = unsafe { (libc::getuid(), libc::getgid()) };
    info!(uid, gid, "running as nonroot user");
    Ok(())
}

pub fn hostname() -> Result<String> {
    let mut buf = [0 as libc::c_char; 256];
    if unsafe { libc::gethostname(buf.as_mut_ptr(), buf.len()) } != 0 {
        return Err(io::Error::last_os_error()).context("failed to read hostname");
    }
    // Truncated names are not guaranteed to be NUL terminated.
    buf[buf.len() - 1] = 0;

    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Ok(name.to_string_lossy().into_owned())
}
