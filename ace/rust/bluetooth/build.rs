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

use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=ACE_BT_LIB_DIR");

    // The emulator stands in for libace_bt unless the vendor feature is on.
    if env::var_os("CARGO_FEATURE_VENDOR").is_none() {
        return;
    }

    if let Some(lib_dir) = env::var_os("ACE_BT_LIB_DIR") {
        println!(
            "cargo:rustc-link-search=native={}",
            lib_dir.to_string_lossy()
        );
    }
    println!("cargo:rustc-link-lib=ace_bt");
}
