// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![no_main]

use graphbin::Container;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut container) = Container::import(data) else {
        return;
    };
    // Drain every segment until a read fails.
    while container.read_flag().is_ok() {}
    while container.read_u8().is_ok() {}
    let _ = container.read_str(1 << 16);
    let _ = container.is_exhausted();
});
