// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2020-2022 Andre Richter <andre.o.richter@gmail.com>

//! Processor code.

use crate::arch::aarch64::cpu as arch_cpu;

//--------------------------------------------------------------------------------------------------
// Architectural Public Reexports
//--------------------------------------------------------------------------------------------------
pub use arch_cpu::{el2_implemented, endless_sleep, nop};

/// Loop for a given number of `nop` instructions.
///
/// Used for the fixed settle times of the clock controller, which must not depend on the
/// generic timer being set up.
#[inline]
pub fn loop_delay(rounds: u32) {
    for _ in 0..rounds {
        nop();
    }
}

/// Loop while a passed function returns `true`.
#[inline]
pub fn loop_while<F: Fn() -> bool>(f: F) {
    loop {
        if !f() {
            break;
        }
        nop();
    }
}
