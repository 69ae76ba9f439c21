/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Architectural generic counter access.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(target_arch = "aarch64")] {
        use {
            aarch64_cpu::{
                asm::barrier,
                registers::{CNTFRQ_EL0, CNTPCT_EL0},
            },
            tock_registers::interfaces::{Readable, Writeable},
        };

        /// Program the counter frequency every exception level reads from CNTFRQ_EL0.
        ///
        /// Only writable from the highest implemented exception level, EL3 here.
        pub fn set_counter_frequency(freq_hz: u32) {
            CNTFRQ_EL0.set(u64::from(freq_hz));
        }

        /// Current physical count.
        pub fn counter() -> u64 {
            // Do not let the read be hoisted above earlier instructions.
            barrier::isb(barrier::SY);
            CNTPCT_EL0.get()
        }
    } else {
        pub fn set_counter_frequency(_freq_hz: u32) {}

        /// The host has no generic counter to read.
        pub fn counter() -> u64 {
            0
        }
    }
}
