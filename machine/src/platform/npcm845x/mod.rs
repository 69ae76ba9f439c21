/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Nuvoton NPCM845x (Arbel): quad Cortex-A35 BMC SoC.
//!
//! BL31 runs from the top of RAM2 on the primary core, with the boot ROM having brought up DDR
//! and the console UART already.

pub mod bl31_setup;
pub mod device_driver;
pub mod memory;

pub use bl31_setup::*;

/// Reference clock into the PLLs, in kHz.
pub const CLKREF_FREQUENCY_KHZ: u64 = 25_000;

/// System counter (CNTFRQ) frequency in Hz.
pub const COUNTER_FREQUENCY: u32 = 25_000_000;

/// Fixed UART clock of the Palladium emulator.
pub const PALLADIUM_UART_CLOCK: u32 = 24_000_000;

pub const CONSOLE_BAUDRATE: u32 = 115_200;

/// Level 2 and 3 tables available for the EL3 memory map.
pub const MAX_XLAT_TABLES: usize = 8;
