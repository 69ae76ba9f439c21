/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Implementation of aarch64 firmware functions.

#[macro_use]
pub mod sysreg;

pub mod cpu;
pub mod el3;
pub mod memory;
pub mod time;

pub use cpu::{endless_sleep, nop};
