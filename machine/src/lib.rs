/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Early-boot platform code for the Nuvoton NPCM845x (Arbel) SoC.
//!
//! Everything the EL3 secure monitor needs before it can hand over to the next boot stage:
//! the clock controller driver, the boot handoff parser, the EL3 translation tables and the
//! platform bring-up sequence.

#![cfg_attr(not(test), no_std)]
#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::enum_variant_names)]
#![allow(missing_docs)] // Temp: switch to deny
#![deny(warnings)]

#[macro_use]
pub mod macros;

pub mod arch;

pub use arch::*;

pub mod console;
pub mod cpu;
pub mod devices;
pub mod drivers;
pub mod handoff;
pub mod memory;
mod mm;
pub mod mmio_deref_wrapper;
pub mod panic;
pub mod platform;
pub mod sync;
pub mod time;
