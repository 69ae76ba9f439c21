/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! NPCM845x device drivers.

pub mod clock;
pub mod gicv2;
pub mod ns16550_uart;
pub mod system_counter;
pub mod trustzone;

#[cfg(test)]
pub(crate) mod fake_mmio;

pub use {
    clock::{Bus, ClockController, ClockError, ClockId, MmcDevice, Pll},
    gicv2::{SecureInterrupt, GICv2},
    ns16550_uart::{Ns16550Uart, UartError},
    system_counter::SystemCounter,
    trustzone::{TrustZoneController, TrustZoneError},
};
