/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 *
 * TrustZone memory window control.
 */

use {
    crate::{
        mmio_deref_wrapper::MMIODerefWrapper,
        sync::{interface::Mutex, NullLock},
    },
    snafu::{ensure, Snafu},
    tock_registers::{
        interfaces::ReadWriteable, register_bitfields, register_structs, registers::ReadWrite,
    },
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// Window Control Register
    WINCTL [
        /// Accesses from the secure world only.
        ENABLE OFFSET(0) NUMBITS(1) []
    ]
}

const NUM_WINDOWS: usize = 16;

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => WindowControl: [ReadWrite<u32, WINCTL::Register>; NUM_WINDOWS]),
        (0x40 => @END),
    }
}

type Registers = MMIODerefWrapper<RegisterBlock>;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Windows covering the upper part of RAM2, where BL31 lives.
pub const RAM2_AREA4_INDEX: usize = 4;
pub const RAM2_AREA5_INDEX: usize = 5;
pub const RAM2_AREA6_INDEX: usize = 6;
pub const RAM2_AREA7_INDEX: usize = 7;

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum TrustZoneError {
    #[snafu(display("No TrustZone window {index}"))]
    NoSuchWindow { index: usize },
}

pub struct TrustZoneController {
    registers: NullLock<Registers>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl TrustZoneController {
    pub const COMPATIBLE: &'static str = "nuvoton,npcm845x-tzc";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(base_addr: usize) -> Self {
        Self {
            registers: NullLock::new(Registers::new(base_addr)),
        }
    }

    /// Turn secure-only protection of window `index` on or off.
    pub fn enable_window(&self, index: usize, enable: bool) -> Result<(), TrustZoneError> {
        ensure!(index < NUM_WINDOWS, NoSuchWindowSnafu { index });

        self.registers.lock(|regs| {
            let state = if enable {
                WINCTL::ENABLE::SET
            } else {
                WINCTL::ENABLE::CLEAR
            };
            regs.WindowControl[index].modify(state);
        });
        Ok(())
    }
}

impl crate::drivers::interface::DeviceDriver for TrustZoneController {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
