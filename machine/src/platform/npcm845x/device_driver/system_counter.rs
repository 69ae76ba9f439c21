/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 *
 * Memory-mapped system counter control frame (CNTControlBase).
 */

use {
    crate::mmio_deref_wrapper::MMIODerefWrapper,
    tock_registers::{
        interfaces::{Readable, Writeable},
        register_bitfields, register_structs,
        registers::{ReadOnly, ReadWrite},
    },
};

register_bitfields! {
    u32,

    /// Counter Control Register
    CNTCR [
        /// Frequency change request, index into the frequency modes table.
        FCREQ OFFSET(8) NUMBITS(10) [],
        /// Halt the counter on debug.
        HDBG OFFSET(1) NUMBITS(1) [],
        EN OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => CNTCR: ReadWrite<u32, CNTCR::Register>),
        (0x04 => CNTSR: ReadOnly<u32>),
        (0x08 => __reserved_1),
        (0x20 => CNTFID0: ReadWrite<u32>),
        (0x24 => __reserved_2),
        (0x30 => @END),
    }
}

type Registers = MMIODerefWrapper<RegisterBlock>;

/// The system-level generic counter feeding every core's CNTPCT.
pub struct SystemCounter {
    registers: Registers,
}

impl SystemCounter {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(base_addr: usize) -> Self {
        Self {
            registers: Registers::new(base_addr),
        }
    }

    /// Start counting at the first entry of the frequency table.
    pub fn enable(&self) {
        self.registers.CNTCR.write(CNTCR::FCREQ.val(0) + CNTCR::EN::SET);
    }

    /// Base frequency entry of the frequency modes table.
    pub fn base_frequency(&self) -> u32 {
        self.registers.CNTFID0.get()
    }
}
