/*
 * SPDX-License-Identifier: MIT OR BlueOak-1.0.0
 * Copyright (c) 2018-2019 Andre Richter <andre.o.richter@gmail.com>
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 * Original code distributed under MIT, additional changes are under BlueOak-1.0.0
 */

//! EL3 MMU initialisation.
//!
//! One translation regime, TTBR0_EL3 only, 4 KiB granule and a 32-bit address space starting
//! at a level 1 table.

use {
    crate::memory::mmu::{interface, MMUEnableError},
    tock_registers::{
        interfaces::{ReadWriteable, Readable, Writeable},
        register_bitfields,
        registers::InMemoryRegister,
    },
    usize_conversions::FromUsize,
};

pub mod translation_table;

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {u64,
    MAIR_EL3 [
        /// Attribute 2, device memory.
        Attr2 OFFSET(16) NUMBITS(8) [
            Device_nGnRE = 0x04
        ],
        /// Attribute 1, normal memory without caching.
        Attr1 OFFSET(8) NUMBITS(8) [
            Normal_NonCacheable = 0x44
        ],
        /// Attribute 0, regular cacheable memory.
        Attr0 OFFSET(0) NUMBITS(8) [
            Normal_WriteBack_ReadWriteAlloc = 0xff
        ]
    ],

    TCR_EL3 [
        RES1_31 OFFSET(31) NUMBITS(1) [],
        RES1_23 OFFSET(23) NUMBITS(1) [],
        /// Physical address size.
        PS OFFSET(16) NUMBITS(3) [
            Bits_32 = 0b000,
            Bits_36 = 0b001,
            Bits_40 = 0b010
        ],
        TG0 OFFSET(14) NUMBITS(2) [
            KiB_4 = 0b00,
            KiB_64 = 0b01,
            KiB_16 = 0b10
        ],
        SH0 OFFSET(12) NUMBITS(2) [
            None = 0b00,
            Outer = 0b10,
            Inner = 0b11
        ],
        ORGN0 OFFSET(10) NUMBITS(2) [
            NonCacheable = 0b00,
            WriteBack_ReadAlloc_WriteAlloc_Cacheable = 0b01
        ],
        IRGN0 OFFSET(8) NUMBITS(2) [
            NonCacheable = 0b00,
            WriteBack_ReadAlloc_WriteAlloc_Cacheable = 0b01
        ],
        T0SZ OFFSET(0) NUMBITS(6) []
    ],

    SCTLR_EL3 [
        /// Writable means execute-never.
        WXN OFFSET(19) NUMBITS(1) [],
        I OFFSET(12) NUMBITS(1) [],
        C OFFSET(2) NUMBITS(1) [],
        A OFFSET(1) NUMBITS(1) [],
        M OFFSET(0) NUMBITS(1) []
    ]
}

/// Memory Management unit type.
struct MemoryManagementUnit;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Constants for indexing the MAIR_EL3.
pub mod mair {
    // Three descriptive consts for indexing into the correct MAIR_EL3 attributes.
    pub mod attr {
        pub const NORMAL: u64 = 0;
        pub const NORMAL_NON_CACHEABLE: u64 = 1;
        pub const DEVICE_NGNRE: u64 = 2;
    }
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static MMU: MemoryManagementUnit = MemoryManagementUnit;

//--------------------------------------------------------------------------------------------------
// Private Implementations
//--------------------------------------------------------------------------------------------------

/// The three memory types the tables refer to by index.
fn mair_value() -> u64 {
    let mair = InMemoryRegister::<u64, MAIR_EL3::Register>::new(0);
    mair.write(
        MAIR_EL3::Attr2::Device_nGnRE
            + MAIR_EL3::Attr1::Normal_NonCacheable
            + MAIR_EL3::Attr0::Normal_WriteBack_ReadWriteAlloc,
    );
    mair.get()
}

/// Walks are cacheable and inner shareable, over a 32-bit address space.
fn tcr_value() -> u64 {
    let tcr = InMemoryRegister::<u64, TCR_EL3::Register>::new(0);
    tcr.write(
        TCR_EL3::RES1_31::SET
            + TCR_EL3::RES1_23::SET
            + TCR_EL3::PS::Bits_32
            + TCR_EL3::TG0::KiB_4
            + TCR_EL3::SH0::Inner
            + TCR_EL3::ORGN0::WriteBack_ReadAlloc_WriteAlloc_Cacheable
            + TCR_EL3::IRGN0::WriteBack_ReadAlloc_WriteAlloc_Cacheable
            + TCR_EL3::T0SZ.val(64 - translation_table::ADDR_SPACE_SHIFT as u64),
    );
    tcr.get()
}

/// `sctlr` with the MMU, the data cache and WXN switched on. Every other bit is kept.
fn sctlr_enabled(sctlr: u64) -> u64 {
    let reg = InMemoryRegister::<u64, SCTLR_EL3::Register>::new(sctlr);
    reg.modify(SCTLR_EL3::M::SET + SCTLR_EL3::C::SET + SCTLR_EL3::WXN::SET);
    reg.get()
}

//--------------------------------------------------------------------------------------------------
// Public Implementations
//--------------------------------------------------------------------------------------------------

/// Return a reference to the MMU instance.
pub fn mmu() -> &'static impl interface::MMU {
    &MMU
}

//------------------------------------------------------------------------------
// OS Interface Code
//------------------------------------------------------------------------------

impl interface::MMU for MemoryManagementUnit {
    unsafe fn enable_mmu_and_caching(&self, table_base: usize) -> Result<(), MMUEnableError> {
        use aarch64_cpu::asm::barrier;

        if self.is_enabled() {
            return Err(MMUEnableError::AlreadyEnabled);
        }

        // The base table is 32 bytes; TTBR0_EL3 needs it naturally aligned.
        if table_base % (translation_table::BASE_TABLE_ENTRIES * 8) != 0 {
            return Err(MMUEnableError::Other {
                err: "Translation table base is misaligned",
            });
        }

        // Discard anything cached from before the tables existed.
        #[cfg(target_arch = "aarch64")]
        core::arch::asm!("tlbi alle3", options(nostack));
        barrier::dsb(barrier::ISH);
        barrier::isb(barrier::SY);

        write_sysreg!("mair_el3", mair_value());
        write_sysreg!("tcr_el3", tcr_value());
        write_sysreg!("ttbr0_el3", u64::from_usize(table_base));

        // Force all previous changes to be seen before the MMU is enabled.
        barrier::dsb(barrier::ISH);
        barrier::isb(barrier::SY);

        let sctlr = read_sysreg!("sctlr_el3");
        write_sysreg!("sctlr_el3", sctlr_enabled(sctlr));

        barrier::isb(barrier::SY);

        Ok(())
    }

    #[inline(always)]
    fn is_enabled(&self) -> bool {
        let sctlr = InMemoryRegister::<u64, SCTLR_EL3::Register>::new(read_sysreg!("sctlr_el3"));
        sctlr.is_set(SCTLR_EL3::M)
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mair_matches_attribute_indices() {
        let mair = mair_value();
        assert_eq!(mair, 0x0004_44ff);
        assert_eq!((mair >> (8 * mair::attr::NORMAL)) & 0xff, 0xff);
        assert_eq!((mair >> (8 * mair::attr::NORMAL_NON_CACHEABLE)) & 0xff, 0x44);
        assert_eq!((mair >> (8 * mair::attr::DEVICE_NGNRE)) & 0xff, 0x04);
    }

    #[test]
    fn tcr_describes_a_32_bit_4k_regime() {
        assert_eq!(tcr_value(), 0x8080_3520);
    }

    #[test]
    fn sctlr_keeps_existing_bits() {
        // RES1 bits of SCTLR_EL3 plus I.
        let reset = 0x30c5_1830;
        let enabled = sctlr_enabled(reset);
        assert_eq!(enabled, reset | (1 << 19) | (1 << 2) | 1);
    }
}
