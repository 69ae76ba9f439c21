/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Initial PSTATE for the images BL31 hands over to.

use {
    aarch64_cpu::registers::SPSR_EL3,
    bit_field::BitField,
    tock_registers::{
        interfaces::{Readable, Writeable},
        registers::InMemoryRegister,
    },
};

/// The secure payload is entered with a zero SPSR, as its dispatcher expects.
pub const fn spsr_for_bl32_entry() -> u32 {
    0
}

/// PSTATE for entering the non-secure image.
///
/// Built for EL2h (EL1h where EL2 is absent) with all of DAIF masked, then moved to EL1: the
/// NPCM845x boot chain runs its non-secure image at EL1 whatever the core implements.
pub fn spsr_for_bl33_entry(el2_present: bool) -> u32 {
    let spsr = InMemoryRegister::<u64, SPSR_EL3::Register>::new(0);
    let mode = if el2_present {
        SPSR_EL3::M::EL2h
    } else {
        SPSR_EL3::M::EL1h
    };
    spsr.write(
        SPSR_EL3::D::Masked + SPSR_EL3::A::Masked + SPSR_EL3::I::Masked + SPSR_EL3::F::Masked + mode,
    );

    let mut value = spsr.get() as u32;
    // M[3:2] is the target EL.
    value.set_bit(3, false);
    value.set_bit(2, true);
    value
}
