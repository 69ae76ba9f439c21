/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

use tock_registers::{register_bitfields, registers::InMemoryRegister, interfaces::Readable};

register_bitfields! {u64,
    /// AArch64 Processor Feature Register 0, the exception level fields only.
    ID_AA64PFR0_EL1 [
        /// EL3 handling.
        EL3 OFFSET(12) NUMBITS(4) [
            NotImplemented = 0b0000,
            AArch64Only = 0b0001,
            AArch64AndAArch32 = 0b0010
        ],
        /// EL2 handling.
        EL2 OFFSET(8) NUMBITS(4) [
            NotImplemented = 0b0000,
            AArch64Only = 0b0001,
            AArch64AndAArch32 = 0b0010
        ]
    ]
}

/// Expose CPU-specific no-op opcode.
#[inline(always)]
pub fn nop() {
    #[cfg(target_arch = "aarch64")]
    aarch64_cpu::asm::nop();
    #[cfg(not(target_arch = "aarch64"))]
    core::hint::spin_loop();
}

/// Loop forever in sleep mode.
#[inline]
pub fn endless_sleep() -> ! {
    loop {
        #[cfg(target_arch = "aarch64")]
        aarch64_cpu::asm::wfe();
        #[cfg(not(target_arch = "aarch64"))]
        core::hint::spin_loop();
    }
}

/// Whether the executing core implements EL2.
///
/// Decides which exception level a non-secure image is entered in.
pub fn el2_implemented() -> bool {
    let pfr0 = read_sysreg!("id_aa64pfr0_el1");
    el2_present_in(pfr0)
}

fn el2_present_in(pfr0: u64) -> bool {
    let reg = InMemoryRegister::<u64, ID_AA64PFR0_EL1::Register>::new(pfr0);
    !reg.matches_all(ID_AA64PFR0_EL1::EL2::NotImplemented)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn el2_field_decodes() {
        // Cortex-A35: EL0-EL3 all AArch64 only.
        assert!(el2_present_in(0x1111));
        assert!(el2_present_in(0x2222));
        assert!(!el2_present_in(0x1011));
    }
}
