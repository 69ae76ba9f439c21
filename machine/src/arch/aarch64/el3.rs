/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Leaving EL3 for the next image.

use {
    crate::handoff::{EntryPointInfo, SecurityState},
    aarch64_cpu::registers::{ELR_EL3, SCR_EL3, SPSR_EL3},
    tock_registers::interfaces::Writeable,
};

/// Program the EL3 return state from `ep` and `eret` into the image.
///
/// The image starts with `ep.args[0..4]` in x0..x3.
///
/// # Safety
///
/// `ep.pc` must be the entry of a loaded image that is valid to run in the world and at the
/// exception level `ep` describes. Nothing on the BL31 stack survives.
pub unsafe fn enter_next_image(ep: &EntryPointInfo) -> ! {
    let world = match ep.security_state() {
        SecurityState::NonSecure => SCR_EL3::NS::NonSecure,
        SecurityState::Secure => SCR_EL3::NS::Secure,
    };
    SCR_EL3.write(SCR_EL3::RW::NextELIsAarch64 + world);
    SPSR_EL3.set(u64::from(ep.spsr));
    ELR_EL3.set(ep.pc);

    eret_with_args(&ep.args)
}

#[cfg(target_arch = "aarch64")]
unsafe fn eret_with_args(args: &[u64; 8]) -> ! {
    use aarch64_cpu::asm::barrier;

    barrier::isb(barrier::SY);
    core::arch::asm!(
        "eret",
        in("x0") args[0],
        in("x1") args[1],
        in("x2") args[2],
        in("x3") args[3],
        options(noreturn)
    )
}

#[cfg(not(target_arch = "aarch64"))]
unsafe fn eret_with_args(_args: &[u64; 8]) -> ! {
    crate::endless_sleep()
}
