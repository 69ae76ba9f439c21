/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

// Assembly counterpart to this file.
#[cfg(feature = "asm")]
core::arch::global_asm!(include_str!("boot.s"));

// Make first function small enough so that compiler doesn't try
// to create a huge stack frame before we have a chance to set SP.
// x0..x3 carry the previous stage's arguments and must survive until _start_rust.
#[no_mangle]
#[link_section = ".text._start"]
#[cfg(not(feature = "asm"))]
pub unsafe extern "C" fn _start(arg0: usize, arg1: usize, arg2: usize, arg3: usize) -> ! {
    use {
        aarch64_cpu::registers::{MPIDR_EL1, SP},
        core::cell::UnsafeCell,
        machine::endless_sleep,
        tock_registers::interfaces::{Readable, Writeable},
    };

    const CORE_0: u64 = 0;
    const CORE_MASK: u64 = 0x3;

    if CORE_0 != MPIDR_EL1.get() & CORE_MASK {
        // Secondaries wait for PSCI, which this image does not provide.
        endless_sleep()
    }

    extern "Rust" {
        static __bl31_stack_end_exclusive: UnsafeCell<()>;
    }
    SP.set(__bl31_stack_end_exclusive.get() as u64);

    reset(arg0, arg1, arg2, arg3)
}

#[no_mangle]
#[link_section = ".text._start"]
#[cfg(not(feature = "asm"))]
pub unsafe extern "C" fn reset(arg0: usize, arg1: usize, arg2: usize, arg3: usize) -> ! {
    use core::sync::{atomic, atomic::Ordering};

    extern "C" {
        // Boundaries of the .bss section, provided by the linker script
        static mut __bss_start: u64;
        static mut __bss_end_exclusive: u64;
    }

    r0::zero_bss(
        core::ptr::addr_of_mut!(__bss_start),
        core::ptr::addr_of_mut!(__bss_end_exclusive),
    );

    // No statics were touched before this point.
    atomic::compiler_fence(Ordering::SeqCst);

    _start_rust(arg0, arg1, arg2, arg3)
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// The Rust entry of the `bl31` binary.
///
/// The function is called from the assembly `_start` function, keep it to support "asm" feature.
#[no_mangle]
pub unsafe extern "C" fn _start_rust(arg0: usize, arg1: usize, arg2: usize, arg3: usize) -> ! {
    crate::bl31_main(arg0, arg1, arg2, arg3)
}
