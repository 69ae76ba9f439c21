/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! BL31 section boundaries exported by the linker script.

use {super::Bl31Layout, core::cell::UnsafeCell};

// Symbols from the linker script. Every boundary is page aligned.
extern "Rust" {
    // [__BL31_START, __BL31_END): the whole image, including .bss and the stacks.
    static __BL31_START: UnsafeCell<()>;
    static __BL31_END: UnsafeCell<()>;

    // [__TEXT_START, __TEXT_END)
    static __TEXT_START: UnsafeCell<()>;
    static __TEXT_END: UnsafeCell<()>;

    // [__RODATA_START, __RODATA_END)
    static __RODATA_START: UnsafeCell<()>;
    static __RODATA_END: UnsafeCell<()>;

    // [__COHERENT_RAM_START, __COHERENT_RAM_END), empty unless coherent memory is used.
    static __COHERENT_RAM_START: UnsafeCell<()>;
    static __COHERENT_RAM_END: UnsafeCell<()>;
}

/// Section boundaries of the running image.
pub fn bl31_layout() -> Bl31Layout {
    unsafe {
        Bl31Layout {
            bl31_start: __BL31_START.get() as usize,
            bl31_end: __BL31_END.get() as usize,
            code_start: __TEXT_START.get() as usize,
            code_end: __TEXT_END.get() as usize,
            rodata_start: __RODATA_START.get() as usize,
            rodata_end: __RODATA_END.get() as usize,
            coherent_ram_start: __COHERENT_RAM_START.get() as usize,
            coherent_ram_end: __COHERENT_RAM_END.get() as usize,
        }
    }
}
