/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! A plausible BL31 layout for host tests, where there is no linker script.

use super::{map, Bl31Layout};

pub fn bl31_layout() -> Bl31Layout {
    Bl31Layout {
        bl31_start: map::BL31_BASE,
        bl31_end: map::BL31_BASE + 0x3_0000,
        code_start: map::BL31_BASE,
        code_end: map::BL31_BASE + 0xc000,
        rodata_start: map::BL31_BASE + 0xc000,
        rodata_end: map::BL31_BASE + 0x1_0000,
        coherent_ram_start: map::BL31_BASE + 0x2_f000,
        coherent_ram_end: map::BL31_BASE + 0x3_0000,
    }
}
