/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Platform memory map.
//!
//! The physical memory layout, all of it below 4 GiB:
//!
//! +---------------------------------------+
//! |                                       | DRAM1 @ 0x0
//! | Non-secure DRAM                       | BL33 loaded at 0x8000, DTB at 0x400_0000
//! |                                       |
//! +---------------------------------------+
//! |                                       | BL32 @ 0x600_0000
//! | Secure payload                        |
//! +---------------------------------------+
//! |                                       | 0x800_0000
//! | Non-secure DRAM                       |
//! |                                       |
//! +---------------------------------------+
//! |                                       | 0x8000_0000
//! ~                                       ~
//! +---------------------------------------+
//! | GIC-400                               | 0xdfff_0000
//! +---------------------------------------+
//! ~                                       ~
//! +---------------------------------------+
//! |                                       | DEVICE0 @ 0xf000_0000
//! | Peripherals (UART0, CLK, TZ, CNTCTL)  |
//! |                                       |
//! +---------------------------------------+
//! ~                                       ~
//! +---------------------------------------+
//! | Shared RAM                            | Trusted SRAM @ 0xfffb_0000
//! +---------------------------------------+
//! |                                       | BL31 @ 0xfffb_1000
//! | .text                                 |
//! | .rodata                               |
//! | .data, .bss, stacks, tables           |
//! |                                       |
//! +---------------------------------------+
//!                                           4 GiB

use {
    crate::memory::mmu::{AttributeFields, MmapRegion, XlatError, MAX_MMAP_REGIONS},
    static_assertions::const_assert,
};

#[cfg_attr(test, path = "layout_fake.rs")]
mod layout;

pub use layout::bl31_layout;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// The board's physical memory map.
#[rustfmt::skip]
pub mod map {
    pub const TRUSTED_SRAM_BASE: usize  = 0xfffb_0000;
    pub const TRUSTED_SRAM_SIZE: usize  =    0x5_0000;

    /// First page of trusted SRAM, shared with the other cores' boot code.
    pub const SHARED_RAM_BASE: usize    = TRUSTED_SRAM_BASE;
    pub const SHARED_RAM_SIZE: usize    =      0x1000;

    pub const BL31_BASE: usize          = SHARED_RAM_BASE + SHARED_RAM_SIZE;
    pub const BL31_LIMIT: usize         = TRUSTED_SRAM_BASE + TRUSTED_SRAM_SIZE;

    pub const DRAM1_BASE: usize         = 0x0000_0000;
    pub const DRAM1_SIZE: usize         = 0x8000_0000;

    pub const BL32_BASE: usize          = 0x0600_0000;
    pub const BL32_SIZE: usize          = 0x0200_0000;

    /// Non-secure DRAM below the secure payload.
    pub const NS_DRAM1_BASE: usize      = DRAM1_BASE;
    pub const NS_DRAM1_SIZE: usize      = BL32_BASE - DRAM1_BASE;

    /// Where the boot ROM leaves the non-secure image.
    pub const NS_IMAGE_BASE: usize      = 0x0000_8000;
    pub const PRELOADED_DTB_BASE: usize = 0x0400_0000;

    /// Physical devices.
    pub mod mmio {
        pub const DEVICE0_BASE: usize    = 0xf000_0000;
        pub const DEVICE0_SIZE: usize    = 0x0fc0_0000;

        pub const UART0_BASE: usize      = 0xf000_0000;
        pub const SYS_CNTCTL_BASE: usize = 0xf07f_c000;
        pub const CLK_BASE: usize        = 0xf080_1000;
        pub const TZ_BASE: usize         = 0xf080_3000;

        pub const GIC_BASE: usize        = 0xdfff_0000;
        pub const GIC_SIZE: usize        =    0x1_0000;
        pub const GICD_BASE: usize       = 0xdfff_9000;
        pub const GICC_BASE: usize       = 0xdfff_a000;
    }
}

/// Where the linker placed the pieces of the BL31 image.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bl31Layout {
    pub bl31_start: usize,
    pub bl31_end: usize,
    pub code_start: usize,
    pub code_end: usize,
    pub rodata_start: usize,
    pub rodata_end: usize,
    pub coherent_ram_start: usize,
    pub coherent_ram_end: usize,
}

/// The regions of one memory map, in the order they were added.
#[derive(Copy, Clone, Debug)]
pub struct MmapList {
    regions: [MmapRegion; MAX_MMAP_REGIONS],
    len: usize,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl MmapList {
    const EMPTY: MmapRegion = MmapRegion::flat("", 0, 0, AttributeFields::rw_memory());

    pub const fn new() -> Self {
        Self {
            regions: [Self::EMPTY; MAX_MMAP_REGIONS],
            len: 0,
        }
    }

    /// Append `region`. Returns it back when the list is full.
    pub fn push(&mut self, region: MmapRegion) -> Result<(), MmapRegion> {
        let slot = self.regions.get_mut(self.len).ok_or(region)?;
        *slot = region;
        self.len += 1;
        Ok(())
    }

    pub fn as_slice(&self) -> &[MmapRegion] {
        &self.regions[..self.len]
    }
}

impl Default for MmapList {
    fn default() -> Self {
        Self::new()
    }
}

/// BL31's own regions: the image, its code and read-only data, and the shared page.
///
/// An empty coherent section is left out of the map.
pub fn bl_regions(layout: &Bl31Layout) -> Result<MmapList, XlatError> {
    let mut list = MmapList::new();

    list.add(MmapRegion::flat(
        "BL31_TOTAL",
        layout.bl31_start,
        layout.bl31_end - layout.bl31_start,
        AttributeFields::rw_memory(),
    ))?;
    list.add(MmapRegion::flat(
        "BL_CODE",
        layout.code_start,
        layout.code_end - layout.code_start,
        AttributeFields::code(),
    ))?;
    list.add(MmapRegion::flat(
        "BL_RO_DATA",
        layout.rodata_start,
        layout.rodata_end - layout.rodata_start,
        AttributeFields::ro_data(),
    ))?;
    if cfg!(feature = "coherent_mem") && layout.coherent_ram_end > layout.coherent_ram_start {
        list.add(MmapRegion::flat(
            "BL_COHERENT_RAM",
            layout.coherent_ram_start,
            layout.coherent_ram_end - layout.coherent_ram_start,
            AttributeFields::device(),
        ))?;
    }
    list.add(MmapRegion::flat(
        "SHARED_RAM",
        map::SHARED_RAM_BASE,
        map::SHARED_RAM_SIZE,
        AttributeFields::device(),
    ))?;
    if cfg!(feature = "secondary_bringup") {
        list.add(MmapRegion::flat(
            "NS_DRAM1",
            map::NS_DRAM1_BASE,
            map::NS_DRAM1_SIZE,
            AttributeFields::rw_memory().non_secure(),
        ))?;
        if cfg!(feature = "bl32") {
            list.add(MmapRegion::flat(
                "BL32_CORE_MEM",
                map::BL32_BASE,
                map::BL32_SIZE,
                AttributeFields::rw_memory(),
            ))?;
        }
    }

    Ok(list)
}

/// Device and DRAM mappings of the board.
pub fn plat_regions() -> [MmapRegion; PLAT_REGIONS] {
    [
        MmapRegion::flat(
            "DEVICE0",
            map::mmio::DEVICE0_BASE,
            map::mmio::DEVICE0_SIZE,
            AttributeFields::device(),
        ),
        MmapRegion::flat(
            "GIC",
            map::mmio::GIC_BASE,
            map::mmio::GIC_SIZE,
            AttributeFields::device(),
        ),
        MmapRegion::flat(
            "DRAM1",
            map::DRAM1_BASE,
            map::DRAM1_SIZE,
            AttributeFields::rw_memory().non_secure(),
        ),
    ]
}

/// The complete EL3 memory map: BL31's regions followed by the board's.
pub fn el3_mmap(layout: &Bl31Layout) -> Result<MmapList, XlatError> {
    let mut list = bl_regions(layout)?;
    for region in plat_regions() {
        list.add(region)?;
    }
    Ok(list)
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

/// Most regions `bl_regions` adds, with every feature on.
const MAX_BL_REGIONS: usize = 7;
const PLAT_REGIONS: usize = 3;

const_assert!(MAX_BL_REGIONS + PLAT_REGIONS <= MAX_MMAP_REGIONS);

impl MmapList {
    fn add(&mut self, region: MmapRegion) -> Result<(), XlatError> {
        self.push(region).map_err(|_| XlatError::TooManyRegions {
            count: MAX_MMAP_REGIONS + 1,
            max: MAX_MMAP_REGIONS,
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
