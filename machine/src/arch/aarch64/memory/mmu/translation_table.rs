/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! EL3 stage 1 translation tables.
//!
//! With the 4 KiB granule a 32-bit virtual address is split into three lookup parts:
//!
//! ```text
//!    _______________________________
//!   |       |       |       |       |
//!   |  Lv1  |  Lv2  |  Lv3  |  off  |
//!   |_______|_______|_______|_______|
//!     31-30   29-21   20-12   11-00
//!
//!    Lv1: 4 entries, 1 GiB each
//!    Lv2: 512 entries, 2 MiB each
//!    Lv3: 512 entries, 4 KiB each
//! ```
//!
//! The level 1 table is embedded, level 2 and 3 tables come from a fixed pool.

use {
    super::mair,
    crate::{
        memory::mmu::{
            AccessPermissions, AttributeFields, MemAttributes, MmapRegion, OutOfAddressSpaceSnafu,
            OutOfTablesSnafu, OverlapSnafu, TooManyRegionsSnafu, UnalignedSnafu, XlatError,
            ZeroSizeSnafu,
        },
        mm::is_aligned,
    },
    core::cmp,
    snafu::ensure,
    tock_registers::{
        fields::FieldValue,
        interfaces::{Readable, Writeable},
        register_bitfields,
        registers::InMemoryRegister,
        LocalRegisterCopy,
    },
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u64,
    // AArch64 Reference Manual D8.3, table descriptor format
    STAGE1_TABLE_DESCRIPTOR [
        /// Physical address of the next table.
        NEXT_LEVEL_TABLE_ADDR_4KiB OFFSET(12) NUMBITS(36) [], // [47:12]

        TYPE  OFFSET(1) NUMBITS(1) [
            Block = 0,
            Table = 1
        ],

        VALID OFFSET(0) NUMBITS(1) [
            False = 0,
            True = 1
        ]
    ]
}

register_bitfields! {
    u64,
    // AArch64 Reference Manual D8.3, block and page descriptor formats in the EL3 regime
    STAGE1_DESCRIPTOR [
        /// Execute-never
        XN       OFFSET(54) NUMBITS(1) [
            Execute = 0,
            NeverExecute = 1
        ],

        /// Output address. Block descriptors keep the low bits zero.
        OUTPUT_ADDR_4KiB OFFSET(12) NUMBITS(36) [], // [47:12]

        /// Access flag
        AF       OFFSET(10) NUMBITS(1) [
            NotAccessed = 0,
            Accessed = 1
        ],

        /// Shareability field
        SH       OFFSET(8) NUMBITS(2) [
            OuterShareable = 0b10,
            InnerShareable = 0b11
        ],

        /// Access Permissions, AP[1] is RES1 at EL3
        AP       OFFSET(6) NUMBITS(2) [
            RW_EL3 = 0b01,
            RO_EL3 = 0b11
        ],

        /// Output address space
        NS       OFFSET(5) NUMBITS(1) [
            Secure = 0,
            NonSecure = 1
        ],

        /// Memory attributes index into the MAIR_EL3 register
        AttrIndx OFFSET(2) NUMBITS(3) [],

        TYPE     OFFSET(1) NUMBITS(1) [
            Block = 0,
            Page = 1
        ],

        VALID    OFFSET(0) NUMBITS(1) [
            False = 0,
            True = 1
        ]
    ]
}

const GRANULE_SHIFT: usize = 12;
const GRANULE_SIZE: usize = 1 << GRANULE_SHIFT;
const ENTRIES_PER_TABLE: usize = 512;
const BITS_PER_LEVEL: usize = 9;

const BASE_LEVEL: usize = 1;
const LAST_LEVEL: usize = 3;

/// log2 of the span of one entry at `level`.
const fn level_shift(level: usize) -> usize {
    GRANULE_SHIFT + (LAST_LEVEL - level) * BITS_PER_LEVEL
}

#[derive(Copy, Clone)]
#[repr(C, align(4096))]
struct Table {
    entries: [u64; ENTRIES_PER_TABLE],
}

#[derive(Copy, Clone)]
enum TableRef {
    Base,
    Pool(usize),
}

enum Entry {
    Invalid,
    /// A block or, at the last level, a page.
    Leaf,
    Table(usize),
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

pub const ADDR_SPACE_SHIFT: usize = 32;
/// Both the virtual and the physical address space are 4 GiB.
pub const ADDR_SPACE_SIZE: usize = 1 << ADDR_SPACE_SHIFT;
pub const BASE_TABLE_ENTRIES: usize = ADDR_SPACE_SIZE >> level_shift(BASE_LEVEL);
pub const MAX_MMAP_REGIONS: usize = 16;

/// Translation tables with `NUM_TABLES` level 2/3 tables to split blocks into.
///
/// Descriptors refer to the tables by address, so an instance must not move once regions are
/// mapped. Keep it in a `static`.
#[repr(C, align(4096))]
pub struct TranslationTables<const NUM_TABLES: usize> {
    pool: [Table; NUM_TABLES],
    /// Level 1, 1 GiB per entry. Page aligned because the pool is.
    base: [u64; BASE_TABLE_ENTRIES],
    used: usize,
}

/// Result of a table walk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub output_addr: usize,
    pub attributes: AttributeFields,
    /// Level of the descriptor that mapped the address.
    pub level: usize,
}

//--------------------------------------------------------------------------------------------------
// Private Implementations
//--------------------------------------------------------------------------------------------------

/// Convert the generic memory attributes to HW-specific attributes of the MMU.
impl From<AttributeFields> for FieldValue<u64, STAGE1_DESCRIPTOR::Register> {
    fn from(attribute_fields: AttributeFields) -> Self {
        // Memory attributes
        let mut desc = match attribute_fields.mem_attributes {
            MemAttributes::CacheableDRAM => {
                STAGE1_DESCRIPTOR::SH::InnerShareable
                    + STAGE1_DESCRIPTOR::AttrIndx.val(mair::attr::NORMAL)
            }
            MemAttributes::NonCacheableDRAM => {
                STAGE1_DESCRIPTOR::SH::OuterShareable
                    + STAGE1_DESCRIPTOR::AttrIndx.val(mair::attr::NORMAL_NON_CACHEABLE)
            }
            MemAttributes::Device => {
                STAGE1_DESCRIPTOR::SH::OuterShareable
                    + STAGE1_DESCRIPTOR::AttrIndx.val(mair::attr::DEVICE_NGNRE)
            }
        };

        // Access Permissions
        desc += match attribute_fields.acc_perms {
            AccessPermissions::ReadOnly => STAGE1_DESCRIPTOR::AP::RO_EL3,
            AccessPermissions::ReadWrite => STAGE1_DESCRIPTOR::AP::RW_EL3,
        };

        desc += if attribute_fields.non_secure {
            STAGE1_DESCRIPTOR::NS::NonSecure
        } else {
            STAGE1_DESCRIPTOR::NS::Secure
        };

        desc += if attribute_fields.effective_execute_never() {
            STAGE1_DESCRIPTOR::XN::NeverExecute
        } else {
            STAGE1_DESCRIPTOR::XN::Execute
        };

        desc
    }
}

fn attributes_of(desc: LocalRegisterCopy<u64, STAGE1_DESCRIPTOR::Register>) -> AttributeFields {
    let mem_attributes = match desc.read(STAGE1_DESCRIPTOR::AttrIndx) {
        mair::attr::NORMAL => MemAttributes::CacheableDRAM,
        mair::attr::NORMAL_NON_CACHEABLE => MemAttributes::NonCacheableDRAM,
        _ => MemAttributes::Device,
    };
    let acc_perms = if desc.matches_all(STAGE1_DESCRIPTOR::AP::RO_EL3) {
        AccessPermissions::ReadOnly
    } else {
        AccessPermissions::ReadWrite
    };

    AttributeFields {
        mem_attributes,
        acc_perms,
        execute_never: desc.is_set(STAGE1_DESCRIPTOR::XN),
        non_secure: desc.is_set(STAGE1_DESCRIPTOR::NS),
    }
}

fn leaf_descriptor(output_addr: usize, attributes: AttributeFields, level: usize) -> u64 {
    let val = InMemoryRegister::<u64, STAGE1_DESCRIPTOR::Register>::new(0);
    let kind = if level == LAST_LEVEL {
        STAGE1_DESCRIPTOR::TYPE::Page
    } else {
        STAGE1_DESCRIPTOR::TYPE::Block
    };

    val.write(
        STAGE1_DESCRIPTOR::OUTPUT_ADDR_4KiB.val((output_addr >> GRANULE_SHIFT) as u64)
            + STAGE1_DESCRIPTOR::AF::Accessed
            + kind
            + STAGE1_DESCRIPTOR::VALID::True
            + attributes.into(),
    );
    val.get()
}

fn table_descriptor(next_level_table_addr: usize) -> u64 {
    let val = InMemoryRegister::<u64, STAGE1_TABLE_DESCRIPTOR::Register>::new(0);

    val.write(
        STAGE1_TABLE_DESCRIPTOR::NEXT_LEVEL_TABLE_ADDR_4KiB
            .val((next_level_table_addr >> GRANULE_SHIFT) as u64)
            + STAGE1_TABLE_DESCRIPTOR::TYPE::Table
            + STAGE1_TABLE_DESCRIPTOR::VALID::True,
    );
    val.get()
}

fn check_region(region: &MmapRegion) -> Result<(), XlatError> {
    let name = region.name;

    ensure!(region.size != 0, ZeroSizeSnafu { name });
    ensure!(
        is_aligned(region.base_va, GRANULE_SIZE)
            && is_aligned(region.base_pa, GRANULE_SIZE)
            && is_aligned(region.size, GRANULE_SIZE),
        UnalignedSnafu { name }
    );

    let fits = |base: usize| {
        base.checked_add(region.size)
            .map_or(false, |end| end <= ADDR_SPACE_SIZE)
    };
    ensure!(
        fits(region.base_va) && fits(region.base_pa),
        OutOfAddressSpaceSnafu { name }
    );

    Ok(())
}

/// Overlapping regions must nest strictly and translate by the same offset.
fn check_overlap(region: &MmapRegion, other: &MmapRegion) -> Result<(), XlatError> {
    if !region.overlaps(other) {
        return Ok(());
    }

    let nested = region.contains(other) || other.contains(region);
    let identical = region.base_va == other.base_va && region.size == other.size;
    let same_offset = region.base_pa.wrapping_sub(region.base_va)
        == other.base_pa.wrapping_sub(other.base_va);

    ensure!(
        nested && same_offset && !identical,
        OverlapSnafu {
            name: region.name,
            other: other.name
        }
    );
    Ok(())
}

impl<const NUM_TABLES: usize> TranslationTables<NUM_TABLES> {
    fn entries(&self, table: TableRef) -> &[u64] {
        match table {
            TableRef::Base => &self.base,
            TableRef::Pool(i) => &self.pool[i].entries,
        }
    }

    fn entries_mut(&mut self, table: TableRef) -> &mut [u64] {
        match table {
            TableRef::Base => &mut self.base,
            TableRef::Pool(i) => &mut self.pool[i].entries,
        }
    }

    fn classify(&self, desc: u64, level: usize) -> Entry {
        let desc = LocalRegisterCopy::<u64, STAGE1_TABLE_DESCRIPTOR::Register>::new(desc);

        if !desc.is_set(STAGE1_TABLE_DESCRIPTOR::VALID) {
            return Entry::Invalid;
        }
        if level == LAST_LEVEL || !desc.matches_all(STAGE1_TABLE_DESCRIPTOR::TYPE::Table) {
            return Entry::Leaf;
        }

        let addr =
            (desc.read(STAGE1_TABLE_DESCRIPTOR::NEXT_LEVEL_TABLE_ADDR_4KiB) as usize) << GRANULE_SHIFT;
        let pool_base = self.pool.as_ptr() as usize;
        debug_assert!(addr >= pool_base && addr < pool_base + NUM_TABLES * GRANULE_SIZE);
        Entry::Table((addr - pool_base) >> GRANULE_SHIFT)
    }

    fn allocate_table(&mut self, name: &'static str) -> Result<usize, XlatError> {
        ensure!(self.used < NUM_TABLES, OutOfTablesSnafu { name });

        let index = self.used;
        self.used += 1;
        self.pool[index].entries = [0; ENTRIES_PER_TABLE];
        Ok(index)
    }

    /// The table below entry `index` of `table`, creating it if needed.
    ///
    /// An existing block is split into a table of smaller blocks (or pages) with the same
    /// attributes, so the parts of it not being remapped keep translating as before.
    fn next_level_table(
        &mut self,
        table: TableRef,
        index: usize,
        level: usize,
        name: &'static str,
    ) -> Result<usize, XlatError> {
        let desc = self.entries(table)[index];

        let next = match self.classify(desc, level) {
            Entry::Table(next) => return Ok(next),
            Entry::Invalid => self.allocate_table(name)?,
            Entry::Leaf => {
                let next = self.allocate_table(name)?;
                let block = LocalRegisterCopy::<u64, STAGE1_DESCRIPTOR::Register>::new(desc);
                let block_base = (block.read(STAGE1_DESCRIPTOR::OUTPUT_ADDR_4KiB) as usize)
                    << GRANULE_SHIFT;
                let sub_shift = level_shift(level + 1);
                let kind = if level + 1 == LAST_LEVEL {
                    STAGE1_DESCRIPTOR::TYPE::Page
                } else {
                    STAGE1_DESCRIPTOR::TYPE::Block
                };

                for (i, entry) in self.pool[next].entries.iter_mut().enumerate() {
                    let mut sub = block;
                    sub.modify(
                        STAGE1_DESCRIPTOR::OUTPUT_ADDR_4KiB
                            .val(((block_base + (i << sub_shift)) >> GRANULE_SHIFT) as u64)
                            + kind,
                    );
                    *entry = sub.get();
                }
                next
            }
        };

        let next_addr = self.pool[next].entries.as_ptr() as usize;
        self.entries_mut(table)[index] = table_descriptor(next_addr);
        Ok(next)
    }

    /// Map `[start, end)` of `region` through `table`, which sits at `level`.
    fn map_range(
        &mut self,
        table: TableRef,
        level: usize,
        start: usize,
        end: usize,
        region: &MmapRegion,
    ) -> Result<(), XlatError> {
        let shift = level_shift(level);
        let entry_size = 1usize << shift;
        let mut va = start;

        while va < end {
            let index = (va >> shift) & (ENTRIES_PER_TABLE - 1);
            let entry_base = va & !(entry_size - 1);
            let chunk_end = cmp::min(entry_base + entry_size, end);
            let output_addr = region.output_address(va);

            let whole_entry = va == entry_base && chunk_end == entry_base + entry_size;
            let is_table = matches!(
                self.classify(self.entries(table)[index], level),
                Entry::Table(_)
            );

            if level == LAST_LEVEL
                || (whole_entry && is_aligned(output_addr, entry_size) && !is_table)
            {
                self.entries_mut(table)[index] =
                    leaf_descriptor(output_addr, region.attributes, level);
            } else {
                let next = self.next_level_table(table, index, level, region.name)?;
                self.map_range(TableRef::Pool(next), level + 1, va, chunk_end, region)?;
            }

            va = chunk_end;
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl<const NUM_TABLES: usize> TranslationTables<NUM_TABLES> {
    /// Create an instance with nothing mapped.
    pub const fn new() -> Self {
        Self {
            pool: [Table {
                entries: [0; ENTRIES_PER_TABLE],
            }; NUM_TABLES],
            base: [0; BASE_TABLE_ENTRIES],
            used: 0,
        }
    }

    /// Validate `regions` and map them, largest first.
    ///
    /// Mapping in decreasing size lets a smaller region nested inside a bigger one override the
    /// bigger one's attributes for its own range.
    pub fn map_regions(&mut self, regions: &[MmapRegion]) -> Result<(), XlatError> {
        ensure!(
            regions.len() <= MAX_MMAP_REGIONS,
            TooManyRegionsSnafu {
                count: regions.len(),
                max: MAX_MMAP_REGIONS
            }
        );

        for (i, region) in regions.iter().enumerate() {
            check_region(region)?;
            for other in &regions[..i] {
                check_overlap(region, other)?;
            }
        }

        let mut order = [0usize; MAX_MMAP_REGIONS];
        let order = &mut order[..regions.len()];
        for (i, slot) in order.iter_mut().enumerate() {
            *slot = i;
        }
        order.sort_unstable_by(|&a, &b| regions[b].size.cmp(&regions[a].size).then(a.cmp(&b)));

        for &i in order.iter() {
            let region = &regions[i];
            self.map_range(
                TableRef::Base,
                BASE_LEVEL,
                region.base_va,
                region.base_va + region.size,
                region,
            )?;
        }

        Ok(())
    }

    /// Walk the tables for `va`.
    pub fn lookup(&self, va: usize) -> Option<Translation> {
        if va >= ADDR_SPACE_SIZE {
            return None;
        }

        let mut table = TableRef::Base;
        let mut level = BASE_LEVEL;
        loop {
            let shift = level_shift(level);
            let desc = self.entries(table)[(va >> shift) & (ENTRIES_PER_TABLE - 1)];

            match self.classify(desc, level) {
                Entry::Invalid => return None,
                Entry::Table(next) => {
                    table = TableRef::Pool(next);
                    level += 1;
                }
                Entry::Leaf => {
                    let leaf = LocalRegisterCopy::<u64, STAGE1_DESCRIPTOR::Register>::new(desc);
                    let base =
                        (leaf.read(STAGE1_DESCRIPTOR::OUTPUT_ADDR_4KiB) as usize) << GRANULE_SHIFT;
                    return Some(Translation {
                        output_addr: base + (va & ((1 << shift) - 1)),
                        attributes: attributes_of(leaf),
                        level,
                    });
                }
            }
        }
    }

    /// Address to program into TTBR0_EL3.
    pub fn base_address(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Number of pool tables handed out so far.
    pub fn tables_used(&self) -> usize {
        self.used
    }
}

impl<const NUM_TABLES: usize> Default for TranslationTables<NUM_TABLES> {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;
    const GIB: usize = 1024 * MIB;

    fn tables<const N: usize>() -> Box<TranslationTables<N>> {
        Box::new(TranslationTables::new())
    }

    #[test]
    fn base_table_is_page_aligned() {
        let t = tables::<2>();
        assert_eq!(BASE_TABLE_ENTRIES, 4);
        assert!(is_aligned(t.base_address(), GRANULE_SIZE));
    }

    #[test]
    fn gigabyte_region_uses_a_level_1_block() {
        let mut t = tables::<1>();
        t.map_regions(&[MmapRegion::flat("DEVICE", GIB, GIB, AttributeFields::device())])
            .unwrap();

        let tr = t.lookup(GIB + 0x1234).unwrap();
        assert_eq!(tr.level, 1);
        assert_eq!(tr.output_addr, GIB + 0x1234);
        assert_eq!(tr.attributes, AttributeFields::device());
        assert_eq!(t.tables_used(), 0);
        assert!(t.lookup(0).is_none());
    }

    #[test]
    fn two_megabyte_aligned_region_uses_level_2_blocks() {
        let mut t = tables::<2>();
        t.map_regions(&[MmapRegion::flat(
            "DRAM",
            0,
            6 * MIB,
            AttributeFields::rw_memory(),
        )])
        .unwrap();

        let tr = t.lookup(4 * MIB + 0x10).unwrap();
        assert_eq!(tr.level, 2);
        assert_eq!(tr.output_addr, 4 * MIB + 0x10);
        assert!(t.lookup(6 * MIB).is_none());
    }

    #[test]
    fn nested_region_overrides_enclosing_attributes() {
        let mut t = tables::<4>();
        let total = MmapRegion::flat("BL31_TOTAL", 0xfffb_1000, 0x4_f000, AttributeFields::rw_memory());
        let code = MmapRegion::flat("BL_CODE", 0xfffb_1000, 0x8000, AttributeFields::code());
        // Smaller region listed last on purpose: order of the slice does not matter.
        t.map_regions(&[code, total]).unwrap();

        let c = t.lookup(0xfffb_2000).unwrap();
        assert_eq!(c.level, 3);
        assert_eq!(c.attributes, AttributeFields::code());

        let d = t.lookup(0xfffb_9000).unwrap();
        assert_eq!(d.attributes, AttributeFields::rw_memory());
        assert!(t.lookup(0xfffb_0000).is_none());
    }

    #[test]
    fn blocks_are_split_when_a_smaller_region_lands_inside() {
        let mut t = tables::<2>();
        let dev = MmapRegion::flat("DEVICE", 2 * GIB, GIB, AttributeFields::device());
        let ram = MmapRegion::flat(
            "RAM",
            2 * GIB + 0x1000,
            0x1000,
            AttributeFields::rw_memory().non_secure(),
        );
        t.map_regions(&[dev, ram]).unwrap();
        assert_eq!(t.tables_used(), 2);

        let r = t.lookup(2 * GIB + 0x1008).unwrap();
        assert_eq!(r.level, 3);
        assert_eq!(r.output_addr, 2 * GIB + 0x1008);
        assert_eq!(r.attributes, AttributeFields::rw_memory().non_secure());

        // Neighbouring page and the rest of the old block keep translating as device memory.
        let page = t.lookup(2 * GIB + 0x2000).unwrap();
        assert_eq!((page.level, page.output_addr), (3, 2 * GIB + 0x2000));
        assert_eq!(page.attributes, AttributeFields::device());

        let block = t.lookup(2 * GIB + 5 * MIB).unwrap();
        assert_eq!((block.level, block.output_addr), (2, 2 * GIB + 5 * MIB));
        assert_eq!(block.attributes, AttributeFields::device());
    }

    #[test]
    fn offset_region_translates_to_its_physical_base() {
        let mut t = tables::<2>();
        let region = MmapRegion {
            name: "ALIAS",
            base_pa: 0x0600_0000,
            base_va: 0x4000_0000,
            size: 0x2000,
            attributes: AttributeFields::rw_memory(),
        };
        t.map_regions(&[region]).unwrap();
        assert_eq!(t.lookup(0x4000_1004).unwrap().output_addr, 0x0600_1004);
    }

    #[test]
    fn rejects_bad_regions() {
        let mut t = tables::<2>();
        let rw = AttributeFields::rw_memory();

        assert_eq!(
            t.map_regions(&[MmapRegion::flat("A", 0x1000, 0, rw)]),
            Err(XlatError::ZeroSize { name: "A" })
        );
        assert_eq!(
            t.map_regions(&[MmapRegion::flat("B", 0x1800, 0x1000, rw)]),
            Err(XlatError::Unaligned { name: "B" })
        );
        assert_eq!(
            t.map_regions(&[MmapRegion::flat("C", 0xffff_f000, 0x2000, rw)]),
            Err(XlatError::OutOfAddressSpace { name: "C" })
        );
    }

    #[test]
    fn rejects_partial_and_identical_overlaps() {
        let mut t = tables::<2>();
        let rw = AttributeFields::rw_memory();
        let a = MmapRegion::flat("A", 0x1_0000, 0x4000, rw);

        assert_eq!(
            t.map_regions(&[a, MmapRegion::flat("B", 0x1_2000, 0x4000, rw)]),
            Err(XlatError::Overlap {
                name: "B",
                other: "A"
            })
        );
        assert_eq!(
            t.map_regions(&[a, MmapRegion::flat("C", 0x1_0000, 0x4000, AttributeFields::code())]),
            Err(XlatError::Overlap {
                name: "C",
                other: "A"
            })
        );
    }

    #[test]
    fn too_many_regions() {
        let mut t = tables::<1>();
        let regions = [MmapRegion::flat("R", 0, 0x1000, AttributeFields::rw_memory());
            MAX_MMAP_REGIONS + 1];
        assert_eq!(
            t.map_regions(&regions),
            Err(XlatError::TooManyRegions {
                count: MAX_MMAP_REGIONS + 1,
                max: MAX_MMAP_REGIONS
            })
        );
    }

    #[test]
    fn running_out_of_tables_names_the_region() {
        let mut t = tables::<1>();
        assert_eq!(
            t.map_regions(&[MmapRegion::flat(
                "SHARED_RAM",
                0xfffb_0000,
                0x1000,
                AttributeFields::device()
            )]),
            Err(XlatError::OutOfTables { name: "SHARED_RAM" })
        );
    }
}
