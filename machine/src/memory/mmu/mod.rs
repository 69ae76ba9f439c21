/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Architecture agnostic parts of the EL3 address translation setup.

use {
    core::fmt::{self, Formatter},
    snafu::Snafu,
};

use crate::arch::aarch64::memory::mmu as arch_mmu;

//--------------------------------------------------------------------------------------------------
// Architectural Public Reexports
//--------------------------------------------------------------------------------------------------
pub use arch_mmu::{
    mmu,
    translation_table::{Translation, TranslationTables, ADDR_SPACE_SIZE, MAX_MMAP_REGIONS},
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// MMU enable errors variants.
#[allow(missing_docs)]
#[derive(Debug, Snafu)]
pub enum MMUEnableError {
    #[snafu(display("MMU is already enabled"))]
    AlreadyEnabled,
    #[snafu(display("{}", err))]
    Other { err: &'static str },
}

/// Errors building the translation tables from a memory map.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum XlatError {
    #[snafu(display("Region {name} is not page aligned"))]
    Unaligned { name: &'static str },
    #[snafu(display("Region {name} is empty"))]
    ZeroSize { name: &'static str },
    #[snafu(display("Region {name} does not fit in the address space"))]
    OutOfAddressSpace { name: &'static str },
    #[snafu(display("Region {name} overlaps {other} other than by plain containment"))]
    Overlap {
        name: &'static str,
        other: &'static str,
    },
    #[snafu(display("Too many regions: {count}, at most {max}"))]
    TooManyRegions { count: usize, max: usize },
    #[snafu(display("Ran out of translation tables mapping {name}"))]
    OutOfTables { name: &'static str },
}

/// Memory Management interfaces.
pub mod interface {
    use super::*;

    /// MMU functions.
    pub trait MMU {
        /// Install the translation tables at `table_base` and turn on the MMU and data cache.
        ///
        /// # Safety
        ///
        /// - Changes the HW's global state.
        /// - The tables must identity map the code that is executing and stay in place forever.
        unsafe fn enable_mmu_and_caching(&self, table_base: usize) -> Result<(), MMUEnableError>;

        /// Returns true if the MMU is enabled, false otherwise.
        fn is_enabled(&self) -> bool;
    }
}

/// Architecture agnostic memory attributes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MemAttributes {
    /// Regular memory
    CacheableDRAM,
    /// Memory without caching
    NonCacheableDRAM,
    /// Device memory
    Device,
}

/// Architecture agnostic memory region access permissions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccessPermissions {
    /// Read-only access
    ReadOnly,
    /// Read-write access
    ReadWrite,
}

/// Summary structure of memory region properties.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AttributeFields {
    /// Attributes
    pub mem_attributes: MemAttributes,
    /// Permissions
    pub acc_perms: AccessPermissions,
    /// Disable executable code in this region
    pub execute_never: bool,
    /// Accesses go to the non-secure physical address space
    pub non_secure: bool,
}

/// A region of the EL3 memory map.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MmapRegion {
    /// Name of the region, for diagnostics
    pub name: &'static str,
    pub base_pa: usize,
    pub base_va: usize,
    pub size: usize,
    pub attributes: AttributeFields,
}

//--------------------------------------------------------------------------------------------------
// Public Implementations
//--------------------------------------------------------------------------------------------------

impl AttributeFields {
    /// Secure code: read-only and executable.
    pub const fn code() -> Self {
        Self {
            mem_attributes: MemAttributes::CacheableDRAM,
            acc_perms: AccessPermissions::ReadOnly,
            execute_never: false,
            non_secure: false,
        }
    }

    /// Secure read-only data.
    pub const fn ro_data() -> Self {
        Self {
            mem_attributes: MemAttributes::CacheableDRAM,
            acc_perms: AccessPermissions::ReadOnly,
            execute_never: true,
            non_secure: false,
        }
    }

    /// Secure read-write memory.
    pub const fn rw_memory() -> Self {
        Self {
            mem_attributes: MemAttributes::CacheableDRAM,
            acc_perms: AccessPermissions::ReadWrite,
            execute_never: true,
            non_secure: false,
        }
    }

    /// Secure read-write device memory.
    pub const fn device() -> Self {
        Self {
            mem_attributes: MemAttributes::Device,
            acc_perms: AccessPermissions::ReadWrite,
            execute_never: true,
            non_secure: false,
        }
    }

    /// The same attributes in the non-secure physical address space.
    pub const fn non_secure(self) -> Self {
        Self {
            non_secure: true,
            ..self
        }
    }

    /// Writable regions and device memory never execute, whatever was asked for.
    pub fn effective_execute_never(&self) -> bool {
        self.execute_never
            || self.acc_perms == AccessPermissions::ReadWrite
            || self.mem_attributes == MemAttributes::Device
    }
}

impl Default for AttributeFields {
    fn default() -> AttributeFields {
        Self::rw_memory()
    }
}

impl MmapRegion {
    /// An identity mapped region.
    pub const fn flat(
        name: &'static str,
        base: usize,
        size: usize,
        attributes: AttributeFields,
    ) -> Self {
        Self {
            name,
            base_pa: base,
            base_va: base,
            size,
            attributes,
        }
    }

    /// Whether every byte of `other` lies within this region's virtual range.
    pub fn contains(&self, other: &MmapRegion) -> bool {
        other.base_va >= self.base_va
            && other.base_va + other.size <= self.base_va + self.size
    }

    /// Whether the two virtual ranges share at least one byte.
    pub fn overlaps(&self, other: &MmapRegion) -> bool {
        self.base_va < other.base_va + other.size && other.base_va < self.base_va + self.size
    }

    /// Output address for `va`, which must lie inside the region.
    pub fn output_address(&self, va: usize) -> usize {
        self.base_pa + (va - self.base_va)
    }
}

/// Human-readable output of AttributeFields
impl fmt::Display for AttributeFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let attr = match self.mem_attributes {
            MemAttributes::CacheableDRAM => "C",
            MemAttributes::NonCacheableDRAM => "NC",
            MemAttributes::Device => "Dev",
        };

        let acc_p = match self.acc_perms {
            AccessPermissions::ReadOnly => "RO",
            AccessPermissions::ReadWrite => "RW",
        };

        let xn = if self.effective_execute_never() {
            "XN"
        } else {
            "X"
        };

        let world = if self.non_secure { "NS" } else { "S" };

        write!(f, "{: <3} {} {: <2} {}", attr, acc_p, xn, world)
    }
}

/// Human-readable output of a region.
impl fmt::Display for MmapRegion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // log2(1024)
        const KIB_SHIFT: u32 = 10;

        // log2(1024 * 1024)
        const MIB_SHIFT: u32 = 20;

        let (size, unit) = if (self.size >> MIB_SHIFT) > 0 {
            (self.size >> MIB_SHIFT, "MiB")
        } else if (self.size >> KIB_SHIFT) > 0 {
            (self.size >> KIB_SHIFT, "KiB")
        } else {
            (self.size, "Byte")
        };

        write!(
            f,
            "      {:#010x} - {:#010x} | {: >3} {} | {} | {}",
            self.base_va,
            self.base_va + self.size - 1,
            size,
            unit,
            self.attributes,
            self.name
        )
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
