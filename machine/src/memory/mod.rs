/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Memory management.

pub mod mmu;

pub use crate::arch::memory::PAGE_SIZE;
