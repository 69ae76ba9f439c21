/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

//! Memory management functions for aarch64.

pub mod mmu;

/// Translation granule and smallest mappable unit.
pub const PAGE_SIZE: usize = 4096;
