/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

pub mod npcm845x;

pub use npcm845x::*;
