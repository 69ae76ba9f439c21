/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Architecture-specific code.
//!
//! Only AArch64 is supported. Instructions and system registers that do not exist on the host
//! fall back to inert stand-ins, so the rest of the crate can be unit tested there.

pub mod aarch64;

pub use self::aarch64::*;
