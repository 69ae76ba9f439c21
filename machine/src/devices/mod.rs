/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */
pub mod serial;

pub use serial::SerialOps;
