/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Raw access to system registers `aarch64-cpu` does not model, the EL3 ones mostly.
//!
//! Reads have no side effects. Writes must be expanded in an `unsafe` context. On the host,
//! reads return 0 and writes are dropped.

/// Read a 64-bit system register by name.
macro_rules! read_sysreg {
    ($name:literal) => {{
        #[cfg(target_arch = "aarch64")]
        let value: u64 = {
            let v: u64;
            unsafe {
                core::arch::asm!(concat!("mrs {}, ", $name), out(reg) v, options(nomem, nostack));
            }
            v
        };
        #[cfg(not(target_arch = "aarch64"))]
        let value: u64 = 0;
        value
    }};
}

/// Write a 64-bit system register by name.
macro_rules! write_sysreg {
    ($name:literal, $value:expr) => {{
        let value: u64 = $value;
        #[cfg(target_arch = "aarch64")]
        core::arch::asm!(concat!("msr ", $name, ", {}"), in(reg) value, options(nostack));
        #[cfg(not(target_arch = "aarch64"))]
        let _ = value;
    }};
}
