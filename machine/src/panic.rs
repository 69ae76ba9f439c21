/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Fatal error reporting for the firmware images.

/// Print the panic and park the core. Nothing on this boot path can recover.
pub fn handler(info: &core::panic::PanicInfo) -> ! {
    crate::println!("\nBL31 PANIC: {}", info);
    crate::endless_sleep()
}
