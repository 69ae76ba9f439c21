/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! EL3 runtime firmware (BL31) for the Nuvoton NPCM845x.
//!
//! Brings up the console, clocks, EL3 MMU, GIC and TrustZone windows on the primary core,
//! then leaves for the non-secure image the previous stage described.

#![no_main]
#![no_std]

use machine::{
    arch::el3, console::console, devices::serial::SerialOps, handoff::SecurityState, info,
    platform::platform,
};

mod boot;

/// Early init code.
///
/// # Safety
///
/// - Only a single core must be active and running this function.
/// - The init calls in this function must appear in the correct order.
/// - `arg0`..`arg3` must be the registers the previous stage entered BL31 with.
unsafe fn bl31_main(arg0: usize, arg1: usize, arg2: usize, arg3: usize) -> ! {
    let soc = platform();

    if let Err(e) = soc.early_platform_setup(arg0, arg1, arg2, arg3) {
        panic!("Early platform setup failed: {}", e);
    }

    // println! is usable from here on.

    if let Err(e) = soc.plat_arch_setup() {
        panic!("EL3 MMU setup failed: {}", e);
    }
    if let Err(e) = soc.platform_setup() {
        panic!("Platform setup failed: {}", e);
    }
    soc.console_runtime_init();

    // Transition from unsafe to safe.
    bl31_exit()
}

/// Leave for the non-secure image.
fn bl31_exit() -> ! {
    let Some(bl33) = platform().next_image_ep_info(SecurityState::NonSecure) else {
        panic!("No non-secure image to run")
    };

    info!(
        "Entering BL33 at {:#x}, SPSR {:#x}, x0 {:#x}",
        bl33.pc, bl33.spsr, bl33.args[0]
    );
    console().flush();

    unsafe { el3::enter_next_image(&bl33) }
}

#[panic_handler]
fn panicked(info: &core::panic::PanicInfo) -> ! {
    machine::panic::handler(info)
}
