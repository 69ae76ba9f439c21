/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Device driver interface.
//!
//! Bring-up calls each driver's `init` at a fixed point of the boot sequence, so there is no
//! registry to walk.

pub mod interface {
    pub trait DeviceDriver {
        /// Return a compatibility string for identifying the driver.
        fn compatible(&self) -> &'static str;

        /// Called by the platform setup code to bring up the device.
        /// The default implementation does nothing.
        ///
        /// # Safety
        ///
        /// - During init, drivers might do things with system-wide impact.
        unsafe fn init(&self) -> Result<(), &'static str> {
            Ok(())
        }
    }
}
