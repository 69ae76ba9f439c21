/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

use crate::{console::interface, devices::serial::SerialOps};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A dummy console that just ignores all I/O.
///
/// Output printed before the board UART is registered is dropped.
pub struct NullConsole;

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

pub static NULL_CONSOLE: NullConsole = NullConsole {};

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl interface::Write for NullConsole {
    fn write_fmt(&self, _args: core::fmt::Arguments) -> core::fmt::Result {
        Ok(())
    }
}

impl interface::ConsoleOps for NullConsole {
    fn write_char(&self, _c: char) {}

    fn write_string(&self, _string: &str) {}

    fn read_char(&self) -> char {
        ' '
    }
}

impl SerialOps for NullConsole {}

impl interface::All for NullConsole {}
