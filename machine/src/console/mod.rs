/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! Boot console.
//!
//! Until the board UART is registered, output goes to the [null console](null_console).

use crate::sync::NullLock;

pub mod null_console;

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Console interfaces.
pub mod interface {
    use {crate::devices::serial::SerialOps, core::fmt};

    /// Console write functions.
    pub trait Write {
        /// Write a Rust format string.
        fn write_fmt(&self, args: fmt::Arguments) -> fmt::Result;
    }

    /// A trait that must be implemented by devices that are candidates for the
    /// global console.
    pub trait ConsoleOps: SerialOps {
        /// Send a character
        fn write_char(&self, c: char) {
            let mut bytes = [0u8; 4];
            for &b in c.encode_utf8(&mut bytes).as_bytes() {
                self.write_byte(b);
            }
        }
        /// Display a string
        fn write_string(&self, string: &str) {
            for c in string.chars() {
                // convert newline to carriage return + newline
                if c == '\n' {
                    self.write_char('\r')
                }

                self.write_char(c);
            }
        }
        /// Receive a character
        fn read_char(&self) -> char {
            let mut ret = self.read_byte() as char;

            // convert carriage return to newline
            if ret == '\r' {
                ret = '\n'
            }

            ret
        }
    }

    /// Trait alias for a full-fledged console.
    pub trait All: Write + ConsoleOps {}
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

static CONSOLE: NullLock<&'static (dyn interface::All + Sync)> =
    NullLock::new(&null_console::NULL_CONSOLE);

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

use crate::sync::interface::Mutex;

/// Register a new console.
pub fn register_console(new_console: &'static (dyn interface::All + Sync)) {
    CONSOLE.lock(|con| *con = new_console);
}

/// Return a reference to the currently registered console.
///
/// This is the global console used by all printing macros.
pub fn console() -> &'static dyn interface::All {
    CONSOLE.lock(|con| *con)
}
