/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 * Copyright (c) Berkus Decker <berkus+vesper@metta.systems>
 */

/// Macro similar to [std](https://doc.rust-lang.org/src/std/macros.rs.html)
/// but for writing into firmware-specific output (the registered console).
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::macros::_print(format_args!($($arg)*)));
}

/// Macro similar to [std](https://doc.rust-lang.org/src/std/macros.rs.html)
/// but for writing into firmware-specific output (the registered console).
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ({
        $crate::macros::_print(format_args!("{}\n", format_args!($($arg)*)));
    })
}

#[doc(hidden)]
#[cfg(not(test))]
pub fn _print(args: core::fmt::Arguments) {
    use crate::console::console;
    // Nowhere to report a failed console write to.
    let _ = console().write_fmt(args);
}

/// Host tests print to the test harness' captured stdout.
#[doc(hidden)]
#[cfg(test)]
pub fn _print(args: core::fmt::Arguments) {
    std::print!("{}", args);
}

//--------------------------------------------------------------------------------------------------
//--------------------------------------------------------------------------------------------------

/// Prints info text, with a newline.
#[macro_export]
macro_rules! info {
    ($string:expr) => ({
        let timestamp = $crate::time::uptime();

        $crate::macros::_print(format_args!(
            concat!("[  {:>3}.{:06}] ", $string, "\n"),
            timestamp.as_secs(),
            timestamp.subsec_micros(),
        ));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        let timestamp = $crate::time::uptime();

        $crate::macros::_print(format_args!(
            concat!("[  {:>3}.{:06}] ", $format_string, "\n"),
            timestamp.as_secs(),
            timestamp.subsec_micros(),
            $($arg)*
        ));
    })
}

/// Prints warning text, with a newline.
#[macro_export]
macro_rules! warn {
    ($string:expr) => ({
        let timestamp = $crate::time::uptime();

        $crate::macros::_print(format_args!(
            concat!("[W {:>3}.{:06}] ", $string, "\n"),
            timestamp.as_secs(),
            timestamp.subsec_micros(),
        ));
    });
    ($format_string:expr, $($arg:tt)*) => ({
        let timestamp = $crate::time::uptime();

        $crate::macros::_print(format_args!(
            concat!("[W {:>3}.{:06}] ", $format_string, "\n"),
            timestamp.as_secs(),
            timestamp.subsec_micros(),
            $($arg)*
        ));
    })
}
