/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

/// Raw byte access to a serial port.
///
/// The defaults describe a port that is not wired up: reads return 0, writes vanish.
pub trait SerialOps {
    /// Read one byte from serial without translation.
    fn read_byte(&self) -> u8 {
        0
    }
    /// Write one byte to serial without translation.
    fn write_byte(&self, _byte: u8) {}
    /// Wait until the transmitter is idle, aka all characters have been put on the
    /// line.
    fn flush(&self) {}
    /// Consume input until nothing is pending.
    fn clear_rx(&self) {}
}
