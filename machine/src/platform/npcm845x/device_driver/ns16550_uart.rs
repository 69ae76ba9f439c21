/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 *
 * 16550-compatible UART with registers on a 4-byte stride, as found on the NPCM845x.
 */

use {
    crate::{
        console::interface,
        devices::serial::SerialOps,
        mmio_deref_wrapper::MMIODerefWrapper,
        sync::{interface::Mutex, NullLock},
    },
    cfg_if::cfg_if,
    core::fmt::{self, Arguments},
    snafu::{ensure, Snafu},
    tock_registers::{
        interfaces::{Readable, Writeable},
        register_bitfields, register_structs,
        registers::{ReadOnly, ReadWrite},
    },
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// FIFO Control Register
    FCR [
        /// Clear the transmit FIFO. Self-clearing.
        TXSR OFFSET(2) NUMBITS(1) [],
        /// Clear the receive FIFO. Self-clearing.
        RXSR OFFSET(1) NUMBITS(1) [],
        FIFOE OFFSET(0) NUMBITS(1) []
    ],

    /// Line Control Register
    LCR [
        /// Divisor latch access. While set, offsets 0x00 and 0x04 address DLL and DLM.
        DLAB OFFSET(7) NUMBITS(1) [],
        Parity OFFSET(3) NUMBITS(1) [
            Disabled = 0,
            Enabled = 1
        ],
        Stop2 OFFSET(2) NUMBITS(1) [
            Disabled = 0,
            Enabled = 1
        ],
        WordLength OFFSET(0) NUMBITS(2) [
            FiveBit = 0b00,
            SixBit = 0b01,
            SevenBit = 0b10,
            EightBit = 0b11
        ]
    ],

    /// Modem Control Register
    MCR [
        RTS OFFSET(1) NUMBITS(1) [],
        DTR OFFSET(0) NUMBITS(1) []
    ],

    /// Line Status Register
    LSR [
        /// Transmitter empty: holding register and shift register both drained.
        TEMT OFFSET(6) NUMBITS(1) [],
        /// Transmit holding register empty.
        THRE OFFSET(5) NUMBITS(1) [],
        /// Receive data ready.
        DR OFFSET(0) NUMBITS(1) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => Data: ReadWrite<u32>), // RBR/THR, DLL with DLAB
        (0x04 => InterruptEnable: ReadWrite<u32>), // IER, DLM with DLAB
        (0x08 => FifoControl: ReadWrite<u32, FCR::Register>), // IIR on read
        (0x0c => LineControl: ReadWrite<u32, LCR::Register>),
        (0x10 => ModemControl: ReadWrite<u32, MCR::Register>),
        (0x14 => LineStatus: ReadOnly<u32, LSR::Register>),
        (0x18 => __reserved_1),
        (0x20 => @END),
    }
}

type Registers = MMIODerefWrapper<RegisterBlock>;

struct Ns16550UartInner {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum UartError {
    #[snafu(display("Baud rate must not be zero"))]
    ZeroBaudRate,
    #[snafu(display("Baud rate divisor {divisor} is outside 1..=0xffff"))]
    DivisorOutOfRange { divisor: u64 },
}

pub struct Ns16550Uart {
    inner: NullLock<Ns16550UartInner>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

/// Divisor latch value for `baud_rate` from a `clock` Hz input, rounded to nearest.
pub fn baud_divisor(clock: u32, baud_rate: u32) -> Result<u16, UartError> {
    ensure!(baud_rate != 0, ZeroBaudRateSnafu);

    let step = 16 * u64::from(baud_rate);
    let divisor = (u64::from(clock) + step / 2) / step;
    ensure!(
        (1..=u64::from(u16::MAX)).contains(&divisor),
        DivisorOutOfRangeSnafu { divisor }
    );
    Ok(divisor as u16)
}

impl Ns16550Uart {
    pub const COMPATIBLE: &'static str = "ns16550a";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide a correct MMIO start address.
    pub const unsafe fn new(base_addr: usize) -> Self {
        Self {
            inner: NullLock::new(Ns16550UartInner::new(base_addr)),
        }
    }

    /// Program the line for `baud_rate` 8N1 with FIFOs enabled.
    ///
    /// A `clock` of 0 leaves the UART as an earlier stage configured it.
    pub fn prepare(&self, clock: u32, baud_rate: u32) -> Result<(), UartError> {
        if clock == 0 {
            return Ok(());
        }
        let divisor = baud_divisor(clock, baud_rate)?;
        self.inner.lock(|inner| inner.prepare(divisor));
        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

impl Ns16550UartInner {
    const unsafe fn new(base_addr: usize) -> Self {
        Self {
            registers: Registers::new(base_addr),
        }
    }

    fn prepare(&self, divisor: u16) {
        self.registers.LineControl.write(LCR::DLAB::SET);
        self.registers.Data.set(u32::from(divisor & 0xff));
        self.registers.InterruptEnable.set(u32::from(divisor >> 8));

        self.registers.LineControl.write(
            LCR::WordLength::EightBit + LCR::Parity::Disabled + LCR::Stop2::Disabled,
        );

        // Polled operation only.
        self.registers.InterruptEnable.set(0);

        self.registers
            .FifoControl
            .write(FCR::FIFOE::SET + FCR::RXSR::SET + FCR::TXSR::SET);
        self.registers
            .ModemControl
            .write(MCR::DTR::SET + MCR::RTS::SET);
    }
}

cfg_if! {
    if #[cfg(feature = "noserial")] {
        /// The UART is registered as the console but never accessed.
        impl SerialOps for Ns16550UartInner {}
    } else {
        use crate::cpu::loop_while;

        impl SerialOps for Ns16550UartInner {
            fn read_byte(&self) -> u8 {
                // wait until something is in the buffer
                loop_while(|| !self.registers.LineStatus.is_set(LSR::DR));

                self.registers.Data.get() as u8
            }

            fn write_byte(&self, b: u8) {
                // wait until we can send
                loop_while(|| !self.registers.LineStatus.is_set(LSR::THRE));

                self.registers.Data.set(u32::from(b));
            }

            /// Wait until the holding and shift registers are empty.
            fn flush(&self) {
                loop_while(|| !self.registers.LineStatus.is_set(LSR::TEMT));
            }

            /// Consume input until nothing is pending.
            fn clear_rx(&self) {
                loop_while(|| {
                    let pending = self.registers.LineStatus.is_set(LSR::DR);
                    if pending {
                        self.read_byte();
                    }
                    pending
                });
            }
        }
    }
}

impl interface::ConsoleOps for Ns16550UartInner {}

impl fmt::Write for Ns16550UartInner {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        use interface::ConsoleOps;
        self.write_string(s);
        Ok(())
    }
}

impl interface::Write for Ns16550Uart {
    fn write_fmt(&self, args: Arguments) -> fmt::Result {
        self.inner.lock(|inner| fmt::Write::write_fmt(inner, args))
    }
}

//--------------------------------------------------------------------------------------------------
// OS Interface Code
//--------------------------------------------------------------------------------------------------

impl crate::drivers::interface::DeviceDriver for Ns16550Uart {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }
}

impl SerialOps for Ns16550Uart {
    fn read_byte(&self) -> u8 {
        self.inner.lock(|inner| inner.read_byte())
    }

    fn write_byte(&self, byte: u8) {
        self.inner.lock(|inner| inner.write_byte(byte))
    }

    fn flush(&self) {
        self.inner.lock(|inner| inner.flush())
    }

    fn clear_rx(&self) {
        self.inner.lock(|inner| inner.clear_rx())
    }
}

impl interface::ConsoleOps for Ns16550Uart {
    fn write_char(&self, c: char) {
        self.inner.lock(|inner| inner.write_char(c))
    }

    fn write_string(&self, string: &str) {
        self.inner.lock(|inner| inner.write_string(string))
    }

    fn read_char(&self) -> char {
        self.inner.lock(|inner| inner.read_char())
    }
}

impl interface::All for Ns16550Uart {}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------
