/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 *
 * NPCM845x (Arbel) clock controller, CLK block of the system management registers.
 */

use {
    super::super::CLKREF_FREQUENCY_KHZ,
    crate::{
        cpu::loop_delay,
        mmio_deref_wrapper::MMIODerefWrapper,
        sync::{interface::Mutex, NullLock},
    },
    snafu::{ensure, Snafu},
    tock_registers::{
        interfaces::{ReadWriteable, Readable},
        register_bitfields, register_structs,
        registers::ReadWrite,
    },
};

//--------------------------------------------------------------------------------------------------
// Private Definitions
//--------------------------------------------------------------------------------------------------

register_bitfields! {
    u32,

    /// Clock Enable 1
    CLKEN1 [
        /// Timer modules 0-4 clock enable.
        TIMER0_4 OFFSET(19) NUMBITS(1) []
    ],

    /// Clock Source Select
    CLKSEL [
        /// Timer clock source.
        TIMCKSEL OFFSET(14) NUMBITS(2) [
            PLL0 = 0b00,
            PLL1 = 0b01,
            CLKREF = 0b10,
            PLL2 = 0b11
        ],
        /// UART clock source.
        UARTCKSEL OFFSET(8) NUMBITS(2) [
            PLL0 = 0b00,
            PLL1 = 0b01,
            CLKREF = 0b10,
            PLL2 = 0b11
        ],
        /// SDHC and eMMC clock source.
        SDCKSEL OFFSET(6) NUMBITS(2) [
            PLL0 = 0b00,
            PLL1 = 0b01,
            CLKREF = 0b10,
            PLL2 = 0b11
        ],
        /// CPU/AXI clock source.
        CPUCKSEL OFFSET(0) NUMBITS(2) [
            PLL0 = 0b00,
            PLL1 = 0b01,
            CLKREF = 0b10,
            SYSBPCK = 0b11
        ]
    ],

    /// Clock Divider Control 1
    CLKDIV1 [
        /// AHBn clock divider, divide by 2^CLK4DIV.
        CLK4DIV OFFSET(26) NUMBITS(2) [],
        /// Timer clock divider, divide by TIMCKDIV + 1.
        TIMCKDIV OFFSET(21) NUMBITS(5) [],
        /// UART clock divider, divide by UARTDIV + 1.
        UARTDIV OFFSET(16) NUMBITS(5) [],
        /// eMMC clock divider, divide by MMCCKDIV + 1.
        MMCCKDIV OFFSET(11) NUMBITS(5) [],
        /// AHB3 (SPI3) clock divider, divide by AHB3CKDIV + 1.
        AHB3CKDIV OFFSET(6) NUMBITS(5) [],
        /// AXI clock divider, divide by 2^CLK2DIV.
        CLK2DIV OFFSET(0) NUMBITS(1) []
    ],

    /// PLL Control 0, 1 and 2
    PLLCON [
        /// PLL locked indication.
        LOKI OFFSET(31) NUMBITS(1) [],
        /// VCO output clock feedback divider.
        FBDV OFFSET(16) NUMBITS(12) [],
        /// Output clock divider 2.
        OTDV2 OFFSET(13) NUMBITS(3) [],
        /// Power down.
        PWDEN OFFSET(12) NUMBITS(1) [],
        /// Output clock divider 1.
        OTDV1 OFFSET(8) NUMBITS(3) [],
        /// Input clock divider.
        INDV OFFSET(0) NUMBITS(5) []
    ],

    /// Clock Enable 2
    CLKEN2 [
        /// SD card host controller clock enable.
        SDHC OFFSET(9) NUMBITS(1) [],
        /// eMMC host controller clock enable.
        MMC OFFSET(8) NUMBITS(1) []
    ],

    /// Clock Divider Control 2, APB dividers divide by 2^APBnCKDIV
    CLKDIV2 [
        APB4CKDIV OFFSET(30) NUMBITS(2) [],
        APB3CKDIV OFFSET(28) NUMBITS(2) [],
        APB2CKDIV OFFSET(26) NUMBITS(2) [],
        APB1CKDIV OFFSET(24) NUMBITS(2) [],
        APB5CKDIV OFFSET(22) NUMBITS(2) [],
        /// SD card clock divider, divide by 2 * (SD1CKDIV + 1).
        SD1CKDIV OFFSET(0) NUMBITS(4) []
    ],

    /// Clock Divider Control 3
    CLKDIV3 [
        /// SPI0 clock divider, divide by SPI0CKDV + 1.
        SPI0CKDV OFFSET(6) NUMBITS(5) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    RegisterBlock {
        (0x00 => CLKEN1: ReadWrite<u32, CLKEN1::Register>),
        (0x04 => CLKSEL: ReadWrite<u32, CLKSEL::Register>),
        (0x08 => CLKDIV1: ReadWrite<u32, CLKDIV1::Register>),
        (0x0c => PLLCON0: ReadWrite<u32, PLLCON::Register>),
        (0x10 => PLLCON1: ReadWrite<u32, PLLCON::Register>),
        (0x14 => __reserved_1),
        (0x28 => CLKEN2: ReadWrite<u32, CLKEN2::Register>),
        (0x2c => CLKDIV2: ReadWrite<u32, CLKDIV2::Register>),
        (0x30 => __reserved_2),
        (0x54 => PLLCON2: ReadWrite<u32, PLLCON::Register>),
        (0x58 => CLKDIV3: ReadWrite<u32, CLKDIV3::Register>),
        (0x5c => @END),
    }
}

type Registers = MMIODerefWrapper<RegisterBlock>;

/// Cycles to wait after every clock source or divider change.
const CLOCK_SETTLE_CYCLES: u32 = 200;

/// The UART runs from PLL2 divided by 20.
const UART_DIVIDER: u32 = 20;

struct ClockControllerInner {
    registers: Registers,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Clock sources.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pll {
    Pll0,
    Pll1,
    Pll2,
    /// The 25 MHz reference input.
    ClkRef,
}

/// Buses whose clock derives from the CPU clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Bus {
    Apb1,
    Apb2,
    Apb3,
    Apb4,
    Apb5,
    Spi0,
    Spi3,
}

/// Storage host controllers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MmcDevice {
    Sd,
    Emmc,
}

/// Clock ids as used by the device tree clock bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockId {
    Timer = 0,
    Uart = 1,
    Sd = 2,
    Emmc = 3,
    Apb1 = 4,
    Apb2 = 5,
    Apb3 = 6,
    Apb4 = 7,
    Apb5 = 8,
    Spi0 = 9,
    Spi3 = 10,
}

/// Clock controller errors.
#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum ClockError {
    #[snafu(display("Clock controller has no register base"))]
    InvalidBase,
    #[snafu(display("{pll:?} has a zero input or output divider"))]
    PllNotConfigured { pll: Pll },
    #[snafu(display("Requested clock rate is zero"))]
    ZeroRate,
    #[snafu(display("Divider {divider} is outside 1..={max}"))]
    DividerOutOfRange { divider: u64, max: u64 },
    #[snafu(display("Rate of {id:?} cannot be read"))]
    UnsupportedRate { id: ClockId },
    #[snafu(display("Rate of {id:?} cannot be set"))]
    UnsupportedSet { id: ClockId },
    #[snafu(display("Unknown clock id {id}"))]
    UnknownClock { id: u32 },
}

pub struct ClockController {
    inner: NullLock<ClockControllerInner>,
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl TryFrom<u32> for ClockId {
    type Error = ClockError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        use ClockId::*;
        Ok(match id {
            0 => Timer,
            1 => Uart,
            2 => Sd,
            3 => Emmc,
            4 => Apb1,
            5 => Apb2,
            6 => Apb3,
            7 => Apb4,
            8 => Apb5,
            9 => Spi0,
            10 => Spi3,
            _ => return UnknownClockSnafu { id }.fail(),
        })
    }
}

impl ClockId {
    fn bus(self) -> Option<Bus> {
        match self {
            ClockId::Apb1 => Some(Bus::Apb1),
            ClockId::Apb2 => Some(Bus::Apb2),
            ClockId::Apb3 => Some(Bus::Apb3),
            ClockId::Apb4 => Some(Bus::Apb4),
            ClockId::Apb5 => Some(Bus::Apb5),
            ClockId::Spi0 => Some(Bus::Spi0),
            ClockId::Spi3 => Some(Bus::Spi3),
            _ => None,
        }
    }
}

impl ClockController {
    pub const COMPATIBLE: &'static str = "nuvoton,npcm850-clock";

    /// Bind the driver to the register block at `base`.
    ///
    /// # Safety
    ///
    /// - `base` must be the CLK register block, or a block laid out like it.
    pub unsafe fn probe(base: usize) -> Result<Self, ClockError> {
        ensure!(base != 0, InvalidBaseSnafu);

        Ok(Self {
            inner: NullLock::new(ClockControllerInner {
                registers: Registers::new(base),
            }),
        })
    }

    /// Output frequency of `pll` in Hz. The reference input reports 0 here.
    pub fn pll_frequency(&self, pll: Pll) -> Result<u64, ClockError> {
        self.inner.lock(|inner| inner.pll_frequency(pll))
    }

    /// CPU clock in Hz.
    pub fn cpu_frequency(&self) -> Result<u64, ClockError> {
        self.inner.lock(|inner| inner.cpu_frequency())
    }

    /// Total divider between the CPU clock and `bus`.
    pub fn apb_divisor(&self, bus: Bus) -> u64 {
        self.inner.lock(|inner| inner.apb_divisor(bus))
    }

    /// Current rate of a bus clock, in Hz.
    pub fn get_rate(&self, id: ClockId) -> Result<u64, ClockError> {
        let bus = id.bus().ok_or(ClockError::UnsupportedRate { id })?;
        self.inner
            .lock(|inner| Ok(inner.cpu_frequency()? / inner.apb_divisor(bus)))
    }

    /// Configure a peripheral clock and return the rate it ends up running at.
    ///
    /// The timer and UART clocks have fixed configurations and ignore `rate`.
    pub fn set_rate(&self, id: ClockId, rate: u64) -> Result<u64, ClockError> {
        self.inner.lock(|inner| match id {
            ClockId::Timer => Ok(inner.timer_init_clk()),
            ClockId::Uart => inner.uart_init_clk(),
            ClockId::Sd => inner.configure_mmc(MmcDevice::Sd, rate),
            ClockId::Emmc => inner.configure_mmc(MmcDevice::Emmc, rate),
            _ => UnsupportedSetSnafu { id }.fail(),
        })
    }
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

fn settle() {
    loop_delay(CLOCK_SETTLE_CYCLES);
}

impl ClockControllerInner {
    fn pll_frequency(&self, pll: Pll) -> Result<u64, ClockError> {
        let pllcon = match pll {
            Pll::Pll0 => self.registers.PLLCON0.extract(),
            Pll::Pll1 => self.registers.PLLCON1.extract(),
            Pll::Pll2 => self.registers.PLLCON2.extract(),
            Pll::ClkRef => return Ok(0),
        };

        let nr = u64::from(pllcon.read(PLLCON::INDV));
        let nf = u64::from(pllcon.read(PLLCON::FBDV));
        let no = u64::from(pllcon.read(PLLCON::OTDV1)) * u64::from(pllcon.read(PLLCON::OTDV2));
        ensure!(nr != 0 && no != 0, PllNotConfiguredSnafu { pll });

        // Same operation order as the datasheet formula: the kHz intermediate truncates.
        Ok((10 * CLKREF_FREQUENCY_KHZ * nf) / (no * nr) * 100)
    }

    fn cpu_frequency(&self) -> Result<u64, ClockError> {
        match self.registers.CLKSEL.read_as_enum(CLKSEL::CPUCKSEL) {
            Some(CLKSEL::CPUCKSEL::Value::PLL0) => self.pll_frequency(Pll::Pll0),
            Some(CLKSEL::CPUCKSEL::Value::PLL1) => self.pll_frequency(Pll::Pll1),
            _ => Ok(CLKREF_FREQUENCY_KHZ * 1000),
        }
    }

    fn apb_divisor(&self, bus: Bus) -> u64 {
        let clkdiv1 = self.registers.CLKDIV1.extract();
        let clkdiv2 = self.registers.CLKDIV2.extract();

        // AXI and AHBn dividers sit in front of every bus.
        let ahb = (1u64 << clkdiv1.read(CLKDIV1::CLK2DIV)) * (1u64 << clkdiv1.read(CLKDIV1::CLK4DIV));

        let bus_divider = match bus {
            Bus::Apb1 => 1u64 << clkdiv2.read(CLKDIV2::APB1CKDIV),
            Bus::Apb2 => 1u64 << clkdiv2.read(CLKDIV2::APB2CKDIV),
            Bus::Apb3 => 1u64 << clkdiv2.read(CLKDIV2::APB3CKDIV),
            Bus::Apb4 => 1u64 << clkdiv2.read(CLKDIV2::APB4CKDIV),
            Bus::Apb5 => 1u64 << clkdiv2.read(CLKDIV2::APB5CKDIV),
            Bus::Spi0 => u64::from(self.registers.CLKDIV3.read(CLKDIV3::SPI0CKDV)) + 1,
            Bus::Spi3 => u64::from(clkdiv1.read(CLKDIV1::AHB3CKDIV)) + 1,
        };

        ahb * bus_divider
    }

    /// Timer 0-4 from the undivided reference clock.
    fn timer_init_clk(&self) -> u64 {
        self.registers.CLKEN1.modify(CLKEN1::TIMER0_4::SET);
        settle();

        self.registers.CLKDIV1.modify(CLKDIV1::TIMCKDIV.val(0));
        settle();

        self.registers.CLKSEL.modify(CLKSEL::TIMCKSEL::CLKREF);
        settle();

        CLKREF_FREQUENCY_KHZ * 1000
    }

    fn uart_init_clk(&self) -> Result<u64, ClockError> {
        // The emulator's UART clock is fixed, leave the controller alone.
        if !cfg!(feature = "palladium") {
            self.registers
                .CLKDIV1
                .modify(CLKDIV1::UARTDIV.val(UART_DIVIDER - 1));
            self.registers.CLKSEL.modify(CLKSEL::UARTCKSEL::PLL2);
        }

        self.uart_rate()
    }

    /// UART clock as currently programmed.
    fn uart_rate(&self) -> Result<u64, ClockError> {
        let source = match self.registers.CLKSEL.read_as_enum(CLKSEL::UARTCKSEL) {
            Some(CLKSEL::UARTCKSEL::Value::PLL0) => self.pll_frequency(Pll::Pll0)?,
            Some(CLKSEL::UARTCKSEL::Value::PLL1) => self.pll_frequency(Pll::Pll1)?,
            Some(CLKSEL::UARTCKSEL::Value::PLL2) => self.pll_frequency(Pll::Pll2)?,
            _ => CLKREF_FREQUENCY_KHZ * 1000,
        };
        Ok(source / (u64::from(self.registers.CLKDIV1.read(CLKDIV1::UARTDIV)) + 1))
    }

    /// Enable an SD or eMMC host clock and divide PLL0 down to at most `rate`.
    ///
    /// Returns PLL0 over the rounded-up divider. The divider is checked against its field
    /// before any register is written. The emulator runs eMMC undivided whatever the rate.
    fn configure_mmc(&self, device: MmcDevice, rate: u64) -> Result<u64, ClockError> {
        ensure!(rate != 0, ZeroRateSnafu);

        let pll0 = self.pll_frequency(Pll::Pll0)?;
        let divider = match device {
            MmcDevice::Emmc if cfg!(feature = "palladium") => 1,
            MmcDevice::Sd => {
                // SD1CKDIV counts pairs.
                let divider = pll0.div_ceil(rate);
                let max = 2 * (CLKDIV2::SD1CKDIV.mask as u64 + 1) + 1;
                ensure!(
                    (2..=max).contains(&divider),
                    DividerOutOfRangeSnafu { divider, max }
                );
                divider
            }
            MmcDevice::Emmc => {
                let divider = pll0.div_ceil(rate);
                let max = CLKDIV1::MMCCKDIV.mask as u64 + 1;
                ensure!(
                    (1..=max).contains(&divider),
                    DividerOutOfRangeSnafu { divider, max }
                );
                divider
            }
        };

        match device {
            MmcDevice::Sd => {
                self.registers.CLKEN2.modify(CLKEN2::SDHC::SET);
                self.registers
                    .CLKDIV2
                    .modify(CLKDIV2::SD1CKDIV.val((divider / 2 - 1) as u32));
            }
            MmcDevice::Emmc => {
                self.registers.CLKEN2.modify(CLKEN2::MMC::SET);
                self.registers
                    .CLKDIV1
                    .modify(CLKDIV1::MMCCKDIV.val((divider - 1) as u32));
            }
        }
        settle();

        // Both host controllers always run from PLL0.
        self.registers.CLKSEL.modify(CLKSEL::SDCKSEL::PLL0);

        Ok(pll0 / divider)
    }
}

//--------------------------------------------------------------------------------------------------
// OS Interface Code
//--------------------------------------------------------------------------------------------------

impl crate::drivers::interface::DeviceDriver for ClockController {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {super::*, crate::platform::npcm845x::device_driver::fake_mmio::FakeMmio};

    const CLKEN1_OFF: usize = 0x00;
    const CLKSEL_OFF: usize = 0x04;
    const CLKDIV1_OFF: usize = 0x08;
    const PLLCON0_OFF: usize = 0x0c;
    const PLLCON1_OFF: usize = 0x10;
    const CLKEN2_OFF: usize = 0x28;
    const CLKDIV2_OFF: usize = 0x2c;
    const PLLCON2_OFF: usize = 0x54;
    const CLKDIV3_OFF: usize = 0x58;

    /// INDV=1, OTDV1=2, OTDV2=1, FBDV=80: 1 GHz.
    const PLLCON_1GHZ: u32 = 0x0050_2201;
    /// INDV=1, OTDV1=2, OTDV2=2, FBDV=192: 1.2 GHz.
    const PLLCON_1_2GHZ: u32 = 0x00c0_4201;

    fn controller(mmio: &mut FakeMmio) -> ClockController {
        unsafe { ClockController::probe(mmio.base()) }.unwrap()
    }

    fn clk() -> FakeMmio {
        let mut mmio = FakeMmio::new(0x5c);
        mmio.set(PLLCON0_OFF, PLLCON_1GHZ);
        mmio.set(PLLCON2_OFF, PLLCON_1_2GHZ);
        mmio
    }

    #[test]
    fn probe_rejects_null_base() {
        assert_eq!(
            unsafe { ClockController::probe(0) }.err(),
            Some(ClockError::InvalidBase)
        );
    }

    #[test]
    fn register_offsets_match_the_datasheet() {
        assert_eq!(core::mem::size_of::<RegisterBlock>(), 0x5c);
        let mut mmio = clk();
        mmio.set(CLKDIV3_OFF, 3 << 6);
        let clocks = controller(&mut mmio);
        assert_eq!(clocks.apb_divisor(Bus::Spi0), 4);
    }

    #[test]
    fn pll_frequency_from_pllcon() {
        let mut mmio = clk();
        let clocks = controller(&mut mmio);

        assert_eq!(clocks.pll_frequency(Pll::Pll0), Ok(1_000_000_000));
        assert_eq!(clocks.pll_frequency(Pll::Pll2), Ok(1_200_000_000));
        assert_eq!(clocks.pll_frequency(Pll::ClkRef), Ok(0));
    }

    #[test]
    fn unconfigured_pll_is_an_error() {
        let mut mmio = clk();
        // PLL1 left at zero: INDV = 0.
        let clocks = controller(&mut mmio);
        assert_eq!(
            clocks.pll_frequency(Pll::Pll1),
            Err(ClockError::PllNotConfigured { pll: Pll::Pll1 })
        );
    }

    #[test]
    fn pll_formula_truncates_like_the_hardware_reference() {
        // INDV=3, OTDV1=1, OTDV2=1, FBDV=100: 10 * 25000 * 100 / 3 = 8333333 (kHz/10), * 100.
        let mut mmio = clk();
        mmio.set(PLLCON1_OFF, (100 << 16) | (1 << 13) | (1 << 8) | 3);
        let clocks = controller(&mut mmio);
        assert_eq!(clocks.pll_frequency(Pll::Pll1), Ok(833_333_300));
    }

    #[test]
    fn cpu_frequency_follows_cpucksel() {
        let mut mmio = clk();
        mmio.set(PLLCON1_OFF, PLLCON_1_2GHZ);
        let base = mmio.base();
        let clocks = unsafe { ClockController::probe(base) }.unwrap();

        assert_eq!(clocks.cpu_frequency(), Ok(1_000_000_000));
        mmio.set(CLKSEL_OFF, 0b01);
        assert_eq!(clocks.cpu_frequency(), Ok(1_200_000_000));
        mmio.set(CLKSEL_OFF, 0b10);
        assert_eq!(clocks.cpu_frequency(), Ok(25_000_000));
        mmio.set(CLKSEL_OFF, 0b11);
        assert_eq!(clocks.cpu_frequency(), Ok(25_000_000));
    }

    #[test]
    fn apb_rates() {
        let mut mmio = clk();
        // CLK2DIV=1, CLK4DIV=1: AHB at /4.
        mmio.set(CLKDIV1_OFF, (1 << 26) | 1 | (7 << 6));
        // APB2 /2, APB5 /4, APB1 /1, APB4 /8.
        mmio.set(CLKDIV2_OFF, (1 << 26) | (2 << 22) | (3 << 30));
        let clocks = controller(&mut mmio);

        assert_eq!(clocks.apb_divisor(Bus::Apb2), 8);
        assert_eq!(clocks.apb_divisor(Bus::Apb5), 16);
        assert_eq!(clocks.get_rate(ClockId::Apb2), Ok(125_000_000));
        assert_eq!(clocks.get_rate(ClockId::Apb5), Ok(62_500_000));
        assert_eq!(clocks.get_rate(ClockId::Apb1), Ok(250_000_000));
        assert_eq!(clocks.get_rate(ClockId::Apb4), Ok(31_250_000));
        assert_eq!(clocks.apb_divisor(Bus::Spi3), 32);
    }

    #[test]
    fn get_rate_of_a_peripheral_clock_is_unsupported() {
        let mut mmio = clk();
        let clocks = controller(&mut mmio);
        assert_eq!(
            clocks.get_rate(ClockId::Sd),
            Err(ClockError::UnsupportedRate { id: ClockId::Sd })
        );
    }

    #[test]
    fn timer_runs_from_the_reference_clock() {
        let mut mmio = clk();
        mmio.set(CLKDIV1_OFF, (0x1f << 21) | (5 << 16));
        mmio.set(CLKSEL_OFF, 0x1);
        let rate = controller(&mut mmio).set_rate(ClockId::Timer, 0);

        assert_eq!(rate, Ok(25_000_000));
        assert_eq!(mmio.get(CLKEN1_OFF), 1 << 19);
        // TIMCKDIV cleared, UARTDIV untouched.
        assert_eq!(mmio.get(CLKDIV1_OFF), 5 << 16);
        // TIMCKSEL = CLKREF, CPUCKSEL untouched.
        assert_eq!(mmio.get(CLKSEL_OFF), (0b10 << 14) | 0x1);
    }

    #[cfg(not(feature = "palladium"))]
    #[test]
    fn uart_runs_from_pll2_over_20() {
        let mut mmio = clk();
        let rate = controller(&mut mmio).set_rate(ClockId::Uart, 115_200);

        assert_eq!(rate, Ok(60_000_000));
        assert_eq!(mmio.get(CLKDIV1_OFF), 19 << 16);
        assert_eq!(mmio.get(CLKSEL_OFF), 0b11 << 8);
    }

    #[cfg(feature = "palladium")]
    #[test]
    fn emulator_uart_clock_is_left_alone() {
        let mut mmio = clk();
        mmio.set(CLKDIV1_OFF, 3 << 16);
        mmio.set(CLKSEL_OFF, 0b10 << 8);
        let rate = controller(&mut mmio).set_rate(ClockId::Uart, 115_200);

        // Reports whatever the emulator left programmed: CLKREF / 4.
        assert_eq!(rate, Ok(6_250_000));
        assert_eq!(mmio.get(CLKDIV1_OFF), 3 << 16);
        assert_eq!(mmio.get(CLKSEL_OFF), 0b10 << 8);
    }

    #[test]
    fn sd_clock_divider() {
        let mut mmio = clk();
        mmio.set(CLKDIV2_OFF, 1 << 26);
        let rate = controller(&mut mmio).set_rate(ClockId::Sd, 50_000_000);

        assert_eq!(rate, Ok(50_000_000));
        assert_eq!(mmio.get(CLKEN2_OFF), 1 << 9);
        assert_eq!(mmio.get(CLKDIV2_OFF), (1 << 26) | 9);
        assert_eq!(mmio.get(CLKSEL_OFF) & (0b11 << 6), 0);
    }

    #[test]
    fn sd_divider_rounds_up() {
        let mut mmio = clk();
        // 1 GHz / 48 MHz = 20.8, rounded up to 21: SD1CKDIV = 21 / 2 - 1 = 9.
        let rate = controller(&mut mmio).set_rate(ClockId::Sd, 48_000_000);

        assert_eq!(rate, Ok(1_000_000_000 / 21));
        assert_eq!(mmio.get(CLKDIV2_OFF), 9);
    }

    #[cfg(not(feature = "palladium"))]
    #[test]
    fn emmc_clock_divider() {
        let mut mmio = clk();
        mmio.set(CLKSEL_OFF, 0b11 << 6);
        let rate = controller(&mut mmio).set_rate(ClockId::Emmc, 100_000_000);

        assert_eq!(rate, Ok(100_000_000));
        assert_eq!(mmio.get(CLKEN2_OFF), 1 << 8);
        assert_eq!(mmio.get(CLKDIV1_OFF), 9 << 11);
        // SDCKSEL switched to PLL0.
        assert_eq!(mmio.get(CLKSEL_OFF), 0);
    }

    #[cfg(feature = "palladium")]
    #[test]
    fn emulator_emmc_runs_undivided() {
        let mut mmio = clk();
        mmio.set(CLKDIV1_OFF, (9 << 11) | (5 << 16));
        mmio.set(CLKSEL_OFF, 0b11 << 6);
        // Far below what MMCCKDIV could divide 1 GHz down to.
        let rate = controller(&mut mmio).set_rate(ClockId::Emmc, 25_000_000);

        assert_eq!(rate, Ok(1_000_000_000));
        assert_eq!(mmio.get(CLKEN2_OFF), 1 << 8);
        // MMCCKDIV cleared, UARTDIV untouched.
        assert_eq!(mmio.get(CLKDIV1_OFF), 5 << 16);
        assert_eq!(mmio.get(CLKSEL_OFF), 0);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let mut mmio = clk();
        assert_eq!(
            controller(&mut mmio).set_rate(ClockId::Emmc, 0),
            Err(ClockError::ZeroRate)
        );
        assert_eq!(mmio.get(CLKEN2_OFF), 0);
    }

    #[test]
    fn out_of_range_divider_writes_nothing() {
        let mut mmio = clk();
        let clocks = controller(&mut mmio);

        // 1 GHz / 10 MHz = 100, more than SD1CKDIV can express.
        assert_eq!(
            clocks.set_rate(ClockId::Sd, 10_000_000),
            Err(ClockError::DividerOutOfRange {
                divider: 100,
                max: 33
            })
        );
        // Faster than PLL0 itself rounds to a divider of 1, which SD cannot do.
        assert_eq!(
            clocks.set_rate(ClockId::Sd, 2_000_000_000),
            Err(ClockError::DividerOutOfRange {
                divider: 1,
                max: 33
            })
        );
        #[cfg(not(feature = "palladium"))]
        assert_eq!(
            clocks.set_rate(ClockId::Emmc, 25_000_000),
            Err(ClockError::DividerOutOfRange {
                divider: 40,
                max: 32
            })
        );
        assert_eq!(mmio.get(CLKEN2_OFF), 0);
        assert_eq!(mmio.get(CLKDIV1_OFF), 0);
        assert_eq!(mmio.get(CLKDIV2_OFF), 0);
    }

    #[test]
    fn set_rate_of_a_bus_clock_is_unsupported() {
        let mut mmio = clk();
        assert_eq!(
            controller(&mut mmio).set_rate(ClockId::Apb2, 1),
            Err(ClockError::UnsupportedSet { id: ClockId::Apb2 })
        );
    }

    #[test]
    fn clock_ids_from_bindings() {
        assert_eq!(ClockId::try_from(3), Ok(ClockId::Emmc));
        assert_eq!(ClockId::try_from(10), Ok(ClockId::Spi3));
        assert_eq!(
            ClockId::try_from(11),
            Err(ClockError::UnknownClock { id: 11 })
        );
    }
}
