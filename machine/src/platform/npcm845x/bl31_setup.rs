/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 */

//! BL31 platform bring-up for the NPCM845x.
//!
//! Called by the BL31 image in this order, on the primary core with everything masked:
//!
//! 1. [`Npcm845x::early_platform_setup`] with the registers the previous stage passed,
//! 2. [`Npcm845x::plat_arch_setup`] to build the EL3 tables and enable the MMU,
//! 3. [`Npcm845x::platform_setup`] for the interrupt controller, TrustZone and the counter,
//!
//! after which [`Npcm845x::next_image_ep_info`] tells it where to go.

use {
    super::{
        device_driver::{
            trustzone::{RAM2_AREA4_INDEX, RAM2_AREA5_INDEX, RAM2_AREA6_INDEX, RAM2_AREA7_INDEX},
            ClockController, GICv2, Ns16550Uart, SecureInterrupt, SystemCounter,
            TrustZoneController, TrustZoneError, UartError,
        },
        memory::{self, map, map::mmio},
        CONSOLE_BAUDRATE, COUNTER_FREQUENCY, MAX_XLAT_TABLES, PALLADIUM_UART_CLOCK,
    },
    crate::{
        console, cpu,
        drivers::interface::DeviceDriver,
        handoff::{
            check_reset_args, spsr_for_bl32_entry, spsr_for_bl33_entry, EntryPointInfo,
            HandoffError, NextImages, SecurityState,
        },
        memory::{
            mmu::{interface::MMU, mmu, MMUEnableError, TranslationTables, XlatError},
            PAGE_SIZE,
        },
        sync::{interface::Mutex, NullLock},
        time,
    },
    snafu::{ResultExt, Snafu},
    usize_conversions::FromUsize,
};

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// Bring-up failures. None of them can be recovered from on the boot path.
#[derive(Debug, Snafu)]
pub enum SetupError {
    #[snafu(display("Boot handoff: {source}"))]
    Handoff { source: HandoffError },
    #[snafu(display("Console UART: {source}"))]
    Console { source: UartError },
    #[snafu(display("EL3 memory map: {source}"))]
    MemoryMap { source: XlatError },
    #[snafu(display("EL3 MMU: {source}"))]
    Mmu { source: MMUEnableError },
    #[snafu(display("GIC: {err}"))]
    Gic { err: &'static str },
    #[snafu(display("TrustZone: {source}"))]
    TrustZone { source: TrustZoneError },
}

/// Register blocks the bring-up code drives directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MmioBases {
    pub clk: usize,
    pub gicd: usize,
    pub gicc: usize,
    pub tz: usize,
    pub sys_cntctl: usize,
}

pub struct Npcm845x {
    uart: &'static Ns16550Uart,
    clk_base: usize,
    clocks: NullLock<Option<ClockController>>,
    gic: GICv2,
    trustzone: TrustZoneController,
    sys_counter: SystemCounter,
    next_images: NullLock<NextImages>,
}

//--------------------------------------------------------------------------------------------------
// Global instances
//--------------------------------------------------------------------------------------------------

/// Secure SGIs 8 to 15, taken as FIQ at EL3.
static SECURE_INTERRUPTS: [SecureInterrupt; 8] = [
    SecureInterrupt::new(8),
    SecureInterrupt::new(9),
    SecureInterrupt::new(10),
    SecureInterrupt::new(11),
    SecureInterrupt::new(12),
    SecureInterrupt::new(13),
    SecureInterrupt::new(14),
    SecureInterrupt::new(15),
];

static UART0: Ns16550Uart = unsafe { Ns16550Uart::new(mmio::UART0_BASE) };

static PLATFORM: Npcm845x =
    unsafe { Npcm845x::new(&UART0, MmioBases::SOC, &SECURE_INTERRUPTS) };

/// EL3 translation tables. They must stay put once the MMU uses them.
static EL3_TABLES: NullLock<TranslationTables<MAX_XLAT_TABLES>> =
    NullLock::new(TranslationTables::new());

/// The SoC.
pub fn platform() -> &'static Npcm845x {
    &PLATFORM
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl MmioBases {
    pub const SOC: Self = Self {
        clk: mmio::CLK_BASE,
        gicd: mmio::GICD_BASE,
        gicc: mmio::GICC_BASE,
        tz: mmio::TZ_BASE,
        sys_cntctl: mmio::SYS_CNTCTL_BASE,
    };
}

impl Npcm845x {
    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses.
    pub const unsafe fn new(
        uart: &'static Ns16550Uart,
        bases: MmioBases,
        secure_interrupts: &'static [SecureInterrupt],
    ) -> Self {
        Self {
            uart,
            clk_base: bases.clk,
            clocks: NullLock::new(None),
            gic: GICv2::new(bases.gicd, bases.gicc, secure_interrupts),
            trustzone: TrustZoneController::new(bases.tz),
            sys_counter: SystemCounter::new(bases.sys_cntctl),
            next_images: NullLock::new(NextImages::empty()),
        }
    }

    /// Capture the handoff and bring up what logging and clocks need, before the MMU is on.
    ///
    /// `arg0` and `arg3` are the first and last registers the previous stage passed. The middle
    /// two carry nothing on this platform.
    ///
    /// # Safety
    ///
    /// - Unless BL31 is the reset vector, `arg0` must point to the previous stage's parameter
    ///   list, which must still be readable.
    pub unsafe fn early_platform_setup(
        &self,
        arg0: usize,
        _arg1: usize,
        _arg2: usize,
        arg3: usize,
    ) -> Result<(), SetupError> {
        let arg3 = u64::from_usize(arg3);

        if cfg!(feature = "reset_to_bl31") {
            check_reset_args(arg0, arg3).context(HandoffSnafu)?;
        }

        time::init_delay_timer(self.syscnt_freq());

        self.board_uart_init()?;
        self.board_clocks_init();

        // A single cluster, with coherency already set up by the boot ROM.

        let images = if cfg!(feature = "reset_to_bl31") {
            reset_vector_images(cpu::el2_implemented())
        } else {
            NextImages::from_bl_params(arg0, arg3).context(HandoffSnafu)?
        };
        self.next_images.lock(|next| *next = images);

        Ok(())
    }

    /// Map BL31 and the board into the EL3 translation tables and switch the MMU on.
    ///
    /// # Safety
    ///
    /// - Changes the HW's global state. The memory map must cover the code that is executing.
    pub unsafe fn plat_arch_setup(&self) -> Result<(), SetupError> {
        let mmap = memory::el3_mmap(&memory::bl31_layout()).context(MemoryMapSnafu)?;

        info!("EL3 memory map:");
        for region in mmap.as_slice() {
            info!("{}", region);
        }

        EL3_TABLES.lock(|tables| {
            tables.map_regions(mmap.as_slice()).context(MemoryMapSnafu)?;
            info!(
                "{} of {} translation tables used",
                tables.tables_used(),
                MAX_XLAT_TABLES
            );
            mmu()
                .enable_mmu_and_caching(tables.base_address())
                .context(MmuSnafu)
        })
    }

    /// Interrupt controller, TrustZone windows, system counter and power controller, in order.
    pub fn platform_setup(&self) -> Result<(), SetupError> {
        info!("Initialising {}", self.gic.compatible());
        unsafe { self.gic.init() }.map_err(|err| SetupError::Gic { err })?;

        // Also done when a previous stage exists; nothing earlier sets these windows up.
        info!("Initialising {}", self.trustzone.compatible());
        self.security_setup()?;

        self.sys_counter.enable();
        info!(
            "System counter enabled, base frequency {} Hz",
            self.sys_counter.base_frequency()
        );

        self.pwrc_setup();

        Ok(())
    }

    /// Entry point of the next image for `state`, if there is one.
    pub fn next_image_ep_info(&self, state: SecurityState) -> Option<EntryPointInfo> {
        self.next_images.lock(|next| next.ep_info(state))
    }

    /// Frequency of the system counter.
    pub fn syscnt_freq(&self) -> u32 {
        COUNTER_FREQUENCY
    }

    /// The console stays on the boot UART after the cold boot.
    pub fn console_runtime_init(&self) {}

    /// There is no trusted mailbox: secondary cores are released by the boot ROM.
    pub fn program_trusted_mailbox(&self, _address: usize) {}

    /// Run `f` with the clock controller, if it probed.
    pub fn with_clocks<R>(&self, f: impl FnOnce(&ClockController) -> R) -> Option<R> {
        self.clocks.lock(|clocks| clocks.as_ref().map(f))
    }
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

impl Npcm845x {
    /// The boot ROM leaves the UART programmed, so registering it is enough.
    fn board_uart_init(&self) -> Result<(), SetupError> {
        let clock = if cfg!(feature = "palladium") {
            PALLADIUM_UART_CLOCK
        } else {
            0
        };
        self.uart
            .prepare(clock, CONSOLE_BAUDRATE)
            .context(ConsoleSnafu)?;

        console::register_console(self.uart);
        info!("Console on {}", self.uart.compatible());
        Ok(())
    }

    /// Clocks are not needed for the rest of the bring-up, so a failed probe is only reported.
    fn board_clocks_init(&self) {
        match unsafe { ClockController::probe(self.clk_base) } {
            Ok(clocks) => {
                info!("Probed {}", clocks.compatible());
                match clocks.cpu_frequency() {
                    Ok(hz) => info!("CPU clock: {} MHz", hz / 1_000_000),
                    Err(e) => warn!("CPU clock unknown: {}", e),
                }
                self.clocks.lock(|slot| *slot = Some(clocks));
            }
            Err(e) => warn!("Clock controller not available: {}", e),
        }
    }

    /// Secure-only windows over the top of RAM2, where BL31 runs.
    fn security_setup(&self) -> Result<(), SetupError> {
        for index in [
            RAM2_AREA4_INDEX,
            RAM2_AREA5_INDEX,
            RAM2_AREA6_INDEX,
            RAM2_AREA7_INDEX,
        ] {
            self.trustzone
                .enable_window(index, true)
                .context(TrustZoneSnafu)?;
        }
        Ok(())
    }

    /// The NPCM845x is always powered, there is no power controller to set up.
    fn pwrc_setup(&self) {}
}

/// Compiled-in entry points for a BL31 that runs straight out of reset.
fn reset_vector_images(el2_present: bool) -> NextImages {
    let mut images = NextImages::empty();

    if cfg!(feature = "bl32") {
        let bl32 = &mut images.bl32;
        bl32.pc = u64::from_usize(map::BL32_BASE);
        bl32.spsr = spsr_for_bl32_entry();
        if cfg!(feature = "spmd") {
            // The SPM core manifest sits in the last page of trusted SRAM.
            bl32.args[0] =
                u64::from_usize(map::TRUSTED_SRAM_BASE + map::TRUSTED_SRAM_SIZE - PAGE_SIZE);
        }
    }

    let bl33 = &mut images.bl33;
    bl33.pc = u64::from_usize(map::NS_IMAGE_BASE);
    bl33.spsr = spsr_for_bl33_entry(el2_present);
    if cfg!(feature = "linux_kernel_as_bl33") {
        // Linux wants the DTB in x0 and zeroes in x1 to x3.
        bl33.args[0] = u64::from_usize(map::PRELOADED_DTB_BASE);
        bl33.args[1..4].fill(0);
    } else if cfg!(feature = "spmd") {
        // The normal world SPM's manifest is at the base of DRAM.
        bl33.args[0] = u64::from_usize(map::DRAM1_BASE);
    }

    images
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            handoff::{
                BlParams, BlParamsNode, ParamHeader, BL33_IMAGE_ID, PARAM_BL_PARAMS,
                PLAT_PARAM_MAGIC, VERSION_2,
            },
            memory::mmu::{AttributeFields, Translation},
            platform::npcm845x::device_driver::fake_mmio::FakeMmio,
        },
        core::ptr,
    };

    /// A parameter list handing over to a BL33 described by `bl33`.
    fn bl33_handoff(bl33: &EntryPointInfo) -> (BlParamsNode, ParamHeader) {
        let node = BlParamsNode {
            image_id: BL33_IMAGE_ID,
            image_info: ptr::null(),
            ep_info: bl33,
            next_params_info: ptr::null(),
        };
        (node, ParamHeader::new(PARAM_BL_PARAMS, VERSION_2, 16, 0))
    }

    struct FakeSoc {
        uart: FakeMmio,
        clk: FakeMmio,
        gicd: FakeMmio,
        gicc: FakeMmio,
        tz: FakeMmio,
        cntctl: FakeMmio,
    }

    impl FakeSoc {
        fn new() -> Self {
            let mut uart = FakeMmio::new(0x20);
            // Transmitter idle, so console output never blocks.
            uart.set(0x14, 0x60);
            let mut clk = FakeMmio::new(0x5c);
            // PLL0 at 1 GHz, CPU on PLL0.
            clk.set(0x0c, 0x0050_2201);
            let mut gicd = FakeMmio::new(0x1000);
            gicd.set(0x004, 4);
            Self {
                uart,
                clk,
                gicd,
                gicc: FakeMmio::new(0x10),
                tz: FakeMmio::new(0x40),
                cntctl: FakeMmio::new(0x30),
            }
        }

        fn platform(&mut self) -> Npcm845x {
            let uart: &'static Ns16550Uart =
                Box::leak(Box::new(unsafe { Ns16550Uart::new(self.uart.base()) }));
            let bases = MmioBases {
                clk: self.clk.base(),
                gicd: self.gicd.base(),
                gicc: self.gicc.base(),
                tz: self.tz.base(),
                sys_cntctl: self.cntctl.base(),
            };
            unsafe { Npcm845x::new(uart, bases, &SECURE_INTERRUPTS) }
        }
    }

    #[test]
    fn soc_bases_follow_the_memory_map() {
        assert_eq!(MmioBases::SOC.clk, 0xf080_1000);
        assert_eq!(MmioBases::SOC.gicd, 0xdfff_9000);
        assert_eq!(MmioBases::SOC.gicc, 0xdfff_a000);
        assert_eq!(platform().syscnt_freq(), 25_000_000);
    }

    #[cfg(not(feature = "reset_to_bl31"))]
    #[test]
    fn early_setup_copies_the_handoff_and_probes_clocks() {
        let mut soc = FakeSoc::new();
        let plat = soc.platform();

        let mut bl33 = EntryPointInfo::new(SecurityState::NonSecure);
        bl33.pc = 0x8000;
        bl33.spsr = 0x3c5;
        let (node, h) = bl33_handoff(&bl33);
        let params = BlParams { h, head: &node };

        unsafe {
            plat.early_platform_setup(
                &params as *const _ as usize,
                0,
                0,
                PLAT_PARAM_MAGIC as usize,
            )
        }
        .unwrap();

        assert_eq!(plat.next_image_ep_info(SecurityState::NonSecure), Some(bl33));
        assert_eq!(plat.next_image_ep_info(SecurityState::Secure), None);
        assert_eq!(
            plat.with_clocks(|clocks| clocks.cpu_frequency()),
            Some(Ok(1_000_000_000))
        );
        assert_eq!(crate::time::counter_frequency(), 25_000_000);

        // The boot ROM's UART setup is left alone.
        if !cfg!(feature = "palladium") {
            assert_eq!(soc.uart.get(0x0c), 0);
        }

        // A bad handoff is reported, not skipped.
        let res = unsafe { plat.early_platform_setup(0, 0, 0, 0) };
        assert!(matches!(
            res,
            Err(SetupError::Handoff {
                source: HandoffError::BadPlatformMagic { found: 0 }
            })
        ));
    }

    #[test]
    fn handoff_is_accepted_only_with_a_previous_stage() {
        let mut soc = FakeSoc::new();
        let plat = soc.platform();

        let mut bl33 = EntryPointInfo::new(SecurityState::NonSecure);
        bl33.pc = 0x20_0000;
        let (node, h) = bl33_handoff(&bl33);
        let params = BlParams { h, head: &node };
        let arg0 = &params as *const _ as usize;

        let res = unsafe { plat.early_platform_setup(arg0, 0, 0, PLAT_PARAM_MAGIC as usize) };
        if cfg!(feature = "reset_to_bl31") {
            assert!(matches!(
                res,
                Err(SetupError::Handoff {
                    source: HandoffError::UnexpectedParams { .. }
                })
            ));
            assert_eq!(plat.next_image_ep_info(SecurityState::NonSecure), None);
        } else {
            assert!(res.is_ok());
            assert_eq!(plat.next_image_ep_info(SecurityState::NonSecure), Some(bl33));
        }
    }

    #[cfg(feature = "palladium")]
    #[test]
    fn emulator_console_is_programmed_for_115200_8n1() {
        let mut soc = FakeSoc::new();
        let plat = soc.platform();

        let mut bl33 = EntryPointInfo::new(SecurityState::NonSecure);
        bl33.pc = 0x8000;
        let (node, h) = bl33_handoff(&bl33);
        let params = BlParams { h, head: &node };
        let (arg0, arg3) = if cfg!(feature = "reset_to_bl31") {
            (0, 0)
        } else {
            (&params as *const _ as usize, PLAT_PARAM_MAGIC as usize)
        };

        unsafe { plat.early_platform_setup(arg0, 0, 0, arg3) }.unwrap();

        // 24 MHz / (16 * 115200) = 13.02, DLM zero.
        assert_eq!(soc.uart.get(0x00), 13);
        assert_eq!(soc.uart.get(0x04), 0);
        // DLAB dropped, 8 data bits, no parity, one stop bit.
        assert_eq!(soc.uart.get(0x0c), 0b11);
        // FIFOs on and both reset.
        assert_eq!(soc.uart.get(0x08), 0b111);
        assert_eq!(soc.uart.get(0x10), 0b11);
    }

    #[test]
    fn missing_clock_controller_is_not_fatal() {
        let mut soc = FakeSoc::new();
        let mut plat = soc.platform();
        plat.clk_base = 0;

        plat.board_clocks_init();
        assert_eq!(plat.with_clocks(|_| ()), None);
    }

    #[test]
    fn platform_setup_order_of_effects() {
        let mut soc = FakeSoc::new();
        let plat = soc.platform();

        plat.platform_setup().unwrap();

        // Distributor and CPU interface are on.
        assert_eq!(soc.gicd.get(0x000), 0b11);
        assert_eq!(soc.gicc.get(0x00) & 0b1001, 0b1001);
        // Secure SGIs 8..15 in group 0, everything else of the bank in group 1.
        assert_eq!(soc.gicd.get(0x080), 0xffff_00ff);
        // RAM2 areas 4..7 protected, nothing else.
        for index in 0..16 {
            assert_eq!(soc.tz.get(index * 4), u32::from((4..8).contains(&index)));
        }
        // Counter running from frequency table entry 0.
        assert_eq!(soc.cntctl.get(0x00), 0x1);
    }

    #[test]
    fn reset_vector_bl33_enters_el1() {
        let images = reset_vector_images(true);
        let bl33 = images.bl33;

        assert_eq!(bl33.pc, 0x8000);
        assert_eq!(bl33.spsr, 0x3c5);
        assert_eq!(bl33.security_state(), SecurityState::NonSecure);
        assert_eq!(reset_vector_images(false).bl33.spsr, 0x3c5);

        if cfg!(feature = "linux_kernel_as_bl33") {
            assert_eq!(bl33.args[..4], [0x0400_0000, 0, 0, 0]);
        } else if cfg!(feature = "spmd") {
            assert_eq!(bl33.args[0], 0);
        }
    }

    #[test]
    fn reset_vector_bl32_only_with_a_secure_payload() {
        let images = reset_vector_images(true);
        if cfg!(feature = "bl32") {
            let bl32 = images.ep_info(SecurityState::Secure).unwrap();
            assert_eq!(bl32.pc, 0x0600_0000);
            assert_eq!(bl32.spsr, 0);
            assert_eq!(bl32.security_state(), SecurityState::Secure);
            if cfg!(feature = "spmd") {
                assert_eq!(bl32.args[0], 0xffff_f000);
            }
        } else {
            assert_eq!(images.ep_info(SecurityState::Secure), None);
        }
    }

    #[test]
    fn el3_tables_for_the_board() {
        let mut tables = Box::new(TranslationTables::<MAX_XLAT_TABLES>::new());
        let mmap = memory::el3_mmap(&memory::bl31_layout()).unwrap();
        tables.map_regions(mmap.as_slice()).unwrap();
        assert!(tables.tables_used() <= MAX_XLAT_TABLES);

        let layout = memory::bl31_layout();
        let at = |va: usize| tables.lookup(va).map(|t: Translation| t.attributes);

        assert_eq!(at(layout.code_start), Some(AttributeFields::code()));
        assert_eq!(at(layout.rodata_start), Some(AttributeFields::ro_data()));
        assert_eq!(at(layout.rodata_end), Some(AttributeFields::rw_memory()));
        assert_eq!(at(map::SHARED_RAM_BASE), Some(AttributeFields::device()));
        assert_eq!(at(mmio::CLK_BASE), Some(AttributeFields::device()));
        assert_eq!(at(mmio::GICD_BASE), Some(AttributeFields::device()));
        assert_eq!(
            at(map::NS_IMAGE_BASE),
            Some(AttributeFields::rw_memory().non_secure())
        );
        // Between DRAM and the GIC nothing is mapped.
        assert_eq!(at(0x9000_0000), None);
        // Past the end of BL31 in trusted SRAM neither.
        assert_eq!(at(map::BL31_LIMIT - PAGE_SIZE), None);
    }
}
