/*
 * SPDX-License-Identifier: BlueOak-1.0.0
 *
 * GICv2 (GIC-400) setup from EL3: interrupt groups, priorities and the CPU interface.
 */

use {
    crate::{
        mmio_deref_wrapper::MMIODerefWrapper,
        sync::{interface::Mutex, NullLock},
    },
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

    /// Distributor Control Register
    GICD_CTLR [
        EnableGrp1 OFFSET(1) NUMBITS(1) [],
        EnableGrp0 OFFSET(0) NUMBITS(1) []
    ],

    /// Interrupt Controller Type Register
    GICD_TYPER [
        /// Number of 32-interrupt lines supported, minus one.
        ITLinesNumber OFFSET(0) NUMBITS(5) []
    ],

    /// CPU Interface Control Register, secure view
    GICC_CTLR [
        IRQBypDisGrp1 OFFSET(8) NUMBITS(1) [],
        FIQBypDisGrp1 OFFSET(7) NUMBITS(1) [],
        IRQBypDisGrp0 OFFSET(6) NUMBITS(1) [],
        FIQBypDisGrp0 OFFSET(5) NUMBITS(1) [],
        /// Signal group 0 interrupts as FIQ.
        FIQEn OFFSET(3) NUMBITS(1) [],
        EnableGrp1 OFFSET(1) NUMBITS(1) [],
        EnableGrp0 OFFSET(0) NUMBITS(1) []
    ],

    /// Interrupt Priority Mask Register
    GICC_PMR [
        Priority OFFSET(0) NUMBITS(8) []
    ]
}

register_structs! {
    #[allow(non_snake_case)]
    DistributorRegisterBlock {
        (0x000 => CTLR: ReadWrite<u32, GICD_CTLR::Register>),
        (0x004 => TYPER: ReadOnly<u32, GICD_TYPER::Register>),
        (0x008 => __reserved_1),
        (0x080 => IGROUPR: [ReadWrite<u32>; 32]),
        (0x100 => ISENABLER: [ReadWrite<u32>; 32]),
        (0x180 => ICENABLER: [ReadWrite<u32>; 32]),
        (0x200 => __reserved_2),
        (0x400 => IPRIORITYR: [ReadWrite<u32>; 255]),
        (0x7fc => __reserved_3),
        (0x800 => ITARGETSR: [ReadWrite<u32>; 255]),
        (0xbfc => __reserved_4),
        (0x1000 => @END),
    }
}

register_structs! {
    #[allow(non_snake_case)]
    CpuInterfaceRegisterBlock {
        (0x00 => CTLR: ReadWrite<u32, GICC_CTLR::Register>),
        (0x04 => PMR: ReadWrite<u32, GICC_PMR::Register>),
        (0x08 => __reserved_1),
        (0x10 => @END),
    }
}

type DistributorRegisters = MMIODerefWrapper<DistributorRegisterBlock>;
type CpuInterfaceRegisters = MMIODerefWrapper<CpuInterfaceRegisterBlock>;

/// First shared peripheral interrupt. Lower ids are banked per CPU.
const MIN_SPI_ID: usize = 32;

/// Secure interrupt priority, the highest a non-secure access can express.
const GIC_HIGHEST_NS_PRIORITY: u8 = 0x80;
/// Priority of everything left to the normal world.
const GICD_IPRIORITYR_DEF_VAL: u8 = 0xa0;
/// Every priority gets through the CPU interface.
const GIC_PRI_MASK: u32 = 0xff;

struct GicDistributor {
    registers: DistributorRegisters,
}

struct GicCpuInterface {
    registers: CpuInterfaceRegisters,
}

//--------------------------------------------------------------------------------------------------
// Public Definitions
//--------------------------------------------------------------------------------------------------

/// A secure interrupt, delivered as FIQ to EL3.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SecureInterrupt {
    pub id: usize,
    pub priority: u8,
}

pub struct GICv2 {
    gicd: NullLock<GicDistributor>,
    gicc: NullLock<GicCpuInterface>,
    secure_interrupts: &'static [SecureInterrupt],
}

//--------------------------------------------------------------------------------------------------
// Public Code
//--------------------------------------------------------------------------------------------------

impl SecureInterrupt {
    pub const fn new(id: usize) -> Self {
        Self {
            id,
            priority: GIC_HIGHEST_NS_PRIORITY,
        }
    }
}

impl GICv2 {
    pub const COMPATIBLE: &'static str = "arm,gic-400";

    /// Create an instance.
    ///
    /// # Safety
    ///
    /// - The user must ensure to provide correct MMIO start addresses.
    pub const unsafe fn new(
        gicd_base_addr: usize,
        gicc_base_addr: usize,
        secure_interrupts: &'static [SecureInterrupt],
    ) -> Self {
        Self {
            gicd: NullLock::new(GicDistributor {
                registers: DistributorRegisters::new(gicd_base_addr),
            }),
            gicc: NullLock::new(GicCpuInterface {
                registers: CpuInterfaceRegisters::new(gicc_base_addr),
            }),
            secure_interrupts,
        }
    }

    /// Global distributor setup: all SPIs to the normal world, then claim the secure ones.
    pub fn distributor_init(&self) {
        self.gicd
            .lock(|gicd| gicd.init_spis(self.secure_interrupts));
    }

    /// Banked SGI and PPI setup for the calling CPU.
    pub fn pcpu_distributor_init(&self) {
        self.gicd
            .lock(|gicd| gicd.init_sgis_and_ppis(self.secure_interrupts));
    }

    /// Let group 0 through this CPU's interface as FIQ.
    pub fn cpu_interface_enable(&self) {
        self.gicc.lock(|gicc| gicc.enable());
    }
}

//--------------------------------------------------------------------------------------------------
// Private Code
//--------------------------------------------------------------------------------------------------

impl GicDistributor {
    fn num_interrupts(&self) -> usize {
        let lines = self.registers.TYPER.read(GICD_TYPER::ITLinesNumber) as usize;
        // ITLinesNumber 31 would mean 1024, of which ids 1020+ are special.
        ((lines + 1) * 32).min(1020)
    }

    fn set_group0(&self, id: usize) {
        let reg = &self.registers.IGROUPR[id / 32];
        reg.set(reg.get() & !(1 << (id % 32)));
    }

    fn set_priority(&self, id: usize, priority: u8) {
        let reg = &self.registers.IPRIORITYR[id / 4];
        let shift = (id % 4) * 8;
        reg.set((reg.get() & !(0xff << shift)) | (u32::from(priority) << shift));
    }

    fn set_target_cpu0(&self, id: usize) {
        let reg = &self.registers.ITARGETSR[id / 4];
        let shift = (id % 4) * 8;
        reg.set((reg.get() & !(0xff << shift)) | (1 << shift));
    }

    fn enable(&self, id: usize) {
        // Write-one-to-set, zeroes are ignored.
        self.registers.ISENABLER[id / 32].set(1 << (id % 32));
    }

    fn claim_secure(&self, irq: &SecureInterrupt) {
        self.set_group0(irq.id);
        self.set_priority(irq.id, irq.priority);
        self.enable(irq.id);
    }

    fn init_spis(&self, secure: &[SecureInterrupt]) {
        self.registers.CTLR.set(0);

        let count = self.num_interrupts();
        for word in MIN_SPI_ID / 32..count.div_ceil(32) {
            self.registers.IGROUPR[word].set(u32::MAX);
        }
        for id in MIN_SPI_ID..count {
            self.set_priority(id, GICD_IPRIORITYR_DEF_VAL);
        }

        for irq in secure.iter().filter(|irq| (MIN_SPI_ID..count).contains(&irq.id)) {
            self.set_target_cpu0(irq.id);
            self.claim_secure(irq);
        }

        self.registers
            .CTLR
            .write(GICD_CTLR::EnableGrp0::SET + GICD_CTLR::EnableGrp1::SET);
    }

    fn init_sgis_and_ppis(&self, secure: &[SecureInterrupt]) {
        // Leave SGIs enabled, they cannot be disabled on a GIC-400 anyway.
        self.registers.ICENABLER[0].set(0xffff_0000);
        self.registers.IGROUPR[0].set(u32::MAX);
        for id in 0..MIN_SPI_ID {
            self.set_priority(id, GICD_IPRIORITYR_DEF_VAL);
        }

        for irq in secure.iter().filter(|irq| irq.id < MIN_SPI_ID) {
            self.claim_secure(irq);
        }
    }
}

impl GicCpuInterface {
    fn enable(&self) {
        self.registers.PMR.set(GIC_PRI_MASK);
        self.registers.CTLR.write(
            GICC_CTLR::EnableGrp0::SET
                + GICC_CTLR::FIQEn::SET
                + GICC_CTLR::FIQBypDisGrp0::SET
                + GICC_CTLR::IRQBypDisGrp0::SET
                + GICC_CTLR::FIQBypDisGrp1::SET
                + GICC_CTLR::IRQBypDisGrp1::SET,
        );
    }
}

//--------------------------------------------------------------------------------------------------
// OS Interface Code
//--------------------------------------------------------------------------------------------------

impl crate::drivers::interface::DeviceDriver for GICv2 {
    fn compatible(&self) -> &'static str {
        Self::COMPATIBLE
    }

    /// Distributor, this CPU's banked interrupts, then its CPU interface.
    unsafe fn init(&self) -> Result<(), &'static str> {
        self.distributor_init();
        self.pcpu_distributor_init();
        self.cpu_interface_enable();

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Testing
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            drivers::interface::DeviceDriver,
            platform::npcm845x::device_driver::fake_mmio::FakeMmio,
        },
    };

    const GICD_CTLR_OFF: usize = 0x000;
    const GICD_TYPER_OFF: usize = 0x004;
    const IGROUPR: usize = 0x080;
    const ISENABLER: usize = 0x100;
    const ICENABLER: usize = 0x180;
    const IPRIORITYR: usize = 0x400;
    const ITARGETSR: usize = 0x800;

    static SECURE: [SecureInterrupt; 3] = [
        SecureInterrupt::new(8),
        SecureInterrupt::new(15),
        SecureInterrupt::new(40),
    ];

    fn priority(gicd: &FakeMmio, id: usize) -> u32 {
        (gicd.get(IPRIORITYR + id / 4 * 4) >> ((id % 4) * 8)) & 0xff
    }

    fn init(gicd: &mut FakeMmio, gicc: &mut FakeMmio) {
        // 64 interrupt ids.
        gicd.set(GICD_TYPER_OFF, 1);
        let gic = unsafe { GICv2::new(gicd.base(), gicc.base(), &SECURE) };
        unsafe { gic.init() }.unwrap();
    }

    #[test]
    fn distributor_splits_groups() {
        let mut gicd = FakeMmio::new(0x1000);
        let mut gicc = FakeMmio::new(0x10);
        init(&mut gicd, &mut gicc);

        assert_eq!(gicd.get(GICD_CTLR_OFF), 0b11);
        // SGIs 8 and 15 secure, the rest of the bank non-secure.
        assert_eq!(gicd.get(IGROUPR), !((1 << 8) | (1 << 15)));
        // SPI 40 secure.
        assert_eq!(gicd.get(IGROUPR + 4), !(1 << 8));
        // Beyond the implemented lines nothing is written.
        assert_eq!(gicd.get(IGROUPR + 8), 0);

        // Set-enable is write-one-to-set, plain memory keeps the last write only.
        assert_eq!(gicd.get(ISENABLER), 1 << 15);
        assert_eq!(gicd.get(ISENABLER + 4), 1 << 8);
        assert_eq!(gicd.get(ICENABLER), 0xffff_0000);
    }

    #[test]
    fn priorities_and_targets() {
        let mut gicd = FakeMmio::new(0x1000);
        let mut gicc = FakeMmio::new(0x10);
        init(&mut gicd, &mut gicc);

        assert_eq!(priority(&gicd, 8), 0x80);
        assert_eq!(priority(&gicd, 9), 0xa0);
        assert_eq!(priority(&gicd, 40), 0x80);
        assert_eq!(priority(&gicd, 63), 0xa0);
        assert_eq!(priority(&gicd, 64), 0);

        // Byte 0 of ITARGETSR10 is SPI 40, routed to CPU0.
        assert_eq!(gicd.get(ITARGETSR + 40), 0x01);
    }

    #[test]
    fn cpu_interface_signals_fiq() {
        let mut gicd = FakeMmio::new(0x1000);
        let mut gicc = FakeMmio::new(0x10);
        init(&mut gicd, &mut gicc);

        assert_eq!(gicc.get(0x04), 0xff);
        assert_eq!(gicc.get(0x00), 0x1e9);
    }

    #[test]
    fn interrupt_count_caps_at_1020() {
        let mut gicd = FakeMmio::new(0x1000);
        gicd.set(GICD_TYPER_OFF, 31);
        let dist = GicDistributor {
            registers: unsafe { DistributorRegisters::new(gicd.base()) },
        };
        assert_eq!(dist.num_interrupts(), 1020);

        // The last, partial word of group bits still goes to group 1.
        dist.init_spis(&[]);
        assert_eq!(gicd.get(IGROUPR + 31 * 4), u32::MAX);
        assert_eq!(priority(&gicd, 1019), 0xa0);
    }
}
