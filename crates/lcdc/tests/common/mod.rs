//! Shared fakes: a register-array bus, a recording clock, and a recording
//! DMA channel.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use lcdc::clock::Clock;
use lcdc::slcd::{DmaSlaveConfig, SlcdDma};
use lcdc::{
    BusFlags, BusFormat, ConnectorKind, ConnectorState, CrtcState, DisplayMode, PixelFormat,
    PlaneState,
};
use regmap::MmioBus;

pub const NREGS: usize = 48;

/// Register-array model of the controller block. Clones share the storage
/// so tests can inspect and seed registers while the driver owns the bus.
#[derive(Clone)]
pub struct FakeBus {
    regs: Rc<RefCell<[u32; NREGS]>>,
    sticky_state: Rc<RefCell<u32>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self {
            regs: Rc::new(RefCell::new([0; NREGS])),
            sticky_state: Rc::new(RefCell::new(0)),
        }
    }

    pub fn get(&self, offset: u32) -> u32 {
        self.regs.borrow()[offset as usize / 4]
    }

    pub fn set(&self, offset: u32, value: u32) {
        self.regs.borrow_mut()[offset as usize / 4] = value;
    }

    /// Model hardware re-raising STATE bits each frame: reads of STATE
    /// always show `mask` set, regardless of acknowledgement writes.
    pub fn stick_state_bits(&self, mask: u32) {
        *self.sticky_state.borrow_mut() = mask;
    }
}

impl MmioBus for FakeBus {
    type Error = Infallible;

    fn read(&mut self, offset: u32) -> Result<u32, Self::Error> {
        let mut value = self.regs.borrow()[offset as usize / 4];
        if offset == lcdc::regs::REG_STATE {
            value |= *self.sticky_state.borrow();
        }
        Ok(value)
    }

    fn write(&mut self, offset: u32, value: u32) -> Result<(), Self::Error> {
        self.regs.borrow_mut()[offset as usize / 4] = value;
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeClock {
    pub rate: Rc<RefCell<u32>>,
    pub enabled: Rc<RefCell<bool>>,
    pub parent_rate: u32,
    pub set_rates: Rc<RefCell<Vec<u32>>>,
}

impl FakeClock {
    pub fn new(parent_rate: u32) -> Self {
        Self {
            rate: Rc::new(RefCell::new(0)),
            enabled: Rc::new(RefCell::new(false)),
            parent_rate,
            set_rates: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl Clock for FakeClock {
    type Error = Infallible;

    fn prepare_enable(&mut self) -> Result<(), Self::Error> {
        *self.enabled.borrow_mut() = true;
        Ok(())
    }

    fn disable_unprepare(&mut self) {
        *self.enabled.borrow_mut() = false;
    }

    fn rate(&self) -> u32 {
        *self.rate.borrow()
    }

    fn parent_rate(&self) -> u32 {
        self.parent_rate
    }

    fn round_rate(&self, rate: u32) -> Result<u32, Self::Error> {
        Ok(rate)
    }

    fn set_rate(&mut self, rate: u32) -> Result<(), Self::Error> {
        *self.rate.borrow_mut() = rate;
        self.set_rates.borrow_mut().push(rate);
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeDma {
    pub config: Rc<RefCell<Option<DmaSlaveConfig>>>,
    pub pushes: Rc<RefCell<Vec<(u32, u32)>>>,
}

impl FakeDma {
    pub fn new() -> Self {
        Self {
            config: Rc::new(RefCell::new(None)),
            pushes: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl SlcdDma for FakeDma {
    type Error = Infallible;

    fn slave_config(&mut self, config: &DmaSlaveConfig) -> Result<(), Self::Error> {
        *self.config.borrow_mut() = Some(*config);
        Ok(())
    }

    async fn push(&mut self, src_phys: u32, len_bytes: u32) -> Result<(), Self::Error> {
        self.pushes.borrow_mut().push((src_phys, len_bytes));
        Ok(())
    }
}

pub const BASE_PHYS: u32 = 0x1305_0000;
pub const DESC_PHYS: u32 = 0x0080_0000;
pub const FB_PHYS: u32 = 0x0100_0000;

/// 640x480@60, the standard VGA timing.
pub fn vga_mode() -> DisplayMode {
    DisplayMode {
        clock_khz: 25_175,
        hdisplay: 640,
        hsync_start: 656,
        hsync_end: 752,
        htotal: 800,
        vdisplay: 480,
        vsync_start: 490,
        vsync_end: 492,
        vtotal: 525,
        vrefresh: 60,
        nhsync: true,
        nvsync: true,
        interlace: false,
    }
}

pub fn modeset_state(mode: DisplayMode) -> CrtcState {
    CrtcState {
        mode,
        mode_changed: true,
        active: true,
        event: None,
    }
}

pub fn plane(format: PixelFormat) -> PlaneState {
    PlaneState {
        fb_phys: FB_PHYS,
        width: 640,
        height: 480,
        format,
    }
}

pub fn dpi_connector(formats: &[BusFormat]) -> ConnectorState<'_> {
    ConnectorState {
        kind: ConnectorKind::Dpi,
        bus_formats: formats,
        bus_flags: BusFlags::default(),
    }
}
