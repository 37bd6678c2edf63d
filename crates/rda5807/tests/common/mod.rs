//! Shared fakes: a register-array model of the chip and a recording
//! regulator.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};
use rda5807::power::Regulator;
use rda5807::regs;

/// The one transport fault the fakes can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl embedded_hal::i2c::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Behavioral model of the tuner's register file. A scripted seek
/// completes after `seek_countdown` reads of the result register; writes
/// to `fail_write_reg` raise a [`BusFault`].
pub struct Chip {
    pub regs: [u16; regs::NUM_REGISTERS],
    pub writes: Vec<(u8, u16)>,
    pub seek_countdown: Option<u16>,
    pub seek_result: u16,
    pub fail_write_reg: Option<u8>,
}

impl Chip {
    pub fn new() -> Self {
        let mut regs_arr = [0u16; regs::NUM_REGISTERS];
        for &(reg, val) in regs::REG_DEFAULTS {
            regs_arr[reg as usize] = val;
        }
        Self {
            regs: regs_arr,
            writes: Vec::new(),
            seek_countdown: None,
            seek_result: 0,
            fail_write_reg: None,
        }
    }
}

/// I²C endpoint for a shared [`Chip`]. Clones talk to the same model so
/// tests keep a handle while the driver owns the bus.
#[derive(Clone)]
pub struct ChipHandle(pub Rc<RefCell<Chip>>);

impl ChipHandle {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Chip::new())))
    }

    pub fn reg(&self, reg: u8) -> u16 {
        self.0.borrow().regs[reg as usize]
    }

    pub fn set_reg(&self, reg: u8, value: u16) {
        self.0.borrow_mut().regs[reg as usize] = value;
    }

    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.0.borrow().writes.clone()
    }

    pub fn script_seek(&self, reads_until_complete: u16, result: u16) {
        let mut chip = self.0.borrow_mut();
        chip.seek_countdown = Some(reads_until_complete);
        chip.seek_result = result;
    }

    /// Make writes to `reg` fail until cleared with `None`.
    pub fn fail_writes_to(&self, reg: Option<u8>) {
        self.0.borrow_mut().fail_write_reg = reg;
    }
}

impl ErrorType for ChipHandle {
    type Error = BusFault;
}

impl I2c for ChipHandle {
    fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        let mut reg = 0u8;
        for op in operations.iter_mut() {
            match op {
                Operation::Write(data) => {
                    reg = data[0];
                    if let [_, hi, lo] = data {
                        if chip.fail_write_reg == Some(reg) {
                            return Err(BusFault);
                        }
                        let value = u16::from_be_bytes([*hi, *lo]);
                        chip.regs[reg as usize] = value;
                        chip.writes.push((reg, value));
                    }
                }
                Operation::Read(buf) => {
                    if reg == regs::REG_SEEKRES {
                        if let Some(n) = chip.seek_countdown {
                            if n == 0 {
                                let result = chip.seek_result;
                                chip.regs[regs::REG_SEEKRES as usize] = result;
                                chip.seek_countdown = None;
                            } else {
                                chip.seek_countdown = Some(n - 1);
                            }
                        }
                    }
                    buf.copy_from_slice(&chip.regs[reg as usize].to_be_bytes());
                }
            }
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct FakeRegulator {
    pub enabled: Rc<RefCell<bool>>,
    pub enable_count: Rc<RefCell<u32>>,
}

impl FakeRegulator {
    pub fn new() -> Self {
        Self {
            enabled: Rc::new(RefCell::new(false)),
            enable_count: Rc::new(RefCell::new(0)),
        }
    }

    pub fn is_enabled(&self) -> bool {
        *self.enabled.borrow()
    }
}

impl Regulator for FakeRegulator {
    type Error = BusFault;

    fn enable(&mut self) -> Result<(), Self::Error> {
        *self.enabled.borrow_mut() = true;
        *self.enable_count.borrow_mut() += 1;
        Ok(())
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        *self.enabled.borrow_mut() = false;
        Ok(())
    }
}
