//! Typed facade over a block of 32-bit memory-mapped registers.
//!
//! The [`MmioBus`] trait is the hardware seam: on a real SoC it is a thin
//! volatile-pointer wrapper over the ioremapped register block, in host
//! tests it is a register-array fake. [`RegisterWindow`] layers the driver
//! conveniences on top: read-modify-write, bit set/clear, and a bounded or
//! unbounded poll loop with a configurable cadence.

// Register arithmetic below is all masked shifts on u32 values whose ranges
// are fixed by the hardware layout; offsets are validated against the window
// before use.
#![allow(clippy::arithmetic_side_effects)]

use embedded_hal_async::delay::DelayNs;

use crate::error::Error;

/// Raw access to a 32-bit, byte-addressed register block.
pub trait MmioBus {
    /// Transport error type (a bus fault on exotic interconnects;
    /// `core::convert::Infallible` for plain pointer-backed windows).
    type Error: core::fmt::Debug;

    /// Read the 32-bit register at `offset` (byte offset from the window
    /// base).
    fn read(&mut self, offset: u32) -> Result<u32, Self::Error>;

    /// Write the 32-bit register at `offset`.
    fn write(&mut self, offset: u32, value: u32) -> Result<(), Self::Error>;
}

/// Static description of a register window.
pub struct MmioConfig {
    /// Highest valid register offset (inclusive).
    pub max_offset: u32,
    /// Returns `false` for offsets that must never be written (hardware
    /// status mirrors, descriptor read-back registers).
    pub writeable: fn(u32) -> bool,
}

/// A register window with driver-level helpers and a read-only table.
pub struct RegisterWindow<B> {
    bus: B,
    cfg: MmioConfig,
}

impl<B: MmioBus> RegisterWindow<B> {
    /// Wrap `bus` with the access rules in `cfg`.
    pub fn new(bus: B, cfg: MmioConfig) -> Self {
        Self { bus, cfg }
    }

    fn check_offset(&self, offset: u32) -> Result<(), Error<B::Error>> {
        if offset > self.cfg.max_offset || offset % 4 != 0 {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    /// Read a register.
    pub fn read(&mut self, offset: u32) -> Result<u32, Error<B::Error>> {
        self.check_offset(offset)?;
        self.bus.read(offset).map_err(Error::Transport)
    }

    /// Write a register. Writes to offsets the window declares read-only
    /// are rejected with [`Error::InvalidArgument`].
    pub fn write(&mut self, offset: u32, value: u32) -> Result<(), Error<B::Error>> {
        self.check_offset(offset)?;
        if !(self.cfg.writeable)(offset) {
            return Err(Error::InvalidArgument);
        }
        self.bus.write(offset, value).map_err(Error::Transport)
    }

    /// Read-modify-write the bits selected by `mask`. The hardware write is
    /// skipped when the register already holds the requested value.
    pub fn update_bits(
        &mut self,
        offset: u32,
        mask: u32,
        value: u32,
    ) -> Result<(), Error<B::Error>> {
        let old = self.read(offset)?;
        let new = (old & !mask) | (value & mask);
        if new != old {
            self.write(offset, new)?;
        }
        Ok(())
    }

    /// Set the bits in `mask`.
    pub fn set_bits(&mut self, offset: u32, mask: u32) -> Result<(), Error<B::Error>> {
        self.update_bits(offset, mask, mask)
    }

    /// Clear the bits in `mask`.
    pub fn clear_bits(&mut self, offset: u32, mask: u32) -> Result<(), Error<B::Error>> {
        self.update_bits(offset, mask, 0)
    }

    /// Poll `offset` every `interval_us` microseconds until `done` returns
    /// true, yielding the register value that satisfied it.
    ///
    /// With `max_polls == Some(n)` the wait is bounded and returns
    /// [`Error::TimedOut`] after `n` unsuccessful reads. `None` polls
    /// forever — reserved for states the hardware guarantees to reach.
    pub async fn poll_until<D: DelayNs>(
        &mut self,
        delay: &mut D,
        offset: u32,
        interval_us: u32,
        max_polls: Option<u32>,
        mut done: impl FnMut(u32) -> bool,
    ) -> Result<u32, Error<B::Error>> {
        let mut polls = 0u32;
        loop {
            let value = self.read(offset)?;
            if done(value) {
                return Ok(value);
            }
            if let Some(max) = max_polls {
                polls += 1;
                if polls >= max {
                    return Err(Error::TimedOut);
                }
            }
            delay.delay_us(interval_us).await;
        }
    }
}
