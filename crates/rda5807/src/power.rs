//! Power states and runtime power management.
//!
//! The receiver is kept unpowered whenever nothing needs it. Suspending
//! flips the register map into cache-only mode with everything marked dirty,
//! so configuration keeps accumulating in the shadow; resuming powers the
//! supply, soft-resets the chip and replays the shadow before re-enabling
//! reception.

use embassy_time::{Duration, Instant};
use embedded_hal::i2c::I2c;
use embedded_hal_async::delay::DelayNs;
use regmap::Error;

use crate::{regs, Rda5807};

/// A switchable power supply.
pub trait Regulator {
    /// Platform fault type.
    type Error: core::fmt::Debug;

    /// Switch the supply on.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Switch the supply off.
    fn disable(&mut self) -> Result<(), Self::Error>;
}

/// Idle time before an unused receiver is powered down.
pub const AUTOSUSPEND_DELAY_MS: u64 = 5_000;

/// The registers are not accessible right after power-on.
const POWER_ON_SETTLE_MS: u32 = 20;

/// Hold time for the soft-reset strobe.
const SOFTRESET_HOLD_US: u32 = 1_000;

/// Usage counting and the autosuspend clock.
#[derive(Debug)]
pub(crate) struct RuntimePm {
    pub usage: u32,
    pub active: bool,
    pub last_busy: Instant,
    pub autosuspend: Duration,
}

impl RuntimePm {
    pub(crate) fn new() -> Self {
        Self {
            usage: 0,
            active: false,
            last_busy: Instant::now(),
            autosuspend: Duration::from_millis(AUTOSUSPEND_DELAY_MS),
        }
    }
}

impl<I2C, R, DL> Rda5807<I2C, R, DL>
where
    I2C: I2c,
    R: Regulator<Error = I2C::Error>,
    DL: DelayNs,
{
    pub(crate) async fn power_on_supply(&mut self) -> Result<(), Error<I2C::Error>> {
        self.supply.enable().map_err(Error::Transport)?;
        self.delay.delay_ms(POWER_ON_SETTLE_MS).await;
        Ok(())
    }

    /// Power the receiver down, keeping its configuration in the shadow.
    pub(crate) fn suspend(&mut self) -> Result<(), Error<I2C::Error>> {
        self.map.clear_bits(regs::REG_CTRL, regs::CTRL_ENABLE)?;
        self.map.set_cache_only(true);
        self.map.mark_dirty_all();
        self.supply.disable().map_err(Error::Transport)?;
        self.pm.active = false;
        Ok(())
    }

    async fn reset_chip(&mut self) -> Result<(), Error<I2C::Error>> {
        self.map
            .pulse(&mut self.delay, regs::REG_CTRL, regs::CTRL_SOFTRESET, SOFTRESET_HOLD_US)
            .await
    }

    /// Unwind a partial power-up: drop ENABLE if it reached the chip, fall
    /// back to the suspended cache state with everything re-marked dirty so
    /// the next resume replays the full configuration, and cut the supply.
    fn unwind_failed_resume(&mut self, chip_enabled: bool) {
        if chip_enabled {
            let _ = self.map.clear_bits(regs::REG_CTRL, regs::CTRL_ENABLE);
        }
        self.map.set_cache_only(true);
        self.map.mark_dirty_all();
        let _ = self.supply.disable();
    }

    /// Power the receiver up and restore its configuration. Any failure
    /// leaves the receiver exactly as suspended: cache-only, supply off.
    pub(crate) async fn resume(&mut self) -> Result<(), Error<I2C::Error>> {
        self.power_on_supply().await?;
        self.map.set_cache_only(false);

        if let Err(err) = self.reset_chip().await {
            self.unwind_failed_resume(false);
            return Err(err);
        }
        if let Err(err) = self.map.sync() {
            self.unwind_failed_resume(false);
            return Err(err);
        }
        if let Err(err) = self.map.set_bits(regs::REG_CTRL, regs::CTRL_ENABLE) {
            self.unwind_failed_resume(false);
            return Err(err);
        }
        // Re-tune to wherever the channel register points.
        if let Err(err) = self
            .map
            .write_bits(regs::REG_CHAN, regs::CHAN_TUNE, regs::CHAN_TUNE)
        {
            self.unwind_failed_resume(true);
            return Err(err);
        }

        self.pm.active = true;
        Ok(())
    }

    /// Take a usage reference, powering the receiver up if it was down.
    /// The reference is dropped again when the resume fails.
    pub(crate) async fn pm_get(&mut self) -> Result<(), Error<I2C::Error>> {
        self.pm.usage = self.pm.usage.saturating_add(1);
        if !self.pm.active {
            if let Err(err) = self.resume().await {
                self.pm.usage = self.pm.usage.saturating_sub(1);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Take a usage reference only when the receiver is already powered.
    pub(crate) fn pm_get_if_active(&mut self) -> bool {
        if self.pm.active {
            self.pm.usage = self.pm.usage.saturating_add(1);
            true
        } else {
            false
        }
    }

    /// Drop a usage reference and restart the autosuspend clock. The actual
    /// power-down happens later, from [`Self::runtime_idle`].
    pub(crate) fn pm_put_autosuspend(&mut self) {
        self.pm.last_busy = Instant::now();
        self.pm.usage = self.pm.usage.saturating_sub(1);
    }

    /// Whether the receiver is currently powered.
    pub fn is_powered(&self) -> bool {
        self.pm.active
    }

    /// Periodic idle hook: powers the receiver down once it has been unused
    /// for the autosuspend delay. Returns whether a suspend happened.
    pub fn runtime_idle(&mut self) -> Result<bool, Error<I2C::Error>> {
        if self.pm.usage == 0
            && self.pm.active
            && Instant::now().duration_since(self.pm.last_busy) >= self.pm.autosuspend
        {
            self.suspend()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Unconditional power-down, for driver teardown.
    pub fn force_suspend(&mut self) -> Result<(), Error<I2C::Error>> {
        if self.pm.active {
            self.suspend()?;
        }
        Ok(())
    }
}
