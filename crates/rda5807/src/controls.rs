//! Audio controls: mute, volume, de-emphasis.

use embedded_hal::i2c::I2c;
use embedded_hal_async::delay::DelayNs;
use regmap::Error;

use crate::power::Regulator;
use crate::{regs, Rda5807};

/// De-emphasis time constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Deemphasis {
    /// No de-emphasis.
    Disabled,
    /// 50 µs, used in most of the world.
    Us50,
    /// 75 µs, used in the Americas and South Korea.
    Us75,
}

impl<I2C, R, DL> Rda5807<I2C, R, DL>
where
    I2C: I2c,
    R: Regulator<Error = I2C::Error>,
    DL: DelayNs,
{
    /// Mute or unmute the audio output.
    ///
    /// The mute state doubles as the receiver's usage signal: unmuting takes
    /// a power reference (resuming the chip if needed), muting releases it
    /// so the receiver can autosuspend.
    pub async fn set_mute(&mut self, mute: bool) -> Result<(), Error<I2C::Error>> {
        if self.unmuted == !mute {
            return Ok(());
        }

        if mute {
            self.pm_put_autosuspend();
        } else {
            self.pm_get().await?;
        }

        self.map.update_bits(
            regs::REG_CTRL,
            regs::CTRL_DMUTE,
            if mute { 0 } else { regs::CTRL_DMUTE },
        )?;
        self.unmuted = !mute;
        Ok(())
    }

    /// Set the output volume, 0 (softest) to 15.
    pub fn set_volume(&mut self, volume: u8) -> Result<(), Error<I2C::Error>> {
        if volume > 15 {
            return Err(Error::InvalidArgument);
        }
        self.map
            .update_bits(regs::REG_INPUT, regs::INPUT_VOLUME, u16::from(volume))
    }

    /// Select the de-emphasis time constant. The hardware only distinguishes
    /// 50 µs from everything else.
    pub fn set_deemphasis(&mut self, deemphasis: Deemphasis) -> Result<(), Error<I2C::Error>> {
        match deemphasis {
            Deemphasis::Us50 => self.map.set_bits(regs::REG_IOCFG, regs::IOCFG_DEEMPHASIS),
            Deemphasis::Disabled | Deemphasis::Us75 => self
                .map
                .clear_bits(regs::REG_IOCFG, regs::IOCFG_DEEMPHASIS),
        }
    }
}
