//! Tuning: direct frequency selection, hardware seek, and tuner status.

// Field values are masked to their register fields before narrowing.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::arithmetic_side_effects)]

use embedded_hal::i2c::I2c;
use embedded_hal_async::delay::DelayNs;
use regmap::Error;

use crate::bands::{self, Band};
use crate::power::Regulator;
use crate::{regs, Rda5807};

/// The programming guide asks for 35 ms of settling per tested frequency.
const SEEK_STEP_MS: u32 = 35;

/// Seek parameters.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SeekRange {
    /// Lower edge of the range to search, in 1/16 kHz.
    pub low: u32,
    /// Upper edge of the range to search, in 1/16 kHz.
    pub high: u32,
    /// Channel spacing in Hz: 25, 50, 100 or 200 kHz.
    pub spacing_hz: u32,
    /// Search towards higher frequencies.
    pub upward: bool,
    /// Wrap around at the band limit instead of stopping.
    pub wrap_around: bool,
}

/// Reception report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TunerStatus {
    /// Signal strength, 0-127. Zero when the receiver is powered down.
    pub rssi: u8,
    /// Whether a stereo pilot is received; `None` while the result is not
    /// trustworthy (seek in flight, failed, or receiver powered down).
    pub stereo: Option<bool>,
}

fn spacing_code(spacing_hz: u32) -> Option<u16> {
    match spacing_hz {
        25_000 => Some(0x3),
        50_000 => Some(0x2),
        100_000 => Some(0x0),
        200_000 => Some(0x1),
        _ => None,
    }
}

impl<I2C, R, DL> Rda5807<I2C, R, DL>
where
    I2C: I2c,
    R: Regulator<Error = I2C::Error>,
    DL: DelayNs,
{
    fn set_band(&mut self, band: &'static Band) -> Result<(), Error<I2C::Error>> {
        if band.index == bands::BAND_EAST_EUROPE {
            self.map.set_bits(regs::REG_BAND, regs::BAND_65M_BAND)?;
        } else {
            self.map.clear_bits(regs::REG_BAND, regs::BAND_65M_BAND)?;
        }

        let code: u16 = if band.index == bands::BAND_WORLDWIDE { 2 } else { 3 };
        self.map.update_bits(
            regs::REG_CHAN,
            regs::CHAN_BAND,
            code << regs::CHAN_BAND_SHIFT,
        )?;

        self.band = Some(band);
        Ok(())
    }

    /// Tune to `frequency` (1/16 kHz units).
    ///
    /// The band and channel registers are always updated, so a powered-down
    /// receiver picks the frequency up on its next resume; the tune strobe
    /// itself is only sent while powered.
    pub fn set_frequency(&mut self, frequency: u32) -> Result<(), Error<I2C::Error>> {
        let band = bands::band_for(frequency, frequency).ok_or(Error::OutOfRange)?;
        self.set_band(band)?;

        // 25 kHz spacing, and the channel in the same update.
        let chan = ((frequency + 200) / 400) & 0x3FF;
        self.map.update_bits(
            regs::REG_CHAN,
            regs::CHAN_SPACE | regs::CHAN_WRCHAN,
            0x3 | ((chan as u16) << regs::CHAN_WRCHAN_SHIFT),
        )?;

        if self.pm_get_if_active() {
            let strobed = self
                .map
                .write_bits(regs::REG_CHAN, regs::CHAN_TUNE, regs::CHAN_TUNE);
            self.pm_put_autosuspend();
            strobed?;
        }
        Ok(())
    }

    /// Frequency the tuner settled on, in 1/16 kHz. Needs a prior tune or
    /// seek to know which band the channel readback is relative to.
    pub fn frequency(&mut self) -> Result<u32, Error<I2C::Error>> {
        let band = self.band.ok_or(Error::InvalidArgument)?;
        let val = self.map.read(regs::REG_SEEKRES)?;
        Ok(400 * u32::from(val & regs::SEEKRES_READCHAN) + band.low)
    }

    /// Let the hardware search `range` for a station. Blocks (asynchronously)
    /// for up to 35 ms per candidate frequency; an exhausted range is
    /// [`Error::TimedOut`]. The seek strobe is cleared on every exit path.
    pub async fn seek(&mut self, range: &SeekRange) -> Result<(), Error<I2C::Error>> {
        let space = spacing_code(range.spacing_hz).ok_or(Error::InvalidArgument)?;
        let band = bands::band_for(range.low, range.high).ok_or(Error::OutOfRange)?;

        self.pm_get().await?;
        let result = self.seek_powered(range, band, space).await;
        self.pm_put_autosuspend();
        result
    }

    async fn seek_powered(
        &mut self,
        range: &SeekRange,
        band: &'static Band,
        space: u16,
    ) -> Result<(), Error<I2C::Error>> {
        self.map
            .update_bits(regs::REG_CHAN, regs::CHAN_SPACE, space)?;
        self.set_band(band)?;

        let mut cmd = regs::CTRL_SEEK;
        if range.upward {
            cmd |= regs::CTRL_SEEKUP;
        }
        if !range.wrap_around {
            cmd |= regs::CTRL_SKMODE;
        }
        self.map.update_bits(
            regs::REG_CTRL,
            regs::CTRL_SEEKUP | regs::CTRL_SKMODE | regs::CTRL_SEEK,
            cmd,
        )?;

        let increment = range.spacing_hz * 16 / 1000;
        let mut freq = range.low;
        let mut outcome: Result<bool, Error<I2C::Error>> = Ok(false);
        while freq <= range.high {
            self.delay.delay_ms(SEEK_STEP_MS).await;
            match self.map.read(regs::REG_SEEKRES) {
                Ok(res) if res & regs::SEEKRES_COMPLETE != 0 => {
                    outcome = Ok(true);
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
            freq += increment;
        }

        let cleared = self.map.clear_bits(regs::REG_CTRL, regs::CTRL_SEEK);
        match outcome {
            Ok(true) => cleared,
            Ok(false) => {
                cleared?;
                Err(Error::TimedOut)
            }
            Err(err) => Err(err),
        }
    }

    /// Report signal strength and the mono/stereo decision. A powered-down
    /// receiver reports silence rather than waking up.
    pub fn status(&mut self) -> Result<TunerStatus, Error<I2C::Error>> {
        if !self.pm_get_if_active() {
            return Ok(TunerStatus {
                rssi: 0,
                stereo: None,
            });
        }

        let seekres = self.map.read(regs::REG_SEEKRES);
        let signal = self.map.read(regs::REG_SIGNAL);
        self.pm_put_autosuspend();
        let (seekres, signal) = (seekres?, signal?);

        let stereo = if seekres & regs::SEEKRES_COMPLETE != 0 && seekres & regs::SEEKRES_FAIL == 0
        {
            Some(seekres & regs::SEEKRES_STEREO != 0)
        } else {
            None
        };
        Ok(TunerStatus {
            rssi: ((signal & regs::SIGNAL_RSSI) >> regs::SIGNAL_RSSI_SHIFT) as u8,
            stereo,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_map_matches_the_channel_field_encoding() {
        assert_eq!(spacing_code(25_000), Some(0x3));
        assert_eq!(spacing_code(50_000), Some(0x2));
        assert_eq!(spacing_code(100_000), Some(0x0));
        assert_eq!(spacing_code(200_000), Some(0x1));
        assert_eq!(spacing_code(75_000), None);
    }

    #[test]
    fn channel_rounds_to_the_nearest_25_khz_step() {
        // 101.5 MHz in 1/16 kHz.
        assert_eq!((1_624_000 + 200) / 400, 4060);
        // The channel field keeps the low ten bits.
        assert_eq!(((1_624_000 + 200) / 400) & 0x3FF, 988);
    }
}
