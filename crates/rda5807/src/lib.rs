//! Driver core for the RDA5807 FM receiver.
//!
//! The chip sits on I²C behind a shadowed register map ([`regmap`]), so its
//! configuration survives power-down: while suspended every write lands in
//! the cache, and the resume path soft-resets the chip and replays the
//! shadow. Covered here: probe with chip-ID gate, input/output wiring from
//! [`Config`], mute/volume/de-emphasis controls, direct tuning, hardware
//! seek, reception status, and runtime power management with autosuspend.

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::doc_markdown)] // register names and hex addresses in docs
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)]

pub mod bands;
pub mod controls;
pub mod power;
pub mod regs;
pub mod tune;

pub use controls::Deemphasis;
pub use power::{Regulator, AUTOSUSPEND_DELAY_MS};
pub use regmap::Error;
pub use tune::{SeekRange, TunerStatus};

use embedded_hal::i2c::I2c;
use embedded_hal_async::delay::DelayNs;
use power::RuntimePm;
use regmap::I2cRegmap;

/// Driver name, as reported to enumeration interfaces.
pub const DRIVER_NAME: &str = "rda5807";
/// Human-readable device name.
pub const CARD_NAME: &str = "RDA5807 FM receiver";

/// Board wiring, from the platform's device description.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// The antenna is connected to the LNAN input.
    pub lnan: bool,
    /// The antenna is connected to the LNAP input.
    pub lnap: bool,
    /// LNA working current in µA: 1800, 2100, 2500 or 3000.
    pub lna_microamp: u32,
    /// Enable the I²S digital audio output.
    pub i2s_out: bool,
    /// Drive the analog audio output.
    pub analog_out: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lnan: false,
            lnap: true,
            lna_microamp: 2500,
            i2s_out: false,
            analog_out: true,
        }
    }
}

const LNA_CURRENTS_UA: [u32; 4] = [1800, 2100, 2500, 3000];

/// The RDA5807 FM receiver.
pub struct Rda5807<I2C, R, DL> {
    pub(crate) map: I2cRegmap<I2C, { regs::NUM_REGISTERS }>,
    pub(crate) supply: R,
    pub(crate) delay: DL,
    pub(crate) band: Option<&'static bands::Band>,
    pub(crate) unmuted: bool,
    pub(crate) pm: RuntimePm,
}

impl<I2C, R, DL> Rda5807<I2C, R, DL>
where
    I2C: I2c,
    R: Regulator<Error = I2C::Error>,
    DL: DelayNs,
{
    /// Probe the chip and prepare it for use.
    ///
    /// Powers the supply just long enough to read the chip ID past the
    /// cache; anything not in the 0x58xx family is [`Error::NoSuchDevice`].
    /// The receiver is left unpowered and muted, with the board wiring and
    /// the control defaults (volume 8, 50 µs de-emphasis) staged in the
    /// shadow for the first resume.
    pub async fn probe(
        i2c: I2C,
        supply: R,
        delay: DL,
        config: &Config,
    ) -> Result<Self, Error<I2C::Error>> {
        let map = I2cRegmap::new(i2c, regs::I2C_ADDR, regs::REGMAP_CONFIG);
        let mut radio = Self {
            map,
            supply,
            delay,
            band: None,
            unmuted: false,
            pm: RuntimePm::new(),
        };

        radio.power_on_supply().await?;
        radio.map.set_bypass(true);
        let chipid = radio.map.read(regs::REG_CHIPID);
        radio.map.set_bypass(false);
        radio.supply.disable().map_err(Error::Transport)?;

        let chipid = chipid?;
        if chipid & 0xFF00 != 0x5800 {
            #[cfg(feature = "defmt")]
            defmt::error!("chip ID mismatch: expected 58xx, got {=u16:04X}", chipid);
            return Err(Error::NoSuchDevice);
        }

        // From here on the shadow is authoritative until the first resume.
        radio.map.set_cache_only(true);
        radio.map.mark_dirty_all();

        radio.setup(config)?;
        radio.set_volume(8)?;
        radio.set_deemphasis(Deemphasis::Us50)?;

        Ok(radio)
    }

    // Field packing: values are bounded by the tables they come from.
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    fn setup(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let mut lna: u16 = 0;
        if config.lnan {
            lna |= 0x1;
        }
        if config.lnap {
            lna |= 0x2;
        }
        #[cfg(feature = "defmt")]
        if lna == 0 {
            defmt::warn!("both LNA inputs disabled");
        }

        let icsel = LNA_CURRENTS_UA
            .iter()
            .position(|&ua| ua == config.lna_microamp)
            .ok_or(Error::InvalidArgument)?;

        self.map.update_bits(
            regs::REG_INPUT,
            regs::INPUT_LNA_ICSEL | regs::INPUT_LNA_PORT,
            (icsel as u16) << regs::INPUT_LNA_ICSEL_SHIFT | lna << regs::INPUT_LNA_PORT_SHIFT,
        )?;

        let mut iocfg: u16 = 0;
        if config.i2s_out {
            iocfg |= regs::IOCFG_I2S_EN;
        }
        self.map.write(regs::REG_IOCFG, iocfg)?;

        let mut ctrl: u16 = 0;
        if config.analog_out {
            ctrl |= regs::CTRL_DHIZ;
        }
        self.map.write(regs::REG_CTRL, ctrl)?;

        Ok(())
    }

    /// Whether the audio output is unmuted.
    pub fn is_unmuted(&self) -> bool {
        self.unmuted
    }
}
