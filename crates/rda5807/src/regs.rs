//! RDA5807 register layout: 16-bit big-endian registers behind 8-bit
//! addresses, I²C address 0x11.

use regmap::RegmapConfig;

/// 7-bit I²C address of the random-access register interface.
pub const I2C_ADDR: u8 = 0x11;

/// Chip identification, read-only.
pub const REG_CHIPID: u8 = 0x00;
/// Main control register.
pub const REG_CTRL: u8 = 0x02;
/// Channel select and tune strobe.
pub const REG_CHAN: u8 = 0x03;
/// I/O configuration.
pub const REG_IOCFG: u8 = 0x04;
/// Input path: LNA selection and volume.
pub const REG_INPUT: u8 = 0x05;
/// Band options.
pub const REG_BAND: u8 = 0x07;
/// Seek/tune result, volatile.
pub const REG_SEEKRES: u8 = 0x0A;
/// Signal quality, volatile. Highest register.
pub const REG_SIGNAL: u8 = 0x0B;

/// Shadow size: `REG_SIGNAL + 1` entries.
pub const NUM_REGISTERS: usize = 12;

/// Audio output high-Z disable (drive the analog output).
pub const CTRL_DHIZ: u16 = 1 << 15;
/// Mute disable.
pub const CTRL_DMUTE: u16 = 1 << 14;
/// Forced mono.
pub const CTRL_MONO: u16 = 1 << 13;
/// Bass boost.
pub const CTRL_BASS: u16 = 1 << 12;
/// Seek towards higher frequencies.
pub const CTRL_SEEKUP: u16 = 1 << 9;
/// Seek strobe, cleared by hardware when the seek ends.
pub const CTRL_SEEK: u16 = 1 << 8;
/// Stop seeking at the band limit instead of wrapping.
pub const CTRL_SKMODE: u16 = 1 << 7;
/// Clock mode field.
pub const CTRL_CLKMODE: u16 = 0x7 << 4;
/// Soft reset, self-clearing.
pub const CTRL_SOFTRESET: u16 = 1 << 1;
/// Power the receiver up.
pub const CTRL_ENABLE: u16 = 1 << 0;

/// Channel number, in spacing units above the band edge.
pub const CHAN_WRCHAN: u16 = 0x3FF << 6;
/// Shift of the channel field.
pub const CHAN_WRCHAN_SHIFT: u16 = 6;
/// Tune strobe, cleared by hardware when the tune completes.
pub const CHAN_TUNE: u16 = 1 << 4;
/// Band select field.
pub const CHAN_BAND: u16 = 0x3 << 2;
/// Shift of the band field.
pub const CHAN_BAND_SHIFT: u16 = 2;
/// Channel spacing field.
pub const CHAN_SPACE: u16 = 0x3;

/// 50 µs de-emphasis (cleared: 75 µs or none).
pub const IOCFG_DEEMPHASIS: u16 = 1 << 11;
/// Enable the I²S digital output.
pub const IOCFG_I2S_EN: u16 = 1 << 6;

/// LNA input port select.
pub const INPUT_LNA_PORT: u16 = 0x3 << 6;
/// Shift of the LNA port field.
pub const INPUT_LNA_PORT_SHIFT: u16 = 6;
/// LNA working-current select.
pub const INPUT_LNA_ICSEL: u16 = 0x3 << 4;
/// Shift of the LNA current field.
pub const INPUT_LNA_ICSEL_SHIFT: u16 = 4;
/// Output volume, 0 (softest) to 15.
pub const INPUT_VOLUME: u16 = 0xF;

/// Select the 65-76 MHz range when the band field is 3.
pub const BAND_65M_BAND: u16 = 1 << 9;

/// Seek/tune has completed.
pub const SEEKRES_COMPLETE: u16 = 1 << 14;
/// Seek failed to find a station.
pub const SEEKRES_FAIL: u16 = 1 << 13;
/// A stereo pilot is being received.
pub const SEEKRES_STEREO: u16 = 1 << 10;
/// Channel the tuner settled on, in spacing units above the band edge.
pub const SEEKRES_READCHAN: u16 = 0x3FF;

/// Received signal strength indicator.
pub const SIGNAL_RSSI: u16 = 0x7F << 9;
/// Shift of the RSSI field.
pub const SIGNAL_RSSI_SHIFT: u16 = 9;

/// Power-on register values.
pub const REG_DEFAULTS: &[(u8, u16)] = &[
    (REG_CHIPID, 0x5804),
    (REG_CTRL, 0x0000),
    (REG_CHAN, 0x4FC0),
    (REG_IOCFG, 0x0400),
    (REG_INPUT, 0x888B),
    (REG_BAND, 0x5EC6),
];

/// `false` for the chip ID and the result/quality registers.
pub fn writeable(reg: u8) -> bool {
    !matches!(reg, REG_CHIPID | REG_SEEKRES | REG_SIGNAL)
}

/// `true` for registers the tuner updates on its own.
pub fn volatile(reg: u8) -> bool {
    matches!(reg, REG_SEEKRES | REG_SIGNAL)
}

/// Cache configuration for the register map.
pub const REGMAP_CONFIG: RegmapConfig = RegmapConfig {
    max_register: REG_SIGNAL,
    writeable,
    volatile,
    defaults: REG_DEFAULTS,
};
