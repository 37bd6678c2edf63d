//! The receiver's three tuning ranges.
//!
//! Frequencies are in units of 1/16 kHz (62.5 Hz), the resolution the
//! channel registers work in.

/// 76-108 MHz, the usual broadcast band plus the Japanese extension.
pub const BAND_WORLDWIDE: usize = 0;
/// 65-76 MHz, the upper OIRT band.
pub const BAND_EAST_EUROPE: usize = 1;
/// 50-65 MHz.
pub const BAND_LOW: usize = 2;

/// One tuning range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Band {
    /// Position in [`BANDS`].
    pub index: usize,
    /// Lowest tunable frequency, inclusive.
    pub low: u32,
    /// Highest tunable frequency, inclusive.
    pub high: u32,
    /// Stereo reception is possible in this range.
    pub stereo: bool,
}

/// All tuning ranges, in lookup order.
pub const BANDS: &[Band] = &[
    Band {
        index: BAND_WORLDWIDE,
        low: 1_216_000, /* 76.0 MHz */
        high: 1_728_000, /* 108.0 MHz */
        stereo: true,
    },
    Band {
        index: BAND_EAST_EUROPE,
        low: 1_040_000, /* 65.0 MHz */
        high: 1_216_000, /* 76.0 MHz */
        stereo: true,
    },
    Band {
        index: BAND_LOW,
        low: 800_000, /* 50.0 MHz */
        high: 1_040_000, /* 65.0 MHz */
        stereo: true,
    },
];

/// First band containing the whole `min..=max` range.
pub fn band_for(min: u32, max: u32) -> Option<&'static Band> {
    BANDS.iter().find(|band| band.low <= min && band.high >= max)
}

/// Band at `index`, for range enumeration.
pub fn enum_bands(index: usize) -> Option<&'static Band> {
    BANDS.get(index)
}
