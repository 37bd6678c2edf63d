//! Encoder: validates the panel's bus description and derives the CFG word.

use regmap::Error;

use crate::mode::{BusFormat, ConnectorKind, ConnectorState, DisplayMode};
use crate::regs;

/// Validate the connector for a commit, yielding the single bus format the
/// panel advertises.
///
/// A panel advertising zero or several bus formats is ambiguous; picking one
/// silently would program the wrong bus width, so the commit is rejected
/// instead.
pub fn atomic_check<E>(conn: &ConnectorState<'_>) -> Result<BusFormat, Error<E>> {
    match *conn.bus_formats {
        [format] => Ok(format),
        _ => Err(Error::InvalidArgument),
    }
}

/// Derive the CFG word for a mode on a connector. Everything except the
/// interface-select bit (owned by the platform) is covered.
pub fn cfg_word(mode: &DisplayMode, conn: &ConnectorState<'_>, bus_format: BusFormat) -> u32 {
    let mut cfg = if conn.bus_flags.sharp_signals {
        regs::CFG_MODE_SPECIAL_TFT_1 | regs::CFG_REV_POLARITY
    } else {
        regs::CFG_PS_DISABLE
            | regs::CFG_CLS_DISABLE
            | regs::CFG_SPL_DISABLE
            | regs::CFG_REV_DISABLE
    };

    if mode.nhsync {
        cfg |= regs::CFG_HSYNC_ACTIVE_LOW;
    }
    if mode.nvsync {
        cfg |= regs::CFG_VSYNC_ACTIVE_LOW;
    }
    if conn.bus_flags.de_low {
        cfg |= regs::CFG_DE_ACTIVE_LOW;
    }
    if conn.bus_flags.pixdata_negedge {
        cfg |= regs::CFG_PCLK_FALLING_EDGE;
    }

    // Sharp panels already selected their special TFT mode above; the mode
    // field must not be disturbed by the connector kind.
    if !conn.bus_flags.sharp_signals {
        match conn.kind {
            ConnectorKind::Tv => {
                cfg |= if mode.interlace {
                    regs::CFG_MODE_TV_OUT_I
                } else {
                    regs::CFG_MODE_TV_OUT_P
                };
            }
            ConnectorKind::Dpi => {
                cfg |= match bus_format {
                    BusFormat::Rgb565_1x16 => regs::CFG_MODE_GENERIC_16BIT,
                    BusFormat::Rgb666_1x18 => regs::CFG_MODE_GENERIC_18BIT,
                    BusFormat::Rgb888_1x24 => regs::CFG_MODE_GENERIC_24BIT,
                    BusFormat::Rgb888_3x8 => regs::CFG_MODE_8BIT_SERIAL,
                };
            }
        }
    }

    cfg
}
