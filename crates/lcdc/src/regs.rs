//! JZ47xx LCD controller register layout.
//!
//! Offsets are byte offsets from the controller base. The SLCD mirror
//! registers start at 0xA0; SLCD_MFIFO is the DMA write target only and is
//! not part of the programmable window.

/// Configuration register.
pub const REG_CFG: u32 = 0x00;
/// Vertical sync pulse: VPS in 31:16, VPE in 15:0.
pub const REG_VSYNC: u32 = 0x04;
/// Horizontal sync pulse: HPS in 31:16, HPE in 15:0.
pub const REG_HSYNC: u32 = 0x08;
/// Virtual area timing: HT in 31:16, VT in 15:0.
pub const REG_VAT: u32 = 0x0C;
/// Display area horizontal: HDS in 31:16, HDE in 15:0.
pub const REG_DAH: u32 = 0x10;
/// Display area vertical: VDS in 31:16, VDE in 15:0.
pub const REG_DAV: u32 = 0x14;
/// Sharp-panel PS signal timing.
pub const REG_PS: u32 = 0x18;
/// Sharp-panel CLS signal timing.
pub const REG_CLS: u32 = 0x1C;
/// Sharp-panel SPL signal timing.
pub const REG_SPL: u32 = 0x20;
/// Sharp-panel REV signal timing.
pub const REG_REV: u32 = 0x24;
/// Control register.
pub const REG_CTRL: u32 = 0x30;
/// Status register.
pub const REG_STATE: u32 = 0x34;
/// Interrupt ID, latched from the descriptor that raised the IRQ.
pub const REG_IID: u32 = 0x38;
/// Channel 0 descriptor address.
pub const REG_DA0: u32 = 0x40;
/// Channel 0 source address read-back.
pub const REG_SA0: u32 = 0x44;
/// Channel 0 frame ID read-back.
pub const REG_FID0: u32 = 0x48;
/// Channel 0 command read-back.
pub const REG_CMD0: u32 = 0x4C;
/// Channel 1 descriptor address.
pub const REG_DA1: u32 = 0x50;
/// Channel 1 source address read-back.
pub const REG_SA1: u32 = 0x54;
/// Channel 1 frame ID read-back.
pub const REG_FID1: u32 = 0x58;
/// Channel 1 command read-back.
pub const REG_CMD1: u32 = 0x5C;
/// Smart-panel memory interface configuration.
pub const REG_SLCD_MCFG: u32 = 0xA0;
/// Smart-panel memory interface control.
pub const REG_SLCD_MCTRL: u32 = 0xA4;
/// Smart-panel memory interface state.
pub const REG_SLCD_MSTATE: u32 = 0xA8;
/// Smart-panel data port (highest programmable offset).
pub const REG_SLCD_MDATA: u32 = 0xAC;
/// Smart-panel FIFO. DMA destination only, never accessed through the
/// register window.
pub const REG_SLCD_MFIFO: u32 = 0xB0;

/// Smart-panel interface select.
pub const CFG_SLCD: u32 = 1 << 31;
/// Disable the Sharp PS signal.
pub const CFG_PS_DISABLE: u32 = 1 << 23;
/// Disable the Sharp CLS signal.
pub const CFG_CLS_DISABLE: u32 = 1 << 22;
/// Disable the Sharp SPL signal.
pub const CFG_SPL_DISABLE: u32 = 1 << 21;
/// Disable the Sharp REV signal.
pub const CFG_REV_DISABLE: u32 = 1 << 20;
/// Invert the Sharp REV polarity.
pub const CFG_REV_POLARITY: u32 = 1 << 12;
/// HSYNC is active low.
pub const CFG_HSYNC_ACTIVE_LOW: u32 = 1 << 11;
/// Pixel data is driven on the falling clock edge.
pub const CFG_PCLK_FALLING_EDGE: u32 = 1 << 10;
/// Data-enable is active low.
pub const CFG_DE_ACTIVE_LOW: u32 = 1 << 9;
/// VSYNC is active low.
pub const CFG_VSYNC_ACTIVE_LOW: u32 = 1 << 8;
/// 18-bit generic bus.
pub const CFG_18_BIT: u32 = 1 << 7;
/// 24-bit generic bus.
pub const CFG_24_BIT: u32 = 1 << 6;

/// Sharp special TFT panel, mode 1.
pub const CFG_MODE_SPECIAL_TFT_1: u32 = 1;
/// Progressive TV output.
pub const CFG_MODE_TV_OUT_P: u32 = 4;
/// Interlaced TV output.
pub const CFG_MODE_TV_OUT_I: u32 = 6;
/// Generic 16-bit parallel bus.
pub const CFG_MODE_GENERIC_16BIT: u32 = 0;
/// Generic 18-bit parallel bus.
pub const CFG_MODE_GENERIC_18BIT: u32 = CFG_18_BIT;
/// Generic 24-bit parallel bus.
pub const CFG_MODE_GENERIC_24BIT: u32 = CFG_24_BIT;
/// 8-bit serial bus (RGB over three clocks).
pub const CFG_MODE_8BIT_SERIAL: u32 = 12;

/// 16-word DMA burst.
pub const CTRL_BURST_16: u32 = 0x2 << 28;
/// 15-bit mode is RGB555 (as opposed to RGB5551).
pub const CTRL_RGB555: u32 = 1 << 27;
/// Output FIFO underrun protection.
pub const CTRL_OFUP: u32 = 1 << 26;
/// Raise an interrupt at end of frame.
pub const CTRL_EOF_IRQ: u32 = 1 << 13;
/// Request a quiesced disable at the next frame boundary.
pub const CTRL_DISABLE: u32 = 1 << 4;
/// Controller enable.
pub const CTRL_ENABLE: u32 = 1 << 3;
/// 15/16 bits per pixel.
pub const CTRL_BPP_15_16: u32 = 0x4;
/// 18/24 bits per pixel.
pub const CTRL_BPP_18_24: u32 = 0x5;
/// Every bit that selects the pixel depth.
pub const CTRL_BPP_MASK: u32 = CTRL_RGB555 | 0x7;

/// End-of-frame interrupt flag (write-1-ignored, cleared by masked write).
pub const STATE_EOF_IRQ: u32 = 1 << 5;
/// Controller has reached the quiesced disabled state.
pub const STATE_DISABLED: u32 = 1 << 0;

/// Descriptor command flag: raise the end-of-frame interrupt for this frame.
pub const CMD_EOF_IRQ: u32 = 1 << 30;

/// Smart-panel DMA transmit enable.
pub const SLCD_MCTRL_DMA_TX_EN: u32 = 1 << 0;
/// Smart-panel memory interface is transferring.
pub const SLCD_MSTATE_BUSY: u32 = 1 << 0;

/// `true` for offsets the driver may write. The IID latch and the per-channel
/// SA/FID/CMD read-backs are hardware-owned.
pub fn writeable(offset: u32) -> bool {
    !matches!(
        offset,
        REG_IID | REG_SA0 | REG_FID0 | REG_CMD0 | REG_SA1 | REG_FID1 | REG_CMD1
    )
}

/// Access rules for the programmable window.
pub const MMIO_CONFIG: regmap::MmioConfig = regmap::MmioConfig {
    max_offset: REG_SLCD_MDATA,
    writeable,
};
