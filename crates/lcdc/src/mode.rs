//! Display modes, pixel and bus formats, and the atomic state snapshots the
//! CRTC operates on.

/// A complete video timing.
///
/// All horizontal values are in pixels, vertical values in lines, the pixel
/// clock in kHz. Sync positions follow the usual convention:
/// `display <= sync_start < sync_end <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayMode {
    /// Pixel clock in kHz.
    pub clock_khz: u32,
    /// Horizontal active width.
    pub hdisplay: u32,
    /// Start of the horizontal sync pulse.
    pub hsync_start: u32,
    /// End of the horizontal sync pulse.
    pub hsync_end: u32,
    /// Total line length.
    pub htotal: u32,
    /// Vertical active height.
    pub vdisplay: u32,
    /// Start of the vertical sync pulse.
    pub vsync_start: u32,
    /// End of the vertical sync pulse.
    pub vsync_end: u32,
    /// Total frame height.
    pub vtotal: u32,
    /// Nominal refresh rate in Hz.
    pub vrefresh: u32,
    /// HSYNC is active low.
    pub nhsync: bool,
    /// VSYNC is active low.
    pub nvsync: bool,
    /// Interlaced scan-out (TV output only).
    pub interlace: bool,
}

/// Framebuffer pixel formats the DMA engine can scan out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// 15-bit RGB in a 16-bit word, top bit unused.
    XRgb1555,
    /// 16-bit RGB.
    Rgb565,
    /// 24-bit RGB in a 32-bit word, top byte unused.
    XRgb8888,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn cpp(self) -> u32 {
        match self {
            Self::XRgb1555 | Self::Rgb565 => 2,
            Self::XRgb8888 => 4,
        }
    }
}

/// Formats of the parallel bus between the controller and the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFormat {
    /// RGB565 over 16 data lines.
    Rgb565_1x16,
    /// RGB666 over 18 data lines.
    Rgb666_1x18,
    /// RGB888 over 24 data lines.
    Rgb888_1x24,
    /// RGB888 serialized over 8 data lines, three clocks per pixel.
    Rgb888_3x8,
}

/// What the encoder drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectorKind {
    /// A parallel (DPI) panel.
    Dpi,
    /// Composite TV output.
    Tv,
}

/// Electrical quirks of the attached panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusFlags {
    /// Data-enable is active low.
    pub de_low: bool,
    /// Pixel data is driven on the falling clock edge.
    pub pixdata_negedge: bool,
    /// The panel uses the Sharp PS/CLS/SPL/REV signal set.
    pub sharp_signals: bool,
}

/// Connector snapshot handed to the encoder.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectorState<'a> {
    /// Connector type.
    pub kind: ConnectorKind,
    /// Bus formats the panel advertises. The encoder requires exactly one.
    pub bus_formats: &'a [BusFormat],
    /// Panel signal quirks.
    pub bus_flags: BusFlags,
}

/// CRTC snapshot for one atomic commit.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CrtcState {
    /// The timing to scan out.
    pub mode: DisplayMode,
    /// Whether this commit changes the mode (full modeset).
    pub mode_changed: bool,
    /// Whether the CRTC is on after this commit.
    pub active: bool,
    /// Page-flip completion event to deliver on the next vblank, if any.
    pub event: Option<u32>,
}

/// Primary-plane snapshot for one atomic commit.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaneState {
    /// Physical address of the framebuffer.
    pub fb_phys: u32,
    /// Source width in pixels.
    pub width: u32,
    /// Source height in lines.
    pub height: u32,
    /// Framebuffer format.
    pub format: PixelFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_per_pixel() {
        assert_eq!(PixelFormat::XRgb1555.cpp(), 2);
        assert_eq!(PixelFormat::Rgb565.cpp(), 2);
        assert_eq!(PixelFormat::XRgb8888.cpp(), 4);
    }
}
