//! Per-SoC capabilities of the LCD controller.

/// What a given SoC's controller instance supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocInfo {
    /// Compatible string the platform advertises.
    pub compatible: &'static str,
    /// The controller needs a separate device clock besides the pixel clock.
    pub needs_dev_clk: bool,
    /// Widest mode the controller can scan out.
    pub max_width: u32,
    /// Tallest mode the controller can scan out.
    pub max_height: u32,
}

/// Supported controller instances.
pub const SOC_TABLE: &[SocInfo] = &[
    SocInfo {
        compatible: "ingenic,jz4740-lcd",
        needs_dev_clk: true,
        max_width: 800,
        max_height: 600,
    },
    SocInfo {
        compatible: "ingenic,jz4725b-lcd",
        needs_dev_clk: false,
        max_width: 800,
        max_height: 600,
    },
    SocInfo {
        compatible: "ingenic,jz4770-lcd",
        needs_dev_clk: false,
        max_width: 1280,
        max_height: 720,
    },
];

/// Look up the capabilities for a compatible string.
pub fn of_match(compatible: &str) -> Option<&'static SocInfo> {
    SOC_TABLE.iter().find(|soc| soc.compatible == compatible)
}
