//! DMA engine seam for the smart-panel refresh path.
//!
//! Smart panels have their own framebuffer; the controller only forwards
//! pixel data pushed into SLCD_MFIFO. A platform DMA channel does the
//! pushing, configured once at probe with the fixed transfer shape below.

/// Transfer direction of a slave DMA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaDirection {
    /// Memory to a device FIFO.
    MemToDevice,
}

/// Slave channel configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaSlaveConfig {
    /// Transfer direction.
    pub direction: DmaDirection,
    /// Physical address of the device FIFO.
    pub dst_addr: u32,
    /// Source access width in bytes.
    pub src_addr_width: u8,
    /// Destination access width in bytes.
    pub dst_addr_width: u8,
    /// Maximum source burst, in source-width units.
    pub src_maxburst: u32,
    /// Maximum destination burst, in destination-width units.
    pub dst_maxburst: u32,
}

/// The transfer shape the SLCD FIFO accepts: 32-bit reads from memory in
/// bursts of 64, 16-bit writes into the FIFO in bursts of 8.
pub const fn slcd_dma_config(fifo_phys: u32) -> DmaSlaveConfig {
    DmaSlaveConfig {
        direction: DmaDirection::MemToDevice,
        dst_addr: fifo_phys,
        src_addr_width: 4,
        dst_addr_width: 2,
        src_maxburst: 64,
        dst_maxburst: 8,
    }
}

/// A platform DMA channel feeding the smart-panel FIFO.
pub trait SlcdDma {
    /// Platform fault type.
    type Error: core::fmt::Debug;

    /// Configure the slave side of the channel.
    fn slave_config(&mut self, config: &DmaSlaveConfig) -> Result<(), Self::Error>;

    /// Push `len_bytes` from `src_phys` into the configured FIFO, resolving
    /// when the transfer completes.
    async fn push(&mut self, src_phys: u32, len_bytes: u32) -> Result<(), Self::Error>;
}
