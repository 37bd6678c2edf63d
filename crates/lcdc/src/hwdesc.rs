//! The in-memory DMA descriptor the controller fetches at every frame.

use crate::mode::PixelFormat;
use crate::regs;

/// Frame ID stamped into every descriptor, read back through FID0/FID1.
pub const DESCRIPTOR_ID: u32 = 0xDEAF_BEAD;

/// Hardware DMA descriptor. The controller reads 16 bytes at the address in
/// DA0 and follows `next` for the frame after, so a descriptor whose `next`
/// points at itself scans out the same framebuffer forever.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct HwDescriptor {
    /// Physical address of the next descriptor.
    pub next: u32,
    /// Physical address of the framebuffer.
    pub addr: u32,
    /// Frame ID, latched into FIDn when the descriptor is fetched.
    pub id: u32,
    /// Transfer length in words, plus per-frame flags.
    pub cmd: u32,
}

impl HwDescriptor {
    /// A self-looping descriptor at physical address `own_phys`, not yet
    /// pointing at a framebuffer.
    pub fn self_looping(own_phys: u32) -> Self {
        Self {
            next: own_phys,
            addr: 0,
            id: DESCRIPTOR_ID,
            cmd: 0,
        }
    }

    /// Point the descriptor at a framebuffer and recompute the command word:
    /// the frame length in 32-bit words, with the end-of-frame interrupt
    /// requested.
    pub fn set_frame(&mut self, fb_phys: u32, width: u32, height: u32, format: PixelFormat) {
        self.addr = fb_phys;
        #[allow(clippy::arithmetic_side_effects)] // bounded by the SoC's max mode
        let words = width * height * format.cpp() / 4;
        self.cmd = words | regs::CMD_EOF_IRQ;
    }

    /// Frame length in bytes.
    pub fn len_bytes(&self) -> u32 {
        (self.cmd & !regs::CMD_EOF_IRQ).saturating_mul(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_loops_onto_itself() {
        let desc = HwDescriptor::self_looping(0x0080_0000);
        assert_eq!(desc.next, 0x0080_0000);
        assert_eq!(desc.id, DESCRIPTOR_ID);
    }

    #[test]
    fn command_word_counts_words_and_requests_eof() {
        let mut desc = HwDescriptor::self_looping(0x0080_0000);
        desc.set_frame(0x0100_0000, 640, 480, PixelFormat::XRgb8888);
        assert_eq!(desc.cmd & !regs::CMD_EOF_IRQ, 640 * 480);
        assert_ne!(desc.cmd & regs::CMD_EOF_IRQ, 0);
        assert_eq!(desc.len_bytes(), 640 * 480 * 4);

        desc.set_frame(0x0100_0000, 640, 480, PixelFormat::Rgb565);
        assert_eq!(desc.cmd & !regs::CMD_EOF_IRQ, 640 * 480 / 2);
    }
}
