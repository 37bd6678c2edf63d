//! Driver core for the JZ47xx SoC LCD controller.
//!
//! The controller scans a framebuffer out of memory through a self-looping
//! DMA descriptor and drives either a parallel (DPI/TV) panel directly or a
//! smart panel through its command/data memory interface. This crate covers
//! mode validation and programming, the enable/disable state machine for
//! both paths, plane updates, vblank and page-flip event bookkeeping, the
//! smart-panel refresh schedule, and the pixel-clock rate-change notifier.
//!
//! The hardware seams are traits: [`regmap::MmioBus`] for the register
//! block, [`Clock`] for the platform clock tree, and [`SlcdDma`] for the
//! channel feeding the smart-panel FIFO.

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

pub mod clock;
pub mod crtc;
pub mod encoder;
pub mod hwdesc;
pub mod mode;
pub mod regs;
pub mod slcd;
pub mod soc;

pub use clock::{Clock, ClockAction};
pub use crtc::Lcdc;
pub use hwdesc::{HwDescriptor, DESCRIPTOR_ID};
pub use mode::{
    BusFlags, BusFormat, ConnectorKind, ConnectorState, CrtcState, DisplayMode, PixelFormat,
    PlaneState,
};
pub use slcd::{DmaDirection, DmaSlaveConfig, SlcdDma};
pub use soc::{of_match, SocInfo};

pub use regmap::Error;
