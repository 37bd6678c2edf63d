//! Register-access infrastructure shared by the SoC peripheral drivers.
//!
//! Two transports are covered:
//!
//! - [`mmio`] — a typed window over a block of 32-bit memory-mapped
//!   registers, with read-modify-write and poll-until helpers and a static
//!   read-only table.
//! - [`cache`] — a shadowed register map for 16-bit-value I²C devices, with
//!   write-allow and volatile tables, a cache-only mode for powered-down
//!   chips, and a dirty-entry replay (`sync`) for resume paths.
//!
//! Both report failures through the common [`Error`] taxonomy; transport
//! errors are carried verbatim so callers can distinguish a bus fault from a
//! driver-level rejection.

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

pub mod cache;
pub mod error;
pub mod mmio;

pub use cache::{I2cRegmap, RegmapConfig};
pub use error::Error;
pub use mmio::{MmioBus, MmioConfig, RegisterWindow};
