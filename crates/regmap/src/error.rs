//! Common error taxonomy for the peripheral drivers.

use thiserror_no_std::Error;

/// Driver-level errors, generic over the underlying transport error `E`
/// (an I²C bus error, an MMIO fault, a DMA or clock failure).
///
/// Transport errors are never translated; they are wrapped verbatim in
/// [`Error::Transport`] so the original fault stays visible to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The probed hardware is absent or reports the wrong identity.
    #[error("no such device")]
    NoSuchDevice,
    /// A parameter is outside what the hardware supports.
    #[error("invalid argument")]
    InvalidArgument,
    /// A requested value lies outside every supported range.
    #[error("out of range")]
    OutOfRange,
    /// A bounded wait elapsed without the hardware reaching the expected
    /// state.
    #[error("timed out")]
    TimedOut,
    /// A required resource is not available yet; the caller should retry
    /// the probe later.
    #[error("resource not ready, retry probe")]
    Defer,
    /// Allocation of a required buffer failed.
    #[error("out of memory")]
    NoMemory,
    /// The underlying transport reported a failure.
    #[error("transport error")]
    Transport(E),
}
