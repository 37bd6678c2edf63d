//! Clock provider seam.

/// A gated, rate-settable clock as the platform exposes it.
///
/// Rates are in Hz. `round_rate` reports what `set_rate` would actually
/// program, letting mode validation reject timings the clock tree cannot
/// produce before any hardware is touched.
pub trait Clock {
    /// Platform fault type.
    type Error: core::fmt::Debug;

    /// Ungate the clock, enabling parents as needed.
    fn prepare_enable(&mut self) -> Result<(), Self::Error>;

    /// Gate the clock again.
    fn disable_unprepare(&mut self);

    /// Current rate.
    fn rate(&self) -> u32;

    /// Rate of the parent clock.
    fn parent_rate(&self) -> u32;

    /// The rate the clock would run at if asked for `rate`.
    fn round_rate(&self, rate: u32) -> Result<u32, Self::Error>;

    /// Program the clock to (the rounding of) `rate`.
    fn set_rate(&mut self, rate: u32) -> Result<(), Self::Error>;
}

/// Phases of a rate change on the pixel clock's ancestry, as delivered to
/// [`crate::Lcdc::pixclk_rate_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockAction {
    /// The rate is about to change.
    PreRateChange,
    /// The rate has changed.
    PostRateChange,
    /// A started rate change was abandoned.
    AbortRateChange,
}
