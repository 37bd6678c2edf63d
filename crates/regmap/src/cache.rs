//! Shadowed register map for I²C devices with 8-bit register addresses and
//! 16-bit big-endian values.
//!
//! The shadow exists so a powered-down chip can keep accepting configuration:
//! in *cache-only* mode writes are staged in the shadow and marked dirty, and
//! the resume path replays them with [`I2cRegmap::sync`]. *Bypass* mode goes
//! straight to the wire without touching the shadow — used once at probe to
//! read the chip ID before any state is trusted.
//!
//! Self-clearing trigger bits (soft-reset, tune, seek strobes) must not be
//! filtered by the change detector, so [`I2cRegmap::write_bits`] forces the
//! bus write and [`I2cRegmap::pulse`] wraps the set/hold/clear sequence.

// Shadow/dirty indexing is guarded by the max_register bounds check in
// check_reg(); N is the table size matching max_register + 1.
#![allow(clippy::indexing_slicing)]
#![allow(clippy::arithmetic_side_effects)]

use embedded_hal::i2c::I2c;
use embedded_hal_async::delay::DelayNs;

use crate::error::Error;

/// Static access rules and defaults for a cached register map.
pub struct RegmapConfig {
    /// Highest valid register address (inclusive).
    pub max_register: u8,
    /// Returns `false` for registers that must never be written.
    pub writeable: fn(u8) -> bool,
    /// Returns `true` for registers whose value changes under the driver;
    /// volatile registers bypass the shadow on read and are never replayed.
    pub volatile: fn(u8) -> bool,
    /// Power-on values, written to the shadow at init. After a soft reset
    /// these are the authoritative device state.
    pub defaults: &'static [(u8, u16)],
}

/// A write-through register cache over an I²C transport.
///
/// `N` is the shadow size and must equal `max_register + 1`.
pub struct I2cRegmap<I2C, const N: usize> {
    i2c: I2C,
    addr: u8,
    cfg: RegmapConfig,
    shadow: [u16; N],
    dirty: [bool; N],
    cache_only: bool,
    bypass: bool,
}

impl<I2C: I2c, const N: usize> I2cRegmap<I2C, N> {
    /// Create a map talking to the device at 7-bit address `addr`, with the
    /// shadow seeded from `cfg.defaults`.
    pub fn new(i2c: I2C, addr: u8, cfg: RegmapConfig) -> Self {
        debug_assert_eq!(N, cfg.max_register as usize + 1);
        let mut shadow = [0u16; N];
        for &(reg, val) in cfg.defaults {
            shadow[reg as usize] = val;
        }
        Self {
            i2c,
            addr,
            cfg,
            shadow,
            dirty: [false; N],
            cache_only: false,
            bypass: false,
        }
    }

    fn check_reg(&self, reg: u8) -> Result<(), Error<I2C::Error>> {
        if reg > self.cfg.max_register {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }

    fn hw_read(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .map_err(Error::Transport)?;
        Ok(u16::from_be_bytes(buf))
    }

    fn hw_write(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let val = value.to_be_bytes();
        self.i2c
            .write(self.addr, &[reg, val[0], val[1]])
            .map_err(Error::Transport)
    }

    /// Read a register: from the wire when bypassed or volatile, from the
    /// shadow otherwise. In cache-only mode every read is served from the
    /// shadow.
    pub fn read(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        self.check_reg(reg)?;
        if self.bypass {
            return self.hw_read(reg);
        }
        if self.cache_only {
            return Ok(self.shadow[reg as usize]);
        }
        if (self.cfg.volatile)(reg) {
            return self.hw_read(reg);
        }
        Ok(self.shadow[reg as usize])
    }

    /// Write a register. Read-only registers are rejected with
    /// [`Error::InvalidArgument`]. In cache-only mode the value is staged
    /// in the shadow and marked dirty for the next [`Self::sync`].
    pub fn write(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        self.check_reg(reg)?;
        if !(self.cfg.writeable)(reg) {
            return Err(Error::InvalidArgument);
        }
        if self.bypass {
            return self.hw_write(reg, value);
        }
        if self.cache_only {
            self.shadow[reg as usize] = value;
            self.dirty[reg as usize] = true;
            return Ok(());
        }
        self.hw_write(reg, value)?;
        if !(self.cfg.volatile)(reg) {
            self.shadow[reg as usize] = value;
            self.dirty[reg as usize] = false;
        }
        Ok(())
    }

    /// Read-modify-write the bits in `mask`; the write is elided when the
    /// register already holds the requested value.
    pub fn update_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<(), Error<I2C::Error>> {
        let old = self.read(reg)?;
        let new = (old & !mask) | (value & mask);
        if new != old {
            self.write(reg, new)?;
        }
        Ok(())
    }

    /// Set the bits in `mask`.
    pub fn set_bits(&mut self, reg: u8, mask: u16) -> Result<(), Error<I2C::Error>> {
        self.update_bits(reg, mask, mask)
    }

    /// Clear the bits in `mask`.
    pub fn clear_bits(&mut self, reg: u8, mask: u16) -> Result<(), Error<I2C::Error>> {
        self.update_bits(reg, mask, 0)
    }

    /// Like [`Self::update_bits`] but the write always reaches the device,
    /// even when the computed value equals the cached one. Required for
    /// self-clearing bits: the shadow may still show the bit set while the
    /// hardware has long cleared it.
    pub fn write_bits(&mut self, reg: u8, mask: u16, value: u16) -> Result<(), Error<I2C::Error>> {
        let old = self.read(reg)?;
        let new = (old & !mask) | (value & mask);
        self.write(reg, new)
    }

    /// Pulse the bits in `mask`: forced set, hold for `hold_us`
    /// microseconds, forced clear.
    pub async fn pulse<D: DelayNs>(
        &mut self,
        delay: &mut D,
        reg: u8,
        mask: u16,
        hold_us: u32,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_bits(reg, mask, mask)?;
        if hold_us > 0 {
            delay.delay_us(hold_us).await;
        }
        self.write_bits(reg, mask, 0)
    }

    /// Switch cache-only mode. While on, no I²C traffic is generated.
    pub fn set_cache_only(&mut self, cache_only: bool) {
        self.cache_only = cache_only;
    }

    /// Switch bypass mode: reads and writes go straight to the wire and the
    /// shadow is left untouched.
    pub fn set_bypass(&mut self, bypass: bool) {
        self.bypass = bypass;
    }

    /// Mark every cacheable register dirty so the next [`Self::sync`]
    /// rewrites the full configuration (used before powering the chip down).
    pub fn mark_dirty_all(&mut self) {
        for reg in 0..=self.cfg.max_register {
            if (self.cfg.writeable)(reg) && !(self.cfg.volatile)(reg) {
                self.dirty[reg as usize] = true;
            }
        }
    }

    /// Replay dirty cacheable registers to the device in ascending address
    /// order, clearing their dirty marks. The map must be online.
    pub fn sync(&mut self) -> Result<(), Error<I2C::Error>> {
        debug_assert!(!self.cache_only && !self.bypass);
        for reg in 0..=self.cfg.max_register {
            let idx = reg as usize;
            if self.dirty[idx] && (self.cfg.writeable)(reg) && !(self.cfg.volatile)(reg) {
                let value = self.shadow[idx];
                self.hw_write(reg, value)?;
                self.dirty[idx] = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::delay::NoopDelay;

    const MAX_REG: u8 = 0x05;
    const N: usize = MAX_REG as usize + 1;

    /// Register-array fake of a 16-bit I²C device. Volatile register 0x04
    /// increments on every hardware read so cache hits are observable.
    struct FakeChip {
        regs: [u16; N],
        writes: std::vec::Vec<(u8, u16)>,
    }

    impl FakeChip {
        fn new() -> Self {
            Self {
                regs: [0; N],
                writes: std::vec::Vec::new(),
            }
        }
    }

    impl embedded_hal::i2c::ErrorType for FakeChip {
        type Error = core::convert::Infallible;
    }

    impl I2c for FakeChip {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [embedded_hal::i2c::Operation<'_>],
        ) -> Result<(), Self::Error> {
            let mut reg = 0u8;
            for op in operations.iter_mut() {
                match op {
                    embedded_hal::i2c::Operation::Write(data) => {
                        reg = data[0];
                        if let [_, hi, lo] = data {
                            let value = u16::from_be_bytes([*hi, *lo]);
                            self.regs[reg as usize] = value;
                            self.writes.push((reg, value));
                        }
                    }
                    embedded_hal::i2c::Operation::Read(buf) => {
                        if reg == 0x04 {
                            self.regs[4] = self.regs[4].wrapping_add(1);
                        }
                        buf.copy_from_slice(&self.regs[reg as usize].to_be_bytes());
                    }
                }
            }
            Ok(())
        }
    }

    const CONFIG: RegmapConfig = RegmapConfig {
        max_register: MAX_REG,
        writeable: |reg| reg != 0x00 && reg < 0x04,
        volatile: |reg| reg >= 0x04,
        defaults: &[(0x00, 0x5804), (0x01, 0x1234), (0x02, 0xABCD)],
    };

    fn map(chip: FakeChip) -> I2cRegmap<FakeChip, N> {
        I2cRegmap::new(chip, 0x11, CONFIG)
    }

    #[test]
    fn defaults_are_served_from_the_shadow_without_traffic() {
        let mut map = map(FakeChip::new());
        assert_eq!(map.read(0x01).unwrap(), 0x1234);
        assert!(map.i2c.writes.is_empty());
    }

    #[test]
    fn read_only_register_rejects_writes() {
        let mut map = map(FakeChip::new());
        assert_eq!(map.write(0x00, 0), Err(Error::InvalidArgument));
    }

    #[test]
    fn volatile_register_bypasses_the_cache() {
        let mut map = map(FakeChip::new());
        let first = map.read(0x04).unwrap();
        let second = map.read(0x04).unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn bypass_reads_the_wire_even_for_cached_registers() {
        let mut chip = FakeChip::new();
        chip.regs[1] = 0x9999;
        let mut map = map(chip);
        assert_eq!(map.read(0x01).unwrap(), 0x1234);
        map.set_bypass(true);
        assert_eq!(map.read(0x01).unwrap(), 0x9999);
    }

    #[test]
    fn cache_only_stages_writes_and_sync_replays_in_address_order() {
        let mut map = map(FakeChip::new());
        map.set_cache_only(true);
        map.write(0x03, 0x0F0F).unwrap();
        map.write(0x01, 0xBEEF).unwrap();
        assert!(map.i2c.writes.is_empty());

        map.set_cache_only(false);
        map.sync().unwrap();
        assert_eq!(map.i2c.writes, vec![(0x01, 0xBEEF), (0x03, 0x0F0F)]);
        // A second sync has nothing left to replay.
        map.sync().unwrap();
        assert_eq!(map.i2c.writes.len(), 2);
    }

    #[test]
    fn mark_dirty_all_replays_the_whole_cacheable_set() {
        let mut map = map(FakeChip::new());
        map.mark_dirty_all();
        map.sync().unwrap();
        // Registers 0x01..0x03 are writeable and non-volatile.
        assert_eq!(
            map.i2c.writes,
            vec![(0x01, 0x1234), (0x02, 0xABCD), (0x03, 0x0000)]
        );
    }

    #[test]
    fn update_bits_elides_unchanged_writes_but_write_bits_forces_them() {
        let mut map = map(FakeChip::new());
        map.write(0x01, 0x0010).unwrap();
        let writes = map.i2c.writes.len();

        map.update_bits(0x01, 0x0010, 0x0010).unwrap();
        assert_eq!(map.i2c.writes.len(), writes);

        map.write_bits(0x01, 0x0010, 0x0010).unwrap();
        assert_eq!(map.i2c.writes.len(), writes + 1);
    }

    #[tokio::test]
    async fn pulse_writes_set_then_clear() {
        let mut map = map(FakeChip::new());
        map.pulse(&mut NoopDelay::new(), 0x02, 0x0002, 1000)
            .await
            .unwrap();
        let n = map.i2c.writes.len();
        assert_eq!(map.i2c.writes[n - 2], (0x02, 0xABCD | 0x0002));
        assert_eq!(map.i2c.writes[n - 1], (0x02, 0xABCD & !0x0002));
    }
}
