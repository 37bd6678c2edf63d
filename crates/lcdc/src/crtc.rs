//! The CRTC: mode programming, enable/disable sequencing, the scan-out
//! descriptor, vblank bookkeeping, and the smart-panel refresh schedule.
//!
//! Two scan-out paths share this state machine. Parallel panels are fed by
//! the controller's own DMA engine following the self-looping descriptor;
//! the end-of-frame interrupt is the vblank source. Smart panels hold their
//! own framebuffer, so the driver pushes frames into the SLCD FIFO on a
//! 1/vrefresh schedule instead, and there is no hardware vblank.

// Register packing and timing arithmetic below stay within u32 by the SoC
// mode limits checked in atomic_check.
#![allow(clippy::arithmetic_side_effects)]

use embassy_time::{Duration, Instant};
use embedded_hal_async::delay::DelayNs;
use regmap::{Error, MmioBus, RegisterWindow};

use crate::clock::{Clock, ClockAction};
use crate::encoder;
use crate::hwdesc::HwDescriptor;
use crate::mode::{ConnectorState, CrtcState, DisplayMode, PixelFormat, PlaneState};
use crate::regs;
use crate::slcd::{slcd_dma_config, SlcdDma};
use crate::soc::{self, SocInfo};

/// Cadence for the smart-panel busy wait.
const SLCD_BUSY_POLL_US: u32 = 10;
/// Bound on the busy wait, about 100 ms.
const SLCD_BUSY_MAX_POLLS: u32 = 10_000;
/// Cadence for the quiesced-disable wait. Unbounded: the controller always
/// reaches the disabled state within one frame.
const DISABLE_POLL_US: u32 = 1_000;
/// Cadence and bound for waiting out one vblank (a frame is ~16 ms at 60 Hz).
const VBLANK_POLL_US: u32 = 1_000;
const VBLANK_MAX_POLLS: u32 = 100;

/// Vblank state: counter, IRQ gating, and page-flip event delivery.
#[derive(Debug, Default)]
struct VblankTracker {
    irq_enabled: bool,
    count: u32,
    pending: Option<u32>,
    completed: heapless::Deque<u32, 8>,
}

/// The LCD controller driver.
///
/// Generic over the register bus, the platform clock provider and the
/// smart-panel DMA channel; all three share the platform's fault type.
pub struct Lcdc<B: MmioBus, C, D> {
    regs: RegisterWindow<B>,
    soc: &'static SocInfo,
    pix_clk: C,
    lcd_clk: Option<C>,
    dma: D,
    desc: HwDescriptor,
    panel_is_slcd: bool,
    panel_is_sharp: bool,
    pix_clk_dirty: bool,
    clock_khz: u32,
    refresh_due: Option<Instant>,
    refresh_period: Duration,
    vblank: VblankTracker,
}

/// The CTRL depth bits for a framebuffer format.
pub fn ctrl_for_format(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::XRgb1555 => regs::CTRL_RGB555 | regs::CTRL_BPP_15_16,
        PixelFormat::Rgb565 => regs::CTRL_BPP_15_16,
        PixelFormat::XRgb8888 => regs::CTRL_BPP_18_24,
    }
}

impl<B, C, D> Lcdc<B, C, D>
where
    B: MmioBus,
    C: Clock<Error = B::Error>,
    D: SlcdDma<Error = B::Error>,
{
    /// Bring up the controller.
    ///
    /// `compatible` selects the SoC capabilities ([`Error::NoSuchDevice`] for
    /// an unknown string). SoCs with a separate device clock cannot run
    /// without it; a missing `lcd_clk` there is [`Error::Defer`] so the
    /// platform can retry once the clock provider is up. `desc_phys` is the
    /// physical address of the scan-out descriptor, `base_phys` the
    /// controller's register block (for the DMA FIFO target).
    pub fn probe(
        bus: B,
        compatible: &str,
        base_phys: u32,
        desc_phys: u32,
        mut pix_clk: C,
        mut lcd_clk: Option<C>,
        mut dma: D,
    ) -> Result<Self, Error<B::Error>> {
        let soc = soc::of_match(compatible).ok_or(Error::NoSuchDevice)?;
        if soc.needs_dev_clk && lcd_clk.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("device clock not ready, deferring probe");
            return Err(Error::Defer);
        }

        dma.slave_config(&slcd_dma_config(base_phys + regs::REG_SLCD_MFIFO))
            .map_err(Error::Transport)?;

        if let Some(clk) = lcd_clk.as_mut() {
            // The device clock runs 1:1 with its parent; dividers live
            // upstream in the clock tree.
            let parent = clk.parent_rate();
            clk.set_rate(parent).map_err(Error::Transport)?;
        }
        pix_clk.prepare_enable().map_err(Error::Transport)?;
        if let Some(clk) = lcd_clk.as_mut() {
            if let Err(err) = clk.prepare_enable() {
                pix_clk.disable_unprepare();
                return Err(Error::Transport(err));
            }
        }

        Ok(Self {
            regs: RegisterWindow::new(bus, regs::MMIO_CONFIG),
            soc,
            pix_clk,
            lcd_clk,
            dma,
            desc: HwDescriptor::self_looping(desc_phys),
            panel_is_slcd: false,
            panel_is_sharp: false,
            pix_clk_dirty: false,
            clock_khz: 0,
            refresh_due: None,
            refresh_period: Duration::from_micros(1_000_000 / 60),
            vblank: VblankTracker::default(),
        })
    }

    /// Shut the controller down and gate its clocks.
    pub fn release(mut self) {
        if let Some(clk) = self.lcd_clk.as_mut() {
            clk.disable_unprepare();
        }
        self.pix_clk.disable_unprepare();
    }

    /// Validate a commit before any hardware is touched.
    pub fn atomic_check(&self, state: &CrtcState) -> Result<(), Error<B::Error>> {
        if !state.mode_changed {
            return Ok(());
        }
        // Panels on these SoCs are routinely mounted rotated, so the axes
        // are validated swapped against the controller limits.
        if state.mode.hdisplay > self.soc.max_height || state.mode.vdisplay > self.soc.max_width {
            return Err(Error::InvalidArgument);
        }
        self.pix_clk
            .round_rate(state.mode.clock_khz * 1000)
            .map_err(Error::Transport)?;
        Ok(())
    }

    /// Start scan-out.
    pub async fn atomic_enable<DL: DelayNs>(
        &mut self,
        delay: &mut DL,
    ) -> Result<(), Error<B::Error>> {
        self.regs.write(regs::REG_STATE, 0)?;

        if self.panel_is_slcd {
            // The memory interface must be idle before DMA feeding starts.
            if let Err(err) = self
                .regs
                .poll_until(
                    delay,
                    regs::REG_SLCD_MSTATE,
                    SLCD_BUSY_POLL_US,
                    Some(SLCD_BUSY_MAX_POLLS),
                    |v| v & regs::SLCD_MSTATE_BUSY == 0,
                )
                .await
            {
                #[cfg(feature = "defmt")]
                defmt::error!("smart-panel interface stuck busy");
                return Err(err);
            }
            self.regs
                .set_bits(regs::REG_SLCD_MCTRL, regs::SLCD_MCTRL_DMA_TX_EN)?;
        } else {
            // Restore the vblank mask a prior disable dropped.
            let mut ctrl = regs::CTRL_ENABLE;
            if self.vblank.irq_enabled {
                ctrl |= regs::CTRL_EOF_IRQ;
            }
            self.regs.update_bits(
                regs::REG_CTRL,
                regs::CTRL_ENABLE | regs::CTRL_DISABLE | regs::CTRL_EOF_IRQ,
                ctrl,
            )?;
        }
        Ok(())
    }

    /// Stop scan-out. Parallel mode asks for a quiesced disable and waits
    /// for the controller to reach it; smart-panel mode cancels the refresh
    /// schedule. The end-of-frame interrupt is masked, but the platform's
    /// vblank intent is kept so a re-enable restores it.
    pub async fn atomic_disable<DL: DelayNs>(
        &mut self,
        delay: &mut DL,
    ) -> Result<(), Error<B::Error>> {
        if self.vblank.irq_enabled {
            self.regs.clear_bits(regs::REG_CTRL, regs::CTRL_EOF_IRQ)?;
        }
        if self.panel_is_slcd {
            self.refresh_due = None;
        } else {
            self.regs.set_bits(regs::REG_CTRL, regs::CTRL_DISABLE)?;
            self.regs
                .poll_until(delay, regs::REG_STATE, DISABLE_POLL_US, None, |v| {
                    v & regs::STATE_DISABLED != 0
                })
                .await?;
        }
        Ok(())
    }

    fn update_timings(&mut self, mode: &DisplayMode) -> Result<(), Error<B::Error>> {
        let vpe = mode.vsync_end - mode.vsync_start;
        let vds = mode.vtotal - mode.vsync_start;
        let vde = vds + mode.vdisplay;
        let vt = vde + mode.vsync_start - mode.vdisplay;

        let hpe = mode.hsync_end - mode.hsync_start;
        let hds = mode.htotal - mode.hsync_start;
        let hde = hds + mode.hdisplay;
        let ht = hde + mode.hsync_start - mode.hdisplay;

        // Sync pulses start the frame, so VPS/HPS are zero.
        self.regs.write(regs::REG_VSYNC, vpe)?;
        self.regs.write(regs::REG_HSYNC, hpe)?;
        self.regs.write(regs::REG_VAT, (ht << 16) | vt)?;
        self.regs.write(regs::REG_DAH, (hds << 16) | hde)?;
        self.regs.write(regs::REG_DAV, (vds << 16) | vde)?;

        if self.panel_is_sharp {
            self.regs.write(regs::REG_PS, (hde << 16) | (hde + 1))?;
            self.regs.write(regs::REG_CLS, (hde << 16) | (hde + 1))?;
            self.regs.write(regs::REG_SPL, (hpe << 16) | (hpe + 1))?;
            self.regs.write(regs::REG_REV, mode.htotal << 16)?;
        }

        self.regs.update_bits(
            regs::REG_CTRL,
            regs::CTRL_OFUP | regs::CTRL_BURST_16,
            regs::CTRL_OFUP | regs::CTRL_BURST_16,
        )
    }

    /// Commit the staged state to hardware.
    pub fn atomic_flush(&mut self, state: &mut CrtcState) -> Result<(), Error<B::Error>> {
        if state.mode_changed {
            // The platform owns the interface-select bit; honor whichever
            // path it wired up.
            let cfg = self.regs.read(regs::REG_CFG)?;
            self.panel_is_slcd = cfg & regs::CFG_SLCD != 0;

            self.update_timings(&state.mode)?;
            self.pix_clk_dirty = true;
            self.clock_khz = state.mode.clock_khz;

            let vrefresh = state.mode.vrefresh.max(1);
            self.refresh_period = Duration::from_micros(1_000_000 / u64::from(vrefresh));
        }

        if self.panel_is_slcd {
            // First refresh as soon as the worker runs.
            self.refresh_due = Some(Instant::now());
        } else {
            self.regs.write(regs::REG_DA0, self.desc.next)?;
        }

        if self.pix_clk_dirty {
            self.pix_clk
                .set_rate(self.clock_khz * 1000)
                .map_err(Error::Transport)?;
            self.pix_clk_dirty = false;
        }

        if let Some(event) = state.event.take() {
            if self.vblank.irq_enabled {
                self.vblank.pending = Some(event);
            } else {
                self.complete_event(event);
            }
        }
        Ok(())
    }

    /// Latch a new framebuffer into the descriptor, and on a modeset also
    /// reprogram the pixel depth.
    pub fn plane_atomic_update(
        &mut self,
        crtc_state: &CrtcState,
        plane: &PlaneState,
    ) -> Result<(), Error<B::Error>> {
        self.desc
            .set_frame(plane.fb_phys, plane.width, plane.height, plane.format);
        if crtc_state.mode_changed {
            self.regs.update_bits(
                regs::REG_CTRL,
                regs::CTRL_BPP_MASK,
                ctrl_for_format(plane.format),
            )?;
        }
        Ok(())
    }

    /// Validate the connector for a commit.
    pub fn encoder_atomic_check(&self, conn: &ConnectorState<'_>) -> Result<(), Error<B::Error>> {
        encoder::atomic_check(conn).map(|_| ())
    }

    /// Program the CFG word for a mode on a connector. The interface-select
    /// bit is left to the platform.
    pub fn encoder_mode_set(
        &mut self,
        conn: &ConnectorState<'_>,
        mode: &DisplayMode,
    ) -> Result<(), Error<B::Error>> {
        let bus_format = encoder::atomic_check(conn)?;
        self.panel_is_sharp = conn.bus_flags.sharp_signals;
        let cfg = encoder::cfg_word(mode, conn, bus_format);
        self.regs.update_bits(regs::REG_CFG, !regs::CFG_SLCD, cfg)
    }

    /// Unmask the end-of-frame interrupt. Smart panels have no end-of-frame
    /// interrupt; the refresh worker is the vblank source there and needs no
    /// arming, so the request succeeds without touching hardware.
    pub fn enable_vblank(&mut self) -> Result<(), Error<B::Error>> {
        if self.panel_is_slcd {
            return Ok(());
        }
        self.regs.set_bits(regs::REG_CTRL, regs::CTRL_EOF_IRQ)?;
        self.vblank.irq_enabled = true;
        Ok(())
    }

    /// Mask the end-of-frame interrupt.
    pub fn disable_vblank(&mut self) -> Result<(), Error<B::Error>> {
        self.regs.clear_bits(regs::REG_CTRL, regs::CTRL_EOF_IRQ)?;
        self.vblank.irq_enabled = false;
        Ok(())
    }

    /// Interrupt service routine: acknowledge the end-of-frame flag and run
    /// the vblank bookkeeping when it was set.
    pub fn irq_handler(&mut self) -> Result<(), Error<B::Error>> {
        let state = self.regs.read(regs::REG_STATE)?;
        self.regs.update_bits(regs::REG_STATE, regs::STATE_EOF_IRQ, 0)?;
        if state & regs::STATE_EOF_IRQ != 0 {
            self.handle_vblank();
        }
        Ok(())
    }

    fn handle_vblank(&mut self) {
        self.vblank.count = self.vblank.count.wrapping_add(1);
        if let Some(event) = self.vblank.pending.take() {
            self.complete_event(event);
        }
    }

    fn complete_event(&mut self, event: u32) {
        if self.vblank.completed.is_full() {
            self.vblank.completed.pop_front();
        }
        // Cannot fail, a slot was just freed.
        let _ = self.vblank.completed.push_back(event);
    }

    /// Frames scanned out since enable.
    pub fn vblank_count(&self) -> u32 {
        self.vblank.count
    }

    /// Pop the oldest delivered page-flip event.
    pub fn next_completed_event(&mut self) -> Option<u32> {
        self.vblank.completed.pop_front()
    }

    /// Run one full commit: validate, sequence disables, program the
    /// encoder and plane, flush, and sequence enables.
    pub async fn commit<DL: DelayNs>(
        &mut self,
        delay: &mut DL,
        state: &mut CrtcState,
        plane: &PlaneState,
        conn: &ConnectorState<'_>,
        was_active: bool,
    ) -> Result<(), Error<B::Error>> {
        self.atomic_check(state)?;
        self.encoder_atomic_check(conn)?;

        if was_active && (!state.active || state.mode_changed) {
            self.atomic_disable(delay).await?;
        }
        if state.mode_changed {
            self.encoder_mode_set(conn, &state.mode)?;
        }
        self.plane_atomic_update(state, plane)?;
        self.atomic_flush(state)?;
        if state.active && (!was_active || state.mode_changed) {
            self.atomic_enable(delay).await?;
        }
        Ok(())
    }

    /// Run one iteration of the smart-panel refresh worker. Pushes a frame
    /// when the schedule is due and re-arms it one period later; returns
    /// whether a frame went out. A cancelled schedule (or a parallel panel)
    /// is a no-op.
    pub async fn slcd_service(&mut self) -> Result<bool, Error<B::Error>> {
        let Some(due) = self.refresh_due else {
            return Ok(false);
        };
        if Instant::now() < due {
            return Ok(false);
        }
        self.dma
            .push(self.desc.addr, self.desc.len_bytes())
            .await
            .map_err(Error::Transport)?;
        self.handle_vblank();
        self.refresh_due = Some(due + self.refresh_period);
        Ok(true)
    }

    /// Clock-tree notifier for the pixel clock's ancestry. After a rate
    /// change upstream the exact pixel rate must be re-requested, but not
    /// mid-frame: mark the rate dirty and ride out one vblank so the next
    /// flush reprograms it cleanly.
    pub async fn pixclk_rate_changed<DL: DelayNs>(
        &mut self,
        delay: &mut DL,
        action: ClockAction,
    ) -> Result<(), Error<B::Error>> {
        match action {
            ClockAction::PreRateChange | ClockAction::AbortRateChange => Ok(()),
            ClockAction::PostRateChange => {
                self.pix_clk_dirty = true;
                self.wait_one_vblank(delay).await
            }
        }
    }

    /// Wait for the next end-of-frame. Smart-panel mode has no frame pulse
    /// to wait on; the dirty rate is simply picked up by the next flush.
    async fn wait_one_vblank<DL: DelayNs>(&mut self, delay: &mut DL) -> Result<(), Error<B::Error>> {
        if self.panel_is_slcd {
            return Ok(());
        }
        self.regs.update_bits(regs::REG_STATE, regs::STATE_EOF_IRQ, 0)?;
        self.regs
            .poll_until(
                delay,
                regs::REG_STATE,
                VBLANK_POLL_US,
                Some(VBLANK_MAX_POLLS),
                |v| v & regs::STATE_EOF_IRQ != 0,
            )
            .await?;
        Ok(())
    }
}
