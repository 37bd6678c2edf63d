//! Smart-panel path: refresh scheduling, cancellation, and the busy-wait
//! guard on enable.

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use embedded_hal_mock::eh1::delay::NoopDelay;
use lcdc::{regs, BusFormat, Error, Lcdc, PixelFormat};

async fn smart_panel_setup(
    bus: FakeBus,
    dma: FakeDma,
) -> Lcdc<FakeBus, FakeClock, FakeDma> {
    // The platform wired up the smart-panel interface.
    bus.set(regs::REG_CFG, regs::CFG_SLCD);

    let mut lcdc = Lcdc::probe(
        bus,
        "ingenic,jz4770-lcd",
        BASE_PHYS,
        DESC_PHYS,
        FakeClock::new(0),
        None,
        dma,
    )
    .unwrap();

    let mut state = modeset_state(vga_mode());
    let plane = plane(PixelFormat::Rgb565);
    let conn = dpi_connector(&[BusFormat::Rgb565_1x16]);
    lcdc.commit(&mut NoopDelay::new(), &mut state, &plane, &conn, false)
        .await
        .unwrap();
    lcdc
}

#[tokio::test]
async fn enable_starts_dma_feeding_and_schedules_refresh() {
    let bus = FakeBus::new();
    let dma = FakeDma::new();
    let mut lcdc = smart_panel_setup(bus.clone(), dma.clone()).await;
    assert_ne!(bus.get(regs::REG_SLCD_MCTRL) & regs::SLCD_MCTRL_DMA_TX_EN, 0);
    // Parallel-path scan-out stays off.
    assert_eq!(bus.get(regs::REG_CTRL) & regs::CTRL_ENABLE, 0);

    // The first service pushes the frame into the FIFO...
    assert!(lcdc.slcd_service().await.unwrap());
    assert_eq!(dma.pushes.borrow().as_slice(), &[(FB_PHYS, 640 * 480 * 2)]);
    assert_eq!(lcdc.vblank_count(), 1);

    // ...and the next one is not due for another 1/60th of a second.
    assert!(!lcdc.slcd_service().await.unwrap());
    assert_eq!(dma.pushes.borrow().len(), 1);
}

#[tokio::test]
async fn disable_cancels_the_refresh_schedule() {
    let dma = FakeDma::new();
    let mut lcdc = smart_panel_setup(FakeBus::new(), dma.clone()).await;
    lcdc.atomic_disable(&mut NoopDelay::new()).await.unwrap();
    assert!(!lcdc.slcd_service().await.unwrap());
    assert!(dma.pushes.borrow().is_empty());
}

#[tokio::test]
async fn enable_aborts_when_the_interface_stays_busy() {
    let bus = FakeBus::new();
    bus.set(regs::REG_CFG, regs::CFG_SLCD);
    bus.set(regs::REG_SLCD_MSTATE, regs::SLCD_MSTATE_BUSY);

    let mut lcdc = Lcdc::probe(
        bus.clone(),
        "ingenic,jz4770-lcd",
        BASE_PHYS,
        DESC_PHYS,
        FakeClock::new(0),
        None,
        FakeDma::new(),
    )
    .unwrap();

    let mut state = modeset_state(vga_mode());
    let plane = plane(PixelFormat::Rgb565);
    let conn = dpi_connector(&[BusFormat::Rgb565_1x16]);
    let err = lcdc
        .commit(&mut NoopDelay::new(), &mut state, &plane, &conn, false)
        .await
        .unwrap_err();
    assert_eq!(err, Error::TimedOut);
    // DMA feeding never started.
    assert_eq!(bus.get(regs::REG_SLCD_MCTRL) & regs::SLCD_MCTRL_DMA_TX_EN, 0);
}

#[tokio::test]
async fn smart_panel_vblank_arming_is_a_silent_no_op() {
    let bus = FakeBus::new();
    let mut lcdc = smart_panel_setup(bus.clone(), FakeDma::new()).await;

    lcdc.enable_vblank().unwrap();
    assert_eq!(bus.get(regs::REG_CTRL) & regs::CTRL_EOF_IRQ, 0);

    // The refresh worker remains the vblank source.
    assert!(lcdc.slcd_service().await.unwrap());
    assert_eq!(lcdc.vblank_count(), 1);
}
