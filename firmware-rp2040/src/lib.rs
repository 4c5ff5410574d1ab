//! Midea air-conditioner controller for RP2040.
//!
//! This crate hosts [`midea_core::Controller`] on a Raspberry Pi Pico wired
//! to the indoor unit's UART header.
//!
//! # Hardware Configuration
//!
//! | Function | GPIO | Description |
//! |----------|------|-------------|
//! | UART0 TX | 0    | To indoor unit RX |
//! | UART0 RX | 1    | From indoor unit TX |
//! | LED      | 25   | On-board LED (unit power indicator) |
//!
//! # Architecture
//!
//! A reader task ([`pump_rx`]) moves received bytes into [`RX_BYTES`]. A
//! single task owns the controller and multiplexes its three inputs with
//! [`select3`]: received bytes, the periodic tick and queued commands. The
//! controller is therefore never entered concurrently, and a tick never
//! cancels a UART read in flight.
//!
//! Other tasks change the unit's state by sending a [`SetCommand`] through
//! [`COMMANDS`] (see [`submit`]).

#![no_std]

use defmt::{error, info, warn};
use embassy_futures::select::{select3, Either3};
use embassy_rp::uart::{Async, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use embedded_hal::digital::OutputPin;
use midea_core::{Controller, FrameTransport, Observer, TransportError, DEFAULT_CONFIG};
use midea_proto::{SetCommand, Temperature};

/// Indoor unit line speed (8N1).
pub const UART_BAUDRATE: u32 = 9_600;

/// Controller tick period.
pub const TICK_PERIOD: Duration = Duration::from_millis(DEFAULT_CONFIG.tick_period_ms as u64);

/// Pending SET commands.
pub static COMMANDS: Channel<CriticalSectionRawMutex, SetCommand, 4> = Channel::new();

/// Bytes received from the unit, in line order.
pub static RX_BYTES: Channel<CriticalSectionRawMutex, u8, 64> = Channel::new();

/// Hand a command to the controller task.
///
/// Returns `false` (and logs) if the command channel is full.
pub fn submit(command: SetCommand) -> bool {
    match COMMANDS.try_send(command) {
        Ok(()) => true,
        Err(_) => {
            warn!("command channel full, dropping {:?}", command);
            false
        }
    }
}

/// Writes frames on the UART transmitter.
///
/// Frames are short (35 bytes at 9600 baud), so a blocking write keeps the
/// controller synchronous.
pub struct UartTransport<'d> {
    tx: UartTx<'d, Async>,
}

impl<'d> UartTransport<'d> {
    #[must_use]
    pub fn new(tx: UartTx<'d, Async>) -> Self {
        Self { tx }
    }
}

impl FrameTransport for UartTransport<'_> {
    fn write_frame(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.tx.blocking_write(bytes).map_err(|_| TransportError::Io)
    }
}

/// Mirrors the unit's power state on an LED.
pub struct PowerLed<P> {
    pin: P,
}

impl<P: OutputPin> PowerLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> Observer<bool> for PowerLed<P> {
    fn publish(&mut self, on: bool) {
        info!("unit power: {}", on);
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if result.is_err() {
            error!("failed to drive power LED");
        }
    }
}

/// Reports the room temperature over defmt.
pub struct TemperatureLog;

impl Observer<Temperature> for TemperatureLog {
    fn publish(&mut self, ambient: Temperature) {
        info!("room temperature: {} C", ambient);
    }
}

/// Move received bytes from the UART into [`RX_BYTES`]. Run it in its own task.
pub async fn pump_rx(mut rx: UartRx<'static, Async>) -> ! {
    let mut byte_buf = [0u8; 1];
    loop {
        match rx.read(&mut byte_buf).await {
            Ok(()) => RX_BYTES.send(byte_buf[0]).await,
            Err(_) => error!("UART read error"),
        }
    }
}

/// Run the controller forever.
///
/// Never returns under normal operation.
pub async fn run<T, P, A>(
    mut controller: Controller<T, P, A>,
    bytes: &'static Channel<CriticalSectionRawMutex, u8, 64>,
    commands: &'static Channel<CriticalSectionRawMutex, SetCommand, 4>,
) -> !
where
    T: FrameTransport,
    P: Observer<bool>,
    A: Observer<Temperature>,
{
    let mut ticker = Ticker::every(TICK_PERIOD);

    loop {
        match select3(bytes.receive(), ticker.next(), commands.receive()).await {
            Either3::First(byte) => controller.on_byte(byte),
            Either3::Second(()) => controller.tick(),
            Either3::Third(command) => controller.set_state(command),
        }
    }
}
