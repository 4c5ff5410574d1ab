#![no_std]
#![no_main]

use defmt::info;
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{Async, Config as UartConfig, InterruptHandler, Uart, UartRx};
use midea_core::Controller;
use midea_uart_rp2040::{
    pump_rx, run, PowerLed, TemperatureLog, UartTransport, COMMANDS, RX_BYTES, UART_BAUDRATE,
};

#[cfg(feature = "dev-panic")]
use panic_probe as _;
#[cfg(feature = "prod-panic")]
use panic_reset as _;

bind_interrupts!(struct Irqs {
    UART0_IRQ => InterruptHandler<UART0>;
});

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Midea UART controller starting...");

    let p = embassy_rp::init(embassy_rp::config::Config::default());

    // --- UART Setup ---
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = UART_BAUDRATE;

    let uart = Uart::new(
        p.UART0,
        p.PIN_0, // TX
        p.PIN_1, // RX
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        uart_config,
    );
    let (tx, rx) = uart.split();

    // On-board LED follows the unit's power state
    let led = PowerLed::new(Output::new(p.PIN_25, Level::Low));

    let controller = Controller::new(UartTransport::new(tx), led, TemperatureLog);

    spawner.spawn(rx_task(rx).unwrap());

    info!("Midea UART controller initialized, polling unit...");
    run(controller, &RX_BYTES, &COMMANDS).await
}

#[embassy_executor::task]
async fn rx_task(rx: UartRx<'static, Async>) {
    pump_rx(rx).await
}
