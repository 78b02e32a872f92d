//! Interrupt-driven LoRa receiver firmware for the RAK4631.
//!
//! A listener task owns the SX1262 and raises [`RX_FLAG`] for every
//! completed reception. The main loop consumes the flag, reads the
//! packet, and redraws the OLED every 100 ms whether or not a packet
//! arrived.

#![no_std]
#![no_main]

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_futures::yield_now;
use {defmt_rtt as _, panic_probe as _};

use loraview::board::{self, listener_task, Board, MailboxRadio, Uptime, RX_FLAG};
use loraview::InterruptReceiver;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("loraview (interrupt) starting...");

    let p = embassy_nrf::init(Default::default());
    let Board {
        radio,
        display,
        led: _led,
        vext: _vext,
    } = Board::new(p);

    if spawner.spawn(listener_task(radio)).is_err() {
        error!("listener task could not be spawned");
        board::halt().await;
    }

    let mut receiver = InterruptReceiver::new(MailboxRadio::new(), display, Uptime, &RX_FLAG);

    info!("[SX1262] Initializing ... ");
    let started = receiver.start().await;
    if board::log_startup(&started) {
        board::halt().await;
    }
    if started.is_ok() {
        info!("[SX1262] Starting to listen ... success!");
    }

    loop {
        let tick = receiver.poll().await;
        board::log_tick(&tick, receiver.state());
        yield_now().await;
    }
}
