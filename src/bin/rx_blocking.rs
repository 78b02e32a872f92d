//! Blocking LoRa receiver firmware for the RAK4631.
//!
//! Every iteration waits for one packet (100-symbol window), flashes the
//! status LED on success, and redraws the OLED with the last packet and
//! the number of empty windows in a row.

#![no_std]
#![no_main]

use defmt::info;
use embassy_executor::Spawner;
use embassy_time::Delay;
use {defmt_rtt as _, panic_probe as _};

use loraview::board::{self, Board, Uptime};
use loraview::BlockingReceiver;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("loraview (blocking) starting...");

    let p = embassy_nrf::init(Default::default());
    let Board {
        radio,
        display,
        led,
        vext: _vext,
    } = Board::new(p);

    let mut receiver = BlockingReceiver::new(radio, display, Uptime, led, Delay);

    info!("[SX1262] Initializing ... ");
    let started = receiver.start().await;
    if board::log_startup(&started) {
        board::halt().await;
    }

    loop {
        let attempt = receiver.step().await;
        board::log_attempt(&attempt, receiver.state());
    }
}
