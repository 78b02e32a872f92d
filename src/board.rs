//! RAK4631 board glue: pins, SX1262 through lora-phy, OLED over I²C,
//! and the log lines both firmware binaries print.
//!
//! Only built with the `embedded` feature.

use defmt::{error, info, warn};
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::peripherals::{TWISPI0, TWISPI1};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, spim, Peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Delay, Duration, Instant, Timer};
use embedded_hal_bus::spi::ExclusiveDevice;
use heapless::Vec;
use lora_phy::iv::GenericSx126xInterfaceVariant;
use lora_phy::mod_params::{
    Bandwidth, CodingRate, ModulationParams, PacketParams, RadioError as PhyError, RxMode,
    SpreadingFactor,
};
use lora_phy::sx126x::{self, Sx1262, Sx126x, TcxoCtrlVoltage};
use lora_phy::LoRa;

use crate::config::{self, MAX_PAYLOAD_LEN};
use crate::error::{Error, RadioError, STATUS_UNKNOWN};
use crate::flag::RxFlag;
use crate::radio::{BlockingReceive, PacketListener, Radio, RxEvent};
use crate::receiver::{Attempt, Clock, Refresh, Tick};
use crate::state::ReceiverState;
use crate::ui::display::Oled;
use crate::ui::{DisplayError, TextDisplay};

bind_interrupts!(struct Irqs {
    SPIM0_SPIS0_TWIM0_TWIS0_SPI0_TWI0 => twim::InterruptHandler<TWISPI0>;
    SPIM1_SPIS1_TWIM1_TWIS1_SPI1_TWI1 => spim::InterruptHandler<TWISPI1>;
});

type LoraSpi = ExclusiveDevice<spim::Spim<'static, TWISPI1>, Output<'static>, Delay>;
type LoraIv = GenericSx126xInterfaceVariant<Output<'static>, Input<'static>>;
type LoraDriver = LoRa<Sx126x<LoraSpi, LoraIv, Sx1262>, Delay>;

/// Concrete OLED type on this board.
pub type BoardDisplay = Oled<Twim<'static, TWISPI0>>;

// ═══════════════════════════════════════════════════════════════════════════
// Board bring-up
// ═══════════════════════════════════════════════════════════════════════════

/// Everything the receiver loops need, split out of the nRF peripherals.
pub struct Board {
    pub radio: LoraRadio,
    pub display: Screen,
    pub led: Output<'static>,
    /// Switched 3V3_S rail for the sensor slots. Dropping it powers them off.
    pub vext: Output<'static>,
}

impl Board {
    pub fn new(p: Peripherals) -> Self {
        let vext = Output::new(p.P1_02, Level::High, OutputDrive::Standard);
        let led = Output::new(p.P1_03, Level::Low, OutputDrive::Standard);

        let twim = Twim::new(p.TWISPI0, Irqs, p.P0_13, p.P0_14, twim::Config::default());
        let display = match Oled::new(twim) {
            Ok(display) => Screen::Oled(display),
            Err(e) => {
                warn!("OLED init failed: {}, running headless", e);
                Screen::Headless
            }
        };

        let mut spi_config = spim::Config::default();
        spi_config.frequency = spim::Frequency::M16;
        let spim = spim::Spim::new(p.TWISPI1, Irqs, p.P1_11, p.P1_13, p.P1_12, spi_config);

        let radio = LoraRadio::new(RadioPins {
            spim,
            nss: Output::new(p.P1_10, Level::High, OutputDrive::Standard),
            reset: Output::new(p.P1_06, Level::High, OutputDrive::Standard),
            dio1: Input::new(p.P1_15, Pull::Down),
            busy: Input::new(p.P1_14, Pull::None),
            rf_switch_rx: Output::new(p.P1_05, Level::Low, OutputDrive::Standard),
            rf_switch_tx: Output::new(p.P1_07, Level::Low, OutputDrive::Standard),
        });

        Self {
            radio,
            display,
            led,
            vext,
        }
    }
}

/// Microseconds since boot from the embassy time driver.
#[derive(Clone, Copy)]
pub struct Uptime;

impl Clock for Uptime {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// The OLED, or nothing when it did not answer at boot.
pub enum Screen {
    Oled(BoardDisplay),
    Headless,
}

impl TextDisplay for Screen {
    fn clear(&mut self) {
        if let Screen::Oled(oled) = self {
            oled.clear();
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &str) -> Result<(), DisplayError> {
        match self {
            Screen::Oled(oled) => oled.draw_text(x, y, text),
            Screen::Headless => Ok(()),
        }
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        match self {
            Screen::Oled(oled) => oled.flush(),
            Screen::Headless => Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SX1262 via lora-phy
// ═══════════════════════════════════════════════════════════════════════════

/// Pins and bus consumed by the radio at init time.
pub struct RadioPins {
    pub spim: spim::Spim<'static, TWISPI1>,
    pub nss: Output<'static>,
    pub reset: Output<'static>,
    pub dio1: Input<'static>,
    pub busy: Input<'static>,
    pub rf_switch_rx: Output<'static>,
    pub rf_switch_tx: Output<'static>,
}

struct Session {
    lora: LoraDriver,
    modulation: ModulationParams,
    rx_params: PacketParams,
}

/// SX1262 driver implementing the blocking receive shape directly.
pub struct LoraRadio {
    pins: Option<RadioPins>,
    session: Option<Session>,
    rssi: f32,
    snr: f32,
}

impl LoraRadio {
    pub fn new(pins: RadioPins) -> Self {
        Self {
            pins: Some(pins),
            session: None,
            rssi: 0.0,
            snr: 0.0,
        }
    }

    async fn bring_up(pins: RadioPins) -> Result<Session, PhyError> {
        let spi = ExclusiveDevice::new(pins.spim, pins.nss, Delay).map_err(|_| PhyError::SPI)?;
        let iv = GenericSx126xInterfaceVariant::new(
            pins.reset,
            pins.dio1,
            pins.busy,
            Some(pins.rf_switch_rx),
            Some(pins.rf_switch_tx),
        )?;
        let chip = sx126x::Config {
            chip: Sx1262,
            tcxo_ctrl: Some(TcxoCtrlVoltage::Ctrl1V7),
            use_dcdc: true,
            rx_boost: false,
        };
        let mut lora = LoRa::new(Sx126x::new(spi, iv, chip), config::LORA_PUBLIC_NETWORK, Delay).await?;

        let modulation = lora.create_modulation_params(
            spreading_factor(),
            bandwidth(),
            coding_rate(),
            config::LORA_FREQUENCY_HZ,
        )?;
        let rx_params = lora.create_rx_packet_params(
            config::LORA_PREAMBLE_LEN,
            false,
            MAX_PAYLOAD_LEN as u8,
            true,
            false,
            &modulation,
        )?;

        Ok(Session {
            lora,
            modulation,
            rx_params,
        })
    }

    /// Put the radio in receive. `RxMode::Single(n)` arms the chip's
    /// preamble timeout of `n` symbols; a packet already being demodulated
    /// when it expires still completes.
    async fn listen(&mut self, mode: RxMode) -> Result<(), RadioError> {
        let session = self.session.as_mut().ok_or(RadioError::Other(STATUS_UNKNOWN))?;
        session
            .lora
            .prepare_for_rx(mode, &session.modulation, &session.rx_params)
            .await
            .map_err(classify)
    }

    /// Wait for the next packet in the current receive mode.
    async fn next_packet(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        let session = self.session.as_mut().ok_or(RadioError::Other(STATUS_UNKNOWN))?;
        let (len, status) = session
            .lora
            .rx(&session.rx_params, buf)
            .await
            .map_err(classify)?;
        self.rssi = f32::from(status.rssi);
        self.snr = f32::from(status.snr);
        Ok(len as usize)
    }
}

impl Radio for LoraRadio {
    async fn init(&mut self) -> Result<(), RadioError> {
        let pins = self.pins.take().ok_or(RadioError::Other(STATUS_UNKNOWN))?;
        let session = Self::bring_up(pins).await.map_err(classify)?;
        self.session = Some(session);
        Ok(())
    }

    fn rssi(&self) -> f32 {
        self.rssi
    }

    fn snr(&self) -> f32 {
        self.snr
    }
}

impl BlockingReceive for LoraRadio {
    async fn receive(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        self.listen(RxMode::Single(config::RX_TIMEOUT_SYMBOLS)).await?;
        self.next_packet(buf).await
    }
}

/// Map lora-phy failures onto the three outcome classes.
///
/// lora-phy never reports a CRC failure: the SX126x driver only logs the
/// CRC IRQ and completes the reception, so `rx` returns `Ok` for corrupt
/// frames and they are displayed like any other packet. Anything but a
/// timeout is logged and bucketed.
fn classify(e: PhyError) -> RadioError {
    match e {
        PhyError::ReceiveTimeout => RadioError::Timeout,
        other => {
            warn!("lora-phy: {}", defmt::Debug2Format(&other));
            RadioError::Other(STATUS_UNKNOWN)
        }
    }
}

fn spreading_factor() -> SpreadingFactor {
    match config::LORA_SPREADING_FACTOR {
        5 => SpreadingFactor::_5,
        6 => SpreadingFactor::_6,
        7 => SpreadingFactor::_7,
        8 => SpreadingFactor::_8,
        10 => SpreadingFactor::_10,
        11 => SpreadingFactor::_11,
        12 => SpreadingFactor::_12,
        _ => SpreadingFactor::_9,
    }
}

fn bandwidth() -> Bandwidth {
    match config::LORA_BANDWIDTH_HZ {
        62_500 => Bandwidth::_62KHz,
        250_000 => Bandwidth::_250KHz,
        500_000 => Bandwidth::_500KHz,
        _ => Bandwidth::_125KHz,
    }
}

fn coding_rate() -> CodingRate {
    match config::LORA_CODING_RATE_DENOM {
        5 => CodingRate::_4_5,
        6 => CodingRate::_4_6,
        8 => CodingRate::_4_8,
        _ => CodingRate::_4_7,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Interrupt variant: listener task + mailbox proxy
// ═══════════════════════════════════════════════════════════════════════════

/// Flag raised by the listener task for the main loop.
pub static RX_FLAG: RxFlag = RxFlag::new();

/// A completed reception as seen by the listener task.
struct Frame {
    payload: Vec<u8, MAX_PAYLOAD_LEN>,
    rssi: f32,
    snr: f32,
}

/// Radio init result, reported once by the listener task.
static INIT_DONE: Signal<CriticalSectionRawMutex, Result<(), RadioError>> = Signal::new();
/// Flag to raise per packet; sending it starts continuous receive.
static START: Signal<CriticalSectionRawMutex, &'static RxFlag> = Signal::new();
/// Result of entering continuous receive.
static STARTED: Signal<CriticalSectionRawMutex, Result<(), RadioError>> = Signal::new();
/// Latest reception. Overwritten when the main loop falls behind.
static LATEST: Signal<CriticalSectionRawMutex, Result<Frame, RadioError>> = Signal::new();

/// Owns the SX1262 and plays the packet-received callback: every
/// completed reception is posted to [`LATEST`] and the flag is raised.
#[embassy_executor::task]
pub async fn listener_task(mut radio: LoraRadio) {
    let init = radio.init().await;
    INIT_DONE.signal(init);
    if init.is_err() {
        return;
    }

    let flag = START.wait().await;
    let started = radio.listen(RxMode::Continuous).await;
    STARTED.signal(started);
    if started.is_err() {
        return;
    }

    loop {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let result = radio.next_packet(&mut buf).await.map(|len| Frame {
            payload: Vec::from_slice(&buf[..len.min(MAX_PAYLOAD_LEN)]).unwrap_or_default(),
            rssi: radio.rssi(),
            snr: radio.snr(),
        });
        let failed = result.is_err();
        LATEST.signal(result);
        flag.raise();

        if failed {
            // Keep a persistent bus fault from flooding the log.
            Timer::after(Duration::from_millis(10)).await;
        }
    }
}

/// Main-loop side of the radio for the interrupt variant.
///
/// Forwards init/start to [`listener_task`] and reads packets from the
/// mailbox it fills.
pub struct MailboxRadio {
    flag: Option<&'static RxFlag>,
    rssi: f32,
    snr: f32,
}

impl MailboxRadio {
    pub const fn new() -> Self {
        Self {
            flag: None,
            rssi: 0.0,
            snr: 0.0,
        }
    }
}

impl Default for MailboxRadio {
    fn default() -> Self {
        Self::new()
    }
}

impl Radio for MailboxRadio {
    async fn init(&mut self) -> Result<(), RadioError> {
        INIT_DONE.wait().await
    }

    fn rssi(&self) -> f32 {
        self.rssi
    }

    fn snr(&self) -> f32 {
        self.snr
    }
}

impl PacketListener for MailboxRadio {
    fn set_packet_received_action(&mut self, flag: &'static RxFlag) {
        self.flag = Some(flag);
    }

    async fn start_receive(&mut self) -> Result<(), RadioError> {
        let flag = self.flag.ok_or(RadioError::Other(STATUS_UNKNOWN))?;
        START.signal(flag);
        STARTED.wait().await
    }

    async fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, RadioError> {
        let frame = LATEST.try_take().ok_or(RadioError::Other(STATUS_UNKNOWN))??;
        let len = frame.payload.len().min(buf.len());
        buf[..len].copy_from_slice(&frame.payload[..len]);
        self.rssi = frame.rssi;
        self.snr = frame.snr;
        Ok(len)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Logging
// ═══════════════════════════════════════════════════════════════════════════

/// Log a startup failure. Returns whether the firmware must halt.
pub fn log_startup(result: &Result<(), Error>) -> bool {
    match result {
        Ok(()) => {
            info!("[SX1262] Initializing ... success!");
            false
        }
        Err(Error::RadioInit(e)) => {
            error!("[SX1262] Initializing ... failed, code {}", e.code());
            true
        }
        Err(Error::StartReceive(e)) => {
            info!("[SX1262] Initializing ... success!");
            warn!("[SX1262] Starting to listen ... failed, code {}", e.code());
            false
        }
    }
}

pub fn log_rx(event: RxEvent, state: &ReceiverState) {
    match event {
        RxEvent::Received => info!(
            "{} (RSSI {} dBm, SNR {} dB)",
            state.last_packet(),
            state.last_rssi(),
            state.last_snr()
        ),
        RxEvent::Timeout => info!("timeout!"),
        RxEvent::CrcMismatch => warn!("CRC error!"),
        RxEvent::Failed(code) => warn!("failed, code {}", code),
    }
}

pub fn log_tick(tick: &Tick, state: &ReceiverState) {
    if let Some(event) = tick.rx {
        log_rx(event, state);
    }
    if let Refresh::Failed(e) = tick.refresh {
        warn!("display refresh failed: {}", e);
    }
}

pub fn log_attempt(attempt: &Attempt, state: &ReceiverState) {
    match attempt.rx {
        RxEvent::Received => {
            info!("[SX1262] Received packet ... success!");
            log_rx(attempt.rx, state);
        }
        // One line per empty window would drown everything else.
        RxEvent::Timeout => defmt::debug!("timeout! ({} in a row)", state.missed()),
        other => log_rx(other, state),
    }
    if let Err(e) = attempt.display {
        warn!("display refresh failed: {}", e);
    }
}

/// Fatal stop: park forever without a watchdog reset.
pub async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
