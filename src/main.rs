//! wxframe - two-button weather frame for nRF52840.
//!
//! Weather records arrive as CSV lines over USB serial. The main loop ticks
//! every [`TICK_MS`]: it refreshes the OLED when the content is stale and
//! turns button bursts into view, picture and menu actions.
//!
//! ## Task layout
//!
//! - `main`: settings load, then the tick loop (render + buttons + menu)
//! - `usb_task`: USB enumeration and the serial line receiver

#![no_std]
#![no_main]

mod storage;
mod ui;
mod usb;

use defmt::{info, warn};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_nrf::gpio::Pin;
use embassy_nrf::nvmc::Nvmc;
use embassy_nrf::rng::{self, Rng};
use embassy_nrf::twim::{self, Twim};
use embassy_nrf::{bind_interrupts, peripherals};
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Instant, Ticker, Timer};
use wxframe::config::{Settings, RETRY_DELAY_MS, TICK_MS};
use wxframe::controller::{Clock, Controller, RandomSource};
use wxframe::weather::WeatherLog;
use {defmt_rtt as _, panic_probe as _};

use crate::storage::SettingsStore;
use crate::ui::buttons::Buttons;
use crate::ui::display::{self, Oled};
use crate::ui::pictures::PICTURES;
use crate::ui::render::{SharedLog, WeatherRenderer};
use crate::usb::serial::{self, UsbSerial};

bind_interrupts!(struct Irqs {
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    RNG => rng::InterruptHandler<peripherals::RNG>;
});

/// Latest weather data, written by the USB task and read by the renderer.
static WEATHER: SharedLog = Mutex::new(WeatherLog::new());

struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}

struct HardwareRng(Rng<'static, peripherals::RNG>);

impl RandomSource for HardwareRng {
    fn next_u32(&mut self) -> u32 {
        let mut bytes = [0u8; 4];
        self.0.blocking_fill_bytes(&mut bytes);
        u32::from_le_bytes(bytes)
    }
}

#[embassy_executor::task]
async fn usb_task(usb: UsbSerial) {
    serial::run(usb, &WEATHER).await
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(Default::default());
    info!("wxframe starting");

    // Settings: flash first, defaults if absent or unusable.
    let mut store = SettingsStore::new(BlockingAsync::new(Nvmc::new(p.NVMC)));
    let settings = match store.load().await {
        Some(s) if s.validate(PICTURES.len()).is_ok() => s,
        Some(_) => {
            warn!("Stored settings invalid for this firmware, using defaults");
            Settings::default()
        }
        None => Settings::default(),
    };

    let mut controller = match Controller::new(settings, PICTURES.len()) {
        Ok(c) => c,
        Err(e) => defmt::panic!("invalid configuration: {}", e),
    };

    spawner.must_spawn(usb_task(serial::init(p.USBD)));

    let mut twim_config = twim::Config::default();
    twim_config.frequency = twim::Frequency::K400;
    let i2c = Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim_config);
    let mut oled = Oled::new(display::init(i2c));

    let mut buttons = Buttons::new(p.P0_11.degrade(), p.P0_12.degrade());
    let mut rng = HardwareRng(Rng::new(p.RNG, Irqs));
    let mut renderer = WeatherRenderer::new(&WEATHER);
    let clock = UptimeClock;

    info!("entering main loop");
    let mut ticker = Ticker::every(Duration::from_millis(TICK_MS));

    loop {
        let tick = controller.tick(&clock, &mut buttons, &mut rng, &mut renderer, &mut oled);
        let report = match tick {
            Ok(report) => report,
            Err(e) => defmt::panic!("main loop stopped: {}", e),
        };

        if report.enter_sub_mode() {
            let exit = ui::sub_mode::run(
                &mut buttons,
                &mut oled,
                *controller.settings(),
                PICTURES.len() as u8,
            )
            .await;

            match controller.resume_after_sub_mode(exit.settings) {
                Ok(()) if exit.save => store.save(&exit.settings).await,
                Ok(()) => {}
                Err(e) => warn!("menu settings rejected: {}", e),
            }
            ticker.reset();
            continue;
        }

        if report.should_back_off() {
            Timer::after_millis(RETRY_DELAY_MS).await;
            ticker.reset();
        } else {
            ticker.next().await;
        }
    }
}
