//! Settings menu driver. Owns the buttons and the panel until the user
//! picks an exit row or leaves the menu idle.

use defmt::info;
use embassy_time::{Duration, Instant, Timer};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use wxframe::config::{Settings, TICK_MS};
use wxframe::controller::InputSource;
use wxframe::settings_menu::{MenuStep, SettingsMenu, MENU_ITEMS};

use super::display::{small_text, Frame, Oled};

/// Leave without saving after this long with no presses.
const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Result of a menu session.
pub struct MenuExit {
    pub save: bool,
    pub settings: Settings,
}

pub async fn run<I, I2C>(
    input: &mut I,
    oled: &mut Oled<I2C>,
    current: Settings,
    total_pictures: u8,
) -> MenuExit
where
    I: InputSource,
    I2C: embedded_hal::i2c::I2c,
{
    info!("settings menu opened");
    let mut menu = SettingsMenu::new(current, total_pictures);
    let mut last_activity = Instant::now();
    oled.show(&draw(&menu));

    loop {
        let p1 = input.pressed1();
        let p2 = input.pressed2();
        match menu.on_levels(p1, p2) {
            MenuStep::Exit { save, settings } => {
                info!("settings menu closed (save={})", save);
                return MenuExit { save, settings };
            }
            MenuStep::Continue { changed: true } => {
                last_activity = Instant::now();
                oled.show(&draw(&menu));
            }
            MenuStep::Continue { changed: false } => {
                if last_activity.elapsed() > IDLE_TIMEOUT {
                    info!("settings menu idle, discarding");
                    return MenuExit {
                        save: false,
                        settings: current,
                    };
                }
            }
        }
        Timer::after_millis(TICK_MS).await;
    }
}

fn draw(menu: &SettingsMenu) -> Frame {
    let mut frame = Frame::new();
    let style = small_text();
    let _ = Text::with_baseline("Settings", Point::zero(), style, Baseline::Top).draw(&mut frame);

    let mut line: String<24> = String::new();
    for (row, item) in MENU_ITEMS.iter().enumerate() {
        line.clear();
        let marker = if *item == menu.cursor() { '>' } else { ' ' };
        let _ = line.push(marker);
        let _ = line.push_str(item.label());
        let _ = line.push(' ');
        let _ = menu.write_value(*item, &mut line);

        let y = 11 + row as i32 * 10;
        let _ = Text::with_baseline(&line, Point::new(0, y), style, Baseline::Top).draw(&mut frame);
    }
    frame
}
