//! GPIO button input.
//!
//! Two physical buttons (active-low with internal pull-up):
//!   - Button 1 - view toggle / plot / info screen
//!   - Button 2 - picture selection
//!
//! Pressing both three times opens the settings menu. Debouncing and
//! press counting happen in the main loop, so this only reports levels.

use embassy_nrf::gpio::{AnyPin, Input, Pull};
use wxframe::controller::InputSource;

pub struct Buttons {
    button1: Input<'static>,
    button2: Input<'static>,
}

impl Buttons {
    pub fn new(button1: AnyPin, button2: AnyPin) -> Self {
        Self {
            button1: Input::new(button1, Pull::Up),
            button2: Input::new(button2, Pull::Up),
        }
    }
}

impl InputSource for Buttons {
    fn pressed1(&mut self) -> bool {
        self.button1.is_low()
    }

    fn pressed2(&mut self) -> bool {
        self.button2.is_low()
    }
}
