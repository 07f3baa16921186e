//! Settings menu shown while the sub-mode owns the buttons.
//!
//! Every press is one action: button 1 moves the cursor, button 2 changes
//! the value under it (or activates an exit item). Multi-press gestures
//! are not used here.

use core::fmt::{self, Write};

use crate::config::{Settings, RESETTING_WINDOW_CHOICES_MS};
use crate::gesture::EdgeDetector;

/// Menu rows, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuItem {
    Randomize,
    DefaultPicture,
    GestureWindow,
    SaveExit,
    DiscardExit,
}

pub const MENU_ITEMS: [MenuItem; 5] = [
    MenuItem::Randomize,
    MenuItem::DefaultPicture,
    MenuItem::GestureWindow,
    MenuItem::SaveExit,
    MenuItem::DiscardExit,
];

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Randomize => "Random pic",
            MenuItem::DefaultPicture => "Default pic",
            MenuItem::GestureWindow => "Press window",
            MenuItem::SaveExit => "Save & exit",
            MenuItem::DiscardExit => "Discard & exit",
        }
    }
}

/// Result of feeding input to the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuStep {
    /// Still in the menu; redraw if `changed`.
    Continue { changed: bool },
    /// Leave the menu with these settings (the originals when discarded).
    Exit { save: bool, settings: Settings },
}

pub struct SettingsMenu {
    original: Settings,
    draft: Settings,
    cursor: usize,
    total_pictures: u8,
    next_button: EdgeDetector,
    change_button: EdgeDetector,
}

impl SettingsMenu {
    /// Open the menu. Buttons must be released once before they count.
    pub fn new(current: Settings, total_pictures: u8) -> Self {
        Self {
            original: current,
            draft: current,
            cursor: 0,
            total_pictures: total_pictures.max(1),
            next_button: EdgeDetector::held(),
            change_button: EdgeDetector::held(),
        }
    }

    pub fn cursor(&self) -> MenuItem {
        MENU_ITEMS[self.cursor]
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    /// Feed one tick of button levels.
    pub fn on_levels(&mut self, pressed1: bool, pressed2: bool) -> MenuStep {
        let mut changed = false;
        if self.next_button.rising(pressed1) {
            self.cursor = (self.cursor + 1) % MENU_ITEMS.len();
            changed = true;
        }
        if self.change_button.rising(pressed2) {
            if let Some(exit) = self.activate() {
                return exit;
            }
            changed = true;
        }
        MenuStep::Continue { changed }
    }

    fn activate(&mut self) -> Option<MenuStep> {
        match self.cursor() {
            MenuItem::Randomize => {
                self.draft.randomize_every_refresh = !self.draft.randomize_every_refresh;
            }
            MenuItem::DefaultPicture => {
                self.draft.default_picture = (self.draft.default_picture + 1) % self.total_pictures;
            }
            MenuItem::GestureWindow => {
                self.draft.resetting_window_ms = next_window(self.draft.resetting_window_ms);
            }
            MenuItem::SaveExit => {
                return Some(MenuStep::Exit {
                    save: true,
                    settings: self.draft,
                });
            }
            MenuItem::DiscardExit => {
                return Some(MenuStep::Exit {
                    save: false,
                    settings: self.original,
                });
            }
        }
        debug!("menu: {} changed", self.cursor());
        None
    }

    /// Write the current value of a row (empty for exit rows).
    pub fn write_value(&self, item: MenuItem, out: &mut impl Write) -> fmt::Result {
        match item {
            MenuItem::Randomize => {
                out.write_str(if self.draft.randomize_every_refresh {
                    "on"
                } else {
                    "off"
                })
            }
            MenuItem::DefaultPicture => write!(out, "{}", self.draft.default_picture + 1),
            MenuItem::GestureWindow => write!(
                out,
                "{}.{}s",
                self.draft.resetting_window_ms / 1000,
                (self.draft.resetting_window_ms % 1000) / 100
            ),
            MenuItem::SaveExit | MenuItem::DiscardExit => Ok(()),
        }
    }
}

fn next_window(current: u32) -> u32 {
    match RESETTING_WINDOW_CHOICES_MS.iter().position(|&w| w == current) {
        Some(i) => RESETTING_WINDOW_CHOICES_MS[(i + 1) % RESETTING_WINDOW_CHOICES_MS.len()],
        None => RESETTING_WINDOW_CHOICES_MS[0],
    }
}
