//! Mutable session state owned by the main loop.
//!
//! Only the dispatcher and the controller's refresh step write to it.

use crate::config::Settings;
use crate::error::ConfigError;

/// Which data set the main screen shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewMode {
    /// Outdoor readings.
    Primary,
    /// Indoor readings.
    Secondary,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Primary => ViewMode::Secondary,
            ViewMode::Secondary => ViewMode::Primary,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Primary => "Outdoor",
            ViewMode::Secondary => "Indoor",
        }
    }

    pub(crate) fn to_byte(self) -> u8 {
        match self {
            ViewMode::Primary => 0,
            ViewMode::Secondary => 1,
        }
    }

    pub(crate) fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(ViewMode::Primary),
            1 => Some(ViewMode::Secondary),
            _ => None,
        }
    }
}

/// Flags that affect only the next render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OnceFlags {
    /// Draw the temperature plot instead of the picture.
    pub show_plot: bool,
}

/// View mode, picture selection and one-shot flags.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionState {
    view_mode: ViewMode,
    picture_index: u8,
    total_pictures: u8,
    override_randomizer: bool,
    randomize_every_refresh: bool,
    once: OnceFlags,
}

impl SessionState {
    /// Build the boot-time session. Fails if the settings do not fit the
    /// picture table.
    pub fn new(settings: &Settings, total_pictures: usize) -> Result<Self, ConfigError> {
        settings.validate(total_pictures)?;
        Ok(Self {
            view_mode: settings.default_view,
            picture_index: settings.default_picture,
            total_pictures: total_pictures.min(u8::MAX as usize) as u8,
            override_randomizer: false,
            randomize_every_refresh: settings.randomize_every_refresh,
            once: OnceFlags::default(),
        })
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn picture_index(&self) -> u8 {
        self.picture_index
    }

    pub fn total_pictures(&self) -> u8 {
        self.total_pictures
    }

    pub fn override_randomizer(&self) -> bool {
        self.override_randomizer
    }

    pub fn randomize_every_refresh(&self) -> bool {
        self.randomize_every_refresh
    }

    pub fn once(&self) -> OnceFlags {
        self.once
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }

    /// Select the picture for the `n`th press of button 2 (1-based),
    /// wrapping around the picture table.
    pub fn select_picture_by_presses(&mut self, presses: u32) {
        let index = presses.saturating_sub(1) % u32::from(self.total_pictures);
        self.picture_index = index as u8;
        self.override_randomizer = true;
    }

    pub fn request_plot(&mut self) {
        self.once.show_plot = true;
    }

    /// Pick the picture for a scheduled refresh. With randomizing enabled
    /// and no explicit choice this refresh, `entropy` decides.
    pub fn prepare_refresh(&mut self, entropy: u32) {
        if self.randomize_every_refresh && !self.override_randomizer {
            self.picture_index = (entropy % u32::from(self.total_pictures)) as u8;
        }
    }

    /// Drop the flags that only applied to one render.
    pub fn clear_once_flags(&mut self) {
        self.override_randomizer = false;
        self.once = OnceFlags::default();
    }

    /// Apply settings edited at runtime. The picture index is reset to the
    /// new default so the invariant against the picture table holds.
    pub fn apply_settings(&mut self, settings: &Settings) -> Result<(), ConfigError> {
        settings.validate(usize::from(self.total_pictures))?;
        self.picture_index = settings.default_picture;
        self.randomize_every_refresh = settings.randomize_every_refresh;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(total: usize) -> SessionState {
        SessionState::new(&Settings::default(), total).unwrap()
    }

    #[test]
    fn view_toggles_both_ways() {
        let mut s = session(3);
        assert_eq!(s.view_mode(), ViewMode::Primary);
        s.toggle_view();
        assert_eq!(s.view_mode(), ViewMode::Secondary);
        s.toggle_view();
        assert_eq!(s.view_mode(), ViewMode::Primary);
    }

    #[test]
    fn picture_selection_wraps() {
        let mut s = session(4);
        s.select_picture_by_presses(5);
        assert_eq!(s.picture_index(), 0);
        s.select_picture_by_presses(3);
        assert_eq!(s.picture_index(), 2);
        assert!(s.override_randomizer());
    }

    #[test]
    fn randomizer_respects_override() {
        let settings = Settings {
            randomize_every_refresh: true,
            ..Settings::default()
        };
        let mut s = SessionState::new(&settings, 5).unwrap();
        s.prepare_refresh(13);
        assert_eq!(s.picture_index(), 3);

        s.select_picture_by_presses(1);
        s.prepare_refresh(13);
        assert_eq!(s.picture_index(), 0);

        s.clear_once_flags();
        s.prepare_refresh(14);
        assert_eq!(s.picture_index(), 4);
    }

    #[test]
    fn randomizer_off_keeps_selection() {
        let mut s = session(5);
        s.prepare_refresh(13);
        assert_eq!(s.picture_index(), 0);
    }

    #[test]
    fn new_rejects_invalid_settings() {
        assert_eq!(
            SessionState::new(&Settings::default(), 0),
            Err(ConfigError::NoPictures)
        );
    }

    #[test]
    fn apply_settings_resets_picture() {
        let mut s = session(4);
        s.select_picture_by_presses(3);
        let settings = Settings {
            default_picture: 1,
            randomize_every_refresh: true,
            ..Settings::default()
        };
        s.apply_settings(&settings).unwrap();
        assert_eq!(s.picture_index(), 1);
        assert!(s.randomize_every_refresh());

        let bad = Settings {
            default_picture: 9,
            ..Settings::default()
        };
        assert!(s.apply_settings(&bad).is_err());
        assert_eq!(s.picture_index(), 1);
    }
}
