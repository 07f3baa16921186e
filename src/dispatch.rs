//! Gesture → action table.
//!
//! | Gesture          | Action                                         |
//! |------------------|------------------------------------------------|
//! | (3, 3)           | enter the settings menu                        |
//! | (1, 0)           | toggle outdoor / indoor view                   |
//! | (2, 0)           | draw the temperature plot on the next refresh  |
//! | (≥3, 0)          | show the info screen right away                |
//! | (0, n ≥ 1)       | show picture `(n - 1) mod total` next refresh  |
//!
//! Button-1 rules apply only when button 2 was not pressed, and vice versa;
//! every other shape is ignored.

use crate::gesture::Gesture;
use crate::session::SessionState;

/// Screens a frame producer can compose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Screen {
    /// Weather readings plus picture (or plot).
    Main,
    /// Device and settings summary.
    Info,
}

/// What the loop must do after a gesture has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SchedulerCommand {
    /// Nothing changed.
    None,
    /// Session changed; refresh on the next tick.
    Invalidate,
    /// Render this screen immediately, outside the schedule.
    RenderOnce(Screen),
    /// Hand the buttons to the settings menu until it exits.
    EnterSubMode,
}

/// Apply a completed gesture to the session.
pub fn dispatch(gesture: Gesture, session: &mut SessionState) -> SchedulerCommand {
    let Gesture { n1, n2 } = gesture;

    if n1 == 3 && n2 == 3 {
        return SchedulerCommand::EnterSubMode;
    }

    let mut command = SchedulerCommand::None;

    if n2 == 0 {
        match n1 {
            0 => {}
            1 => {
                session.toggle_view();
                debug!("dispatch: view -> {}", session.view_mode());
                command = SchedulerCommand::Invalidate;
            }
            2 => {
                session.request_plot();
                command = SchedulerCommand::Invalidate;
            }
            _ => command = SchedulerCommand::RenderOnce(Screen::Info),
        }
    }

    if n1 == 0 && n2 >= 1 {
        session.select_picture_by_presses(n2);
        debug!("dispatch: picture -> {}", session.picture_index());
        command = SchedulerCommand::Invalidate;
    }

    if command == SchedulerCommand::None {
        info!("dispatch: ignoring gesture ({}, {})", n1, n2);
    }

    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::session::ViewMode;

    fn session(total: usize) -> SessionState {
        SessionState::new(&Settings::default(), total).unwrap()
    }

    #[test]
    fn single_press_toggles_view() {
        let mut s = session(3);
        assert_eq!(
            dispatch(Gesture::new(1, 0), &mut s),
            SchedulerCommand::Invalidate
        );
        assert_eq!(s.view_mode(), ViewMode::Secondary);
    }

    #[test]
    fn double_press_requests_plot() {
        let mut s = session(3);
        assert_eq!(
            dispatch(Gesture::new(2, 0), &mut s),
            SchedulerCommand::Invalidate
        );
        assert!(s.once().show_plot);
        assert_eq!(s.view_mode(), ViewMode::Primary);
    }

    #[test]
    fn triple_or_more_shows_info_without_touching_view() {
        for n1 in [3, 4, 9] {
            let mut s = session(3);
            assert_eq!(
                dispatch(Gesture::new(n1, 0), &mut s),
                SchedulerCommand::RenderOnce(Screen::Info)
            );
            assert_eq!(s, session(3));
        }
    }

    #[test]
    fn button2_picks_picture() {
        let mut s = session(5);
        assert_eq!(
            dispatch(Gesture::new(0, 3), &mut s),
            SchedulerCommand::Invalidate
        );
        assert_eq!(s.picture_index(), 2);
        assert!(s.override_randomizer());
    }

    #[test]
    fn triple_triple_enters_sub_mode_and_leaves_session() {
        let mut s = session(5);
        assert_eq!(
            dispatch(Gesture::new(3, 3), &mut s),
            SchedulerCommand::EnterSubMode
        );
        assert_eq!(s, session(5));
    }

    #[test]
    fn mixed_gestures_are_ignored() {
        for (n1, n2) in [(1, 1), (2, 4), (3, 1), (4, 3)] {
            let mut s = session(5);
            assert_eq!(
                dispatch(Gesture::new(n1, n2), &mut s),
                SchedulerCommand::None
            );
            assert_eq!(s, session(5));
        }
    }

    #[test]
    fn empty_gesture_is_ignored() {
        let mut s = session(2);
        assert_eq!(
            dispatch(Gesture::default(), &mut s),
            SchedulerCommand::None
        );
    }
}
