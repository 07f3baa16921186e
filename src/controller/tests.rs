//! Unit tests for the tick loop.
//!
//! These tests run on the host with a fake clock, scripted frame producer
//! and recording sink, so every timing decision is deterministic.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use super::*;
use crate::error::ContractViolation;
use crate::session::ViewMode;

// ═══════════════════════════════════════════════════════════════════════════
// Test doubles
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Clone, Default)]
struct FakeClock(Rc<Cell<u64>>);

impl FakeClock {
    fn set(&self, ms: u64) {
        self.0.set(ms);
    }

    fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}

#[derive(Default)]
struct Buttons {
    b1: bool,
    b2: bool,
}

impl InputSource for Buttons {
    fn pressed1(&mut self) -> bool {
        self.b1
    }

    fn pressed2(&mut self) -> bool {
        self.b2
    }
}

struct FixedRng(u32);

impl RandomSource for FixedRng {
    fn next_u32(&mut self) -> u32 {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Frame {
    screen: Screen,
    view: ViewMode,
    picture: u8,
    plot: bool,
}

struct Producer {
    clock: FakeClock,
    script: VecDeque<Result<(), RenderError>>,
    cost_ms: u64,
    calls: usize,
}

impl FrameProducer for Producer {
    type Frame = Frame;

    fn produce(&mut self, screen: Screen, session: &SessionState) -> Result<Frame, RenderError> {
        self.calls += 1;
        self.clock.advance(self.cost_ms);
        self.script.pop_front().unwrap_or(Ok(()))?;
        Ok(Frame {
            screen,
            view: session.view_mode(),
            picture: session.picture_index(),
            plot: session.once().show_plot,
        })
    }
}

#[derive(Default)]
struct Sink {
    frames: Vec<Frame>,
}

impl DisplaySink<Frame> for Sink {
    fn present(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

struct Rig {
    clock: FakeClock,
    buttons: Buttons,
    rng: FixedRng,
    producer: Producer,
    sink: Sink,
    controller: Controller,
}

impl Rig {
    fn new(settings: Settings, pictures: usize) -> Self {
        let clock = FakeClock::default();
        Self {
            producer: Producer {
                clock: clock.clone(),
                script: VecDeque::new(),
                cost_ms: 0,
                calls: 0,
            },
            clock,
            buttons: Buttons::default(),
            rng: FixedRng(0),
            sink: Sink::default(),
            controller: Controller::new(settings, pictures).unwrap(),
        }
    }

    fn try_tick(&mut self, at_ms: u64, b1: bool, b2: bool) -> Result<TickReport, Error> {
        self.clock.set(at_ms);
        self.buttons.b1 = b1;
        self.buttons.b2 = b2;
        self.controller.tick(
            &self.clock,
            &mut self.buttons,
            &mut self.rng,
            &mut self.producer,
            &mut self.sink,
        )
    }

    fn tick(&mut self, at_ms: u64, b1: bool, b2: bool) -> TickReport {
        self.try_tick(at_ms, b1, b2).unwrap()
    }

    /// Tap buttons at `at_ms`, release 100 ms later.
    fn tap(&mut self, at_ms: u64, b1: bool, b2: bool) {
        self.tick(at_ms, b1, b2);
        self.tick(at_ms + 100, false, false);
    }

    fn last_frame(&self) -> &Frame {
        self.sink.frames.last().unwrap()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Scheduling
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn first_tick_renders_main_screen() {
    let mut rig = Rig::new(Settings::default(), 3);
    let report = rig.tick(0, false, false);
    assert_eq!(report.refresh, Some(RefreshOutcome::Presented));
    assert_eq!(report.gesture, None);
    assert_eq!(rig.last_frame().screen, Screen::Main);
    assert_eq!(rig.controller.scheduler().last_refresh(), Some(0));
}

#[test]
fn renders_again_only_after_interval() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    assert_eq!(rig.tick(100, false, false).refresh, None);
    assert_eq!(rig.tick(300_000, false, false).refresh, None);
    assert_eq!(
        rig.tick(300_100, false, false).refresh,
        Some(RefreshOutcome::Presented)
    );
    assert_eq!(rig.sink.frames.len(), 2);
}

#[test]
fn transient_failure_is_retried_without_waiting_interval() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.producer
        .script
        .push_back(Err(TransientError::SourceBusy.into()));

    let report = rig.tick(0, false, false);
    assert_eq!(
        report.refresh,
        Some(RefreshOutcome::Failed(TransientError::SourceBusy))
    );
    assert!(report.should_back_off());
    assert!(rig.sink.frames.is_empty());
    assert_eq!(rig.controller.scheduler().last_refresh(), None);

    let report = rig.tick(3_000, false, false);
    assert_eq!(report.refresh, Some(RefreshOutcome::Presented));
    assert_eq!(rig.controller.scheduler().last_refresh(), Some(3_000));
}

#[test]
fn slow_render_counts_as_transient_failure() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.controller = Controller::new(Settings::default(), 3)
        .unwrap()
        .with_render_timeout(5_000);
    rig.producer.cost_ms = 6_000;

    let report = rig.tick(0, false, false);
    assert_eq!(
        report.refresh,
        Some(RefreshOutcome::Failed(TransientError::Timeout))
    );
    assert!(rig.sink.frames.is_empty());
    assert!(rig.controller.scheduler().is_due(6_100));
}

#[test]
fn contract_violation_stops_the_loop() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.producer
        .script
        .push_back(Err(ContractViolation::EmptyFrame.into()));
    assert_eq!(
        rig.try_tick(0, false, false),
        Err(Error::Contract(ContractViolation::EmptyFrame))
    );
    assert!(rig.sink.frames.is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// Gestures
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn view_toggle_is_rendered_on_next_tick() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    rig.tap(100, true, false);

    let report = rig.tick(2_200, false, false);
    assert_eq!(report.gesture, Some(Gesture::new(1, 0)));
    assert_eq!(report.command, SchedulerCommand::Invalidate);
    assert_eq!(report.refresh, None);
    assert_eq!(rig.sink.frames.len(), 1);

    let report = rig.tick(2_300, false, false);
    assert_eq!(report.refresh, Some(RefreshOutcome::Presented));
    assert_eq!(rig.last_frame().view, ViewMode::Secondary);
}

#[test]
fn picture_gesture_overrides_randomizer_for_one_refresh() {
    let settings = Settings {
        randomize_every_refresh: true,
        ..Settings::default()
    };
    let mut rig = Rig::new(settings, 5);
    rig.rng = FixedRng(4);

    rig.tick(0, false, false);
    assert_eq!(rig.last_frame().picture, 4);

    rig.tap(100, false, true);
    rig.tap(300, false, true);
    rig.tap(500, false, true);
    let report = rig.tick(2_600, false, false);
    assert_eq!(report.gesture, Some(Gesture::new(0, 3)));

    rig.tick(2_700, false, false);
    assert_eq!(rig.last_frame().picture, 2);
    assert!(!rig.controller.session().override_randomizer());

    rig.tick(2_700 + 300_001, false, false);
    assert_eq!(rig.last_frame().picture, 4);
}

#[test]
fn plot_flag_applies_to_one_render() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    rig.tap(100, true, false);
    rig.tap(300, true, false);
    assert_eq!(
        rig.tick(2_400, false, false).gesture,
        Some(Gesture::new(2, 0))
    );

    rig.tick(2_500, false, false);
    assert!(rig.last_frame().plot);

    rig.tick(2_500 + 300_001, false, false);
    assert!(!rig.last_frame().plot);
}

#[test]
fn plot_flag_survives_failed_render() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    rig.tap(100, true, false);
    rig.tap(300, true, false);
    rig.tick(2_400, false, false);

    rig.producer
        .script
        .push_back(Err(TransientError::SourceUnavailable.into()));
    assert!(rig.tick(2_500, false, false).should_back_off());

    rig.tick(5_500, false, false);
    assert!(rig.last_frame().plot);
}

#[test]
fn info_screen_bypasses_schedule() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    rig.tap(100, true, false);
    rig.tap(300, true, false);
    rig.tap(500, true, false);

    let report = rig.tick(2_600, false, false);
    assert_eq!(report.command, SchedulerCommand::RenderOnce(Screen::Info));
    assert_eq!(rig.last_frame().screen, Screen::Info);
    assert_eq!(rig.last_frame().view, ViewMode::Primary);
    assert_eq!(rig.controller.scheduler().last_refresh(), Some(0));

    assert_eq!(rig.tick(2_700, false, false).refresh, None);
}

#[test]
fn failed_info_screen_is_retried_after_back_off() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    for t in [100, 300, 500] {
        rig.tap(t, true, false);
    }
    rig.producer
        .script
        .push_back(Err(TransientError::SourceBusy.into()));

    let report = rig.tick(2_600, false, false);
    assert_eq!(report.command, SchedulerCommand::RenderOnce(Screen::Info));
    assert_eq!(
        report.one_shot,
        Some((Screen::Info, RefreshOutcome::Failed(TransientError::SourceBusy)))
    );
    assert!(report.should_back_off());
    assert_eq!(rig.controller.pending_screen(), Some(Screen::Info));
    assert_eq!(rig.sink.frames.len(), 1);

    let report = rig.tick(5_600, false, false);
    assert_eq!(report.one_shot, Some((Screen::Info, RefreshOutcome::Presented)));
    assert_eq!(report.refresh, None);
    assert_eq!(rig.last_frame().screen, Screen::Info);
    assert_eq!(rig.controller.pending_screen(), None);
}

#[test]
fn info_gesture_on_due_tick_renders_once_per_tick() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    for t in [299_000, 299_200, 299_400] {
        rig.tap(t, true, false);
    }

    let calls = rig.producer.calls;
    let report = rig.tick(301_600, false, false);
    assert_eq!(report.refresh, Some(RefreshOutcome::Presented));
    assert_eq!(report.command, SchedulerCommand::RenderOnce(Screen::Info));
    assert_eq!(report.one_shot, None);
    assert_eq!(rig.producer.calls - calls, 1);
    assert_eq!(rig.last_frame().screen, Screen::Main);

    let report = rig.tick(301_700, false, false);
    assert_eq!(report.one_shot, Some((Screen::Info, RefreshOutcome::Presented)));
    assert_eq!(report.refresh, None);
    assert_eq!(rig.producer.calls - calls, 2);
    assert_eq!(rig.last_frame().screen, Screen::Info);
}

#[test]
fn pending_info_screen_delays_due_refresh_and_keeps_flags() {
    let mut rig = Rig::new(Settings::default(), 3);
    rig.tick(0, false, false);
    for t in [100, 300, 500] {
        rig.tap(t, true, false);
    }
    // The source stays busy for every tick up to and including 5_000.
    for _ in 0..6 {
        rig.producer
            .script
            .push_back(Err(TransientError::SourceBusy.into()));
    }
    rig.tick(2_600, false, false);

    // Two presses while the info screen is still owed: plot requested.
    rig.tap(2_700, true, false);
    rig.tap(2_900, true, false);
    let report = rig.tick(5_000, false, false);
    assert_eq!(report.gesture, Some(Gesture::new(2, 0)));
    assert_eq!(rig.sink.frames.len(), 1);

    let report = rig.tick(5_100, false, false);
    assert_eq!(report.one_shot, Some((Screen::Info, RefreshOutcome::Presented)));
    assert_eq!(report.refresh, None);
    assert!(rig.controller.session().once().show_plot);

    let report = rig.tick(5_200, false, false);
    assert_eq!(report.refresh, Some(RefreshOutcome::Presented));
    assert_eq!(rig.last_frame().screen, Screen::Main);
    assert!(rig.last_frame().plot);
}

// ═══════════════════════════════════════════════════════════════════════════
// Sub-mode
// ═══════════════════════════════════════════════════════════════════════════

fn enter_sub_mode(rig: &mut Rig) {
    rig.tick(0, false, false);
    for t in [100, 300, 500] {
        rig.tap(t, true, true);
    }
    let report = rig.tick(2_600, false, false);
    assert_eq!(report.gesture, Some(Gesture::new(3, 3)));
    assert!(report.enter_sub_mode());
}

#[test]
fn resume_applies_settings_and_refreshes() {
    let mut rig = Rig::new(Settings::default(), 4);
    enter_sub_mode(&mut rig);

    let edited = Settings {
        default_picture: 3,
        resetting_window_ms: 1_000,
        ..Settings::default()
    };
    rig.controller.resume_after_sub_mode(edited).unwrap();
    assert_eq!(rig.controller.settings(), &edited);
    assert!(rig.controller.scheduler().is_due(60_000));

    rig.tick(60_000, false, false);
    assert_eq!(rig.last_frame().picture, 3);

    // The shorter window is in effect.
    rig.tap(60_100, true, false);
    assert_eq!(
        rig.tick(61_200, false, false).gesture,
        Some(Gesture::new(1, 0))
    );
}

#[test]
fn resume_with_invalid_settings_keeps_previous() {
    let mut rig = Rig::new(Settings::default(), 2);
    enter_sub_mode(&mut rig);

    let bad = Settings {
        default_picture: 7,
        ..Settings::default()
    };
    assert_eq!(
        rig.controller.resume_after_sub_mode(bad),
        Err(ConfigError::DefaultPictureOutOfRange { index: 7, total: 2 })
    );
    assert_eq!(rig.controller.settings(), &Settings::default());
    assert!(rig.controller.scheduler().is_due(60_000));
}

#[test]
fn discarded_menu_keeps_selected_picture() {
    let mut rig = Rig::new(Settings::default(), 4);
    rig.tick(0, false, false);
    rig.tap(100, false, true);
    rig.tap(300, false, true);
    rig.tick(2_400, false, false);
    assert_eq!(rig.controller.session().picture_index(), 1);

    for t in [3_000, 3_200, 3_400] {
        rig.tap(t, true, true);
    }
    assert!(rig.tick(5_500, false, false).enter_sub_mode());

    rig.controller
        .resume_after_sub_mode(Settings::default())
        .unwrap();
    rig.tick(60_000, false, false);
    assert_eq!(rig.last_frame().picture, 1);
}

#[test]
fn construction_rejects_bad_configuration() {
    assert!(matches!(
        Controller::new(Settings::default(), 0),
        Err(ConfigError::NoPictures)
    ));
}
