//! Tick-driven core of the main loop.
//!
//! The [`Controller`] owns the gesture counter, the refresh scheduler and
//! the session. Each [`Controller::tick`]:
//!
//! 1. renders a pending one-shot screen, or else the main screen if it is
//!    due, feeding the result back to the scheduler;
//! 2. clears one-shot session flags, unless the main screen is still due;
//! 3. samples both buttons once and, when a gesture completes, dispatches it.
//!
//! At most one frame is produced per tick. A one-shot screen requested while
//! this tick already rendered, or whose render failed, waits in a pending
//! slot and is drawn on a later tick ahead of the schedule.
//!
//! A gesture's effect therefore becomes visible on the following tick. The
//! hardware is reached only through the small traits below, so the whole
//! loop runs on the host under test.

#[cfg(test)]
mod tests;

use crate::config::{Settings, RENDER_TIMEOUT_MS};
use crate::dispatch::{dispatch, SchedulerCommand, Screen};
use crate::error::{ConfigError, Error, RenderError, TransientError};
use crate::gesture::{ButtonPressCounter, Gesture};
use crate::scheduler::RefreshScheduler;
use crate::session::SessionState;

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Normalized button levels: `true` means physically pressed.
pub trait InputSource {
    fn pressed1(&mut self) -> bool;
    fn pressed2(&mut self) -> bool;
}

/// Entropy for picture randomizing.
pub trait RandomSource {
    fn next_u32(&mut self) -> u32;
}

/// Composes a frame for the display.
pub trait FrameProducer {
    type Frame;

    fn produce(&mut self, screen: Screen, session: &SessionState)
        -> Result<Self::Frame, RenderError>;
}

/// Shows a composed frame. Driver failures are handled below this layer.
pub trait DisplaySink<F> {
    fn present(&mut self, frame: F);
}

/// Result of one render attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshOutcome {
    Presented,
    Failed(TransientError),
}

/// What happened during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Scheduled render of the main screen, if one was due.
    pub refresh: Option<RefreshOutcome>,
    /// Render of a one-shot screen, if one was attempted.
    pub one_shot: Option<(Screen, RefreshOutcome)>,
    /// Gesture completed this tick.
    pub gesture: Option<Gesture>,
    /// Command the gesture produced.
    pub command: SchedulerCommand,
}

impl TickReport {
    /// A render failed; pause before the next tick.
    pub fn should_back_off(&self) -> bool {
        matches!(self.refresh, Some(RefreshOutcome::Failed(_)))
            || matches!(self.one_shot, Some((_, RefreshOutcome::Failed(_))))
    }

    /// The settings menu must take over the buttons.
    pub fn enter_sub_mode(&self) -> bool {
        self.command == SchedulerCommand::EnterSubMode
    }
}

pub struct Controller {
    counter: ButtonPressCounter,
    scheduler: RefreshScheduler,
    session: SessionState,
    settings: Settings,
    pending: Option<Screen>,
    render_timeout_ms: u64,
}

impl Controller {
    /// Validate the startup configuration and build the loop state.
    pub fn new(settings: Settings, total_pictures: usize) -> Result<Self, ConfigError> {
        let session = SessionState::new(&settings, total_pictures)?;
        info!(
            "controller: window={}ms interval={}s pictures={}",
            settings.resetting_window_ms,
            settings.refresh_interval_secs,
            total_pictures
        );
        Ok(Self {
            counter: ButtonPressCounter::new(u64::from(settings.resetting_window_ms)),
            scheduler: RefreshScheduler::new(settings.refresh_interval_ms()),
            session,
            settings,
            pending: None,
            render_timeout_ms: RENDER_TIMEOUT_MS,
        })
    }

    /// Frames that take longer than `timeout_ms` to produce are discarded.
    ///
    /// The producer is synchronous, so this does not cut a slow call short;
    /// it only keeps a late frame off the display.
    pub fn with_render_timeout(mut self, timeout_ms: u64) -> Self {
        self.render_timeout_ms = timeout_ms;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// One-shot screen waiting for its render.
    pub fn pending_screen(&self) -> Option<Screen> {
        self.pending
    }

    /// Run one loop iteration.
    ///
    /// Only a contract violation by the producer is an error; the loop must
    /// stop on it.
    pub fn tick<C, I, R, P, D>(
        &mut self,
        clock: &C,
        input: &mut I,
        rng: &mut R,
        producer: &mut P,
        sink: &mut D,
    ) -> Result<TickReport, Error>
    where
        C: Clock,
        I: InputSource,
        R: RandomSource,
        P: FrameProducer,
        D: DisplaySink<P::Frame>,
    {
        let now = clock.now_ms();
        let mut refresh = None;
        let mut one_shot = None;

        if let Some(screen) = self.pending {
            let outcome = self.render_once(clock, screen, producer, sink)?;
            one_shot = Some((screen, outcome));
        } else if self.scheduler.is_due(now) {
            self.session.prepare_refresh(rng.next_u32());
            let outcome = self.render(clock, Screen::Main, producer, sink)?;
            match outcome {
                RefreshOutcome::Presented => self.scheduler.record_result(now, true),
                RefreshOutcome::Failed(e) => {
                    warn!("refresh failed: {}", e);
                    self.scheduler.record_result(now, false);
                }
            }
            refresh = Some(outcome);
        }

        // Kept while the main screen still owes a render that honors them.
        if !self.scheduler.is_due(now) {
            self.session.clear_once_flags();
        }

        let pressed1 = input.pressed1();
        let pressed2 = input.pressed2();
        let now = clock.now_ms();

        let mut gesture = None;
        let mut command = SchedulerCommand::None;

        if self.counter.observe(now, pressed1, pressed2) {
            let g = self.counter.gesture();
            info!("gesture: ({}, {})", g.n1, g.n2);
            command = dispatch(g, &mut self.session);

            match command {
                SchedulerCommand::None => {}
                SchedulerCommand::Invalidate => self.scheduler.invalidate(),
                SchedulerCommand::RenderOnce(screen) => {
                    self.pending = Some(screen);
                    if refresh.is_none() && one_shot.is_none() {
                        let outcome = self.render_once(clock, screen, producer, sink)?;
                        one_shot = Some((screen, outcome));
                    } else {
                        debug!("{} screen deferred to next tick", screen);
                    }
                }
                SchedulerCommand::EnterSubMode => info!("entering settings menu"),
            }
            gesture = Some(g);
        }

        Ok(TickReport {
            refresh,
            one_shot,
            gesture,
            command,
        })
    }

    /// Render the pending one-shot screen; it stays pending on failure.
    fn render_once<C, P, D>(
        &mut self,
        clock: &C,
        screen: Screen,
        producer: &mut P,
        sink: &mut D,
    ) -> Result<RefreshOutcome, Error>
    where
        C: Clock,
        P: FrameProducer,
        D: DisplaySink<P::Frame>,
    {
        let outcome = self.render(clock, screen, producer, sink)?;
        match outcome {
            RefreshOutcome::Presented => self.pending = None,
            RefreshOutcome::Failed(e) => warn!("{} screen not shown, retrying: {}", screen, e),
        }
        Ok(outcome)
    }

    fn render<C, P, D>(
        &self,
        clock: &C,
        screen: Screen,
        producer: &mut P,
        sink: &mut D,
    ) -> Result<RefreshOutcome, Error>
    where
        C: Clock,
        P: FrameProducer,
        D: DisplaySink<P::Frame>,
    {
        let started = clock.now_ms();
        let frame = match producer.produce(screen, &self.session) {
            Ok(frame) => frame,
            Err(RenderError::Transient(e)) => return Ok(RefreshOutcome::Failed(e)),
            Err(RenderError::Contract(v)) => {
                error!("producer contract violation: {}", v);
                return Err(Error::Contract(v));
            }
        };

        let elapsed = clock.now_ms().saturating_sub(started);
        if elapsed > self.render_timeout_ms {
            warn!("render took {}ms, discarding frame", elapsed);
            return Ok(RefreshOutcome::Failed(TransientError::Timeout));
        }

        sink.present(frame);
        debug!("presented {} screen", screen);
        Ok(RefreshOutcome::Presented)
    }

    /// Resume normal dispatch after the settings menu returns.
    ///
    /// Valid settings replace the current ones; the display refreshes on the
    /// next tick either way. Settings equal to the current ones leave the
    /// session alone, so a discarded menu keeps the selected picture.
    pub fn resume_after_sub_mode(&mut self, settings: Settings) -> Result<(), ConfigError> {
        self.counter.restart();
        self.scheduler.invalidate();
        self.pending = None;

        if settings == self.settings {
            info!("settings menu closed, unchanged");
            return Ok(());
        }
        self.session.apply_settings(&settings)?;
        self.counter
            .set_resetting_window(u64::from(settings.resetting_window_ms));
        self.scheduler.set_interval(settings.refresh_interval_ms());
        self.settings = settings;
        info!("settings menu closed");
        Ok(())
    }
}
