//! Multi-press gesture counting for the two push-buttons.
//!
//! Raw levels are sampled once per tick. Only rising edges count, so a
//! held button is one press no matter how long it stays down. Presses
//! accumulate until the buttons have been quiet for longer than the
//! resetting window; the tick that notices the quiet period reports the
//! gesture, and the counts are cleared at the start of the following tick.

/// Press counts of one completed gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Gesture {
    /// Presses of button 1.
    pub n1: u32,
    /// Presses of button 2.
    pub n2: u32,
}

impl Gesture {
    pub const fn new(n1: u32, n2: u32) -> Self {
        Self { n1, n2 }
    }
}

/// Level-to-edge converter for a single button.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    prev_pressed: bool,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self {
            prev_pressed: false,
        }
    }

    /// Start as if the button were down, so it must be released before
    /// the first press counts.
    pub const fn held() -> Self {
        Self { prev_pressed: true }
    }

    /// Feed the current level; true on a released → pressed transition.
    pub fn rising(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.prev_pressed;
        self.prev_pressed = pressed;
        edge
    }
}

/// Debounced press counter for two buttons.
#[derive(Debug)]
pub struct ButtonPressCounter {
    n1: u32,
    n2: u32,
    last_edge_ms: Option<u64>,
    pending_reset: bool,
    resetting_window_ms: u64,
    button1: EdgeDetector,
    button2: EdgeDetector,
}

impl ButtonPressCounter {
    pub const fn new(resetting_window_ms: u64) -> Self {
        Self {
            n1: 0,
            n2: 0,
            last_edge_ms: None,
            pending_reset: false,
            resetting_window_ms,
            button1: EdgeDetector::new(),
            button2: EdgeDetector::new(),
        }
    }

    /// Advance by one tick. Returns true iff a gesture just completed.
    ///
    /// When this returns true, [`Self::gesture`] holds the final counts
    /// until the next call.
    pub fn observe(&mut self, now_ms: u64, pressed1: bool, pressed2: bool) -> bool {
        if self.pending_reset {
            self.n1 = 0;
            self.n2 = 0;
            self.last_edge_ms = None;
            self.pending_reset = false;
        }

        if self.button1.rising(pressed1) {
            self.n1 = self.n1.saturating_add(1);
            self.last_edge_ms = Some(now_ms);
        }
        if self.button2.rising(pressed2) {
            self.n2 = self.n2.saturating_add(1);
            self.last_edge_ms = Some(now_ms);
        }

        match self.last_edge_ms {
            Some(edge) if now_ms.saturating_sub(edge) > self.resetting_window_ms => {
                self.pending_reset = true;
                true
            }
            _ => false,
        }
    }

    /// Drop any burst in progress. Buttons that are down right now must be
    /// released before they count again.
    pub fn restart(&mut self) {
        self.n1 = 0;
        self.n2 = 0;
        self.last_edge_ms = None;
        self.pending_reset = false;
        self.button1 = EdgeDetector::held();
        self.button2 = EdgeDetector::held();
    }

    pub fn press_count1(&self) -> u32 {
        self.n1
    }

    pub fn press_count2(&self) -> u32 {
        self.n2
    }

    /// Both counts as one value.
    pub fn gesture(&self) -> Gesture {
        Gesture::new(self.n1, self.n2)
    }

    pub fn resetting_window_ms(&self) -> u64 {
        self.resetting_window_ms
    }

    /// Change the window. Takes effect for the burst in progress.
    pub fn set_resetting_window(&mut self, window_ms: u64) {
        self.resetting_window_ms = window_ms;
    }
}
