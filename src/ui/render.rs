//! Screen composition from the weather log and the session.
//!
//! Main screen layout (128×64):
//! ```text
//! Outdoor          ┌────────┐
//! -2.5 C           │picture │
//! 81.0 %           │ or plot│
//! 12:35            └────────┘
//! ```

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::Instant;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};
use heapless::String;
use wxframe::config::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use wxframe::controller::FrameProducer;
use wxframe::dispatch::Screen;
use wxframe::error::{ContractViolation, RenderError, TransientError};
use wxframe::session::SessionState;
use wxframe::weather::WeatherLog;

use super::display::{large_text, small_text, Frame};
use super::pictures::{PICTURES, PICTURE_SIZE};

pub type SharedLog = Mutex<CriticalSectionRawMutex, WeatherLog>;

/// Plot area, right half of the panel below the title row.
const PLOT_AREA: Rectangle = Rectangle::new(
    Point::new((DISPLAY_WIDTH / 2) as i32, 12),
    Size::new(DISPLAY_WIDTH / 2, DISPLAY_HEIGHT - 12),
);

pub struct WeatherRenderer {
    log: &'static SharedLog,
}

impl WeatherRenderer {
    pub fn new(log: &'static SharedLog) -> Self {
        Self { log }
    }
}

impl FrameProducer for WeatherRenderer {
    type Frame = Frame;

    fn produce(&mut self, screen: Screen, session: &SessionState) -> Result<Frame, RenderError> {
        // The USB task holds the lock only while appending a line.
        let log = self
            .log
            .try_lock()
            .map_err(|_| TransientError::SourceBusy)?;

        let mut frame = Frame::new();
        match screen {
            Screen::Main => draw_main(&mut frame, &log, session)?,
            Screen::Info => draw_info(&mut frame, &log, session)?,
        }
        Ok(frame)
    }
}

fn draw_main(
    frame: &mut Frame,
    log: &WeatherLog,
    session: &SessionState,
) -> Result<(), RenderError> {
    let record = log.latest().ok_or(TransientError::SourceUnavailable)?;
    let view = session.view_mode();
    let sample = record.sample(view);

    let mut line: String<16> = String::new();
    text(frame, view.title(), Point::new(0, 0), false);

    write!(line, "{:.1} C", sample.temperature).map_err(|_| TransientError::Malformed)?;
    text(frame, &line, Point::new(0, 14), true);

    line.clear();
    write!(line, "{:.1} %", sample.humidity).map_err(|_| TransientError::Malformed)?;
    text(frame, &line, Point::new(0, 38), false);
    text(frame, &record.time, Point::new(0, 52), false);

    if session.once().show_plot {
        draw_plot(frame, log, session)?;
    } else {
        let index = session.picture_index();
        let picture = PICTURES
            .get(usize::from(index))
            .ok_or(ContractViolation::PictureOutOfRange { index })?;
        let corner = Point::new(
            (DISPLAY_WIDTH - PICTURE_SIZE) as i32,
            (DISPLAY_HEIGHT - PICTURE_SIZE) as i32,
        );
        picture.draw(frame, corner);
    }
    Ok(())
}

/// Temperature history of the current view as a line chart.
fn draw_plot(
    frame: &mut Frame,
    log: &WeatherLog,
    session: &SessionState,
) -> Result<(), RenderError> {
    let view = session.view_mode();
    let (lo, hi) = log
        .temperature_range(view)
        .ok_or(TransientError::SourceUnavailable)?;

    let mut label: String<12> = String::new();
    write!(label, "{:.0}..{:.0}", lo, hi).map_err(|_| TransientError::Malformed)?;
    text(frame, &label, PLOT_AREA.top_left - Point::new(0, 12), false);

    let _ = PLOT_AREA
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(frame);

    let span = if hi - lo < 0.1 { 1.0 } else { hi - lo };
    let inner = PLOT_AREA.offset(-2);
    let count = log.temperatures(view).count().max(2) as i32;
    let w = inner.size.width as i32 - 1;
    let h = inner.size.height as i32 - 1;

    let mut prev: Option<Point> = None;
    for (i, t) in log.temperatures(view).enumerate() {
        let x = i as i32 * w / (count - 1);
        let y = h - (((t - lo) / span) * h as f32) as i32;
        let p = inner.top_left + Point::new(x, y);
        if let Some(q) = prev {
            let _ = Line::new(q, p)
                .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
                .draw(frame);
        }
        prev = Some(p);
    }
    Ok(())
}

fn draw_info(
    frame: &mut Frame,
    log: &WeatherLog,
    session: &SessionState,
) -> Result<(), RenderError> {
    text(frame, "wxframe", Point::new(0, 0), false);

    let mut line: String<24> = String::new();
    let mut row = |frame: &mut Frame, y: i32, args: fmt::Arguments<'_>| {
        line.clear();
        line.write_fmt(args).map_err(|_| TransientError::Malformed)?;
        text(frame, &line, Point::new(0, y), false);
        Ok::<(), RenderError>(())
    };

    row(frame, 12, format_args!("Records: {}", log.received()))?;
    match log.latest() {
        Some(r) => row(frame, 24, format_args!("Last: {}", r.time))?,
        None => row(frame, 24, format_args!("Last: none"))?,
    }
    row(
        frame,
        36,
        format_args!(
            "Pic {}/{} rnd {}",
            session.picture_index() + 1,
            session.total_pictures(),
            if session.randomize_every_refresh() { "on" } else { "off" }
        ),
    )?;
    row(frame, 48, format_args!("Up: {}s", Instant::now().as_secs()))
}

fn text(frame: &mut Frame, s: &str, at: Point, large: bool) {
    let style = if large { large_text() } else { small_text() };
    let _ = Text::with_baseline(s, at, style, Baseline::Top).draw(frame);
}
