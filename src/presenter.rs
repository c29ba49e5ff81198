//! # Presentation Adapter
//!
//! The sweep core never draws anything itself. After each step it notifies a
//! [`Presenter`], which renders the house and robot, shows transient messages
//! and provides the pacing delays.
//!
//! Implementations in this crate:
//! - [`crate::display::TerminalPresenter`] renders to the terminal with crossterm
//! - [`crate::display::JsonLinesPresenter`] writes one JSON line per event
//! - [`RecordingPresenter`] keeps everything in memory and never waits

use std::future::Future;
use std::time::Duration;

use crate::house::House;
use crate::robot::Robot;

/// Notification sink and pacing source for the sweep loop.
pub trait Presenter: Send {
    /// Refresh after every mutating step. Fire-and-forget.
    fn state_changed(&mut self, house: &House, robot: &Robot);

    /// Displays `text` and resolves once its display window is over.
    fn show_message(&mut self, text: &str) -> impl Future<Output = ()> + Send;

    fn clear_message(&mut self);

    /// Pacing primitive.
    fn delay(&mut self, duration: Duration) -> impl Future<Output = ()> + Send;

    /// Elapsed active time of the current run.
    fn chrono_updated(&mut self, _elapsed: Duration) {}
}

/// In-memory presenter: records messages and refresh count, never sleeps.
#[derive(Debug, Default, Clone)]
pub struct RecordingPresenter {
    pub messages: Vec<String>,
    pub refreshes: usize,
    pub clears: usize,
    pub last_position: Option<(usize, usize)>,
    pub last_battery: Option<u32>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saw(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m == text)
    }
}

impl Presenter for RecordingPresenter {
    fn state_changed(&mut self, _house: &House, robot: &Robot) {
        self.refreshes += 1;
        self.last_position = Some(robot.position);
        self.last_battery = Some(robot.battery);
    }

    async fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn clear_message(&mut self) {
        self.clears += 1;
    }

    // Yields so that a paused loop still lets the host run.
    async fn delay(&mut self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}
