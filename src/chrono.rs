use std::time::{Duration, Instant};

/// Elapsed-time counter for a sweep run. Frozen while paused.
#[derive(Clone, Debug, Default)]
pub struct Chrono {
    accumulated: Duration,
    started: Option<Instant>,
}

impl Chrono {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restarts from zero.
    pub fn start(&mut self) {
        self.accumulated = Duration::ZERO;
        self.started = Some(Instant::now());
    }

    pub fn pause(&mut self) {
        if let Some(started) = self.started.take() {
            self.accumulated += started.elapsed();
        }
    }

    pub fn resume(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    pub fn stop(&mut self) {
        self.pause();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_ticking(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.started.map_or(Duration::ZERO, |s| s.elapsed())
    }
}

/// `m:ss.d`
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = millis / 1000;
    format!("{}:{:02}.{}", secs / 60, secs % 60, (millis % 1000) / 100)
}
