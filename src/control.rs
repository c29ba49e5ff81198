//! Run flags shared between the control surface and the sweep task.
//!
//! The control surface only ever flips these flags. The sweep loop reads them
//! at its suspension points and is the single mutator of robot and house.

use std::sync::atomic::{AtomicBool, Ordering};

/// Command sent by a front-end (keyboard, buttons) to the simulation host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Quit,
}

#[derive(Debug, Default)]
pub struct RunFlags {
    running: AtomicBool,
    paused: AtomicBool,
}

impl RunFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Paused only counts while running.
    pub fn is_paused(&self) -> bool {
        self.is_running() && self.paused.load(Ordering::Acquire)
    }

    pub fn start(&self) {
        self.paused.store(false, Ordering::Release);
        self.running.store(true, Ordering::Release);
    }

    pub fn pause(&self) {
        if self.is_running() {
            self.paused.store(true, Ordering::Release);
        }
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    /// Clears both flags.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.paused.store(false, Ordering::Release);
    }
}
