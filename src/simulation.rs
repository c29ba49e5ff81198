//! Simulation host: owns the sweep task and exposes the control surface.
//!
//! The sweep loop runs on its own tokio task which takes the controller by
//! value and hands it back when it ends. `start`, `pause` and `reset` flip
//! [`RunFlags`] and join ended tasks; robot and house are touched again by the
//! host only once the task has been joined.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::SimConfig;
use crate::control::{Command, RunFlags};
use crate::error::{Result, SimError};
use crate::house::House;
use crate::presenter::Presenter;
use crate::robot::Robot;
use crate::sweep::{SweepController, SweepReport};

type SweepTask<P> = JoinHandle<(SweepController<P>, SweepReport)>;

enum Slot<P: Presenter> {
    Idle(SweepController<P>),
    Running(SweepTask<P>),
    /// Only left behind by a panicked sweep task.
    Lost,
}

pub struct Simulation<P: Presenter + 'static> {
    config: SimConfig,
    rng: StdRng,
    flags: Arc<RunFlags>,
    slot: Slot<P>,
    last_report: Option<SweepReport>,
}

impl<P: Presenter + 'static> Simulation<P> {
    pub fn new(config: SimConfig, presenter: P) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let house = House::random(config.rows, config.cols, config.dirty_probability, &mut rng)?;
        Ok(Self::with_house(config, rng, house, presenter))
    }

    /// Host over a fixed first layout; later resets draw from `config`.
    pub fn with_layout(config: SimConfig, house: House, presenter: P) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self::with_house(config, rng, house, presenter))
    }

    fn with_house(config: SimConfig, rng: StdRng, house: House, presenter: P) -> Self {
        let flags = Arc::new(RunFlags::new());
        let mut controller =
            SweepController::new(house, Robot::new(), presenter, flags.clone(), config.pacing);
        controller.render();
        Self {
            config,
            rng,
            flags,
            slot: Slot::Idle(controller),
            last_report: None,
        }
    }

    pub fn flags(&self) -> &Arc<RunFlags> {
        &self.flags
    }

    pub fn is_running(&self) -> bool {
        matches!(self.slot, Slot::Running(_))
    }

    pub fn last_report(&self) -> Option<&SweepReport> {
        self.last_report.as_ref()
    }

    /// Controller, when no run is in flight.
    pub fn controller(&self) -> Option<&SweepController<P>> {
        match &self.slot {
            Slot::Idle(controller) => Some(controller),
            _ => None,
        }
    }

    /// Begins a sweep, or resumes a paused one. A run that already ended on
    /// its own is collected first, then a new one begins.
    pub async fn start(&mut self) -> Result<()> {
        // Only a finished run clears `running` without being joined.
        let ended = matches!(&self.slot, Slot::Running(task) if task.is_finished())
            || (self.is_running() && !self.flags.is_running());
        if ended {
            self.join().await;
        }

        match std::mem::replace(&mut self.slot, Slot::Lost) {
            Slot::Running(task) => {
                self.flags.resume();
                self.slot = Slot::Running(task);
            }
            Slot::Idle(mut controller) => {
                info!("starting sweep");
                self.flags.start();
                self.slot = Slot::Running(tokio::spawn(async move {
                    let report = controller.run().await;
                    (controller, report)
                }));
            }
            Slot::Lost => {
                error!("no controller left to start");
                return Err(SimError::ControllerLost);
            }
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.is_running() {
            self.flags.pause();
        }
    }

    /// Cancels the in-flight sweep and lays out a fresh random house.
    pub async fn reset(&mut self) -> Result<()> {
        self.flags.stop();
        self.join().await;
        let Slot::Idle(controller) = &mut self.slot else {
            error!("no controller left to reset");
            return Err(SimError::ControllerLost);
        };

        let house = House::random(
            self.config.rows,
            self.config.cols,
            self.config.dirty_probability,
            &mut self.rng,
        )?;
        controller.reset(house);
        self.last_report = None;
        info!("simulation reset");
        Ok(())
    }

    /// Collects the report of a sweep that already ended, without waiting.
    pub async fn reap(&mut self) -> Option<&SweepReport> {
        let finished = matches!(&self.slot, Slot::Running(task) if task.is_finished());
        if finished {
            self.join().await;
            return self.last_report.as_ref();
        }
        None
    }

    /// Waits for the in-flight sweep to end on its own.
    pub async fn wait(&mut self) -> Option<&SweepReport> {
        self.join().await;
        self.last_report.as_ref()
    }

    /// Applies one front-end command. Returns `false` on `Quit`.
    pub async fn handle(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Start => self.start().await?,
            Command::Pause => self.pause(),
            Command::Reset => self.reset().await?,
            Command::Quit => {
                self.flags.stop();
                self.join().await;
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn join(&mut self) {
        if !self.is_running() {
            return;
        }
        let Slot::Running(task) = std::mem::replace(&mut self.slot, Slot::Lost) else {
            return;
        };
        match task.await {
            Ok((controller, report)) => {
                self.last_report = Some(report);
                self.slot = Slot::Idle(controller);
            }
            Err(err) => error!(%err, "sweep task failed"),
        }
    }
}
