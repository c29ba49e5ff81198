//! # Sweep Controller
//!
//! Autonomous cleaning loop. Repeatedly targets the nearest dirty tile,
//! drives the robot there one axis-aligned step at a time (recharging when
//! the next step costs more than the battery holds), cleans it, and stops
//! once no dirty tile remains.
//!
//! The loop is cooperative: it polls the shared [`RunFlags`] before every move
//! step and every clean attempt, exits on cancellation and idles on pause
//! without losing its position or target.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chrono::Chrono;
use crate::config::Pacing;
use crate::control::RunFlags;
use crate::house::House;
use crate::presenter::Presenter;
use crate::robot::{CleanOutcome, Robot};
use crate::types::{Direction, Position, CLEAN_COST};

pub const HOUSE_CLEAN_MESSAGE: &str = "Toute la maison est propre !";
pub const HOUSE_DIRTY_MESSAGE: &str = "Il reste des pièces sales.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SweepOutcome {
    /// No dirty tile left.
    Completed,
    /// Loop exited with dirty tiles left.
    Incomplete { remaining: usize },
    /// `running` was cleared.
    Cancelled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SweepStats {
    pub moves: usize,
    pub cleans: usize,
    pub already_clean: usize,
    pub recharges: usize,
    pub rejected: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    #[serde(flatten)]
    pub outcome: SweepOutcome,
    pub stats: SweepStats,
    pub elapsed_ms: u64,
}

pub struct SweepController<P: Presenter> {
    house: House,
    robot: Robot,
    presenter: P,
    flags: Arc<RunFlags>,
    pacing: Pacing,
    chrono: Chrono,
    stats: SweepStats,
    initial_dirty: usize,
    /// Corner and dirty count after each recharge of the current run.
    recharge_points: HashSet<(Position, usize)>,
}

impl<P: Presenter> SweepController<P> {
    pub fn new(house: House, robot: Robot, presenter: P, flags: Arc<RunFlags>, pacing: Pacing) -> Self {
        let initial_dirty = house.dirty_count();
        Self {
            house,
            robot,
            presenter,
            flags,
            pacing,
            chrono: Chrono::new(),
            stats: SweepStats::default(),
            initial_dirty,
            recharge_points: HashSet::new(),
        }
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn flags(&self) -> &Arc<RunFlags> {
        &self.flags
    }

    pub fn stats(&self) -> &SweepStats {
        &self.stats
    }

    pub fn elapsed(&self) -> Duration {
        self.chrono.elapsed()
    }

    /// Share of the initially dirty tiles cleaned so far.
    pub fn progress_percentage(&self) -> f32 {
        if self.initial_dirty == 0 {
            return 100.0;
        }
        let remaining = self.house.dirty_count().min(self.initial_dirty);
        ((self.initial_dirty - remaining) as f32 / self.initial_dirty as f32) * 100.0
    }

    pub fn status(&self) -> String {
        format!(
            "Nettoyage: {:.0}% | Batterie: {}% | Pièces sales: {} | Recharges: {}",
            self.progress_percentage(),
            self.robot.battery,
            self.house.dirty_count(),
            self.stats.recharges
        )
    }

    /// New robot and layout. Only called while no run is in flight.
    pub fn reset(&mut self, house: House) {
        self.initial_dirty = house.dirty_count();
        self.house = house;
        self.robot = Robot::new();
        self.stats = SweepStats::default();
        self.chrono.reset();
        self.presenter.clear_message();
        self.presenter.chrono_updated(Duration::ZERO);
        self.presenter.state_changed(&self.house, &self.robot);
    }

    /// Pushes the current state to the presenter.
    pub fn render(&mut self) {
        self.presenter.state_changed(&self.house, &self.robot);
        self.presenter.chrono_updated(self.chrono.elapsed());
    }

    /// Runs the sweep until the house is clean or `running` is cleared.
    /// The caller sets `running` beforehand.
    pub async fn run(&mut self) -> SweepReport {
        self.stats = SweepStats::default();
        self.recharge_points.clear();
        self.chrono.start();
        info!(
            rows = self.house.rows(),
            cols = self.house.cols(),
            dirty = self.house.dirty_count(),
            battery = self.robot.battery,
            "sweep started"
        );

        let outcome = self.sweep().await;

        self.chrono.stop();
        self.presenter.state_changed(&self.house, &self.robot);
        self.presenter.chrono_updated(self.chrono.elapsed());
        if outcome != SweepOutcome::Cancelled {
            self.flags.stop();
        }

        let report = SweepReport {
            outcome,
            stats: self.stats.clone(),
            elapsed_ms: u64::try_from(self.chrono.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        info!(?report, "sweep finished");
        report
    }

    async fn sweep(&mut self) -> SweepOutcome {
        'sweep: loop {
            if !self.checkpoint().await {
                return SweepOutcome::Cancelled;
            }
            let Some(mut target) = self.house.nearest_dirty(self.robot.position) else {
                break;
            };
            debug!(?target, from = ?self.robot.position, "targeting nearest dirty tile");

            while self.robot.position != target {
                if !self.checkpoint().await {
                    return SweepOutcome::Cancelled;
                }
                let Some(direction) = Direction::toward(self.robot.position, target) else {
                    break;
                };
                let Some(next) = direction.apply(self.robot.position) else {
                    break 'sweep;
                };

                let cost = self.house.move_cost(next);
                if self.robot.needs_recharge(cost) {
                    if !self.recharge(cost).await {
                        break 'sweep;
                    }
                    // From the corner another dirty tile may be closer.
                    match self.house.nearest_dirty(self.robot.position) {
                        Some(retarget) => target = retarget,
                        None => continue 'sweep,
                    }
                    continue;
                }

                if let Err(rejection) = self.robot.step(direction, &self.house, false) {
                    self.stats.rejected += 1;
                    warn!(%rejection, ?target, "transit step rejected");
                    self.presenter.show_message(&rejection.to_string()).await;
                    break 'sweep;
                }
                self.stats.moves += 1;
                self.presenter.state_changed(&self.house, &self.robot);
                self.presenter.clear_message();
                self.tick().await;
            }

            while self.house.is_dirty(target) {
                if !self.checkpoint().await {
                    return SweepOutcome::Cancelled;
                }
                if self.robot.position != target {
                    continue 'sweep;
                }
                if self.robot.needs_recharge(CLEAN_COST) {
                    // The walk to the corner leaves the target; pick again.
                    if !self.recharge(CLEAN_COST).await {
                        break 'sweep;
                    }
                    continue 'sweep;
                }

                let outcome = self
                    .robot
                    .clean_current_tile(&mut self.house, CLEAN_COST, &mut self.presenter, &self.pacing)
                    .await;
                self.record(outcome, target);
                self.presenter.state_changed(&self.house, &self.robot);
                self.tick().await;
            }
        }

        if self.house.is_fully_clean() {
            self.presenter.show_message(HOUSE_CLEAN_MESSAGE).await;
            SweepOutcome::Completed
        } else {
            let remaining = self.house.dirty_count();
            warn!(remaining, "sweep ended with dirty tiles left");
            self.presenter.show_message(HOUSE_DIRTY_MESSAGE).await;
            SweepOutcome::Incomplete { remaining }
        }
    }

    fn record(&mut self, outcome: CleanOutcome, target: Position) {
        match outcome {
            CleanOutcome::Cleaned { .. } => self.stats.cleans += 1,
            CleanOutcome::AlreadyClean { .. } => self.stats.already_clean += 1,
            CleanOutcome::BatteryExhausted { battery } => {
                self.stats.rejected += 1;
                warn!(battery, ?target, "clean attempt without enough battery");
            }
        }
    }

    /// Recharges if needed. Returns `false` once the robot is back on a
    /// corner it already refilled at with the same dirt left: tiles never get
    /// dirty again, so the loop would replay the same trip forever.
    async fn recharge(&mut self, minimum: u32) -> bool {
        let recharged = self
            .robot
            .check_battery_and_maybe_recharge(&self.house, minimum, &mut self.presenter, &self.pacing)
            .await;
        if !recharged {
            return true;
        }
        self.stats.recharges += 1;
        let point = (self.robot.position, self.house.dirty_count());
        if self.recharge_points.insert(point) {
            return true;
        }
        warn!(corner = ?point.0, remaining = point.1, "recharge cycle without progress");
        false
    }

    async fn tick(&mut self) {
        self.presenter.chrono_updated(self.chrono.elapsed());
        self.presenter.delay(self.pacing.step).await;
    }

    /// Waits out a pause, then tells whether the loop may go on.
    async fn checkpoint(&mut self) -> bool {
        if self.flags.is_paused() {
            self.chrono.pause();
            info!("sweep paused");
            while self.flags.is_paused() {
                self.presenter.delay(self.pacing.poll).await;
            }
            if self.flags.is_running() {
                self.chrono.resume();
                info!("sweep resumed");
            }
        }
        self.flags.is_running()
    }
}
