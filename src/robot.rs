use crate::config::Pacing;
use crate::error::MoveRejection;
use crate::house::House;
use crate::presenter::Presenter;
use crate::types::{Direction, Position, BATTERY_MAX, CLEAN_COST};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Moved {
    pub from: Position,
    pub to: Position,
    /// Battery actually deducted (0 when the battery check was skipped).
    pub charged: u32,
}

/// Result of one cleaning attempt on the current tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CleanOutcome {
    Cleaned { position: Position, battery: u32 },
    AlreadyClean { position: Position },
    BatteryExhausted { battery: u32 },
}

impl CleanOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            CleanOutcome::Cleaned { .. } => "La pièce a été nettoyée par le robot.",
            CleanOutcome::AlreadyClean { .. } => "La pièce est déjà propre.",
            CleanOutcome::BatteryExhausted { .. } => {
                "Batterie épuisée, le robot ne peut pas nettoyer."
            }
        }
    }
}

pub const RECHARGE_BEGIN_MESSAGE: &str =
    "Batterie insuffisante, le robot se recharge au coin le plus proche...";
pub const RECHARGE_END_MESSAGE: &str = "Recharge terminée au coin.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Robot {
    pub position: Position,
    pub battery: u32,
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}

impl Robot {
    /// Full battery, top-left corner.
    pub fn new() -> Self {
        Self {
            position: (0, 0),
            battery: BATTERY_MAX,
        }
    }

    pub fn with_state(position: Position, battery: u32) -> Self {
        Self {
            position,
            battery: battery.min(BATTERY_MAX),
        }
    }

    /// Attempts a single axis-aligned step. Rejections leave position and
    /// battery untouched.
    pub fn try_move(
        &mut self,
        d_row: i32,
        d_col: i32,
        house: &House,
        ignore_battery: bool,
    ) -> Result<Moved, MoveRejection> {
        let direction = match (d_row, d_col) {
            (-1, 0) => Direction::Up,
            (1, 0) => Direction::Down,
            (0, -1) => Direction::Left,
            (0, 1) => Direction::Right,
            _ => return Err(MoveRejection::NotAllowed { d_row, d_col }),
        };

        let from = self.position;
        let target = direction
            .apply(from)
            .filter(|&target| house.in_bounds(target))
            .ok_or(MoveRejection::BoundaryReached { from })?;

        let cost = house.move_cost(target);
        if !ignore_battery && self.battery < cost {
            return Err(MoveRejection::InsufficientBattery {
                needed: cost,
                available: self.battery,
            });
        }

        let charged = if ignore_battery {
            0
        } else {
            let before = self.battery;
            self.battery = self.battery.saturating_sub(cost);
            before - self.battery
        };
        self.position = target;
        debug!(?from, to = ?target, charged, battery = self.battery, "robot moved");

        Ok(Moved {
            from,
            to: target,
            charged,
        })
    }

    pub fn step(
        &mut self,
        direction: Direction,
        house: &House,
        ignore_battery: bool,
    ) -> Result<Moved, MoveRejection> {
        let (d_row, d_col) = direction.delta();
        self.try_move(d_row, d_col, house, ignore_battery)
    }

    pub fn needs_recharge(&self, minimum: u32) -> bool {
        self.battery < minimum
    }

    /// Atomic refill, exactly to the maximum.
    pub fn recharge(&mut self) {
        self.battery = BATTERY_MAX;
    }

    /// Cleans the current tile if the battery allows it. No recharge here.
    pub fn clean_tile(&mut self, house: &mut House, required: u32) -> CleanOutcome {
        if self.battery < required {
            return CleanOutcome::BatteryExhausted {
                battery: self.battery,
            };
        }

        let position = self.position;
        if house.is_dirty(position) {
            house.clean_at(position);
            self.battery = self.battery.saturating_sub(CLEAN_COST);
            debug!(?position, battery = self.battery, "tile cleaned");
            CleanOutcome::Cleaned {
                position,
                battery: self.battery,
            }
        } else {
            CleanOutcome::AlreadyClean { position }
        }
    }

    /// Walks to the nearest corner and refills when the battery is below
    /// `minimum`. Returns whether a recharge happened.
    pub async fn check_battery_and_maybe_recharge<P: Presenter>(
        &mut self,
        house: &House,
        minimum: u32,
        presenter: &mut P,
        pacing: &Pacing,
    ) -> bool {
        if !self.needs_recharge(minimum) {
            return false;
        }

        let corner = house.nearest_corner(self.position);
        info!(from = ?self.position, ?corner, battery = self.battery, "heading to charging corner");

        while let Some(direction) = Direction::toward(self.position, corner) {
            if let Err(rejection) = self.step(direction, house, true) {
                // Only reachable with a corner outside the grid.
                warn!(%rejection, ?corner, "recharge walk interrupted");
                break;
            }
            presenter.state_changed(house, self);
            presenter.delay(pacing.step).await;
        }

        presenter.show_message(RECHARGE_BEGIN_MESSAGE).await;
        presenter.delay(pacing.recharge_begin).await;
        self.recharge();
        presenter.state_changed(house, self);
        presenter.show_message(RECHARGE_END_MESSAGE).await;
        presenter.delay(pacing.recharge_end).await;
        info!(position = ?self.position, "battery recharged");
        true
    }

    /// Recharges if needed, then cleans the current tile.
    pub async fn clean_current_tile<P: Presenter>(
        &mut self,
        house: &mut House,
        required: u32,
        presenter: &mut P,
        pacing: &Pacing,
    ) -> CleanOutcome {
        self.check_battery_and_maybe_recharge(house, required, presenter, pacing)
            .await;

        let outcome = self.clean_tile(house, required);
        presenter.show_message(outcome.message()).await;
        outcome
    }
}
