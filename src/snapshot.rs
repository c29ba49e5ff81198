//! # Snapshot Module
//!
//! Serializable views of the simulation state, emitted by the headless
//! renderer as JSON lines and usable by any external observer.
//!
//! ## Format
//!
//! Every line written by [`crate::display::JsonLinesPresenter`] is one
//! [`PresenterEvent`], internally tagged by `"event"`:
//!
//! ```text
//! {"event":"state","house":{...},"robot":{"row":0,"col":1,"battery":95}}
//! {"event":"message","text":"La pièce a été nettoyée par le robot."}
//! {"event":"clear_message"}
//! {"event":"chrono","elapsed_ms":1300}
//! ```

use serde::{Deserialize, Serialize};

use crate::house::House;
use crate::robot::Robot;
use crate::types::TileState;

/// Serializable view of the house layout.
///
/// `tiles[row][col]` holds the cleanliness state of each tile, so observers
/// can tell pre-clean tiles from robot-cleaned ones.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HouseData {
    pub rows: usize,
    pub cols: usize,
    /// Full grid, row-major.
    pub tiles: Vec<Vec<TileState>>,
    /// Tiles still waiting for the robot.
    pub dirty_remaining: usize,
    /// Tiles the robot has cleaned so far.
    pub cleaned_by_robot: usize,
}

/// Serializable view of the robot.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobotData {
    pub row: usize,
    pub col: usize,
    /// Charge in percent, `0..=100`.
    pub battery: u32,
}

/// Complete state after one step.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SimulationSnapshot {
    pub house: HouseData,
    pub robot: RobotData,
}

/// One presenter notification, as written on a JSON line.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PresenterEvent {
    State(SimulationSnapshot),
    Message { text: String },
    ClearMessage,
    Chrono { elapsed_ms: u64 },
}

// Conversion utilities from live state to snapshots

pub fn create_house_data(house: &House) -> HouseData {
    HouseData {
        rows: house.rows(),
        cols: house.cols(),
        tiles: house.states(),
        dirty_remaining: house.dirty_count(),
        cleaned_by_robot: house.cleaned_by_robot_count(),
    }
}

pub fn create_robot_data(robot: &Robot) -> RobotData {
    RobotData {
        row: robot.position.0,
        col: robot.position.1,
        battery: robot.battery,
    }
}

pub fn create_snapshot(house: &House, robot: &Robot) -> SimulationSnapshot {
    SimulationSnapshot {
        house: create_house_data(house),
        robot: create_robot_data(robot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileState::{Clean, CleanedByRobot, Dirty};

    #[test]
    fn snapshot_counts_tiles_by_state() {
        let house = House::from_states(vec![vec![Dirty, CleanedByRobot], vec![Clean, Dirty]]).unwrap();
        let robot = Robot::with_state((1, 0), 42);
        let snapshot = create_snapshot(&house, &robot);
        assert_eq!(snapshot.house.dirty_remaining, 2);
        assert_eq!(snapshot.house.cleaned_by_robot, 1);
        assert_eq!(
            snapshot.robot,
            RobotData {
                row: 1,
                col: 0,
                battery: 42
            }
        );
    }

    #[test]
    fn events_are_tagged_snake_case() {
        let json = serde_json::to_string(&PresenterEvent::Chrono { elapsed_ms: 1300 }).unwrap();
        assert_eq!(json, r#"{"event":"chrono","elapsed_ms":1300}"#);

        let state = create_snapshot(&House::from_states(vec![vec![CleanedByRobot]]).unwrap(), &Robot::new());
        let json = serde_json::to_string(&PresenterEvent::State(state)).unwrap();
        assert!(json.starts_with(r#"{"event":"state","house":"#));
        assert!(json.contains(r#""tiles":[["cleaned_by_robot"]]"#));
    }
}
