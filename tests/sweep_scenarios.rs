//! End-to-end sweeps on fixed layouts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sweepbot::control::RunFlags;
use sweepbot::presenter::RecordingPresenter;
use sweepbot::sweep::{HOUSE_CLEAN_MESSAGE, HOUSE_DIRTY_MESSAGE, SweepController, SweepOutcome};
use sweepbot::types::TileState::{Clean, CleanedByRobot, Dirty};
use sweepbot::{House, Pacing, Position, Presenter, Robot, TileState};

fn running_controller(
    states: Vec<Vec<TileState>>,
    robot: Robot,
) -> SweepController<RecordingPresenter> {
    let flags = Arc::new(RunFlags::new());
    flags.start();
    SweepController::new(
        House::from_states(states).unwrap(),
        robot,
        RecordingPresenter::new(),
        flags,
        Pacing::instant(),
    )
}

#[tokio::test]
async fn two_by_two_diagonal_dirt() {
    let mut sweep = running_controller(vec![vec![Dirty, Clean], vec![Clean, Dirty]], Robot::new());

    let report = sweep.run().await;

    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(report.stats.cleans, 2);
    assert_eq!(report.stats.moves, 2);
    assert_eq!(report.stats.recharges, 0);
    assert_eq!(sweep.robot().position, (1, 1));
    assert_eq!(sweep.robot().battery, 65);
    assert!(sweep.house().is_fully_clean());
    assert!(sweep.presenter().saw(HOUSE_CLEAN_MESSAGE));
}

#[tokio::test]
async fn single_dirty_tile_is_cleaned_by_robot() {
    let mut states = vec![vec![Clean; 4]; 3];
    states[2][3] = Dirty;
    let mut sweep = running_controller(states, Robot::new());

    let report = sweep.run().await;

    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(sweep.house().tile((2, 3)).map(|t| t.state), Some(CleanedByRobot));
    assert_eq!(sweep.house().cleaned_by_robot_count(), 1);
    // 4 clean tiles at 5 and the dirty one at 10, then 10 to clean it.
    assert_eq!(report.stats.moves, 5);
    assert_eq!(sweep.robot().battery, 100 - 4 * 5 - 10 - 10);
}

#[tokio::test]
async fn all_clean_house_finishes_immediately() {
    let mut sweep = running_controller(vec![vec![Clean; 5]; 5], Robot::new());

    let report = sweep.run().await;

    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(report.stats.moves, 0);
    assert_eq!(report.stats.cleans, 0);
    assert_eq!(sweep.robot(), &Robot::new());
    assert_eq!(sweep.presenter().messages, vec![HOUSE_CLEAN_MESSAGE]);
}

#[tokio::test]
async fn recharge_in_transit_retargets_from_the_corner() {
    let mut sweep = running_controller(
        vec![vec![Clean, Clean, Clean, Dirty]],
        Robot::with_state((0, 0), 12),
    );

    let report = sweep.run().await;

    // 12 -> 7 -> 2, then the dirty tile costs 10: walk to corner (0,3),
    // which is the target itself.
    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(report.stats.recharges, 1);
    assert_eq!(report.stats.moves, 2);
    assert_eq!(sweep.robot().position, (0, 3));
    assert_eq!(sweep.robot().battery, 90);
}

#[tokio::test]
async fn recharge_in_transit_can_switch_target() {
    // Tie between (0,2) and (0,6) goes to (0,2), but the recharge walk ends
    // on corner (0,6), which is dirty.
    let mut states = vec![vec![Clean; 7]];
    states[0][2] = Dirty;
    states[0][6] = Dirty;
    let mut sweep = running_controller(states, Robot::with_state((0, 4), 3));

    let report = sweep.run().await;

    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(report.stats.recharges, 1);
    assert_eq!(report.stats.cleans, 2);
    assert_eq!(report.stats.moves, 4);
    assert_eq!(sweep.robot().position, (0, 2));
    assert_eq!(sweep.robot().battery, 55);
}

#[tokio::test]
async fn low_battery_far_from_dirt_walks_to_far_corner() {
    let mut states = vec![vec![Clean; 10]; 10];
    states[5][6] = Dirty;
    let mut sweep = running_controller(states, Robot::with_state((5, 5), 3));

    let report = sweep.run().await;

    // Recharge at (9,9), then back up to (5,6): 4 rows, 3 columns.
    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(report.stats.recharges, 1);
    assert_eq!(report.stats.moves, 7);
    assert_eq!(sweep.robot().position, (5, 6));
    assert_eq!(sweep.robot().battery, 100 - 6 * 5 - 10 - 10);
}

#[tokio::test]
async fn pause_holds_the_loop_and_resume_finishes_it() {
    let mut sweep = running_controller(vec![vec![Dirty, Dirty, Dirty]], Robot::new());
    let flags = sweep.flags().clone();
    flags.pause();

    let task = tokio::spawn(async move {
        let report = sweep.run().await;
        (sweep, report)
    });
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(!task.is_finished());

    flags.resume();
    let (sweep, report) = task.await.unwrap();
    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert!(sweep.house().is_fully_clean());
}

#[tokio::test]
async fn stopping_a_paused_loop_cancels_it() {
    let mut sweep = running_controller(vec![vec![Dirty, Dirty]], Robot::new());
    let flags = sweep.flags().clone();
    flags.pause();

    let task = tokio::spawn(async move {
        let report = sweep.run().await;
        (sweep, report)
    });
    tokio::task::yield_now().await;
    flags.stop();

    let (sweep, report) = task.await.unwrap();
    assert_eq!(report.outcome, SweepOutcome::Cancelled);
    assert_eq!(sweep.house().dirty_count(), 2);
    assert_eq!(sweep.robot(), &Robot::new());
}

#[tokio::test]
async fn dirt_out_of_reach_ends_incomplete_with_the_dirty_message() {
    let mut states = vec![vec![Clean; 41]];
    states[0][20] = Dirty;
    let mut sweep = running_controller(states, Robot::new());

    let report = tokio::time::timeout(Duration::from_secs(5), sweep.run())
        .await
        .unwrap();

    assert_eq!(report.outcome, SweepOutcome::Incomplete { remaining: 1 });
    assert!(sweep.house().is_dirty((0, 20)));
    assert!(sweep.presenter().saw(HOUSE_DIRTY_MESSAGE));
    assert!(!sweep.presenter().saw(HOUSE_CLEAN_MESSAGE));
    assert!(!sweep.flags().is_running());
}

#[derive(Clone, Copy)]
enum Interrupt {
    Pause,
    Stop,
}

/// Flips the run flags from inside the loop once `after` refreshes went by.
struct InterruptingPresenter {
    flags: Arc<RunFlags>,
    after: usize,
    interrupt: Interrupt,
    refreshes: usize,
    positions: Arc<Mutex<Vec<Position>>>,
    messages: Vec<String>,
}

impl Presenter for InterruptingPresenter {
    fn state_changed(&mut self, _house: &House, robot: &Robot) {
        self.refreshes += 1;
        self.positions.lock().unwrap().push(robot.position);
        if self.refreshes == self.after {
            match self.interrupt {
                Interrupt::Pause => self.flags.pause(),
                Interrupt::Stop => self.flags.stop(),
            }
        }
    }

    async fn show_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn clear_message(&mut self) {}

    async fn delay(&mut self, _duration: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Robot at (0,0) heading for the far end of a 1x6 row, interrupted at (0,2).
fn interrupted_in_transit(
    interrupt: Interrupt,
) -> (SweepController<InterruptingPresenter>, Arc<Mutex<Vec<Position>>>) {
    let mut states = vec![vec![Clean; 6]];
    states[0][5] = Dirty;
    let flags = Arc::new(RunFlags::new());
    flags.start();
    let positions = Arc::new(Mutex::new(Vec::new()));
    let presenter = InterruptingPresenter {
        flags: flags.clone(),
        after: 2,
        interrupt,
        refreshes: 0,
        positions: positions.clone(),
        messages: Vec::new(),
    };
    let sweep = SweepController::new(
        House::from_states(states).unwrap(),
        Robot::new(),
        presenter,
        flags,
        Pacing::instant(),
    );
    (sweep, positions)
}

#[tokio::test]
async fn pause_mid_transit_resumes_toward_the_same_target() {
    let (mut sweep, positions) = interrupted_in_transit(Interrupt::Pause);
    let flags = sweep.flags().clone();

    let task = tokio::spawn(async move {
        let report = sweep.run().await;
        (sweep, report)
    });
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
    assert!(!task.is_finished());
    assert!(flags.is_paused());
    assert_eq!(*positions.lock().unwrap(), vec![(0, 1), (0, 2)]);

    flags.resume();
    let (sweep, report) = task.await.unwrap();

    assert_eq!(report.outcome, SweepOutcome::Completed);
    assert_eq!(
        positions.lock().unwrap()[..5],
        [(0, 1), (0, 2), (0, 3), (0, 4), (0, 5)]
    );
    assert_eq!(report.stats.moves, 5);
    assert_eq!(sweep.robot().position, (0, 5));
    assert_eq!(sweep.robot().battery, 100 - 4 * 5 - 10 - 10);
    assert!(sweep.house().is_fully_clean());
}

#[tokio::test]
async fn stop_mid_transit_cancels_where_the_robot_stands() {
    let (mut sweep, positions) = interrupted_in_transit(Interrupt::Stop);

    let report = sweep.run().await;

    assert_eq!(report.outcome, SweepOutcome::Cancelled);
    assert_eq!(report.stats.moves, 2);
    assert_eq!(sweep.robot(), &Robot::with_state((0, 2), 90));
    assert!(sweep.house().is_dirty((0, 5)));
    assert!(positions.lock().unwrap().iter().all(|&p| p != (0, 3)));
    assert!(sweep.presenter().messages.is_empty());
}
