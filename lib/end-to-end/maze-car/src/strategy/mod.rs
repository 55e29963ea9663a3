/*
 * Copyright (C) 2023 Asim Ihsan
 * SPDX-License-Identifier: AGPL-3.0-only
 *
 * This program is free software: you can redistribute it and/or modify it under
 * the terms of the GNU Affero General Public License as published by the Free
 * Software Foundation, version 3.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A
 * PARTICULAR PURPOSE. See the GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License along
 * with this program. If not, see <https://www.gnu.org/licenses/>
 */

//! Reference navigation programs.

use std::time::Duration;

use maze_logic::Pose;
use serde::Serialize;

use crate::events::RoundEvent;
use crate::instructions::Instructions;
use crate::round::SimulationRound;
use crate::RoundError;

mod depth_first;
mod wall_follower;

pub use depth_first::DepthFirst;
pub use wall_follower::WallFollower;

/// How a navigation program finished, when it was not stopped by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The car is on the flag.
    ReachedGoal,

    /// Every reachable cell was tried and none of them was the flag.
    Exhausted,

    /// The program hit its own iteration limit.
    GaveUp,
}

/// A navigation program. It knows nothing of the maze beyond what [`Instructions`] tells it.
#[allow(async_fn_in_trait)]
pub trait Strategy {
    fn name(&self) -> &'static str;

    async fn navigate<_Surface: Instructions>(
        &mut self,
        surface: &mut _Surface,
    ) -> Result<Outcome, RoundError>;
}

/// What happened when a strategy was run on a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub strategy: &'static str,
    pub result: Result<Outcome, RoundError>,
    pub elapsed: Duration,
    pub pose: Pose,
}

impl RunReport {
    pub fn solved(&self) -> bool {
        self.result == Ok(Outcome::ReachedGoal)
    }
}

/// Run `strategy` on `round` from wherever the car currently is, and record how it ended: solved,
/// stopped by the user, or failed with a cause. The caller resets the round first.
pub async fn run_strategy<_Strategy: Strategy>(
    round: &mut SimulationRound,
    strategy: &mut _Strategy,
) -> RunReport {
    let name = strategy.name();
    tracing::info!(strategy = name, "starting code execution");
    round.start_clock();
    round.emit(RoundEvent::Started {
        strategy: name.to_string(),
    });

    let result = strategy.navigate(round).await;

    let event = match &result {
        Ok(Outcome::ReachedGoal) => RoundEvent::Solved {
            strategy: name.to_string(),
        },
        Ok(Outcome::Exhausted) => RoundEvent::Unsolved {
            strategy: name.to_string(),
            reason: "every reachable cell was visited".to_string(),
        },
        Ok(Outcome::GaveUp) => RoundEvent::Unsolved {
            strategy: name.to_string(),
            reason: "iteration limit reached".to_string(),
        },
        Err(RoundError::Aborted) => RoundEvent::Aborted,
        Err(e) => RoundEvent::Failed {
            cause: e.to_string(),
        },
    };
    round.emit(event);

    let elapsed = round.elapsed().unwrap_or_default();
    tracing::info!(strategy = name, ?result, ?elapsed, "code execution finished");
    RunReport {
        strategy: name,
        result,
        elapsed,
        pose: round.pose(),
    }
}

#[cfg(test)]
mod tests {
    use maze_logic::{Maze, Position};

    use super::*;
    use crate::config::Latency;

    pub(super) const TRAP: &str = "
        #########
        #...#####
        #.#.#####
        #G#.#####
        ###.#####
        #.....###
        #########
        #########
        #########
    ";

    #[tokio::test]
    async fn test_run_reports_solved() {
        let maze = Maze::from_ascii(TRAP).expect("valid layout");
        let mut round = SimulationRound::with_maze(maze, Latency::none());
        let report = run_strategy(&mut round, &mut DepthFirst::new()).await;
        assert!(report.solved());
        assert_eq!(report.strategy, "depth-first search");
        assert_eq!(report.pose.position, Position::new(1, 3));
        assert!(matches!(
            round.events().last(),
            Some(RoundEvent::Solved { .. })
        ));
    }

    #[tokio::test]
    async fn test_run_reports_give_up() {
        let maze = Maze::from_ascii(TRAP).expect("valid layout");
        let mut round = SimulationRound::with_maze(maze, Latency::none());
        let report = run_strategy(&mut round, &mut WallFollower::with_max_iterations(200)).await;
        assert_eq!(report.result, Ok(Outcome::GaveUp));
        assert!(!report.solved());
        assert!(matches!(
            round.events().last(),
            Some(RoundEvent::Unsolved { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_reports_abort() {
        let maze = Maze::from_ascii(TRAP).expect("valid layout");
        let mut round = SimulationRound::with_maze(maze, Latency::default());
        let token = round.cancellation_token();

        let mut search = DepthFirst::new();
        let (report, ()) = tokio::join!(run_strategy(&mut round, &mut search), async move {
            tokio::time::sleep(Duration::from_millis(2_250)).await;
            token.cancel();
        });

        assert_eq!(report.result, Err(RoundError::Aborted));
        assert_eq!(round.events().last(), Some(&RoundEvent::Aborted));
        assert!(report.elapsed >= Duration::from_millis(2_250));
    }

    #[tokio::test]
    async fn test_run_reports_failure_cause() {
        struct Spinner;

        impl Strategy for Spinner {
            fn name(&self) -> &'static str {
                "spinner"
            }

            async fn navigate<_Surface: Instructions>(
                &mut self,
                surface: &mut _Surface,
            ) -> Result<Outcome, RoundError> {
                surface.rotate(45).await?;
                Ok(Outcome::ReachedGoal)
            }
        }

        let maze = Maze::from_ascii(TRAP).expect("valid layout");
        let mut round = SimulationRound::with_maze(maze, Latency::none());
        let report = run_strategy(&mut round, &mut Spinner).await;
        assert!(report.result.is_err());
        assert_eq!(
            round.events().last(),
            Some(&RoundEvent::Failed {
                cause: "unsupported rotation angle: 45 degrees".to_string()
            })
        );
    }
}
