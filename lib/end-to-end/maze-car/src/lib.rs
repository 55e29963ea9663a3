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

//! Maze car simulation.
//!
//! A [`SimulationRound`] owns a carved maze and the car driving through it. Navigation programs
//! talk to the car only through [`Instructions`], where every call takes a little simulated time
//! and can be aborted. Two reference programs live in [`strategy`].

pub mod config;
pub mod events;
pub mod instructions;
pub mod round;
pub mod strategy;

pub use config::{Difficulty, Latency, RoundConfig};
pub use events::{Level, RoundEvent, Snapshot};
pub use instructions::Instructions;
pub use round::SimulationRound;
pub use strategy::{run_strategy, DepthFirst, Outcome, RunReport, Strategy, WallFollower};

use maze_logic::{MazeError, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    /// The round was cancelled before the operation could take effect.
    #[error("execution aborted")]
    Aborted,

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// A move the search had already made in the other direction was refused on the way back.
    #[error("could not back out of {from}")]
    Stuck { from: Position },
}
