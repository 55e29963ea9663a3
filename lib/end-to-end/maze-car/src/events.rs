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

use maze_logic::{Cell, Heading, Maze, Pose, Position};
use serde::Serialize;

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Info,
    Warn,
    Success,
    Error,

    /// Text written by the navigation program itself.
    User,
}

impl Level {
    /// Level the event is traced at. Routine progress stays at debug.
    pub fn tracing_level(self) -> tracing::Level {
        match self {
            Level::Error => tracing::Level::ERROR,
            Level::Warn => tracing::Level::WARN,
            _ => tracing::Level::DEBUG,
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => write!(f, "INFO"),
            Level::Warn => write!(f, "WARN"),
            Level::Success => write!(f, "SUCCESS"),
            Level::Error => write!(f, "ERROR"),
            Level::User => write!(f, "USER"),
        }
    }
}

/// Notification appended to a round's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoundEvent {
    MazeGenerated { size: usize, seed: u64 },
    Reset { pose: Pose },
    Started { strategy: String },
    Moved { to: Position },
    MoveBlocked { from: Position, heading: Heading },
    Rotated { heading: Heading },
    PositionReported { position: Position },
    Message { text: String },
    ReachedFlag { at: Position },
    Solved { strategy: String },
    Unsolved { strategy: String, reason: String },
    Aborted,
    Failed { cause: String },
}

impl RoundEvent {
    pub fn level(&self) -> Level {
        match self {
            RoundEvent::MoveBlocked { .. } | RoundEvent::Unsolved { .. } | RoundEvent::Aborted => {
                Level::Warn
            }
            RoundEvent::ReachedFlag { .. } | RoundEvent::Solved { .. } => Level::Success,
            RoundEvent::Failed { .. } => Level::Error,
            RoundEvent::Message { .. } => Level::User,
            _ => Level::Info,
        }
    }
}

impl std::fmt::Display for RoundEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundEvent::MazeGenerated { size, seed } => {
                write!(f, "Maze {}x{} generated (seed {})", size, size, seed)
            }
            RoundEvent::Reset { pose } => write!(
                f,
                "Car placed at {} facing {}",
                pose.position, pose.heading
            ),
            RoundEvent::Started { strategy } => write!(f, "Starting {}", strategy),
            RoundEvent::Moved { to } => write!(f, "Car moved to {}", to),
            RoundEvent::MoveBlocked { from, heading } => write!(
                f,
                "Invalid move from {} facing {} - wall or out of bounds",
                from, heading
            ),
            RoundEvent::Rotated { heading } => write!(f, "Car rotated to {}", heading),
            RoundEvent::PositionReported { position } => {
                write!(f, "Current car position: {}", position)
            }
            RoundEvent::Message { text } => write!(f, "{}", text),
            RoundEvent::ReachedFlag { at } => write!(f, "Reached the flag at {}", at),
            RoundEvent::Solved { strategy } => write!(f, "{} solved the maze", strategy),
            RoundEvent::Unsolved { strategy, reason } => {
                write!(f, "{} stopped without reaching the flag: {}", strategy, reason)
            }
            RoundEvent::Aborted => write!(f, "Execution stopped by user"),
            RoundEvent::Failed { cause } => write!(f, "Error during execution: {}", cause),
        }
    }
}

/// Read-only view of a round for whoever draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Cells indexed `[y][x]`.
    pub cells: Vec<Vec<Cell>>,
    pub pose: Pose,
}

impl Snapshot {
    pub fn new(maze: &Maze, pose: Pose) -> Self {
        Self {
            cells: maze.rows(),
            pose,
        }
    }
}

// draw the maze with the car as an arrow pointing where it faces.
impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let car = match self.pose.heading {
            Heading::UP => '^',
            Heading::RIGHT => '>',
            Heading::DOWN => 'v',
            _ => '<',
        };
        for (y, row) in self.cells.iter().enumerate() {
            let line: String = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    if Position::new(x as i32, y as i32) == self.pose.position {
                        car
                    } else {
                        match cell {
                            Cell::Wall => '#',
                            Cell::Open => ' ',
                            Cell::Goal => 'F',
                        }
                    }
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
