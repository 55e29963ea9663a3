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

#![warn(missing_docs)]

//! Maze car game logic.
//!
//! This is a library for a grid maze that a car drives through. It owns the grid and how it is
//! carved, the car's pose and how it moves and turns, and the distance sensors the car uses to
//! look around. It is intended to be driven by a simulation that adds timing and cancellation on
//! top.

pub mod generate;
pub mod grid;
pub mod pose;
pub mod sensor;

pub use generate::generate;
pub use grid::{Cell, Maze, Position};
pub use pose::{Direction, Heading, Pose};

/// Random number generator used to carve mazes.
pub type Rng = rand_pcg::Pcg64;

/// Set of cells, used for flood fills and by search strategies.
pub type HashSet<T> = rustc_hash::FxHashSet<T>;

/// Smallest side length that still leaves room for a start and a goal inside the border.
pub const MIN_MAZE_SIZE: usize = 5;

/// Maze error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    /// Side length is not usable for carving.
    #[error("invalid maze size {size}: {reason}")]
    InvalidSize {
        /// The requested side length.
        size: usize,

        /// Why it was rejected.
        reason: &'static str,
    },

    /// Rotations must keep the car on one of the four headings.
    #[error("unsupported rotation angle: {0} degrees")]
    UnsupportedAngle(i32),

    /// A hand drawn layout broke one of the grid invariants.
    #[error("malformed layout: {0}")]
    MalformedLayout(String),
}

/// Checks a side length before anything is allocated for it.
pub fn validate_size(size: usize) -> Result<(), MazeError> {
    if size < MIN_MAZE_SIZE {
        return Err(MazeError::InvalidSize {
            size,
            reason: "too small to hold a start and a goal",
        });
    }
    if size % 2 == 0 {
        return Err(MazeError::InvalidSize {
            size,
            reason: "must be odd so corridors line up with the border",
        });
    }
    Ok(())
}
