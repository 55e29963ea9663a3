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

//! Recursive backtracking maze carving.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Maze, Position, START};
use crate::{validate_size, MazeError};

const AXES: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// One cell on the carving stack, with its shuffled directions and how many of them have been
/// tried so far.
struct CarveFrame {
    position: Position,
    directions: [(i32, i32); 4],
    next: usize,
}

impl CarveFrame {
    fn new<R: Rng + ?Sized>(position: Position, rng: &mut R) -> Self {
        let mut directions = AXES;
        directions.shuffle(rng);
        Self {
            position,
            directions,
            next: 0,
        }
    }
}

/// Generate a maze with side length `size`.
///
/// Starting at (1, 1), carve two cells at a time in a random order of directions, backtracking
/// when a cell has no uncarved neighbour two steps away. This gives a spanning tree of one cell
/// wide corridors. The goal is then marked in the corner opposite the start, and if for any
/// reason it cannot be reached a direct corridor is carved to it.
pub fn generate<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Maze, MazeError> {
    validate_size(size)?;
    let mut maze = Maze::walled(size);
    carve(&mut maze, rng);

    maze.set(maze.goal(), Cell::Open);
    maze.mark_goal();

    if !maze.is_reachable(START, maze.goal()) {
        tracing::warn!(size, "goal not reached by carving, adding a direct corridor");
        maze.carve_direct_path();
    }

    tracing::debug!(size, open = maze.passable_count(), "maze generated");
    Ok(maze)
}

fn carve<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    let inner = 1..maze.size() as i32 - 1;

    maze.set(START, Cell::Open);
    let mut stack = vec![CarveFrame::new(START, rng)];
    while let Some(frame) = stack.last_mut() {
        if frame.next == frame.directions.len() {
            stack.pop();
            continue;
        }
        let direction = frame.directions[frame.next];
        frame.next += 1;

        let from = frame.position;
        let to = from.offset(direction, 2);
        if inner.contains(&to.x) && inner.contains(&to.y) && maze.cell(to) == Cell::Wall {
            maze.set(from.offset(direction, 1), Cell::Open);
            maze.set(to, Cell::Open);
            stack.push(CarveFrame::new(to, rng));
        }
    }
}
