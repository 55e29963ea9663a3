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

//! Ultrasonic distance sensors and the flag detector.

use crate::grid::Maze;
use crate::pose::{Direction, Pose};

/// Count the open cells between the car and the first wall in `direction`. Zero means the
/// neighbouring cell in that direction is a wall. Never changes anything.
pub fn distance(maze: &Maze, pose: &Pose, direction: Direction) -> u32 {
    let step = pose.heading.resolve(direction).step();
    let mut cursor = pose.position;
    let mut steps: u32 = 0;
    while maze.is_passable(cursor) {
        cursor = cursor.offset(step, 1);
        steps += 1;
    }
    // the car's own cell was counted as the first step.
    steps.saturating_sub(1)
}

/// Whether the car stands on the flag.
pub fn at_goal(maze: &Maze, pose: &Pose) -> bool {
    pose.position == maze.goal()
}
