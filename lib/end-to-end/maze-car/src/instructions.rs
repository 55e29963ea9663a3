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

use maze_logic::{Direction, Heading, Pose, Position};

use crate::RoundError;

/// Everything a navigation program may ask of the car.
///
/// Each call suspends for a simulated delay and fails with [`RoundError::Aborted`] once the round
/// has been cancelled, without having changed anything. A blocked move is not an error: it returns
/// `Ok(false)` and the program has to deal with it.
#[allow(async_fn_in_trait)]
pub trait Instructions {
    /// Drive `cells` cells forward. `Ok(false)` if a wall or the edge of the grid is in the way,
    /// in which case the car does not move at all. Zero cells succeeds without moving or
    /// logging anything.
    async fn move_forward(&mut self, cells: u32) -> Result<bool, RoundError>;

    /// Turn by `degrees`, a multiple of 90, positive being clockwise. Returns the new heading.
    async fn rotate(&mut self, degrees: i32) -> Result<Heading, RoundError>;

    /// Number of open cells between the car and the nearest wall in `direction`.
    async fn distance(&mut self, direction: Direction) -> Result<u32, RoundError>;

    /// Whether the car stands on the flag.
    async fn at_goal(&mut self) -> Result<bool, RoundError>;

    /// Where the car is.
    async fn position(&mut self) -> Result<Position, RoundError>;

    /// Where the car is and which way it faces.
    async fn compass(&mut self) -> Result<Pose, RoundError>;

    /// Write a line to the round's log.
    async fn write(&mut self, message: &str) -> Result<(), RoundError>;

    /// Face `target` using the shortest single turn.
    async fn rotate_to(&mut self, target: Heading) -> Result<(), RoundError> {
        let heading = self.compass().await?.heading;
        let turn = heading.shortest_turn_to(target);
        if turn != 0 {
            self.rotate(turn).await?;
        }
        Ok(())
    }

    /// Face `target` by turning clockwise a quarter at a time.
    async fn rotate_to_stepwise(&mut self, target: Heading) -> Result<(), RoundError> {
        let mut heading = self.compass().await?.heading;
        while heading != target {
            heading = self.rotate(90).await?;
        }
        Ok(())
    }

    async fn front(&mut self) -> Result<u32, RoundError> {
        self.distance(Direction::Front).await
    }

    async fn right(&mut self) -> Result<u32, RoundError> {
        self.distance(Direction::Right).await
    }

    async fn left(&mut self) -> Result<u32, RoundError> {
        self.distance(Direction::Left).await
    }

    async fn back(&mut self) -> Result<u32, RoundError> {
        self.distance(Direction::Back).await
    }
}
