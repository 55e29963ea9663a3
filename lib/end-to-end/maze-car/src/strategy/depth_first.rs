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

use maze_logic::{Direction, HashSet, Heading, Position};

use crate::instructions::Instructions;
use crate::strategy::{Outcome, Strategy};
use crate::RoundError;

/// A cell the search is standing in, the heading it arrived with, and how many of the
/// directions in [`Direction::PRIORITY`] it has tried.
#[derive(Debug, Clone, Copy)]
struct Frame {
    position: Position,
    heading: Heading,
    next: usize,
}

impl Frame {
    fn new(position: Position, heading: Heading) -> Self {
        Self {
            position,
            heading,
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let direction = Direction::PRIORITY.get(self.next).copied();
        self.next += 1;
        direction
    }
}

/// Depth-first search that physically backs out of dead ends.
///
/// The car has no way to jump back to an earlier cell, so every branch that fails is undone by
/// turning around, driving one cell back and turning around again. Afterwards the car faces the
/// way it did before the branch, so the remaining directions of that cell are read against the
/// same heading. Each cell is entered at most once, which bounds the search by the number of
/// open cells.
#[derive(Debug, Clone, Default)]
pub struct DepthFirst {
    visited: HashSet<Position>,
}

impl DepthFirst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cells entered during the last search.
    pub fn visited(&self) -> &HashSet<Position> {
        &self.visited
    }
}

impl Strategy for DepthFirst {
    fn name(&self) -> &'static str {
        "depth-first search"
    }

    async fn navigate<_Surface: Instructions>(
        &mut self,
        surface: &mut _Surface,
    ) -> Result<Outcome, RoundError> {
        self.visited.clear();

        let start = surface.compass().await?;
        self.visited.insert(start.position);
        if surface.at_goal().await? {
            return Ok(Outcome::ReachedGoal);
        }

        let mut stack = vec![Frame::new(start.position, start.heading)];
        while let Some(frame) = stack.last_mut() {
            let Some(direction) = frame.next_direction() else {
                let Some(exhausted) = stack.pop() else {
                    break;
                };
                match stack.last() {
                    Some(parent) => back_out(surface, exhausted.position, parent.heading).await?,
                    None => {
                        tracing::debug!(visited = self.visited.len(), "search exhausted");
                        return Ok(Outcome::Exhausted);
                    }
                }
                continue;
            };
            let Frame {
                position, heading, ..
            } = *frame;

            if surface.distance(direction).await? == 0 {
                continue;
            }
            let target = heading.resolve(direction);
            let candidate = position.offset(target.step(), 1);
            if self.visited.contains(&candidate) {
                continue;
            }

            surface.rotate_to(target).await?;
            if !surface.move_forward(1).await? {
                surface.rotate_to(heading).await?;
                continue;
            }
            self.visited.insert(candidate);
            tracing::trace!(%candidate, %direction, "entered");

            if surface.at_goal().await? {
                tracing::debug!(visited = self.visited.len(), "search reached the flag");
                return Ok(Outcome::ReachedGoal);
            }
            stack.push(Frame::new(candidate, target));
        }

        Ok(Outcome::Exhausted)
    }
}

/// Undo the last step of the search: drive from `from` back into the previous cell, facing the
/// heading that cell had before it branched.
async fn back_out<_Surface: Instructions>(
    surface: &mut _Surface,
    from: Position,
    heading_before: Heading,
) -> Result<(), RoundError> {
    surface.rotate(180).await?;
    if !surface.move_forward(1).await? {
        return Err(RoundError::Stuck { from });
    }
    surface.rotate(180).await?;
    surface.rotate_to(heading_before).await
}
