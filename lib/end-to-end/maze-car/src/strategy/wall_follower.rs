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

use crate::instructions::Instructions;
use crate::strategy::{Outcome, Strategy};
use crate::RoundError;

/// Reflex driver with no memory: go straight if possible, otherwise right, otherwise left,
/// otherwise turn around. Cheap, but it can circle forever in some mazes.
#[derive(Debug, Clone, Default)]
pub struct WallFollower {
    max_iterations: Option<usize>,
}

impl WallFollower {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up after `max_iterations` sense-and-act cycles.
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations: Some(max_iterations),
        }
    }
}

impl Strategy for WallFollower {
    fn name(&self) -> &'static str {
        "wall follower"
    }

    async fn navigate<_Surface: Instructions>(
        &mut self,
        surface: &mut _Surface,
    ) -> Result<Outcome, RoundError> {
        let mut iterations = 0;
        while !surface.at_goal().await? {
            if self.max_iterations.is_some_and(|max| iterations >= max) {
                tracing::debug!(iterations, "wall follower giving up");
                return Ok(Outcome::GaveUp);
            }
            iterations += 1;

            let front = surface.front().await?;
            let right = surface.right().await?;
            let left = surface.left().await?;

            if front > 0 {
                surface.move_forward(1).await?;
            } else if right > 0 {
                surface.rotate(90).await?;
                surface.move_forward(1).await?;
            } else if left > 0 {
                surface.rotate(-90).await?;
                surface.move_forward(1).await?;
            } else {
                surface.rotate(180).await?;
            }
        }

        surface.write("Flag found!").await?;
        Ok(Outcome::ReachedGoal)
    }
}
