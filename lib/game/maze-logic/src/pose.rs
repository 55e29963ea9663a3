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

//! The car's pose and how it moves.

use serde::{Deserialize, Serialize};

use crate::grid::{Maze, Position, START};
use crate::MazeError;

/// Heading in degrees, clockwise, where 0 faces decreasing `y`. Always one of 0, 90, 180, 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub struct Heading(u16);

impl Heading {
    /// Facing decreasing `y`. The heading every round starts with.
    pub const UP: Heading = Heading(0);

    /// Facing increasing `x`.
    pub const RIGHT: Heading = Heading(90);

    /// Facing increasing `y`.
    pub const DOWN: Heading = Heading(180);

    /// Facing decreasing `x`.
    pub const LEFT: Heading = Heading(270);

    /// All four headings, clockwise from [`Heading::UP`].
    pub const ALL: [Heading; 4] = [Heading::UP, Heading::RIGHT, Heading::DOWN, Heading::LEFT];

    /// Normalize any multiple of 90 degrees, negative ones included, into a heading.
    pub fn from_degrees(degrees: i32) -> Result<Self, MazeError> {
        if degrees % 90 != 0 {
            return Err(MazeError::UnsupportedAngle(degrees));
        }
        Ok(Heading(degrees.rem_euclid(360) as u16))
    }

    /// Degrees in `0..360`.
    pub fn degrees(self) -> i32 {
        i32::from(self.0)
    }

    /// Turn by `delta` degrees.
    pub fn rotated(self, delta: i32) -> Result<Self, MazeError> {
        if delta % 90 != 0 {
            return Err(MazeError::UnsupportedAngle(delta));
        }
        Heading::from_degrees(self.degrees() + delta.rem_euclid(360))
    }

    /// Smallest signed turn that takes `self` to `target`, in `-90..=180`.
    pub fn shortest_turn_to(self, target: Heading) -> i32 {
        let difference = (target.degrees() - self.degrees()).rem_euclid(360);
        if difference <= 180 {
            difference
        } else {
            difference - 360
        }
    }

    /// Unit grid step for this heading: `(round(sin), round(-cos))`.
    pub fn step(self) -> (i32, i32) {
        let radians = f64::from(self.degrees()).to_radians();
        (radians.sin().round() as i32, (-radians.cos()).round() as i32)
    }

    /// Resolve a direction relative to this heading into an absolute heading.
    pub fn resolve(self, direction: Direction) -> Heading {
        Heading((self.0 + direction.offset()) % 360)
    }
}

impl From<Heading> for i32 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

impl TryFrom<i32> for Heading {
    type Error = MazeError;

    fn try_from(degrees: i32) -> Result<Self, Self::Error> {
        Heading::from_degrees(degrees)
    }
}

impl std::fmt::Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Direction relative to where the car is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Straight ahead.
    Front,

    /// 90 degrees clockwise.
    Right,

    /// 90 degrees counter-clockwise.
    Left,

    /// Behind the car.
    Back,
}

impl Direction {
    /// Search order used by the depth-first strategy.
    pub const PRIORITY: [Direction; 4] = [
        Direction::Front,
        Direction::Right,
        Direction::Left,
        Direction::Back,
    ];

    fn offset(self) -> u16 {
        match self {
            Direction::Front => 0,
            Direction::Right => 90,
            Direction::Back => 180,
            Direction::Left => 270,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Front => write!(f, "front"),
            Direction::Right => write!(f, "right"),
            Direction::Left => write!(f, "left"),
            Direction::Back => write!(f, "back"),
        }
    }
}

/// Where the car is and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    /// Cell the car stands on. Never a wall.
    pub position: Position,

    /// Way the car faces.
    pub heading: Heading,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: START,
            heading: Heading::UP,
        }
    }
}

impl Pose {
    /// Create a new pose.
    pub fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }

    /// Turn in place.
    pub fn rotate(&mut self, delta: i32) -> Result<Heading, MazeError> {
        self.heading = self.heading.rotated(delta)?;
        Ok(self.heading)
    }

    /// Where driving `cells` forward would end up, if every cell on the way is passable.
    pub fn target(&self, maze: &Maze, cells: u32) -> Option<Position> {
        let step = self.heading.step();
        let mut target = self.position;
        for _ in 0..cells {
            target = target.offset(step, 1);
            if !maze.is_passable(target) {
                return None;
            }
        }
        Some(target)
    }

    /// Drive forward `cells` cells. Either the whole move happens, or the pose is left alone and
    /// `false` is returned.
    pub fn advance(&mut self, maze: &Maze, cells: u32) -> bool {
        match self.target(maze, cells) {
            Some(target) => {
                self.position = target;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rand::SeedableRng;

    use super::*;
    use crate::generate;

    #[test]
    fn test_heading_steps() {
        assert_eq!(Heading::UP.step(), (0, -1));
        assert_eq!(Heading::RIGHT.step(), (1, 0));
        assert_eq!(Heading::DOWN.step(), (0, 1));
        assert_eq!(Heading::LEFT.step(), (-1, 0));
    }

    #[test]
    fn test_rotation_normalizes_negative_angles() {
        assert_eq!(Heading::UP.rotated(-90), Ok(Heading::LEFT));
        assert_eq!(Heading::UP.rotated(-450), Ok(Heading::LEFT));
        assert_eq!(Heading::LEFT.rotated(90), Ok(Heading::UP));
        assert_eq!(Heading::RIGHT.rotated(720), Ok(Heading::RIGHT));
        assert_eq!(Heading::from_degrees(-180), Ok(Heading::DOWN));
    }

    #[test]
    fn test_rotation_rejects_odd_angles() {
        assert_eq!(Heading::UP.rotated(45), Err(MazeError::UnsupportedAngle(45)));
        assert_eq!(Heading::from_degrees(100), Err(MazeError::UnsupportedAngle(100)));
    }

    #[test]
    fn test_resolve_directions() {
        assert_eq!(Heading::UP.resolve(Direction::Front), Heading::UP);
        assert_eq!(Heading::UP.resolve(Direction::Right), Heading::RIGHT);
        assert_eq!(Heading::UP.resolve(Direction::Left), Heading::LEFT);
        assert_eq!(Heading::UP.resolve(Direction::Back), Heading::DOWN);
        assert_eq!(Heading::LEFT.resolve(Direction::Right), Heading::UP);
        assert_eq!(Heading::RIGHT.resolve(Direction::Left), Heading::UP);
    }

    #[test]
    fn test_shortest_turn() {
        assert_eq!(Heading::UP.shortest_turn_to(Heading::UP), 0);
        assert_eq!(Heading::UP.shortest_turn_to(Heading::RIGHT), 90);
        assert_eq!(Heading::UP.shortest_turn_to(Heading::DOWN), 180);
        assert_eq!(Heading::UP.shortest_turn_to(Heading::LEFT), -90);
        assert_eq!(Heading::LEFT.shortest_turn_to(Heading::UP), 90);
    }

    #[test]
    fn test_heading_serializes_as_degrees() {
        let json = serde_json::to_string(&Heading::LEFT).expect("serialize");
        assert_eq!(json, "270");
        let back: Heading = serde_json::from_str("-90").expect("deserialize");
        assert_eq!(back, Heading::LEFT);
        assert!(serde_json::from_str::<Heading>("45").is_err());
    }

    #[test]
    fn test_advance_into_wall_leaves_pose() {
        let maze = Maze::from_ascii("#####\n#...#\n###.#\n#G..#\n#####").expect("valid layout");
        let mut pose = Pose::default();
        assert!(!pose.advance(&maze, 1));
        assert_eq!(pose, Pose::default());

        pose.rotate(90).expect("quarter turn");
        assert!(pose.advance(&maze, 2));
        assert_eq!(pose.position, Position::new(3, 1));

        // Two cells down would pass through (3, 2) and stop on (3, 3).
        pose.rotate(90).expect("quarter turn");
        assert!(!pose.advance(&maze, 3));
        assert_eq!(pose.position, Position::new(3, 1));
        assert!(pose.advance(&maze, 2));
        assert_eq!(pose.position, Position::new(3, 3));
    }

    proptest! {
        #[test]
        fn test_move_is_reversible(seed in any::<u64>(), turns in 0i32..4) {
            let maze = generate(11, &mut crate::Rng::seed_from_u64(seed)).expect("valid size");
            let mut pose = Pose::default();
            pose.rotate(turns * 90).expect("quarter turns");
            let before = pose;
            if pose.advance(&maze, 1) {
                pose.rotate(180).expect("half turn");
                prop_assert!(pose.advance(&maze, 1));
                pose.rotate(180).expect("half turn");
                prop_assert_eq!(pose, before);
            } else {
                prop_assert_eq!(pose, before);
            }
        }
    }
}
