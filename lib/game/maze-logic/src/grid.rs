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

//! The maze grid: cells, positions and the walled board the car drives on.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::{HashSet, MazeError};

/// Maze cell. Part of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Solid cell, the car can never enter it.
    Wall,

    /// Carved corridor cell.
    Open,

    /// The flag. Open for driving, and there is exactly one of it.
    Goal,
}

impl Cell {
    /// Whether the car is allowed to stand on this cell.
    pub fn is_passable(self) -> bool {
        self != Cell::Wall
    }

    fn symbol(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Open => '.',
            Cell::Goal => 'G',
        }
    }
}

/// Cell coordinates. `x` grows to the right and `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Column.
    pub x: i32,

    /// Row.
    pub y: i32,
}

impl Position {
    /// Create a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position `k` unit steps of `(dx, dy)` away.
    pub fn offset(self, (dx, dy): (i32, i32), k: i32) -> Self {
        Self {
            x: self.x + dx * k,
            y: self.y + dy * k,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where every round starts.
pub const START: Position = Position::new(1, 1);

/// Square maze. The border is always wall, the start is always open and there is exactly one
/// goal cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Maze {
    cells: Vec<Cell>,
    size: usize,
    goal: Position,
}

// print the grid as rows of '#', '.' and 'G'.
impl std::fmt::Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (row, cells) in self.cells.chunks(self.size).enumerate() {
            let line: String = cells.iter().map(|cell| cell.symbol()).collect();
            if row + 1 < self.size {
                writeln!(f, "{}", line)?;
            } else {
                write!(f, "{}", line)?;
            }
        }
        Ok(())
    }
}

impl From<Maze> for String {
    fn from(maze: Maze) -> Self {
        maze.to_string()
    }
}

// input goes through the same checks as a hand-drawn fixture.
impl TryFrom<String> for Maze {
    type Error = MazeError;

    fn try_from(picture: String) -> Result<Self, Self::Error> {
        Maze::from_ascii(&picture)
    }
}

impl Maze {
    /// A grid that is wall everywhere. The goal is placed in the corner opposite the start but
    /// not marked yet.
    pub(crate) fn walled(size: usize) -> Self {
        let corner = size as i32 - 2;
        Self {
            cells: vec![Cell::Wall; size * size],
            size,
            goal: Position::new(corner, corner),
        }
    }

    /// Build a maze from a picture of '#' (wall), '.' (open) and 'G' (goal) rows. Blank lines and
    /// surrounding whitespace are ignored.
    pub fn from_ascii(picture: &str) -> Result<Self, MazeError> {
        let rows: Vec<&str> = picture
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let size = rows.len();
        if size < 3 {
            return Err(MazeError::MalformedLayout(format!(
                "need at least 3 rows, got {}",
                size
            )));
        }

        let mut cells = Vec::with_capacity(size * size);
        let mut goals = Vec::new();
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != size {
                return Err(MazeError::MalformedLayout(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.chars().count(),
                    size
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let cell = match c {
                    '#' => Cell::Wall,
                    '.' => Cell::Open,
                    'G' => {
                        goals.push(Position::new(x as i32, y as i32));
                        Cell::Goal
                    }
                    other => {
                        return Err(MazeError::MalformedLayout(format!(
                            "unknown symbol '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
                cells.push(cell);
            }
        }

        let goal = match goals.as_slice() {
            [goal] => *goal,
            _ => {
                return Err(MazeError::MalformedLayout(format!(
                    "expected exactly one goal, found {}",
                    goals.len()
                )))
            }
        };
        let maze = Self { cells, size, goal };
        if !maze.border_is_wall() {
            return Err(MazeError::MalformedLayout(
                "border must be wall".to_string(),
            ));
        }
        if !maze.cell(START).is_passable() {
            return Err(MazeError::MalformedLayout(format!(
                "start {} must not be wall",
                START
            )));
        }
        Ok(maze)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Position of the goal cell.
    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Position of the start cell.
    pub fn start(&self) -> Position {
        START
    }

    /// All cells, row after row.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells as a matrix indexed `[y][x]`.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.chunks(self.size).map(<[Cell]>::to_vec).collect()
    }

    /// Check if a position is on the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        let size = self.size as i32;
        (0..size).contains(&position.x) && (0..size).contains(&position.y)
    }

    /// Get a cell. Anything off the grid reads as wall, so callers never need their own bounds
    /// checks.
    pub fn cell(&self, position: Position) -> Cell {
        match self.index(position) {
            Some(index) => self.cells[index],
            None => Cell::Wall,
        }
    }

    /// Whether the car may stand on `position`.
    pub fn is_passable(&self, position: Position) -> bool {
        self.cell(position).is_passable()
    }

    /// Number of cells that are not wall.
    pub fn passable_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_passable()).count()
    }

    /// Check the border invariant: every cell on the outer ring is wall.
    pub fn border_is_wall(&self) -> bool {
        let last = self.size as i32 - 1;
        (0..=last).all(|i| {
            [
                Position::new(i, 0),
                Position::new(i, last),
                Position::new(0, i),
                Position::new(last, i),
            ]
            .iter()
            .all(|p| self.cell(*p) == Cell::Wall)
        })
    }

    /// Flood fill over passable cells. True if `to` can be driven to from `from`.
    pub fn is_reachable(&self, from: Position, to: Position) -> bool {
        if !self.is_passable(from) || !self.is_passable(to) {
            return false;
        }
        let mut seen = HashSet::default();
        let mut queue = VecDeque::from([from]);
        seen.insert(from);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for step in [(0, -1), (1, 0), (0, 1), (-1, 0)] {
                let next = current.offset(step, 1);
                if self.is_passable(next) && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        false
    }

    pub(crate) fn set(&mut self, position: Position, cell: Cell) {
        if let Some(index) = self.index(position) {
            self.cells[index] = cell;
        }
    }

    /// Open the goal cell and put the flag on it. Safe to repeat.
    pub(crate) fn mark_goal(&mut self) {
        self.set(self.goal, Cell::Goal);
    }

    /// Carve a straight L-shaped corridor from the goal back to the start: first along x, then
    /// along y. Existing corridors are left open.
    pub(crate) fn carve_direct_path(&mut self) {
        let mut current = self.goal;
        while current != START {
            if current.x > START.x {
                current.x -= 1;
            } else if current.y > START.y {
                current.y -= 1;
            } else {
                break;
            }
            if self.cell(current) == Cell::Wall {
                self.set(current, Cell::Open);
            }
        }
        self.mark_goal();
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.in_bounds(position) {
            Some(position.y as usize * self.size + position.x as usize)
        } else {
            None
        }
    }
}
