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

use std::time::Duration;

use crate::RoundError;

/// Difficulty levels offered to players. Each one is a maze side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    /// 11 x 11.
    Easy,

    /// 15 x 15.
    #[default]
    Medium,

    /// 21 x 21.
    Hard,
}

impl Difficulty {
    /// Maze side length for this level.
    pub fn size(self) -> usize {
        match self {
            Difficulty::Easy => 11,
            Difficulty::Medium => 15,
            Difficulty::Hard => 21,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

// accept either the name or the level number, 1 being easy.
impl std::str::FromStr for Difficulty {
    type Err = RoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(RoundError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Simulated actuator and sensor delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    /// How long driving forward takes.
    pub movement: Duration,

    /// How long turning, sensing and reporting take.
    pub instant: Duration,
}

impl Latency {
    /// No delays at all, for tests and batch runs.
    pub fn none() -> Self {
        Self {
            movement: Duration::ZERO,
            instant: Duration::ZERO,
        }
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            movement: Duration::from_millis(500),
            instant: Duration::from_millis(100),
        }
    }
}

pub struct RoundConfig {
    pub size: usize,
    pub latency: Latency,

    /// Seed for carving. A random one is drawn and reported when this is `None`.
    pub seed: Option<u64>,
}

impl RoundConfig {
    pub fn new(size: usize, latency: Latency, seed: Option<u64>) -> Self {
        Self {
            size,
            latency,
            seed,
        }
    }

    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.size(), Latency::default(), None)
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}
