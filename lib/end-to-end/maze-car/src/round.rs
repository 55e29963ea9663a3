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

use maze_logic::{sensor, Direction, Heading, Maze, Pose, Position};
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::config::{Latency, RoundConfig};
use crate::events::{RoundEvent, Snapshot};
use crate::instructions::Instructions;
use crate::RoundError;

/// One round of the game: a maze, the car in it, and the token that stops it.
///
/// The round is the only owner of the car's pose. Navigation programs drive it through
/// [`Instructions`], and everything that happens is appended to the event log and published as
/// a [`Snapshot`] to subscribers.
pub struct SimulationRound {
    maze: Maze,
    pose: Pose,
    latency: Latency,
    cancel: CancellationToken,
    events: Vec<RoundEvent>,
    snapshots: watch::Sender<Snapshot>,
    started: Option<Instant>,
}

impl SimulationRound {
    /// Carve a new maze as configured and put the car on the start cell.
    pub fn new(config: &RoundConfig) -> Result<Self, RoundError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut rng = maze_logic::Rng::seed_from_u64(seed);
        let maze = maze_logic::generate(config.size, &mut rng)?;
        tracing::info!(size = config.size, seed, "maze generated");

        let mut round = Self::with_maze(maze, config.latency);
        round.events.insert(
            0,
            RoundEvent::MazeGenerated {
                size: config.size,
                seed,
            },
        );
        Ok(round)
    }

    /// Play on an existing maze.
    pub fn with_maze(maze: Maze, latency: Latency) -> Self {
        let pose = Pose::default();
        let (snapshots, _) = watch::channel(Snapshot::new(&maze, pose));
        let mut round = Self {
            maze,
            pose,
            latency,
            cancel: CancellationToken::new(),
            events: Vec::new(),
            snapshots,
            started: None,
        };
        round.emit(RoundEvent::Reset { pose });
        round
    }

    /// Put the car back on the start cell facing up. A token that was already used to abort is
    /// replaced so the round can be run again.
    pub fn reset(&mut self) {
        self.pose = Pose::default();
        if self.cancel.is_cancelled() {
            self.cancel = CancellationToken::new();
        }
        self.started = None;
        self.emit(RoundEvent::Reset { pose: self.pose });
        self.publish();
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Handle for aborting the round from elsewhere, e.g. a Ctrl-C listener.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_aborted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Everything that has happened so far, oldest first.
    pub fn events(&self) -> &[RoundEvent] {
        &self.events
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.maze, self.pose)
    }

    /// Receive a fresh snapshot after every change to the car or the maze.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    /// Start the clock for a run.
    pub fn start_clock(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Time since [`SimulationRound::start_clock`], if it was started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|started| started.elapsed())
    }

    pub(crate) fn emit(&mut self, event: RoundEvent) {
        let level = event.level().tracing_level();
        if level == tracing::Level::ERROR {
            tracing::error!(%event);
        } else if level == tracing::Level::WARN {
            tracing::warn!(%event);
        } else {
            tracing::debug!(%event);
        }
        self.events.push(event);
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    /// Wait out a simulated delay. Fails as soon as the round is cancelled, and also if it was
    /// cancelled before the delay ended, so the caller never applies its effect.
    async fn settle(&self, delay: Duration) -> Result<(), RoundError> {
        if !delay.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {}
            }
        }
        if self.cancel.is_cancelled() {
            tracing::debug!(pose = ?self.pose, "operation cancelled");
            return Err(RoundError::Aborted);
        }
        Ok(())
    }
}

impl Instructions for SimulationRound {
    async fn move_forward(&mut self, cells: u32) -> Result<bool, RoundError> {
        self.settle(self.latency.movement).await?;

        let from = self.pose.position;
        if cells == 0 {
            return Ok(true);
        }
        if !self.pose.advance(&self.maze, cells) {
            self.emit(RoundEvent::MoveBlocked {
                from,
                heading: self.pose.heading,
            });
            return Ok(false);
        }

        let to = self.pose.position;
        self.emit(RoundEvent::Moved { to });
        if sensor::at_goal(&self.maze, &self.pose) {
            tracing::info!(%to, "reached the flag");
            self.emit(RoundEvent::ReachedFlag { at: to });
        }
        self.publish();
        Ok(true)
    }

    async fn rotate(&mut self, degrees: i32) -> Result<Heading, RoundError> {
        self.settle(self.latency.instant).await?;
        let heading = self.pose.rotate(degrees)?;
        self.emit(RoundEvent::Rotated { heading });
        self.publish();
        Ok(heading)
    }

    async fn distance(&mut self, direction: Direction) -> Result<u32, RoundError> {
        self.settle(self.latency.instant).await?;
        let distance = sensor::distance(&self.maze, &self.pose, direction);
        tracing::trace!(%direction, distance, "sensed");
        Ok(distance)
    }

    async fn at_goal(&mut self) -> Result<bool, RoundError> {
        self.settle(self.latency.instant).await?;
        Ok(sensor::at_goal(&self.maze, &self.pose))
    }

    async fn position(&mut self) -> Result<Position, RoundError> {
        self.settle(self.latency.instant).await?;
        let position = self.pose.position;
        self.emit(RoundEvent::PositionReported { position });
        Ok(position)
    }

    async fn compass(&mut self) -> Result<Pose, RoundError> {
        self.position().await?;
        Ok(self.pose)
    }

    async fn write(&mut self, message: &str) -> Result<(), RoundError> {
        self.settle(self.latency.instant).await?;
        self.emit(RoundEvent::Message {
            text: message.to_string(),
        });
        Ok(())
    }

    // the round knows its own heading, so turning to face something is a single turn with no
    // compass reading first.
    async fn rotate_to(&mut self, target: Heading) -> Result<(), RoundError> {
        let turn = self.pose.heading.shortest_turn_to(target);
        if turn != 0 {
            self.rotate(turn).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Maze {
        Maze::from_ascii(
            "
            #####
            #...#
            ###.#
            #G..#
            #####
            ",
        )
        .expect("valid layout")
    }

    #[tokio::test]
    async fn test_new_round_starts_at_start_facing_up() {
        let config = RoundConfig::new(11, Latency::none(), Some(42));
        let round = SimulationRound::new(&config).expect("valid config");
        assert_eq!(round.pose(), Pose::new(Position::new(1, 1), Heading::UP));
        assert_eq!(round.maze().size(), 11);
        assert_eq!(
            round.events()[0],
            RoundEvent::MazeGenerated { size: 11, seed: 42 }
        );
    }

    #[tokio::test]
    async fn test_new_round_rejects_even_size() {
        let config = RoundConfig::new(10, Latency::none(), Some(42));
        assert!(matches!(
            SimulationRound::new(&config),
            Err(RoundError::Maze(maze_logic::MazeError::InvalidSize { .. }))
        ));
    }

    #[tokio::test]
    async fn test_blocked_move_is_not_an_error() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        assert_eq!(round.move_forward(1).await, Ok(false));
        assert_eq!(round.pose(), Pose::default());
        assert!(matches!(
            round.events().last(),
            Some(RoundEvent::MoveBlocked { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_cell_move_changes_nothing() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        let logged = round.events().len();
        assert_eq!(round.move_forward(0).await, Ok(true));
        assert_eq!(round.pose(), Pose::default());
        assert_eq!(round.events().len(), logged);
    }

    #[tokio::test]
    async fn test_move_and_rotate_update_pose() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        assert_eq!(round.rotate(90).await, Ok(Heading::RIGHT));
        assert_eq!(round.move_forward(2).await, Ok(true));
        assert_eq!(round.pose().position, Position::new(3, 1));
        assert_eq!(round.rotate(-270).await, Ok(Heading::DOWN));
        assert_eq!(round.distance(Direction::Front).await, Ok(2));
        assert_eq!(round.distance(Direction::Left).await, Ok(0));
    }

    #[tokio::test]
    async fn test_move_then_reverse_returns_to_pose() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.rotate(90).await.expect("rotate");
        let before = round.pose();
        assert_eq!(round.move_forward(1).await, Ok(true));
        round.rotate(180).await.expect("rotate");
        assert_eq!(round.move_forward(1).await, Ok(true));
        round.rotate(180).await.expect("rotate");
        assert_eq!(round.pose(), before);
    }

    #[tokio::test]
    async fn test_unsupported_angle_leaves_heading() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        assert_eq!(
            round.rotate(45).await,
            Err(RoundError::Maze(maze_logic::MazeError::UnsupportedAngle(45)))
        );
        assert_eq!(round.pose().heading, Heading::UP);
    }

    #[tokio::test]
    async fn test_reaching_goal_is_reported() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.rotate(90).await.expect("rotate");
        round.move_forward(2).await.expect("move");
        round.rotate(90).await.expect("rotate");
        round.move_forward(2).await.expect("move");
        round.rotate(90).await.expect("rotate");
        assert_eq!(round.at_goal().await, Ok(false));
        round.move_forward(2).await.expect("move");
        assert_eq!(round.at_goal().await, Ok(true));
        assert!(round
            .events()
            .contains(&RoundEvent::ReachedFlag {
                at: Position::new(1, 3)
            }));
    }

    #[tokio::test]
    async fn test_compass_reports_pose() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.rotate(-90).await.expect("rotate");
        assert_eq!(
            round.compass().await,
            Ok(Pose::new(Position::new(1, 1), Heading::LEFT))
        );
        assert_eq!(round.position().await, Ok(Position::new(1, 1)));
    }

    #[tokio::test]
    async fn test_stepwise_rotation_turns_clockwise() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round
            .rotate_to_stepwise(Heading::LEFT)
            .await
            .expect("rotate");
        assert_eq!(round.pose().heading, Heading::LEFT);
        let turns = round
            .events()
            .iter()
            .filter(|event| matches!(event, RoundEvent::Rotated { .. }))
            .count();
        assert_eq!(turns, 3);
    }

    #[tokio::test]
    async fn test_rotate_to_uses_one_turn() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.rotate_to(Heading::LEFT).await.expect("rotate");
        round.rotate_to(Heading::LEFT).await.expect("rotate");
        assert_eq!(round.pose().heading, Heading::LEFT);
        let turns: Vec<_> = round
            .events()
            .iter()
            .filter(|event| matches!(event, RoundEvent::Rotated { .. }))
            .collect();
        assert_eq!(
            turns,
            vec![&RoundEvent::Rotated {
                heading: Heading::LEFT
            }]
        );
    }

    #[tokio::test]
    async fn test_write_appends_user_message() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.write("Flag found!").await.expect("write");
        assert_eq!(
            round.events().last(),
            Some(&RoundEvent::Message {
                text: "Flag found!".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_subscribers_see_every_move() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        let mut snapshots = round.subscribe();
        round.rotate(90).await.expect("rotate");
        round.move_forward(1).await.expect("move");
        assert!(snapshots.has_changed().expect("sender alive"));
        let snapshot = snapshots.borrow_and_update().clone();
        assert_eq!(snapshot.pose, Pose::new(Position::new(2, 1), Heading::RIGHT));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_move_aborts_without_moving() {
        let latency = Latency {
            movement: Duration::from_millis(500),
            instant: Duration::from_millis(100),
        };
        let mut round = SimulationRound::with_maze(corridor(), latency);
        round.rotate(90).await.expect("rotate");
        let before = round.pose();

        let token = round.cancellation_token();
        let (moved, ()) = tokio::join!(round.move_forward(1), async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            token.cancel();
        });

        assert_eq!(moved, Err(RoundError::Aborted));
        assert_eq!(round.pose(), before);
        assert!(round.is_aborted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_operations_after_abort_all_fail() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::default());
        round.cancellation_token().cancel();
        assert_eq!(round.rotate(90).await, Err(RoundError::Aborted));
        assert_eq!(round.distance(Direction::Right).await, Err(RoundError::Aborted));
        assert_eq!(round.at_goal().await, Err(RoundError::Aborted));
        assert_eq!(round.write("hello").await, Err(RoundError::Aborted));
        assert_eq!(round.pose(), Pose::default());
    }

    #[tokio::test]
    async fn test_reset_after_abort_gives_new_token() {
        let mut round = SimulationRound::with_maze(corridor(), Latency::none());
        round.rotate(90).await.expect("rotate");
        round.cancellation_token().cancel();
        round.reset();
        assert!(!round.is_aborted());
        assert_eq!(round.pose(), Pose::default());
        assert_eq!(round.rotate(90).await, Ok(Heading::RIGHT));
    }
}
