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

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use maze_car::{
    run_strategy, DepthFirst, Difficulty, Latency, RoundConfig, RunReport, SimulationRound,
    WallFollower,
};

mod logging;

/// Drive a car through a freshly carved maze.
#[derive(Debug, Parser)]
#[command(name = "maze-car")]
struct Args {
    /// easy, medium or hard (or 1, 2, 3).
    #[arg(long, default_value_t = Difficulty::Medium)]
    difficulty: Difficulty,

    /// Side length, overriding the difficulty. Must be odd and at least 5.
    #[arg(long)]
    size: Option<usize>,

    /// Seed for carving, to replay a maze.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = StrategyKind::DepthFirst)]
    strategy: StrategyKind,

    /// Time one move takes, in milliseconds.
    #[arg(long, default_value_t = 500)]
    movement_ms: u64,

    /// Time a turn or a sensor reading takes, in milliseconds.
    #[arg(long, default_value_t = 100)]
    instant_ms: u64,

    /// Let the wall follower give up after this many cycles.
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Redraw the maze after every move.
    #[arg(long)]
    render: bool,

    /// Print events as JSON lines.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    WallFollower,
    DepthFirst,
}

impl Args {
    fn round_config(&self) -> RoundConfig {
        RoundConfig::new(
            self.size.unwrap_or_else(|| self.difficulty.size()),
            Latency {
                movement: Duration::from_millis(self.movement_ms),
                instant: Duration::from_millis(self.instant_ms),
            },
            self.seed,
        )
    }
}

// HH:MM:SS.mmm
fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let hours = millis / 3_600_000;
    let minutes = (millis / 60_000) % 60;
    let seconds = (millis / 1_000) % 60;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        hours,
        minutes,
        seconds,
        millis % 1_000
    )
}

async fn run(args: &Args, round: &mut SimulationRound) -> RunReport {
    match args.strategy {
        StrategyKind::WallFollower => {
            let mut strategy = match args.max_iterations {
                Some(max_iterations) => WallFollower::with_max_iterations(max_iterations),
                None => WallFollower::new(),
            };
            run_strategy(round, &mut strategy).await
        }
        StrategyKind::DepthFirst => run_strategy(round, &mut DepthFirst::new()).await,
    }
}

fn print_events(round: &SimulationRound, json: bool) {
    for event in round.events() {
        if json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::error!(error = %e, "could not encode event"),
            }
        } else {
            println!("[{}] {}", event.level(), event);
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    let mut round = match SimulationRound::new(&args.round_config()) {
        Ok(round) => round,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", round.snapshot());

    let token = round.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("aborting execution");
            token.cancel();
        }
    });

    if args.render {
        let mut snapshots = round.subscribe();
        tokio::spawn(async move {
            while snapshots.changed().await.is_ok() {
                let snapshot = snapshots.borrow_and_update().clone();
                // clear the screen and home the cursor before redrawing.
                print!("\x1b[2J\x1b[H{}", snapshot);
            }
        });
    }

    let report = run(&args, &mut round).await;

    print_events(&round, args.json);
    println!("{}", round.snapshot());
    println!("Time: {}", format_elapsed(report.elapsed));

    if report.solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
