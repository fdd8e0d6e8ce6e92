//! Terminal hosts: a human against the oracle, or the oracle against a local player.

use anyhow::{Context, Result};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;
use strictly_board::{GameEngine, GameEvent, GameStatus, Player, Position, SharedEngine};
use strictly_oracle::{
    ChannelSink, CoordinatorConfig, CoordinatorEvent, MoveCoordinator, OracleConfig,
    SimpleDecisionSource,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

fn lock(engine: &SharedEngine) -> MutexGuard<'_, GameEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

fn print_board(engine: &SharedEngine) {
    println!("\n{}\n", lock(engine).board_snapshot());
}

fn describe_game_event(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::GameStarted { session_id } => Some(format!("--- Game {} started ---", session_id)),
        GameEvent::MoveMade { index, player } => Some(format!("{} played {}", player, index)),
        GameEvent::WinningLineFound { .. } => None,
        GameEvent::GameWon { winner, line } => Some(format!("GAME OVER! {} wins on {:?}", winner, line)),
        GameEvent::GameDraw => Some("GAME OVER! It's a draw!".to_string()),
    }
}

fn describe_coordinator_event(name: &str, event: &CoordinatorEvent) -> Option<String> {
    match event {
        CoordinatorEvent::ThinkingStarted { .. } => Some(format!("{} is thinking...", name)),
        CoordinatorEvent::FallbackUsed { index, reason, .. } => {
            Some(format!("{} fell back to {} ({})", name, index, reason))
        }
        CoordinatorEvent::StaleDecisionDiscarded { reason, .. } => {
            Some(format!("{} discarded a stale answer ({})", name, reason))
        }
        CoordinatorEvent::DecisionAccepted { .. } | CoordinatorEvent::ThinkingFinished { .. } => None,
    }
}

/// What the human typed.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Move(Position),
    NewGame,
    Quit,
    Unknown,
}

fn parse_command(line: &str) -> Command {
    match line.trim().to_lowercase().as_str() {
        "q" | "quit" => Command::Quit,
        "n" | "new" => Command::NewGame,
        other => Position::from_keypad(other).map_or(Command::Unknown, Command::Move),
    }
}

/// Plays a human (on stdin) against the configured oracle.
#[instrument(skip(config), fields(name = %config.name()))]
pub async fn run_play(config: OracleConfig, human: Player) -> Result<()> {
    let config = config.with_side(human.opponent());
    let source = config.build_source().context("Failed to build decision source")?;

    let engine = GameEngine::new().into_shared();
    let (coordinator_sink, coordinator_feed) = ChannelSink::<GameEvent>::channel();
    let (ui_sink, mut game_events) = ChannelSink::<GameEvent>::channel();
    let coordinator_subscription = {
        let mut engine = lock(&engine);
        engine.subscribe(ui_sink);
        engine.subscribe(coordinator_sink)
    };

    let mut coordinator = MoveCoordinator::new(
        Arc::clone(&engine),
        source,
        *config.side(),
        config.coordinator_config(),
    );
    let (thinking_sink, mut thinking_events) = ChannelSink::<CoordinatorEvent>::channel();
    coordinator.subscribe(thinking_sink);
    let coordinator_task = tokio::spawn(coordinator.run(coordinator_feed));

    println!("You are {}. Type 1-9 to move, 'n' for a new game, 'q' to quit.", human);
    lock(&engine).new_game();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else { break };
                match parse_command(&line) {
                    Command::Quit => break,
                    Command::NewGame => {
                        lock(&engine).new_game();
                    }
                    Command::Move(position) => {
                        let result = lock(&engine).submit_move(position.to_index(), human);
                        if let Err(e) = result {
                            println!("Invalid move: {}", e);
                        }
                    }
                    Command::Unknown => println!("Type 1-9, 'n', or 'q'."),
                }
            }
            Some(event) = game_events.recv() => {
                if let Some(text) = describe_game_event(&event) {
                    println!("{}", text);
                }
                if matches!(event, GameEvent::MoveMade { .. } | GameEvent::GameStarted { .. }) {
                    print_board(&engine);
                }
            }
            Some(event) = thinking_events.recv() => {
                if let Some(text) = describe_coordinator_event(config.name(), &event) {
                    println!("{}", text);
                }
            }
        }
    }

    // Dropping the subscription closes the coordinator's feed and ends its loop.
    lock(&engine).unsubscribe(coordinator_subscription);
    coordinator_task.await.context("Coordinator task panicked")?;
    info!("Play session ended");
    Ok(())
}

/// Plays `games` games of the oracle (O) against a simple local X player.
#[instrument(skip(config), fields(name = %config.name()))]
pub async fn run_watch(config: OracleConfig, games: u32) -> Result<()> {
    let config = config.with_side(Player::O);
    let source = config.build_source().context("Failed to build decision source")?;

    let engine = GameEngine::new().into_shared();
    let (x_sink, x_feed) = ChannelSink::<GameEvent>::channel();
    let (o_sink, o_feed) = ChannelSink::<GameEvent>::channel();
    let (ui_sink, mut game_events) = ChannelSink::<GameEvent>::channel();
    let subscriptions = {
        let mut engine = lock(&engine);
        engine.subscribe(ui_sink);
        [engine.subscribe(x_sink), engine.subscribe(o_sink)]
    };

    let x_player = MoveCoordinator::new(
        Arc::clone(&engine),
        Arc::new(SimpleDecisionSource::new("Simple")),
        Player::X,
        CoordinatorConfig::default().with_thinking_delay(Duration::from_millis(300)),
    );
    let mut o_player = MoveCoordinator::new(
        Arc::clone(&engine),
        source,
        Player::O,
        config.coordinator_config(),
    );
    let (thinking_sink, mut thinking_events) = ChannelSink::<CoordinatorEvent>::channel();
    o_player.subscribe(thinking_sink);

    let tasks = [
        tokio::spawn(x_player.run(x_feed)),
        tokio::spawn(o_player.run(o_feed)),
    ];

    let (mut x_wins, mut o_wins, mut draws) = (0u32, 0u32, 0u32);
    for game in 1..=games {
        lock(&engine).new_game();
        loop {
            tokio::select! {
                Some(event) = game_events.recv() => {
                    if let Some(text) = describe_game_event(&event) {
                        println!("{}", text);
                    }
                    if matches!(event, GameEvent::GameWon { .. } | GameEvent::GameDraw) {
                        break;
                    }
                }
                Some(event) = thinking_events.recv() => {
                    if let Some(text) = describe_coordinator_event(config.name(), &event) {
                        println!("{}", text);
                    }
                }
                else => anyhow::bail!("Event channels closed mid-game"),
            }
        }

        print_board(&engine);
        match lock(&engine).status() {
            GameStatus::Won { winner: Player::X, .. } => x_wins += 1,
            GameStatus::Won { winner: Player::O, .. } => o_wins += 1,
            GameStatus::Draw => draws += 1,
            GameStatus::InProgress => warn!(game, "Game loop exited while in progress"),
        }
        debug!(game, x_wins, o_wins, draws, "Game finished");
    }

    println!("Results: X (Simple) {}  O ({}) {}  draws {}", x_wins, config.name(), o_wins, draws);

    {
        let mut engine = lock(&engine);
        for id in subscriptions {
            engine.unsubscribe(id);
        }
    }
    for task in tasks {
        task.await.context("Coordinator task panicked")?;
    }
    Ok(())
}
