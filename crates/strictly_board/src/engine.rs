//! The authoritative tic-tac-toe state machine.
//!
//! One entry point, [`GameEngine::submit_move`], accepts moves from any
//! source (keyboard, external move source, test harness). The engine
//! checks turn ownership itself, so callers never need to know who
//! supplies which side.

use crate::action::{IllegalMove, Move};
use crate::events::{EventBus, EventSink, GameEvent, SubscriptionId};
use crate::rules;
use crate::session::{GameSession, GameStatus};
use crate::{Board, Player};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

/// Engine handle shared between tasks. Every call goes through the mutex.
pub type SharedEngine = Arc<Mutex<GameEngine>>;

/// Tic-tac-toe game engine.
#[derive(Debug)]
pub struct GameEngine {
    session: GameSession,
    bus: EventBus<GameEvent>,
    next_session_id: u64,
}

impl GameEngine {
    /// Creates an engine with a fresh game in progress.
    #[instrument]
    pub fn new() -> Self {
        Self {
            session: GameSession::new(0),
            bus: EventBus::new(),
            next_session_id: 1,
        }
    }

    /// Wraps the engine for use from multiple tasks.
    pub fn into_shared(self) -> SharedEngine {
        Arc::new(Mutex::new(self))
    }

    /// Discards the current game and starts a new one with X to move.
    ///
    /// Always succeeds. Emits [`GameEvent::GameStarted`].
    #[instrument(skip(self), fields(previous = self.session.id()))]
    pub fn new_game(&mut self) -> u64 {
        let id = self.next_session_id;
        self.next_session_id += 1;
        self.session = GameSession::new(id);
        info!(session_id = id, "New game started");
        self.bus.emit(GameEvent::GameStarted { session_id: id });
        id
    }

    /// Submits a move for `as_player` at `index`.
    ///
    /// On success returns the status after the move. Events are emitted
    /// in order: `MoveMade`, then `WinningLineFound` and `GameWon`, or
    /// `GameDraw`.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] if the game is over, the index is off the
    /// board, the square is taken, or it is not `as_player`'s turn. The
    /// engine state is left untouched.
    #[instrument(skip(self), fields(session_id = self.session.id()))]
    pub fn submit_move(&mut self, index: usize, as_player: Player) -> Result<GameStatus, IllegalMove> {
        if let Err(e) = self.validate(index, as_player) {
            warn!(error = %e, "Rejected move");
            return Err(e);
        }

        self.session.place(index, as_player);
        debug!(index, player = %as_player, "Mark placed");
        self.bus.emit(GameEvent::MoveMade {
            index,
            player: as_player,
        });

        let board = *self.session.board();
        if let Some((winner, line)) = rules::check_win(&board) {
            let status = GameStatus::Won { winner, line };
            self.session.finish(status);
            info!(%winner, ?line, "Game won");
            self.bus.emit(GameEvent::WinningLineFound { line });
            self.bus.emit(GameEvent::GameWon { winner, line });
        } else if rules::check_draw(&board) {
            self.session.finish(GameStatus::Draw);
            info!("Game drawn");
            self.bus.emit(GameEvent::GameDraw);
        } else {
            self.session.pass_turn();
            debug!(turn = %self.session.turn(), "Turn passed");
        }

        Ok(*self.session.status())
    }

    fn validate(&self, index: usize, as_player: Player) -> Result<(), IllegalMove> {
        if self.session.status().is_terminal() {
            return Err(IllegalMove::GameOver);
        }
        if index >= Board::CELLS {
            return Err(IllegalMove::OutOfBounds(index));
        }
        if !rules::is_legal(self.session.board(), index) {
            return Err(IllegalMove::SquareOccupied(index));
        }
        let expected = self.session.turn();
        if as_player != expected {
            return Err(IllegalMove::WrongTurn {
                expected,
                attempted: as_player,
            });
        }
        Ok(())
    }

    /// Player whose turn it is.
    pub fn current_turn(&self) -> Player {
        self.session.turn()
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        *self.session.status()
    }

    /// True once the game is won or drawn.
    pub fn is_over(&self) -> bool {
        self.session.status().is_terminal()
    }

    /// Independent copy of the board.
    pub fn board_snapshot(&self) -> Board {
        *self.session.board()
    }

    /// Independent copy of the whole session.
    pub fn session(&self) -> GameSession {
        self.session.clone()
    }

    /// Id of the current session.
    pub fn session_id(&self) -> u64 {
        self.session.id()
    }

    /// Accepted moves of the current session, oldest first.
    pub fn history(&self) -> Vec<Move> {
        self.session.history().to_vec()
    }

    /// Registers an event sink for the lifetime of this engine.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink<GameEvent>>) -> SubscriptionId {
        self.bus.subscribe(sink)
    }

    /// Removes a previously registered sink.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}
