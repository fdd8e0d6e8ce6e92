//! Move coordinator: obtains the managed side's moves from a decision source.
//!
//! The coordinator is a two-state machine, `Idle` and `AwaitingDecision`.
//! It issues at most one request at a time; triggers that arrive while a
//! request is outstanding are ignored. Each request runs in its own task
//! and reports back through a channel, and the answer is checked against
//! the engine again (status, turn, session) right before it is submitted.
//! An unusable answer is replaced by a local fallback cell, so the game
//! always progresses.

mod config;
mod fallback;
mod outcome;

pub use config::CoordinatorConfig;
pub use fallback::{Fallback, FallbackPolicy};
pub use outcome::{CoordinatorEvent, DecisionFailure, InvalidDecision, Resolution, StaleReason};

use crate::request::MoveRequest;
use crate::source::{DecisionError, DecisionSource};
use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;
use strictly_board::{
    Board, EventBus, EventSink, GameEngine, GameEvent, Player, SharedEngine, SubscriptionId, rules,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// Externally visible coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No request outstanding.
    Idle,
    /// One request outstanding.
    AwaitingDecision,
}

/// Result of asking the coordinator to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A request was issued with this id.
    Issued(u64),
    /// A request is already outstanding; nothing was issued.
    AlreadyAwaiting,
    /// It is the other side's turn.
    NotManagedTurn,
    /// The game is over.
    GameOver,
    /// The event does not concern the coordinator.
    Ignored,
}

/// Answer delivered by a decision task.
#[derive(Debug)]
struct Completion {
    request_id: u64,
    result: Result<i64, DecisionError>,
}

#[derive(Debug)]
struct Pending {
    request: MoveRequest,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

#[derive(Debug)]
enum State {
    Idle,
    AwaitingDecision(Pending),
}

enum Step {
    Game(Option<GameEvent>),
    Done(Completion),
}

/// Drives one side of a game from a [`DecisionSource`].
pub struct MoveCoordinator {
    engine: SharedEngine,
    source: Arc<dyn DecisionSource>,
    side: Player,
    config: CoordinatorConfig,
    fallback: Fallback,
    state: State,
    bus: EventBus<CoordinatorEvent>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    next_request_id: u64,
}

fn lock(engine: &SharedEngine) -> MutexGuard<'_, GameEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MoveCoordinator {
    /// Creates an idle coordinator playing `side` on `engine`.
    #[instrument(skip(engine, source, config), fields(source = source.name()))]
    pub fn new(
        engine: SharedEngine,
        source: Arc<dyn DecisionSource>,
        side: Player,
        config: CoordinatorConfig,
    ) -> Self {
        info!(%side, ?config, "Creating move coordinator");
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            engine,
            source,
            side,
            fallback: Fallback::new(*config.fallback(), *config.seed()),
            config,
            state: State::Idle,
            bus: EventBus::new(),
            completions_tx,
            completions_rx,
            next_request_id: 0,
        }
    }

    /// The side this coordinator plays.
    pub fn side(&self) -> Player {
        self.side
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        match self.state {
            State::Idle => Phase::Idle,
            State::AwaitingDecision(_) => Phase::AwaitingDecision,
        }
    }

    /// The outstanding request, if any.
    pub fn pending_request(&self) -> Option<&MoveRequest> {
        match &self.state {
            State::Idle => None,
            State::AwaitingDecision(pending) => Some(&pending.request),
        }
    }

    /// Registers a sink for coordinator events.
    pub fn subscribe(&mut self, sink: Arc<dyn EventSink<CoordinatorEvent>>) -> SubscriptionId {
        self.bus.subscribe(sink)
    }

    /// Removes a coordinator event sink.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Reacts to an engine event.
    ///
    /// `MoveMade` may start a request. `GameStarted` cancels a request
    /// issued for an earlier session and starts one if the managed side
    /// opens. Terminal events cancel a request for the game that ended.
    ///
    /// Events are delivered through a channel and may arrive after the
    /// coordinator has already re-issued for the session they announce;
    /// such a request is left alone.
    pub fn handle_game_event(&mut self, event: &GameEvent) -> Trigger {
        match event {
            GameEvent::MoveMade { .. } => self.trigger(),
            GameEvent::GameStarted { session_id } => {
                if self
                    .pending_request()
                    .is_some_and(|request| request.session_id != *session_id)
                {
                    self.cancel_pending();
                }
                self.trigger()
            }
            GameEvent::GameWon { .. } | GameEvent::GameDraw => {
                let (over, current) = {
                    let engine = lock(&self.engine);
                    (engine.is_over(), engine.session_id())
                };
                if !over {
                    debug!("Terminal event for a finished session, ignoring");
                    return Trigger::Ignored;
                }
                if self
                    .pending_request()
                    .is_some_and(|request| request.session_id == current)
                {
                    self.cancel_pending();
                }
                Trigger::GameOver
            }
            GameEvent::WinningLineFound { .. } => Trigger::Ignored,
        }
    }

    /// Issues a request if the managed side is to move and none is outstanding.
    ///
    /// Must be called from within a Tokio runtime.
    #[instrument(skip(self), fields(side = %self.side))]
    pub fn trigger(&mut self) -> Trigger {
        if let State::AwaitingDecision(pending) = &self.state {
            debug!(request_id = pending.request.request_id, "Request already outstanding");
            return Trigger::AlreadyAwaiting;
        }

        let request = {
            let engine = lock(&self.engine);
            if engine.is_over() {
                return Trigger::GameOver;
            }
            if engine.current_turn() != self.side {
                return Trigger::NotManagedTurn;
            }
            self.next_request_id += 1;
            MoveRequest::new(
                self.next_request_id,
                engine.session_id(),
                &engine.board_snapshot(),
                self.side,
            )
        };
        let request_id = request.request_id;

        info!(request_id, session_id = request.session_id, "Requesting move");
        self.bus.emit(CoordinatorEvent::ThinkingStarted { request_id });

        let cancel = CancellationToken::new();
        let task = tokio::spawn(decide(
            Arc::clone(&self.source),
            request.clone(),
            *self.config.thinking_delay(),
            *self.config.request_timeout(),
            cancel.clone(),
            self.completions_tx.clone(),
        ));

        self.state = State::AwaitingDecision(Pending {
            request,
            cancel,
            task,
        });
        Trigger::Issued(request_id)
    }

    /// Withdraws the outstanding request, if any.
    ///
    /// The coordinator stays `AwaitingDecision` until the task reports
    /// back; the late answer is then discarded as stale.
    pub fn cancel_pending(&mut self) {
        if let State::AwaitingDecision(pending) = &self.state {
            info!(request_id = pending.request.request_id, "Cancelling outstanding request");
            pending.cancel.cancel();
        }
    }

    /// Waits for the outstanding request to finish and applies it.
    ///
    /// Returns `None` immediately when idle.
    pub async fn next_resolution(&mut self) -> Option<Resolution> {
        if matches!(self.state, State::Idle) {
            return None;
        }
        let completion = self.completions_rx.recv().await?;
        Some(self.complete(completion))
    }

    /// Runs until `game_events` closes, reacting to engine events and
    /// applying decisions as they arrive.
    #[instrument(skip_all, fields(side = %self.side, source = self.source.name()))]
    pub async fn run(mut self, mut game_events: mpsc::UnboundedReceiver<GameEvent>) {
        info!("Coordinator running");
        self.trigger();

        loop {
            let step = tokio::select! {
                event = game_events.recv() => Step::Game(event),
                Some(completion) = self.completions_rx.recv() => Step::Done(completion),
            };
            match step {
                Step::Game(Some(event)) => {
                    self.handle_game_event(&event);
                }
                Step::Game(None) => break,
                Step::Done(completion) => {
                    self.complete(completion);
                }
            }
        }

        self.cancel_pending();
        info!("Coordinator stopped");
    }

    /// Applies a finished request and returns to `Idle`.
    fn complete(&mut self, completion: Completion) -> Resolution {
        let pending = match std::mem::replace(&mut self.state, State::Idle) {
            State::AwaitingDecision(pending) if pending.request.request_id == completion.request_id => {
                pending
            }
            other => {
                // Only one task runs at a time, so this is a task we already gave up on.
                warn!(request_id = completion.request_id, "Completion for unknown request");
                self.state = other;
                return Resolution::Stale(StaleReason::Cancelled);
            }
        };
        if !pending.task.is_finished() {
            debug!(request_id = completion.request_id, "Decision task still shutting down");
        }

        let request_id = pending.request.request_id;
        let resolution = self.resolve(&pending.request, completion.result);

        match &resolution {
            Resolution::Accepted { index } => {
                self.bus.emit(CoordinatorEvent::DecisionAccepted {
                    request_id,
                    index: *index,
                });
            }
            Resolution::Fallback { index, reason } => {
                self.bus.emit(CoordinatorEvent::FallbackUsed {
                    request_id,
                    index: *index,
                    reason: reason.clone(),
                });
            }
            Resolution::Stale(reason) => {
                self.bus.emit(CoordinatorEvent::StaleDecisionDiscarded {
                    request_id,
                    reason: *reason,
                });
            }
            Resolution::Rejected(_) => {}
        }
        self.bus.emit(CoordinatorEvent::ThinkingFinished { request_id });

        // A new session may have started while the old request was in flight.
        if let Trigger::Issued(next) = self.trigger() {
            debug!(request_id = next, "Re-issued for current session");
        }
        resolution
    }

    /// Validates the answer against the live engine and submits a move.
    ///
    /// The staleness check, validation, and submission share one engine
    /// lock, so the board cannot change between them.
    #[instrument(skip(self, request), fields(request_id = request.request_id, side = %self.side))]
    fn resolve(&mut self, request: &MoveRequest, result: Result<i64, DecisionError>) -> Resolution {
        let mut engine = lock(&self.engine);

        let answer = match result {
            Ok(value) => Ok(value),
            Err(err) => match DecisionFailure::from_source(err) {
                Some(failure) => Err(failure),
                None => {
                    info!("Discarding cancelled request");
                    return Resolution::Stale(StaleReason::Cancelled);
                }
            },
        };

        if let Some(reason) = staleness(&engine, request, self.side) {
            info!(%reason, "Discarding stale decision");
            return Resolution::Stale(reason);
        }

        let board = engine.board_snapshot();
        let (index, reason) = match answer.and_then(|value| validate(&board, value)) {
            Ok(index) => (index, None),
            Err(reason) => {
                warn!(%reason, "Decision unusable, falling back");
                let Some(index) = self.fallback.choose(&board) else {
                    error!("No empty cell for fallback while game in progress");
                    return Resolution::Stale(StaleReason::GameOver);
                };
                info!(index, policy = ?self.fallback.policy(), "Fallback move chosen");
                (index, Some(reason))
            }
        };

        match engine.submit_move(index, self.side) {
            Ok(_) => match reason {
                None => {
                    info!(index, "Decision accepted");
                    Resolution::Accepted { index }
                }
                Some(reason) => Resolution::Fallback { index, reason },
            },
            Err(e) => {
                error!(error = %e, index, "Engine rejected coordinator move");
                Resolution::Rejected(e)
            }
        }
    }
}

impl std::fmt::Debug for MoveCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveCoordinator")
            .field("side", &self.side)
            .field("source", &self.source.name())
            .field("phase", &self.phase())
            .finish()
    }
}

impl Drop for MoveCoordinator {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

/// Returns why `request` no longer matches the engine, if it doesn't.
fn staleness(engine: &GameEngine, request: &MoveRequest, side: Player) -> Option<StaleReason> {
    let current = engine.session_id();
    if current != request.session_id {
        Some(StaleReason::SessionChanged {
            issued: request.session_id,
            current,
        })
    } else if engine.is_over() {
        Some(StaleReason::GameOver)
    } else if engine.current_turn() != side {
        Some(StaleReason::NotManagedTurn)
    } else {
        None
    }
}

/// Range check, then occupancy check.
fn validate(board: &Board, value: i64) -> Result<usize, DecisionFailure> {
    let index = usize::try_from(value)
        .ok()
        .filter(|&i| i < Board::CELLS)
        .ok_or(DecisionFailure::InvalidMove(InvalidDecision::OutOfRange(value)))?;
    if !rules::is_legal(board, index) {
        return Err(DecisionFailure::InvalidMove(InvalidDecision::Occupied(index)));
    }
    Ok(index)
}

/// One decision request: the source call raced against cancellation, with
/// the answer held back until the thinking delay has passed.
async fn decide(
    source: Arc<dyn DecisionSource>,
    request: MoveRequest,
    thinking_delay: Duration,
    request_timeout: Duration,
    cancel: CancellationToken,
    completions: mpsc::UnboundedSender<Completion>,
) {
    let request_id = request.request_id;

    let work = async {
        let call = async {
            match tokio::time::timeout(request_timeout, source.request_move(&request)).await {
                Ok(result) => result,
                Err(_) => Err(DecisionError::Timeout(request_timeout)),
            }
        };
        let (result, ()) = tokio::join!(call, tokio::time::sleep(thinking_delay));
        result
    };

    let result = tokio::select! {
        () = cancel.cancelled() => Err(DecisionError::Cancelled),
        result = work => result,
    };
    debug!(request_id, ?result, "Decision task finished");

    if completions.send(Completion { request_id, result }).is_err() {
        debug!(request_id, "Coordinator gone, dropping decision");
    }
}
