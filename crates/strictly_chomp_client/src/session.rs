//! Game session state machine.
//!
//! The session owns the only board in the process and decides, for every
//! inbound message, what it means for the game. It does no I/O: the
//! driver in [`crate::client`] reads and writes, then asks the session
//! what to do next via [`Session::phase`].

use crate::protocol::{ClientMessage, RoomId, Role, ServerMessage};
use derive_getters::Getters;
use serde_json::Value;
use strictly_chomp::{Board, MoveError, Position, apply_chomp};
use tracing::{debug, info, instrument, warn};

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Outcome {
    /// Opponent ate the poison.
    Won,
    /// We ate the poison.
    Lost,
    /// Our turn came with nothing left to eat.
    NoMovesLeft,
    /// Server told us the opponent left.
    PeerLeft,
    /// Connection closed under us.
    Disconnected,
    /// We left the game ourselves.
    Abandoned,
}

impl Outcome {
    /// Status line shown to the player.
    pub fn message(self) -> &'static str {
        match self {
            Outcome::Won => "You WIN! other player ate poison.",
            Outcome::Lost => "You LOSE! Ate poison.",
            Outcome::NoMovesLeft => "No moves left. You lose.",
            Outcome::PeerLeft => "Peer disconnected.",
            Outcome::Disconnected => "Disconnected from server.",
            Outcome::Abandoned => "Left the game.",
        }
    }
}

/// Where the session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum Phase {
    /// Queued, no opponent yet.
    #[display("awaiting match")]
    AwaitingMatch,
    /// Opponent's turn.
    #[display("waiting for peer")]
    WaitingForPeer,
    /// Our turn.
    #[display("awaiting local move")]
    AwaitingLocalMove,
    /// Game over. Absorbing.
    #[display("terminated ({_0})")]
    Terminated(Outcome),
}

impl Phase {
    /// Returns the outcome once terminated.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Phase::Terminated(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// What an inbound message did to the session.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Match confirmed.
    Matched {
        /// Assigned room.
        room_id: RoomId,
        /// Our role.
        role: Role,
    },
    /// Opponent bit the board.
    PeerMoved {
        /// Where they bit.
        position: Position,
        /// Set when the bite ended the game.
        outcome: Option<Outcome>,
    },
    /// Opponent left; the session is terminated.
    PeerLeft,
    /// Server reported an error; nothing changed.
    ServerError(Vec<Value>),
}

/// Result of opening our turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalTurn {
    /// Pick one of these cells.
    Choose(Vec<Position>),
    /// Nothing left; the session is terminated with [`Outcome::NoMovesLeft`].
    Stuck,
}

/// An accepted local bite.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct LocalPlay {
    /// Message to send to the opponent.
    pub message: ClientMessage,
    /// Set when the bite ended the game.
    pub outcome: Option<Outcome>,
}

/// A message or action that does not fit the current phase.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SessionError {
    /// Protocol violation: the event is not valid in this phase.
    #[display("{} is not valid while {}", event, phase)]
    OutOfTurn {
        /// What happened.
        event: &'static str,
        /// Phase at the time.
        phase: Phase,
    },

    /// The local bite was rejected.
    #[display("Illegal move: {}", _0)]
    IllegalMove(MoveError),
}

/// One client's view of one match.
#[derive(Debug, Clone, Getters)]
pub struct Session {
    /// The shared board as this client sees it.
    board: Board,
    /// Room assigned at match time.
    room_id: Option<RoomId>,
    /// Our role, known after the match.
    role: Option<Role>,
    /// Current phase.
    phase: Phase,
}

impl Session {
    /// Creates a queued session with a full board.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            room_id: None,
            role: None,
            phase: Phase::AwaitingMatch,
        }
    }

    fn out_of_turn(&self, event: &'static str) -> SessionError {
        warn!(event, phase = %self.phase, "Protocol violation");
        SessionError::OutOfTurn {
            event,
            phase: self.phase,
        }
    }

    fn terminate(&mut self, outcome: Outcome) {
        info!(%outcome, "Session terminated");
        self.phase = Phase::Terminated(outcome);
    }

    /// Applies one decoded server message.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn handle(&mut self, message: ServerMessage) -> Result<Transition, SessionError> {
        if matches!(self.phase, Phase::Terminated(_)) {
            return Err(self.out_of_turn("message after game end"));
        }

        match message {
            ServerMessage::Matched { room_id, role } => {
                if self.phase != Phase::AwaitingMatch {
                    return Err(self.out_of_turn("second match confirmation"));
                }
                info!(room_id = %room_id, %role, "Matched");
                self.room_id = Some(room_id.clone());
                self.role = Some(role);
                self.phase = match role {
                    Role::First => Phase::AwaitingLocalMove,
                    Role::Second => Phase::WaitingForPeer,
                };
                Ok(Transition::Matched { room_id, role })
            }
            ServerMessage::PeerLeft => {
                self.terminate(Outcome::PeerLeft);
                Ok(Transition::PeerLeft)
            }
            ServerMessage::Error(payload) => {
                warn!(?payload, "Server reported an error");
                Ok(Transition::ServerError(payload))
            }
            ServerMessage::Move(position) => {
                if self.phase != Phase::WaitingForPeer {
                    return Err(self.out_of_turn("peer move"));
                }
                let eaten = apply_chomp(&mut self.board, position);
                if eaten == 0 {
                    warn!(%position, "Peer bit a cell that was already eaten");
                }
                debug!(%position, eaten, remaining = self.board.remaining(), "Peer move applied");

                let outcome = if position.is_poison() {
                    self.terminate(Outcome::Won);
                    Some(Outcome::Won)
                } else {
                    self.phase = Phase::AwaitingLocalMove;
                    None
                };
                Ok(Transition::PeerMoved { position, outcome })
            }
        }
    }

    /// Starts our turn, listing the cells we may bite.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn open_local_turn(&mut self) -> Result<LocalTurn, SessionError> {
        if self.phase != Phase::AwaitingLocalMove {
            return Err(self.out_of_turn("local turn"));
        }
        let moves = self.board.legal_moves();
        if moves.is_empty() {
            self.terminate(Outcome::NoMovesLeft);
            return Ok(LocalTurn::Stuck);
        }
        debug!(choices = moves.len(), "Local turn opened");
        Ok(LocalTurn::Choose(moves))
    }

    /// Applies our bite and hands the turn to the opponent.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn play_local(&mut self, position: Position) -> Result<LocalPlay, SessionError> {
        if self.phase != Phase::AwaitingLocalMove {
            return Err(self.out_of_turn("local move"));
        }
        self.board
            .chomp(position)
            .map_err(SessionError::IllegalMove)?;

        let outcome = if position.is_poison() {
            self.terminate(Outcome::Lost);
            Some(Outcome::Lost)
        } else {
            self.phase = Phase::WaitingForPeer;
            None
        };
        Ok(LocalPlay::new(ClientMessage::Move(position), outcome))
    }

    /// We are leaving; returns the message announcing it.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn leave(&mut self) -> Result<ClientMessage, SessionError> {
        if matches!(self.phase, Phase::Terminated(_)) {
            return Err(self.out_of_turn("leave"));
        }
        self.terminate(Outcome::Abandoned);
        Ok(ClientMessage::Leave)
    }

    /// The transport hit end of stream.
    #[instrument(skip(self), fields(phase = %self.phase))]
    pub fn transport_closed(&mut self) -> Outcome {
        match self.phase {
            Phase::Terminated(outcome) => outcome,
            _ => {
                self.terminate(Outcome::Disconnected);
                Outcome::Disconnected
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col).unwrap()
    }

    fn matched(role: Role) -> ServerMessage {
        ServerMessage::Matched {
            room_id: RoomId::new("r1"),
            role,
        }
    }

    fn session_in(role: Role) -> Session {
        let mut session = Session::new();
        session.handle(matched(role)).unwrap();
        session
    }

    #[test]
    fn test_new_session_awaits_match() {
        let session = Session::new();
        assert_eq!(*session.phase(), Phase::AwaitingMatch);
        assert_eq!(session.board(), &Board::new());
        assert!(session.room_id().is_none());
        assert!(session.role().is_none());
    }

    #[test]
    fn test_first_role_moves_immediately() {
        let session = session_in(Role::First);
        assert_eq!(*session.phase(), Phase::AwaitingLocalMove);
        assert_eq!(session.room_id().as_ref().map(RoomId::as_str), Some("r1"));
        assert_eq!(*session.role(), Some(Role::First));
    }

    #[test]
    fn test_second_role_waits() {
        let session = session_in(Role::Second);
        assert_eq!(*session.phase(), Phase::WaitingForPeer);
    }

    #[test]
    fn test_peer_move_hands_turn_to_us() {
        let mut session = session_in(Role::Second);
        let t = session.handle(ServerMessage::Move(pos(1, 2))).unwrap();
        assert_eq!(
            t,
            Transition::PeerMoved {
                position: pos(1, 2),
                outcome: None
            }
        );
        assert_eq!(*session.phase(), Phase::AwaitingLocalMove);
        assert_eq!(session.board().remaining(), 13);
    }

    #[test]
    fn test_peer_poison_wins() {
        let mut session = session_in(Role::Second);
        let t = session.handle(ServerMessage::Move(Position::POISON)).unwrap();
        assert_eq!(
            t,
            Transition::PeerMoved {
                position: Position::POISON,
                outcome: Some(Outcome::Won)
            }
        );
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::Won));
    }

    #[test]
    fn test_local_play_alternates() {
        let mut session = session_in(Role::First);
        assert!(matches!(session.open_local_turn(), Ok(LocalTurn::Choose(m)) if m.len() == 28));
        let play = session.play_local(pos(2, 2)).unwrap();
        assert_eq!(play.message, ClientMessage::Move(pos(2, 2)));
        assert_eq!(play.outcome, None);
        assert_eq!(*session.phase(), Phase::WaitingForPeer);

        // Cannot move twice in a row.
        assert!(matches!(
            session.play_local(pos(0, 1)),
            Err(SessionError::OutOfTurn { .. })
        ));
        assert!(session.open_local_turn().is_err());
    }

    #[test]
    fn test_local_poison_loses() {
        let mut session = session_in(Role::First);
        let play = session.play_local(Position::POISON).unwrap();
        assert_eq!(play.outcome, Some(Outcome::Lost));
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::Lost));
    }

    #[test]
    fn test_local_play_rejects_eaten_cell() {
        let mut session = session_in(Role::Second);
        session.handle(ServerMessage::Move(pos(1, 1))).unwrap();
        let result = session.play_local(pos(2, 2));
        assert_eq!(
            result,
            Err(SessionError::IllegalMove(MoveError::AlreadyEaten(pos(2, 2))))
        );
        assert_eq!(*session.phase(), Phase::AwaitingLocalMove);
    }

    #[test]
    fn test_peer_move_out_of_turn_is_ignored() {
        let mut session = session_in(Role::First);
        let before = session.board().clone();
        let result = session.handle(ServerMessage::Move(pos(1, 1)));
        assert!(matches!(result, Err(SessionError::OutOfTurn { .. })));
        assert_eq!(session.board(), &before);
        assert_eq!(*session.phase(), Phase::AwaitingLocalMove);
    }

    #[test]
    fn test_peer_move_before_match_is_ignored() {
        let mut session = Session::new();
        assert!(session.handle(ServerMessage::Move(pos(1, 1))).is_err());
        assert_eq!(*session.phase(), Phase::AwaitingMatch);
    }

    #[test]
    fn test_second_match_is_ignored() {
        let mut session = session_in(Role::Second);
        assert!(session.handle(matched(Role::First)).is_err());
        assert_eq!(*session.phase(), Phase::WaitingForPeer);
        assert_eq!(*session.role(), Some(Role::Second));
    }

    #[test]
    fn test_peer_left_terminates_from_any_phase() {
        for mut session in [Session::new(), session_in(Role::First), session_in(Role::Second)] {
            assert_eq!(
                session.handle(ServerMessage::PeerLeft),
                Ok(Transition::PeerLeft)
            );
            assert_eq!(*session.phase(), Phase::Terminated(Outcome::PeerLeft));
        }
    }

    #[test]
    fn test_server_error_changes_nothing() {
        let mut session = session_in(Role::First);
        let t = session
            .handle(ServerMessage::Error(vec![Value::from("oops")]))
            .unwrap();
        assert_eq!(t, Transition::ServerError(vec![Value::from("oops")]));
        assert_eq!(*session.phase(), Phase::AwaitingLocalMove);
    }

    #[test]
    fn test_terminated_is_absorbing() {
        let mut session = session_in(Role::First);
        session.play_local(Position::POISON).unwrap();
        assert!(session.handle(ServerMessage::PeerLeft).is_err());
        assert!(session.leave().is_err());
        assert_eq!(session.transport_closed(), Outcome::Lost);
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::Lost));
    }

    #[test]
    fn test_stuck_turn_terminates() {
        let mut session = session_in(Role::Second);
        // An inconsistent peer could leave us with an empty board and the turn.
        session.board = Board::from_cells([[false; strictly_chomp::COLS]; strictly_chomp::ROWS]);
        session.phase = Phase::AwaitingLocalMove;
        assert_eq!(session.open_local_turn(), Ok(LocalTurn::Stuck));
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::NoMovesLeft));
    }

    #[test]
    fn test_leave_and_disconnect() {
        let mut session = session_in(Role::Second);
        assert_eq!(session.leave(), Ok(ClientMessage::Leave));
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::Abandoned));

        let mut session = Session::new();
        assert_eq!(session.transport_closed(), Outcome::Disconnected);
        assert_eq!(*session.phase(), Phase::Terminated(Outcome::Disconnected));
    }
}
