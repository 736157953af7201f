//! Wire protocol for the matchmaking relay.
//!
//! Every message is one line of JSON holding an array. Control messages
//! lead with an [`Opcode`]; a move is a bare `[row, col]` pair. Anything
//! two elements long that does not start with a known opcode is a move.

use serde::{Serialize, Serializer};
use serde_json::Value;
use strictly_chomp::Position;
use tracing::{instrument, trace};

/// Control message tags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::FromRepr,
)]
#[repr(u16)]
pub enum Opcode {
    /// Client asks to join the matchmaking queue.
    Queue = 100,
    /// Client leaves the queue or the current game.
    Leave = 101,
    /// Server paired us with an opponent: `[110, room, role]`.
    Matched = 110,
    /// Server reports the opponent went away.
    PeerLeft = 111,
    /// Server-side error with arbitrary payload.
    Error = 120,
}

impl Opcode {
    /// Numeric tag as sent on the wire.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Looks up a tag, `None` for anything that is not a control opcode.
    pub fn from_code(code: u64) -> Option<Self> {
        u16::try_from(code).ok().and_then(Self::from_repr)
    }
}

/// Opaque room token assigned by the server at match time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub struct RoomId(String);

impl RoomId {
    /// Wraps a room token.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The token as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Which side opens the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Role {
    /// Role 0: we take the first bite.
    #[display("first")]
    First,
    /// Any other role value: we wait for the opponent.
    #[display("second")]
    Second,
}

impl Role {
    /// Interprets the role field of a match confirmation.
    pub fn from_wire(role: i64) -> Self {
        if role == 0 { Role::First } else { Role::Second }
    }

    /// Normalized role number, 0 for first and 1 for second.
    pub fn code(self) -> u8 {
        match self {
            Role::First => 0,
            Role::Second => 1,
        }
    }
}

/// Messages the client sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMessage {
    /// `[100]`
    Queue,
    /// `[101]`
    Leave,
    /// `[row, col]`
    Move(Position),
}

impl Serialize for ClientMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ClientMessage::Queue => [Opcode::Queue.code()].serialize(serializer),
            ClientMessage::Leave => [Opcode::Leave.code()].serialize(serializer),
            ClientMessage::Move(position) => position.serialize(serializer),
        }
    }
}

impl ClientMessage {
    /// Serializes to a newline-terminated wire line.
    #[instrument]
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

/// Messages the server sends.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    /// Opponent found.
    Matched {
        /// Room the match lives in.
        room_id: RoomId,
        /// Our role in the match.
        role: Role,
    },
    /// Opponent disconnected.
    PeerLeft,
    /// Server error; payload is everything after the opcode.
    Error(Vec<Value>),
    /// Opponent's bite.
    Move(Position),
}

/// Why an inbound line could not be turned into a [`ServerMessage`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ProtocolError {
    /// Not JSON, not an array, or the wrong shape.
    #[display("Malformed message {:?}: {}", line, reason)]
    Malformed {
        /// Offending line.
        line: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A client-to-server opcode arrived from the server.
    #[display("Unexpected opcode {} in {:?}", opcode, line)]
    UnexpectedOpcode {
        /// The opcode received.
        opcode: Opcode,
        /// Offending line.
        line: String,
    },

    /// A move whose coordinates lie outside the board.
    #[display("Move {:?} is off the board", line)]
    OffBoard {
        /// Offending line.
        line: String,
    },
}

impl ProtocolError {
    fn malformed(line: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}

impl ServerMessage {
    /// Decodes one inbound line (trailing newline optional).
    #[instrument]
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(line.trim())
            .map_err(|e| ProtocolError::malformed(line, e.to_string()))?;

        let Value::Array(items) = value else {
            return Err(ProtocolError::malformed(line, "not an array"));
        };

        let Some(head) = items.first() else {
            return Err(ProtocolError::malformed(line, "empty array"));
        };

        let message = match head.as_u64().and_then(Opcode::from_code) {
            Some(opcode) => Self::control(opcode, &items[1..], line)?,
            None => Self::bite(&items, line)?,
        };
        trace!(?message, "Decoded server message");
        Ok(message)
    }

    fn control(opcode: Opcode, payload: &[Value], line: &str) -> Result<Self, ProtocolError> {
        match opcode {
            Opcode::Matched => {
                let [room, role, ..] = payload else {
                    return Err(ProtocolError::malformed(line, "match needs room and role"));
                };
                let role = role
                    .as_i64()
                    .ok_or_else(|| ProtocolError::malformed(line, "role is not an integer"))?;
                let room_id = match room {
                    Value::String(s) => RoomId::new(s.clone()),
                    other => RoomId::new(other.to_string()),
                };
                Ok(Self::Matched {
                    room_id,
                    role: Role::from_wire(role),
                })
            }
            Opcode::PeerLeft => Ok(Self::PeerLeft),
            Opcode::Error => Ok(Self::Error(payload.to_vec())),
            Opcode::Queue | Opcode::Leave => Err(ProtocolError::UnexpectedOpcode {
                opcode,
                line: line.to_string(),
            }),
        }
    }

    fn bite(items: &[Value], line: &str) -> Result<Self, ProtocolError> {
        let [row, col] = items else {
            return Err(ProtocolError::malformed(line, "expected [row, col]"));
        };
        let (Some(row), Some(col)) = (row.as_i64(), col.as_i64()) else {
            return Err(ProtocolError::malformed(line, "coordinates must be integers"));
        };
        Position::from_signed(row, col)
            .map(Self::Move)
            .map_err(|_| ProtocolError::OffBoard {
                line: line.to_string(),
            })
    }
}
