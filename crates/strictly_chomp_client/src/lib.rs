//! Strictly Chomp client library - plays Chomp against a remote opponent.
//!
//! The client joins a relay server's matchmaking queue, tracks the shared
//! board locally, validates our bites before sending them, and reports the
//! board after every change.
//!
//! # Architecture
//!
//! - **Protocol**: opcode-tagged JSON arrays, one per line
//! - **Session**: the state machine deciding what each message means
//! - **Selector**: checks typed input against the legal bites
//! - **Transport**: the single connection to the server
//! - **Client**: the driver loop that owns all of the above
//!
//! # Example
//!
//! ```no_run
//! use strictly_chomp_client::{ChompClient, TerminalInput, Transport};
//!
//! # async fn example() -> Result<(), strictly_chomp_client::ClientError> {
//! let transport = Transport::connect("127.0.0.1", 4000).await?;
//! let mut client = ChompClient::new(transport, TerminalInput::stdio()?, tokio::io::stdout());
//! let outcome = client.run().await?;
//! println!("{outcome}");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod input;
mod protocol;
mod selector;
mod session;
mod transport;

// Crate-level exports - Driver
pub use client::ChompClient;

// Crate-level exports - Configuration and errors
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;

// Crate-level exports - Input
pub use input::{LineInput, TerminalInput};

// Crate-level exports - Wire protocol
pub use protocol::{ClientMessage, Opcode, ProtocolError, RoomId, Role, ServerMessage};

// Crate-level exports - Move selection
pub use selector::{Choice, MOVE_PROMPT, MoveSelector};

// Crate-level exports - Session state machine
pub use session::{LocalPlay, LocalTurn, Outcome, Phase, Session, SessionError, Transition};

// Crate-level exports - Transport
pub use transport::{Frame, MAX_LINE_BYTES, Transport};
