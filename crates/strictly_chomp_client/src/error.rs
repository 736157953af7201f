//! Client error types.

use crate::config::ConfigError;
use crate::session::SessionError;

/// Failure that ends a client run.
///
/// Protocol problems (bad lines, out-of-turn messages, server errors) are
/// reported and skipped inside the loop; only these escape it.
#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ClientError {
    /// Transport, keyboard, or terminal I/O failed.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    /// An outbound message could not be serialized.
    #[display("Failed to encode message: {_0}")]
    Encode(serde_json::Error),

    /// Configuration could not be resolved.
    #[display("{_0}")]
    Config(ConfigError),

    /// The driver asked the session for something its phase forbids.
    #[display("Session error: {_0}")]
    Session(SessionError),
}
