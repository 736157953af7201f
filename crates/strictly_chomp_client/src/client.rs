//! Driver loop tying the session to the network and the keyboard.
//!
//! One message is handled at a time. When the session says it is our
//! turn, the driver asks for a move while still watching the connection,
//! so a departing opponent or a dropped link ends the game at once.

use crate::error::ClientError;
use crate::input::LineInput;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::selector::{Choice, MOVE_PROMPT, MoveSelector};
use crate::session::{LocalTurn, Outcome, Phase, Session, Transition};
use crate::transport::{Frame, MAX_LINE_BYTES, Transport};
use serde_json::Value;
use strictly_chomp::Position;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

/// Something that happened while waiting for our move.
enum TurnEvent {
    Inbound(Option<Frame>),
    Typed(Option<String>),
}

/// A Chomp client bound to one connection.
pub struct ChompClient<R, W, I, O> {
    session: Session,
    transport: Transport<R, W>,
    input: I,
    out: O,
}

impl<R, W, I, O> ChompClient<R, W, I, O>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
    I: LineInput,
    O: AsyncWrite + Unpin + Send,
{
    /// Creates a client with a fresh session.
    pub fn new(transport: Transport<R, W>, input: I, out: O) -> Self {
        Self {
            session: Session::new(),
            transport,
            input,
            out,
        }
    }

    /// The session state.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The output sink.
    pub fn output(&self) -> &O {
        &self.out
    }

    /// Queues for a match and plays until the game ends.
    ///
    /// The connection is closed on every exit path, including errors.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<Outcome, ClientError> {
        let result = self.play().await;
        if let Err(e) = self.transport.close().await {
            warn!(error = %e, "Failed to close connection");
        }
        match &result {
            Ok(outcome) => info!(%outcome, "Game over"),
            Err(e) => warn!(error = %e, "Client stopped"),
        }
        result
    }

    async fn play(&mut self) -> Result<Outcome, ClientError> {
        self.transport.send(&ClientMessage::Queue).await?;
        self.say("Queued").await?;

        loop {
            match *self.session.phase() {
                Phase::Terminated(outcome) => {
                    self.say(outcome.message()).await?;
                    return Ok(outcome);
                }
                Phase::AwaitingLocalMove => self.local_turn().await?,
                Phase::AwaitingMatch | Phase::WaitingForPeer => {
                    let line = self.transport.next_line().await?;
                    self.inbound(line).await?;
                }
            }
        }
    }

    /// Handles one inbound line, or end of stream.
    async fn inbound(&mut self, frame: Option<Frame>) -> Result<(), ClientError> {
        let line = match frame {
            Some(Frame::Line(line)) => line,
            Some(Frame::TooLong { length }) => {
                return self
                    .say(&format!(
                        "Bad message: line of {length} bytes exceeds the {MAX_LINE_BYTES}-byte limit"
                    ))
                    .await;
            }
            None => {
                self.session.transport_closed();
                return Ok(());
            }
        };

        let message = match ServerMessage::decode(&line) {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable message");
                return self.say(&format!("Bad message: {line}")).await;
            }
        };

        match self.session.handle(message) {
            Ok(transition) => self.report(transition).await,
            Err(e) => {
                warn!(error = %e, "Ignoring message");
                self.say(&format!("Ignored out-of-turn message: {line}")).await
            }
        }
    }

    async fn report(&mut self, transition: Transition) -> Result<(), ClientError> {
        match transition {
            Transition::Matched { room_id, role } => {
                self.say(&format!("Matched in room {room_id}, role {}", role.code()))
                    .await?;
                self.render().await
            }
            Transition::PeerMoved { position, .. } => {
                self.say(&format!("Peer ate to {position}")).await?;
                self.render().await
            }
            Transition::PeerLeft => Ok(()),
            Transition::ServerError(payload) => {
                self.say(&format!("Server error: {}", Value::Array(payload)))
                    .await
            }
        }
    }

    /// Our turn: ask until a legal bite or a leave, watching the network.
    ///
    /// The prompt stays on screen while server messages are handled; it is
    /// shown again only after a rejected entry.
    #[instrument(skip(self))]
    async fn local_turn(&mut self) -> Result<(), ClientError> {
        let legal = match self.session.open_local_turn()? {
            LocalTurn::Choose(moves) => moves,
            LocalTurn::Stuck => return Ok(()),
        };

        self.input.show_prompt(MOVE_PROMPT).await?;
        loop {
            let event = tokio::select! {
                biased;
                frame = self.transport.next_line() => TurnEvent::Inbound(frame?),
                line = self.input.next_line() => TurnEvent::Typed(line?),
            };

            match event {
                TurnEvent::Inbound(frame) => {
                    self.inbound(frame).await?;
                    if *self.session.phase() != Phase::AwaitingLocalMove {
                        return Ok(());
                    }
                }
                TurnEvent::Typed(None) => {
                    debug!("Input closed");
                    return self.leave().await;
                }
                TurnEvent::Typed(Some(text)) => match MoveSelector::select(&legal, &text) {
                    Ok(Choice::Play(position)) => return self.bite(position).await,
                    Ok(Choice::Leave) => return self.leave().await,
                    Err(e) => {
                        debug!(error = %e, input = %text, "Rejected input");
                        self.say(MoveSelector::rejection(&e)).await?;
                        self.input.show_prompt(MOVE_PROMPT).await?;
                    }
                },
            }
        }
    }

    async fn bite(&mut self, position: Position) -> Result<(), ClientError> {
        let play = self.session.play_local(position)?;
        self.say(&format!("You moved at {position}")).await?;
        self.render().await?;
        self.transport.send(&play.message).await
    }

    async fn leave(&mut self) -> Result<(), ClientError> {
        let message = self.session.leave()?;
        self.transport.send(&message).await
    }

    async fn say(&mut self, line: &str) -> Result<(), ClientError> {
        self.out.write_all(line.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    async fn render(&mut self) -> Result<(), ClientError> {
        let board = self.session.board().render();
        self.say(&board).await
    }
}
