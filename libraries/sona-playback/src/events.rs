//! Session mailbox messages

use crate::command::{Command, CommandOutcome};
use crate::error::Result;
use crate::types::SessionSnapshot;
use sona_core::TransportEvent;
use tokio::sync::oneshot;

/// Everything a session task reacts to
///
/// The session drains these one at a time, so no two transitions for a
/// community ever interleave.
#[derive(Debug)]
pub enum SessionMessage {
    /// A user command and where to send its result
    Command {
        command: Command,
        reply: oneshot::Sender<Result<CommandOutcome>>,
    },

    /// Lifecycle notification from the connection opened as `connection`
    Transport {
        connection: u64,
        event: TransportEvent,
    },

    /// The idle timer armed as `generation` expired
    IdleTimeout { generation: u64 },

    /// Report current state
    Snapshot(oneshot::Sender<SessionSnapshot>),

    /// Persist play counts now
    Flush(oneshot::Sender<()>),

    /// Persist, leave voice and stop the task
    Shutdown(oneshot::Sender<()>),
}
