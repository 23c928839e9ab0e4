//! Community to session mapping

use crate::command::{Command, CommandOutcome};
use crate::error::{PlaybackError, Result};
use crate::events::SessionMessage;
use crate::session::{Collaborators, PlaybackSession};
use crate::types::{PlaybackConfig, SessionSnapshot};
use sona_core::{CommunityId, Origin};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Cheap, cloneable address of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    community: CommunityId,
    mailbox: mpsc::UnboundedSender<SessionMessage>,
}

impl SessionHandle {
    pub fn community(&self) -> &CommunityId {
        &self.community
    }

    /// Run a command and wait for its outcome
    pub async fn execute(&self, command: Command) -> Result<CommandOutcome> {
        let (reply, outcome) = oneshot::channel();
        self.send(SessionMessage::Command { command, reply })?;
        outcome.await.map_err(|_| self.closed())?
    }

    pub async fn play(&self, origin: Origin, text: impl Into<String>) -> Result<CommandOutcome> {
        self.execute(Command::Play {
            origin,
            text: text.into(),
        })
        .await
    }

    pub async fn skip(&self, origin: Origin) -> Result<CommandOutcome> {
        self.execute(Command::Skip { origin }).await
    }

    pub async fn list_queue(&self, origin: Origin) -> Result<CommandOutcome> {
        self.execute(Command::ListQueue { origin }).await
    }

    pub async fn sample_and_enqueue(&self, origin: Origin, count: Option<usize>) -> Result<CommandOutcome> {
        self.execute(Command::SampleAndEnqueue { origin, count })
            .await
    }

    pub async fn rank_report(&self, origin: Origin) -> Result<CommandOutcome> {
        self.execute(Command::RankReport { origin }).await
    }

    pub async fn toggle_auto_recommend(&self, origin: Origin) -> Result<CommandOutcome> {
        self.execute(Command::ToggleAutoRecommend { origin }).await
    }

    pub async fn shuffle_queue(&self, origin: Origin) -> Result<CommandOutcome> {
        self.execute(Command::ShuffleQueue { origin }).await
    }

    /// Current session state
    ///
    /// Answered in mailbox order, so everything sent before it has been
    /// processed.
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, snapshot) = oneshot::channel();
        self.send(SessionMessage::Snapshot(reply))?;
        snapshot.await.map_err(|_| self.closed())
    }

    /// Persist play counts now
    pub async fn flush(&self) -> Result<()> {
        let (done, flushed) = oneshot::channel();
        self.send(SessionMessage::Flush(done))?;
        flushed.await.map_err(|_| self.closed())
    }

    /// Persist play counts, leave voice and stop the session task
    pub async fn shutdown(&self) -> Result<()> {
        let (done, stopped) = oneshot::channel();
        self.send(SessionMessage::Shutdown(done))?;
        stopped.await.map_err(|_| self.closed())
    }

    fn send(&self, message: SessionMessage) -> Result<()> {
        self.mailbox.send(message).map_err(|_| self.closed())
    }

    fn closed(&self) -> PlaybackError {
        PlaybackError::SessionClosed(self.community.to_string())
    }
}

/// Start a session task
pub fn spawn_session(
    community: CommunityId,
    config: PlaybackConfig,
    deps: Collaborators,
) -> (SessionHandle, JoinHandle<()>) {
    let (mailbox, inbox) = mpsc::unbounded_channel();
    let session = PlaybackSession::new(community.clone(), config, deps, mailbox.clone());
    let task = tokio::spawn(session.run(inbox));
    (SessionHandle { community, mailbox }, task)
}

struct SessionEntry {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

/// Owns one session per community, created on first use
pub struct SessionRegistry {
    config: PlaybackConfig,
    deps: Collaborators,
    sessions: Mutex<HashMap<CommunityId, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new(config: PlaybackConfig, deps: Collaborators) -> Self {
        Self {
            config,
            deps,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The community's session, starting it if needed
    ///
    /// Must be called from within a tokio runtime.
    pub fn session(&self, community: &CommunityId) -> SessionHandle {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = sessions.get(community) {
            if !entry.task.is_finished() {
                return entry.handle.clone();
            }
            warn!(community = %community, "Session task ended unexpectedly, restarting");
        }

        info!(community = %community, "Starting playback session");
        let (handle, task) = spawn_session(community.clone(), self.config.clone(), self.deps.clone());
        sessions.insert(
            community.clone(),
            SessionEntry {
                handle: handle.clone(),
                task,
            },
        );
        handle
    }

    /// The community's session if one is running
    pub fn get(&self, community: &CommunityId) -> Option<SessionHandle> {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(community)
            .map(|entry| entry.handle.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop every session, persisting play counts first
    pub async fn shutdown(&self) {
        let entries: Vec<SessionEntry> = self
            .sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
            .map(|(_, entry)| entry)
            .collect();

        info!(sessions = entries.len(), "Shutting down playback sessions");
        for entry in entries {
            if let Err(e) = entry.handle.shutdown().await {
                warn!(community = %entry.handle.community, error = %e, "Session already stopped");
            }
            if let Err(e) = entry.task.await {
                error!(community = %entry.handle.community, error = %e, "Session task panicked");
            }
        }
    }
}
