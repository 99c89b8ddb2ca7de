//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tokio::sync::Notify;

use super::config::{AuthMethod, SshConfig};
use super::{CommandResult, Connector, Transport};
use crate::error::TransportError;

/// Canned reply for one command.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    /// Exit 0 with this stdout.
    Ok(String),
    /// Exit with this status and stderr.
    Fail(u32, String),
    /// Exit 0 with this stdout once the gate is notified.
    Gated(Arc<Notify>, String),
    /// Never completes.
    Hang,
    /// Transport-level failure.
    Broken,
}

/// Shared view into what a [`ScriptedTransport`] was asked to do.
#[derive(Debug, Default, Clone)]
pub(crate) struct Journal {
    commands: Arc<Mutex<Vec<String>>>,
    closes: Arc<AtomicUsize>,
}

impl Journal {
    pub(crate) fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

/// Transport that answers from a command -> reply table.
///
/// Unknown commands fail with status 127, like a shell would.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScriptedTransport {
    replies: HashMap<String, Reply>,
    journal: Journal,
    fail_close: bool,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, command: &str, stdout: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Ok(stdout.to_string()));
        self
    }

    pub(crate) fn fail(mut self, command: &str, status: u32, stderr: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Fail(status, stderr.to_string()));
        self
    }

    pub(crate) fn gated(mut self, command: &str, gate: Arc<Notify>, stdout: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Gated(gate, stdout.to_string()));
        self
    }

    pub(crate) fn hang(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Hang);
        self
    }

    pub(crate) fn broken(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Broken);
        self
    }

    pub(crate) fn fail_on_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub(crate) fn journal(&self) -> Journal {
        self.journal.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exec(&mut self, command: &str) -> Result<CommandResult, TransportError> {
        self.journal
            .commands
            .lock()
            .unwrap()
            .push(command.to_string());

        match self.replies.get(command).cloned() {
            Some(Reply::Ok(stdout)) => Ok(CommandResult::from_bytes(stdout.as_bytes(), b"", 0)),
            Some(Reply::Fail(status, stderr)) => {
                Ok(CommandResult::from_bytes(b"", stderr.as_bytes(), status))
            }
            Some(Reply::Gated(gate, stdout)) => {
                gate.notified().await;
                Ok(CommandResult::from_bytes(stdout.as_bytes(), b"", 0))
            }
            Some(Reply::Hang) => std::future::pending().await,
            Some(Reply::Broken) => Err(TransportError::Disconnected),
            None => Ok(CommandResult::from_bytes(
                b"",
                format!("sh: {command}: not found").as_bytes(),
                127,
            )),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.journal.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(TransportError::Disconnected);
        }
        Ok(())
    }
}

/// Connector that hands out clones of one scripted transport and only
/// accepts a single password.
pub(crate) struct ScriptedConnector {
    transport: ScriptedTransport,
    password: String,
    connects: AtomicUsize,
    hang: bool,
}

impl ScriptedConnector {
    pub(crate) fn new(transport: ScriptedTransport, password: &str) -> Self {
        Self {
            transport,
            password: password.to_string(),
            connects: AtomicUsize::new(0),
            hang: false,
        }
    }

    /// Never finish the handshake.
    pub(crate) fn hang_on_connect(mut self) -> Self {
        self.hang = true;
        self
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, config: &SshConfig) -> Result<Box<dyn Transport>, TransportError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        let accepted = match &config.auth {
            AuthMethod::Password(password) => password.expose_secret() == self.password,
        };
        if !accepted {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            });
        }
        self.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.transport.clone()))
    }
}
