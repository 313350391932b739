//! Bearer token sources for the hosted spreadsheet API
//!
//! Token issuance (service accounts, OAuth) stays outside this crate; a
//! provider only has to hand back a current access token.

use crate::error::{TasklyticsError, TasklyticsResult};
use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tracing::warn;

/// Upper bound for a token command unless the caller sets one
const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn access_token(&self) -> TasklyticsResult<String>;
}

/// Token read from an environment variable on every request
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvToken {
    async fn access_token(&self) -> TasklyticsResult<String> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(TasklyticsError::Auth(format!(
                "{} is not set; export an access token for the spreadsheet API",
                self.var
            ))),
        }
    }
}

/// Token printed on stdout by an external command
/// (e.g. `gcloud auth print-access-token`).
///
/// The command is killed once `timeout` expires and the attempt fails as a
/// transport error.
#[derive(Debug, Clone)]
pub struct CommandToken {
    command: String,
    timeout: Duration,
}

impl CommandToken {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CredentialProvider for CommandToken {
    async fn access_token(&self) -> TasklyticsResult<String> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| TasklyticsError::Auth("credentials.token_command is empty".into()))?;

        let mut command = Command::new(program);
        command.args(parts).kill_on_drop(true);
        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(result) => result.map_err(|e| {
                TasklyticsError::Auth(format!("Failed to run '{}': {}", program, e))
            })?,
            Err(_) => {
                warn!("token command '{}' timed out", self.command);
                return Err(TasklyticsError::Transport(format!(
                    "'{}' timed out after {:?}",
                    self.command, self.timeout
                )));
            }
        };

        if !output.status.success() {
            return Err(TasklyticsError::Auth(format!(
                "'{}' exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(TasklyticsError::Auth(format!(
                "'{}' printed no token",
                self.command
            )));
        }
        Ok(token)
    }
}

/// Fixed token, mostly for tests
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn access_token(&self) -> TasklyticsResult<String> {
        Ok(self.0.clone())
    }
}
