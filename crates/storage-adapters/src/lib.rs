//! # storage-adapters
//!
//! File-backed implementation of the persistent client store: the bearer
//! token and the cached style survive restarts as one small JSON document,
//! while the "has seen intro" flag is session-scoped and lives only for the
//! process. Loads are tolerant: a missing or unreadable file is an empty
//! store, not an error.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use domains::style::StyleDto;
use domains::{AppError, Result, SessionStore, Token};

/// The on-disk shape. The token is stored raw; it is the only place the
/// secret leaves its wrapper.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    style: Option<StyleDto>,
}

pub struct FileSessionStore {
    path: PathBuf,
    intro_seen: AtomicBool,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            intro_seen: AtomicBool::new(false),
        }
    }

    async fn read(&self) -> PersistedSession {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(session) => session,
                Err(err) => {
                    tracing::warn!(error = %err, path = %self.path.display(),
                        "session file is unreadable; starting empty");
                    PersistedSession::default()
                }
            },
            Err(_) => PersistedSession::default(),
        }
    }

    async fn write(&self, session: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        let bytes = serde_json::to_vec_pretty(session)
            .map_err(|err| AppError::Storage(err.to_string()))?;
        fs::write(&self.path, bytes).await.map_err(io_error)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn io_error(err: std::io::Error) -> AppError {
    AppError::Storage(err.to_string())
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load_token(&self) -> Result<Option<Token>> {
        Ok(self.read().await.token.map(Token::new))
    }

    async fn store_token(&self, token: &Token) -> Result<()> {
        let mut session = self.read().await;
        session.token = Some(token.reveal().to_string());
        self.write(&session).await
    }

    async fn clear_token(&self) -> Result<()> {
        let mut session = self.read().await;
        session.token = None;
        self.write(&session).await
    }

    async fn load_style(&self) -> Result<Option<StyleDto>> {
        Ok(self.read().await.style)
    }

    async fn store_style(&self, style: &StyleDto) -> Result<()> {
        let mut session = self.read().await;
        session.style = Some(style.clone());
        self.write(&session).await
    }

    fn intro_seen(&self) -> bool {
        self.intro_seen.load(Ordering::Relaxed)
    }

    fn mark_intro_seen(&self) {
        self.intro_seen.store(true, Ordering::Relaxed);
    }
}
