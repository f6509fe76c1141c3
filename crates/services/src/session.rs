//! # Session Service
//!
//! The process's one view of "who is signed in": an explicit observable
//! object rather than an ambient global signal. Components that derive
//! session or style state hold a handle and subscribe; every successful
//! auth or profile action broadcasts an event telling them to re-derive.
//!
//! Claims are reflected straight out of the bearer token without signature
//! verification (the server's job). A token that fails to decode leaves the
//! session anonymous; it fails closed rather than crashing.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use domains::style::{self, Style};
use domains::{
    AccountApi, AppError, Result, SessionStore, SessionUser, Token, TokenDecoder,
};

use crate::validate;

/// Broadcast when the session changes; carries no payload beyond "re-derive
/// your view of session state".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    StyleChanged,
}

#[derive(Default)]
struct SessionState {
    token: Option<Token>,
    user: Option<SessionUser>,
}

pub struct SessionService {
    accounts: Arc<dyn AccountApi>,
    decoder: Arc<dyn TokenDecoder>,
    store: Arc<dyn SessionStore>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionService {
    pub fn new(
        accounts: Arc<dyn AccountApi>,
        decoder: Arc<dyn TokenDecoder>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts,
            decoder,
            store,
            state: RwLock::new(SessionState::default()),
            events,
        }
    }

    /// Re-derives session state from the persisted token, typically once on
    /// startup. No event fires: nothing changed, the state was recovered.
    pub async fn restore(&self) -> Result<()> {
        let token = self.store.load_token().await?;
        let user = token.as_ref().and_then(|t| self.decoder.decode(t));
        if token.is_some() && user.is_none() {
            tracing::warn!("stored token payload did not decode; session stays anonymous");
        }
        let mut state = self.state.write().await;
        state.token = token;
        state.user = user;
        Ok(())
    }

    /// Exchanges credentials for a token, persists it, and broadcasts
    /// [`SessionEvent::LoggedIn`]. Validation failures mean the request is
    /// never sent; auth failures carry the server's message when it gave one.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        validate::username(username)?;
        validate::password(password)?;

        let token = self.accounts.login(username, password).await?;
        self.store.store_token(&token).await?;

        let user = self.decoder.decode(&token);
        if user.is_none() {
            tracing::warn!("login token payload did not decode; session stays anonymous");
        }
        {
            let mut state = self.state.write().await;
            state.token = Some(token);
            state.user = user;
        }
        let _ = self.events.send(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Registers a new account. The caller logs in separately; registration
    /// does not hand out a token.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        validate::username(username)?;
        validate::password(password)?;
        self.accounts.register(username, password).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.store.clear_token().await?;
        {
            let mut state = self.state.write().await;
            state.token = None;
            state.user = None;
        }
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Persists a new style server-side, refreshes the local cache, and
    /// broadcasts [`SessionEvent::StyleChanged`].
    pub async fn save_style(&self, style: &Style) -> Result<()> {
        let token = self
            .auth_token()
            .await
            .ok_or_else(|| AppError::Unauthorized("sign in to save a style".to_string()))?;
        let dto = style::encode(style);
        self.accounts.save_style(&token, &dto).await?;
        self.store.store_style(&dto).await?;
        let _ = self.events.send(SessionEvent::StyleChanged);
        Ok(())
    }

    /// Pulls the profile resources for the current bearer: authoritative
    /// account info plus the avatar style, which is cached locally.
    pub async fn refresh_profile(&self) -> Result<Option<Style>> {
        let Some(token) = self.auth_token().await else {
            return Ok(None);
        };
        let info = self.accounts.fetch_info(&token).await?;
        let avatar = self.accounts.fetch_avatar(&token).await?;
        self.store.store_style(&avatar).await?;

        let mut state = self.state.write().await;
        state.user = Some(SessionUser {
            username: info.username,
            is_admin: info.is_admin,
        });
        Ok(Some(style::decode(&avatar)))
    }

    /// The locally cached style, if one was ever persisted.
    pub async fn cached_style(&self) -> Result<Option<Style>> {
        Ok(self.store.load_style().await?.map(|dto| style::decode(&dto)))
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.user.is_some()
    }

    pub async fn current_user(&self) -> Option<SessionUser> {
        self.state.read().await.user.clone()
    }

    /// The bearer for read requests: present whenever a token is stored,
    /// even one whose claims did not decode.
    pub async fn bearer(&self) -> Option<Token> {
        self.state.read().await.token.clone()
    }

    /// The bearer for mutations: present only while the session decoded to
    /// a user. A token with an unreadable payload never authorizes writes.
    pub async fn auth_token(&self) -> Option<Token> {
        let state = self.state.read().await;
        if state.user.is_some() {
            state.token.clone()
        } else {
            None
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}
