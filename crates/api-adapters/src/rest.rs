//! The reqwest-backed implementation of the `BoardApi` and `AccountApi`
//! ports. One client instance serves both; the base URL and timeout come
//! from [`ClientConfig`].

use std::time::Duration;

use async_trait::async_trait;

use configs::ClientConfig;
use domains::models::{Comment, CommentId, ParentRef, ReactionId, Token};
use domains::reactions::ReactionKind;
use domains::style::StyleDto;
use domains::{AccountApi, AccountInfo, AppError, BoardApi, BoardSnapshot, Result};

use crate::dto::{
    AccountInfoDto, BoardDto, CommentDto, CredentialsBody, EditCommentBody, ErrorBody,
    NewCommentBody, NewReactionBody, ReactionCreated, TokenResponse,
};

const USER_AGENT: &str = concat!("corkboard/", env!("CARGO_PKG_VERSION"));

pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn transport(err: reqwest::Error) -> AppError {
    AppError::Transport(err.to_string())
}

fn decode(err: reqwest::Error) -> AppError {
    AppError::Decode(err.to_string())
}

/// Turns a non-success status plus whatever the body held into the domain
/// error: 401/403 become `Unauthorized` with the server's own message when
/// it sent one.
fn classify(status: u16, canonical: Option<&str>, body: &str) -> AppError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| canonical.unwrap_or("request failed").to_string());

    match status {
        401 | 403 => AppError::Unauthorized(message),
        status => AppError::Api { status, message },
    }
}

async fn ok_or_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(classify(status.as_u16(), status.canonical_reason(), &body))
}

#[async_trait]
impl BoardApi for RestClient {
    async fn fetch_board(&self, bearer: Option<Token>) -> Result<BoardSnapshot> {
        let mut req = self.http.get(self.url("/board"));
        if let Some(token) = &bearer {
            req = req.bearer_auth(token.reveal());
        }
        let resp = req.send().await.map_err(transport)?;
        let dto: BoardDto = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(dto.into_domain())
    }

    async fn create_comment(
        &self,
        bearer: &Token,
        parent: &ParentRef,
        text: &str,
    ) -> Result<Comment> {
        let (post_id, parent_comment_id) = match parent {
            ParentRef::Post(id) => (Some(id.as_str()), None),
            ParentRef::Comment(id) => (None, Some(id.as_str())),
        };
        let body = NewCommentBody {
            text,
            post_id,
            parent_comment_id,
        };
        let resp = self
            .http
            .post(self.url("/board/comments"))
            .bearer_auth(bearer.reveal())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let dto: CommentDto = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(dto.into_domain())
    }

    async fn edit_comment(&self, bearer: &Token, id: &CommentId, text: &str) -> Result<Comment> {
        let resp = self
            .http
            .patch(self.url(&format!("/board/comments/{id}")))
            .bearer_auth(bearer.reveal())
            .json(&EditCommentBody { text })
            .send()
            .await
            .map_err(transport)?;
        let dto: CommentDto = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(dto.into_domain())
    }

    async fn delete_comment(&self, bearer: &Token, id: &CommentId) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/board/comments/{id}")))
            .bearer_auth(bearer.reveal())
            .send()
            .await
            .map_err(transport)?;
        ok_or_status(resp).await?;
        Ok(())
    }

    async fn add_reaction(
        &self,
        bearer: &Token,
        parent: &ParentRef,
        kind: ReactionKind,
    ) -> Result<ReactionId> {
        let (post_id, comment_id) = match parent {
            ParentRef::Post(id) => (Some(id.as_str()), None),
            ParentRef::Comment(id) => (None, Some(id.as_str())),
        };
        let body = NewReactionBody {
            kind,
            post_id,
            comment_id,
        };
        let resp = self
            .http
            .post(self.url("/board/reactions"))
            .bearer_auth(bearer.reveal())
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        let created: ReactionCreated = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(ReactionId::new(created.id))
    }

    async fn remove_reaction(&self, bearer: &Token, id: &ReactionId) -> Result<()> {
        let resp = self
            .http
            .delete(self.url(&format!("/board/reactions/{id}")))
            .bearer_auth(bearer.reveal())
            .send()
            .await
            .map_err(transport)?;
        ok_or_status(resp).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountApi for RestClient {
    async fn login(&self, username: &str, password: &str) -> Result<Token> {
        let resp = self
            .http
            .post(self.url("/auth/login"))
            .json(&CredentialsBody { username, password })
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(Token::new(token.token))
    }

    async fn register(&self, username: &str, password: &str) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/auth/register"))
            .json(&CredentialsBody { username, password })
            .send()
            .await
            .map_err(transport)?;
        ok_or_status(resp).await?;
        Ok(())
    }

    async fn fetch_info(&self, bearer: &Token) -> Result<AccountInfo> {
        let resp = self
            .http
            .get(self.url("/me/info"))
            .bearer_auth(bearer.reveal())
            .send()
            .await
            .map_err(transport)?;
        let dto: AccountInfoDto = ok_or_status(resp).await?.json().await.map_err(decode)?;
        Ok(dto.into_domain())
    }

    async fn fetch_avatar(&self, bearer: &Token) -> Result<StyleDto> {
        let resp = self
            .http
            .get(self.url("/me/avatar"))
            .bearer_auth(bearer.reveal())
            .send()
            .await
            .map_err(transport)?;
        ok_or_status(resp).await?.json().await.map_err(decode)
    }

    async fn save_style(&self, bearer: &Token, style: &StyleDto) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/me/style"))
            .bearer_auth(bearer.reveal())
            .json(style)
            .send()
            .await
            .map_err(transport)?;
        ok_or_status(resp).await?;
        Ok(())
    }
}
