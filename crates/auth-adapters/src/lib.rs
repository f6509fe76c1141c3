//! # auth-adapters
//!
//! Bearer-token claims decoding for the session gate. The payload segment
//! of the token is base64url-decoded JSON; the client reflects its claims
//! for UI purposes only and never verifies the signature; that is the
//! server's responsibility. Anything malformed decodes to `None`, so a bad
//! token reads as "not authenticated" rather than a crash.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use domains::{SessionUser, Token, TokenDecoder};

/// The claim fields the UI reflects.
#[derive(Debug, Deserialize)]
struct Claims {
    username: String,
    #[serde(default, rename = "isAdmin")]
    is_admin: bool,
}

#[derive(Debug, Default)]
pub struct ClaimsTokenDecoder;

impl ClaimsTokenDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl TokenDecoder for ClaimsTokenDecoder {
    fn decode(&self, token: &Token) -> Option<SessionUser> {
        let mut segments = token.reveal().split('.');
        let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
            // header.payload.signature, nothing after
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => {
                tracing::debug!("bearer token does not have three segments");
                return None;
            }
        };

        let bytes = match URL_SAFE_NO_PAD.decode(payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(error = %err, "token payload is not base64url");
                return None;
            }
        };

        match serde_json::from_slice::<Claims>(&bytes) {
            Ok(claims) => Some(SessionUser {
                username: claims.username,
                is_admin: claims.is_admin,
            }),
            Err(err) => {
                tracing::debug!(error = %err, "token payload is not the expected JSON");
                None
            }
        }
    }
}
