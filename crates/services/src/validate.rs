//! Client-side pre-submit validation. A failure here means the request is
//! never sent; the message is surfaced as an ephemeral toast.

use domains::{AppError, Result};

/// Longest reply the composer accepts, in characters.
pub const MAX_REPLY_CHARS: usize = 200;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MAX_USERNAME_CHARS: usize = 32;
pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 128;

pub fn username(raw: &str) -> Result<()> {
    let len = raw.chars().count();
    if len < MIN_USERNAME_CHARS || len > MAX_USERNAME_CHARS {
        return Err(AppError::Validation(format!(
            "username must be {MIN_USERNAME_CHARS}-{MAX_USERNAME_CHARS} characters"
        )));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(AppError::Validation(
            "username cannot contain spaces".to_string(),
        ));
    }
    Ok(())
}

pub fn password(raw: &str) -> Result<()> {
    let len = raw.chars().count();
    if len < MIN_PASSWORD_CHARS || len > MAX_PASSWORD_CHARS {
        return Err(AppError::Validation(format!(
            "password must be {MIN_PASSWORD_CHARS}-{MAX_PASSWORD_CHARS} characters"
        )));
    }
    if raw.trim() != raw {
        return Err(AppError::Validation(
            "password cannot start or end with spaces".to_string(),
        ));
    }
    Ok(())
}

/// Reply/edit text: non-empty after trimming, capped at
/// [`MAX_REPLY_CHARS`], and free of control characters other than newline.
pub fn reply_text(raw: &str) -> Result<()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("say something first".to_string()));
    }
    if trimmed.chars().count() > MAX_REPLY_CHARS {
        return Err(AppError::Validation(format!(
            "keep it under {MAX_REPLY_CHARS} characters"
        )));
    }
    if trimmed.chars().any(|c| c.is_control() && c != '\n') {
        return Err(AppError::Validation(
            "that text contains characters the board does not allow".to_string(),
        ));
    }
    Ok(())
}
