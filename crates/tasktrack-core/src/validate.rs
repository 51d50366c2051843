//! Input validation for user-supplied fields.

use crate::CoreError;

/// Maximum task title length, in characters.
pub const MAX_TITLE_LEN: usize = 255;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate an email address of the form `local@domain.tld`.
pub fn email(email: &str) -> Result<(), CoreError> {
    if email.is_empty() {
        return Err(CoreError::InvalidInput("email is required".to_string()));
    }
    if !is_email_shaped(email) {
        return Err(CoreError::InvalidInput("invalid email format".to_string()));
    }
    Ok(())
}

/// Validate a password.
pub fn password(password: &str) -> Result<(), CoreError> {
    if password.is_empty() {
        return Err(CoreError::InvalidInput("password is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Validate a task title.
pub fn title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::InvalidInput("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::InvalidInput(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c))
    {
        return false;
    }

    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && tld.len() >= 2
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}
