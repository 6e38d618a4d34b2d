//! # Validation Module
//!
//! The rule list every product payload goes through before it is written.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Required keys present, value types correct                        │
//! │  └── Nested groups complete                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required text non-empty                                           │
//! │  └── likes >= 0                                                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK (likes >= 0)                                     │
//! │  └── PRIMARY KEY uniqueness                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::validate_likes;
//!
//! assert!(validate_likes(0).is_ok());
//! assert!(validate_likes(-3).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{NewProduct, ProductChange, ProductLinks, ProductUrls, ProductUser, Tag};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Rules
// =============================================================================

/// Validates that a required text field is not blank.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }

    Ok(())
}

/// Validates the like counter.
pub fn validate_likes(likes: i64) -> ValidationResult<()> {
    if likes < 0 {
        return Err(ValidationError::NegativeLikes);
    }

    Ok(())
}

/// Validates a client-supplied primary key.
pub fn validate_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must not be blank".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Group Rules
// =============================================================================

/// All three image sizes are required.
pub fn validate_urls(urls: &ProductUrls) -> ValidationResult<()> {
    validate_required("urls.regular", &urls.regular)?;
    validate_required("urls.small", &urls.small)?;
    validate_required("urls.thumb", &urls.thumb)
}

/// Both links are required.
pub fn validate_links(links: &ProductLinks) -> ValidationResult<()> {
    validate_required("links.self", &links.self_link)?;
    validate_required("links.html", &links.html)
}

/// `id`, `first_name` and `username` are required; the rest is optional.
pub fn validate_user(user: &ProductUser) -> ValidationResult<()> {
    validate_required("user.id", &user.id)?;
    validate_required("user.first_name", &user.first_name)?;
    validate_required("user.username", &user.username)
}

/// Every tag needs a title. An empty tag list is fine.
pub fn validate_tags(tags: &[Tag]) -> ValidationResult<()> {
    for (idx, tag) in tags.iter().enumerate() {
        validate_required(&format!("tags[{idx}].title"), &tag.title)?;
    }

    Ok(())
}

// =============================================================================
// Payload Rules
// =============================================================================

/// Validates a create payload.
///
/// ## Rules
/// - `id`, when supplied, must not be blank
/// - `likes` must be >= 0
/// - required fields of `urls`, `links`, `user` and tag titles must be non-empty
pub fn validate_new_product(payload: &NewProduct) -> ValidationResult<()> {
    if let Some(id) = &payload.id {
        validate_id(id)?;
    }

    validate_likes(payload.likes)?;
    validate_urls(&payload.urls)?;
    validate_links(&payload.links)?;
    validate_user(&payload.user)?;
    validate_tags(&payload.tags)
}

/// Validates an edit change. Only the fields the change carries are checked.
///
/// The likes rule runs first so a negative counter is always reported as
/// [`ValidationError::NegativeLikes`].
pub fn validate_change(change: &ProductChange) -> ValidationResult<()> {
    if let Some(likes) = change.likes {
        validate_likes(likes)?;
    }
    if let Some(urls) = &change.urls {
        validate_urls(urls)?;
    }
    if let Some(links) = &change.links {
        validate_links(links)?;
    }
    if let Some(user) = &change.user {
        validate_user(user)?;
    }
    if let Some(tags) = &change.tags {
        validate_tags(tags)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
