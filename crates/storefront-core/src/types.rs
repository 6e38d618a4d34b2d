//! # Domain Types
//!
//! The catalog product and the payloads that create, edit and list it.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   NewProduct    │   │  ProductChange  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (required)  │   │  id (optional)  │   │  every field    │       │
//! │  │  likes >= 0     │   │  create payload │   │  optional       │       │
//! │  │  urls/links     │   │                 │   │  shallow merge  │       │
//! │  │  user, tags     │   │                 │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductUrls    │   │  ProductLinks   │   │  ProductUser    │       │
//! │  │  regular/small/ │   │  self/html      │   │  id, names,     │       │
//! │  │  thumb          │   │                 │   │  username       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nested groups (`urls`, `links`, `user`) are always complete objects. A
//! change that carries one of them replaces the whole group.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;
use crate::{DEFAULT_LIST_LIMIT, DEFAULT_LIST_OFFSET, DELETE_SUCCESS_MESSAGE};

// =============================================================================
// Nested Groups
// =============================================================================

/// Image URLs for a product at the three rendered sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUrls {
    pub regular: String,
    pub small: String,
    pub thumb: String,
}

/// Canonical links for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLinks {
    /// API link to the product itself (`self` in payloads).
    #[serde(rename = "self")]
    pub self_link: String,

    /// Human-facing page.
    pub html: String,
}

/// The author credited for a product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUser {
    pub id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub portfolio_url: Option<String>,
    pub username: String,
}

/// A single tag attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
}

impl Tag {
    /// Creates a tag with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Tag {
            title: title.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Primary key. Assigned at creation, never changed.
    pub id: String,

    pub description: Option<String>,

    pub alt_description: Option<String>,

    /// Like counter, never negative.
    pub likes: i64,

    pub urls: ProductUrls,

    pub links: ProductLinks,

    pub user: ProductUser,

    /// Ordered tags; may be empty.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Product {
    /// Checks whether one of the product's tags has exactly this title.
    pub fn has_tag(&self, title: &str) -> bool {
        self.tags.iter().any(|tag| tag.title == title)
    }
}

// =============================================================================
// New Product
// =============================================================================

/// Payload for creating a product.
///
/// `id` is optional: when omitted, the repository's id generator assigns
/// one. Document-store exports name the key `_id`, which is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub description: Option<String>,

    pub alt_description: Option<String>,

    pub likes: i64,

    pub urls: ProductUrls,

    pub links: ProductLinks,

    pub user: ProductUser,

    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl NewProduct {
    /// Reads a loosely typed document as a create payload.
    ///
    /// Missing required keys and wrong value types become
    /// [`ValidationError::InvalidFormat`]; unknown keys are ignored.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value).map_err(|e| ValidationError::InvalidFormat {
            field: "product".to_string(),
            reason: e.to_string(),
        })
    }

    /// Builds the stored product, calling `generate_id` only if the payload
    /// carries no id.
    pub fn into_product(self, generate_id: impl FnOnce() -> String) -> Product {
        Product {
            id: self.id.unwrap_or_else(generate_id),
            description: self.description,
            alt_description: self.alt_description,
            likes: self.likes,
            urls: self.urls,
            links: self.links,
            user: self.user,
            tags: self.tags,
        }
    }
}

impl From<Product> for NewProduct {
    fn from(product: Product) -> Self {
        NewProduct {
            id: Some(product.id),
            description: product.description,
            alt_description: product.alt_description,
            likes: product.likes,
            urls: product.urls,
            links: product.links,
            user: product.user,
            tags: product.tags,
        }
    }
}

// =============================================================================
// Product Change
// =============================================================================

/// A partial update, merged shallowly onto a stored product.
///
/// ## Merge Rules
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  field in change          effect on stored product                      │
/// │  ───────────────────────  ──────────────────────────────────────────    │
/// │  absent (None)            untouched                                     │
/// │  "description": null      cleared (Some(None))                          │
/// │  "likes": 5               overwritten                                   │
/// │  "user": {...}            whole group replaced, omitted optional        │
/// │                           sub-fields become None                        │
/// │  "urls": {"regular": ..}  rejected when deserializing (incomplete)      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// There is no `id` field: the primary key cannot be edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductChange {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<Option<String>>,

    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_description: Option<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<ProductUrls>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ProductLinks>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ProductUser>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
}

impl ProductChange {
    /// Returns true when the change carries no fields.
    pub fn is_empty(&self) -> bool {
        *self == ProductChange::default()
    }

    /// Overwrites every top-level field present in this change.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(alt_description) = &self.alt_description {
            product.alt_description = alt_description.clone();
        }
        if let Some(likes) = self.likes {
            product.likes = likes;
        }
        if let Some(urls) = &self.urls {
            product.urls = urls.clone();
        }
        if let Some(links) = &self.links {
            product.links = links.clone();
        }
        if let Some(user) = &self.user {
            product.user = user.clone();
        }
        if let Some(tags) = &self.tags {
            product.tags = tags.clone();
        }
    }
}

/// Marks a key as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// =============================================================================
// Listing
// =============================================================================

/// Pagination and filter options for listing products.
///
/// ## Example
/// ```rust
/// use storefront_core::ListOptions;
///
/// let options = ListOptions::new().offset(50).limit(25).tag("nature");
/// assert_eq!(options.tag.as_deref(), Some("nature"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Records to skip. Default: 0
    #[serde(default)]
    pub offset: u32,

    /// Maximum records returned. Default: 25
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Only products carrying a tag with exactly this title.
    #[serde(default)]
    pub tag: Option<String>,
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListOptions {
    fn default() -> Self {
        ListOptions {
            offset: DEFAULT_LIST_OFFSET,
            limit: DEFAULT_LIST_LIMIT,
            tag: None,
        }
    }
}

impl ListOptions {
    /// Options for the first page, unfiltered.
    pub fn new() -> Self {
        ListOptions::default()
    }

    /// Sets the number of records to skip.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Restricts the listing to one tag title.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

// =============================================================================
// Delete Confirmation
// =============================================================================

/// Result of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    pub message: String,
}

impl DeleteConfirmation {
    /// The standard confirmation.
    pub fn deleted() -> Self {
        DeleteConfirmation {
            message: DELETE_SUCCESS_MESSAGE.to_string(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
