//! # storefront-core: Catalog Types for the Storefront
//!
//! This crate holds the product record, the payloads used to create and
//! edit it, and the validation rules every persisted product satisfies.
//! It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Storefront Catalog Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Callers (HTTP handlers, seed binary)             │   │
//! │  │        list ──► get ──► create ──► edit ──► destroy             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐  ┌───────────────┐  ┌──────────────────┐     │   │
//! │  │   │   types     │  │  validation   │  │      error       │     │   │
//! │  │   │  Product    │  │  required     │  │ ValidationError  │     │   │
//! │  │   │  NewProduct │  │  likes >= 0   │  │                  │     │   │
//! │  │   │  Change     │  │               │  │                  │     │   │
//! │  │   └─────────────┘  └───────────────┘  └──────────────────┘     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 storefront-db (Database Layer)                  │   │
//! │  │           SQLite queries, migrations, ProductRepository         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, NewProduct, ProductChange, ListOptions
//! - [`error`] - Validation error type
//! - [`validation`] - Required-field and likes rules
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::{ProductChange, validation::validate_change};
//!
//! let change = ProductChange {
//!     likes: Some(-1),
//!     ..ProductChange::default()
//! };
//!
//! let err = validate_change(&change).unwrap_err();
//! assert_eq!(err.to_string(), "Likes cannot be negative");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of records skipped when a listing does not specify an offset.
pub const DEFAULT_LIST_OFFSET: u32 = 0;

/// Page size used when a listing does not specify a limit.
pub const DEFAULT_LIST_LIMIT: u32 = 25;

/// Message returned by a successful delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "Product deleted successfully";
