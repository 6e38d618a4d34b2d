//! # storefront-db: Database Layer for the Storefront Catalog
//!
//! This crate persists catalog products in SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog Data Flow                                │
//! │                                                                         │
//! │  Caller (handler, seed binary)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 storefront-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │   Repository   │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │  (product.rs)  │   │  (embedded)  │   │   │
//! │  │   │               │    │                │   │              │   │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo    │   │ 001_products │   │   │
//! │  │   │ DbConfig      │    │ + IdGenerator  │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (STOREFRONT_DB_PATH)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - ProductRepository
//! - [`id`] - Product id generators
//! - [`config`] - Environment configuration
//! - [`import`] - Seed dataset import
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_db::{Database, DbConfig};
//! use storefront_core::ListOptions;
//!
//! let db = Database::new(DbConfig::new("path/to/storefront.db")).await?;
//!
//! let page = db.products().list(&ListOptions::new().tag("nature")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod id;
pub mod import;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CatalogConfig, ConfigError};
pub use error::{DbError, DbResult};
pub use id::{IdGenerator, SequentialGenerator, UuidGenerator};
pub use import::{import_products, ImportError, ImportSummary};
pub use pool::{Database, DbConfig};

pub use repository::product::ProductRepository;
