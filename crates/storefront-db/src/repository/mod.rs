//! # Repository Module
//!
//! Database repository implementations for the catalog.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.products().list(&ListOptions::new().tag("lake"))            │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── list(&self, options)                                               │
//! │  ├── get(&self, id)                                                     │
//! │  ├── create(&self, payload)                                             │
//! │  ├── edit(&self, id, change)                                            │
//! │  └── destroy(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, pagination, tag filter

pub mod product;
