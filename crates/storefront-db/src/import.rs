//! # Seed Dataset Import
//!
//! Loads a JSON array of product documents (for example the exported
//! `data/full-products.json`) into the catalog through [`ProductRepository`].
//!
//! ```text
//! file ──► serde_json::Value array ──► NewProduct::from_value ──► repo.create
//!                                            │                      │
//!                                            └── invalid ──┐        └── duplicate id ──┐
//!                                                          ▼                           ▼
//!                                                    warn! + skipped             warn! + skipped
//! ```

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::DbError;
use crate::repository::product::ProductRepository;
use storefront_core::NewProduct;

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Errors that abort an import.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Seed file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Seed file must contain a JSON array of products")]
    NotAnArray,

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Imports every product document in `path`.
///
/// Records that fail validation or reuse an existing id are skipped; store
/// failures other than those abort the run.
pub async fn import_products(
    repo: &ProductRepository,
    path: &Path,
) -> Result<ImportSummary, ImportError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ImportError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let documents = match serde_json::from_str::<serde_json::Value>(&raw)? {
        serde_json::Value::Array(documents) => documents,
        _ => return Err(ImportError::NotAnArray),
    };

    info!(path = %path.display(), records = documents.len(), "Importing seed dataset");

    let mut summary = ImportSummary::default();

    for (idx, document) in documents.into_iter().enumerate() {
        let payload = match NewProduct::from_value(document) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(index = idx, error = %err, "Skipping malformed product");
                summary.skipped += 1;
                continue;
            }
        };

        match repo.create(&payload).await {
            Ok(_) => summary.imported += 1,
            Err(err @ (DbError::Validation(_) | DbError::UniqueViolation { .. })) => {
                warn!(index = idx, id = ?payload.id, error = %err, "Skipping product");
                summary.skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Seed import finished"
    );
    Ok(summary)
}
