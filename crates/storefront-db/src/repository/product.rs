//! # Product Repository
//!
//! Database operations for catalog products.
//!
//! ## Key Operations
//! - `list` with offset/limit pagination and exact tag filter
//! - `get`, `create`, `edit` (shallow merge), `destroy`
//!
//! ## Storage Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Product, Two Tables                              │
//! │                                                                         │
//! │  products                                                               │
//! │  ┌──────────┬───────┬─────────────┬───────────┬─────────────────────┐   │
//! │  │ id       │ likes │ url_regular │ link_self │ user_username  ...  │   │
//! │  ├──────────┼───────┼─────────────┼───────────┼─────────────────────┤   │
//! │  │ p-000001 │ 12    │ https://... │ https://. │ adamoss        ...  │   │
//! │  └──────────┴───────┴─────────────┴───────────┴─────────────────────┘   │
//! │        │ ON DELETE CASCADE                                              │
//! │        ▼                                                                │
//! │  product_tags                                                           │
//! │  ┌────────────┬──────────┬──────────┐                                   │
//! │  │ product_id │ position │ title    │                                   │
//! │  ├────────────┼──────────┼──────────┤                                   │
//! │  │ p-000001   │ 0        │ lake     │                                   │
//! │  │ p-000001   │ 1        │ mountain │                                   │
//! │  └────────────┴──────────┴──────────┘                                   │
//! │                                                                         │
//! │  Writes touching both tables run in one transaction.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Policy
//! `list`, `get` and `create` return store errors unchanged. `edit` and
//! `destroy` return NotFound/Validation unchanged and log-and-wrap anything
//! else as `EditFailed` / `DeleteFailed`.

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error};

use crate::error::{DbError, DbResult};
use crate::id::{IdGenerator, UuidGenerator};
use storefront_core::validation::{validate_change, validate_new_product};
use storefront_core::{
    DeleteConfirmation, ListOptions, NewProduct, Product, ProductChange, ProductLinks,
    ProductUrls, ProductUser, Tag,
};

const ENTITY: &str = "product";

macro_rules! select_products {
    () => {
        r#"
        SELECT
            id,
            description,
            alt_description,
            likes,
            url_regular,
            url_small,
            url_thumb,
            link_self,
            link_html,
            user_id,
            user_first_name,
            user_last_name,
            user_portfolio_url,
            user_username
        FROM products
        "#
    };
}

const SELECT_BY_ID: &str = concat!(select_products!(), "WHERE id = ?1");

// ?1 is the optional tag title; NULL disables the filter.
macro_rules! page_filter {
    () => {
        r#"
        WHERE ?1 IS NULL OR EXISTS (
            SELECT 1 FROM product_tags f
            WHERE f.product_id = products.id AND f.title = ?1
        )
        ORDER BY id ASC
        LIMIT ?2 OFFSET ?3
        "#
    };
}

const SELECT_PAGE: &str = concat!(select_products!(), page_filter!());

// Tags for exactly the ids SELECT_PAGE returns, without one bind per id.
const SELECT_PAGE_TAGS: &str = concat!(
    r#"
    SELECT t.product_id, t.title
    FROM product_tags t
    WHERE t.product_id IN (
        SELECT id FROM products
    "#,
    page_filter!(),
    r#"
    )
    ORDER BY t.product_id, t.position
    "#
);

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let created = repo.create(&payload).await?;
/// let page = repo.list(&ListOptions::new().limit(10)).await?;
/// repo.destroy(&created.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
    ids: Arc<dyn IdGenerator>,
}

impl ProductRepository {
    /// Creates a new ProductRepository that assigns UUID v7 ids.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository::with_id_generator(pool, Arc::new(UuidGenerator))
    }

    /// Creates a ProductRepository with a custom id generator.
    pub fn with_id_generator(pool: SqlitePool, ids: Arc<dyn IdGenerator>) -> Self {
        ProductRepository { pool, ids }
    }

    /// Lists products ordered by ascending id.
    ///
    /// ## Arguments
    /// * `options` - offset, limit and optional exact tag title
    ///
    /// ## Returns
    /// At most `options.limit` products. An offset past the end (or a zero
    /// limit) gives an empty page, not an error.
    pub async fn list(&self, options: &ListOptions) -> DbResult<Vec<Product>> {
        debug!(
            offset = options.offset,
            limit = options.limit,
            tag = ?options.tag,
            "Listing products"
        );

        // Both reads share one snapshot so rows and tags describe the same page.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let rows = sqlx::query_as::<_, ProductRow>(SELECT_PAGE)
            .bind(options.tag.as_deref())
            .bind(i64::from(options.limit))
            .bind(i64::from(options.offset))
            .fetch_all(&mut *tx)
            .await?;

        let mut tags = page_tags(&mut tx, options).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let products: Vec<Product> = rows
            .into_iter()
            .map(|row| {
                let product_tags = tags.remove(&row.id).unwrap_or_default();
                row.into_product(product_tags)
            })
            .collect();

        debug!(count = products.len(), "List returned products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found (not an error)
    pub async fn get(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(SELECT_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let tags: Vec<String> = sqlx::query_scalar(
            "SELECT title FROM product_tags WHERE product_id = ?1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(row.into_product(tags.into_iter().map(Tag::new).collect())))
    }

    /// Creates a product.
    ///
    /// ## Arguments
    /// * `payload` - Product fields; the id generator fills in a missing id
    ///
    /// ## Returns
    /// * `Ok(Product)` - Stored product including its final id
    /// * `Err(DbError::Validation)` - Required field blank or likes < 0
    /// * `Err(DbError::UniqueViolation)` - Supplied id already exists
    pub async fn create(&self, payload: &NewProduct) -> DbResult<Product> {
        validate_new_product(payload)?;

        let product = payload.clone().into_product(|| self.ids.generate());

        debug!(id = %product.id, tags = product.tags.len(), "Creating product");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        insert_row(&mut tx, &product).await.map_err(|err| match err {
            DbError::UniqueViolation { .. } => DbError::duplicate("id", &product.id),
            other => other,
        })?;
        write_tags(&mut tx, &product.id, &product.tags).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(product)
    }

    /// Applies a partial change to a stored product.
    ///
    /// ## Protocol
    /// 1. Fetch by id, `NotFound` if absent
    /// 2. Validate the change (`Likes cannot be negative`, required text)
    /// 3. Shallow-merge present top-level fields
    /// 4. Persist row and tags in one transaction
    ///
    /// Any other failure is logged and returned as `EditFailed`.
    pub async fn edit(&self, id: &str, change: &ProductChange) -> DbResult<Product> {
        debug!(id = %id, "Editing product");

        let mut product = match self.get(id).await {
            Ok(Some(product)) => product,
            Ok(None) => return Err(DbError::not_found(ENTITY, id)),
            Err(err) => return Err(edit_failed(id, err)),
        };

        validate_change(change)?;

        if change.is_empty() {
            return Ok(product);
        }

        change.apply_to(&mut product);

        if let Err(err) = self.persist(&product).await {
            return Err(edit_failed(id, err));
        }

        Ok(product)
    }

    /// Deletes a product and its tags.
    ///
    /// ## Returns
    /// * `Ok(DeleteConfirmation)` - "Product deleted successfully"
    /// * `Err(DbError::NotFound)` - No product with this id
    /// * `Err(DbError::DeleteFailed)` - Anything else (cause logged)
    pub async fn destroy(&self, id: &str) -> DbResult<DeleteConfirmation> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(DbError::not_found(ENTITY, id)),
            Ok(_) => Ok(DeleteConfirmation::deleted()),
            Err(err) => {
                let err = DbError::from(err);
                error!(id = %id, error = %err, "Error deleting product");
                Err(DbError::delete_failed(id, err))
            }
        }
    }

    /// Counts stored products (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Writes every field of an existing product.
    async fn persist(&self, product: &Product) -> DbResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        update_row(&mut tx, product).await?;
        write_tags(&mut tx, &product.id, &product.tags).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(())
    }
}

/// Logs the cause of a failed edit and hides it behind `EditFailed`.
fn edit_failed(id: &str, err: DbError) -> DbError {
    error!(id = %id, error = %err, "Error editing product");
    DbError::edit_failed(id, err)
}

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    description: Option<String>,
    alt_description: Option<String>,
    likes: i64,
    url_regular: String,
    url_small: String,
    url_thumb: String,
    link_self: String,
    link_html: String,
    user_id: String,
    user_first_name: String,
    user_last_name: Option<String>,
    user_portfolio_url: Option<String>,
    user_username: String,
}

impl ProductRow {
    fn into_product(self, tags: Vec<Tag>) -> Product {
        Product {
            id: self.id,
            description: self.description,
            alt_description: self.alt_description,
            likes: self.likes,
            urls: ProductUrls {
                regular: self.url_regular,
                small: self.url_small,
                thumb: self.url_thumb,
            },
            links: ProductLinks {
                self_link: self.link_self,
                html: self.link_html,
            },
            user: ProductUser {
                id: self.user_id,
                first_name: self.user_first_name,
                last_name: self.user_last_name,
                portfolio_url: self.user_portfolio_url,
                username: self.user_username,
            },
            tags,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TagRow {
    product_id: String,
    title: String,
}

// =============================================================================
// Statements
// =============================================================================

async fn insert_row(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO products (
            id, description, alt_description, likes,
            url_regular, url_small, url_thumb,
            link_self, link_html,
            user_id, user_first_name, user_last_name, user_portfolio_url, user_username
        ) VALUES (
            ?1, ?2, ?3, ?4,
            ?5, ?6, ?7,
            ?8, ?9,
            ?10, ?11, ?12, ?13, ?14
        )
        "#,
    )
    .bind(&product.id)
    .bind(&product.description)
    .bind(&product.alt_description)
    .bind(product.likes)
    .bind(&product.urls.regular)
    .bind(&product.urls.small)
    .bind(&product.urls.thumb)
    .bind(&product.links.self_link)
    .bind(&product.links.html)
    .bind(&product.user.id)
    .bind(&product.user.first_name)
    .bind(&product.user.last_name)
    .bind(&product.user.portfolio_url)
    .bind(&product.user.username)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn update_row(conn: &mut SqliteConnection, product: &Product) -> DbResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE products SET
            description = ?2,
            alt_description = ?3,
            likes = ?4,
            url_regular = ?5,
            url_small = ?6,
            url_thumb = ?7,
            link_self = ?8,
            link_html = ?9,
            user_id = ?10,
            user_first_name = ?11,
            user_last_name = ?12,
            user_portfolio_url = ?13,
            user_username = ?14
        WHERE id = ?1
        "#,
    )
    .bind(&product.id)
    .bind(&product.description)
    .bind(&product.alt_description)
    .bind(product.likes)
    .bind(&product.urls.regular)
    .bind(&product.urls.small)
    .bind(&product.urls.thumb)
    .bind(&product.links.self_link)
    .bind(&product.links.html)
    .bind(&product.user.id)
    .bind(&product.user.first_name)
    .bind(&product.user.last_name)
    .bind(&product.user.portfolio_url)
    .bind(&product.user.username)
    .execute(&mut *conn)
    .await?;

    // Deleted between the read and this write.
    if result.rows_affected() == 0 {
        return Err(DbError::not_found(ENTITY, &product.id));
    }

    Ok(())
}

/// Loads the ordered tags of every product on a list page, keyed by id.
async fn page_tags(
    conn: &mut SqliteConnection,
    options: &ListOptions,
) -> DbResult<HashMap<String, Vec<Tag>>> {
    let rows = sqlx::query_as::<_, TagRow>(SELECT_PAGE_TAGS)
        .bind(options.tag.as_deref())
        .bind(i64::from(options.limit))
        .bind(i64::from(options.offset))
        .fetch_all(&mut *conn)
        .await?;

    let mut tags: HashMap<String, Vec<Tag>> = HashMap::new();
    for row in rows {
        tags.entry(row.product_id)
            .or_default()
            .push(Tag::new(row.title));
    }

    Ok(tags)
}

/// Replaces the tag rows of a product, keeping sequence order.
async fn write_tags(conn: &mut SqliteConnection, product_id: &str, tags: &[Tag]) -> DbResult<()> {
    sqlx::query("DELETE FROM product_tags WHERE product_id = ?1")
        .bind(product_id)
        .execute(&mut *conn)
        .await?;

    for (position, tag) in tags.iter().enumerate() {
        sqlx::query("INSERT INTO product_tags (product_id, position, title) VALUES (?1, ?2, ?3)")
            .bind(product_id)
            .bind(position as i64)
            .bind(&tag.title)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SequentialGenerator;
    use crate::{Database, DbConfig};
    use std::error::Error as _;
    use storefront_core::ValidationError;

    async fn setup() -> (Database, ProductRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products_with_ids(Arc::new(SequentialGenerator::new("p")));
        (db, repo)
    }

    fn payload(tags: &[&str]) -> NewProduct {
        NewProduct {
            id: None,
            description: Some("Mountain lake at dawn".to_string()),
            alt_description: None,
            likes: 3,
            urls: ProductUrls {
                regular: "https://img.example.com/r".to_string(),
                small: "https://img.example.com/s".to_string(),
                thumb: "https://img.example.com/t".to_string(),
            },
            links: ProductLinks {
                self_link: "https://api.example.com/p".to_string(),
                html: "https://example.com/p".to_string(),
            },
            user: ProductUser {
                id: "u-1".to_string(),
                first_name: "Ada".to_string(),
                last_name: Some("Moss".to_string()),
                portfolio_url: None,
                username: "adamoss".to_string(),
            },
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
        }
    }

    fn with_id(id: &str, tags: &[&str]) -> NewProduct {
        NewProduct {
            id: Some(id.to_string()),
            ..payload(tags)
        }
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    // -------------------------------------------------------------------------
    // create / get
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_then_get_returns_input_plus_id() {
        let (_db, repo) = setup().await;
        let input = payload(&["lake", "mountain"]);

        let created = repo.create(&input).await.unwrap();
        assert_eq!(created.id, "p-000001");

        let fetched = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, input.into_product(|| "p-000001".to_string()));
    }

    #[tokio::test]
    async fn test_create_keeps_client_id() {
        let (_db, repo) = setup().await;

        let created = repo.create(&with_id("custom-id", &[])).await.unwrap();
        assert_eq!(created.id, "custom-id");
        assert!(repo.get("custom-id").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let (_db, repo) = setup().await;
        repo.create(&with_id("dup", &["a"])).await.unwrap();

        let err = repo.create(&with_id("dup", &["b"])).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "id");
                assert_eq!(value, "dup");
            }
            other => panic!("expected UniqueViolation, got {other:?}"),
        }

        // First record and its tags untouched
        let stored = repo.get("dup").await.unwrap().unwrap();
        assert_eq!(stored.tags, vec![Tag::new("a")]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_payload() {
        let (_db, repo) = setup().await;

        let mut negative = payload(&[]);
        negative.likes = -1;
        let err = repo.create(&negative).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::NegativeLikes)));

        let mut blank = payload(&[]);
        blank.user.username = "  ".to_string();
        let err = repo.create(&blank).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::Required { ref field }) if field == "user.username"
        ));

        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        let (_db, repo) = setup().await;
        assert_eq!(repo.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_tag_order_is_preserved() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["zeta", "alpha", "mid"])).await.unwrap();

        let fetched = repo.get(&created.id).await.unwrap().unwrap();
        let titles: Vec<&str> = fetched.tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["zeta", "alpha", "mid"]);

        let listed = repo.list(&ListOptions::new()).await.unwrap();
        assert_eq!(listed[0].tags, fetched.tags);
    }

    // -------------------------------------------------------------------------
    // list
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_list_orders_by_id_and_limits() {
        let (_db, repo) = setup().await;
        for id in ["c", "a", "d", "b"] {
            repo.create(&with_id(id, &[])).await.unwrap();
        }

        let page = repo.list(&ListOptions::new().limit(2)).await.unwrap();
        assert_eq!(ids(&page), vec!["a", "b"]);

        let all = repo.list(&ListOptions::new()).await.unwrap();
        assert_eq!(ids(&all), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_list_default_limit() {
        let (_db, repo) = setup().await;
        for _ in 0..30 {
            repo.create(&payload(&[])).await.unwrap();
        }

        let page = repo.list(&ListOptions::default()).await.unwrap();
        assert_eq!(page.len(), 25);
        assert_eq!(page[0].id, "p-000001");
        assert_eq!(page[24].id, "p-000025");
    }

    #[tokio::test]
    async fn test_list_out_of_range_offset_is_empty() {
        let (_db, repo) = setup().await;
        repo.create(&payload(&[])).await.unwrap();

        let page = repo.list(&ListOptions::new().offset(10)).await.unwrap();
        assert!(page.is_empty());

        let page = repo.list(&ListOptions::new().limit(0)).await.unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn test_list_filters_by_exact_tag() {
        let (_db, repo) = setup().await;
        repo.create(&with_id("a", &["nature", "lake"])).await.unwrap();
        repo.create(&with_id("b", &["city"])).await.unwrap();
        repo.create(&with_id("c", &["Nature"])).await.unwrap();
        repo.create(&with_id("d", &[])).await.unwrap();
        repo.create(&with_id("e", &["nature"])).await.unwrap();

        let page = repo.list(&ListOptions::new().tag("nature")).await.unwrap();
        assert_eq!(ids(&page), vec!["a", "e"]);
        assert!(page.iter().all(|p| p.has_tag("nature")));
        // Filter selects products, not tags: all tags come back.
        assert_eq!(page[0].tags.len(), 2);

        let page = repo.list(&ListOptions::new().tag("natu")).await.unwrap();
        assert!(page.is_empty());

        let page = repo
            .list(&ListOptions::new().tag("nature").offset(1).limit(1))
            .await
            .unwrap();
        assert_eq!(ids(&page), vec!["e"]);
    }

    #[tokio::test]
    async fn test_pagination_is_stable() {
        let (_db, repo) = setup().await;
        for _ in 0..5 {
            repo.create(&payload(&["x"])).await.unwrap();
        }

        let first = repo.list(&ListOptions::new().offset(0).limit(2)).await.unwrap();
        let second = repo.list(&ListOptions::new().offset(2).limit(2)).await.unwrap();
        let both = repo.list(&ListOptions::new().offset(0).limit(4)).await.unwrap();

        let joined: Vec<Product> = first.into_iter().chain(second).collect();
        assert_eq!(joined, both);
    }

    #[tokio::test]
    async fn test_list_page_larger_than_sqlite_variable_limit() {
        let (db, repo) = setup().await;
        let total: i64 = 33_000;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, likes, url_regular, url_small, url_thumb, link_self, link_html,
                user_id, user_first_name, user_username
            )
            WITH RECURSIVE seq(n) AS (
                SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < ?1
            )
            SELECT printf('bulk-%05d', n), n, 'r', 's', 't', 'self', 'html', 'u', 'Ada', 'ada'
            FROM seq
            "#,
        )
        .bind(total)
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query(
            r#"
            INSERT INTO product_tags (product_id, position, title)
            SELECT id, 0, 'bulk' FROM products
            UNION ALL
            SELECT id, 1, 'even' FROM products WHERE likes % 2 = 0
            "#,
        )
        .execute(db.pool())
        .await
        .unwrap();

        let page = repo.list(&ListOptions::new().limit(40_000)).await.unwrap();
        assert_eq!(page.len(), total as usize);
        assert_eq!(page[0].id, "bulk-00001");
        assert_eq!(page[0].tags, vec![Tag::new("bulk")]);
        assert_eq!(page[1].tags, vec![Tag::new("bulk"), Tag::new("even")]);
        assert!(page.iter().all(|p| p.has_tag("bulk")));

        let even = repo
            .list(&ListOptions::new().tag("even").offset(100).limit(40_000))
            .await
            .unwrap();
        assert_eq!(even.len(), (total / 2 - 100) as usize);
        assert!(even.iter().all(|p| p.tags.len() == 2));
    }

    // -------------------------------------------------------------------------
    // edit
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_edit_likes_only() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["lake"])).await.unwrap();

        let change = ProductChange {
            likes: Some(5),
            ..ProductChange::default()
        };
        let updated = repo.edit(&created.id, &change).await.unwrap();
        assert_eq!(updated.likes, 5);

        let stored = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, Product { likes: 5, ..created });
    }

    #[tokio::test]
    async fn test_edit_negative_likes_leaves_record() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["lake"])).await.unwrap();

        let change = ProductChange {
            likes: Some(-1),
            description: Some(None),
            ..ProductChange::default()
        };
        let err = repo.edit(&created.id, &change).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::NegativeLikes)));
        assert_eq!(err.to_string(), "Likes cannot be negative");

        let stored = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn test_edit_unknown_is_not_found() {
        let (_db, repo) = setup().await;

        let change = ProductChange {
            likes: Some(1),
            ..ProductChange::default()
        };
        let err = repo.edit("missing", &change).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_edit_replaces_tags_and_groups() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["old"])).await.unwrap();

        let change: ProductChange = serde_json::from_value(serde_json::json!({
            "description": null,
            "tags": [{ "title": "new" }, { "title": "fresh" }],
            "user": { "id": "u-9", "first_name": "Lin", "username": "lin" }
        }))
        .unwrap();
        repo.edit(&created.id, &change).await.unwrap();

        let stored = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.description, None);
        assert_eq!(stored.tags, vec![Tag::new("new"), Tag::new("fresh")]);
        assert_eq!(stored.user.username, "lin");
        // Whole group replaced
        assert_eq!(stored.user.last_name, None);
        assert_eq!(stored.urls, created.urls);

        assert!(repo.list(&ListOptions::new().tag("old")).await.unwrap().is_empty());
        assert_eq!(repo.list(&ListOptions::new().tag("fresh")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_edit_empty_change_returns_record() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["lake"])).await.unwrap();

        let same = repo.edit(&created.id, &ProductChange::default()).await.unwrap();
        assert_eq!(same, created);
    }

    #[tokio::test]
    async fn test_edit_store_failure_is_wrapped() {
        let (db, repo) = setup().await;
        let created = repo.create(&payload(&[])).await.unwrap();
        db.close().await;

        let change = ProductChange {
            likes: Some(9),
            ..ProductChange::default()
        };
        let err = repo.edit(&created.id, &change).await.unwrap_err();
        assert!(matches!(err, DbError::EditFailed { ref id, .. } if id == &created.id));
        assert_eq!(err.to_string(), "Failed to edit product");
        assert!(err.source().is_some());
    }

    // -------------------------------------------------------------------------
    // destroy
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_destroy_then_get_and_destroy_again() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["lake"])).await.unwrap();

        let confirmation = repo.destroy(&created.id).await.unwrap();
        assert_eq!(confirmation.message, "Product deleted successfully");
        assert_eq!(repo.get(&created.id).await.unwrap(), None);

        let err = repo.destroy(&created.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), format!("No product found with id {}", created.id));
    }

    #[tokio::test]
    async fn test_destroyed_product_can_be_recreated() {
        let (_db, repo) = setup().await;
        let created = repo.create(&payload(&["lake", "dawn"])).await.unwrap();

        repo.destroy(&created.id).await.unwrap();
        let restored = repo.create(&NewProduct::from(created.clone())).await.unwrap();

        assert_eq!(restored, created);
        assert_eq!(repo.get(&created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_destroy_cascades_tags() {
        let (db, repo) = setup().await;
        let created = repo.create(&payload(&["a", "b"])).await.unwrap();

        repo.destroy(&created.id).await.unwrap();

        let remaining: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_tags WHERE product_id = ?1")
                .bind(&created.id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_destroy_store_failure_is_wrapped() {
        let (db, repo) = setup().await;
        let created = repo.create(&payload(&[])).await.unwrap();
        db.close().await;

        let err = repo.destroy(&created.id).await.unwrap_err();
        assert!(matches!(err, DbError::DeleteFailed { .. }));
        assert_eq!(err.to_string(), "Failed to delete product");
        assert!(err.source().is_some());
    }

    // -------------------------------------------------------------------------
    // misc
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_concurrent_creates_get_distinct_ids() {
        let (_db, repo) = setup().await;
        let input = payload(&[]);

        let (a, b, c) = tokio::join!(repo.create(&input), repo.create(&input), repo.create(&input));
        let mut created = vec![a.unwrap().id, b.unwrap().id, c.unwrap().id];
        created.sort();
        created.dedup();

        assert_eq!(created.len(), 3);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_default_repository_lists_in_creation_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();

        let mut created = Vec::new();
        for _ in 0..3 {
            created.push(repo.create(&payload(&[])).await.unwrap().id);
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert!(created.iter().all(|id| id.len() == 36));
        let listed = repo.list(&ListOptions::new()).await.unwrap();
        assert_eq!(ids(&listed), created.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
