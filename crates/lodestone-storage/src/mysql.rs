use async_trait::async_trait;
use jiff::Timestamp;
use lodestone_core::error::{Result, StorageError};
use lodestone_core::{NewProduct, ProductId, ProductRecord, ReadRepository, Repository, Sku};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// DDL for the `products` table. Safe to apply more than once.
pub const SCHEMA: &str = include_str!("../ddl/mysql/products.sql");

// The sku column is binary-collated; converting it keeps it decodable as text.
const SELECT_PRODUCT: &str = r#"
    SELECT id, CONVERT(sku USING utf8mb4) AS sku, name, description, category, stock, created_at
    FROM products
"#;

/// MySQL implementation of the repository contract.
///
/// SKU uniqueness is enforced by the `products_sku_unique` key; a duplicate
/// insert or assignment surfaces as [`StorageError::Conflict`]. Deleting a
/// product removes its row, so its SKU can be assigned again.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `products` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_sku(raw: Option<String>) -> Result<Option<Sku>> {
    raw.map(|code| {
        code.parse::<Sku>()
            .map_err(|e| StorageError::InvalidData(e.to_string()))
    })
    .transpose()
}

fn parse_created_at(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{micros}': {e}"))
    })
}

fn row_to_record(row: &MySqlRow) -> Result<ProductRecord> {
    let id: u64 = row.try_get("id").map_err(map_sqlx_error)?;
    let sku: Option<String> = row.try_get("sku").map_err(map_sqlx_error)?;
    let created_at: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;

    Ok(ProductRecord {
        id: ProductId(id),
        sku: parse_sku(sku)?,
        name: row.try_get("name").map_err(map_sqlx_error)?,
        description: row.try_get("description").map_err(map_sqlx_error)?,
        category: row.try_get("category").map_err(map_sqlx_error)?,
        stock: row.try_get("stock").map_err(map_sqlx_error)?,
        created_at: parse_created_at(created_at)?,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, sku: &Sku) -> Result<Option<ProductRecord>> {
        let row = sqlx::query(&format!("{SELECT_PRODUCT} WHERE sku = ? LIMIT 1"))
            .bind(sku.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn exists(&self, sku: &Sku) -> Result<bool> {
        let exists = sqlx::query(
            r#"
            SELECT 1
            FROM products
            WHERE sku = ?
            LIMIT 1
            "#,
        )
        .bind(sku.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?
        .is_some();

        Ok(exists)
    }

    async fn skus(&self) -> Result<Vec<String>> {
        sqlx::query_scalar(
            r#"
            SELECT CONVERT(sku USING utf8mb4)
            FROM products
            WHERE sku IS NOT NULL
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn latest_sku(&self) -> Result<Option<String>> {
        sqlx::query_scalar(
            r#"
            SELECT CONVERT(sku USING utf8mb4)
            FROM products
            WHERE sku IS NOT NULL
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn unassigned(&self) -> Result<Vec<ProductRecord>> {
        let rows = sqlx::query(&format!(
            "{SELECT_PRODUCT} WHERE sku IS NULL ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(row_to_record).collect()
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, product: NewProduct) -> Result<ProductRecord> {
        // Truncate to the stored precision so the returned record matches later reads.
        let created_at = parse_created_at(Timestamp::now().as_microsecond())?;
        let sku = product.sku.map(|sku| sku.to_string());

        let result = sqlx::query(
            r#"
            INSERT INTO products (sku, name, description, category, stock, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(sku.as_deref())
        .bind(product.name.as_str())
        .bind(product.description.as_deref())
        .bind(product.category.as_deref())
        .bind(product.stock)
        .bind(created_at.as_microsecond())
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => Ok(ProductRecord::from_new(
                ProductId(done.last_insert_id()),
                product,
                created_at,
            )),
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(sku.unwrap_or_default()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn assign_sku(&self, id: ProductId, sku: &Sku) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET sku = ?
            WHERE id = ?
              AND sku IS NULL
            "#,
        )
        .bind(sku.to_string())
        .bind(id.0)
        .execute(&self.pool)
        .await;

        let done = match result {
            Ok(done) => done,
            Err(err) if is_unique_violation(&err) => {
                return Err(StorageError::Conflict(sku.to_string()))
            }
            Err(err) => return Err(map_sqlx_error(err)),
        };

        if done.rows_affected() > 0 {
            return Ok(());
        }

        // Nothing updated: tell a missing product apart from one that already has a SKU.
        let existing: Option<Option<String>> =
            sqlx::query_scalar("SELECT CONVERT(sku USING utf8mb4) FROM products WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        match existing {
            None => Err(StorageError::NotFound(format!("product {id}"))),
            Some(held) => Err(StorageError::Conflict(format!(
                "product {id} already holds {}",
                held.unwrap_or_default()
            ))),
        }
    }

    async fn delete(&self, sku: &Sku) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM products
            WHERE sku = ?
            "#,
        )
        .bind(sku.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
