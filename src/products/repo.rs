use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgConnection, PgPool};
use time::OffsetDateTime;

/// Product row. Soft-deleted rows keep their data with is_active = false.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, is_active, created_at, updated_at";

impl Product {
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
        price: Decimal,
        stock: i64,
        is_active: bool,
    ) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, description, price, stock, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(is_active)
        .fetch_one(db)
        .await
    }

    /// Lookup by id deliberately ignores the active flag; soft-deleted rows
    /// stay reachable here even though listings exclude them.
    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn list(db: &PgPool, skip: i64, limit: i64) -> sqlx::Result<Vec<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE is_active = TRUE
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await
    }

    /// Row-locked load used inside update/delete transactions.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: i64,
    ) -> sqlx::Result<Option<Product>> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Persist a patched row and refresh updated_at.
    pub async fn save(&self, conn: &mut PgConnection) -> sqlx::Result<Product> {
        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5,
                is_active = $6, updated_at = now()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.price)
        .bind(self.stock)
        .bind(self.is_active)
        .fetch_one(conn)
        .await
    }

    pub async fn soft_delete(conn: &mut PgConnection, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
