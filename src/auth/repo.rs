use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// User record in the database. The password hash never leaves the process.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub is_verified: bool,
}

const USER_COLUMNS: &str =
    "id, email, hashed_password, first_name, last_name, is_active, is_superuser, is_verified";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Insert a new user. The privilege and verification flags are forced
    /// server-side; client input never reaches them.
    pub async fn create(
        db: &PgPool,
        email: &str,
        hashed_password: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, hashed_password, first_name, last_name,
                               is_active, is_superuser, is_verified)
            VALUES ($1, $2, $3, $4, TRUE, FALSE, FALSE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(hashed_password)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(db)
        .await
    }

    /// Full-row profile update; callers apply the patch to a loaded row first.
    pub async fn update(&self, db: &PgPool) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET email = $2, hashed_password = $3, first_name = $4, last_name = $5
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.email)
        .bind(&self.hashed_password)
        .bind(&self.first_name)
        .bind(&self.last_name)
        .fetch_one(db)
        .await
    }

    pub async fn set_password(db: &PgPool, id: i64, hashed_password: &str) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET hashed_password = $2 WHERE id = $1")
            .bind(id)
            .bind(hashed_password)
            .execute(db)
            .await?;
        Ok(())
    }

    pub async fn mark_verified(db: &PgPool, id: i64) -> sqlx::Result<()> {
        sqlx::query("UPDATE users SET is_verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// User rows are never physically deleted; management delete deactivates.
    pub async fn deactivate(db: &PgPool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
