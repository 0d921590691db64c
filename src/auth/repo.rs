use sqlx::PgPool;

pub use super::repo_types::User;

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at, deleted_at";

impl User {
    /// Insert a new user. A unique violation on one of the `uq_*`
    /// partial indexes surfaces as `sqlx::Error::Database` for the
    /// caller's error layer to classify; there is no racy pre-check.
    pub async fn create(
        db: &PgPool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Find a live user by username.
    pub async fn find_by_username(
        db: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
            "#,
        ))
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Find a live user by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1 AND deleted_at IS NULL
            "#,
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Find a live user by id. Soft-deleted accounts are invisible
    /// here, which is what expires their outstanding tokens.
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }
}
