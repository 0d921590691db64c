use sqlx::PgPool;

pub use super::repo_types::Todo;

const TODO_COLUMNS: &str =
    "id, user_id, title, description, completed, created_at, updated_at, deleted_at";

impl Todo {
    /// List a user's live todos, newest first.
    pub async fn list_by_owner(
        db: &PgPool,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE user_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        title: &str,
        description: &str,
    ) -> Result<Todo, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            r#"
            INSERT INTO todos (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING {TODO_COLUMNS}
            "#,
        ))
        .bind(user_id)
        .bind(title)
        .bind(description)
        .fetch_one(db)
        .await
    }

    /// Fetch one todo under the owner predicate. Someone else's id
    /// looks exactly like a missing one.
    pub async fn find_by_id(
        db: &PgPool,
        user_id: i64,
        todo_id: i64,
    ) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            r#"
            SELECT {TODO_COLUMNS}
            FROM todos
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        ))
        .bind(todo_id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Partial update: `None` fields keep their stored values. Returns
    /// `None` when no live row matched the `(id, owner)` predicate.
    pub async fn update_partial(
        db: &PgPool,
        user_id: i64,
        todo_id: i64,
        title: Option<&str>,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!(
            r#"
            UPDATE todos
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                completed = COALESCE($5, completed),
                updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            RETURNING {TODO_COLUMNS}
            "#,
        ))
        .bind(todo_id)
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(completed)
        .fetch_optional(db)
        .await
    }

    /// Soft-delete one owned todo; `false` when nothing matched.
    pub async fn soft_delete(
        db: &PgPool,
        user_id: i64,
        todo_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET deleted_at = now(), updated_at = now()
            WHERE id = $1 AND user_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
