use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::auth::extractors::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

use super::dto::{CreateTodoRequest, Pagination, UpdateTodoRequest};
use super::repo::Todo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/todos", get(list_todos))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo))
        .route("/todos/:id", patch(update_todo).delete(delete_todo))
        .route("/todos/:id/toggle", patch(toggle_todo))
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if !(1..=255).contains(&len) {
        return Err(ApiError::Validation("title must be 1-255 characters".into()));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > 4096 {
        return Err(ApiError::Validation(
            "description must be at most 4096 characters".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> ApiResult<Json<Vec<Todo>>> {
    let todos = Todo::list_by_owner(&state.db, user_id, p.limit, p.offset).await?;
    Ok(Json(todos))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    validate_title(&payload.title)?;
    validate_description(&payload.description)?;

    let todo = Todo::create(&state.db, user_id, &payload.title, &payload.description).await?;
    info!(user_id, todo_id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateTodoRequest>,
) -> ApiResult<Json<Todo>> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if let Some(description) = &payload.description {
        validate_description(description)?;
    }

    let todo = Todo::update_partial(
        &state.db,
        user_id,
        id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.completed,
    )
    .await?
    .ok_or(ApiError::NotFound("todo"))?;

    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn toggle_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Todo>> {
    // Read-then-flip-then-write; the window between the read and the
    // write is accepted for a single-user-driven list.
    let current = Todo::find_by_id(&state.db, user_id, id)
        .await?
        .ok_or(ApiError::NotFound("todo"))?;

    let todo = Todo::update_partial(&state.db, user_id, id, None, None, Some(!current.completed))
        .await?
        .ok_or(ApiError::NotFound("todo"))?;

    info!(user_id, todo_id = id, completed = todo.completed, "todo toggled");
    Ok(Json(todo))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Todo::soft_delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("todo"));
    }
    info!(user_id, todo_id = id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds() {
        assert!(validate_title("buy milk").is_ok());
        assert!(validate_title("a").is_ok());
        assert!(validate_title(&"a".repeat(255)).is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title(&"a".repeat(256)).is_err());
    }

    #[test]
    fn description_bound() {
        assert!(validate_description("").is_ok());
        assert!(validate_description(&"d".repeat(4096)).is_ok());
        assert!(validate_description(&"d".repeat(4097)).is_err());
    }
}
