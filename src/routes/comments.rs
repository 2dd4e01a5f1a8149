use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::ERR_COMMENT_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{Comment, CommentDetail};
use crate::routes::activities::record_activity;
use crate::routes::posts::fetch_post;
use crate::routes::users::fetch_user;
use crate::routes::validation::{require_non_empty, AppJson, AppPath};
use crate::AppState;

const COMMENT_COLUMNS: &str = "id, post_id, author_id, content, created_at";

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
    pub post_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}

async fn fetch_comment(state: &AppState, comment_id: i64) -> Result<Comment> {
    sqlx::query_as::<_, Comment>(&format!(
        "SELECT {} FROM comments WHERE id = ?",
        COMMENT_COLUMNS
    ))
    .bind(comment_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::not_found(ERR_COMMENT_NOT_FOUND))
}

/// Comment on an existing post
pub async fn create_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<CommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>)> {
    let content = require_non_empty(&payload.content, "Comment content")?;
    let post = fetch_post(&state.db, payload.post_id).await?;

    let mut tx = state.db.begin().await?;

    let comment = sqlx::query_as::<_, Comment>(&format!(
        "INSERT INTO comments (post_id, author_id, content, created_at) VALUES (?, ?, ?, ?) \
         RETURNING {}",
        COMMENT_COLUMNS
    ))
    .bind(post.id)
    .bind(auth.user_id)
    .bind(content)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    record_activity(
        &mut *tx,
        auth.user_id,
        &format!("user create new comment in Post ID {}", comment.post_id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        "User {} commented {} on post {}",
        auth.user_id,
        comment.id,
        comment.post_id
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment created successfully".to_string(),
            comment,
        }),
    ))
}

/// One comment with its post and author
pub async fn get_comment(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(comment_id): AppPath<i64>,
) -> Result<Json<CommentDetail>> {
    let comment = fetch_comment(&state, comment_id).await?;
    let post = fetch_post(&state.db, comment.post_id).await?;
    let author = fetch_user(&state.db, comment.author_id).await?;

    Ok(Json(CommentDetail {
        comment,
        post,
        author: author.into(),
    }))
}

/// Delete one of the caller's comments
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(comment_id): AppPath<i64>,
) -> Result<Json<CommentResponse>> {
    let comment = fetch_comment(&state, comment_id).await?;

    if comment.author_id != auth.user_id {
        tracing::warn!(
            "User {} tried to delete comment {} written by {}",
            auth.user_id,
            comment.id,
            comment.author_id
        );
        return Err(AppError::unauthorized(
            "You are not authorized to delete this comment",
        ));
    }

    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment.id)
        .execute(&mut *tx)
        .await?;

    record_activity(
        &mut *tx,
        auth.user_id,
        &format!("user delete comment in POST ID {}", comment.post_id),
    )
    .await?;

    tx.commit().await?;

    Ok(Json(CommentResponse {
        message: "Comment deleted successfully".to_string(),
        comment,
    }))
}
