use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::ERR_POST_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{Comment, Post, PostWithComments};
use crate::routes::activities::record_activity;
use crate::routes::validation::{AppJson, AppPath};
use crate::AppState;

const POST_COLUMNS: &str = "id, user_id, content, image_url, created_at";

#[derive(Debug, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub message: String,
    pub post: Post,
}

pub(crate) async fn fetch_post<'e, E>(executor: E, post_id: i64) -> Result<Post>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query_as::<_, Post>(&format!("SELECT {} FROM posts WHERE id = ?", POST_COLUMNS))
        .bind(post_id)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found(ERR_POST_NOT_FOUND))
}

/// Create a post for the caller
///
/// Posts without content get a random joke instead.
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    let image_url = payload.image_url.trim();
    if !Post::validate_image_url(image_url) {
        return Err(AppError::bad_request("Invalid image URL"));
    }

    let content = match payload.content.trim() {
        "" => state.jokes.random_joke().await.map_err(|e| {
            tracing::error!("Joke lookup failed: {}", e);
            AppError::internal("Failed to get joke")
        })?,
        text => text.to_string(),
    };

    let mut tx = state.db.begin().await?;

    let post = sqlx::query_as::<_, Post>(&format!(
        "INSERT INTO posts (user_id, content, image_url, created_at) VALUES (?, ?, ?, ?) \
         RETURNING {}",
        POST_COLUMNS
    ))
    .bind(auth.user_id)
    .bind(&content)
    .bind(image_url)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    record_activity(
        &mut *tx,
        auth.user_id,
        &format!("user create new POST with ID {}", post.id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("User {} created post {}", auth.user_id, post.id);

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "Post created successfully".to_string(),
            post,
        }),
    ))
}

pub async fn list_posts(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<Post>>> {
    let posts = sqlx::query_as::<_, Post>(&format!(
        "SELECT {} FROM posts ORDER BY id",
        POST_COLUMNS
    ))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(posts))
}

/// One post with its comments
pub async fn get_post(
    State(state): State<AppState>,
    _auth: AuthUser,
    AppPath(post_id): AppPath<i64>,
) -> Result<Json<PostWithComments>> {
    let post = fetch_post(&state.db, post_id).await?;

    let comments = sqlx::query_as::<_, Comment>(
        "SELECT id, post_id, author_id, content, created_at FROM comments \
         WHERE post_id = ? ORDER BY id",
    )
    .bind(post.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(PostWithComments { post, comments }))
}

/// Delete one of the caller's posts; its comments go with it
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(post_id): AppPath<i64>,
) -> Result<Json<PostResponse>> {
    let post = fetch_post(&state.db, post_id).await?;

    if post.user_id != auth.user_id {
        tracing::warn!(
            "User {} tried to delete post {} owned by {}",
            auth.user_id,
            post.id,
            post.user_id
        );
        return Err(AppError::unauthorized(
            "You are not authorized to delete this post",
        ));
    }

    let mut tx = state.db.begin().await?;

    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post.id)
        .execute(&mut *tx)
        .await?;

    record_activity(
        &mut *tx,
        auth.user_id,
        &format!("user delete POST with ID {}", post.id),
    )
    .await?;

    tx.commit().await?;

    tracing::info!("User {} deleted post {}", auth.user_id, post.id);

    Ok(Json(PostResponse {
        message: "Post deleted successfully".to_string(),
        post,
    }))
}
