use axum::{extract::State, Json};
use chrono::Utc;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::models::UserActivityLog;
use crate::AppState;

/// Append an entry to a user's activity log
pub(crate) async fn record_activity<'e, E>(
    executor: E,
    user_id: i64,
    description: &str,
) -> Result<()>
where
    E: sqlx::SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO user_activity_logs (user_id, description, created_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(description)
    .bind(Utc::now())
    .execute(executor)
    .await?;
    Ok(())
}

/// The caller's activity log, oldest first
pub async fn list_activities(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<UserActivityLog>>> {
    let activities = sqlx::query_as::<_, UserActivityLog>(
        "SELECT id, user_id, description, created_at FROM user_activity_logs \
         WHERE user_id = ? ORDER BY id",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(activities))
}
