use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::{
    ERR_EMAIL_NOT_FOUND, ERR_INCORRECT_PASSWORD, ERR_USER_EXISTS, ERR_USER_NOT_FOUND,
};
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::{User, UserProfile};
use crate::routes::validation::{is_unique_violation, require_positive, AppJson};
use crate::security::{hash_password, issue_token, verify_password};
use crate::AppState;

const USER_COLUMNS: &str = "id, email, username, full_name, password_hash, age, address, \
     birth_date, contact_no, deposit, created_at";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub contact_no: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct TopupRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize)]
pub struct TopupResponse {
    pub message: String,
    pub deposit: i64,
}

/// Load a user row by id
pub(crate) async fn fetch_user(db: &Db, user_id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(ERR_USER_NOT_FOUND))
}

/// Register a new user
///
/// Email and username must both be unused. The password is stored as a
/// bcrypt hash; the response is the public profile.
pub async fn register_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserProfile>)> {
    let email = payload.email.trim().to_lowercase();
    let username = payload.username.trim().to_string();

    if !User::validate_email(&email) {
        return Err(AppError::bad_request("Invalid email address"));
    }
    if !User::validate_username(&username) {
        return Err(AppError::bad_request("Invalid username"));
    }
    if payload.password.is_empty() {
        return Err(AppError::bad_request("Password must not be empty"));
    }
    if payload.age < 0 {
        return Err(AppError::bad_request("Age must not be negative"));
    }

    let taken: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ? OR username = ?")
            .bind(&email)
            .bind(&username)
            .fetch_one(&state.db)
            .await?;
    if taken > 0 {
        tracing::info!("Registration rejected, email or username in use");
        return Err(AppError::bad_request(ERR_USER_EXISTS));
    }

    let password_hash = hash_password(payload.password, state.config.bcrypt_cost).await?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, username, full_name, password_hash, age, address, \
         birth_date, contact_no, deposit, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?) RETURNING {}",
        USER_COLUMNS
    ))
    .bind(&email)
    .bind(&username)
    .bind(payload.full_name.trim())
    .bind(&password_hash)
    .bind(payload.age)
    .bind(payload.address.trim())
    .bind(payload.birth_date.trim())
    .bind(payload.contact_no.trim())
    .bind(Utc::now())
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration
        if is_unique_violation(&e) {
            AppError::bad_request(ERR_USER_EXISTS)
        } else {
            AppError::from(e)
        }
    })?;

    tracing::info!("New user registered: {}", user.id);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password, returning a signed bearer token
pub async fn login_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE email = ?",
        USER_COLUMNS
    ))
    .bind(&email)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::not_found(ERR_EMAIL_NOT_FOUND))?;

    if !verify_password(payload.password, user.password_hash.clone()).await? {
        tracing::warn!("Failed login for user {}", user.id);
        return Err(AppError::bad_request(ERR_INCORRECT_PASSWORD));
    }

    let token = issue_token(
        user.id,
        &user.email,
        &state.config.jwt_secret,
        state.config.token_ttl_hours,
    )?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(LoginResponse { token }))
}

/// Profile of the authenticated user
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserProfile>> {
    let user = fetch_user(&state.db, auth.user_id).await?;
    Ok(Json(user.into()))
}

/// Add funds to the caller's deposit
pub async fn topup(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<TopupRequest>,
) -> Result<Json<TopupResponse>> {
    let amount = require_positive(payload.amount, "Amount")?;
    let user = fetch_user(&state.db, auth.user_id).await?;

    // SQLite widens an overflowing integer sum to REAL, so the cap is checked in SQL
    let deposit: i64 = sqlx::query_scalar(
        "UPDATE users SET deposit = deposit + ? WHERE id = ? AND deposit <= ? - ? \
         RETURNING deposit",
    )
    .bind(amount)
    .bind(user.id)
    .bind(i64::MAX)
    .bind(amount)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| {
        tracing::warn!("Top-up of {} rejected for user {}", amount, user.id);
        AppError::bad_request("Deposit limit exceeded")
    })?;

    tracing::info!("User {} topped up {}", auth.user_id, amount);

    Ok(Json(TopupResponse {
        message: format!("Deposit added. Current deposit amount: {}", deposit),
        deposit,
    }))
}
