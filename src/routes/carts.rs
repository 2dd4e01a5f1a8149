use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::constants::{ERR_BOOK_NOT_FOUND, ERR_CART_ITEM_NOT_FOUND};
use crate::error::{AppError, Result};
use crate::models::Book;
use crate::routes::books::{cart_books, fetch_book};
use crate::routes::validation::{is_unique_violation, AppJson};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CartRequest {
    pub book_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CartMessage {
    pub message: String,
    pub book_id: i64,
}

/// Books in the caller's cart
pub async fn get_cart(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<Book>>> {
    let books = cart_books(&state.db, auth.user_id).await?;
    Ok(Json(books))
}

/// Put a book in the caller's cart
///
/// The book must exist and may only be in the cart once.
pub async fn add_to_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<CartRequest>,
) -> Result<Json<CartRequest>> {
    if fetch_book(&state.db, payload.book_id).await?.is_none() {
        return Err(AppError::not_found(ERR_BOOK_NOT_FOUND));
    }

    sqlx::query("INSERT INTO carts (user_id, book_id, created_at) VALUES (?, ?, ?)")
        .bind(auth.user_id)
        .bind(payload.book_id)
        .bind(Utc::now())
        .execute(&state.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::bad_request("Book is already in cart")
            } else {
                AppError::from(e)
            }
        })?;

    tracing::info!("User {} added book {} to cart", auth.user_id, payload.book_id);

    Ok(Json(payload))
}

/// Take a book out of the caller's cart
pub async fn remove_from_cart(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<CartRequest>,
) -> Result<Json<CartMessage>> {
    let result = sqlx::query("DELETE FROM carts WHERE user_id = ? AND book_id = ?")
        .bind(auth.user_id)
        .bind(payload.book_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found(ERR_CART_ITEM_NOT_FOUND));
    }

    tracing::info!(
        "User {} removed book {} from cart",
        auth.user_id,
        payload.book_id
    );

    Ok(Json(CartMessage {
        message: "Book removed from cart".to_string(),
        book_id: payload.book_id,
    }))
}
