use axum::{extract::State, Json};

use crate::constants::ERR_BOOK_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::Book;
use crate::routes::validation::AppPath;
use crate::AppState;

/// Look up one catalog entry
pub(crate) async fn fetch_book<'e, E>(executor: E, book_id: i64) -> Result<Option<Book>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let book = sqlx::query_as::<_, Book>(&format!("{} WHERE b.id = ?", Book::SELECT))
        .bind(book_id)
        .fetch_optional(executor)
        .await?;
    Ok(book)
}

/// Books currently in a user's cart, in the order they were added
pub(crate) async fn cart_books<'e, E>(executor: E, user_id: i64) -> Result<Vec<Book>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let books = sqlx::query_as::<_, Book>(&format!(
        "{} JOIN carts ct ON ct.book_id = b.id WHERE ct.user_id = ? ORDER BY ct.id",
        Book::SELECT
    ))
    .bind(user_id)
    .fetch_all(executor)
    .await?;
    Ok(books)
}

/// Books covered by a rental
pub(crate) async fn rental_books<'e, E>(executor: E, rental_id: i64) -> Result<Vec<Book>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let books = sqlx::query_as::<_, Book>(&format!(
        "{} JOIN rental_details rd ON rd.book_id = b.id WHERE rd.rental_id = ? ORDER BY rd.id",
        Book::SELECT
    ))
    .bind(rental_id)
    .fetch_all(executor)
    .await?;
    Ok(books)
}

/// Full catalog with author and category names
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<Book>>> {
    let books = sqlx::query_as::<_, Book>(&format!("{} ORDER BY b.id", Book::SELECT))
        .fetch_all(&state.db)
        .await?;
    Ok(Json(books))
}

pub async fn get_book(
    State(state): State<AppState>,
    AppPath(book_id): AppPath<i64>,
) -> Result<Json<Book>> {
    let book = fetch_book(&state.db, book_id)
        .await?
        .ok_or_else(|| AppError::not_found(ERR_BOOK_NOT_FOUND))?;
    Ok(Json(book))
}
