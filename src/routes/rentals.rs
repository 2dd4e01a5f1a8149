use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::auth::AuthUser;
use crate::clients::{Invoice, InvoiceRequest};
use crate::constants::ERR_RENTAL_NOT_FOUND;
use crate::error::{AppError, Result};
use crate::models::{rental::total_price, Payment, Rental, RentalStatus, RentalSummary};
use crate::routes::books::{cart_books, rental_books};
use crate::routes::users::fetch_user;
use crate::routes::validation::AppPath;
use crate::AppState;

const RENTAL_COLUMNS: &str = "id, user_id, total_price, rental_date, status";

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub message: String,
    pub rental_id: i64,
    pub total_price: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub message: String,
    pub rental_id: i64,
    pub status: RentalStatus,
    /// Deposit left after the payment
    pub deposit: i64,
    pub payment: Payment,
    pub invoice: Option<Invoice>,
}

/// An invoice issued for a payment that lost a race has nothing to settle
fn warn_orphaned_invoice(invoice: Option<&Invoice>, rental_id: i64) {
    if let Some(invoice) = invoice {
        tracing::warn!(
            "Invoice {} for rental {} is orphaned, payment was not recorded",
            invoice.id,
            rental_id
        );
    }
}

/// Turn the caller's cart into a rental
///
/// The rental total is the sum of the cart's book prices. Creating the
/// rental, its details and emptying the cart happen in one transaction.
pub async fn checkout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<CheckoutResponse>> {
    let mut tx = state.db.begin().await?;

    let books = cart_books(&mut *tx, auth.user_id).await?;
    if books.is_empty() {
        return Err(AppError::bad_request("Cart is empty, cannot create rental"));
    }

    let total = total_price(&books);

    let rental_id: i64 = sqlx::query_scalar(
        "INSERT INTO rentals (user_id, total_price, rental_date, status) \
         VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(auth.user_id)
    .bind(total)
    .bind(Utc::now())
    .bind(RentalStatus::Created)
    .fetch_one(&mut *tx)
    .await?;

    for book in &books {
        sqlx::query(
            "INSERT INTO rental_details (rental_id, book_id, returned) VALUES (?, ?, FALSE)",
        )
        .bind(rental_id)
        .bind(book.id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM carts WHERE user_id = ?")
        .bind(auth.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "User {} checked out rental {} ({} books, total {})",
        auth.user_id,
        rental_id,
        books.len(),
        total
    );

    Ok(Json(CheckoutResponse {
        message: "Rental created successfully".to_string(),
        rental_id,
        total_price: total,
    }))
}

/// The caller's rentals, each with its own books
pub async fn rent_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<RentalSummary>>> {
    let rentals = sqlx::query_as::<_, Rental>(&format!(
        "SELECT {} FROM rentals WHERE user_id = ? ORDER BY id",
        RENTAL_COLUMNS
    ))
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    let mut history = Vec::with_capacity(rentals.len());
    for rental in rentals {
        let books = rental_books(&state.db, rental.id).await?;
        history.push(RentalSummary::new(rental, books));
    }

    Ok(Json(history))
}

/// Pay a rental from the caller's deposit
///
/// Only the owner can pay, and only once. When an invoice gateway is
/// configured, an invoice is issued before any balance is touched so a
/// gateway failure leaves the rental unpaid.
pub async fn pay_rental(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(rental_id): AppPath<i64>,
) -> Result<Json<PaymentResponse>> {
    let rental = sqlx::query_as::<_, Rental>(&format!(
        "SELECT {} FROM rentals WHERE id = ?",
        RENTAL_COLUMNS
    ))
    .bind(rental_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::not_found(ERR_RENTAL_NOT_FOUND))?;

    if rental.user_id != auth.user_id {
        tracing::warn!(
            "User {} tried to pay rental {} owned by {}",
            auth.user_id,
            rental.id,
            rental.user_id
        );
        return Err(AppError::unauthorized(
            "You are not authorized to pay for this rental",
        ));
    }

    if rental.status == RentalStatus::Paid {
        return Err(AppError::bad_request("Rental is already paid"));
    }

    let user = fetch_user(&state.db, auth.user_id).await?;
    if user.deposit < rental.total_price {
        return Err(AppError::bad_request("Insufficient deposit"));
    }

    let invoice = match &state.invoices {
        Some(gateway) => {
            let books = rental_books(&state.db, rental.id).await?;
            let request = InvoiceRequest::for_rental(&rental, &user, &books);
            let invoice = gateway.create_invoice(&request).await.map_err(|e| {
                tracing::error!("Invoice creation failed for rental {}: {}", rental.id, e);
                AppError::internal("Error while creating invoice")
            })?;
            Some(invoice)
        }
        None => None,
    };

    let mut tx = state.db.begin().await?;

    // Conditional updates keep concurrent payments from double-spending
    let flipped = sqlx::query("UPDATE rentals SET status = ? WHERE id = ? AND status = ?")
        .bind(RentalStatus::Paid)
        .bind(rental.id)
        .bind(RentalStatus::Created)
        .execute(&mut *tx)
        .await?;
    if flipped.rows_affected() == 0 {
        warn_orphaned_invoice(invoice.as_ref(), rental.id);
        return Err(AppError::bad_request("Rental is already paid"));
    }

    let deposit: i64 = sqlx::query_scalar(
        "UPDATE users SET deposit = deposit - ? WHERE id = ? AND deposit >= ? RETURNING deposit",
    )
    .bind(rental.total_price)
    .bind(auth.user_id)
    .bind(rental.total_price)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| {
        warn_orphaned_invoice(invoice.as_ref(), rental.id);
        AppError::bad_request("Insufficient deposit")
    })?;

    let payment = sqlx::query_as::<_, Payment>(
        "INSERT INTO payments (rental_id, user_id, amount, invoice_id, invoice_url, paid_at) \
         VALUES (?, ?, ?, ?, ?, ?) \
         RETURNING id, rental_id, user_id, amount, invoice_id, invoice_url, paid_at",
    )
    .bind(rental.id)
    .bind(auth.user_id)
    .bind(rental.total_price)
    .bind(invoice.as_ref().map(|i| i.id.clone()))
    .bind(invoice.as_ref().map(|i| i.invoice_url.clone()))
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "User {} paid rental {} ({}), payment {} now {}",
        auth.user_id,
        rental.id,
        rental.total_price,
        payment.id,
        RentalStatus::Paid.as_str()
    );

    Ok(Json(PaymentResponse {
        message: "Payment successful".to_string(),
        rental_id: rental.id,
        status: RentalStatus::Paid,
        deposit,
        payment,
        invoice,
    }))
}
