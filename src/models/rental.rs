use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Book;

/// Lifecycle of a rental: created at checkout, paid once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RentalStatus {
    Created,
    Paid,
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Created => "created",
            RentalStatus::Paid => "paid",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Rental {
    pub id: i64,
    pub user_id: i64,
    pub total_price: i64,
    pub rental_date: DateTime<Utc>,
    pub status: RentalStatus,
}

/// Settlement record written when a rental is paid
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Payment {
    pub id: i64,
    pub rental_id: i64,
    pub user_id: i64,
    pub amount: i64,
    pub invoice_id: Option<String>,
    pub invoice_url: Option<String>,
    pub paid_at: DateTime<Utc>,
}

/// A rental with the books it covers, for the rent history
#[derive(Debug, Clone, Serialize)]
pub struct RentalSummary {
    pub rental_id: i64,
    pub total_price: i64,
    pub date: DateTime<Utc>,
    pub status: RentalStatus,
    pub books: Vec<Book>,
}

impl RentalSummary {
    pub fn new(rental: Rental, books: Vec<Book>) -> Self {
        Self {
            rental_id: rental.id,
            total_price: rental.total_price,
            date: rental.rental_date,
            status: rental.status,
            books,
        }
    }
}

/// Sum of book prices for a checkout
pub fn total_price(books: &[Book]) -> i64 {
    books.iter().map(|b| b.price).sum()
}
