use serde::{Deserialize, Serialize};

/// Book joined with its author and category, as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// Author full name
    pub author: String,
    /// Category name
    pub category: String,
    pub price: i64,
}

impl Book {
    /// Base catalog query; callers append their own WHERE/ORDER BY
    pub const SELECT: &'static str = "SELECT b.id, b.title, \
         TRIM(a.first_name || ' ' || a.last_name) AS author, \
         c.name AS category, b.price \
         FROM books b \
         JOIN authors a ON a.id = b.author_id \
         JOIN categories c ON c.id = b.category_id";
}
