//! Outbound HTTP integrations
//!
//! Each integration is a trait so handlers can be exercised without the
//! network; the reqwest-backed implementations are wired up in `main`.

pub mod invoices;
pub mod jokes;

pub use invoices::{
    HttpInvoiceGateway, Invoice, InvoiceCustomer, InvoiceGateway, InvoiceItem, InvoiceRequest,
};
pub use jokes::{HttpJokeSource, JokeSource};

use std::time::Duration;

/// Shared client for every outbound integration
pub fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .user_agent(concat!("bookhub-server/", env!("CARGO_PKG_VERSION")))
        .build()
}
