use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::{CURRENCY, INVOICE_DURATION_SECS};
use crate::error::{AppError, Result};
use crate::models::{Book, Rental, User};

/// Invoice as returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub invoice_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceCustomer {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvoiceItem {
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

/// Invoice creation payload
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRequest {
    pub external_id: String,
    pub amount: i64,
    pub description: String,
    pub invoice_duration: i64,
    pub customer: InvoiceCustomer,
    pub currency: String,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceRequest {
    /// One line item per rented book
    pub fn for_rental(rental: &Rental, user: &User, books: &[Book]) -> Self {
        let customer_name = if user.full_name.is_empty() {
            user.username.clone()
        } else {
            user.full_name.clone()
        };

        Self {
            external_id: format!("rental-{}", rental.id),
            amount: rental.total_price,
            description: format!("Book rental #{}", rental.id),
            invoice_duration: INVOICE_DURATION_SECS,
            customer: InvoiceCustomer {
                name: customer_name,
                email: user.email.clone(),
            },
            currency: CURRENCY.to_string(),
            items: books
                .iter()
                .map(|b| InvoiceItem {
                    name: b.title.clone(),
                    price: b.price,
                    quantity: 1,
                })
                .collect(),
        }
    }
}

/// Issues payment invoices for paid rentals
#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice>;
}

/// Invoice API reached over HTTP with basic auth (API key as user name)
#[derive(Clone)]
pub struct HttpInvoiceGateway {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HttpInvoiceGateway {
    pub fn new(
        client: reqwest::Client,
        url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl InvoiceGateway for HttpInvoiceGateway {
    async fn create_invoice(&self, request: &InvoiceRequest) -> Result<Invoice> {
        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.api_key, Some(""))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Invoice gateway returned {}: {}", status, body);
            return Err(AppError::internal("Error while creating invoice"));
        }

        let invoice: Invoice = response.json().await?;
        tracing::info!("Invoice {} created for {}", invoice.id, request.external_id);

        Ok(invoice)
    }
}
