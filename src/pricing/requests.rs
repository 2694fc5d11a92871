//! Request DTOs for pricing API endpoints.
//!
//! Previews and quotes take a `PriceInput` body as-is; only charge
//! authorization wraps it.

use serde::Deserialize;

use super::models::PriceInput;

/// Request to re-validate a price before charging
#[derive(Debug, Deserialize)]
pub struct AuthorizeChargeRequest {
    pub selection: PriceInput,
    /// Final price the client displayed and intends to charge
    pub final_price: i64,
}
