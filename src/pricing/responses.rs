//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::models::{LineItem, PriceBreakdown};
use super::services::{ChargeAuthorization, QuoteSnapshot};

/// Response for a price preview
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub breakdown: PriceBreakdown,
    pub line_items: Vec<LineItem>,
    /// False when there is no base price yet and the UI should hide the breakdown
    pub display: bool,
}

impl From<PriceBreakdown> for BreakdownResponse {
    fn from(breakdown: PriceBreakdown) -> Self {
        Self {
            line_items: breakdown.line_items(),
            display: breakdown.should_display(),
            breakdown,
        }
    }
}

/// Response for a saved quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub breakdown: PriceBreakdown,
    pub line_items: Vec<LineItem>,
}

impl From<QuoteSnapshot> for QuoteResponse {
    fn from(snapshot: QuoteSnapshot) -> Self {
        Self {
            quote_id: snapshot.id,
            created_at: snapshot.created_at,
            expires_at: snapshot.expires_at,
            line_items: snapshot.breakdown.line_items(),
            breakdown: snapshot.breakdown,
        }
    }
}

/// Response for a successful charge authorization
#[derive(Debug, Serialize)]
pub struct AuthorizationResponse {
    pub authorized: bool,
    pub final_price: i64,
    pub authorized_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
}

impl From<ChargeAuthorization> for AuthorizationResponse {
    fn from(auth: ChargeAuthorization) -> Self {
        Self {
            authorized: true,
            final_price: auth.final_price,
            authorized_at: auth.authorized_at,
            line_items: auth.breakdown.line_items(),
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
