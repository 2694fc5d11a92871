//! Pricing service functions.
//!
//! Thin wrappers around the calculator for the three call sites: live
//! preview, quote snapshots and pre-charge re-validation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::QuoteCache;

use super::calculators::PriceCalculator;
use super::models::{PriceBreakdown, PriceInput};

/// A single out-of-contract input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Pricing error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Contract violation: {message}")]
    ContractViolation {
        message: String,
        violations: Vec<Violation>,
    },

    #[error("No quote found for {quote_id}")]
    QuoteNotFound { quote_id: Uuid },

    #[error("Submitted price {submitted} does not match computed price {expected}")]
    PriceMismatch { expected: i64, submitted: i64 },
}

/// Breakdown snapshot stored alongside a saved quote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSnapshot {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub input: PriceInput,
    pub breakdown: PriceBreakdown,
}

/// Result of a successful pre-charge re-validation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeAuthorization {
    pub final_price: i64,
    pub breakdown: PriceBreakdown,
    pub authorized_at: DateTime<Utc>,
}

/// Live preview. Out-of-contract input is clamped, never rejected.
pub fn preview(calculator: &PriceCalculator, input: &PriceInput) -> PriceBreakdown {
    let breakdown = calculator.calculate(input);
    debug!(
        base_price = breakdown.base_price,
        final_price = breakdown.final_price,
        "Computed price preview"
    );
    breakdown
}

/// Compute a breakdown strictly and store it as a quote snapshot.
pub async fn save_quote(
    calculator: &PriceCalculator,
    cache: &QuoteCache,
    input: PriceInput,
) -> Result<QuoteSnapshot, PricingError> {
    let breakdown = calculator.calculate_strict(&input)?;

    let created_at = Utc::now();
    let ttl = Duration::from_std(cache.ttl()).unwrap_or_else(|_| Duration::zero());
    let snapshot = QuoteSnapshot {
        id: Uuid::new_v4(),
        created_at,
        expires_at: created_at + ttl,
        input,
        breakdown,
    };

    cache
        .quotes
        .insert(snapshot.id, Arc::new(snapshot.clone()))
        .await;

    info!(
        quote_id = %snapshot.id,
        final_price = snapshot.breakdown.final_price,
        "Quote snapshot saved"
    );

    Ok(snapshot)
}

/// Fetch a stored quote snapshot.
pub async fn get_quote(cache: &QuoteCache, quote_id: Uuid) -> Result<QuoteSnapshot, PricingError> {
    match cache.quotes.get(&quote_id).await {
        Some(snapshot) => Ok((*snapshot).clone()),
        None => {
            debug!(quote_id = %quote_id, "Quote snapshot not found");
            Err(PricingError::QuoteNotFound { quote_id })
        }
    }
}

/// Re-run the calculation from raw selections before charging.
///
/// The client-submitted final price must match the server's computation
/// exactly.
pub fn authorize_charge(
    calculator: &PriceCalculator,
    input: &PriceInput,
    submitted_final_price: i64,
) -> Result<ChargeAuthorization, PricingError> {
    let breakdown = calculator.calculate_strict(input)?;

    if breakdown.final_price != submitted_final_price {
        warn!(
            expected = breakdown.final_price,
            submitted = submitted_final_price,
            "Rejected charge: client price does not match server computation"
        );
        return Err(PricingError::PriceMismatch {
            expected: breakdown.final_price,
            submitted: submitted_final_price,
        });
    }

    Ok(ChargeAuthorization {
        final_price: breakdown.final_price,
        breakdown,
        authorized_at: Utc::now(),
    })
}
