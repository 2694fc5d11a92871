//! Price breakdown engine for home-service bookings.
//!
//! Turns a customer's selections into a final payable amount with an
//! auditable trail of intermediate steps. The calculator is pure; the
//! services and routes wrap it for previews, quote snapshots and
//! pre-charge re-validation.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{calculate, round_money, PriceCalculator};
pub use models::{
    DiscountKind, LineItem, LineItemKind, OfferStatus, PriceBreakdown, PriceInput, PricingPolicy,
    SelectedAddOn, SpecialOffer,
};
pub use routes::router;
pub use services::{ChargeAuthorization, PricingError, QuoteSnapshot, Violation};
