//! Domain models for the price breakdown engine.
//!
//! Monetary values are `i64` minor currency units (cents). Percentages are
//! `Decimal` so ratio math never touches floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::services::{PricingError, Violation};

/// Upper bound for any single cents value accepted by the engine.
///
/// Keeps every intermediate product well inside `Decimal` and `i64` range.
pub const MAX_CENTS: i64 = 1_000_000_000_000;

/// An add-on selected alongside the base service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedAddOn {
    pub add_on_id: String,
    pub name: String,
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_id: Option<String>,
}

/// Direction of a special offer adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Reduces the running total
    Percentage,
    /// Surcharge: increases the running total
    Premium,
}

impl DiscountKind {
    /// Apply an (unsigned) adjustment to the running total with this kind's sign.
    pub fn apply(self, running_total: i64, adjustment: i64) -> i64 {
        match self {
            DiscountKind::Percentage => running_total.saturating_sub(adjustment),
            DiscountKind::Premium => running_total.saturating_add(adjustment),
        }
    }

    /// Signed amount as shown on a line item
    pub fn signed(self, adjustment: i64) -> i64 {
        match self {
            DiscountKind::Percentage => -adjustment,
            DiscountKind::Premium => adjustment,
        }
    }
}

/// Promotional adjustment, optionally gated by property count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialOffer {
    pub id: String,
    pub name: String,
    pub discount_type: DiscountKind,
    pub discount_value: Decimal,
    #[serde(default)]
    pub max_discount: Option<i64>,
    #[serde(default)]
    pub min_properties: Option<i64>,
}

impl SpecialOffer {
    /// Whether the offer applies for the given number of managed properties.
    pub fn is_eligible(&self, property_count: i64) -> bool {
        match self.min_properties {
            Some(min) => property_count >= min,
            None => true,
        }
    }
}

/// Everything the calculator needs, as selected by the customer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceInput {
    pub base_price: i64,
    #[serde(default)]
    pub selected_add_ons: Vec<SelectedAddOn>,
    #[serde(default)]
    pub package_discount_percent: Decimal,
    #[serde(default)]
    pub special_offer: Option<SpecialOffer>,
    #[serde(default)]
    pub referral_discount_percent: Decimal,
    #[serde(default)]
    pub property_count: i64,
    #[serde(default)]
    pub loyalty_discount_cents: i64,
}

impl PriceInput {
    /// Check the input against the calculator's contract.
    ///
    /// Every violation is reported, not just the first one.
    pub fn validate(&self) -> Result<(), PricingError> {
        let mut violations = Vec::new();

        check_cents(&mut violations, "base_price", self.base_price);
        for (i, add_on) in self.selected_add_ons.iter().enumerate() {
            check_cents(&mut violations, &format!("selected_add_ons[{}].price", i), add_on.price);
        }
        check_percent(
            &mut violations,
            "package_discount_percent",
            self.package_discount_percent,
        );
        check_percent(
            &mut violations,
            "referral_discount_percent",
            self.referral_discount_percent,
        );
        if self.property_count < 0 {
            violations.push(Violation::new("property_count", "must not be negative"));
        }
        check_cents(&mut violations, "loyalty_discount_cents", self.loyalty_discount_cents);

        let subtotal = self
            .selected_add_ons
            .iter()
            .fold(self.base_price.max(0), |total, a| {
                total.saturating_add(a.price.max(0))
            });
        if subtotal > MAX_CENTS {
            violations.push(Violation::new("subtotal", "exceeds maximum amount"));
        }

        if let Some(offer) = &self.special_offer {
            check_percent(&mut violations, "special_offer.discount_value", offer.discount_value);
            if let Some(max) = offer.max_discount {
                check_cents(&mut violations, "special_offer.max_discount", max);
            }
            if matches!(offer.min_properties, Some(min) if min < 0) {
                violations.push(Violation::new(
                    "special_offer.min_properties",
                    "must not be negative",
                ));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PricingError::ContractViolation {
                message: format!("{} invalid pricing input field(s)", violations.len()),
                violations,
            })
        }
    }

    /// Copy of the input with every field forced into its documented range.
    ///
    /// Add-on prices are trimmed, in selection order, so the subtotal never
    /// exceeds `MAX_CENTS`.
    pub fn clamped(&self) -> PriceInput {
        let base_price = clamp_cents(self.base_price);
        let mut remaining = MAX_CENTS - base_price;

        PriceInput {
            base_price,
            selected_add_ons: self
                .selected_add_ons
                .iter()
                .map(|a| {
                    let price = clamp_cents(a.price).min(remaining);
                    remaining -= price;
                    SelectedAddOn { price, ..a.clone() }
                })
                .collect(),
            package_discount_percent: clamp_percent(self.package_discount_percent),
            special_offer: self.special_offer.as_ref().map(|o| SpecialOffer {
                discount_value: clamp_percent(o.discount_value),
                max_discount: o.max_discount.map(clamp_cents),
                min_properties: o.min_properties.map(|m| m.max(0)),
                ..o.clone()
            }),
            referral_discount_percent: clamp_percent(self.referral_discount_percent),
            property_count: self.property_count.max(0),
            loyalty_discount_cents: clamp_cents(self.loyalty_discount_cents),
        }
    }
}

fn check_cents(violations: &mut Vec<Violation>, field: &str, value: i64) {
    if value < 0 {
        violations.push(Violation::new(field, "must not be negative"));
    } else if value > MAX_CENTS {
        violations.push(Violation::new(field, "exceeds maximum amount"));
    }
}

fn check_percent(violations: &mut Vec<Violation>, field: &str, value: Decimal) {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        violations.push(Violation::new(field, "must be between 0 and 100"));
    }
}

fn clamp_cents(value: i64) -> i64 {
    value.clamp(0, MAX_CENTS)
}

fn clamp_percent(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

/// Rounding configuration shared by client preview and server re-validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Granularity (in cents) each step's delta is rounded to
    pub rounding_increment: i64,
}

impl PricingPolicy {
    /// Round every delta to the nearest whole display unit (100 cents)
    pub fn whole_units() -> Self {
        Self {
            rounding_increment: 100,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            rounding_increment: 1,
        }
    }
}

/// Outcome of evaluating the special offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OfferStatus {
    Applied { capped: bool },
    Ineligible,
}

/// Special offer as it was applied to a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedOffer {
    pub id: String,
    pub name: String,
    pub kind: DiscountKind,
    #[serde(flatten)]
    pub status: OfferStatus,
}

/// Add-on line in selection order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnLine {
    pub add_on_id: String,
    pub name: String,
    pub price: i64,
}

/// Audit trail of a single price computation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub base_price: i64,
    pub add_ons_total: i64,
    pub subtotal: i64,
    pub package_discount: i64,
    pub subtotal_after_package: i64,
    pub special_offer_adjustment: i64,
    pub referral_discount: i64,
    pub loyalty_discount: i64,
    pub final_price: i64,
    pub add_ons: Vec<AddOnLine>,
    pub special_offer: Option<AppliedOffer>,
}

/// What a line item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemKind {
    BasePrice,
    AddOn,
    Subtotal,
    PackageDiscount,
    SpecialOffer,
    ReferralDiscount,
    LoyaltyDiscount,
    Total,
}

/// One line of an invoice or price preview. Discounts carry negative amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineItemKind,
    pub label: String,
    pub amount: i64,
}

impl LineItem {
    fn new(kind: LineItemKind, label: impl Into<String>, amount: i64) -> Self {
        Self {
            kind,
            label: label.into(),
            amount,
        }
    }
}

impl PriceBreakdown {
    /// A zero base price means "no price yet"; callers hide the breakdown.
    pub fn should_display(&self) -> bool {
        self.base_price > 0
    }

    /// Line items in computation order.
    ///
    /// Zero-valued adjustments are omitted, except for an ineligible special
    /// offer which is listed so the customer sees why it did not apply.
    pub fn line_items(&self) -> Vec<LineItem> {
        let mut items = vec![LineItem::new(
            LineItemKind::BasePrice,
            "Base price",
            self.base_price,
        )];

        for add_on in &self.add_ons {
            items.push(LineItem::new(LineItemKind::AddOn, add_on.name.clone(), add_on.price));
        }

        items.push(LineItem::new(LineItemKind::Subtotal, "Subtotal", self.subtotal));

        if self.package_discount != 0 {
            items.push(LineItem::new(
                LineItemKind::PackageDiscount,
                "Package discount",
                -self.package_discount,
            ));
        }

        if let Some(offer) = &self.special_offer {
            let label = match offer.status {
                OfferStatus::Ineligible => format!("{} (not eligible)", offer.name),
                OfferStatus::Applied { capped: true } => format!("{} (capped)", offer.name),
                OfferStatus::Applied { capped: false } => offer.name.clone(),
            };
            items.push(LineItem::new(
                LineItemKind::SpecialOffer,
                label,
                offer.kind.signed(self.special_offer_adjustment),
            ));
        }

        if self.referral_discount != 0 {
            items.push(LineItem::new(
                LineItemKind::ReferralDiscount,
                "Referral discount",
                -self.referral_discount,
            ));
        }

        if self.loyalty_discount != 0 {
            items.push(LineItem::new(
                LineItemKind::LoyaltyDiscount,
                "Loyalty points",
                -self.loyalty_discount,
            ));
        }

        items.push(LineItem::new(LineItemKind::Total, "Total", self.final_price));
        items
    }
}
