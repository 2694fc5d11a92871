//! Core pricing calculation functions.
//!
//! Pure functions for the booking price breakdown - no I/O, no shared state.
//! The same code runs for the live preview and for the authoritative
//! re-computation before a charge, so both sides always agree.
//!
//! Stacking order is fixed: package, special offer, referral, loyalty.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use super::models::{
    AddOnLine, AppliedOffer, DiscountKind, OfferStatus, PriceBreakdown, PriceInput, PricingPolicy,
    SelectedAddOn, SpecialOffer,
};
use super::services::PricingError;

/// Round an amount in cents to the nearest multiple of `increment` cents.
///
/// Midpoints round away from zero, so 48.6 display units become 49 and
/// 0.5 cents becomes 1. Results outside the `i64` range saturate.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use booking_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(4860), 100), 4900);
/// assert_eq!(round_money(dec!(0.5), 1), 1);
/// assert_eq!(round_money(dec!(134.4), 1), 134);
/// ```
pub fn round_money(amount: Decimal, increment: i64) -> i64 {
    let step = Decimal::from(increment.max(1));
    let rounded =
        (amount / step).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero) * step;
    rounded.to_i64().unwrap_or(if rounded.is_sign_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// `percent`% of `amount`, rounded per the policy.
pub fn percent_of(amount: i64, percent: Decimal, policy: &PricingPolicy) -> i64 {
    round_money(
        Decimal::from(amount) * percent / Decimal::ONE_HUNDRED,
        policy.rounding_increment,
    )
}

/// Step 1: flat sum of add-on prices.
pub fn add_ons_total(add_ons: &[SelectedAddOn]) -> i64 {
    add_ons
        .iter()
        .fold(0i64, |total, add_on| total.saturating_add(add_on.price))
}

/// Step 3: package discount off the pre-discount subtotal.
pub fn package_discount(subtotal: i64, percent: Decimal, policy: &PricingPolicy) -> i64 {
    percent_of(subtotal, percent, policy)
}

/// Result of the special offer step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferStep {
    /// Unsigned size of the adjustment
    pub adjustment: i64,
    /// Running total after the adjustment
    pub running_total: i64,
    pub applied: Option<AppliedOffer>,
}

/// Step 5: evaluate the special offer against the running total.
///
/// An offer gated by `min_properties` that the caller does not reach yields a
/// zero adjustment. `PERCENTAGE` offers are capped by `max_discount`;
/// `PREMIUM` offers are surcharges and are never capped.
pub fn apply_special_offer(
    offer: Option<&SpecialOffer>,
    property_count: i64,
    running_total: i64,
    policy: &PricingPolicy,
) -> OfferStep {
    let Some(offer) = offer else {
        return OfferStep {
            adjustment: 0,
            running_total,
            applied: None,
        };
    };

    let applied = |status| {
        Some(AppliedOffer {
            id: offer.id.clone(),
            name: offer.name.clone(),
            kind: offer.discount_type,
            status,
        })
    };

    if !offer.is_eligible(property_count) {
        return OfferStep {
            adjustment: 0,
            running_total,
            applied: applied(OfferStatus::Ineligible),
        };
    }

    let raw = percent_of(running_total, offer.discount_value, policy);
    let (adjustment, capped) = match (offer.discount_type, offer.max_discount) {
        (DiscountKind::Percentage, Some(max)) if raw > max => (max, true),
        _ => (raw, false),
    };

    OfferStep {
        adjustment,
        running_total: offer.discount_type.apply(running_total, adjustment),
        applied: applied(OfferStatus::Applied { capped }),
    }
}

/// Step 6: referral discount off the running total.
pub fn referral_discount(running_total: i64, percent: Decimal, policy: &PricingPolicy) -> i64 {
    percent_of(running_total, percent, policy)
}

/// Steps 7-8: flat loyalty subtraction, then floor at zero.
pub fn apply_loyalty(running_total: i64, loyalty_discount_cents: i64) -> i64 {
    (running_total - loyalty_discount_cents).max(0)
}

/// Stateless price breakdown calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceCalculator {
    policy: PricingPolicy,
}

impl PriceCalculator {
    pub fn new(policy: PricingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Compute a breakdown, clamping out-of-contract input into range.
    ///
    /// Never fails; meant for live previews.
    pub fn calculate(&self, input: &PriceInput) -> PriceBreakdown {
        self.compute(&input.clamped())
    }

    /// Compute a breakdown, rejecting out-of-contract input.
    pub fn calculate_strict(&self, input: &PriceInput) -> Result<PriceBreakdown, PricingError> {
        input.validate()?;
        Ok(self.compute(input))
    }

    fn compute(&self, input: &PriceInput) -> PriceBreakdown {
        let policy = &self.policy;

        let add_ons_total = add_ons_total(&input.selected_add_ons);
        let subtotal = input.base_price.saturating_add(add_ons_total);

        let package_discount = package_discount(subtotal, input.package_discount_percent, policy);
        let subtotal_after_package = subtotal - package_discount;

        let offer = apply_special_offer(
            input.special_offer.as_ref(),
            input.property_count,
            subtotal_after_package,
            policy,
        );

        let referral_discount =
            referral_discount(offer.running_total, input.referral_discount_percent, policy);
        let running_total = offer.running_total - referral_discount;

        let final_price = apply_loyalty(running_total, input.loyalty_discount_cents);

        PriceBreakdown {
            base_price: input.base_price,
            add_ons_total,
            subtotal,
            package_discount,
            subtotal_after_package,
            special_offer_adjustment: offer.adjustment,
            referral_discount,
            loyalty_discount: input.loyalty_discount_cents,
            final_price,
            add_ons: input
                .selected_add_ons
                .iter()
                .map(|a| AddOnLine {
                    add_on_id: a.add_on_id.clone(),
                    name: a.name.clone(),
                    price: a.price,
                })
                .collect(),
            special_offer: offer.applied,
        }
    }
}

/// Compute a breakdown with the default (nearest cent) policy.
pub fn calculate(input: &PriceInput) -> PriceBreakdown {
    PriceCalculator::default().calculate(input)
}
