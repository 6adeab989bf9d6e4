//! Order price computation.
//!
//! These numbers must match the backend's to the unit, or the gateway
//! amount and the confirmation screen disagree with what was charged.

use rust_decimal::{Decimal, RoundingStrategy, dec};

use crate::types::CartItem;

/// Orders above this subtotal ship free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = dec!(75);

/// Flat shipping fee below the threshold.
pub const SHIPPING_FEE: Decimal = dec!(10);

/// Tax rate applied to the subtotal.
pub const TAX_RATE: Decimal = dec!(0.18);

/// Computed order amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute totals for a set of checkout items.
///
/// Tax rounds to the nearest integer currency unit, half away from zero
/// (`round(18.5) == 19`), matching the backend.
#[must_use]
pub fn compute(items: &[CartItem]) -> Totals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();

    let shipping = if subtotal > FREE_SHIPPING_THRESHOLD {
        Decimal::ZERO
    } else {
        SHIPPING_FEE
    };

    let tax = (subtotal * TAX_RATE)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Totals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}
