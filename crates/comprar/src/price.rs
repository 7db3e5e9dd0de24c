//! Pure price arithmetic and cart reconciliation.
//!
//! Everything here is independent of any page or driver: the scenario
//! layer scrapes observed amounts off the storefront and hands them to
//! these functions, which recompute the totals and report every
//! discrepancy beyond the tolerance.
//!
//! All intermediate money values are rounded to cents with half-away-
//! from-zero rounding, matching how the storefront itself accumulates
//! line totals. Comparisons use an absolute tolerance rather than
//! equality, and a NaN on either side never counts as a match.

/// Absolute tolerance for money comparisons (one cent)
pub const DEFAULT_TOLERANCE: f64 = 0.01;

/// Round a value to two decimal places, half away from zero
#[must_use]
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Line total for one cart row: `unit_price * quantity`, in cents
#[must_use]
pub fn item_total(unit_price: f64, quantity: u32) -> f64 {
    round_price(unit_price * f64::from(quantity))
}

/// Subtotal over cart rows.
///
/// Each line total is rounded before summing and the sum is rounded
/// again, so the result agrees with a storefront that displays (and
/// therefore rounds) each row separately.
#[must_use]
pub fn sub_total(items: &[CartLineItem]) -> f64 {
    let sum = items
        .iter()
        .map(|item| item_total(item.unit_price, item.quantity))
        .sum();
    round_price(sum)
}

/// Grand total: subtotal plus shipping, rounded to cents
#[must_use]
pub fn grand_total(sub_total: f64, shipping: f64) -> f64 {
    round_price(sub_total + shipping)
}

/// Compare two amounts within the default one-cent tolerance
#[must_use]
pub fn prices_match(expected: f64, actual: f64) -> bool {
    prices_match_within(expected, actual, DEFAULT_TOLERANCE)
}

/// Compare two amounts within an explicit tolerance.
///
/// Returns `false` when either side is NaN.
#[must_use]
pub fn prices_match_within(expected: f64, actual: f64, tolerance: f64) -> bool {
    (expected - actual).abs() <= tolerance
}

/// Format an amount with exactly two decimal places
#[must_use]
pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

/// One scraped cart row, as observed on the cart page
#[derive(Debug, Clone, PartialEq)]
pub struct CartLineItem {
    /// Product name shown in the row
    pub name: String,
    /// Unit price shown in the row
    pub unit_price: f64,
    /// Quantity in the row's input
    pub quantity: u32,
    /// Row total shown in the row
    pub observed_total: f64,
}

/// Outcome of reconciling a cart against recomputed totals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCheck {
    /// True when every amount matched within tolerance
    pub is_valid: bool,
    /// Human-readable description of each mismatch
    pub errors: Vec<String>,
}

impl PriceCheck {
    fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }
}

/// Reconcile a scraped cart against recomputed totals.
///
/// Checks, in order: each row's observed total against
/// `unit_price * quantity`, the observed subtotal against the sum of
/// recomputed row totals, and the observed grand total against the
/// *observed* subtotal plus shipping. The last check deliberately
/// builds on the observed subtotal so one bad row surfaces as one
/// error, not three.
#[must_use]
pub fn validate_cart(
    items: &[CartLineItem],
    observed_sub_total: f64,
    shipping: f64,
    observed_grand_total: f64,
) -> PriceCheck {
    let mut check = PriceCheck::valid();

    for (index, item) in items.iter().enumerate() {
        let expected = item_total(item.unit_price, item.quantity);
        if !prices_match(expected, item.observed_total) {
            check.is_valid = false;
            check.errors.push(format!(
                "Item {} ({}): expected {}, got {}",
                index + 1,
                item.name,
                format_price(expected),
                format_price(item.observed_total)
            ));
        }
    }

    let expected_sub_total = sub_total(items);
    if !prices_match(expected_sub_total, observed_sub_total) {
        check.is_valid = false;
        check.errors.push(format!(
            "Subtotal: expected {}, got {}",
            format_price(expected_sub_total),
            format_price(observed_sub_total)
        ));
    }

    let expected_grand_total = grand_total(observed_sub_total, shipping);
    if !prices_match(expected_grand_total, observed_grand_total) {
        check.is_valid = false;
        check.errors.push(format!(
            "Grand total: expected {}, got {}",
            format_price(expected_grand_total),
            format_price(observed_grand_total)
        ));
    }

    check
}
