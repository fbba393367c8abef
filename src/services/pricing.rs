// src/services/pricing.rs

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Quantity must be greater than zero")]
    NonPositiveQuantity,

    #[error("Price per unit must be greater than zero")]
    NonPositivePrice,

    #[error("Tax rate cannot be negative")]
    NegativeTaxRate,

    #[error("Amounts allow at most two decimal places")]
    TooManyDecimals,

    #[error("Amount is too large")]
    AmountTooLarge,
}

/// Scale of the stored quantity, price and tax rate columns.
pub const AMOUNT_SCALE: u32 = 2;
/// Exclusive upper bound of the `NUMERIC(10,2)` quantity and price columns.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);
/// Exclusive upper bound of the `NUMERIC(5,2)` tax rate column.
pub const MAX_TAX_RATE: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

pub(crate) fn check_amount(value: Decimal, limit: Decimal) -> Result<(), PricingError> {
    if value.normalize().scale() > AMOUNT_SCALE {
        return Err(PricingError::TooManyDecimals);
    }
    if value >= limit {
        return Err(PricingError::AmountTooLarge);
    }
    Ok(())
}

/// The three amounts stored on every sale line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleTotals {
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total_price: Decimal,
}

/// subtotal = quantity x price, tax = subtotal x rate / 100, total = subtotal + tax.
/// A missing tax rate counts as zero. Inputs must fit their columns, so the
/// results are exact at the scale the sales table stores them.
pub fn compute_totals(
    quantity: Decimal,
    price_per_unit: Decimal,
    tax_rate: Option<Decimal>,
) -> Result<SaleTotals, PricingError> {
    if quantity <= Decimal::ZERO {
        return Err(PricingError::NonPositiveQuantity);
    }
    if price_per_unit <= Decimal::ZERO {
        return Err(PricingError::NonPositivePrice);
    }

    let tax_rate = tax_rate.unwrap_or(Decimal::ZERO);
    if tax_rate < Decimal::ZERO {
        return Err(PricingError::NegativeTaxRate);
    }

    check_amount(quantity, MAX_AMOUNT)?;
    check_amount(price_per_unit, MAX_AMOUNT)?;
    check_amount(tax_rate, MAX_TAX_RATE)?;

    let subtotal = quantity.checked_mul(price_per_unit).ok_or(PricingError::AmountTooLarge)?;
    let tax_amount = subtotal
        .checked_mul(tax_rate)
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(PricingError::AmountTooLarge)?;
    let total_price = subtotal.checked_add(tax_amount).ok_or(PricingError::AmountTooLarge)?;

    Ok(SaleTotals {
        subtotal,
        tax_rate,
        tax_amount,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_flour_bag_with_tax() {
        let totals = compute_totals(dec(10), dec(85), Some(dec(5))).unwrap();

        assert_eq!(totals.subtotal, dec(850));
        assert_eq!(totals.tax_amount, Decimal::new(425, 1));
        assert_eq!(totals.total_price, Decimal::new(8925, 1));
    }

    #[test]
    fn test_missing_tax_rate_is_zero() {
        let totals = compute_totals(dec(3), dec(450), None).unwrap();

        assert_eq!(totals.tax_rate, Decimal::ZERO);
        assert_eq!(totals.tax_amount, Decimal::ZERO);
        assert_eq!(totals.total_price, dec(1350));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let first = compute_totals(Decimal::new(125, 1), Decimal::new(8550, 2), Some(dec(17))).unwrap();
        let second = compute_totals(Decimal::new(125, 1), Decimal::new(8550, 2), Some(dec(17))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_total_matches_closed_form() {
        for (q, p, t) in [(1, 1, 0), (7, 1650, 16), (50, 4000, 3), (2, 85, 100)] {
            let totals = compute_totals(dec(q), dec(p), Some(dec(t))).unwrap();
            let expected = dec(q) * dec(p) * (Decimal::ONE + dec(t) / Decimal::ONE_HUNDRED);
            assert_eq!(totals.total_price, expected);
        }
    }

    #[test]
    fn test_rejections() {
        assert_eq!(compute_totals(dec(0), dec(85), None), Err(PricingError::NonPositiveQuantity));
        assert_eq!(compute_totals(dec(-2), dec(85), None), Err(PricingError::NonPositiveQuantity));
        assert_eq!(compute_totals(dec(2), dec(0), None), Err(PricingError::NonPositivePrice));
        assert_eq!(compute_totals(dec(2), dec(85), Some(dec(-1))), Err(PricingError::NegativeTaxRate));
    }

    #[test]
    fn test_huge_quantity_is_rejected_not_panicking() {
        let quantity: Decimal = serde_json::from_str("7e27").unwrap();
        assert_eq!(compute_totals(quantity, dec(85), Some(dec(5))), Err(PricingError::AmountTooLarge));
        assert_eq!(compute_totals(dec(2), Decimal::MAX, None), Err(PricingError::AmountTooLarge));
        assert_eq!(compute_totals(dec(100_000_000), dec(85), None), Err(PricingError::AmountTooLarge));
        assert_eq!(compute_totals(dec(2), dec(85), Some(dec(1000))), Err(PricingError::AmountTooLarge));
    }

    #[test]
    fn test_sub_cent_amounts_are_rejected() {
        assert_eq!(compute_totals(Decimal::new(4, 3), dec(85), None), Err(PricingError::TooManyDecimals));
        assert_eq!(compute_totals(Decimal::new(1005, 3), dec(85), None), Err(PricingError::TooManyDecimals));
        assert_eq!(compute_totals(dec(1), dec(85), Some(Decimal::new(5125, 3))), Err(PricingError::TooManyDecimals));
        // trailing zeros are fine
        assert!(compute_totals(Decimal::new(12500, 3), dec(85), None).is_ok());
    }

    #[test]
    fn test_largest_sale_is_exact() {
        let max = Decimal::new(9_999_999_999, 2);
        let totals = compute_totals(max, max, Some(Decimal::new(99_999, 2))).unwrap();
        assert_eq!(totals.subtotal, max * max);
        assert_eq!(totals.total_price, totals.subtotal + totals.tax_amount);
        assert!(totals.total_price.scale() <= 8);
    }
}
