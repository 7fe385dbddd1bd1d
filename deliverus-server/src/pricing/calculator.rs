//! Price Calculator
//!
//! Product prices derive from the base price and the restaurant percentage.
//! All arithmetic is exact, checked `Decimal`; nothing is rounded here.

use rust_decimal::Decimal;
use shared::FieldError;
use shared::models::{OrderLine, Product, ProductPrice};
use thiserror::Error;

/// Inclusive bounds for a restaurant percentage
pub const MIN_PERCENTAGE: Decimal = Decimal::from_parts(5, 0, 0, true, 0);
pub const MAX_PERCENTAGE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Maximum allowed base price per product (1,000,000)
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Maximum allowed quantity per order line
pub const MAX_QUANTITY: i32 = 9999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PricingError {
    #[error("Price calculation overflowed")]
    Overflow,
}

/// `base + base * (percentage / 100)`
pub fn compute_price(base_price: Decimal, percentage: Decimal) -> Result<Decimal, PricingError> {
    if percentage.is_zero() {
        return Ok(base_price);
    }
    percentage
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|factor| base_price.checked_mul(factor))
        .and_then(|delta| base_price.checked_add(delta))
        .ok_or(PricingError::Overflow)
}

/// Percentage must lie in [-5, 5]
pub fn validate_percentage(value: Decimal) -> Result<(), FieldError> {
    if value < MIN_PERCENTAGE || value > MAX_PERCENTAGE {
        return Err(FieldError::new(
            "percentage",
            format!("The percentage must be between {MIN_PERCENTAGE} and {MAX_PERCENTAGE}"),
        ));
    }
    Ok(())
}

/// New prices for every product of a restaurant; fails as a whole on overflow
pub fn reprice(
    products: &[Product],
    percentage: Decimal,
) -> Result<Vec<ProductPrice>, PricingError> {
    products
        .iter()
        .map(|p| {
            Ok(ProductPrice {
                product_id: p.id,
                price: compute_price(p.base_price, percentage)?,
            })
        })
        .collect()
}

/// Order total: sum of `unit_price * quantity` plus shipping costs
pub fn order_total(
    lines: &[OrderLine],
    shipping_costs: Decimal,
) -> Result<Decimal, PricingError> {
    lines
        .iter()
        .try_fold(shipping_costs, |total, l| {
            l.unit_price
                .checked_mul(Decimal::from(l.quantity))
                .and_then(|line| total.checked_add(line))
        })
        .ok_or(PricingError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn product(id: i64, base: &str) -> Product {
        let now = Utc::now();
        Product {
            id,
            restaurant_id: 1,
            name: format!("p{id}"),
            description: None,
            base_price: dec(base),
            price: dec(base),
            availability: true,
            visible_until: None,
            order: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_zero_percentage_keeps_base_price() {
        for base in ["0", "0.01", "9.99", "12345.6789"] {
            assert_eq!(compute_price(dec(base), Decimal::ZERO).unwrap(), dec(base));
        }
    }

    #[test]
    fn test_percentage_applied_exactly() {
        assert_eq!(compute_price(dec("10"), dec("5")).unwrap(), dec("10.5"));
        assert_eq!(compute_price(dec("10"), dec("-5")).unwrap(), dec("9.5"));
        assert_eq!(compute_price(dec("3.33"), dec("2.5")).unwrap(), dec("3.413250"));
        assert_eq!(compute_price(Decimal::ZERO, dec("4")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_price_overflow_is_an_error() {
        assert_eq!(compute_price(Decimal::MAX, dec("5")), Err(PricingError::Overflow));
        assert!(compute_price(Decimal::MAX, dec("-5")).is_ok());
        assert!(compute_price(MAX_PRICE, MAX_PERCENTAGE).is_ok());
    }

    #[test]
    fn test_percentage_bounds_inclusive() {
        assert!(validate_percentage(dec("-5")).is_ok());
        assert!(validate_percentage(dec("5")).is_ok());
        assert!(validate_percentage(Decimal::ZERO).is_ok());
        assert!(validate_percentage(dec("4.99")).is_ok());

        let err = validate_percentage(dec("5.01")).unwrap_err();
        assert_eq!(err.field, "percentage");
        assert!(validate_percentage(dec("-5.0001")).is_err());
        assert!(validate_percentage(dec("100")).is_err());
    }

    #[test]
    fn test_reprice_every_product() {
        let products = vec![product(1, "10"), product(2, "20"), product(3, "0")];
        let prices = reprice(&products, dec("5")).unwrap();

        assert_eq!(
            prices,
            vec![
                ProductPrice { product_id: 1, price: dec("10.5") },
                ProductPrice { product_id: 2, price: dec("21") },
                ProductPrice { product_id: 3, price: Decimal::ZERO },
            ]
        );
    }

    #[test]
    fn test_reprice_back_to_zero_restores_base() {
        let mut p = product(1, "7.25");
        p.price = dec("7.6125");
        let prices = reprice(&[p], Decimal::ZERO).unwrap();
        assert_eq!(prices[0].price, dec("7.25"));
    }

    #[test]
    fn test_order_total() {
        let lines = vec![
            OrderLine { product_id: 1, quantity: 2, unit_price: dec("10.5") },
            OrderLine { product_id: 2, quantity: 1, unit_price: dec("3") },
        ];
        assert_eq!(order_total(&lines, dec("2.5")).unwrap(), dec("26.5"));
        assert_eq!(order_total(&[], dec("2.5")).unwrap(), dec("2.5"));
    }

    #[test]
    fn test_order_total_overflow_is_an_error() {
        let lines = vec![OrderLine {
            product_id: 1,
            quantity: MAX_QUANTITY,
            unit_price: Decimal::MAX,
        }];
        assert_eq!(order_total(&lines, Decimal::ZERO), Err(PricingError::Overflow));

        let lines = vec![OrderLine { product_id: 1, quantity: 1, unit_price: Decimal::MAX }];
        assert_eq!(order_total(&lines, Decimal::ONE), Err(PricingError::Overflow));
    }
}
