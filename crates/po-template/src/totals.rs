//! Subtotal, tax and grand total

use crate::order::{ForeignLineItem, LineItem};
use crate::{Result, TemplateError};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Local VAT rate (15%)
pub const LOCAL_VAT_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);

/// Anything that carries a precomputed line total
pub trait PricedItem {
    fn total_price(&self) -> Decimal;
}

impl PricedItem for LineItem {
    fn total_price(&self) -> Decimal {
        self.total_price
    }
}

impl PricedItem for ForeignLineItem {
    fn total_price(&self) -> Decimal {
        self.total_price
    }
}

/// Tax added on top of the subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxTreatment {
    /// Fixed-rate VAT
    Vat { rate: Decimal },
    /// No tax line; grand total equals the subtotal
    Exempt,
}

impl TaxTreatment {
    pub fn local_vat() -> Self {
        TaxTreatment::Vat {
            rate: LOCAL_VAT_RATE,
        }
    }
}

/// Derived order totals at full precision
///
/// Nothing is rounded here; use [`Totals::rounded`] or the money formatter
/// at display time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Decimal,
    /// `None` when the order carries no tax line
    pub tax: Option<Decimal>,
    pub grand_total: Decimal,
}

impl Totals {
    /// Sum the line totals and apply `tax`
    pub fn compute<I: PricedItem>(items: &[I], tax: TaxTreatment) -> Result<Self> {
        Self::from_line_totals(items.iter().map(PricedItem::total_price), tax)
    }

    /// Like [`Totals::compute`], over bare line totals
    ///
    /// Fails with [`TemplateError::TotalOutOfRange`] instead of capping an
    /// amount that does not fit a `Decimal`.
    pub fn from_line_totals<T>(line_totals: T, tax: TaxTreatment) -> Result<Self>
    where
        T: IntoIterator<Item = Decimal>,
    {
        let subtotal = line_totals
            .into_iter()
            .try_fold(Decimal::ZERO, |acc, total| acc.checked_add(total))
            .ok_or(TemplateError::TotalOutOfRange)?;

        match tax {
            TaxTreatment::Vat { rate } => {
                let tax = subtotal
                    .checked_mul(rate)
                    .ok_or(TemplateError::TotalOutOfRange)?;
                let grand_total = subtotal
                    .checked_add(tax)
                    .ok_or(TemplateError::TotalOutOfRange)?;
                Ok(Self {
                    subtotal,
                    tax: Some(tax),
                    grand_total,
                })
            }
            TaxTreatment::Exempt => Ok(Self {
                subtotal,
                tax: None,
                grand_total: subtotal,
            }),
        }
    }

    /// Copy with every amount rounded half away from zero to 2 places
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_money(self.subtotal),
            tax: self.tax.map(round_money),
            grand_total: round_money(self.grand_total),
        }
    }
}

/// Round to cents, half away from zero
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `quantity × unit_cost` rounded to cents, `None` on overflow
pub fn line_total(quantity: u32, unit_cost: Decimal) -> Option<Decimal> {
    Decimal::from(quantity).checked_mul(unit_cost).map(round_money)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    struct Priced(Decimal);

    impl PricedItem for Priced {
        fn total_price(&self) -> Decimal {
            self.0
        }
    }

    #[test]
    fn test_local_scenario() {
        let totals = Totals::compute(&[Priced(dec!(200.00))], TaxTreatment::local_vat()).unwrap();
        assert_eq!(totals.subtotal, dec!(200.00));
        assert_eq!(totals.tax, Some(dec!(30.00)));
        assert_eq!(totals.grand_total, dec!(230.00));
    }

    #[test]
    fn test_empty_order() {
        let totals = Totals::compute::<Priced>(&[], TaxTreatment::local_vat()).unwrap().rounded();
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.tax, Some(Decimal::ZERO));
        assert_eq!(totals.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_exempt_has_no_tax() {
        let items = [Priced(dec!(10.10)), Priced(dec!(0.05))];
        let totals = Totals::compute(&items, TaxTreatment::Exempt).unwrap();
        assert_eq!(totals.tax, None);
        assert_eq!(totals.grand_total, dec!(10.15));
    }

    #[test]
    fn test_tax_kept_at_full_precision() {
        let totals = Totals::compute(&[Priced(dec!(0.03))], TaxTreatment::local_vat()).unwrap();
        assert_eq!(totals.tax, Some(dec!(0.0045)));
        assert_eq!(totals.rounded().tax, Some(dec!(0.00)));
        assert_eq!(totals.rounded().grand_total, dec!(0.03));
    }

    #[test]
    fn test_line_total_rounds_half_away() {
        assert_eq!(line_total(1, dec!(0.125)), Some(dec!(0.13)));
        assert_eq!(line_total(3, dec!(0.335)), Some(dec!(1.01)));
        assert_eq!(line_total(0, dec!(99.99)), Some(dec!(0.00)));
    }

    #[test]
    fn test_line_total_overflow() {
        assert_eq!(line_total(u32::MAX, Decimal::MAX), None);
    }

    fn units_of_1e28(n: i128) -> Priced {
        Priced(Decimal::from_i128_with_scale(n * 10i128.pow(28), 0))
    }

    #[test]
    fn test_overflowing_total_is_an_error() {
        let items = [units_of_1e28(5), units_of_1e28(5)];
        assert!(matches!(
            Totals::compute(&items, TaxTreatment::Exempt),
            Err(TemplateError::TotalOutOfRange)
        ));

        // The subtotal fits but the VAT on top of it does not
        let items = [units_of_1e28(5), units_of_1e28(2)];
        assert!(Totals::compute(&items, TaxTreatment::Exempt).is_ok());
        assert!(matches!(
            Totals::compute(&items, TaxTreatment::local_vat()),
            Err(TemplateError::TotalOutOfRange)
        ));
    }

    fn cents() -> impl Strategy<Value = Decimal> {
        (0i64..10_000_000_000).prop_map(|c| Decimal::new(c, 2))
    }

    proptest! {
        #[test]
        fn prop_line_total_is_rounded_product(q in 0u32..100_000, u in 0i64..100_000_000, scale in 0u32..5) {
            let unit_cost = Decimal::new(u, scale);
            let expected = (Decimal::from(q) * unit_cost)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            prop_assert_eq!(line_total(q, unit_cost), Some(expected));
        }

        #[test]
        fn prop_subtotal_ignores_order(values in prop::collection::vec(cents(), 0..40)) {
            let forward: Vec<Priced> = values.iter().copied().map(Priced).collect();
            let backward: Vec<Priced> = values.iter().rev().copied().map(Priced).collect();
            let a = Totals::compute(&forward, TaxTreatment::local_vat()).unwrap();
            let b = Totals::compute(&backward, TaxTreatment::local_vat()).unwrap();
            prop_assert_eq!(a.subtotal, b.subtotal);
            prop_assert_eq!(a.subtotal, values.iter().copied().sum::<Decimal>());
        }

        #[test]
        fn prop_grand_total_is_subtotal_plus_vat(values in prop::collection::vec(cents(), 0..40)) {
            let items: Vec<Priced> = values.into_iter().map(Priced).collect();
            let totals = Totals::compute(&items, TaxTreatment::local_vat()).unwrap();
            prop_assert_eq!(
                totals.rounded().grand_total,
                round_money(totals.subtotal * dec!(1.15))
            );
        }
    }
}
