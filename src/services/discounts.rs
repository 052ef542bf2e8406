//! Discount math and category eligibility for coupons.
//!
//! Two output shapes exist on purpose: the applicable-coupons listing
//! reports one combined figure computed against the order total, while
//! single-coupon validation reports the item and charges portions
//! separately. Both shapes are part of the API contract.

use rust_decimal::Decimal;
use std::collections::BTreeSet;

/// Item-vs-charges split of a coupon's discount.
///
/// `charges` means the non-item part of the order total (fees etc.),
/// `order_total - total_item_price`. That difference can be negative when a
/// caller reports an order total below the item sum; it is propagated, not
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiscountBreakdown {
    pub items_discount: Decimal,
    pub charges_discount: Decimal,
}

impl DiscountBreakdown {
    pub const ZERO: DiscountBreakdown = DiscountBreakdown {
        items_discount: Decimal::ZERO,
        charges_discount: Decimal::ZERO,
    };

    /// A zero breakdown is what every not-applicable outcome collapses to,
    /// so callers treat it as "coupon not valid".
    pub fn is_zero(&self) -> bool {
        self.items_discount.is_zero() && self.charges_discount.is_zero()
    }
}

/// Whether a coupon's category set applies to a cart.
///
/// One matching item is sufficient; matching is exact string equality. An
/// empty category set matches no cart at all.
pub fn matches_cart<'a, I>(categories: &BTreeSet<String>, cart_categories: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    cart_categories
        .into_iter()
        .any(|category| categories.contains(category))
}

/// Splits a coupon's discount into item and charges portions.
///
/// Percentage coupons discount both portions proportionally. Fixed coupons
/// apply the whole amount to charges when it covers them, and otherwise
/// mirror the amount onto both portions (not split between them). Unknown
/// discount types compute nothing.
pub fn split_discount(
    discount_type: &str,
    discount_value: Decimal,
    total_item_price: Decimal,
    order_total: Decimal,
) -> DiscountBreakdown {
    match discount_type {
        "percentage" => {
            let rate = discount_value / Decimal::ONE_HUNDRED;
            DiscountBreakdown {
                items_discount: total_item_price * rate,
                charges_discount: (order_total - total_item_price) * rate,
            }
        }
        "fixed" => {
            let charges = order_total - total_item_price;
            if discount_value >= charges {
                DiscountBreakdown {
                    items_discount: Decimal::ZERO,
                    charges_discount: discount_value,
                }
            } else {
                DiscountBreakdown {
                    items_discount: discount_value,
                    charges_discount: discount_value,
                }
            }
        }
        _ => DiscountBreakdown::ZERO,
    }
}

/// The single combined discount the applicable-coupons listing reports,
/// computed against the full order total rather than the item sum.
pub fn listing_discount(
    discount_type: &str,
    discount_value: Decimal,
    order_total: Decimal,
) -> Decimal {
    match discount_type {
        "percentage" => order_total * discount_value / Decimal::ONE_HUNDRED,
        "fixed" => discount_value,
        _ => Decimal::ZERO,
    }
}

/// Formats a currency amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    fn set(labels: &[&str]) -> BTreeSet<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_category_set_matches_nothing() {
        let empty = BTreeSet::new();
        assert!(!matches_cart(&empty, ["pain-relief", "vitamins"]));
        assert!(!matches_cart(&empty, ["anything"]));
    }

    #[test]
    fn single_matching_item_is_sufficient() {
        let categories = set(&["pain-relief"]);
        assert!(matches_cart(&categories, ["vitamins", "pain-relief"]));
    }

    #[test]
    fn match_is_exact_no_normalization() {
        let categories = set(&["Pain-Relief"]);
        assert!(!matches_cart(&categories, ["pain-relief"]));
        assert!(!matches_cart(&categories, [" Pain-Relief"]));
    }

    #[test_case(dec!(10), dec!(100), dec!(120), dec!(10), dec!(2.0) ; "ten percent splits proportionally")]
    #[test_case(dec!(50), dec!(80), dec!(80), dec!(40), dec!(0) ; "no charges means no charges discount")]
    #[test_case(dec!(100), dec!(40), dec!(70), dec!(40), dec!(30) ; "full percentage wipes both portions")]
    #[test_case(dec!(0), dec!(100), dec!(120), dec!(0), dec!(0) ; "zero percent computes zero")]
    fn percentage_split(
        value: Decimal,
        items: Decimal,
        total: Decimal,
        want_items: Decimal,
        want_charges: Decimal,
    ) {
        let got = split_discount("percentage", value, items, total);
        assert_eq!(got.items_discount, want_items);
        assert_eq!(got.charges_discount, want_charges);
    }

    #[test_case(dec!(15), dec!(100), dec!(120), dec!(15), dec!(15) ; "below charges mirrors to both")]
    #[test_case(dec!(25), dec!(100), dec!(120), dec!(0), dec!(25) ; "covering charges goes to charges only")]
    #[test_case(dec!(20), dec!(100), dec!(120), dec!(0), dec!(20) ; "equal to charges counts as covering")]
    fn fixed_split(
        value: Decimal,
        items: Decimal,
        total: Decimal,
        want_items: Decimal,
        want_charges: Decimal,
    ) {
        let got = split_discount("fixed", value, items, total);
        assert_eq!(got.items_discount, want_items);
        assert_eq!(got.charges_discount, want_charges);
    }

    #[test]
    fn fixed_split_with_negative_charges_goes_to_charges() {
        // order_total below the item sum: charges is negative, any fixed
        // amount covers it
        let got = split_discount("fixed", dec!(5), dec!(100), dec!(90));
        assert_eq!(got.items_discount, dec!(0));
        assert_eq!(got.charges_discount, dec!(5));
    }

    #[test]
    fn percentage_split_propagates_negative_charges() {
        let got = split_discount("percentage", dec!(10), dec!(100), dec!(90));
        assert_eq!(got.items_discount, dec!(10));
        assert_eq!(got.charges_discount, dec!(-1.0));
    }

    #[test_case("bogo" ; "unknown type")]
    #[test_case("" ; "empty type")]
    #[test_case("Fixed" ; "case sensitive type")]
    fn other_discount_types_compute_zero(discount_type: &str) {
        let got = split_discount(discount_type, dec!(15), dec!(100), dec!(120));
        assert!(got.is_zero());
        assert_eq!(
            listing_discount(discount_type, dec!(15), dec!(120)),
            dec!(0)
        );
    }

    #[test]
    fn listing_discount_uses_order_total() {
        assert_eq!(
            listing_discount("percentage", dec!(10), dec!(120)),
            dec!(12.0)
        );
        assert_eq!(listing_discount("fixed", dec!(15), dec!(120)), dec!(15));
    }

    #[test]
    fn format_amount_pads_and_rounds() {
        assert_eq!(format_amount(dec!(12)), "12.00");
        assert_eq!(format_amount(dec!(12.5)), "12.50");
        assert_eq!(format_amount(dec!(12.345)), "12.34");
        assert_eq!(format_amount(dec!(12.346)), "12.35");
    }

    #[test]
    fn zero_breakdown_reads_as_invalid() {
        assert!(DiscountBreakdown::ZERO.is_zero());
        let nonzero = DiscountBreakdown {
            items_discount: dec!(0),
            charges_discount: dec!(15),
        };
        assert!(!nonzero.is_zero());
    }
}
