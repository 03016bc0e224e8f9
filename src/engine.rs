//! Pricing and cashback settlement.
//!
//! Settlement is a pure computation over a customer record and an order; its
//! only side effect is the cashback movement on the record, which the caller
//! is expected to persist. Nothing here rounds: every amount is exact.

use crate::catalog::{AddOn, Base};
use crate::customer::{Category, CustomerRecord};
use crate::money::Money;
use crate::order::{OrderRequest, OrderResult};
use log::debug;
use rust_decimal::Decimal;

/// Proportional student discount (25%).
pub const STUDENT_DISCOUNT_RATE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

/// Flat staff discount in centavos (R$1.00).
pub const STAFF_DISCOUNT_CENTS: i64 = 100;

/// Cashback earned on the post-discount amount (10%).
pub const CASHBACK_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Price of a base with its add-ons, before any discount.
pub fn gross_price(base: Base, add_ons: &[AddOn]) -> Money {
    base.price() + add_ons.iter().map(AddOn::price).sum::<Money>()
}

/// Discount granted to a category on a gross amount.
///
/// The staff discount is flat and is not capped at the order value; every
/// catalog base costs more than the discount.
pub fn discount_for(category: Category, gross: Money) -> Money {
    match category {
        Category::Student => gross * STUDENT_DISCOUNT_RATE,
        Category::Staff => Money::from_cents(STAFF_DISCOUNT_CENTS),
        Category::Community => Money::ZERO,
    }
}

/// Prices `order` for `customer` and applies the cashback movement.
///
/// Cashback is redeemed only when requested, capped at the post-discount
/// amount, and earned on the post-discount amount before redemption.
pub fn settle(customer: &mut CustomerRecord, order: &OrderRequest) -> OrderResult {
    let gross = gross_price(order.base, &order.add_ons);
    let discount = discount_for(customer.category(), gross);
    let net = gross - discount;

    let balance = customer.cashback_balance();
    let cashback_redeemed = if order.redeem_cashback && balance.is_positive() && net.is_positive()
    {
        balance.min(net)
    } else {
        Money::ZERO
    };

    let final_amount = net - cashback_redeemed;
    let cashback_earned = if net.is_positive() {
        net * CASHBACK_RATE
    } else {
        Money::ZERO
    };

    customer.settle_cashback(cashback_redeemed, cashback_earned);

    let result = OrderResult {
        gross,
        discount,
        net,
        cashback_redeemed,
        final_amount,
        cashback_earned,
        balance: customer.cashback_balance(),
    };

    #[cfg(debug_assertions)]
    debug_assert!(customer.check_invariant());
    debug_assert_eq!(
        result.final_amount,
        result.gross - result.discount - result.cashback_redeemed
    );

    debug!(
        "Settled order for {} ({}): gross {}, discount {}, redeemed {}, final {}, earned {}",
        customer.name(),
        customer.category(),
        result.gross,
        result.discount,
        result.cashback_redeemed,
        result.final_amount,
        result.cashback_earned
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn money(s: &str) -> Money {
        Money::from_str(s).unwrap()
    }

    fn leite() -> OrderRequest {
        OrderRequest::new("Ana", Base::Leite, Vec::new())
    }

    #[test]
    fn test_rate_constants() {
        assert_eq!(STUDENT_DISCOUNT_RATE, Decimal::from_str("0.25").unwrap());
        assert_eq!(CASHBACK_RATE, Decimal::from_str("0.10").unwrap());
    }

    #[test]
    fn test_gross_price_sums_duplicates() {
        let gross = gross_price(Base::Rosa, &[AddOn::Boba, AddOn::Boba, AddOn::Taro]);
        assert_eq!(gross, money("7.85"));
        assert_eq!(gross_price(Base::Manga, &[]), money("5.47"));
    }

    #[test]
    fn test_community_pays_gross() {
        let mut customer = CustomerRecord::new("Ana", Category::Community);
        let result = settle(&mut customer, &leite());

        assert_eq!(result.gross, money("4.35"));
        assert_eq!(result.discount, Money::ZERO);
        assert_eq!(result.net, money("4.35"));
        assert_eq!(result.final_amount, money("4.35"));
        assert_eq!(result.cashback_earned, money("0.435"));
        assert_eq!(customer.cashback_balance(), money("0.435"));
    }

    #[test]
    fn test_student_discount_is_proportional() {
        let mut customer = CustomerRecord::new("Ana", Category::Student);
        let result = settle(&mut customer, &leite());

        assert_eq!(result.discount, money("1.0875"));
        assert_eq!(result.net, money("3.2625"));
        assert_eq!(result.cashback_earned, money("0.32625"));
        assert_eq!(result.balance, money("0.32625"));
    }

    #[test]
    fn test_staff_discount_is_flat() {
        let mut customer = CustomerRecord::new("Ana", Category::Staff);
        let result = settle(&mut customer, &leite());

        assert_eq!(result.discount, money("1.00"));
        assert_eq!(result.net, money("3.35"));
        assert_eq!(result.final_amount, money("3.35"));
    }

    #[test]
    fn test_redemption_capped_at_order_value() {
        let mut customer = CustomerRecord::restore("Ana", Category::Staff, money("10.00")).unwrap();
        let result = settle(&mut customer, &leite().with_redemption(true));

        assert_eq!(result.cashback_redeemed, money("3.35"));
        assert_eq!(result.final_amount, Money::ZERO);
        assert_eq!(result.cashback_earned, money("0.335"));
        assert_eq!(result.balance, money("10.00") - money("3.35") + money("0.335"));
    }

    #[test]
    fn test_redemption_capped_at_balance() {
        let mut customer =
            CustomerRecord::restore("Ana", Category::Community, money("1.20")).unwrap();
        let result = settle(&mut customer, &leite().with_redemption(true));

        assert_eq!(result.cashback_redeemed, money("1.20"));
        assert_eq!(result.final_amount, money("3.15"));
        assert_eq!(result.balance, money("0.435"));
    }

    #[test]
    fn test_no_redemption_unless_requested() {
        let mut customer =
            CustomerRecord::restore("Ana", Category::Community, money("5.00")).unwrap();
        let result = settle(&mut customer, &leite());

        assert_eq!(result.cashback_redeemed, Money::ZERO);
        assert_eq!(result.final_amount, money("4.35"));
        assert_eq!(result.balance, money("5.435"));
    }

    #[test]
    fn test_redemption_with_zero_balance_is_noop() {
        let mut customer = CustomerRecord::new("Ana", Category::Student);
        let result = settle(&mut customer, &leite().with_redemption(true));

        assert_eq!(result.cashback_redeemed, Money::ZERO);
        assert_eq!(result.final_amount, result.net);
    }

    #[test]
    fn test_final_identity_holds_for_every_category() {
        let order = OrderRequest::new("Ana", Base::Maracuja, vec![AddOn::Geleia, AddOn::Chia])
            .with_redemption(true);

        for category in Category::ALL {
            let mut customer = CustomerRecord::restore("Ana", category, money("2.00")).unwrap();
            let result = settle(&mut customer, &order);
            assert_eq!(
                result.final_amount,
                result.gross - result.discount - result.cashback_redeemed
            );
            assert!(!result.final_amount.is_negative());
        }
    }

    #[test]
    fn test_balance_never_negative_over_many_orders() {
        let mut customer = CustomerRecord::new("Ana", Category::Student);
        for (i, base) in Base::ALL.iter().cycle().take(40).enumerate() {
            let add_ons: Vec<AddOn> = AddOn::ALL.iter().copied().take(i % 6).collect();
            let order = OrderRequest::new("Ana", *base, add_ons).with_redemption(i % 3 == 0);
            let result = settle(&mut customer, &order);
            assert!(!result.balance.is_negative());
            assert!(!result.final_amount.is_negative());
        }
    }
}
