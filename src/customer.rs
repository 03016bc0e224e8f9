//! Customer model.
//!
//! Maintains the invariant: `cashback_balance >= 0` after every settlement.

use crate::error::{Result, ShopError};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Customer tier that selects the discount policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Proportional 25% discount.
    Student,
    /// Flat R$1.00 discount.
    Staff,
    /// No discount.
    #[default]
    Community,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 3] = [Category::Student, Category::Staff, Category::Community];

    /// Spelling used in storage and CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Student => "student",
            Category::Staff => "staff",
            Category::Community => "community",
        }
    }
}

impl FromStr for Category {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Category::Student),
            "staff" => Ok(Category::Staff),
            "community" => Ok(Category::Community),
            _ => Err(ShopError::InvalidCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered customer and their loyalty balance.
///
/// # Invariants
///
/// - `name` never changes after creation; it is also the ledger key
/// - `cashback_balance` is never negative and is only changed by order
///   settlement
/// - The balance is stored exactly; it is never rounded to centavos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    name: String,
    category: Category,
    cashback_balance: Money,
}

impl CustomerRecord {
    /// Creates a new customer with a zero cashback balance.
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        CustomerRecord {
            name: name.into(),
            category,
            cashback_balance: Money::ZERO,
        }
    }

    /// Rebuilds a customer from stored state.
    ///
    /// Fails with `CorruptStorage` if the stored balance is negative.
    pub fn restore(name: impl Into<String>, category: Category, balance: Money) -> Result<Self> {
        let name = name.into();
        if balance.is_negative() {
            return Err(ShopError::CorruptStorage(format!(
                "negative cashback balance {} for {}",
                balance.amount(),
                name
            )));
        }
        Ok(CustomerRecord {
            name,
            category,
            cashback_balance: balance,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn cashback_balance(&self) -> Money {
        self.cashback_balance
    }

    /// Applies one order's cashback movement: `balance - redeemed + earned`.
    ///
    /// `redeemed` must not exceed the current balance.
    pub(crate) fn settle_cashback(&mut self, redeemed: Money, earned: Money) {
        debug_assert!(redeemed <= self.cashback_balance);
        self.cashback_balance -= redeemed;
        self.cashback_balance += earned;
    }

    /// Verifies the invariant: `cashback_balance >= 0`.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        !self.cashback_balance.is_negative()
    }
}
