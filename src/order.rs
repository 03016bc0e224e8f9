//! Order models for CSV intake and internal representation.

use crate::catalog::{AddOn, Base};
use crate::customer::Category;
use crate::error::{Result, ShopError};
use crate::money::Money;
use serde::Deserialize;
use std::str::FromStr;

/// Separator between add-ons inside the `add_ons` column.
pub const ADD_ON_SEPARATOR: char = ';';

/// Raw order record as read from CSV.
///
/// Every column is kept as text so that validation errors can be reported
/// per row instead of aborting the whole batch.
#[derive(Debug, Deserialize)]
pub struct OrderRecord {
    /// Customer name as typed at the counter
    pub customer: String,

    /// Category for a first-time customer (ignored for known customers)
    pub category: Option<String>,

    /// Base identifier
    pub base: String,

    /// `;`-separated add-on identifiers, possibly empty
    pub add_ons: Option<String>,

    /// Whether the customer wants to spend their cashback
    pub redeem: Option<String>,
}

impl OrderRecord {
    /// Parses the raw CSV record into a typed order.
    ///
    /// `row` is the 1-indexed line number, used in `InvalidRecord` errors.
    pub fn parse(&self, row: usize) -> Result<ParsedOrder> {
        let customer = normalize_name(&self.customer);
        if customer.is_empty() {
            return Err(invalid(row, "customer name is empty".to_string()));
        }

        let category = match non_empty(&self.category) {
            Some(raw) => Some(Category::from_str(raw)?),
            None => None,
        };

        let base = Base::from_str(&self.base)?;

        let add_ons = match non_empty(&self.add_ons) {
            Some(raw) => raw
                .split(ADD_ON_SEPARATOR)
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(AddOn::from_str)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let redeem_cashback = match non_empty(&self.redeem) {
            Some(raw) => parse_flag(raw, row)?,
            None => false,
        };

        Ok(ParsedOrder {
            category,
            request: OrderRequest {
                customer,
                base,
                add_ons,
                redeem_cashback,
            },
        })
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_flag(raw: &str, row: usize) -> Result<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "s" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        other => Err(invalid(row, format!("unrecognized redeem flag '{}'", other))),
    }
}

fn invalid(row: usize, message: String) -> ShopError {
    ShopError::InvalidRecord { row, message }
}

/// Trims a customer name and title-cases it: a letter is uppercased after
/// any uncased character and lowercased after a cased one, so "ANA maria"
/// and "ana-maria" become "Ana Maria" and "Ana-Maria". Internal spacing is
/// kept as typed.
pub fn normalize_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());
    let mut after_cased = false;
    for c in raw.trim().chars() {
        if after_cased {
            name.extend(c.to_lowercase());
        } else {
            name.extend(c.to_uppercase());
        }
        after_cased = c.is_lowercase() || c.is_uppercase();
    }
    name
}

/// A validated CSV order ready for settlement.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedOrder {
    /// Category to register a new customer with, if one was given
    pub category: Option<Category>,

    /// The order itself
    pub request: OrderRequest,
}

/// One drink order. Transient, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Ledger key of the ordering customer
    pub customer: String,

    /// Chosen base
    pub base: Base,

    /// Chosen add-ons in the order they were picked; duplicates allowed
    pub add_ons: Vec<AddOn>,

    /// Spend available cashback against this order
    pub redeem_cashback: bool,
}

impl OrderRequest {
    /// Creates an order without cashback redemption.
    pub fn new(customer: impl Into<String>, base: Base, add_ons: Vec<AddOn>) -> Self {
        OrderRequest {
            customer: customer.into(),
            base,
            add_ons,
            redeem_cashback: false,
        }
    }

    /// Builds an order from catalog identifiers.
    ///
    /// Fails with `UnknownItem` if any identifier is not on the menu.
    pub fn from_ids(customer: impl Into<String>, base: &str, add_ons: &[&str]) -> Result<Self> {
        let base = Base::from_str(base)?;
        let add_ons = add_ons
            .iter()
            .map(|id| AddOn::from_str(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(OrderRequest::new(customer, base, add_ons))
    }

    /// Sets whether cashback should be redeemed.
    pub fn with_redemption(mut self, redeem: bool) -> Self {
        self.redeem_cashback = redeem;
        self
    }
}

/// Outcome of settling one order.
///
/// # Invariants
///
/// - `final_amount == gross - discount - cashback_redeemed`
/// - `final_amount >= 0`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderResult {
    /// Base plus add-ons, before any discount
    pub gross: Money,

    /// Category discount
    pub discount: Money,

    /// `gross - discount`; cashback is earned on this amount
    pub net: Money,

    /// Cashback spent on this order
    pub cashback_redeemed: Money,

    /// Amount the customer pays
    pub final_amount: Money,

    /// Cashback credited by this order
    pub cashback_earned: Money,

    /// Customer cashback balance after settlement
    pub balance: Money,
}
