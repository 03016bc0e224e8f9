//! # Bubble Tea POS
//!
//! Pricing and cashback core for a small bubble tea shop: a fixed menu,
//! tiered customer discounts, and a loyalty balance kept in a JSON ledger
//! between runs.
//!
//! ## Design Principles
//!
//! - **Exact money**: amounts are `rust_decimal` values that are never
//!   rounded internally; only display rounds to 2 decimal places
//! - **Closed domain types**: bases, add-ons and customer categories are
//!   enums, and the discount policy is an exhaustive match
//! - **Explicit state**: a `Shop` owns its `Ledger`; every order is settled
//!   and persisted before the next one
//! - **Forgiving storage**: a missing or malformed ledger file yields an empty
//!   ledger, reported through `LoadOutcome`
//!
//! ## Example
//!
//! ```no_run
//! use bubble_tea_pos::{Base, Category, OrderRequest, Shop};
//!
//! let mut shop = Shop::open("customers.json").unwrap();
//! shop.resolve_or_create_customer("Ana", Some(Category::Student));
//! let order = OrderRequest::new("Ana", Base::Leite, Vec::new());
//! let receipt = shop.submit_order(&order).unwrap();
//! println!("{}", receipt);
//! ```

pub mod catalog;
pub mod customer;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod order;
pub mod receipt;
pub mod shop;

pub use catalog::{price_of_add_on, price_of_base, AddOn, Base};
pub use customer::{Category, CustomerRecord};
pub use error::{Result, ShopError};
pub use ledger::{Ledger, LoadOutcome, DEFAULT_LEDGER_FILE};
pub use money::Money;
pub use order::{OrderRecord, OrderRequest, OrderResult, ParsedOrder};
pub use receipt::{Receipt, ReceiptWriter, RECEIPT_HEADER};
pub use shop::Shop;
