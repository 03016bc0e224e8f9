//! Menu price tables.
//!
//! Bases and add-ons are closed enums so the engine can only ever price
//! catalog items; string identifiers coming from intake are resolved through
//! `FromStr`, which is where `UnknownItem` originates.

use crate::error::{Result, ShopError};
use crate::money::Money;
use std::fmt;
use std::str::FromStr;

/// Primary drink flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Base {
    Leite,
    Maracuja,
    Rosa,
    Manga,
}

impl Base {
    /// All bases in menu order.
    pub const ALL: [Base; 4] = [Base::Leite, Base::Maracuja, Base::Rosa, Base::Manga];

    /// Menu spelling.
    pub fn name(&self) -> &'static str {
        match self {
            Base::Leite => "Leite",
            Base::Maracuja => "Maracujá",
            Base::Rosa => "Rosa",
            Base::Manga => "Manga",
        }
    }

    /// Menu price.
    pub fn price(&self) -> Money {
        match self {
            Base::Leite => Money::from_cents(435),
            Base::Maracuja => Money::from_cents(460),
            Base::Rosa => Money::from_cents(585),
            Base::Manga => Money::from_cents(547),
        }
    }
}

impl FromStr for Base {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "leite" => Ok(Base::Leite),
            "maracujá" | "maracuja" => Ok(Base::Maracuja),
            "rosa" => Ok(Base::Rosa),
            "manga" => Ok(Base::Manga),
            _ => Err(ShopError::UnknownItem {
                kind: "base",
                id: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Optional topping, priced on top of the base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddOn {
    Boba,
    Lichia,
    Geleia,
    Taro,
    Chia,
}

impl AddOn {
    /// All add-ons in menu order.
    pub const ALL: [AddOn; 5] = [
        AddOn::Boba,
        AddOn::Lichia,
        AddOn::Geleia,
        AddOn::Taro,
        AddOn::Chia,
    ];

    /// Menu spelling.
    pub fn name(&self) -> &'static str {
        match self {
            AddOn::Boba => "Boba",
            AddOn::Lichia => "Lichia",
            AddOn::Geleia => "Geleia",
            AddOn::Taro => "Taro",
            AddOn::Chia => "Chia",
        }
    }

    /// Menu price.
    pub fn price(&self) -> Money {
        match self {
            AddOn::Boba => Money::from_cents(50),
            AddOn::Lichia => Money::from_cents(75),
            AddOn::Geleia => Money::from_cents(65),
            AddOn::Taro => Money::from_cents(100),
            AddOn::Chia => Money::from_cents(35),
        }
    }
}

impl FromStr for AddOn {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "boba" => Ok(AddOn::Boba),
            "lichia" => Ok(AddOn::Lichia),
            "geleia" => Ok(AddOn::Geleia),
            "taro" => Ok(AddOn::Taro),
            "chia" => Ok(AddOn::Chia),
            _ => Err(ShopError::UnknownItem {
                kind: "add-on",
                id: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AddOn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Looks up a base price by identifier.
pub fn price_of_base(id: &str) -> Result<Money> {
    Base::from_str(id).map(|base| base.price())
}

/// Looks up an add-on price by identifier.
pub fn price_of_add_on(id: &str) -> Result<Money> {
    AddOn::from_str(id).map(|add_on| add_on.price())
}
