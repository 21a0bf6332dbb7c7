//! Purchase lot domain models.

use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{LOT_DECIMAL_PLACES, LOT_MAX_INTEGER_DIGITS, LOT_NOTES_MAX_LEN};
use crate::errors::{Error, Result};

/// A single purchase of shares of a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    pub id: i32,
    pub ticker_id: i32,
    pub ticker_symbol: String,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_date: NaiveDate,
    pub notes: String,
    pub created_at: NaiveDateTime,
}

/// Input model for recording a purchase lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchaseLot {
    pub ticker_id: i32,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

/// Input model for updating an existing lot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLotUpdate {
    #[serde(default)]
    pub id: i32,
    pub ticker_id: i32,
    pub quantity: Decimal,
    pub price: Decimal,
    pub trade_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl NewPurchaseLot {
    /// Validates and rounds the lot in place.
    pub fn validate(mut self) -> Result<Self> {
        let (quantity, price, notes) = validate_lot_fields(self.quantity, self.price, &self.notes)?;
        self.quantity = quantity;
        self.price = price;
        self.notes = notes;
        Ok(self)
    }
}

impl PurchaseLotUpdate {
    /// Validates and rounds the update in place.
    pub fn validate(mut self) -> Result<Self> {
        let (quantity, price, notes) = validate_lot_fields(self.quantity, self.price, &self.notes)?;
        self.quantity = quantity;
        self.price = price;
        self.notes = notes;
        Ok(self)
    }
}

fn validate_lot_fields(
    quantity: Decimal,
    price: Decimal,
    notes: &str,
) -> Result<(Decimal, Decimal, String)> {
    let quantity = quantity.round_dp(LOT_DECIMAL_PLACES);
    if quantity <= Decimal::ZERO {
        return Err(Error::field("quantity", "Quantity must be greater than zero"));
    }
    check_integer_digits("quantity", quantity)?;
    let price = price.round_dp(LOT_DECIMAL_PLACES);
    if price < Decimal::ZERO {
        return Err(Error::field("price", "Price must be zero or greater"));
    }
    check_integer_digits("price", price)?;
    let notes = notes.trim().to_string();
    if notes.chars().count() > LOT_NOTES_MAX_LEN {
        return Err(Error::field(
            "notes",
            format!("Notes must be at most {} characters", LOT_NOTES_MAX_LEN),
        ));
    }
    Ok((quantity.normalize(), price.normalize(), notes))
}

fn check_integer_digits(field: &str, value: Decimal) -> Result<()> {
    let limit = Decimal::from_i128_with_scale(10_i128.pow(LOT_MAX_INTEGER_DIGITS), 0);
    if value.abs() >= limit {
        return Err(Error::field(
            field,
            format!(
                "Ensure that there are no more than {} digits before the decimal point",
                LOT_MAX_INTEGER_DIGITS
            ),
        ));
    }
    Ok(())
}

/// Aggregated holding built from a ticker's lots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    /// `cost_basis / quantity`; `None` when quantity is zero.
    pub average_cost: Option<Decimal>,
}

impl Position {
    /// Sums quantity and `quantity * price` over the lots.
    ///
    /// Returns `None` for an empty iterator, or when the totals do not fit
    /// in a `Decimal`.
    pub fn from_lots<'a, I>(lots: I) -> Option<Position>
    where
        I: IntoIterator<Item = &'a PurchaseLot>,
    {
        let mut seen = false;
        let mut quantity = Decimal::ZERO;
        let mut cost_basis = Decimal::ZERO;
        for lot in lots {
            seen = true;
            let totals = lot.quantity.checked_mul(lot.price).and_then(|cost| {
                Some((
                    quantity.checked_add(lot.quantity)?,
                    cost_basis.checked_add(cost)?,
                ))
            });
            match totals {
                Some((q, c)) => {
                    quantity = q;
                    cost_basis = c;
                }
                None => {
                    warn!(
                        "Position for {} overflows at lot {}; skipping aggregate",
                        lot.ticker_symbol, lot.id
                    );
                    return None;
                }
            }
        }
        if !seen {
            return None;
        }
        let average_cost = if quantity.is_zero() {
            None
        } else {
            cost_basis.checked_div(quantity)
        };
        Some(Position {
            quantity,
            cost_basis,
            average_cost,
        })
    }
}
