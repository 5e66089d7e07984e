//! Quote totals for the print view's data layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One quoted position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub product_id: String,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl QuoteLine {
    /// Quantity times unit price, rounded to cents.
    pub fn line_total(&self) -> Decimal {
        (self.quantity * self.unit_price).round_dp(2)
    }
}

/// Quote data as handed to the print view; rendering happens elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub customer_name: String,
    pub lines: Vec<QuoteLine>,
    pub discount_percent: Decimal,
}

impl Quote {
    /// Sum of the line totals.
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(QuoteLine::line_total)
            .sum::<Decimal>()
            .round_dp(2)
    }

    /// Subtotal minus the percentage discount, rounded to cents.
    pub fn total(&self) -> Decimal {
        let subtotal = self.subtotal();
        let discount = (subtotal * self.discount_percent / Decimal::ONE_HUNDRED).round_dp(2);
        (subtotal - discount).round_dp(2)
    }
}
