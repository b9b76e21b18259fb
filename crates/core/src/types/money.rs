//! Monetary amounts using decimal arithmetic.
//!
//! The order service reports `totalAmount` either as a decimal string
//! (`"10.00"`) or as a JSON number (`10.5`). [`Amount`] accepts both and keeps
//! the original text so a malformed value can be reported without failing the
//! whole order page.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An order amount as reported by the order service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    raw: String,
    value: Option<Decimal>,
}

impl Amount {
    /// Create an amount from its textual form.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok();
        Self {
            raw: raw.to_owned(),
            value,
        }
    }

    /// The decimal value, or `None` if the service sent something unparseable.
    #[must_use]
    pub const fn value(&self) -> Option<Decimal> {
        self.value
    }

    /// The amount exactly as the service sent it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self {
            raw: value.to_string(),
            value: Some(value),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(s) => Self::parse(&s),
            RawAmount::Number(n) => Self::parse(&n.to_string()),
        })
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

/// Format an amount with two decimal places (e.g., `15.50`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", amount.round_dp(2))
}
