//! Exact decimal JSON numbers.
//!
//! Fees and amounts are signed over their JSON text, so they must not
//! pass through `f64`. This module is a `#[serde(with = ...)]` adapter
//! that writes a [`Decimal`] as a normalized JSON number literal
//! (`0.01`, `1000`, `-2.5`) and reads one back without rounding.
//!
//! Only `serde_json` is supported: the literal travels as a raw JSON
//! value.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;

/// Formats a decimal as its canonical JSON literal.
///
/// Trailing fractional zeros are dropped, so `1.50` and `1.5` share
/// one encoding and integral values carry no decimal point.
pub fn to_literal(value: &Decimal) -> String {
    value.normalize().to_string()
}

/// Parses a JSON number literal into an exact decimal.
///
/// Accepts plain (`12.34`) and exponent (`1.5e3`) notation.
pub fn parse_literal(literal: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = literal.trim();
    Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))
}

/// Serializes a [`Decimal`] as a bare JSON number.
pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    let raw = RawValue::from_string(to_literal(value)).map_err(S::Error::custom)?;
    raw.serialize(serializer)
}

/// Deserializes a [`Decimal`] from a bare JSON number.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let raw: Box<RawValue> = Deserialize::deserialize(deserializer)?;
    parse_literal(raw.get()).map_err(|e| D::Error::custom(format!("invalid decimal literal: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Fee {
        #[serde(with = "crate::decimal")]
        amount: Decimal,
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap_or_default()
    }

    #[test]
    fn literal_is_normalized() {
        assert_eq!(to_literal(&dec("0.010")), "0.01");
        assert_eq!(to_literal(&dec("1000")), "1000");
        assert_eq!(to_literal(&dec("1000.00")), "1000");
        assert_eq!(to_literal(&dec("-2.50")), "-2.5");
    }

    #[test]
    fn serializes_without_float_drift() -> std::result::Result<(), serde_json::Error> {
        let json = serde_json::to_string(&Fee { amount: dec("0.1") })?;
        assert_eq!(json, r#"{"amount":0.1}"#);

        let json = serde_json::to_string(&Fee { amount: dec("100000") })?;
        assert_eq!(json, r#"{"amount":100000}"#);
        Ok(())
    }

    #[test]
    fn parses_back_exactly() -> std::result::Result<(), serde_json::Error> {
        let fee: Fee = serde_json::from_str(r#"{"amount":0.30000000000000004}"#)?;
        assert_eq!(fee.amount, dec("0.30000000000000004"));

        let fee: Fee = serde_json::from_str(r#"{"amount":1.5e3}"#)?;
        assert_eq!(fee.amount, dec("1500"));
        Ok(())
    }

    #[test]
    fn rejects_non_numbers() {
        let result: std::result::Result<Fee, _> = serde_json::from_str(r#"{"amount":"abc"}"#);
        assert!(result.is_err());
    }
}
