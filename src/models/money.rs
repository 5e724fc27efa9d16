use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CURRENCY: &str = "JPY";

/// An amount together with its ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "MoneyRepr")]
pub struct Money {
    amount: BigDecimal,
    currency_code: String,
}

/// Wire shape before the currency is normalized.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyRepr {
    amount: BigDecimal,
    currency_code: Option<String>,
}

impl TryFrom<MoneyRepr> for Money {
    type Error = String;

    fn try_from(repr: MoneyRepr) -> Result<Self, Self::Error> {
        Money::try_new(repr.amount, repr.currency_code.as_deref())
    }
}

impl Money {
    pub fn new(amount: BigDecimal, currency_code: Option<&str>) -> Self {
        let currency_code = currency_code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_ascii_uppercase();
        Self { amount, currency_code }
    }

    /// Like [`Money::new`] but rejects anything that is not three ASCII letters.
    pub fn try_new(amount: BigDecimal, currency_code: Option<&str>) -> Result<Self, String> {
        let money = Self::new(amount, currency_code);
        let code = money.currency_code.as_str();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(format!("invalid currency code '{}'", code));
        }
        Ok(money)
    }

    pub fn jpy(amount: BigDecimal) -> Self {
        Self::new(amount, None)
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_defaults_to_jpy() {
        let m = Money::new(BigDecimal::from(1000), None);
        assert_eq!(m.currency_code(), "JPY");
        assert_eq!(Money::new(BigDecimal::from(1), Some(" ")).currency_code(), "JPY");
        assert_eq!(Money::new(BigDecimal::from(1), Some("usd")).currency_code(), "USD");
    }

    #[test]
    fn deserializes_without_currency() {
        let m: Money = serde_json::from_str(r#"{"amount": 250000}"#).unwrap();
        assert_eq!(m, Money::jpy(BigDecimal::from(250000)));
    }

    #[test]
    fn deserialized_currency_is_normalized() {
        let blank: Money = serde_json::from_str(r#"{"amount": 1, "currencyCode": ""}"#).unwrap();
        assert_eq!(blank.currency_code(), "JPY");
        let lower: Money = serde_json::from_str(r#"{"amount": 1, "currencyCode": "usd"}"#).unwrap();
        assert_eq!(lower.currency_code(), "USD");
    }

    #[test]
    fn malformed_currency_is_rejected() {
        assert!(serde_json::from_str::<Money>(r#"{"amount": 1, "currencyCode": "YEN1"}"#).is_err());
        assert!(serde_json::from_str::<Money>(r#"{"amount": 1, "currencyCode": "円"}"#).is_err());
        assert!(Money::try_new(BigDecimal::from(1), Some("eu")).is_err());
    }
}
