use serde::{Deserialize, Serialize};

use crate::banks::repo::{Bank, NewBank};
use crate::error::ApiError;
use crate::model::{AccountType, Currency};
use crate::transactions::analytics::AccountTotals;
use crate::validation::Validator;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankPayload {
    pub bank_name: Option<String>,
    pub account_type: Option<String>,
    pub initial_balance: Option<f64>,
    pub currency: Option<String>,
}

impl BankPayload {
    pub fn validate(&self) -> Result<NewBank, ApiError> {
        let mut validator = Validator::new();

        let bank_name = self.bank_name.as_deref().map(str::trim).unwrap_or_default();
        if bank_name.is_empty() {
            validator.error("bankName", "Bank name is required");
        }

        let account_type = match self.account_type.as_deref() {
            Some(raw) => raw.parse::<AccountType>().ok(),
            None => None,
        };
        if account_type.is_none() {
            validator.error(
                "accountType",
                format!("Account type must be one of: {}", AccountType::expected()),
            );
        }

        let initial_balance = self.initial_balance.unwrap_or(-1.0);
        if self.initial_balance.is_none() {
            validator.missing("initialBalance");
        } else if initial_balance < 0.0 {
            validator.error("initialBalance", "Balance cannot be negative");
        }

        // Absent currency falls back to USD.
        let currency = match self.currency.as_deref() {
            Some(raw) => raw.parse::<Currency>().ok(),
            None => Some(Currency::Usd),
        };
        if currency.is_none() {
            validator.error(
                "currency",
                format!("Currency must be one of: {}", Currency::expected()),
            );
        }

        validator.finish()?;
        Ok(NewBank {
            bank_name: bank_name.to_string(),
            account_type: account_type.expect("validated"),
            initial_balance,
            currency: currency.expect("validated"),
        })
    }
}

/// A bank account annotated with the aggregator's derived fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedBank {
    #[serde(flatten)]
    pub bank: Bank,
    pub current_balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
}

impl AnnotatedBank {
    pub fn new(bank: Bank, totals: AccountTotals) -> Self {
        Self {
            bank,
            current_balance: totals.current_balance,
            total_income: totals.total_income,
            total_expense: totals.total_expense,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BankListResponse {
    pub banks: Vec<AnnotatedBank>,
}

#[derive(Debug, Serialize)]
pub struct BankResponse {
    pub bank: AnnotatedBank,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_payload() -> BankPayload {
        BankPayload {
            bank_name: Some("Everyday Checking".into()),
            account_type: Some("Savings".into()),
            initial_balance: Some(1000.0),
            currency: Some("EUR".into()),
        }
    }

    #[test]
    fn accepts_a_valid_payload() {
        let new_bank = valid_payload().validate().unwrap();
        assert_eq!(new_bank.bank_name, "Everyday Checking");
        assert_eq!(new_bank.account_type, AccountType::Savings);
        assert_eq!(new_bank.currency, Currency::Eur);
    }

    #[test]
    fn currency_defaults_to_usd() {
        let mut payload = valid_payload();
        payload.currency = None;
        assert_eq!(payload.validate().unwrap().currency, Currency::Usd);
    }

    #[test]
    fn rejects_negative_initial_balance() {
        let mut payload = valid_payload();
        payload.initial_balance = Some(-0.01);
        let ApiError::Validation(details) = payload.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].field, "initialBalance");
    }

    #[test]
    fn rejects_unknown_account_type_with_options() {
        let mut payload = valid_payload();
        payload.account_type = Some("Checking".into());
        let ApiError::Validation(details) = payload.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(details[0].field, "accountType");
        assert!(details[0].message.contains("Savings, Credit, Wallet, Cash"));
    }

    #[test]
    fn collects_failures_across_fields() {
        let payload = BankPayload {
            bank_name: Some("   ".into()),
            account_type: None,
            initial_balance: None,
            currency: Some("BTC".into()),
        };
        let ApiError::Validation(details) = payload.validate().unwrap_err() else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = details.iter().map(|d| d.field).collect();
        assert_eq!(
            fields,
            vec!["bankName", "accountType", "initialBalance", "currency"]
        );
    }
}
