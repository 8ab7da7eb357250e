use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::model::{Category, TransactionType};
use crate::transactions::repo::{NewTransaction, TransactionFilter, TransactionWithBank};
use crate::validation::{parse_date, Validator};

pub const MAX_DESCRIPTION_LEN: usize = 200;
const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub bank_id: Option<String>,
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl TransactionPayload {
    pub fn validate(&self) -> Result<NewTransaction, ApiError> {
        let mut validator = Validator::new();

        let bank_id = match self.bank_id.as_deref() {
            Some(raw) => raw.parse::<Uuid>().ok(),
            None => None,
        };
        if bank_id.is_none() {
            validator.error("bankId", "Bank ID is required");
        }

        let amount = self.amount.unwrap_or_default();
        if amount <= 0.0 {
            validator.error("amount", "Amount must be positive");
        }

        let transaction_type = match self.transaction_type.as_deref() {
            Some(raw) => raw.parse::<TransactionType>().ok(),
            None => None,
        };
        if transaction_type.is_none() {
            validator.error(
                "type",
                format!("Type must be one of: {}", TransactionType::expected()),
            );
        }

        let category = match self.category.as_deref() {
            Some(raw) => raw.parse::<Category>().ok(),
            None => None,
        };
        if category.is_none() {
            validator.error(
                "category",
                format!("Category must be one of: {}", Category::expected()),
            );
        }

        let date = self.date.as_deref().and_then(parse_date);
        if date.is_none() {
            validator.error("date", "Transaction date must be a valid YYYY-MM-DD date");
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if description.is_empty() {
            validator.error("description", "Description is required");
        } else if description.chars().count() > MAX_DESCRIPTION_LEN {
            validator.error(
                "description",
                format!("Description cannot exceed {MAX_DESCRIPTION_LEN} characters"),
            );
        }

        validator.finish()?;
        Ok(NewTransaction {
            bank_id: bank_id.expect("validated"),
            amount,
            transaction_type: transaction_type.expect("validated"),
            category: category.expect("validated"),
            date: date.expect("validated"),
            description: description.to_string(),
        })
    }
}

/// Raw query string of `GET /transactions`; everything arrives as text and
/// is validated into a [`TransactionFilter`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub bank_id: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn validate(&self) -> Result<TransactionFilter, ApiError> {
        let mut validator = Validator::new();
        let mut filter = TransactionFilter {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            ..TransactionFilter::default()
        };

        if let Some(raw) = self.bank_id.as_deref() {
            match raw.parse::<Uuid>() {
                Ok(bank_id) => filter.bank_id = Some(bank_id),
                Err(_) => validator.error("bankId", "Bank ID must be a valid id"),
            }
        }
        if let Some(raw) = self.transaction_type.as_deref() {
            match raw.parse::<TransactionType>() {
                Ok(transaction_type) => filter.transaction_type = Some(transaction_type),
                Err(_) => validator.error(
                    "type",
                    format!("Type must be one of: {}", TransactionType::expected()),
                ),
            }
        }
        if let Some(raw) = self.category.as_deref() {
            match raw.parse::<Category>() {
                Ok(category) => filter.category = Some(category),
                Err(_) => validator.error(
                    "category",
                    format!("Category must be one of: {}", Category::expected()),
                ),
            }
        }
        if let Some(raw) = self.date_from.as_deref() {
            match parse_date(raw) {
                Some(date) => filter.date_from = Some(date),
                None => validator.error("dateFrom", "dateFrom must be a valid YYYY-MM-DD date"),
            }
        }
        if let Some(raw) = self.date_to.as_deref() {
            match parse_date(raw) {
                Some(date) => filter.date_to = Some(date),
                None => validator.error("dateTo", "dateTo must be a valid YYYY-MM-DD date"),
            }
        }
        if let Some(search) = self.search.as_deref() {
            if !search.is_empty() {
                filter.search = Some(search.to_string());
            }
        }

        if let Some(raw) = self.page.as_deref() {
            match raw.parse::<i64>() {
                Ok(page) if page >= 1 => filter.page = page,
                _ => validator.error("page", "Page must be a positive integer"),
            }
        }
        if let Some(raw) = self.limit.as_deref() {
            match raw.parse::<i64>() {
                Ok(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => filter.limit = limit,
                _ => validator.error(
                    "limit",
                    format!("Limit must be between 1 and {MAX_PAGE_SIZE}"),
                ),
            }
        }

        validator.finish()?;
        Ok(filter)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MonthlyQuery {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl MonthlyQuery {
    /// Calendar month and year; months are 1–12.
    pub fn validate(&self) -> Result<(u8, i32), ApiError> {
        let mut validator = Validator::new();

        let month = match self.month.as_deref().map(str::parse::<u8>) {
            Some(Ok(month)) if (1..=12).contains(&month) => Some(month),
            _ => {
                validator.error("month", "Month must be an integer between 1 and 12");
                None
            }
        };
        let year = match self.year.as_deref().map(str::parse::<i32>) {
            Some(Ok(year)) if (1970..=9999).contains(&year) => Some(year),
            _ => {
                validator.error("year", "Year must be an integer between 1970 and 9999");
                None
            }
        };

        validator.finish()?;
        Ok((month.expect("validated"), year.expect("validated")))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListResponse {
    pub transactions: Vec<TransactionWithBank>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub transaction: crate::transactions::repo::Transaction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn fields(err: ApiError) -> Vec<&'static str> {
        match err {
            ApiError::Validation(details) => details.into_iter().map(|d| d.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn valid_payload() -> TransactionPayload {
        TransactionPayload {
            bank_id: Some(Uuid::new_v4().to_string()),
            amount: Some(49.99),
            transaction_type: Some("expense".into()),
            category: Some("Food".into()),
            date: Some("2025-03-14".into()),
            description: Some("Groceries".into()),
        }
    }

    #[test]
    fn accepts_a_valid_payload() {
        let new_transaction = valid_payload().validate().unwrap();
        assert_eq!(new_transaction.amount, 49.99);
        assert_eq!(new_transaction.transaction_type, TransactionType::Expense);
        assert_eq!(new_transaction.category, Category::Food);
        assert_eq!(new_transaction.date, date!(2025 - 03 - 14));
    }

    #[test]
    fn negative_amount_cites_the_amount_field() {
        let mut payload = valid_payload();
        payload.amount = Some(-5.0);
        assert_eq!(fields(payload.validate().unwrap_err()), vec!["amount"]);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut payload = valid_payload();
        payload.amount = Some(0.0);
        assert_eq!(fields(payload.validate().unwrap_err()), vec!["amount"]);
    }

    #[test]
    fn overlong_description_is_rejected() {
        let mut payload = valid_payload();
        payload.description = Some("x".repeat(MAX_DESCRIPTION_LEN + 1));
        assert_eq!(fields(payload.validate().unwrap_err()), vec!["description"]);

        payload.description = Some("x".repeat(MAX_DESCRIPTION_LEN));
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn unknown_enum_values_cite_their_fields() {
        let mut payload = valid_payload();
        payload.transaction_type = Some("transfer".into());
        payload.category = Some("Groceries".into());
        assert_eq!(
            fields(payload.validate().unwrap_err()),
            vec!["type", "category"]
        );
    }

    #[test]
    fn malformed_date_is_rejected() {
        let mut payload = valid_payload();
        payload.date = Some("14/03/2025".into());
        assert_eq!(fields(payload.validate().unwrap_err()), vec!["date"]);
    }

    #[test]
    fn empty_list_query_uses_defaults() {
        let filter = ListQuery::default().validate().unwrap();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, DEFAULT_PAGE_SIZE);
        assert!(filter.bank_id.is_none());
        assert!(filter.search.is_none());
    }

    #[test]
    fn list_query_validates_each_parameter() {
        let query = ListQuery {
            bank_id: Some("not-a-uuid".into()),
            category: Some("Nope".into()),
            transaction_type: Some("both".into()),
            date_from: Some("yesterday".into()),
            date_to: None,
            search: None,
            page: Some("0".into()),
            limit: Some("1000".into()),
        };
        assert_eq!(
            fields(query.validate().unwrap_err()),
            vec!["bankId", "type", "category", "dateFrom", "page", "limit"]
        );
    }

    #[test]
    fn monthly_query_accepts_calendar_months() {
        let query = MonthlyQuery {
            month: Some("2".into()),
            year: Some("2025".into()),
        };
        assert_eq!(query.validate().unwrap(), (2, 2025));
    }

    #[test]
    fn monthly_query_rejects_out_of_range_values() {
        let query = MonthlyQuery {
            month: Some("0".into()),
            year: Some("2025".into()),
        };
        assert_eq!(fields(query.validate().unwrap_err()), vec!["month"]);

        let query = MonthlyQuery {
            month: Some("13".into()),
            year: Some("12345".into()),
        };
        assert_eq!(fields(query.validate().unwrap_err()), vec!["month", "year"]);

        let query = MonthlyQuery::default();
        assert_eq!(fields(query.validate().unwrap_err()), vec!["month", "year"]);
    }
}
