use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::format_description::FormatItem;
use time::macros::format_description;

/// Wire and CSV rendering of transaction dates.
pub static DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Returned by `FromStr` for any of the fixed enumerations below.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized value")]
pub struct UnknownVariant;

macro_rules! impl_str_conv {
    ($name:ident, $(($variant:ident, $text:literal)),+ $(,)?) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Comma-separated list of accepted values, for validation messages.
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
pub enum AccountType {
    Savings,
    Credit,
    Wallet,
    Cash,
}

impl_str_conv!(
    AccountType,
    (Savings, "Savings"),
    (Credit, "Credit"),
    (Wallet, "Wallet"),
    (Cash, "Cash"),
);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Inr,
    Cad,
    Aud,
}

impl_str_conv!(
    Currency,
    (Usd, "USD"),
    (Eur, "EUR"),
    (Gbp, "GBP"),
    (Inr, "INR"),
    (Cad, "CAD"),
    (Aud, "AUD"),
);

/// Whether a transaction adds to or subtracts from an account balance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl_str_conv!(TransactionType, (Income, "income"), (Expense, "expense"));

/// The single category list shared by income and expense transactions.
/// Membership is enforced at the boundary and by the schema, but which
/// categories suit which transaction type is left to the client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
)]
pub enum Category {
    Food,
    Travel,
    Rent,
    Shopping,
    Entertainment,
    Healthcare,
    Education,
    Utilities,
    Transport,
    Bills,
    Salary,
    Freelance,
    Investment,
    Business,
    Gift,
    Other,
}

impl_str_conv!(
    Category,
    (Food, "Food"),
    (Travel, "Travel"),
    (Rent, "Rent"),
    (Shopping, "Shopping"),
    (Entertainment, "Entertainment"),
    (Healthcare, "Healthcare"),
    (Education, "Education"),
    (Utilities, "Utilities"),
    (Transport, "Transport"),
    (Bills, "Bills"),
    (Salary, "Salary"),
    (Freelance, "Freelance"),
    (Investment, "Investment"),
    (Business, "Business"),
    (Gift, "Gift"),
    (Other, "Other"),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_round_trips() {
        for account_type in AccountType::ALL {
            assert_eq!(account_type.as_str().parse(), Ok(*account_type));
        }
        for currency in Currency::ALL {
            assert_eq!(currency.as_str().parse(), Ok(*currency));
        }
        for kind in TransactionType::ALL {
            assert_eq!(kind.as_str().parse(), Ok(*kind));
        }
        for category in Category::ALL {
            assert_eq!(category.as_str().parse(), Ok(*category));
        }
    }

    #[test]
    fn rejects_unknown_and_wrong_case() {
        assert_eq!("Checking".parse::<AccountType>(), Err(UnknownVariant));
        assert_eq!("usd".parse::<Currency>(), Err(UnknownVariant));
        assert_eq!("Income".parse::<TransactionType>(), Err(UnknownVariant));
        assert_eq!("food".parse::<Category>(), Err(UnknownVariant));
    }

    #[test]
    fn serde_matches_wire_values() {
        assert_eq!(serde_json::to_string(&AccountType::Savings).unwrap(), "\"Savings\"");
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        assert_eq!(serde_json::to_string(&TransactionType::Income).unwrap(), "\"income\"");
        assert_eq!(serde_json::to_string(&Category::Food).unwrap(), "\"Food\"");

        let kind: TransactionType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(kind, TransactionType::Expense);
    }

    #[test]
    fn expected_lists_every_value() {
        assert_eq!(AccountType::expected(), "Savings, Credit, Wallet, Cash");
        assert_eq!(TransactionType::expected(), "income, expense");
        assert_eq!(Category::ALL.len(), 16);
    }
}
