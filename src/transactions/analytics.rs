//! The aggregation core: pure, single-pass folds over transaction sets.
//! Balances and breakdowns are derived on every read and never persisted,
//! so they cannot drift from the transaction log.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month};

use crate::banks::repo::Bank;
use crate::model::{Category, TransactionType};
use crate::transactions::repo::Transaction;

/// Derived totals for one bank account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountTotals {
    pub current_balance: f64,
    pub total_income: f64,
    pub total_expense: f64,
}

/// Sums the transactions referencing `bank` and derives its balance:
/// initial balance plus income minus expense. An empty set yields the
/// initial balance unchanged.
pub fn account_totals(bank: &Bank, transactions: &[Transaction]) -> AccountTotals {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;

    for transaction in transactions.iter().filter(|t| t.bank_id == bank.id) {
        match transaction.transaction_type {
            TransactionType::Income => total_income += transaction.amount,
            TransactionType::Expense => total_expense += transaction.amount,
        }
    }

    AccountTotals {
        current_balance: bank.initial_balance + total_income - total_expense,
        total_income,
        total_expense,
    }
}

/// Income and expense activity of a single day; days without activity are
/// never materialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: Date,
    pub total_income: f64,
    pub total_expense: f64,
}

/// Expense volume of one category inside the window. Income transactions
/// are excluded from the category view by design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: Category,
    pub total: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net_savings: f64,
    pub daily_breakdown: Vec<DailyActivity>,
    pub category_breakdown: Vec<CategorySpend>,
}

/// Folds a window of transactions into totals, a per-day breakdown, and a
/// per-category expense breakdown, in one pass. The caller scopes the
/// window (see [`month_bounds`]).
pub fn monthly_summary(transactions: &[Transaction]) -> MonthlySummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut days: BTreeMap<Date, (f64, f64)> = BTreeMap::new();
    let mut categories: BTreeMap<Category, (f64, u64)> = BTreeMap::new();

    for transaction in transactions {
        let day = days.entry(transaction.date).or_insert((0.0, 0.0));
        match transaction.transaction_type {
            TransactionType::Income => {
                total_income += transaction.amount;
                day.0 += transaction.amount;
            }
            TransactionType::Expense => {
                total_expense += transaction.amount;
                day.1 += transaction.amount;

                let spend = categories.entry(transaction.category).or_insert((0.0, 0));
                spend.0 += transaction.amount;
                spend.1 += 1;
            }
        }
    }

    MonthlySummary {
        total_income,
        total_expense,
        net_savings: total_income - total_expense,
        daily_breakdown: days
            .into_iter()
            .map(|(date, (total_income, total_expense))| DailyActivity {
                date,
                total_income,
                total_expense,
            })
            .collect(),
        category_breakdown: categories
            .into_iter()
            .map(|(category, (total, count))| CategorySpend {
                category,
                total,
                count,
            })
            .collect(),
    }
}

/// First and last calendar day of `(year, month)`, inclusive. `None` when
/// the month is outside 1–12 or the year is unrepresentable.
pub fn month_bounds(year: i32, month: u8) -> Option<(Date, Date)> {
    let month = Month::try_from(month).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let last = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .ok()?;
    Some((first, last))
}
