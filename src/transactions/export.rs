use crate::model::DATE_FORMAT;
use crate::transactions::repo::TransactionWithBank;

pub const CSV_HEADER: [&str; 6] = ["Date", "Bank", "Type", "Category", "Amount", "Description"];

/// Renders the export dataset as CSV: one header row, one row per
/// transaction in the order given (newest first from the repo). Fields with
/// embedded separators or quotes are quoted by the writer; amounts are
/// rendered bare, without a currency symbol.
pub fn to_csv(transactions: &[TransactionWithBank]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for transaction in transactions {
        writer.write_record(&[
            transaction.date.format(DATE_FORMAT)?,
            transaction.bank_name.clone(),
            transaction.transaction_type.to_string(),
            transaction.category.to_string(),
            transaction.amount.to_string(),
            transaction.description.clone(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("finalize csv writer: {e}"))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::{Date, OffsetDateTime};
    use uuid::Uuid;

    use crate::model::{Category, TransactionType};

    fn row(
        bank_name: &str,
        transaction_type: TransactionType,
        category: Category,
        amount: f64,
        date: Date,
        description: &str,
    ) -> TransactionWithBank {
        TransactionWithBank {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            bank_id: Uuid::new_v4(),
            bank_name: bank_name.into(),
            amount,
            transaction_type,
            category,
            date,
            description: description.into(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn one_row_per_transaction_plus_header() {
        let rows = vec![
            row(
                "Main",
                TransactionType::Income,
                Category::Salary,
                2500.0,
                date!(2025 - 04 - 30),
                "April salary",
            ),
            row(
                "Main",
                TransactionType::Expense,
                Category::Food,
                49.99,
                date!(2025 - 04 - 02),
                "Groceries",
            ),
        ];

        let csv = to_csv(&rows).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), rows.len() + 1);
        assert_eq!(lines[0], "Date,Bank,Type,Category,Amount,Description");
        assert_eq!(lines[1], "2025-04-30,Main,income,Salary,2500,April salary");
        assert_eq!(lines[2], "2025-04-02,Main,expense,Food,49.99,Groceries");
    }

    #[test]
    fn embedded_separators_are_quoted() {
        let rows = vec![row(
            "Main",
            TransactionType::Expense,
            Category::Shopping,
            12.5,
            date!(2025 - 04 - 02),
            "books, pens and \"misc\"",
        )];

        let csv = to_csv(&rows).unwrap();
        assert!(csv.contains("\"books, pens and \"\"misc\"\"\""));
    }

    #[test]
    fn round_trips_through_a_csv_reader() {
        let rows = vec![
            row(
                "Savings Pot",
                TransactionType::Income,
                Category::Freelance,
                1234.56,
                date!(2025 - 01 - 15),
                "Invoice #42, net",
            ),
            row(
                "Wallet",
                TransactionType::Expense,
                Category::Transport,
                3.2,
                date!(2025 - 01 - 03),
                "Bus ticket",
            ),
        ];

        let csv = to_csv(&rows).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());

        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), rows.len());

        for (record, expected) in records.iter().zip(&rows) {
            assert_eq!(&record[0], expected.date.format(DATE_FORMAT).unwrap());
            assert_eq!(&record[1], expected.bank_name);
            assert_eq!(&record[2], expected.transaction_type.as_str());
            assert_eq!(&record[3], expected.category.as_str());
            assert_eq!(record[4].parse::<f64>().unwrap(), expected.amount);
            assert_eq!(&record[5], expected.description);
        }
    }
}
