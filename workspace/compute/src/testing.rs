//! Builders for entity models used across the compute unit tests. The
//! models are plain structs, so tests can assemble them without a database.

use chrono::NaiveDate;
use model::entities::recurring_definition::{self, RecurrenceType};
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// An active expense definition starting on the given date, with
/// `day_of_month` matching the start day. Tests override fields as needed.
pub fn definition(
    id: i32,
    recurrence: RecurrenceType,
    raw_value: &str,
    start_year: i32,
    start_month: u32,
    day_of_month: u32,
) -> recurring_definition::Model {
    recurring_definition::Model {
        id,
        user_id: 1,
        description: format!("definition {id}"),
        kind: TransactionKind::Expense,
        category_id: 1,
        raw_value: raw_value.to_string(),
        recurrence,
        start_date: ymd(start_year, start_month, day_of_month),
        end_date: None,
        day_of_month: day_of_month as i32,
        total_installments: None,
        is_active: true,
        selected_income_id: None,
    }
}

/// A persisted income transaction, for `variable_by_income` matching.
pub fn income_transaction(id: i32, amount: Decimal, date: NaiveDate) -> transaction::Model {
    transaction::Model {
        id,
        user_id: 1,
        description: format!("income {id}"),
        kind: TransactionKind::Income,
        category_id: 1,
        amount,
        date,
        recurring_id: None,
        current_installment: None,
        total_installments: None,
    }
}

/// A persisted expense transaction, optionally settling a recurring slot.
pub fn expense_transaction(
    id: i32,
    recurring_id: Option<i32>,
    amount: Decimal,
    date: NaiveDate,
) -> transaction::Model {
    transaction::Model {
        id,
        user_id: 1,
        description: format!("expense {id}"),
        kind: TransactionKind::Expense,
        category_id: 1,
        amount,
        date,
        recurring_id,
        current_installment: None,
        total_installments: None,
    }
}
