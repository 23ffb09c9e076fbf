//! Transport-layer types for the reconciled month view and the projection
//! window. These structs are the shapes the handlers serialize, kept apart
//! from both the SeaORM entities and the compute-core types so the API
//! surface does not leak persistence details.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One visible occurrence in a month: either a persisted transaction or a
/// predicted one derived from a recurring definition.
///
/// Real transactions carry their numeric id rendered as a string; predicted
/// occurrences carry the synthetic `predicted-{recurring_id}-{YYYY-MM}` id
/// and `is_predicted = true`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TransactionView {
    pub id: String,
    pub description: String,
    /// "income" or "expense"
    pub kind: String,
    pub category_id: i32,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring_id: Option<i32>,
    pub current_installment: Option<i32>,
    pub total_installments: Option<i32>,
    pub is_predicted: bool,
}

/// The reconciled transaction list for a single calendar month.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct MonthView {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub entries: Vec<TransactionView>,
    pub income_total: Decimal,
    pub expense_total: Decimal,
}

/// The full predicted set over a multi-month window, used by charts and
/// forward-looking views.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ProjectionView {
    /// The reference "today" the window was computed from.
    pub today: NaiveDate,
    pub months_ahead: u32,
    pub entries: Vec<TransactionView>,
}

/// A single prediction-exclusion entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ExclusionView {
    pub predicted_id: String,
}
