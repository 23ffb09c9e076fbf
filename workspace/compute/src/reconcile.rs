use std::collections::HashSet;

use chrono::NaiveDate;
use common::TransactionView;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::dates::same_month;
use crate::projection::PredictedTransaction;

/// One entry of a reconciled month: a persisted transaction or a surviving
/// prediction. Real entries always win the slot they share with a
/// prediction, and once a slot is settled it stays settled.
#[derive(Debug, Clone, PartialEq)]
pub enum MonthEntry {
    Real(transaction::Model),
    Predicted(PredictedTransaction),
}

impl MonthEntry {
    pub fn date(&self) -> NaiveDate {
        match self {
            MonthEntry::Real(tx) => tx.date,
            MonthEntry::Predicted(p) => p.date,
        }
    }

    pub fn amount(&self) -> Decimal {
        match self {
            MonthEntry::Real(tx) => tx.amount,
            MonthEntry::Predicted(p) => p.amount,
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            MonthEntry::Real(tx) => tx.kind,
            MonthEntry::Predicted(p) => p.kind,
        }
    }

    pub fn to_view(&self) -> TransactionView {
        match self {
            MonthEntry::Real(tx) => TransactionView {
                id: tx.id.to_string(),
                description: tx.description.clone(),
                kind: tx.kind.as_str().to_string(),
                category_id: tx.category_id,
                amount: tx.amount,
                date: tx.date,
                recurring_id: tx.recurring_id,
                current_installment: tx.current_installment,
                total_installments: tx.total_installments,
                is_predicted: false,
            },
            MonthEntry::Predicted(p) => p.to_view(),
        }
    }
}

/// Merges real transactions with predicted occurrences so that each logical
/// occurrence appears exactly once.
///
/// Real transactions pass through verbatim. A prediction is dropped when a
/// real transaction in the same month settles the same recurring definition
/// (for installment slots, the same installment pair), or when its synthetic
/// id already appeared earlier in the predicted input.
pub fn reconcile(
    real: &[transaction::Model],
    predicted: &[PredictedTransaction],
) -> Vec<MonthEntry> {
    let mut entries: Vec<MonthEntry> = real.iter().cloned().map(MonthEntry::Real).collect();
    let mut seen_predicted: HashSet<&str> = HashSet::new();

    for p in predicted {
        if !seen_predicted.insert(p.id.as_str()) {
            trace!("Duplicate predicted id {}, dropping", p.id);
            continue;
        }

        let superseded = real.iter().any(|tx| {
            tx.recurring_id == Some(p.recurring_id)
                && same_month(tx.date, p.date)
                && match (p.current_installment, p.total_installments) {
                    (Some(current), Some(total)) => {
                        tx.current_installment == Some(current as i32)
                            && tx.total_installments == Some(total as i32)
                    }
                    _ => true,
                }
        });
        if superseded {
            trace!("Predicted occurrence {} superseded by a real transaction", p.id);
            continue;
        }

        entries.push(MonthEntry::Predicted(p.clone()));
    }

    debug!(
        "Reconciled {} real and {} predicted into {} entries",
        real.len(),
        predicted.len(),
        entries.len()
    );
    entries
}

/// Sums the visible entries into (income, expense) totals for the month
/// header and budget display.
pub fn totals(entries: &[MonthEntry]) -> (Decimal, Decimal) {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    for entry in entries {
        match entry.kind() {
            TransactionKind::Income => income += entry.amount(),
            TransactionKind::Expense => expense += entry.amount(),
        }
    }
    (income, expense)
}
