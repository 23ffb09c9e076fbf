use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use common::TransactionView;
use model::entities::recurring_definition;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use tracing::{debug, trace};

use crate::dates::{add_months, clamped_date, month_span};
use crate::recurring::RecurrenceKind;

/// A non-persisted transaction occurrence derived from a recurring
/// definition. Recomputed on every load, never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedTransaction {
    /// Deterministic synthetic id: `predicted-{recurring_id}-{YYYY-MM}`.
    pub id: String,
    pub recurring_id: i32,
    pub user_id: i32,
    pub description: String,
    pub kind: TransactionKind,
    pub category_id: i32,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub current_installment: Option<u32>,
    pub total_installments: Option<u32>,
}

impl PredictedTransaction {
    pub fn to_view(&self) -> TransactionView {
        TransactionView {
            id: self.id.clone(),
            description: self.description.clone(),
            kind: self.kind.as_str().to_string(),
            category_id: self.category_id,
            amount: self.amount,
            date: self.date,
            recurring_id: Some(self.recurring_id),
            current_installment: self.current_installment.map(|i| i as i32),
            total_installments: self.total_installments.map(|i| i as i32),
            is_predicted: true,
        }
    }
}

/// The explicit inputs projection runs against. Everything the generated set
/// depends on is in here, so identical contexts always yield identical
/// output.
#[derive(Debug)]
pub struct ProjectionContext<'a> {
    /// Reference date the window is anchored to.
    pub today: NaiveDate,
    /// How many months past `today` to project.
    pub months_ahead: u32,
    /// Real income transactions, used for `variable_by_income` matching.
    pub incomes: &'a [transaction::Model],
    /// Predicted ids the user has hidden.
    pub excluded_ids: &'a HashSet<String>,
}

/// Builds the synthetic id for one predicted occurrence.
pub fn predicted_id(recurring_id: i32, year: i32, month: u32) -> String {
    format!("predicted-{}-{:04}-{:02}", recurring_id, year, month)
}

/// Generates all predicted occurrences for the given definitions, one per
/// calendar month from each definition's `start_date` through
/// `today + months_ahead` inclusive.
///
/// Inactive definitions are skipped entirely. Occurrences dated before
/// `start_date` or after `end_date` are never emitted, installment series
/// stop at their total, and excluded ids are filtered out. A `day_of_month`
/// beyond the target month's length clamps to the month's last day.
pub fn generate(
    definitions: &[recurring_definition::Model],
    ctx: &ProjectionContext,
) -> Vec<PredictedTransaction> {
    let horizon = add_months(ctx.today.year(), ctx.today.month(), ctx.months_ahead);
    let mut predicted = Vec::new();

    for def in definitions.iter().filter(|d| d.is_active) {
        let kind = RecurrenceKind::from_definition(def);
        let start = (def.start_date.year(), def.start_date.month());
        let span = month_span(start, horizon);
        if span < 0 {
            trace!(
                "Definition {} starts after the projection horizon, skipping",
                def.id
            );
            continue;
        }

        for i in 0..=span {
            let (year, month) = add_months(start.0, start.1, i as u32);

            let (amount, current, total) = match &kind {
                RecurrenceKind::Fixed { amount } | RecurrenceKind::Variable { amount } => {
                    (*amount, None, None)
                }
                RecurrenceKind::Installment {
                    amount,
                    total_installments,
                } => {
                    let current = i as u32 + 1;
                    if current > *total_installments {
                        // The series is finished; no later month can emit.
                        break;
                    }
                    (*amount, Some(current), Some(*total_installments))
                }
                RecurrenceKind::VariableByIncome {
                    percentage,
                    selected_income_id,
                } => {
                    let income = matched_income(ctx.incomes, year, month, *selected_income_id);
                    (income * *percentage / Decimal::from(100), None, None)
                }
            };

            let date = clamped_date(year, month, def.day_of_month.max(1) as u32);
            if date < def.start_date {
                continue;
            }
            if let Some(end) = def.end_date {
                if date > end {
                    continue;
                }
            }

            let id = predicted_id(def.id, year, month);
            if ctx.excluded_ids.contains(&id) {
                trace!("Predicted occurrence {} is excluded, skipping", id);
                continue;
            }

            predicted.push(PredictedTransaction {
                id,
                recurring_id: def.id,
                user_id: def.user_id,
                description: def.description.clone(),
                kind: def.kind,
                category_id: def.category_id,
                amount,
                date,
                current_installment: current,
                total_installments: total,
            });
        }
    }

    debug!(
        "Generated {} predicted occurrences for {} definitions",
        predicted.len(),
        definitions.len()
    );
    predicted
}

/// The income a `variable_by_income` definition applies its percentage to
/// in the given month: either the specifically selected transaction
/// (restricted to that month) or the sum of all income dated in it. No
/// matching income means zero.
fn matched_income(
    incomes: &[transaction::Model],
    year: i32,
    month: u32,
    selected: Option<i32>,
) -> Decimal {
    let in_month = |t: &&transaction::Model| {
        t.kind == TransactionKind::Income && t.date.year() == year && t.date.month() == month
    };
    match selected {
        Some(id) => incomes
            .iter()
            .filter(in_month)
            .find(|t| t.id == id)
            .map(|t| t.amount)
            .unwrap_or(Decimal::ZERO),
        None => incomes.iter().filter(in_month).map(|t| t.amount).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, ymd};
    use model::entities::recurring_definition::RecurrenceType;

    fn context<'a>(
        today: NaiveDate,
        months_ahead: u32,
        incomes: &'a [transaction::Model],
        excluded: &'a HashSet<String>,
    ) -> ProjectionContext<'a> {
        ProjectionContext {
            today,
            months_ahead,
            incomes,
            excluded_ids: excluded,
        }
    }

    #[test]
    fn test_fixed_generates_one_occurrence_per_month() {
        // The worked example: fixed 100 on day 5 from 2024-01-05, queried
        // with today=2024-03-15 and one month ahead.
        let def = testing::definition(1, RecurrenceType::Fixed, "100", 2024, 1, 5);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 3, 15), 1, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 4);
        let dates: Vec<NaiveDate> = out.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![ymd(2024, 1, 5), ymd(2024, 2, 5), ymd(2024, 3, 5), ymd(2024, 4, 5)]
        );
        assert!(out.iter().all(|p| p.amount == Decimal::from(100)));
        assert_eq!(out[0].id, "predicted-1-2024-01");
        assert_eq!(out[3].id, "predicted-1-2024-04");
    }

    #[test]
    fn test_installment_stops_at_total() {
        // Worked example: 3 installments from 2024-01-10, nothing in April.
        let mut def = testing::definition(2, RecurrenceType::Installment, "50", 2024, 1, 10);
        def.total_installments = Some(3);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 6, 1), 2, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 3);
        assert_eq!(out[0].date, ymd(2024, 1, 10));
        assert_eq!(out[2].date, ymd(2024, 3, 10));
        let installments: Vec<Option<u32>> =
            out.iter().map(|p| p.current_installment).collect();
        assert_eq!(installments, vec![Some(1), Some(2), Some(3)]);
        assert!(out.iter().all(|p| p.total_installments == Some(3)));
    }

    #[test]
    fn test_installment_bounded_by_window() {
        let mut def = testing::definition(3, RecurrenceType::Installment, "50", 2024, 1, 10);
        def.total_installments = Some(24);
        let excluded = HashSet::new();
        // Window only reaches March: installments 4..24 fall outside it.
        let ctx = context(ymd(2024, 2, 1), 1, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 3);
        assert_eq!(out.last().unwrap().current_installment, Some(3));
    }

    #[test]
    fn test_no_occurrence_before_start_date() {
        // Day 5 precedes the start date within the first month.
        let def = testing::definition(4, RecurrenceType::Fixed, "80", 2024, 1, 5);
        let def = recurring_definition::Model {
            start_date: ymd(2024, 1, 10),
            ..def
        };
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 2, 20), 0, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, ymd(2024, 2, 5));
    }

    #[test]
    fn test_no_occurrence_after_end_date() {
        let mut def = testing::definition(5, RecurrenceType::Fixed, "80", 2024, 1, 5);
        def.end_date = Some(ymd(2024, 2, 28));
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 6, 15), 3, &[], &excluded);

        let out = generate(&[def], &ctx);

        let dates: Vec<NaiveDate> = out.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![ymd(2024, 1, 5), ymd(2024, 2, 5)]);
    }

    #[test]
    fn test_inactive_definition_generates_nothing() {
        let mut def = testing::definition(6, RecurrenceType::Fixed, "80", 2024, 1, 5);
        def.is_active = false;
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 3, 15), 1, &[], &excluded);

        assert!(generate(&[def], &ctx).is_empty());
    }

    #[test]
    fn test_day_of_month_clamps_in_short_months() {
        let def = testing::definition(7, RecurrenceType::Fixed, "80", 2024, 1, 31);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 4, 1), 0, &[], &excluded);

        let out = generate(&[def], &ctx);

        let dates: Vec<NaiveDate> = out.iter().map(|p| p.date).collect();
        assert_eq!(
            dates,
            vec![
                ymd(2024, 1, 31),
                ymd(2024, 2, 29), // leap February
                ymd(2024, 3, 31),
                ymd(2024, 4, 30),
            ]
        );
    }

    #[test]
    fn test_variable_by_income_sums_month_income() {
        let def = testing::definition(8, RecurrenceType::VariableByIncome, "30", 2024, 1, 1);
        let incomes = vec![
            testing::income_transaction(100, Decimal::from(3000), ymd(2024, 1, 5)),
            testing::income_transaction(101, Decimal::from(1000), ymd(2024, 1, 20)),
            testing::income_transaction(102, Decimal::from(5000), ymd(2024, 2, 5)),
        ];
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 2, 15), 0, &incomes, &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 2);
        // January: 30% of (3000 + 1000); February: 30% of 5000.
        assert_eq!(out[0].amount, Decimal::from(1200));
        assert_eq!(out[1].amount, Decimal::from(1500));
    }

    #[test]
    fn test_variable_by_income_with_selected_income() {
        let mut def = testing::definition(9, RecurrenceType::VariableByIncome, "10", 2024, 1, 1);
        def.selected_income_id = Some(100);
        let incomes = vec![
            testing::income_transaction(100, Decimal::from(2000), ymd(2024, 1, 5)),
            testing::income_transaction(101, Decimal::from(9999), ymd(2024, 1, 20)),
        ];
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 1, 15), 0, &incomes, &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, Decimal::from(200));
    }

    #[test]
    fn test_variable_by_income_missing_match_yields_zero() {
        let mut def = testing::definition(10, RecurrenceType::VariableByIncome, "10", 2024, 1, 1);
        def.selected_income_id = Some(12345);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 1, 15), 0, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].amount, Decimal::ZERO);
    }

    #[test]
    fn test_exclusion_suppresses_occurrence() {
        let def = testing::definition(11, RecurrenceType::Fixed, "100", 2024, 1, 5);
        let mut excluded = HashSet::new();
        excluded.insert("predicted-11-2024-02".to_string());
        let ctx = context(ymd(2024, 3, 15), 0, &[], &excluded);

        let out = generate(&[def.clone()], &ctx);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.id != "predicted-11-2024-02"));

        // Repeated calls with the same exclusion never resurrect it.
        let again = generate(&[def], &ctx);
        assert!(again.iter().all(|p| p.id != "predicted-11-2024-02"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mut installment = testing::definition(12, RecurrenceType::Installment, "75,50", 2024, 2, 15);
        installment.total_installments = Some(6);
        let defs = vec![
            testing::definition(13, RecurrenceType::Fixed, "1.200,00", 2023, 11, 1),
            installment,
        ];
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 5, 10), 2, &[], &excluded);

        let first = generate(&defs, &ctx);
        let second = generate(&defs, &ctx);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unparsable_value_projects_zero_amounts() {
        let def = testing::definition(14, RecurrenceType::Fixed, "n/a", 2024, 1, 5);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 2, 15), 0, &[], &excluded);

        let out = generate(&[def], &ctx);

        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|p| p.amount == Decimal::ZERO));
    }

    #[test]
    fn test_definition_starting_after_horizon_is_skipped() {
        let def = testing::definition(15, RecurrenceType::Fixed, "100", 2025, 6, 5);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 3, 15), 1, &[], &excluded);

        assert!(generate(&[def], &ctx).is_empty());
    }

    #[test]
    fn test_predicted_view_marks_prediction() {
        let def = testing::definition(16, RecurrenceType::Fixed, "100", 2024, 1, 5);
        let excluded = HashSet::new();
        let ctx = context(ymd(2024, 1, 15), 0, &[], &excluded);

        let out = generate(&[def], &ctx);
        let view = out[0].to_view();
        assert!(view.is_predicted);
        assert_eq!(view.id, "predicted-16-2024-01");
        assert_eq!(view.kind, "expense");
        assert_eq!(view.recurring_id, Some(16));
    }
}
