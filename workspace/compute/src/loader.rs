use std::collections::HashSet;

use chrono::NaiveDate;
use model::entities::{prediction_exclusion, recurring_definition, transaction};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use tracing::trace;

use crate::dates::{clamped_date, days_in_month};
use crate::error::Result;

/// Fetches a user's recurring definitions whose lifetime intersects the
/// window ending at `window_end`. With `window_start` set, definitions that
/// ended before it are dropped too (month-view path); without it the whole
/// history up to the horizon is loaded (projection path).
pub async fn definitions_in_window(
    db: &DatabaseConnection,
    user_id: i32,
    window_start: Option<NaiveDate>,
    window_end: NaiveDate,
) -> Result<Vec<recurring_definition::Model>> {
    let mut query = recurring_definition::Entity::find()
        .filter(recurring_definition::Column::UserId.eq(user_id))
        .filter(recurring_definition::Column::StartDate.lte(window_end));

    if let Some(start) = window_start {
        query = query.filter(
            Condition::any()
                .add(recurring_definition::Column::EndDate.is_null())
                .add(recurring_definition::Column::EndDate.gte(start)),
        );
    }

    let definitions = query
        .order_by_asc(recurring_definition::Column::Id)
        .all(db)
        .await?;
    trace!(
        "Loaded {} recurring definitions for user {}",
        definitions.len(),
        user_id
    );
    Ok(definitions)
}

/// Fetches the real transactions of one calendar month.
pub async fn month_transactions(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
    month: u32,
) -> Result<Vec<transaction::Model>> {
    let month_start = clamped_date(year, month, 1);
    let month_end = clamped_date(year, month, days_in_month(year, month));

    let transactions = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Date.gte(month_start))
        .filter(transaction::Column::Date.lte(month_end))
        .order_by_asc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .all(db)
        .await?;
    trace!(
        "Loaded {} transactions for user {} in {:04}-{:02}",
        transactions.len(),
        user_id,
        year,
        month
    );
    Ok(transactions)
}

/// Fetches the income transactions `variable_by_income` definitions match
/// against, up to the projection horizon.
pub async fn income_transactions(
    db: &DatabaseConnection,
    user_id: i32,
    through: NaiveDate,
) -> Result<Vec<transaction::Model>> {
    let incomes = transaction::Entity::find()
        .filter(transaction::Column::UserId.eq(user_id))
        .filter(transaction::Column::Kind.eq(transaction::TransactionKind::Income))
        .filter(transaction::Column::Date.lte(through))
        .order_by_asc(transaction::Column::Date)
        .all(db)
        .await?;
    Ok(incomes)
}

/// Fetches the user's prediction-exclusion set.
pub async fn exclusion_set(db: &DatabaseConnection, user_id: i32) -> Result<HashSet<String>> {
    let rows = prediction_exclusion::Entity::find()
        .filter(prediction_exclusion::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| row.predicted_id).collect())
}
