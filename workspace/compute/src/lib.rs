pub mod dates;
pub mod error;
pub mod loader;
pub mod numeric;
pub mod projection;
pub mod reconcile;
pub mod recurring;

#[cfg(test)]
pub mod testing;

use chrono::{Datelike, NaiveDate};
use sea_orm::DatabaseConnection;
use tracing::instrument;

use error::{ComputeError, Result};
use projection::{PredictedTransaction, ProjectionContext};
use reconcile::MonthEntry;

/// Default projection window used when the caller does not ask for a
/// specific one.
pub const DEFAULT_MONTHS_AHEAD: u32 = 12;

/// Loads and reconciles one calendar month for a user: real transactions
/// verbatim, plus the predicted occurrences for that month that no real
/// transaction supersedes and the user has not excluded.
///
/// Predictions are recomputed from the recurring definitions on every call;
/// nothing here is cached or written back.
#[instrument(skip(db))]
pub async fn month_view(
    db: &DatabaseConnection,
    user_id: i32,
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<Vec<MonthEntry>> {
    let month_start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ComputeError::Date(format!("invalid month {year:04}-{month:02}")))?;
    let month_end = dates::clamped_date(year, month, dates::days_in_month(year, month));

    // Project far enough to cover the requested month even when it lies
    // beyond today.
    let months_ahead = dates::month_span((today.year(), today.month()), (year, month)).max(0) as u32;

    let definitions =
        loader::definitions_in_window(db, user_id, Some(month_start), month_end).await?;
    let real = loader::month_transactions(db, user_id, year, month).await?;
    let incomes = loader::income_transactions(db, user_id, month_end).await?;
    let excluded = loader::exclusion_set(db, user_id).await?;

    let ctx = ProjectionContext {
        today,
        months_ahead,
        incomes: &incomes,
        excluded_ids: &excluded,
    };
    let predicted: Vec<PredictedTransaction> = projection::generate(&definitions, &ctx)
        .into_iter()
        .filter(|p| dates::same_month(p.date, month_start))
        .collect();

    Ok(reconcile::reconcile(&real, &predicted))
}

/// Loads the full predicted set over a multi-month window for charts and
/// forward-looking views. Exclusions apply; real transactions do not (the
/// caller overlays them per month if needed).
#[instrument(skip(db))]
pub async fn projection_window(
    db: &DatabaseConnection,
    user_id: i32,
    today: NaiveDate,
    months_ahead: u32,
) -> Result<Vec<PredictedTransaction>> {
    let (horizon_year, horizon_month) = dates::add_months(today.year(), today.month(), months_ahead);
    let horizon_end = dates::clamped_date(
        horizon_year,
        horizon_month,
        dates::days_in_month(horizon_year, horizon_month),
    );

    let definitions = loader::definitions_in_window(db, user_id, None, horizon_end).await?;
    let incomes = loader::income_transactions(db, user_id, horizon_end).await?;
    let excluded = loader::exclusion_set(db, user_id).await?;

    let ctx = ProjectionContext {
        today,
        months_ahead,
        incomes: &incomes,
        excluded_ids: &excluded,
    };
    Ok(projection::generate(&definitions, &ctx))
}
