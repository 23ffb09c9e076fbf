use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use common::MonthView;
use compute::error::ComputeError;
use compute::reconcile;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the month view
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct MonthViewQuery {
    /// Reference date predictions are computed from (default: today)
    pub today: Option<NaiveDate>,
}

/// Get the reconciled view of one calendar month
///
/// Real transactions appear verbatim; predicted occurrences fill the slots
/// no real transaction has settled and the user has not excluded.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/months/{year}/{month}",
    tag = "months",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("year" = i32, Path, description = "Calendar year"),
        ("month" = u32, Path, description = "Calendar month, 1-12"),
        MonthViewQuery,
    ),
    responses(
        (status = 200, description = "Month view retrieved successfully", body = ApiResponse<MonthView>),
        (status = 400, description = "Invalid month", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_month_view(
    Path((user_id, year, month)): Path<(i32, i32, u32)>,
    Valid(Query(query)): Valid<Query<MonthViewQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<MonthView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_month_view function");

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    debug!(
        "Computing month view for user {} at {}-{:02} as of {}",
        user_id, year, month, today
    );

    match compute::month_view(&state.db, user_id, year, month, today).await {
        Ok(entries) => {
            let (income_total, expense_total) = reconcile::totals(&entries);
            info!(
                "Month view for user {} has {} entries (income {}, expense {})",
                user_id,
                entries.len(),
                income_total,
                expense_total
            );
            let view = MonthView {
                year,
                month,
                entries: entries.iter().map(|e| e.to_view()).collect(),
                income_total,
                expense_total,
            };
            let response = ApiResponse {
                data: view,
                message: "Month view retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(ComputeError::Date(msg)) => {
            warn!("Rejected month view request: {}", msg);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: msg,
                    code: "INVALID_MONTH".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Failed to compute month view: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute month view".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
