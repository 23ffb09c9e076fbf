use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::{NaiveDate, Utc};
use common::ProjectionView;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for the projection window
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct ProjectionQuery {
    /// How many months past today to project (default: 12)
    #[validate(range(min = 1, max = 60))]
    pub months_ahead: Option<u32>,
    /// Reference date the window starts from (default: today)
    pub today: Option<NaiveDate>,
}

/// Get the predicted occurrences over a multi-month window
///
/// Returns raw predictions only; real transactions are not merged in.
/// Excluded predictions stay out of the window.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/projection",
    tag = "projections",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ProjectionQuery,
    ),
    responses(
        (status = 200, description = "Projection retrieved successfully", body = ApiResponse<ProjectionView>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_projection(
    Path(user_id): Path<i32>,
    Valid(Query(query)): Valid<Query<ProjectionQuery>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ProjectionView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_projection function");

    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let months_ahead = query.months_ahead.unwrap_or(compute::DEFAULT_MONTHS_AHEAD);
    debug!(
        "Computing projection for user {} from {} over {} months",
        user_id, today, months_ahead
    );

    match compute::projection_window(&state.db, user_id, today, months_ahead).await {
        Ok(predicted) => {
            info!(
                "Projection for user {} yielded {} predicted occurrences",
                user_id,
                predicted.len()
            );
            let view = ProjectionView {
                today,
                months_ahead,
                entries: predicted.iter().map(|p| p.to_view()).collect(),
            };
            let response = ApiResponse {
                data: view,
                message: "Projection retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to compute projection: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to compute projection".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
