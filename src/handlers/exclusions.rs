use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use common::ExclusionView;
use model::entities::prediction_exclusion;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for excluding a predicted occurrence
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateExclusionRequest {
    /// Synthetic id of the prediction to hide, e.g. "predicted-7-2024-03"
    #[validate(length(min = 1, max = 64))]
    pub predicted_id: String,
}

/// Get all prediction exclusions for a user
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}/exclusions",
    tag = "exclusions",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "Exclusions retrieved successfully", body = ApiResponse<Vec<ExclusionView>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_exclusions(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ExclusionView>>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering get_exclusions function");
    debug!("Fetching exclusions for user {}", user_id);

    match prediction_exclusion::Entity::find()
        .filter(prediction_exclusion::Column::UserId.eq(user_id))
        .order_by_asc(prediction_exclusion::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(exclusions) => {
            info!("Successfully retrieved {} exclusions", exclusions.len());
            let response = ApiResponse {
                data: exclusions
                    .into_iter()
                    .map(|e| ExclusionView {
                        predicted_id: e.predicted_id,
                    })
                    .collect(),
                message: "Exclusions retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to retrieve exclusions: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve exclusions".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Exclude a predicted occurrence
///
/// The prediction disappears from month views and projection windows until
/// the exclusion is deleted. Excluding an id that is already excluded is a
/// conflict.
#[utoipa::path(
    post,
    path = "/api/v1/users/{user_id}/exclusions",
    tag = "exclusions",
    request_body = CreateExclusionRequest,
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 201, description = "Exclusion created successfully", body = ApiResponse<ExclusionView>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 409, description = "Exclusion already exists", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_exclusion(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateExclusionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<ExclusionView>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_exclusion function");
    debug!(
        "Excluding prediction {} for user {}",
        request.predicted_id, user_id
    );

    let existing = prediction_exclusion::Entity::find()
        .filter(prediction_exclusion::Column::UserId.eq(user_id))
        .filter(prediction_exclusion::Column::PredictedId.eq(request.predicted_id.clone()))
        .one(&state.db)
        .await;

    match existing {
        Ok(Some(_)) => {
            warn!(
                "Prediction {} is already excluded for user {}",
                request.predicted_id, user_id
            );
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Prediction {} is already excluded", request.predicted_id),
                    code: "EXCLUSION_EXISTS".to_string(),
                    success: false,
                }),
            ));
        }
        Ok(None) => {}
        Err(e) => {
            error!("Database error while checking exclusion: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check exclusion".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    }

    let new_exclusion = prediction_exclusion::ActiveModel {
        user_id: Set(user_id),
        predicted_id: Set(request.predicted_id),
        ..Default::default()
    };

    match new_exclusion.insert(&state.db).await {
        Ok(created) => {
            info!("Successfully created exclusion with ID: {}", created.id);
            let response = ApiResponse {
                data: ExclusionView {
                    predicted_id: created.predicted_id,
                },
                message: "Exclusion created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to create exclusion: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create exclusion".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a prediction exclusion
///
/// The corresponding prediction reappears in month views and projections on
/// the next read.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}/exclusions/{predicted_id}",
    tag = "exclusions",
    params(
        ("user_id" = i32, Path, description = "User ID"),
        ("predicted_id" = String, Path, description = "Synthetic prediction ID"),
    ),
    responses(
        (status = 200, description = "Exclusion deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Exclusion not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_exclusion(
    Path((user_id, predicted_id)): Path<(i32, String)>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_exclusion function");
    debug!("Deleting exclusion {} for user {}", predicted_id, user_id);

    let existing = prediction_exclusion::Entity::find()
        .filter(prediction_exclusion::Column::UserId.eq(user_id))
        .filter(prediction_exclusion::Column::PredictedId.eq(predicted_id.clone()))
        .one(&state.db)
        .await;

    match existing {
        Ok(Some(found)) => match found.delete(&state.db).await {
            Ok(_) => {
                info!("Successfully deleted exclusion {}", predicted_id);
                let response = ApiResponse {
                    data: format!("Exclusion {} deleted successfully", predicted_id),
                    message: "Exclusion deleted successfully".to_string(),
                    success: true,
                };
                Ok((StatusCode::OK, Json(response)))
            }
            Err(e) => {
                error!("Failed to delete exclusion: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to delete exclusion".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        },
        Ok(None) => {
            warn!(
                "Exclusion {} not found for user {}",
                predicted_id, user_id
            );
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Exclusion {} does not exist", predicted_id),
                    code: "EXCLUSION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while fetching exclusion: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve exclusion".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
