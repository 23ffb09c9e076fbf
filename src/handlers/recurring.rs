use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::recurring_definition::{self, RecurrenceType};
use model::entities::transaction::TransactionKind;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for listing recurring definitions
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct RecurringDefinitionQuery {
    /// Filter by user ID
    pub user_id: Option<i32>,
    /// Only definitions currently active
    pub active_only: Option<bool>,
}

/// Request body for creating a recurring definition
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateRecurringDefinitionRequest {
    pub user_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    /// "income" or "expense"
    pub kind: String,
    pub category_id: i32,
    /// Amount or percentage as entered by the user; comma decimal
    /// separators are accepted ("1.234,56")
    #[validate(length(min = 1, max = 32))]
    pub value: String,
    /// "fixed", "installment", "variable" or "variable_by_income"
    pub recurrence: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    /// Day each occurrence falls on; clamped to shorter months
    #[validate(range(min = 1, max = 31))]
    pub day_of_month: i32,
    /// Required for "installment" recurrences
    #[validate(range(min = 1, max = 480))]
    pub total_installments: Option<i32>,
    /// For "variable_by_income": restrict matching to one income transaction
    pub selected_income_id: Option<i32>,
}

/// Request body for updating a recurring definition
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateRecurringDefinitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    /// "income" or "expense"
    pub kind: Option<String>,
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 32))]
    pub value: Option<String>,
    /// "fixed", "installment", "variable" or "variable_by_income"
    pub recurrence: Option<String>,
    pub start_date: Option<NaiveDate>,
    /// Send null to make the definition open-ended
    pub end_date: Option<Option<NaiveDate>>,
    #[validate(range(min = 1, max = 31))]
    pub day_of_month: Option<i32>,
    #[validate(range(min = 1, max = 480))]
    pub total_installments: Option<i32>,
    pub is_active: Option<bool>,
    pub selected_income_id: Option<Option<i32>>,
}

/// Recurring definition response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecurringDefinitionResponse {
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub kind: String,
    pub category_id: i32,
    pub value: String,
    pub recurrence: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub day_of_month: i32,
    pub total_installments: Option<i32>,
    pub is_active: bool,
    pub selected_income_id: Option<i32>,
}

impl From<recurring_definition::Model> for RecurringDefinitionResponse {
    fn from(model: recurring_definition::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            description: model.description,
            kind: model.kind.as_str().to_string(),
            category_id: model.category_id,
            value: model.raw_value,
            recurrence: recurrence_as_str(model.recurrence).to_string(),
            start_date: model.start_date,
            end_date: model.end_date,
            day_of_month: model.day_of_month,
            total_installments: model.total_installments,
            is_active: model.is_active,
            selected_income_id: model.selected_income_id,
        }
    }
}

fn recurrence_as_str(recurrence: RecurrenceType) -> &'static str {
    match recurrence {
        RecurrenceType::Fixed => "fixed",
        RecurrenceType::Installment => "installment",
        RecurrenceType::Variable => "variable",
        RecurrenceType::VariableByIncome => "variable_by_income",
    }
}

fn parse_recurrence(raw: &str) -> Result<RecurrenceType, (StatusCode, Json<ErrorResponse>)> {
    match raw {
        "fixed" => Ok(RecurrenceType::Fixed),
        "installment" => Ok(RecurrenceType::Installment),
        "variable" => Ok(RecurrenceType::Variable),
        "variable_by_income" => Ok(RecurrenceType::VariableByIncome),
        other => {
            warn!("Rejected unknown recurrence type: {}", other);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!(
                        "Unknown recurrence type '{}', expected one of 'fixed', 'installment', 'variable', 'variable_by_income'",
                        other
                    ),
                    code: "INVALID_RECURRENCE_TYPE".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

fn parse_kind(raw: &str) -> Result<TransactionKind, (StatusCode, Json<ErrorResponse>)> {
    match raw {
        "income" => Ok(TransactionKind::Income),
        "expense" => Ok(TransactionKind::Expense),
        other => {
            warn!("Rejected unknown transaction kind: {}", other);
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Unknown transaction kind '{}', expected 'income' or 'expense'", other),
                    code: "INVALID_TRANSACTION_KIND".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Create a new recurring definition
#[utoipa::path(
    post,
    path = "/api/v1/recurring",
    tag = "recurring",
    request_body = CreateRecurringDefinitionRequest,
    responses(
        (status = 201, description = "Recurring definition created successfully", body = ApiResponse<RecurringDefinitionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_recurring_definition(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateRecurringDefinitionRequest>>,
) -> Result<
    (StatusCode, Json<ApiResponse<RecurringDefinitionResponse>>),
    (StatusCode, Json<ErrorResponse>),
> {
    trace!("Entering create_recurring_definition function");
    debug!(
        "Creating recurring definition '{}' for user {}",
        request.description, request.user_id
    );

    let kind = parse_kind(&request.kind)?;
    let recurrence = parse_recurrence(&request.recurrence)?;

    if recurrence == RecurrenceType::Installment && request.total_installments.is_none() {
        warn!("Installment definition submitted without total_installments");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "total_installments is required for installment recurrences".to_string(),
                code: "MISSING_TOTAL_INSTALLMENTS".to_string(),
                success: false,
            }),
        ));
    }

    let new_definition = recurring_definition::ActiveModel {
        user_id: Set(request.user_id),
        description: Set(request.description),
        kind: Set(kind),
        category_id: Set(request.category_id),
        raw_value: Set(request.value),
        recurrence: Set(recurrence),
        start_date: Set(request.start_date),
        end_date: Set(request.end_date),
        day_of_month: Set(request.day_of_month),
        total_installments: Set(request.total_installments),
        is_active: Set(true),
        selected_income_id: Set(request.selected_income_id),
        ..Default::default()
    };

    match new_definition.insert(&state.db).await {
        Ok(created) => {
            info!("Successfully created recurring definition with ID: {}", created.id);
            let response = ApiResponse {
                data: RecurringDefinitionResponse::from(created),
                message: "Recurring definition created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to create recurring definition: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create recurring definition".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get all recurring definitions with optional filtering
#[utoipa::path(
    get,
    path = "/api/v1/recurring",
    tag = "recurring",
    params(RecurringDefinitionQuery),
    responses(
        (status = 200, description = "Recurring definitions retrieved successfully", body = ApiResponse<Vec<RecurringDefinitionResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring_definitions(
    Valid(Query(query)): Valid<Query<RecurringDefinitionQuery>>,
    State(state): State<AppState>,
) -> Result<
    (StatusCode, Json<ApiResponse<Vec<RecurringDefinitionResponse>>>),
    (StatusCode, Json<ErrorResponse>),
> {
    trace!("Entering get_recurring_definitions function");

    let mut query_builder = recurring_definition::Entity::find();

    if let Some(user_id) = query.user_id {
        query_builder = query_builder.filter(recurring_definition::Column::UserId.eq(user_id));
    }
    if query.active_only.unwrap_or(false) {
        query_builder = query_builder.filter(recurring_definition::Column::IsActive.eq(true));
    }

    match query_builder
        .order_by_asc(recurring_definition::Column::Id)
        .all(&state.db)
        .await
    {
        Ok(definitions) => {
            info!("Successfully retrieved {} recurring definitions", definitions.len());
            let response = ApiResponse {
                data: definitions
                    .into_iter()
                    .map(RecurringDefinitionResponse::from)
                    .collect(),
                message: "Recurring definitions retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to retrieve recurring definitions: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve recurring definitions".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get a specific recurring definition by ID
#[utoipa::path(
    get,
    path = "/api/v1/recurring/{definition_id}",
    tag = "recurring",
    params(
        ("definition_id" = i32, Path, description = "Recurring definition ID"),
    ),
    responses(
        (status = 200, description = "Recurring definition retrieved successfully", body = ApiResponse<RecurringDefinitionResponse>),
        (status = 404, description = "Recurring definition not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_recurring_definition(
    Path(definition_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<
    (StatusCode, Json<ApiResponse<RecurringDefinitionResponse>>),
    (StatusCode, Json<ErrorResponse>),
> {
    trace!("Entering get_recurring_definition function");
    debug!("Fetching recurring definition with ID: {}", definition_id);

    match recurring_definition::Entity::find_by_id(definition_id).one(&state.db).await {
        Ok(Some(found)) => {
            info!("Successfully retrieved recurring definition: {}", found.description);
            let response = ApiResponse {
                data: RecurringDefinitionResponse::from(found),
                message: "Recurring definition retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Ok(None) => {
            warn!("Recurring definition with ID {} not found", definition_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Recurring definition with id {} does not exist", definition_id),
                    code: "RECURRING_DEFINITION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while fetching recurring definition: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve recurring definition".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Update a recurring definition
///
/// Concurrent edits resolve last-write-wins; predictions are always derived
/// from the stored row at read time, so no generated state needs fixing up.
#[utoipa::path(
    put,
    path = "/api/v1/recurring/{definition_id}",
    tag = "recurring",
    request_body = UpdateRecurringDefinitionRequest,
    params(
        ("definition_id" = i32, Path, description = "Recurring definition ID"),
    ),
    responses(
        (status = 200, description = "Recurring definition updated successfully", body = ApiResponse<RecurringDefinitionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Recurring definition not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_recurring_definition(
    Path(definition_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateRecurringDefinitionRequest>>,
) -> Result<
    (StatusCode, Json<ApiResponse<RecurringDefinitionResponse>>),
    (StatusCode, Json<ErrorResponse>),
> {
    trace!("Entering update_recurring_definition function");
    debug!("Updating recurring definition with ID: {}", definition_id);

    let existing = match recurring_definition::Entity::find_by_id(definition_id).one(&state.db).await
    {
        Ok(Some(found)) => found,
        Ok(None) => {
            warn!("Recurring definition with ID {} not found", definition_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Recurring definition with id {} does not exist", definition_id),
                    code: "RECURRING_DEFINITION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(e) => {
            error!("Database error while fetching recurring definition: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve recurring definition".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut update_model: recurring_definition::ActiveModel = existing.into();
    if let Some(description) = request.description {
        update_model.description = Set(description);
    }
    if let Some(kind_str) = request.kind {
        update_model.kind = Set(parse_kind(&kind_str)?);
    }
    if let Some(category_id) = request.category_id {
        update_model.category_id = Set(category_id);
    }
    if let Some(value) = request.value {
        update_model.raw_value = Set(value);
    }
    if let Some(recurrence_str) = request.recurrence {
        update_model.recurrence = Set(parse_recurrence(&recurrence_str)?);
    }
    if let Some(start_date) = request.start_date {
        update_model.start_date = Set(start_date);
    }
    if let Some(end_date) = request.end_date {
        update_model.end_date = Set(end_date);
    }
    if let Some(day_of_month) = request.day_of_month {
        update_model.day_of_month = Set(day_of_month);
    }
    if let Some(total_installments) = request.total_installments {
        update_model.total_installments = Set(Some(total_installments));
    }
    if let Some(is_active) = request.is_active {
        update_model.is_active = Set(is_active);
    }
    if let Some(selected_income_id) = request.selected_income_id {
        update_model.selected_income_id = Set(selected_income_id);
    }

    match update_model.update(&state.db).await {
        Ok(updated) => {
            info!("Successfully updated recurring definition with ID: {}", updated.id);
            let response = ApiResponse {
                data: RecurringDefinitionResponse::from(updated),
                message: "Recurring definition updated successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to update recurring definition: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update recurring definition".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a recurring definition
///
/// Transactions that already materialized occurrences keep their history;
/// their `recurring_id` link is set to null by the schema.
#[utoipa::path(
    delete,
    path = "/api/v1/recurring/{definition_id}",
    tag = "recurring",
    params(
        ("definition_id" = i32, Path, description = "Recurring definition ID"),
    ),
    responses(
        (status = 200, description = "Recurring definition deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Recurring definition not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_recurring_definition(
    Path(definition_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_recurring_definition function");
    debug!("Deleting recurring definition with ID: {}", definition_id);

    match recurring_definition::Entity::find_by_id(definition_id).one(&state.db).await {
        Ok(Some(_)) => {
            match recurring_definition::Entity::delete_by_id(definition_id).exec(&state.db).await {
                Ok(_) => {
                    info!("Successfully deleted recurring definition with ID: {}", definition_id);
                    let response = ApiResponse {
                        data: format!(
                            "Recurring definition with id {} deleted successfully",
                            definition_id
                        ),
                        message: "Recurring definition deleted successfully".to_string(),
                        success: true,
                    };
                    Ok((StatusCode::OK, Json(response)))
                }
                Err(e) => {
                    error!("Failed to delete recurring definition: {}", e);
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to delete recurring definition".to_string(),
                            code: "DATABASE_ERROR".to_string(),
                            success: false,
                        }),
                    ))
                }
            }
        }
        Ok(None) => {
            warn!("Recurring definition with ID {} not found", definition_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Recurring definition with id {} does not exist", definition_id),
                    code: "RECURRING_DEFINITION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while checking recurring definition existence: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check recurring definition existence".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
