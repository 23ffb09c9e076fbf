use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::NaiveDate;
use model::entities::transaction::{self, TransactionKind};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
pub struct TransactionQuery {
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 50)
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u64>,
    /// Filter by user ID
    pub user_id: Option<i32>,
    /// Filter by kind ("income" or "expense")
    pub kind: Option<String>,
    /// Filter by category ID
    pub category_id: Option<i32>,
    /// Only transactions on or after this date
    pub start_date: Option<NaiveDate>,
    /// Only transactions on or before this date
    pub end_date: Option<NaiveDate>,
}

/// Request body for creating a transaction
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct CreateTransactionRequest {
    pub user_id: i32,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    /// "income" or "expense"
    pub kind: String,
    pub category_id: i32,
    #[schema(value_type = String, example = "123.45")]
    pub amount: Decimal,
    pub date: NaiveDate,
    /// Recurring definition this transaction realizes, if any
    pub recurring_id: Option<i32>,
    /// Installment number within the plan (1-based)
    #[validate(range(min = 1, max = 480))]
    pub current_installment: Option<i32>,
    /// Total installments in the plan
    #[validate(range(min = 1, max = 480))]
    pub total_installments: Option<i32>,
}

/// Request body for updating a transaction
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct UpdateTransactionRequest {
    #[validate(length(min = 1, max = 255))]
    pub description: Option<String>,
    /// "income" or "expense"
    pub kind: Option<String>,
    pub category_id: Option<i32>,
    #[schema(value_type = Option<String>, example = "123.45")]
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
}

/// Transaction response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub kind: String,
    pub category_id: i32,
    #[schema(value_type = String, example = "123.45")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub recurring_id: Option<i32>,
    pub current_installment: Option<i32>,
    pub total_installments: Option<i32>,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(model: transaction::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            description: model.description,
            kind: model.kind.as_str().to_string(),
            category_id: model.category_id,
            amount: model.amount,
            date: model.date,
            recurring_id: model.recurring_id,
            current_installment: model.current_installment,
            total_installments: model.total_installments,
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

/// Create a new transaction
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_transaction(
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<CreateTransactionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering create_transaction function");
    debug!(
        "Creating transaction '{}' for user {}",
        request.description, request.user_id
    );

    let kind = parse_kind(&request.kind)?;

    let new_transaction = transaction::ActiveModel {
        user_id: Set(request.user_id),
        description: Set(request.description),
        kind: Set(kind),
        category_id: Set(request.category_id),
        amount: Set(request.amount),
        date: Set(request.date),
        recurring_id: Set(request.recurring_id),
        current_installment: Set(request.current_installment),
        total_installments: Set(request.total_installments),
        ..Default::default()
    };

    match new_transaction.insert(&state.db).await {
        Ok(created) => {
            info!("Successfully created transaction with ID: {}", created.id);
            let response = ApiResponse {
                data: TransactionResponse::from(created),
                message: "Transaction created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to create transaction: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get all transactions with optional filtering and pagination
#[utoipa::path(
    get,
    path = "/api/v1/transactions",
    tag = "transactions",
    params(TransactionQuery),
    responses(
        (status = 200, description = "Transactions retrieved successfully", body = ApiResponse<Vec<TransactionResponse>>),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transactions(
    Valid(Query(query)): Valid<Query<TransactionQuery>>,
    State(state): State<AppState>,
) -> Result<
    (StatusCode, Json<ApiResponse<Vec<TransactionResponse>>>),
    (StatusCode, Json<ErrorResponse>),
> {
    trace!("Entering get_transactions function");

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    debug!("Fetching transactions - page: {}, limit: {}", page, limit);

    let mut query_builder = transaction::Entity::find();

    if let Some(user_id) = query.user_id {
        query_builder = query_builder.filter(transaction::Column::UserId.eq(user_id));
    }
    if let Some(kind_str) = query.kind {
        let kind = parse_kind(&kind_str)?;
        query_builder = query_builder.filter(transaction::Column::Kind.eq(kind));
    }
    if let Some(category_id) = query.category_id {
        query_builder = query_builder.filter(transaction::Column::CategoryId.eq(category_id));
    }
    if let Some(start_date) = query.start_date {
        query_builder = query_builder.filter(transaction::Column::Date.gte(start_date));
    }
    if let Some(end_date) = query.end_date {
        query_builder = query_builder.filter(transaction::Column::Date.lte(end_date));
    }

    match query_builder
        .order_by_desc(transaction::Column::Date)
        .order_by_asc(transaction::Column::Id)
        .paginate(&state.db, limit)
        .fetch_page(page - 1)
        .await
    {
        Ok(transactions) => {
            info!("Successfully retrieved {} transactions", transactions.len());
            let response = ApiResponse {
                data: transactions
                    .into_iter()
                    .map(TransactionResponse::from)
                    .collect(),
                message: "Transactions retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to retrieve transactions: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve transactions".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction retrieved successfully", body = ApiResponse<TransactionResponse>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering get_transaction function");
    debug!("Fetching transaction with ID: {}", transaction_id);

    match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
        Ok(Some(found)) => {
            info!("Successfully retrieved transaction: {}", found.id);
            let response = ApiResponse {
                data: TransactionResponse::from(found),
                message: "Transaction retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Transaction with id {} does not exist", transaction_id),
                    code: "TRANSACTION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while fetching transaction: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Update a transaction
#[utoipa::path(
    put,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    request_body = UpdateTransactionRequest,
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction updated successfully", body = ApiResponse<TransactionResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
    Valid(Json(request)): Valid<Json<UpdateTransactionRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<TransactionResponse>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering update_transaction function");
    debug!("Updating transaction with ID: {}", transaction_id);

    let existing = match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Transaction with id {} does not exist", transaction_id),
                    code: "TRANSACTION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(e) => {
            error!("Database error while fetching transaction: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut update_model: transaction::ActiveModel = existing.into();
    if let Some(description) = request.description {
        update_model.description = Set(description);
    }
    if let Some(kind_str) = request.kind {
        update_model.kind = Set(parse_kind(&kind_str)?);
    }
    if let Some(category_id) = request.category_id {
        update_model.category_id = Set(category_id);
    }
    if let Some(amount) = request.amount {
        update_model.amount = Set(amount);
    }
    if let Some(date) = request.date {
        update_model.date = Set(date);
    }

    match update_model.update(&state.db).await {
        Ok(updated) => {
            info!("Successfully updated transaction with ID: {}", updated.id);
            let response = ApiResponse {
                data: TransactionResponse::from(updated),
                message: "Transaction updated successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to update transaction: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update transaction".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a transaction
#[utoipa::path(
    delete,
    path = "/api/v1/transactions/{transaction_id}",
    tag = "transactions",
    params(
        ("transaction_id" = i32, Path, description = "Transaction ID"),
    ),
    responses(
        (status = 200, description = "Transaction deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_transaction(
    Path(transaction_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_transaction function");
    debug!("Deleting transaction with ID: {}", transaction_id);

    match transaction::Entity::find_by_id(transaction_id).one(&state.db).await {
        Ok(Some(_)) => {
            match transaction::Entity::delete_by_id(transaction_id).exec(&state.db).await {
                Ok(_) => {
                    info!("Successfully deleted transaction with ID: {}", transaction_id);
                    let response = ApiResponse {
                        data: format!("Transaction with id {} deleted successfully", transaction_id),
                        message: "Transaction deleted successfully".to_string(),
                        success: true,
                    };
                    Ok((StatusCode::OK, Json(response)))
                }
                Err(e) => {
                    error!("Failed to delete transaction: {}", e);
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to delete transaction".to_string(),
                            code: "DATABASE_ERROR".to_string(),
                            success: false,
                        }),
                    ))
                }
            }
        }
        Ok(None) => {
            warn!("Transaction with ID {} not found", transaction_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Transaction with id {} does not exist", transaction_id),
                    code: "TRANSACTION_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while checking transaction existence: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check transaction existence".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
