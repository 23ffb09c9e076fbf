use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::category;
use model::entities::transaction::TransactionKind;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub user_id: i32,
    /// Category name
    pub name: String,
    /// "income" or "expense"
    pub kind: String,
    /// Optional monthly budget limit for the category
    #[schema(value_type = Option<String>, example = "500.00")]
    pub budget_limit: Option<Decimal>,
}

/// Request body for updating a category
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateCategoryRequest {
    /// Category name
    pub name: Option<String>,
    /// "income" or "expense"
    pub kind: Option<String>,
    /// Monthly budget limit; send null to clear it
    #[schema(value_type = Option<String>, example = "500.00")]
    pub budget_limit: Option<Option<Decimal>>,
}

/// Category response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub kind: String,
    #[schema(value_type = Option<String>, example = "500.00")]
    pub budget_limit: Option<Decimal>,
}

impl From<category::Model> for CategoryResponse {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            kind: model.kind.as_str().to_string(),
            budget_limit: model.budget_limit,
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

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn create_category(
    State(state): State<AppState>,
    Json(request): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_category function");
    debug!("Creating category: {}", request.name);

    let kind = parse_kind(&request.kind)?;

    let new_category = category::ActiveModel {
        user_id: Set(request.user_id),
        name: Set(request.name),
        kind: Set(kind),
        budget_limit: Set(request.budget_limit),
        ..Default::default()
    };

    match new_category.insert(&state.db).await {
        Ok(created) => {
            info!("Successfully created category with ID: {}", created.id);
            let response = ApiResponse {
                data: CategoryResponse::from(created),
                message: "Category created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(e) => {
            error!("Failed to create category: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to create category".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get all categories
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    responses(
        (status = 200, description = "Categories retrieved successfully", body = ApiResponse<Vec<CategoryResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<CategoryResponse>>>), (StatusCode, Json<ErrorResponse>)>
{
    trace!("Entering get_categories function");

    match category::Entity::find()
        .order_by_asc(category::Column::Name)
        .all(&state.db)
        .await
    {
        Ok(categories) => {
            info!("Successfully retrieved {} categories", categories.len());
            let response = ApiResponse {
                data: categories.into_iter().map(CategoryResponse::from).collect(),
                message: "Categories retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to retrieve categories: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve categories".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Get a specific category by ID
#[utoipa::path(
    get,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category retrieved successfully", body = ApiResponse<CategoryResponse>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn get_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_category function");
    debug!("Fetching category with ID: {}", category_id);

    match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(found)) => {
            info!("Successfully retrieved category: {}", found.name);
            let response = ApiResponse {
                data: CategoryResponse::from(found),
                message: "Category retrieved successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Category with id {} does not exist", category_id),
                    code: "CATEGORY_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while fetching category: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve category".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Update a category
#[utoipa::path(
    put,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    request_body = UpdateCategoryRequest,
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category updated successfully", body = ApiResponse<CategoryResponse>),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn update_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateCategoryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_category function");
    debug!("Updating category with ID: {}", category_id);

    let existing = match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(found)) => found,
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Category with id {} does not exist", category_id),
                    code: "CATEGORY_NOT_FOUND".to_string(),
                    success: false,
                }),
            ));
        }
        Err(e) => {
            error!("Database error while fetching category: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to retrieve category".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ));
        }
    };

    let mut update_model: category::ActiveModel = existing.into();
    if let Some(name) = request.name {
        update_model.name = Set(name);
    }
    if let Some(kind_str) = request.kind {
        update_model.kind = Set(parse_kind(&kind_str)?);
    }
    if let Some(budget_limit) = request.budget_limit {
        update_model.budget_limit = Set(budget_limit);
    }

    match update_model.update(&state.db).await {
        Ok(updated) => {
            info!("Successfully updated category with ID: {}", updated.id);
            let response = ApiResponse {
                data: CategoryResponse::from(updated),
                message: "Category updated successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::OK, Json(response)))
        }
        Err(e) => {
            error!("Failed to update category: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to update category".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{category_id}",
    tag = "categories",
    params(
        ("category_id" = i32, Path, description = "Category ID"),
    ),
    responses(
        (status = 200, description = "Category deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument]
pub async fn delete_category(
    Path(category_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<String>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering delete_category function");
    debug!("Deleting category with ID: {}", category_id);

    match category::Entity::find_by_id(category_id).one(&state.db).await {
        Ok(Some(_)) => match category::Entity::delete_by_id(category_id).exec(&state.db).await {
            Ok(_) => {
                info!("Successfully deleted category with ID: {}", category_id);
                let response = ApiResponse {
                    data: format!("Category with id {} deleted successfully", category_id),
                    message: "Category deleted successfully".to_string(),
                    success: true,
                };
                Ok((StatusCode::OK, Json(response)))
            }
            Err(e) => {
                error!("Failed to delete category: {}", e);
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse {
                        error: "Failed to delete category".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    }),
                ))
            }
        },
        Ok(None) => {
            warn!("Category with ID {} not found", category_id);
            Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Category with id {} does not exist", category_id),
                    code: "CATEGORY_NOT_FOUND".to_string(),
                    success: false,
                }),
            ))
        }
        Err(e) => {
            error!("Database error while checking category existence: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to check category existence".to_string(),
                    code: "DATABASE_ERROR".to_string(),
                    success: false,
                }),
            ))
        }
    }
}
