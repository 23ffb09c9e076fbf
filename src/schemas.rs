use common::{ExclusionView, MonthView, ProjectionView, TransactionView};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::categories::create_category,
        crate::handlers::categories::get_categories,
        crate::handlers::categories::get_category,
        crate::handlers::categories::update_category,
        crate::handlers::categories::delete_category,
        crate::handlers::transactions::create_transaction,
        crate::handlers::transactions::get_transactions,
        crate::handlers::transactions::get_transaction,
        crate::handlers::transactions::update_transaction,
        crate::handlers::transactions::delete_transaction,
        crate::handlers::recurring::create_recurring_definition,
        crate::handlers::recurring::get_recurring_definitions,
        crate::handlers::recurring::get_recurring_definition,
        crate::handlers::recurring::update_recurring_definition,
        crate::handlers::recurring::delete_recurring_definition,
        crate::handlers::months::get_month_view,
        crate::handlers::projections::get_projection,
        crate::handlers::exclusions::get_exclusions,
        crate::handlers::exclusions::create_exclusion,
        crate::handlers::exclusions::delete_exclusion,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            TransactionView,
            MonthView,
            ProjectionView,
            ExclusionView,
            crate::handlers::users::CreateUserRequest,
            crate::handlers::users::UpdateUserRequest,
            crate::handlers::users::UserResponse,
            crate::handlers::categories::CreateCategoryRequest,
            crate::handlers::categories::UpdateCategoryRequest,
            crate::handlers::categories::CategoryResponse,
            crate::handlers::transactions::CreateTransactionRequest,
            crate::handlers::transactions::UpdateTransactionRequest,
            crate::handlers::transactions::TransactionResponse,
            crate::handlers::recurring::CreateRecurringDefinitionRequest,
            crate::handlers::recurring::UpdateRecurringDefinitionRequest,
            crate::handlers::recurring::RecurringDefinitionResponse,
            crate::handlers::exclusions::CreateExclusionRequest,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "User management endpoints"),
        (name = "categories", description = "Category management endpoints"),
        (name = "transactions", description = "Transaction management endpoints"),
        (name = "recurring", description = "Recurring definition endpoints"),
        (name = "months", description = "Reconciled month view endpoints"),
        (name = "projections", description = "Prediction window endpoints"),
        (name = "exclusions", description = "Prediction exclusion endpoints"),
    ),
    info(
        title = "FinWise API",
        description = "Personal finance tracker with recurring-transaction projection and month reconciliation",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
