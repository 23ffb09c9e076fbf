use crate::handlers::{
    categories::{
        create_category, delete_category, get_categories, get_category, update_category,
    },
    exclusions::{create_exclusion, delete_exclusion, get_exclusions},
    health::health_check,
    months::get_month_view,
    projections::get_projection,
    recurring::{
        create_recurring_definition, delete_recurring_definition, get_recurring_definition,
        get_recurring_definitions, update_recurring_definition,
    },
    transactions::{
        create_transaction, delete_transaction, get_transaction, get_transactions,
        update_transaction,
    },
    users::{create_user, delete_user, get_user, get_users, update_user},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // User CRUD routes
        .route("/api/v1/users", post(create_user))
        .route("/api/v1/users", get(get_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id", put(update_user))
        .route("/api/v1/users/:user_id", delete(delete_user))
        // Category CRUD routes
        .route("/api/v1/categories", post(create_category))
        .route("/api/v1/categories", get(get_categories))
        .route("/api/v1/categories/:category_id", get(get_category))
        .route("/api/v1/categories/:category_id", put(update_category))
        .route("/api/v1/categories/:category_id", delete(delete_category))
        // Transaction CRUD routes
        .route("/api/v1/transactions", post(create_transaction))
        .route("/api/v1/transactions", get(get_transactions))
        .route("/api/v1/transactions/:transaction_id", get(get_transaction))
        .route("/api/v1/transactions/:transaction_id", put(update_transaction))
        .route("/api/v1/transactions/:transaction_id", delete(delete_transaction))
        // Recurring definition routes
        .route("/api/v1/recurring", post(create_recurring_definition))
        .route("/api/v1/recurring", get(get_recurring_definitions))
        .route("/api/v1/recurring/:definition_id", get(get_recurring_definition))
        .route("/api/v1/recurring/:definition_id", put(update_recurring_definition))
        .route("/api/v1/recurring/:definition_id", delete(delete_recurring_definition))
        // Reconciled month view and projection window
        .route("/api/v1/users/:user_id/months/:year/:month", get(get_month_view))
        .route("/api/v1/users/:user_id/projection", get(get_projection))
        // Prediction exclusions
        .route("/api/v1/users/:user_id/exclusions", get(get_exclusions))
        .route("/api/v1/users/:user_id/exclusions", post(create_exclusion))
        .route(
            "/api/v1/users/:user_id/exclusions/:predicted_id",
            delete(delete_exclusion),
        )
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
