#[cfg(test)]
mod integration_tests {
    use crate::handlers::categories::CreateCategoryRequest;
    use crate::handlers::exclusions::CreateExclusionRequest;
    use crate::handlers::recurring::CreateRecurringDefinitionRequest;
    use crate::handlers::transactions::CreateTransactionRequest;
    use crate::handlers::users::{CreateUserRequest, UpdateUserRequest};
    use crate::schemas::{ApiResponse, ErrorResponse};
    use crate::test_utils::test_utils::setup_test_app;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use common::{MonthView, ProjectionView};
    use rust_decimal::Decimal;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    async fn create_test_category(server: &TestServer) -> i32 {
        let response = server
            .post("/api/v1/categories")
            .json(&CreateCategoryRequest {
                user_id: 1,
                name: "Housing".to_string(),
                kind: "expense".to_string(),
                budget_limit: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    async fn create_rent_definition(server: &TestServer, category_id: i32) -> i32 {
        let response = server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Rent".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "800,00".to_string(),
                recurrence: "fixed".to_string(),
                start_date: ymd(2024, 1, 5),
                end_date: None,
                day_of_month: 5,
                total_installments: None,
                selected_income_id: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/users")
            .json(&CreateUserRequest {
                username: "testuser".to_string(),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "User created successfully");
        assert_eq!(body.data["username"], "testuser");
        assert!(body.data["id"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_get_users() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users").await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert!(body.success);
        assert_eq!(body.message, "Users retrieved successfully");
        // The two seeded test users
        assert_eq!(body.data.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/v1/users/9999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert!(!body.success);
        assert_eq!(body.code, "USER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_update_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .put("/api/v1/users/1")
            .json(&UpdateUserRequest {
                username: Some("renamed".to_string()),
            })
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.message, "User updated successfully");
        assert_eq!(body.data["username"], "renamed");
    }

    #[tokio::test]
    async fn test_delete_user() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.delete("/api/v1/users/2").await;
        response.assert_status(StatusCode::OK);

        let response = server.get("/api/v1/users/2").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_category_with_budget_limit() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/categories")
            .json(&CreateCategoryRequest {
                user_id: 1,
                name: "Groceries".to_string(),
                kind: "expense".to_string(),
                budget_limit: Some(Decimal::new(50000, 2)),
            })
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.message, "Category created successfully");
        assert_eq!(body.data["name"], "Groceries");
        let limit: Decimal = body.data["budget_limit"].as_str().unwrap().parse().unwrap();
        assert_eq!(limit, Decimal::new(50000, 2));
    }

    #[tokio::test]
    async fn test_create_category_rejects_unknown_kind() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/v1/categories")
            .json(&CreateCategoryRequest {
                user_id: 1,
                name: "Broken".to_string(),
                kind: "sideways".to_string(),
                budget_limit: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_TRANSACTION_KIND");
    }

    #[tokio::test]
    async fn test_create_and_filter_transactions() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let salary = CreateTransactionRequest {
            user_id: 1,
            description: "Salary".to_string(),
            kind: "income".to_string(),
            category_id,
            amount: Decimal::new(300000, 2),
            date: ymd(2024, 3, 1),
            recurring_id: None,
            current_installment: None,
            total_installments: None,
        };
        let groceries = CreateTransactionRequest {
            user_id: 1,
            description: "Groceries".to_string(),
            kind: "expense".to_string(),
            category_id,
            amount: Decimal::new(12050, 2),
            date: ymd(2024, 3, 9),
            recurring_id: None,
            current_installment: None,
            total_installments: None,
        };

        server.post("/api/v1/transactions").json(&salary).await.assert_status(StatusCode::CREATED);
        server.post("/api/v1/transactions").json(&groceries).await.assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/v1/transactions")
            .add_query_param("user_id", "1")
            .add_query_param("kind", "income")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        let items = body.data.as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["description"], "Salary");
        let amount: Decimal = items[0]["amount"].as_str().unwrap().parse().unwrap();
        assert_eq!(amount, Decimal::new(300000, 2));
    }

    #[tokio::test]
    async fn test_transaction_rejects_unknown_kind() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let response = server
            .post("/api/v1/transactions")
            .json(&CreateTransactionRequest {
                user_id: 1,
                description: "Broken".to_string(),
                kind: "transfer".to_string(),
                category_id,
                amount: Decimal::from(10),
                date: ymd(2024, 3, 1),
                recurring_id: None,
                current_installment: None,
                total_installments: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_TRANSACTION_KIND");
    }

    #[tokio::test]
    async fn test_create_recurring_definition() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let definition_id = create_rent_definition(&server, category_id).await;

        let response = server.get(&format!("/api/v1/recurring/{definition_id}")).await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.message, "Recurring definition retrieved successfully");
        assert_eq!(body.data["value"], "800,00");
        assert_eq!(body.data["recurrence"], "fixed");
        assert_eq!(body.data["is_active"], true);
    }

    #[tokio::test]
    async fn test_recurring_rejects_unknown_recurrence() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let response = server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Broken".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "100".to_string(),
                recurrence: "weekly".to_string(),
                start_date: ymd(2024, 1, 1),
                end_date: None,
                day_of_month: 1,
                total_installments: None,
                selected_income_id: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_RECURRENCE_TYPE");
    }

    #[tokio::test]
    async fn test_installment_requires_total() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let response = server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Laptop".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "300".to_string(),
                recurrence: "installment".to_string(),
                start_date: ymd(2024, 1, 10),
                end_date: None,
                day_of_month: 10,
                total_installments: None,
                selected_income_id: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "MISSING_TOTAL_INSTALLMENTS");
    }

    #[tokio::test]
    async fn test_recurring_validates_day_of_month() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let response = server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Broken".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "100".to_string(),
                recurrence: "fixed".to_string(),
                start_date: ymd(2024, 1, 1),
                end_date: None,
                day_of_month: 0,
                total_installments: None,
                selected_income_id: None,
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_month_view_shows_prediction() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;
        let definition_id = create_rent_definition(&server, category_id).await;

        let response = server
            .get("/api/v1/users/1/months/2024/3")
            .add_query_param("today", "2024-03-15")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.message, "Month view retrieved successfully");
        assert_eq!(body.data.entries.len(), 1);
        let entry = &body.data.entries[0];
        assert!(entry.is_predicted);
        assert_eq!(entry.id, format!("predicted-{definition_id}-2024-03"));
        assert_eq!(entry.amount, Decimal::new(80000, 2));
        assert_eq!(entry.date, ymd(2024, 3, 5));
        assert_eq!(body.data.expense_total, Decimal::new(80000, 2));
        assert_eq!(body.data.income_total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_real_transaction_supersedes_prediction() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;
        let definition_id = create_rent_definition(&server, category_id).await;

        // The rent for March has been paid, slightly off schedule.
        server
            .post("/api/v1/transactions")
            .json(&CreateTransactionRequest {
                user_id: 1,
                description: "Rent March".to_string(),
                kind: "expense".to_string(),
                category_id,
                amount: Decimal::new(80000, 2),
                date: ymd(2024, 3, 7),
                recurring_id: Some(definition_id),
                current_installment: None,
                total_installments: None,
            })
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/v1/users/1/months/2024/3")
            .add_query_param("today", "2024-03-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.data.entries.len(), 1);
        assert!(!body.data.entries[0].is_predicted);
        assert_eq!(body.data.entries[0].date, ymd(2024, 3, 7));

        // April is untouched, so its prediction still shows.
        let response = server
            .get("/api/v1/users/1/months/2024/4")
            .add_query_param("today", "2024-03-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.data.entries.len(), 1);
        assert!(body.data.entries[0].is_predicted);
    }

    #[tokio::test]
    async fn test_past_month_view_shows_unsettled_prediction() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;
        let definition_id = create_rent_definition(&server, category_id).await;

        // January lies behind today but its rent was never settled, so the
        // prediction still fills the slot.
        let response = server
            .get("/api/v1/users/1/months/2024/1")
            .add_query_param("today", "2024-03-15")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.data.entries.len(), 1);
        assert!(body.data.entries[0].is_predicted);
        assert_eq!(
            body.data.entries[0].id,
            format!("predicted-{definition_id}-2024-01")
        );
    }

    #[tokio::test]
    async fn test_month_view_rejects_invalid_month() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .get("/api/v1/users/1/months/2024/13")
            .add_query_param("today", "2024-03-15")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "INVALID_MONTH");
    }

    #[tokio::test]
    async fn test_projection_window() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;
        let definition_id = create_rent_definition(&server, category_id).await;

        let response = server
            .get("/api/v1/users/1/projection")
            .add_query_param("today", "2024-01-15")
            .add_query_param("months_ahead", "3")
            .await;

        response.assert_status(StatusCode::OK);
        let body: ApiResponse<ProjectionView> = response.json();
        assert_eq!(body.message, "Projection retrieved successfully");
        assert_eq!(body.data.months_ahead, 3);
        // January through April inclusive
        assert_eq!(body.data.entries.len(), 4);
        assert_eq!(
            body.data.entries[0].id,
            format!("predicted-{definition_id}-2024-01")
        );
        assert!(body.data.entries.iter().all(|e| e.is_predicted));
    }

    #[tokio::test]
    async fn test_exclusion_lifecycle() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;
        let definition_id = create_rent_definition(&server, category_id).await;
        let predicted_id = format!("predicted-{definition_id}-2024-03");

        // Exclude the March prediction.
        let response = server
            .post("/api/v1/users/1/exclusions")
            .json(&CreateExclusionRequest {
                predicted_id: predicted_id.clone(),
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        // It no longer shows in the month view.
        let response = server
            .get("/api/v1/users/1/months/2024/3")
            .add_query_param("today", "2024-03-15")
            .await;
        let body: ApiResponse<MonthView> = response.json();
        assert!(body.data.entries.is_empty());

        // Excluding the same id again conflicts.
        let response = server
            .post("/api/v1/users/1/exclusions")
            .json(&CreateExclusionRequest {
                predicted_id: predicted_id.clone(),
            })
            .await;
        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "EXCLUSION_EXISTS");

        // It is listed.
        let response = server.get("/api/v1/users/1/exclusions").await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<serde_json::Value> = response.json();
        assert_eq!(body.data.as_array().unwrap().len(), 1);
        assert_eq!(body.data[0]["predicted_id"], predicted_id);

        // Deleting it brings the prediction back.
        let response = server
            .delete(&format!("/api/v1/users/1/exclusions/{predicted_id}"))
            .await;
        response.assert_status(StatusCode::OK);

        let response = server
            .get("/api/v1/users/1/months/2024/3")
            .add_query_param("today", "2024-03-15")
            .await;
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.data.entries.len(), 1);
        assert_eq!(body.data.entries[0].id, predicted_id);

        // A second delete finds nothing.
        let response = server
            .delete(&format!("/api/v1/users/1/exclusions/{predicted_id}"))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "EXCLUSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_installment_prediction_in_month_view() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        let response = server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Laptop".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "300".to_string(),
                recurrence: "installment".to_string(),
                start_date: ymd(2024, 1, 10),
                end_date: None,
                day_of_month: 10,
                total_installments: Some(3),
                selected_income_id: None,
            })
            .await;
        response.assert_status(StatusCode::CREATED);

        // February carries the second of three installments.
        let response = server
            .get("/api/v1/users/1/months/2024/2")
            .add_query_param("today", "2024-01-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert_eq!(body.data.entries.len(), 1);
        assert_eq!(body.data.entries[0].current_installment, Some(2));
        assert_eq!(body.data.entries[0].total_installments, Some(3));

        // April is past the series; nothing shows.
        let response = server
            .get("/api/v1/users/1/months/2024/4")
            .add_query_param("today", "2024-01-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();
        assert!(body.data.entries.is_empty());
    }

    #[tokio::test]
    async fn test_variable_by_income_prediction() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();
        let category_id = create_test_category(&server).await;

        // Real income in March
        server
            .post("/api/v1/transactions")
            .json(&CreateTransactionRequest {
                user_id: 1,
                description: "Salary".to_string(),
                kind: "income".to_string(),
                category_id,
                amount: Decimal::new(300000, 2),
                date: ymd(2024, 3, 1),
                recurring_id: None,
                current_installment: None,
                total_installments: None,
            })
            .await
            .assert_status(StatusCode::CREATED);

        // Savings rate: 10% of the month's income
        server
            .post("/api/v1/recurring")
            .json(&CreateRecurringDefinitionRequest {
                user_id: 1,
                description: "Savings".to_string(),
                kind: "expense".to_string(),
                category_id,
                value: "10".to_string(),
                recurrence: "variable_by_income".to_string(),
                start_date: ymd(2024, 1, 1),
                end_date: None,
                day_of_month: 28,
                total_installments: None,
                selected_income_id: None,
            })
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get("/api/v1/users/1/months/2024/3")
            .add_query_param("today", "2024-03-15")
            .await;
        response.assert_status(StatusCode::OK);
        let body: ApiResponse<MonthView> = response.json();

        let savings = body
            .data
            .entries
            .iter()
            .find(|e| e.is_predicted)
            .expect("expected a predicted savings entry");
        assert_eq!(savings.amount, Decimal::from(300));
        assert_eq!(savings.date, ymd(2024, 3, 28));
        // The real salary passes through untouched alongside it.
        assert_eq!(body.data.income_total, Decimal::from(3000));
    }
}
