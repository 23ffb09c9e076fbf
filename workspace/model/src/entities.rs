//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the finance tracking application here:
//! users, categories with budget limits, real transactions, recurring
//! definitions, and the per-user prediction exclusion set.

pub mod category;
pub mod prediction_exclusion;
pub mod recurring_definition;
pub mod transaction;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::category::Entity as Category;
    pub use super::prediction_exclusion::Entity as PredictionExclusion;
    pub use super::recurring_definition::Entity as RecurringDefinition;
    pub use super::transaction::Entity as Transaction;
    pub use super::user::Entity as User;
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal::Decimal;
    use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbErr,
        EntityTrait, QueryFilter, Set,
    };

    use super::*;
    use prelude::*;

    async fn setup_db() -> Result<DatabaseConnection, DbErr> {
        // Connect to the SQLite database
        let db = Database::connect("sqlite::memory:").await?;

        // Enable foreign keys
        db.execute_unprepared("PRAGMA foreign_keys = ON;").await?;

        Migrator::up(&db, None).await.expect("Migrations failed.");

        Ok(db)
    }

    async fn seed_user(db: &DatabaseConnection) -> Result<user::Model, DbErr> {
        user::ActiveModel {
            username: Set("alice".to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    async fn seed_category(db: &DatabaseConnection, user_id: i32) -> Result<category::Model, DbErr> {
        category::ActiveModel {
            user_id: Set(user_id),
            name: Set("Housing".to_string()),
            kind: Set(transaction::TransactionKind::Expense),
            budget_limit: Set(Some(Decimal::new(150000, 2))),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    #[tokio::test]
    async fn test_transaction_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let user = seed_user(&db).await?;
        let category = seed_category(&db, user.id).await?;

        let tx = transaction::ActiveModel {
            user_id: Set(user.id),
            description: Set("Rent".to_string()),
            kind: Set(transaction::TransactionKind::Expense),
            category_id: Set(category.id),
            amount: Set(Decimal::new(120000, 2)),
            date: Set(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()),
            recurring_id: Set(None),
            current_installment: Set(None),
            total_installments: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let found = Transaction::find_by_id(tx.id).one(&db).await?.unwrap();
        assert_eq!(found.description, "Rent");
        assert_eq!(found.kind, transaction::TransactionKind::Expense);
        assert_eq!(found.amount, Decimal::new(120000, 2));
        Ok(())
    }

    #[tokio::test]
    async fn test_recurring_definition_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let user = seed_user(&db).await?;
        let category = seed_category(&db, user.id).await?;

        let def = recurring_definition::ActiveModel {
            user_id: Set(user.id),
            description: Set("Car loan".to_string()),
            kind: Set(transaction::TransactionKind::Expense),
            category_id: Set(category.id),
            raw_value: Set("450,00".to_string()),
            recurrence: Set(recurring_definition::RecurrenceType::Installment),
            start_date: Set(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()),
            end_date: Set(None),
            day_of_month: Set(10),
            total_installments: Set(Some(24)),
            is_active: Set(true),
            selected_income_id: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let found = RecurringDefinition::find()
            .filter(recurring_definition::Column::UserId.eq(user.id))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(found.id, def.id);
        assert_eq!(
            found.recurrence,
            recurring_definition::RecurrenceType::Installment
        );
        assert_eq!(found.raw_value, "450,00");
        assert_eq!(found.total_installments, Some(24));
        assert!(found.is_active);
        Ok(())
    }

    #[tokio::test]
    async fn test_prediction_exclusion_round_trip() -> Result<(), DbErr> {
        let db = setup_db().await?;
        let user = seed_user(&db).await?;

        prediction_exclusion::ActiveModel {
            user_id: Set(user.id),
            predicted_id: Set("predicted-7-2024-05".to_string()),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let found = PredictionExclusion::find()
            .filter(prediction_exclusion::Column::UserId.eq(user.id))
            .all(&db)
            .await?;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].predicted_id, "predicted-7-2024-05");
        Ok(())
    }
}
