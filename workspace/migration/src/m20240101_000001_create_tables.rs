use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Username).unique_key())
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(integer(Categories::UserId))
                    .col(string(Categories::Name))
                    .col(string(Categories::Kind))
                    .col(decimal_null(Categories::BudgetLimit).decimal_len(16, 4))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_category_user")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recurring_definitions table
        manager
            .create_table(
                Table::create()
                    .table(RecurringDefinitions::Table)
                    .if_not_exists()
                    .col(pk_auto(RecurringDefinitions::Id))
                    .col(integer(RecurringDefinitions::UserId))
                    .col(string(RecurringDefinitions::Description))
                    .col(string(RecurringDefinitions::Kind))
                    .col(integer(RecurringDefinitions::CategoryId))
                    .col(string(RecurringDefinitions::RawValue))
                    .col(string(RecurringDefinitions::Recurrence))
                    .col(date(RecurringDefinitions::StartDate))
                    .col(date_null(RecurringDefinitions::EndDate))
                    .col(integer(RecurringDefinitions::DayOfMonth))
                    .col(integer_null(RecurringDefinitions::TotalInstallments))
                    .col(boolean(RecurringDefinitions::IsActive).default(true))
                    .col(integer_null(RecurringDefinitions::SelectedIncomeId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_definition_user")
                            .from(RecurringDefinitions::Table, RecurringDefinitions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurring_definition_category")
                            .from(RecurringDefinitions::Table, RecurringDefinitions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create transactions table
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(pk_auto(Transactions::Id))
                    .col(integer(Transactions::UserId))
                    .col(string(Transactions::Description))
                    .col(string(Transactions::Kind))
                    .col(integer(Transactions::CategoryId))
                    .col(decimal(Transactions::Amount).decimal_len(16, 4))
                    .col(date(Transactions::Date))
                    .col(integer_null(Transactions::RecurringId))
                    .col(integer_null(Transactions::CurrentInstallment))
                    .col(integer_null(Transactions::TotalInstallments))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_user")
                            .from(Transactions::Table, Transactions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_category")
                            .from(Transactions::Table, Transactions::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transaction_recurring_definition")
                            .from(Transactions::Table, Transactions::RecurringId)
                            .to(RecurringDefinitions::Table, RecurringDefinitions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the month-view query path (user + date range)
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_user_date")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .col(Transactions::Date)
                    .to_owned(),
            )
            .await?;

        // Create prediction_exclusions table
        manager
            .create_table(
                Table::create()
                    .table(PredictionExclusions::Table)
                    .if_not_exists()
                    .col(pk_auto(PredictionExclusions::Id))
                    .col(integer(PredictionExclusions::UserId))
                    .col(string(PredictionExclusions::PredictedId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_prediction_exclusion_user")
                            .from(PredictionExclusions::Table, PredictionExclusions::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // A user can exclude a given predicted occurrence only once
        manager
            .create_index(
                Index::create()
                    .name("idx_prediction_exclusions_user_predicted")
                    .table(PredictionExclusions::Table)
                    .col(PredictionExclusions::UserId)
                    .col(PredictionExclusions::PredictedId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PredictionExclusions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecurringDefinitions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    UserId,
    Name,
    Kind,
    BudgetLimit,
}

#[derive(DeriveIden)]
enum RecurringDefinitions {
    Table,
    Id,
    UserId,
    Description,
    Kind,
    CategoryId,
    RawValue,
    Recurrence,
    StartDate,
    EndDate,
    DayOfMonth,
    TotalInstallments,
    IsActive,
    SelectedIncomeId,
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Description,
    Kind,
    CategoryId,
    Amount,
    Date,
    RecurringId,
    CurrentInstallment,
    TotalInstallments,
}

#[derive(DeriveIden)]
enum PredictionExclusions {
    Table,
    Id,
    UserId,
    PredictedId,
}
