use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use super::{category, recurring_definition, user};

/// Whether money flows into or out of the user's ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(7))")]
pub enum TransactionKind {
    #[sea_orm(string_value = "income")]
    Income,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

/// A real, persisted transaction.
///
/// When a transaction materializes an occurrence of a recurring definition,
/// `recurring_id` links back to it. For installment recurrences the
/// occurrence's position is recorded in `current_installment` /
/// `total_installments` so reconciliation can match the exact slot.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub kind: TransactionKind,
    pub category_id: i32,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    pub date: NaiveDate,
    /// The recurring definition this transaction settles, if any.
    pub recurring_id: Option<i32>,
    pub current_installment: Option<i32>,
    pub total_installments: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "user::Entity",
        from = "Column::UserId",
        to = "user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "category::Entity",
        from = "Column::CategoryId",
        to = "category::Column::Id",
        on_delete = "Cascade"
    )]
    Category,
    #[sea_orm(
        belongs_to = "recurring_definition::Entity",
        from = "Column::RecurringId",
        to = "recurring_definition::Column::Id",
        on_delete = "SetNull"
    )]
    RecurringDefinition,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<recurring_definition::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringDefinition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
