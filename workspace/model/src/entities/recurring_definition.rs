use chrono::NaiveDate;
use sea_orm::entity::prelude::*;

use super::transaction::TransactionKind;
use super::{category, user};

/// Enum for recurrence types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(18))")]
pub enum RecurrenceType {
    /// Same amount every month, indefinitely (or until `end_date`).
    #[sea_orm(string_value = "fixed")]
    Fixed,
    /// A bounded series of `total_installments` monthly payments.
    #[sea_orm(string_value = "installment")]
    Installment,
    /// An amount expected monthly but typically edited when it lands.
    #[sea_orm(string_value = "variable")]
    Variable,
    /// A percentage of the month's matched income instead of a flat amount.
    #[sea_orm(string_value = "variable_by_income")]
    VariableByIncome,
}

/// A user-configured template describing a periodic income or expense.
///
/// `raw_value` keeps the value exactly as the user entered it. Depending on
/// `recurrence` it is either an amount or a percentage, and may use a comma
/// decimal separator; the compute crate owns the parsing rules.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_definitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub description: String,
    pub kind: TransactionKind,
    pub category_id: i32,
    pub raw_value: String,
    pub recurrence: RecurrenceType,
    /// The month of the first occurrence.
    pub start_date: NaiveDate,
    /// The month of the last occurrence. If null, it repeats indefinitely.
    pub end_date: Option<NaiveDate>,
    /// Day each occurrence falls on, 1-31. Clamped per target month.
    pub day_of_month: i32,
    /// Only meaningful for `Installment` recurrences.
    pub total_installments: Option<i32>,
    /// Soft pause. Inactive definitions generate no predictions.
    #[sea_orm(default_value = "true")]
    pub is_active: bool,
    /// For `VariableByIncome`: restrict income matching to this transaction.
    pub selected_income_id: Option<i32>,
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
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
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

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
