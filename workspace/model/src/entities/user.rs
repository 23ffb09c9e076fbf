use sea_orm::entity::prelude::*;

/// Represents a user of the system.
///
/// Authentication itself lives in the hosting layer; the backend only needs
/// a stable identity to scope transactions, categories, recurring
/// definitions, and prediction exclusions.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transaction,
    #[sea_orm(has_many = "super::recurring_definition::Entity")]
    RecurringDefinition,
    #[sea_orm(has_many = "super::category::Entity")]
    Category,
    #[sea_orm(has_many = "super::prediction_exclusion::Entity")]
    PredictionExclusion,
}

impl ActiveModelBehavior for ActiveModel {}
