use sea_orm::entity::prelude::*;

use super::user;

/// A predicted-occurrence id the user chose to hide.
///
/// Excluded ids are filtered out of every projection until the user removes
/// the entry again; the system never clears them on its own. The underlying
/// recurring definition is untouched.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "prediction_exclusions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// Synthetic id of the form `predicted-{recurring_id}-{YYYY-MM}`.
    pub predicted_id: String,
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
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
