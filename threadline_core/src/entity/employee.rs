use crate::ids::EmployeeId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity/role projection consumed by the permission evaluator:
/// `manager_id` answers direct-manager lookups, `can_moderate` is the
/// role-based moderation capability, `department` scopes analytics filters.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employee")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: EmployeeId,
    pub full_name: String,
    pub manager_id: Option<EmployeeId>,
    pub can_moderate: bool,
    pub department: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ManagerId",
        to = "Column::Id"
    )]
    Manager,
}

impl ActiveModelBehavior for ActiveModel {}
