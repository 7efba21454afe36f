use crate::ids::{CommentId, EmployeeId, EndorsementId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Endorsement rows are written by the engagement collaborator; read here
/// for analytics, cascaded on hard delete.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "endorsement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: EndorsementId,
    pub comment_id: CommentId,
    pub endorser_id: EmployeeId,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id"
    )]
    Comment,
}

impl ActiveModelBehavior for ActiveModel {}
