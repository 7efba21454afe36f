use crate::ids::{CommentId, EmployeeId, LikeId};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Like rows are written by the engagement collaborator; the engine reads
/// them for analytics and removes them when hard-deleting the comment.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: LikeId,
    pub comment_id: CommentId,
    pub employee_id: EmployeeId,
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
