// SeaORM entities for the discussion thread engine.

pub mod comment;
pub mod comment_like;
pub mod comment_mention;
pub mod employee;
pub mod endorsement;
pub mod post;

pub mod prelude {
    // Re-export all entities for convenience
    pub use super::comment::{
        ActiveModel as CommentActiveModel, Column as CommentColumn, CommentPriority, CommentType,
        CommentVisibility, Entity as Comment, Model as CommentModel, ModerationStatus,
    };
    pub use super::comment_like::{
        ActiveModel as CommentLikeActiveModel, Column as CommentLikeColumn, Entity as CommentLike,
        Model as CommentLikeModel,
    };
    pub use super::comment_mention::{
        ActiveModel as CommentMentionActiveModel, Column as CommentMentionColumn,
        Entity as CommentMention, MentionContext, MentionUrgency, Model as CommentMentionModel,
    };
    pub use super::employee::{
        ActiveModel as EmployeeActiveModel, Column as EmployeeColumn, Entity as Employee,
        Model as EmployeeModel,
    };
    pub use super::endorsement::{
        ActiveModel as EndorsementActiveModel, Column as EndorsementColumn, Entity as Endorsement,
        Model as EndorsementModel,
    };
    pub use super::post::{
        ActiveModel as PostActiveModel, Column as PostColumn, Entity as Post, Model as PostModel,
    };

    // Re-export commonly used SeaORM types and traits
    pub use sea_orm::{
        ActiveModelTrait, ColumnTrait, ConnectionTrait, Database, DatabaseConnection, DbConn,
        DbErr, EntityTrait, ModelTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
        QuerySelect, Related, RelationTrait, Set, TransactionTrait, Unchanged,
    };
}
