use thiserror::Error;

use crate::entity::comment::{CommentType, ModerationStatus};

/// Failure kinds shared by every discussion service.
///
/// All validation failures are detected before any write is attempted, so a
/// returned error always means the store was left untouched. Only `Db` wraps
/// genuinely unexpected storage failures; callers should treat those as
/// transient.
#[derive(Debug, Error)]
pub enum ThreadError {
    #[error("fatal database error")]
    Db(#[from] sea_orm::DbErr),

    #[error("post not found")]
    PostNotFound,

    #[error("comment not found")]
    CommentNotFound,

    #[error("parent comment not found")]
    ParentNotFound,

    #[error("employee not found")]
    EmployeeNotFound,

    #[error("actor is not permitted to perform this action")]
    Forbidden,

    #[error("moderation transition from '{from}' to '{to}' is not permitted")]
    InvalidTransition {
        from: ModerationStatus,
        to: ModerationStatus,
    },

    #[error("comments of type '{0}' cannot be resolved")]
    UnsupportedType(CommentType),

    #[error("comment is already resolved")]
    AlreadyResolved,

    #[error("comment is already in the requested highlight state")]
    AlreadyInState,

    #[error("moderated comment content cannot be edited")]
    ModeratedContentImmutable,
}
