use crate::ids::{CommentId, EmployeeId, PostId};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A unit of discussion attached to a post, optionally nested under a parent
/// comment. Hierarchy is modelled as a parent-id foreign key only; children
/// are computed on demand via the indexed `parent_comment_id` column, and
/// `thread_path` reconstructs display order without recursive queries.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: CommentId,
    pub post_id: PostId,
    pub author_id: EmployeeId,
    pub parent_comment_id: Option<CommentId>,

    pub content: String,
    pub kind: CommentType,
    pub visibility: CommentVisibility,
    pub priority: CommentPriority,
    pub is_confidential: bool,

    /// Nesting depth, root = 0. Always parent.thread_level + 1 for replies.
    pub thread_level: i32,
    /// `/`-joined chain of ancestor id segments, oldest first; empty for
    /// roots. A child's path always starts with its parent's path; display
    /// order sorts by this path extended with the comment's own id.
    pub thread_path: String,
    /// Denormalized count of direct children, maintained by the lifecycle
    /// service and recoverable via `reconcile_reply_count`.
    pub reply_count: i32,

    pub moderation_status: ModerationStatus,
    pub moderated_by_id: Option<EmployeeId>,
    pub moderated_at: Option<DateTimeUtc>,
    pub moderation_reason: Option<String>,
    pub is_flagged: bool,

    pub is_resolved: bool,
    pub resolved_by_id: Option<EmployeeId>,
    pub resolved_at: Option<DateTimeUtc>,
    pub resolution_note: Option<String>,

    pub is_edited: bool,
    pub edited_at: Option<DateTimeUtc>,
    pub is_highlighted: bool,
    pub is_deleted: bool,

    // Engagement counters are written by the likes/endorsement collaborators;
    // this subsystem only reads them.
    pub like_count: i32,
    pub endorsement_count: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub last_activity_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::AuthorId",
        to = "super::employee::Column::Id"
    )]
    Author,
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentCommentId",
        to = "Column::Id"
    )]
    Parent,
    #[sea_orm(has_many = "super::comment_mention::Entity")]
    Mentions,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment_mention::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Mentions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Classification of a comment within a corporate discussion.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CommentType {
    #[default]
    #[sea_orm(string_value = "regular")]
    Regular,
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "answer")]
    Answer,
    #[sea_orm(string_value = "suggestion")]
    Suggestion,
    #[sea_orm(string_value = "concern")]
    Concern,
    #[sea_orm(string_value = "acknowledgment")]
    Acknowledgment,
    #[sea_orm(string_value = "decision")]
    Decision,
    #[sea_orm(string_value = "action")]
    Action,
}

impl CommentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentType::Regular => "Regular",
            CommentType::Question => "Question",
            CommentType::Answer => "Answer",
            CommentType::Suggestion => "Suggestion",
            CommentType::Concern => "Concern",
            CommentType::Acknowledgment => "Acknowledgment",
            CommentType::Decision => "Decision",
            CommentType::Action => "Action",
        }
    }

    /// Only these types carry a resolution lifecycle.
    pub fn is_resolvable(&self) -> bool {
        matches!(
            self,
            CommentType::Question | CommentType::Concern | CommentType::Action
        )
    }
}

impl fmt::Display for CommentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state governing the visibility and content of a comment under
/// review. Transition validation lives in the moderation service.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ModerationStatus {
    #[default]
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "under_review")]
    UnderReview,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "flagged")]
    Flagged,
    #[sea_orm(string_value = "hidden")]
    Hidden,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationStatus::Pending => "Pending",
            ModerationStatus::UnderReview => "UnderReview",
            ModerationStatus::Approved => "Approved",
            ModerationStatus::Flagged => "Flagged",
            ModerationStatus::Hidden => "Hidden",
            ModerationStatus::Rejected => "Rejected",
        }
    }

    /// Comments in these states have had their content redacted and can no
    /// longer be edited by their author.
    pub fn is_content_immutable(&self) -> bool {
        matches!(self, ModerationStatus::Hidden | ModerationStatus::Rejected)
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CommentVisibility {
    #[default]
    #[sea_orm(string_value = "public")]
    Public,
    #[sea_orm(string_value = "internal")]
    Internal,
    #[sea_orm(string_value = "confidential")]
    Confidential,
    #[sea_orm(string_value = "private")]
    Private,
}

impl CommentVisibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentVisibility::Public => "Public",
            CommentVisibility::Internal => "Internal",
            CommentVisibility::Confidential => "Confidential",
            CommentVisibility::Private => "Private",
        }
    }
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CommentPriority {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
    #[sea_orm(string_value = "critical")]
    Critical,
}
