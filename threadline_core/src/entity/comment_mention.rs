use crate::ids::{CommentId, EmployeeId, MentionId};
use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use serde::{Deserialize, Serialize};

/// An inline `@person` reference inside a comment's text. Owned by the
/// comment; removed with it on hard delete.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comment_mention")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: MentionId,
    pub comment_id: CommentId,
    pub mentioned_employee_id: EmployeeId,
    pub mentioned_by_id: EmployeeId,

    /// Raw mention text as typed, e.g. `@ana.souza`.
    pub mention_text: String,
    pub start_position: i32,
    pub length: i32,

    pub context: MentionContext,
    pub urgency: MentionUrgency,

    pub is_read: bool,
    pub read_at: Option<DateTimeUtc>,

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
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::MentionedEmployeeId",
        to = "super::employee::Column::Id"
    )]
    MentionedEmployee,
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Why the person was mentioned.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MentionContext {
    #[default]
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "question")]
    Question,
    #[sea_orm(string_value = "action")]
    Action,
    #[sea_orm(string_value = "fyi")]
    Fyi,
    #[sea_orm(string_value = "decision")]
    Decision,
    #[sea_orm(string_value = "approval")]
    Approval,
    #[sea_orm(string_value = "review")]
    Review,
    #[sea_orm(string_value = "escalation")]
    Escalation,
}

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum MentionUrgency {
    #[sea_orm(string_value = "low")]
    Low,
    #[default]
    #[sea_orm(string_value = "normal")]
    Normal,
    #[sea_orm(string_value = "high")]
    High,
    #[sea_orm(string_value = "urgent")]
    Urgent,
}
