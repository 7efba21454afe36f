use sea_orm_migration::{prelude::*, schema::*};

use super::m20260110_000001_create_employees_table::Employee;
use super::m20260110_000003_create_comments_table::Comment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CommentMention::Table)
                    .col(pk_uuid(CommentMention::Id))
                    .col(uuid(CommentMention::CommentId))
                    .col(uuid(CommentMention::MentionedEmployeeId))
                    .col(uuid(CommentMention::MentionedById))
                    .col(string(CommentMention::MentionText))
                    .col(integer(CommentMention::StartPosition))
                    .col(integer(CommentMention::Length))
                    .col(string(CommentMention::Context))
                    .col(string(CommentMention::Urgency))
                    .col(boolean(CommentMention::IsRead))
                    .col(timestamp_with_time_zone_null(CommentMention::ReadAt))
                    .col(timestamp_with_time_zone(CommentMention::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-mention-comment_id")
                            .from(CommentMention::Table, CommentMention::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-mention-mentioned_employee_id")
                            .from(CommentMention::Table, CommentMention::MentionedEmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-mention-mentioned_by_id")
                            .from(CommentMention::Table, CommentMention::MentionedById)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_mentions_comment_id")
                    .table(CommentMention::Table)
                    .col(CommentMention::CommentId)
                    .to_owned(),
            )
            .await?;

        // Unread-mentions inbox lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_comment_mentions_mentioned_employee_id")
                    .table(CommentMention::Table)
                    .col(CommentMention::MentionedEmployeeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentMention::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CommentMention {
    Table,
    Id,
    CommentId,
    MentionedEmployeeId,
    MentionedById,
    MentionText,
    StartPosition,
    Length,
    Context,
    Urgency,
    IsRead,
    ReadAt,
    CreatedAt,
}
