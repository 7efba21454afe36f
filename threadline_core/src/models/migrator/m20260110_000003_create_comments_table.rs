use sea_orm_migration::{prelude::*, schema::*};

use super::m20260110_000001_create_employees_table::Employee;
use super::m20260110_000002_create_posts_table::Post;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .col(pk_uuid(Comment::Id))
                    .col(uuid(Comment::PostId))
                    .col(uuid(Comment::AuthorId))
                    .col(uuid_null(Comment::ParentCommentId)) // For threaded replies
                    .col(string(Comment::Content))
                    .col(string(Comment::Kind))
                    .col(string(Comment::Visibility))
                    .col(string(Comment::Priority))
                    .col(boolean(Comment::IsConfidential))
                    .col(integer(Comment::ThreadLevel))
                    .col(string(Comment::ThreadPath))
                    .col(integer(Comment::ReplyCount))
                    .col(string(Comment::ModerationStatus))
                    .col(uuid_null(Comment::ModeratedById))
                    .col(timestamp_with_time_zone_null(Comment::ModeratedAt))
                    .col(string_null(Comment::ModerationReason))
                    .col(boolean(Comment::IsFlagged))
                    .col(boolean(Comment::IsResolved))
                    .col(uuid_null(Comment::ResolvedById))
                    .col(timestamp_with_time_zone_null(Comment::ResolvedAt))
                    .col(string_null(Comment::ResolutionNote))
                    .col(boolean(Comment::IsEdited))
                    .col(timestamp_with_time_zone_null(Comment::EditedAt))
                    .col(boolean(Comment::IsHighlighted))
                    .col(boolean(Comment::IsDeleted))
                    .col(integer(Comment::LikeCount))
                    .col(integer(Comment::EndorsementCount))
                    .col(timestamp_with_time_zone(Comment::CreatedAt))
                    .col(timestamp_with_time_zone(Comment::UpdatedAt))
                    .col(timestamp_with_time_zone(Comment::LastActivityAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-post_id")
                            .from(Comment::Table, Comment::PostId)
                            .to(Post::Table, Post::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-author_id")
                            .from(Comment::Table, Comment::AuthorId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-parent_id")
                            .from(Comment::Table, Comment::ParentCommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_post_id")
                    .table(Comment::Table)
                    .col(Comment::PostId)
                    .to_owned(),
            )
            .await?;

        // Children-of lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_parent_comment_id")
                    .table(Comment::Table)
                    .col(Comment::ParentCommentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_author_id")
                    .table(Comment::Table)
                    .col(Comment::AuthorId)
                    .to_owned(),
            )
            .await?;

        // Hierarchy display order without recursive queries
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_thread_path")
                    .table(Comment::Table)
                    .col(Comment::ThreadPath)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_created_at")
                    .table(Comment::Table)
                    .col(Comment::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comments_moderated_by_id")
                    .table(Comment::Table)
                    .col(Comment::ModeratedById)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Comment::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Comment {
    Table,
    Id,
    PostId,
    AuthorId,
    ParentCommentId,
    Content,
    Kind,
    Visibility,
    Priority,
    IsConfidential,
    ThreadLevel,
    ThreadPath,
    ReplyCount,
    ModerationStatus,
    ModeratedById,
    ModeratedAt,
    ModerationReason,
    IsFlagged,
    IsResolved,
    ResolvedById,
    ResolvedAt,
    ResolutionNote,
    IsEdited,
    EditedAt,
    IsHighlighted,
    IsDeleted,
    LikeCount,
    EndorsementCount,
    CreatedAt,
    UpdatedAt,
    LastActivityAt,
}
