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
                    .table(CommentLike::Table)
                    .col(pk_uuid(CommentLike::Id))
                    .col(uuid(CommentLike::CommentId))
                    .col(uuid(CommentLike::EmployeeId))
                    .col(timestamp_with_time_zone(CommentLike::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-like-comment_id")
                            .from(CommentLike::Table, CommentLike::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-comment-like-employee_id")
                            .from(CommentLike::Table, CommentLike::EmployeeId)
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
                    .name("idx_comment_likes_comment_id")
                    .table(CommentLike::Table)
                    .col(CommentLike::CommentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CommentLike::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CommentLike {
    Table,
    Id,
    CommentId,
    EmployeeId,
    CreatedAt,
}
