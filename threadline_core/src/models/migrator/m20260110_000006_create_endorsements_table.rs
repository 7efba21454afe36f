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
                    .table(Endorsement::Table)
                    .col(pk_uuid(Endorsement::Id))
                    .col(uuid(Endorsement::CommentId))
                    .col(uuid(Endorsement::EndorserId))
                    .col(timestamp_with_time_zone(Endorsement::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-endorsement-comment_id")
                            .from(Endorsement::Table, Endorsement::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-endorsement-endorser_id")
                            .from(Endorsement::Table, Endorsement::EndorserId)
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
                    .name("idx_endorsements_comment_id")
                    .table(Endorsement::Table)
                    .col(Endorsement::CommentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Endorsement::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Endorsement {
    Table,
    Id,
    CommentId,
    EndorserId,
    CreatedAt,
}
