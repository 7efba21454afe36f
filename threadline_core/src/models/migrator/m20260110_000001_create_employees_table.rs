use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .col(pk_uuid(Employee::Id))
                    .col(string(Employee::FullName))
                    .col(uuid_null(Employee::ManagerId)) // Direct manager, if any
                    .col(boolean(Employee::CanModerate))
                    .col(string_null(Employee::Department))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-employee-manager_id")
                            .from(Employee::Table, Employee::ManagerId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employees_manager_id")
                    .table(Employee::Table)
                    .col(Employee::ManagerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Employee {
    Table,
    Id,
    FullName,
    ManagerId,
    CanModerate,
    Department,
}
