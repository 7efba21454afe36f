use chrono::Utc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;

use crate::entity::prelude::*;
use crate::ids::{CommentId, EmployeeId, PostId};
use crate::models::migrator::Migrator;

/// Fresh in-memory SQLite database with all migrations applied.
///
/// Capped at a single connection: with `sqlite::memory:` every pooled
/// connection gets its own empty database, so a second connection would
/// not see the migrated schema.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub async fn create_employee(
    db: &DatabaseConnection,
    name: &str,
    manager_id: Option<EmployeeId>,
    can_moderate: bool,
) -> EmployeeId {
    let employee_id = EmployeeId::new();
    let employee = EmployeeActiveModel {
        id: Set(employee_id),
        full_name: Set(name.to_string()),
        manager_id: Set(manager_id),
        can_moderate: Set(can_moderate),
        department: Set(None),
    };
    Employee::insert(employee).exec(db).await.unwrap();
    employee_id
}

pub async fn create_employee_in_department(
    db: &DatabaseConnection,
    name: &str,
    department: &str,
) -> EmployeeId {
    let employee_id = EmployeeId::new();
    let employee = EmployeeActiveModel {
        id: Set(employee_id),
        full_name: Set(name.to_string()),
        manager_id: Set(None),
        can_moderate: Set(false),
        department: Set(Some(department.to_string())),
    };
    Employee::insert(employee).exec(db).await.unwrap();
    employee_id
}

pub async fn create_post(db: &DatabaseConnection, author_id: EmployeeId) -> PostId {
    let post_id = PostId::new();
    let now = Utc::now();
    let post = PostActiveModel {
        id: Set(post_id),
        author_id: Set(author_id),
        title: Set("Test Post".to_string()),
        created_at: Set(now),
        last_activity_at: Set(now),
    };
    Post::insert(post).exec(db).await.unwrap();
    post_id
}

/// Insert a bare root comment row, bypassing the lifecycle service. Tests
/// that need a specific starting state tweak the returned model's fields
/// through an ActiveModel.
pub async fn seed_comment(
    db: &DatabaseConnection,
    post_id: PostId,
    author_id: EmployeeId,
    kind: CommentType,
) -> CommentModel {
    let id = CommentId::new();
    let now = Utc::now();
    let comment = CommentActiveModel {
        id: Set(id),
        post_id: Set(post_id),
        author_id: Set(author_id),
        parent_comment_id: Set(None),
        content: Set("seed comment".to_string()),
        kind: Set(kind),
        visibility: Set(CommentVisibility::Public),
        priority: Set(CommentPriority::Normal),
        is_confidential: Set(false),
        thread_level: Set(0),
        thread_path: Set(String::new()),
        reply_count: Set(0),
        moderation_status: Set(ModerationStatus::Approved),
        moderated_by_id: Set(None),
        moderated_at: Set(None),
        moderation_reason: Set(None),
        is_flagged: Set(false),
        is_resolved: Set(false),
        resolved_by_id: Set(None),
        resolved_at: Set(None),
        resolution_note: Set(None),
        is_edited: Set(false),
        edited_at: Set(None),
        is_highlighted: Set(false),
        is_deleted: Set(false),
        like_count: Set(0),
        endorsement_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        last_activity_at: Set(now),
    };

    Comment::insert(comment).exec_with_returning(db).await.unwrap()
}
