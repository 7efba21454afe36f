use sea_orm::ConnectionTrait;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::CommentId;

pub const PATH_SEPARATOR: char = '/';

/// Placement of a comment within its thread tree: nesting depth plus the
/// materialized chain of ancestor ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadPosition {
    pub level: i32,
    pub path: String,
}

impl ThreadPosition {
    pub fn root() -> Self {
        ThreadPosition {
            level: 0,
            path: String::new(),
        }
    }
}

/// Position for a reply directly under `parent`. The child's path is the
/// parent's ancestor chain extended with the parent's own id, so every
/// comment's path lists exactly its ancestors, oldest first.
pub fn child_position(parent: &CommentModel) -> ThreadPosition {
    ThreadPosition {
        level: parent.thread_level + 1,
        path: join_path(&parent.thread_path, parent.id),
    }
}

/// Resolves the parent row and derives the new comment's position. Roots
/// get level 0 and an empty path without touching the database.
pub async fn compute_position<C: ConnectionTrait>(
    conn: &C,
    parent_comment_id: Option<CommentId>,
) -> Result<ThreadPosition, ThreadError> {
    let Some(parent_id) = parent_comment_id else {
        return Ok(ThreadPosition::root());
    };

    let parent = Comment::find_by_id(parent_id)
        .one(conn)
        .await?
        .ok_or(ThreadError::ParentNotFound)?;

    Ok(child_position(&parent))
}

pub fn join_path(parent_path: &str, child: CommentId) -> String {
    if parent_path.is_empty() {
        child.simple()
    } else {
        format!("{parent_path}{PATH_SEPARATOR}{}", child.simple())
    }
}

/// Sort key that interleaves each subtree behind its root when compared
/// lexicographically. A comment's stored path names its ancestors only, so
/// two roots both carry the empty path; appending the comment's own id
/// disambiguates them and still sorts every descendant after its parent.
pub fn sort_key(comment: &CommentModel) -> String {
    join_path(&comment.thread_path, comment.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn test_join_path_root_child() {
        let id = CommentId::new();
        assert_eq!(join_path("", id), id.simple());
    }

    #[test]
    fn test_join_path_nested() {
        let a = CommentId::new();
        let b = CommentId::new();
        let path = join_path(&a.simple(), b);
        assert_eq!(path, format!("{}/{}", a.simple(), b.simple()));
        assert!(path.starts_with(&a.simple()));
    }

    #[tokio::test]
    async fn test_compute_position_root() {
        let db = test_utils::setup_db().await;
        let position = compute_position(&db, None).await.unwrap();
        assert_eq!(position, ThreadPosition::root());
    }

    #[tokio::test]
    async fn test_compute_position_child_of_root() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let parent = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let position = compute_position(&db, Some(parent.id)).await.unwrap();

        assert_eq!(position.level, 1);
        // The child's path names its one ancestor, the parent.
        assert_eq!(position.path, parent.id.simple());
    }

    #[tokio::test]
    async fn test_compute_position_missing_parent() {
        let db = test_utils::setup_db().await;
        let result = compute_position(&db, Some(CommentId::new())).await;
        assert!(matches!(result, Err(ThreadError::ParentNotFound)));
    }

    #[test]
    fn test_sort_key_orders_subtree_behind_its_root() {
        let root = CommentModel {
            id: CommentId::from_uuid(uuid::Uuid::from_u128(0x10)),
            ..blank_comment()
        };
        let reply = CommentModel {
            id: CommentId::from_uuid(uuid::Uuid::from_u128(0x30)),
            thread_level: 1,
            thread_path: root.id.simple(),
            ..blank_comment()
        };
        let later_root = CommentModel {
            id: CommentId::from_uuid(uuid::Uuid::from_u128(0x20)),
            ..blank_comment()
        };

        // The reply's key shares the root's id prefix, so it sorts directly
        // behind its root even though the later root's id is smaller than
        // the reply's.
        let mut keys = vec![
            sort_key(&later_root),
            sort_key(&reply),
            sort_key(&root),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![sort_key(&root), sort_key(&reply), sort_key(&later_root)]
        );
    }

    fn blank_comment() -> CommentModel {
        let now = chrono::Utc::now();
        CommentModel {
            id: CommentId::new(),
            post_id: crate::ids::PostId::new(),
            author_id: crate::ids::EmployeeId::new(),
            parent_comment_id: None,
            content: String::new(),
            kind: CommentType::Regular,
            visibility: CommentVisibility::Public,
            priority: CommentPriority::Normal,
            is_confidential: false,
            thread_level: 0,
            thread_path: String::new(),
            reply_count: 0,
            moderation_status: ModerationStatus::Approved,
            moderated_by_id: None,
            moderated_at: None,
            moderation_reason: None,
            is_flagged: false,
            is_resolved: false,
            resolved_by_id: None,
            resolved_at: None,
            resolution_note: None,
            is_edited: false,
            edited_at: None,
            is_highlighted: false,
            is_deleted: false,
            like_count: 0,
            endorsement_count: 0,
            created_at: now,
            updated_at: now,
            last_activity_at: now,
        }
    }
}
