use chrono::Utc;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::{CommentId, EmployeeId};
use crate::service::permissions::{CommentAction, PermissionEvaluator};

/// One-way resolution workflow for resolvable comment kinds (questions,
/// concerns, action items).
#[derive(Clone)]
pub struct ResolutionService {
    db: DatabaseConnection,
    permissions: PermissionEvaluator,
}

impl ResolutionService {
    pub fn new(db: DatabaseConnection) -> Self {
        ResolutionService {
            permissions: PermissionEvaluator::new(db.clone()),
            db,
        }
    }

    /// Precondition order is part of the contract: existence, then kind,
    /// then prior resolution, then permission. An already-resolved question
    /// reports `AlreadyResolved` even to a caller who could not resolve it.
    pub async fn resolve(
        &self,
        comment_id: CommentId,
        actor_id: EmployeeId,
        resolution_note: Option<String>,
    ) -> Result<CommentModel, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        if !comment.kind.is_resolvable() {
            return Err(ThreadError::UnsupportedType(comment.kind));
        }

        if comment.is_resolved {
            return Err(ThreadError::AlreadyResolved);
        }

        if !self
            .permissions
            .can_perform(actor_id, CommentAction::Resolve, &comment)
            .await?
        {
            return Err(ThreadError::Forbidden);
        }

        let now = Utc::now();
        let mut active: CommentActiveModel = comment.into();
        active.is_resolved = Set(true);
        active.resolved_by_id = Set(Some(actor_id));
        active.resolved_at = Set(Some(now));
        active.resolution_note = Set(resolution_note);
        active.updated_at = Set(now);

        let resolved = active.update(&self.db).await?;

        tracing::info!(
            comment_id = %comment_id,
            actor_id = %actor_id,
            kind = %resolved.kind,
            "comment resolved"
        );

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[tokio::test]
    async fn test_resolve_question() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let question = test_utils::seed_comment(&db, post, author, CommentType::Question).await;

        let resolution = ResolutionService::new(db);
        let resolved = resolution
            .resolve(question.id, author, Some("answered offline".to_string()))
            .await
            .unwrap();

        assert!(resolved.is_resolved);
        assert_eq!(resolved.resolved_by_id, Some(author));
        assert_eq!(resolved.resolution_note.as_deref(), Some("answered offline"));
        assert!(resolved.resolved_at.is_some());
    }

    #[tokio::test]
    async fn test_resolve_is_one_way() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let concern = test_utils::seed_comment(&db, post, author, CommentType::Concern).await;

        let resolution = ResolutionService::new(db);
        resolution.resolve(concern.id, author, None).await.unwrap();

        let again = resolution.resolve(concern.id, author, None).await;
        assert!(matches!(again, Err(ThreadError::AlreadyResolved)));
    }

    #[tokio::test]
    async fn test_non_resolvable_kind_is_refused_before_permission() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let outsider = test_utils::create_employee(&db, "Eve", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let regular = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let resolution = ResolutionService::new(db);
        // The outsider has no permission either, but the kind check wins.
        let result = resolution.resolve(regular.id, outsider, None).await;
        assert!(matches!(
            result,
            Err(ThreadError::UnsupportedType(CommentType::Regular))
        ));
    }

    #[tokio::test]
    async fn test_unrelated_employee_cannot_resolve() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let outsider = test_utils::create_employee(&db, "Eve", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let question = test_utils::seed_comment(&db, post, author, CommentType::Question).await;

        let resolution = ResolutionService::new(db);
        let result = resolution.resolve(question.id, outsider, None).await;
        assert!(matches!(result, Err(ThreadError::Forbidden)));
    }
}
