use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::EmployeeId;

/// Guarded operations on a comment. Content edits are not listed: editing is
/// always author-only and enforced directly by the lifecycle service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Delete,
    Moderate,
    Resolve,
    Highlight,
}

/// Answers "may this employee perform this action on this comment".
///
/// Rules are evaluated first-match-wins, cheapest check first, so the
/// common author case never hits the database.
#[derive(Clone)]
pub struct PermissionEvaluator {
    db: DatabaseConnection,
}

impl PermissionEvaluator {
    pub fn new(db: DatabaseConnection) -> Self {
        PermissionEvaluator { db }
    }

    pub async fn can_perform(
        &self,
        actor_id: EmployeeId,
        action: CommentAction,
        comment: &CommentModel,
    ) -> Result<bool, ThreadError> {
        let is_author = comment.author_id == actor_id;

        match action {
            CommentAction::Delete => {
                if is_author {
                    return Ok(true);
                }
                self.has_moderation_capability(actor_id).await
            }
            CommentAction::Moderate => self.has_moderation_capability(actor_id).await,
            CommentAction::Highlight => {
                if is_author {
                    return Ok(true);
                }
                if self.is_post_author(actor_id, comment).await? {
                    return Ok(true);
                }
                self.is_direct_manager_of(actor_id, comment.author_id).await
            }
            CommentAction::Resolve => {
                if is_author {
                    return Ok(true);
                }
                if self.is_post_author(actor_id, comment).await? {
                    return Ok(true);
                }
                if self.is_direct_manager_of(actor_id, comment.author_id).await? {
                    return Ok(true);
                }
                // Assignees of an action item may close it out themselves.
                if comment.kind == CommentType::Action {
                    return self.is_mentioned_in(actor_id, comment).await;
                }
                Ok(false)
            }
        }
    }

    async fn has_moderation_capability(&self, actor_id: EmployeeId) -> Result<bool, ThreadError> {
        let employee = Employee::find_by_id(actor_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::EmployeeNotFound)?;
        Ok(employee.can_moderate)
    }

    async fn is_post_author(
        &self,
        actor_id: EmployeeId,
        comment: &CommentModel,
    ) -> Result<bool, ThreadError> {
        let post = Post::find_by_id(comment.post_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::PostNotFound)?;
        Ok(post.author_id == actor_id)
    }

    async fn is_direct_manager_of(
        &self,
        actor_id: EmployeeId,
        author_id: EmployeeId,
    ) -> Result<bool, ThreadError> {
        let author = Employee::find_by_id(author_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::EmployeeNotFound)?;
        Ok(author.manager_id == Some(actor_id))
    }

    async fn is_mentioned_in(
        &self,
        actor_id: EmployeeId,
        comment: &CommentModel,
    ) -> Result<bool, ThreadError> {
        let mentioned = CommentMention::find()
            .filter(CommentMentionColumn::CommentId.eq(comment.id))
            .filter(CommentMentionColumn::MentionedEmployeeId.eq(actor_id))
            .count(&self.db)
            .await?;
        Ok(mentioned > 0)
    }
}
