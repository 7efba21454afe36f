use std::sync::Arc;

use chrono::Utc;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::{CommentId, EmployeeId};
use crate::notify::{Notification, NotificationEmitter, NotificationKind};
use crate::service::permissions::{CommentAction, PermissionEvaluator};

pub static HIDDEN_CONTENT_MARKER: &str = "[comment hidden by moderation]";
pub static REJECTED_CONTENT_MARKER: &str = "[comment rejected by moderation]";

/// Whether a comment may move from one moderation status to another.
///
/// Escalation to UnderReview is always open; Pending rows can go anywhere;
/// the remaining states form a narrowing review funnel with Rejected as the
/// only terminal.
pub fn transition_allowed(from: ModerationStatus, to: ModerationStatus) -> bool {
    use ModerationStatus::*;

    if to == UnderReview {
        return true;
    }

    match from {
        Pending => true,
        UnderReview => to != Pending,
        Approved => matches!(to, Flagged | Hidden),
        Flagged => matches!(to, Approved | Hidden | Rejected),
        Hidden => matches!(to, Approved | Rejected),
        Rejected => false,
    }
}

/// Drives moderation status changes, their content side effects, and the
/// author-facing notifications they trigger.
#[derive(Clone)]
pub struct ModerationService {
    db: DatabaseConnection,
    permissions: PermissionEvaluator,
    emitter: Arc<dyn NotificationEmitter>,
}

impl ModerationService {
    pub fn new(db: DatabaseConnection, emitter: Arc<dyn NotificationEmitter>) -> Self {
        ModerationService {
            permissions: PermissionEvaluator::new(db.clone()),
            db,
            emitter,
        }
    }

    pub async fn moderate(
        &self,
        comment_id: CommentId,
        actor_id: EmployeeId,
        new_status: ModerationStatus,
        reason: Option<String>,
    ) -> Result<CommentModel, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        if !self
            .permissions
            .can_perform(actor_id, CommentAction::Moderate, &comment)
            .await?
        {
            tracing::warn!(
                comment_id = %comment_id,
                actor_id = %actor_id,
                "moderation attempt without capability"
            );
            return Err(ThreadError::Forbidden);
        }

        let from = comment.moderation_status;
        if !transition_allowed(from, new_status) {
            return Err(ThreadError::InvalidTransition {
                from,
                to: new_status,
            });
        }

        let author_id = comment.author_id;
        let now = Utc::now();

        let mut active: CommentActiveModel = comment.into();
        active.moderation_status = Set(new_status);
        active.moderated_by_id = Set(Some(actor_id));
        active.moderated_at = Set(Some(now));
        active.moderation_reason = Set(reason);
        active.updated_at = Set(now);

        match new_status {
            ModerationStatus::Hidden => {
                active.content = Set(HIDDEN_CONTENT_MARKER.to_string());
                active.is_flagged = Set(true);
            }
            ModerationStatus::Rejected => {
                active.content = Set(REJECTED_CONTENT_MARKER.to_string());
                active.is_flagged = Set(true);
            }
            ModerationStatus::Approved => {
                active.is_flagged = Set(false);
            }
            ModerationStatus::Flagged => {
                active.is_flagged = Set(true);
            }
            ModerationStatus::Pending | ModerationStatus::UnderReview => {}
        }

        let updated = active.update(&self.db).await?;

        tracing::info!(
            comment_id = %comment_id,
            actor_id = %actor_id,
            from = %from,
            to = %new_status,
            "comment moderated"
        );

        if matches!(
            new_status,
            ModerationStatus::Hidden | ModerationStatus::Rejected | ModerationStatus::Flagged
        ) {
            self.emitter
                .emit(Notification {
                    recipient_id: author_id,
                    sender_id: actor_id,
                    kind: NotificationKind::ModerationAction,
                    title: "Moderation action".to_string(),
                    message: status_message(new_status).to_string(),
                    related_comment_id: comment_id,
                })
                .await;
        }

        Ok(updated)
    }
}

fn status_message(status: ModerationStatus) -> &'static str {
    match status {
        ModerationStatus::Hidden => "Your comment was hidden by a moderator.",
        ModerationStatus::Rejected => "Your comment was rejected by a moderator.",
        ModerationStatus::Flagged => "Your comment was flagged for review.",
        _ => "The moderation status of your comment changed.",
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Iterable;

    use super::*;
    use crate::notify::{NoopEmitter, RecordingEmitter};
    use crate::test_utils;

    async fn set_status(db: &DatabaseConnection, comment: &CommentModel, status: ModerationStatus) {
        let mut active: CommentActiveModel = comment.clone().into();
        active.moderation_status = Set(status);
        active.update(db).await.unwrap();
    }

    fn expected(from: ModerationStatus, to: ModerationStatus) -> bool {
        use ModerationStatus::*;
        match (from, to) {
            (_, UnderReview) => true,
            (Pending, _) => true,
            (UnderReview, to) => to != Pending,
            (Approved, Flagged) | (Approved, Hidden) => true,
            (Flagged, Approved) | (Flagged, Hidden) | (Flagged, Rejected) => true,
            (Hidden, Approved) | (Hidden, Rejected) => true,
            _ => false,
        }
    }

    #[test]
    fn test_transition_table_closure() {
        for from in ModerationStatus::iter() {
            for to in ModerationStatus::iter() {
                assert_eq!(
                    transition_allowed(from, to),
                    expected(from, to),
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_transition_leaves_row_untouched() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let post = test_utils::create_post(&db, author).await;
        let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;
        set_status(&db, &comment, ModerationStatus::Rejected).await;

        let moderation = ModerationService::new(db.clone(), Arc::new(NoopEmitter));
        let result = moderation
            .moderate(comment.id, moderator, ModerationStatus::Approved, None)
            .await;
        assert!(matches!(
            result,
            Err(ThreadError::InvalidTransition {
                from: ModerationStatus::Rejected,
                to: ModerationStatus::Approved,
            })
        ));

        let stored = Comment::find_by_id(comment.id).one(&db).await.unwrap().unwrap();
        assert_eq!(stored.moderation_status, ModerationStatus::Rejected);
        assert!(stored.moderated_by_id.is_none());
    }

    #[tokio::test]
    async fn test_non_moderator_is_refused() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let moderation = ModerationService::new(db, Arc::new(NoopEmitter));
        // Not even on their own comment.
        let result = moderation
            .moderate(comment.id, author, ModerationStatus::Hidden, None)
            .await;
        assert!(matches!(result, Err(ThreadError::Forbidden)));
    }

    #[tokio::test]
    async fn test_hide_replaces_content_and_notifies_author() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let post = test_utils::create_post(&db, author).await;
        let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let emitter = Arc::new(RecordingEmitter::new());
        let moderation = ModerationService::new(db, emitter.clone());
        let hidden = moderation
            .moderate(
                comment.id,
                moderator,
                ModerationStatus::Hidden,
                Some("inappropriate".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(hidden.content, HIDDEN_CONTENT_MARKER);
        assert_eq!(hidden.moderation_status, ModerationStatus::Hidden);
        assert!(hidden.is_flagged);
        assert_eq!(hidden.moderated_by_id, Some(moderator));
        assert_eq!(hidden.moderation_reason.as_deref(), Some("inappropriate"));
        assert!(hidden.moderated_at.is_some());

        // Flagging a hidden comment is not a valid move; re-approving is.
        let refused = moderation
            .moderate(comment.id, moderator, ModerationStatus::Flagged, None)
            .await;
        assert!(matches!(refused, Err(ThreadError::InvalidTransition { .. })));
        let approved = moderation
            .moderate(comment.id, moderator, ModerationStatus::Approved, None)
            .await
            .unwrap();
        assert!(!approved.is_flagged);

        let sent = emitter.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient_id, author);
        assert_eq!(sent[0].sender_id, moderator);
        assert_eq!(sent[0].kind, NotificationKind::ModerationAction);
        assert_eq!(sent[0].related_comment_id, comment.id);
    }

    #[tokio::test]
    async fn test_flag_review_reject_walkthrough() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let post = test_utils::create_post(&db, author).await;
        let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let emitter = Arc::new(RecordingEmitter::new());
        let moderation = ModerationService::new(db.clone(), emitter.clone());

        let flagged = moderation
            .moderate(comment.id, moderator, ModerationStatus::Flagged, None)
            .await
            .unwrap();
        assert!(flagged.is_flagged);

        let reviewing = moderation
            .moderate(comment.id, moderator, ModerationStatus::UnderReview, None)
            .await
            .unwrap();
        assert_eq!(reviewing.moderation_status, ModerationStatus::UnderReview);
        // Escalating to review does not touch the flag.
        assert!(reviewing.is_flagged);

        let rejected = moderation
            .moderate(
                comment.id,
                moderator,
                ModerationStatus::Rejected,
                Some("policy violation".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(rejected.content, REJECTED_CONTENT_MARKER);
        assert!(rejected.is_flagged);

        // Author notified on flag and on reject, not on the review step.
        assert_eq!(emitter.sent().len(), 2);

        // Rejected is terminal apart from re-opening review.
        assert!(moderation
            .moderate(comment.id, moderator, ModerationStatus::Approved, None)
            .await
            .is_err());
        assert!(moderation
            .moderate(comment.id, moderator, ModerationStatus::UnderReview, None)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_approve_clears_flag() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let post = test_utils::create_post(&db, author).await;
        let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let moderation = ModerationService::new(db, Arc::new(NoopEmitter));
        moderation
            .moderate(comment.id, moderator, ModerationStatus::Flagged, None)
            .await
            .unwrap();
        let approved = moderation
            .moderate(comment.id, moderator, ModerationStatus::Approved, None)
            .await
            .unwrap();

        assert_eq!(approved.moderation_status, ModerationStatus::Approved);
        assert!(!approved.is_flagged);
    }
}
