use std::collections::HashSet;

use chrono::Utc;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::{CommentId, EmployeeId, PostId};
use crate::service::mentions::{MentionInput, MentionsService};
use crate::service::permissions::{CommentAction, PermissionEvaluator};
use crate::service::positions::{self, ThreadPosition};

pub static DELETED_CONTENT_MARKER: &str = "[comment removed]";

/// Edits that rewrite less than this share of the original text keep their
/// moderation status; anything below goes back to the review queue.
pub const SIGNIFICANT_CHANGE_THRESHOLD: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub kind: CommentType,
    pub visibility: CommentVisibility,
    pub priority: CommentPriority,
    pub is_confidential: bool,
    pub mentions: Vec<MentionInput>,
}

impl NewComment {
    pub fn new(post_id: PostId, content: impl Into<String>) -> Self {
        NewComment {
            post_id,
            parent_comment_id: None,
            content: content.into(),
            kind: CommentType::default(),
            visibility: CommentVisibility::default(),
            priority: CommentPriority::default(),
            is_confidential: false,
            mentions: Vec::new(),
        }
    }

    pub fn reply_to(post_id: PostId, parent_comment_id: CommentId, content: impl Into<String>) -> Self {
        let mut comment = Self::new(post_id, content);
        comment.parent_comment_id = Some(parent_comment_id);
        comment
    }
}

/// Author-requested changes to an existing comment. `None` fields keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct CommentEdit {
    pub content: String,
    pub kind: Option<CommentType>,
    pub visibility: Option<CommentVisibility>,
    pub priority: Option<CommentPriority>,
    pub is_confidential: Option<bool>,
}

impl CommentEdit {
    pub fn content(content: impl Into<String>) -> Self {
        CommentEdit {
            content: content.into(),
            ..Default::default()
        }
    }
}

/// How a delete request was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The comment had replies; its row stays as a redacted placeholder so
    /// the subtree keeps its anchor.
    Soft,
    /// Leaf comment, removed together with its mentions and reactions.
    Hard,
}

/// Create/edit/delete lifecycle of comments plus thread retrieval and
/// counter maintenance.
#[derive(Clone)]
pub struct CommentsService {
    db: DatabaseConnection,
    permissions: PermissionEvaluator,
    mentions: MentionsService,
    auto_approve: bool,
}

impl CommentsService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::new_with_policy(db, true)
    }

    pub fn new_with_policy(db: DatabaseConnection, auto_approve: bool) -> Self {
        CommentsService {
            permissions: PermissionEvaluator::new(db.clone()),
            mentions: MentionsService::new(db.clone()),
            db,
            auto_approve,
        }
    }

    pub async fn create(
        &self,
        author_id: EmployeeId,
        input: NewComment,
    ) -> Result<CommentModel, ThreadError> {
        let author = Employee::find_by_id(author_id).one(&self.db).await?;
        if author.is_none() {
            return Err(ThreadError::EmployeeNotFound);
        }

        let post = Post::find_by_id(input.post_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::PostNotFound)?;

        let txn = self.db.begin().await?;

        let parent = match input.parent_comment_id {
            Some(parent_id) => {
                let parent = Comment::find_by_id(parent_id)
                    .one(&txn)
                    .await?
                    .ok_or(ThreadError::ParentNotFound)?;
                // A reply must stay within its parent's post, or it would
                // never show up in that post's thread.
                if parent.post_id != input.post_id {
                    return Err(ThreadError::ParentNotFound);
                }
                Some(parent)
            }
            None => None,
        };

        let comment_id = CommentId::new();
        let position = match &parent {
            Some(parent) => positions::child_position(parent),
            None => ThreadPosition::root(),
        };

        let status = if self.auto_approve {
            ModerationStatus::Approved
        } else {
            ModerationStatus::Pending
        };

        let now = Utc::now();
        let comment = CommentActiveModel {
            id: Set(comment_id),
            post_id: Set(input.post_id),
            author_id: Set(author_id),
            parent_comment_id: Set(input.parent_comment_id),
            content: Set(input.content),
            kind: Set(input.kind),
            visibility: Set(input.visibility),
            priority: Set(input.priority),
            is_confidential: Set(input.is_confidential),
            thread_level: Set(position.level),
            thread_path: Set(position.path),
            reply_count: Set(0),
            moderation_status: Set(status),
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

        let inserted = Comment::insert(comment).exec_with_returning(&txn).await?;

        self.mentions
            .attach(&txn, comment_id, author_id, &input.mentions)
            .await?;

        if let Some(parent) = parent {
            let reply_count = parent.reply_count + 1;
            let mut active: CommentActiveModel = parent.into();
            active.reply_count = Set(reply_count);
            active.last_activity_at = Set(now);
            active.update(&txn).await?;
        }

        let mut post_active: PostActiveModel = post.into();
        post_active.last_activity_at = Set(now);
        post_active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            comment_id = %comment_id,
            post_id = %inserted.post_id,
            author_id = %author_id,
            level = inserted.thread_level,
            "comment created"
        );

        Ok(inserted)
    }

    /// Applies an author edit. A rewrite that keeps less than
    /// `SIGNIFICANT_CHANGE_THRESHOLD` of the original words sends the
    /// comment back to the moderation queue.
    pub async fn edit(
        &self,
        comment_id: CommentId,
        actor_id: EmployeeId,
        edit: CommentEdit,
    ) -> Result<CommentModel, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        // Tombstones are gone as far as their author is concerned.
        if comment.is_deleted {
            return Err(ThreadError::CommentNotFound);
        }

        if comment.author_id != actor_id {
            return Err(ThreadError::Forbidden);
        }

        if comment.moderation_status.is_content_immutable() {
            return Err(ThreadError::ModeratedContentImmutable);
        }

        let similarity = content_similarity(&comment.content, &edit.content);
        let now = Utc::now();

        let mut active: CommentActiveModel = comment.into();
        active.content = Set(edit.content);
        if let Some(kind) = edit.kind {
            active.kind = Set(kind);
        }
        if let Some(visibility) = edit.visibility {
            active.visibility = Set(visibility);
        }
        if let Some(priority) = edit.priority {
            active.priority = Set(priority);
        }
        if let Some(is_confidential) = edit.is_confidential {
            active.is_confidential = Set(is_confidential);
        }
        active.is_edited = Set(true);
        active.edited_at = Set(Some(now));
        active.updated_at = Set(now);

        if similarity < SIGNIFICANT_CHANGE_THRESHOLD {
            tracing::info!(
                comment_id = %comment_id,
                similarity,
                "significant edit, comment queued for re-review"
            );
            active.moderation_status = Set(ModerationStatus::Pending);
        }

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Deletes a comment. Comments with replies are redacted in place so the
    /// thread below them survives; leaves are removed for real along with
    /// their mentions and reactions.
    pub async fn delete(
        &self,
        comment_id: CommentId,
        actor_id: EmployeeId,
    ) -> Result<DeleteOutcome, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        // A second delete of a tombstone would decrement the parent's
        // counter again.
        if comment.is_deleted {
            return Err(ThreadError::CommentNotFound);
        }

        if !self
            .permissions
            .can_perform(actor_id, CommentAction::Delete, &comment)
            .await?
        {
            return Err(ThreadError::Forbidden);
        }

        let child_count = Comment::find()
            .filter(CommentColumn::ParentCommentId.eq(comment_id))
            .count(&self.db)
            .await?;

        let parent_id = comment.parent_comment_id;
        let txn = self.db.begin().await?;

        let outcome = if child_count > 0 {
            let mut active: CommentActiveModel = comment.into();
            active.content = Set(DELETED_CONTENT_MARKER.to_string());
            active.is_deleted = Set(true);
            active.updated_at = Set(Utc::now());
            active.update(&txn).await?;
            DeleteOutcome::Soft
        } else {
            CommentMention::delete_many()
                .filter(CommentMentionColumn::CommentId.eq(comment_id))
                .exec(&txn)
                .await?;
            CommentLike::delete_many()
                .filter(CommentLikeColumn::CommentId.eq(comment_id))
                .exec(&txn)
                .await?;
            Endorsement::delete_many()
                .filter(EndorsementColumn::CommentId.eq(comment_id))
                .exec(&txn)
                .await?;
            Comment::delete_by_id(comment_id).exec(&txn).await?;
            DeleteOutcome::Hard
        };

        if let Some(parent_id) = parent_id {
            if let Some(parent) = Comment::find_by_id(parent_id).one(&txn).await? {
                let reply_count = parent.reply_count - 1;
                let mut active: CommentActiveModel = parent.into();
                active.reply_count = Set(reply_count.max(0));
                active.update(&txn).await?;
            }
        }

        txn.commit().await?;

        tracing::info!(
            comment_id = %comment_id,
            actor_id = %actor_id,
            soft = outcome == DeleteOutcome::Soft,
            "comment deleted"
        );

        Ok(outcome)
    }

    /// Sets or clears the highlight marker. Requesting the state the comment
    /// is already in is refused so callers notice lost races.
    pub async fn set_highlight(
        &self,
        comment_id: CommentId,
        actor_id: EmployeeId,
        highlighted: bool,
    ) -> Result<CommentModel, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        if !self
            .permissions
            .can_perform(actor_id, CommentAction::Highlight, &comment)
            .await?
        {
            return Err(ThreadError::Forbidden);
        }

        if comment.is_highlighted == highlighted {
            return Err(ThreadError::AlreadyInState);
        }

        let mut active: CommentActiveModel = comment.into();
        active.is_highlighted = Set(highlighted);
        active.updated_at = Set(Utc::now());
        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// All comments of a post in thread display order: each subtree appears
    /// directly behind its root, depth-first.
    pub async fn thread_for_post(
        &self,
        post_id: PostId,
    ) -> Result<Vec<CommentModel>, ThreadError> {
        let post = Post::find_by_id(post_id).one(&self.db).await?;
        if post.is_none() {
            return Err(ThreadError::PostNotFound);
        }

        let mut comments = Comment::find()
            .filter(CommentColumn::PostId.eq(post_id))
            .all(&self.db)
            .await?;
        comments.sort_by_cached_key(positions::sort_key);
        Ok(comments)
    }

    /// Recomputes a comment's reply counter from its live children (not
    /// deleted, not hidden or rejected) and stores the result. Recovery
    /// path for counters that drifted.
    pub async fn reconcile_reply_count(
        &self,
        comment_id: CommentId,
    ) -> Result<i32, ThreadError> {
        let comment = Comment::find_by_id(comment_id)
            .one(&self.db)
            .await?
            .ok_or(ThreadError::CommentNotFound)?;

        let live_children = Comment::find()
            .filter(CommentColumn::ParentCommentId.eq(comment_id))
            .filter(CommentColumn::IsDeleted.eq(false))
            .filter(
                CommentColumn::ModerationStatus
                    .is_not_in([ModerationStatus::Hidden, ModerationStatus::Rejected]),
            )
            .count(&self.db)
            .await? as i32;

        if comment.reply_count != live_children {
            tracing::warn!(
                comment_id = %comment_id,
                stored = comment.reply_count,
                actual = live_children,
                "reply counter drift reconciled"
            );
            let mut active: CommentActiveModel = comment.into();
            active.reply_count = Set(live_children);
            active.update(&self.db).await?;
        }

        Ok(live_children)
    }
}

/// Word-overlap similarity between two texts: distinct shared words over
/// the longer text's raw word count. Case-insensitive; either side being
/// empty counts as a full rewrite.
fn content_similarity(old: &str, new: &str) -> f64 {
    let old_words: Vec<String> = old.split_whitespace().map(str::to_lowercase).collect();
    let new_words: Vec<String> = new.split_whitespace().map(str::to_lowercase).collect();

    if old_words.is_empty() || new_words.is_empty() {
        return 0.0;
    }

    let old_set: HashSet<&str> = old_words.iter().map(String::as_str).collect();
    let new_set: HashSet<&str> = new_words.iter().map(String::as_str).collect();
    let common = old_set.intersection(&new_set).count();

    common as f64 / old_words.len().max(new_words.len()) as f64
}
