use chrono::Utc;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::{CommentId, EmployeeId, MentionId};

/// A mention to be recorded against a comment, with the employee already
/// resolved by the caller.
#[derive(Debug, Clone)]
pub struct MentionInput {
    pub mentioned_employee_id: EmployeeId,
    pub mention_text: String,
    pub start_position: i32,
    pub length: i32,
    pub context: MentionContext,
    pub urgency: MentionUrgency,
}

impl MentionInput {
    pub fn new(mentioned_employee_id: EmployeeId, draft: MentionDraft) -> Self {
        MentionInput {
            mentioned_employee_id,
            mention_text: draft.mention_text,
            start_position: draft.start_position,
            length: draft.length,
            context: MentionContext::General,
            urgency: MentionUrgency::Normal,
        }
    }
}

/// A candidate mention found by scanning comment text. Carries no employee
/// id: mapping the token to a directory entry is the caller's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionDraft {
    pub mention_text: String,
    pub start_position: i32,
    pub length: i32,
}

/// Scans for `@token` mentions, where a token is alphanumeric/underscore
/// with at most one inner dot (`@jane.doe`). Positions are byte offsets
/// into `content`.
pub fn extract_mentions(content: &str) -> Vec<MentionDraft> {
    let bytes = content.as_bytes();
    let mut drafts = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'@' {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i + 1;
        let mut seen_dot = false;
        while end < bytes.len() {
            let b = bytes[end];
            if b.is_ascii_alphanumeric() || b == b'_' {
                end += 1;
            } else if b == b'.' && !seen_dot && end + 1 < bytes.len() && bytes[end + 1].is_ascii_alphanumeric() {
                seen_dot = true;
                end += 1;
            } else {
                break;
            }
        }

        if end > start + 1 {
            drafts.push(MentionDraft {
                mention_text: content[start..end].to_string(),
                start_position: start as i32,
                length: (end - start) as i32,
            });
        }

        i = end.max(i + 1);
    }

    drafts
}

/// Records and queries @-mentions, and tracks their per-recipient read
/// state.
#[derive(Clone)]
pub struct MentionsService {
    db: DatabaseConnection,
}

impl MentionsService {
    pub fn new(db: DatabaseConnection) -> Self {
        MentionsService { db }
    }

    /// Inserts mention rows for a comment. Generic over the connection so
    /// the comment lifecycle can run it inside its own transaction.
    pub async fn attach<C: ConnectionTrait>(
        &self,
        conn: &C,
        comment_id: CommentId,
        mentioned_by_id: EmployeeId,
        mentions: &[MentionInput],
    ) -> Result<Vec<CommentMentionModel>, ThreadError> {
        let comment = Comment::find_by_id(comment_id).one(conn).await?;
        if comment.is_none() {
            return Err(ThreadError::CommentNotFound);
        }

        let mut recorded = Vec::with_capacity(mentions.len());
        let now = Utc::now();

        for input in mentions {
            let mentioned = Employee::find_by_id(input.mentioned_employee_id)
                .one(conn)
                .await?;
            if mentioned.is_none() {
                return Err(ThreadError::EmployeeNotFound);
            }

            let mention = CommentMentionActiveModel {
                id: Set(MentionId::new()),
                comment_id: Set(comment_id),
                mentioned_employee_id: Set(input.mentioned_employee_id),
                mentioned_by_id: Set(mentioned_by_id),
                mention_text: Set(input.mention_text.clone()),
                start_position: Set(input.start_position),
                length: Set(input.length),
                context: Set(input.context),
                urgency: Set(input.urgency),
                is_read: Set(false),
                read_at: Set(None),
                created_at: Set(now),
            };

            recorded.push(CommentMention::insert(mention).exec_with_returning(conn).await?);
        }

        Ok(recorded)
    }

    /// Marks a mention read on behalf of its recipient.
    ///
    /// Returns `Ok(false)` when the mention is missing or belongs to a
    /// different recipient, `Ok(true)` otherwise. Re-marking an already
    /// read mention succeeds without touching `read_at`.
    pub async fn mark_read(
        &self,
        mention_id: MentionId,
        actor_id: EmployeeId,
    ) -> Result<bool, ThreadError> {
        let Some(mention) = CommentMention::find_by_id(mention_id).one(&self.db).await? else {
            tracing::warn!(mention_id = %mention_id, "mark_read on unknown mention");
            return Ok(false);
        };

        if mention.mentioned_employee_id != actor_id {
            tracing::warn!(
                mention_id = %mention_id,
                actor_id = %actor_id,
                "mark_read by non-recipient"
            );
            return Ok(false);
        }

        if mention.is_read {
            return Ok(true);
        }

        let mut active: CommentMentionActiveModel = mention.into();
        active.is_read = Set(true);
        active.read_at = Set(Some(Utc::now()));
        active.update(&self.db).await?;

        Ok(true)
    }

    /// Unread mentions for an employee, oldest first.
    pub async fn unread_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<CommentMentionModel>, ThreadError> {
        let mentions = CommentMention::find()
            .filter(CommentMentionColumn::MentionedEmployeeId.eq(employee_id))
            .filter(CommentMentionColumn::IsRead.eq(false))
            .order_by_asc(CommentMentionColumn::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(mentions)
    }

    pub async fn for_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Vec<CommentMentionModel>, ThreadError> {
        let mentions = CommentMention::find()
            .filter(CommentMentionColumn::CommentId.eq(comment_id))
            .order_by_asc(CommentMentionColumn::StartPosition)
            .all(&self.db)
            .await?;
        Ok(mentions)
    }
}
