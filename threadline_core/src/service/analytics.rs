use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::entity::prelude::*;
use crate::error::ThreadError;
use crate::ids::{CommentId, EmployeeId, PostId};

/// Scopes an analytics query. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct CommentFilter {
    pub post_id: Option<PostId>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    /// Restrict to comments authored by members of this department.
    pub department: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThreadSummary {
    pub total_comments: u64,
    /// Number of root comments, i.e. distinct top-level threads.
    pub total_threads: u64,
    /// Questions and concerns still awaiting resolution.
    pub unresolved_items: u64,
    pub pending_moderation: u64,
    pub total_mentions: u64,
    pub comments_by_type: BTreeMap<String, u64>,
    pub comments_by_visibility: BTreeMap<String, u64>,
    pub comments_by_status: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub employee_id: EmployeeId,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_comments: u64,
    pub comments_by_type: BTreeMap<String, u64>,
    pub likes_received: u64,
    pub endorsements_received: u64,
    pub mentions_received: u64,
    pub mentions_made: u64,
    pub comments_moderated: u64,
    pub comments_resolved: u64,
    /// 0..=100 composite of reactions per authored comment.
    pub engagement_score: f64,
    /// Distinct days with at least one authored comment.
    pub active_days: u64,
    /// Comment counts per day, zero-filled over the whole window.
    pub activity_by_day: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModeratorSummary {
    pub moderator_id: Option<EmployeeId>,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_moderated: u64,
    /// Mean minutes between a comment's creation and its moderation.
    pub average_response_minutes: i64,
    /// Share of moderated comments currently in Approved, in percent.
    pub approval_rate: f64,
    pub actions_by_status: BTreeMap<String, u64>,
    pub moderation_by_day: BTreeMap<String, u64>,
}

/// Read-only aggregation over the comment store. Loads the filtered rows
/// once and folds the summaries in memory; count queries are only used
/// where a join would otherwise be needed.
#[derive(Clone)]
pub struct AnalyticsService {
    db: DatabaseConnection,
}

impl AnalyticsService {
    pub fn new(db: DatabaseConnection) -> Self {
        AnalyticsService { db }
    }

    pub async fn thread_summary(
        &self,
        filter: &CommentFilter,
    ) -> Result<ThreadSummary, ThreadError> {
        let comments = self.load_comments(filter).await?;

        let mut comments_by_type = BTreeMap::new();
        let mut comments_by_visibility = BTreeMap::new();
        let mut comments_by_status = BTreeMap::new();
        let mut total_threads = 0;
        let mut unresolved_items = 0;
        let mut pending_moderation = 0;

        for comment in &comments {
            *comments_by_type
                .entry(comment.kind.as_str().to_string())
                .or_insert(0) += 1;
            *comments_by_visibility
                .entry(comment.visibility.as_str().to_string())
                .or_insert(0) += 1;
            *comments_by_status
                .entry(comment.moderation_status.as_str().to_string())
                .or_insert(0) += 1;

            if comment.parent_comment_id.is_none() {
                total_threads += 1;
            }
            if matches!(comment.kind, CommentType::Question | CommentType::Concern)
                && !comment.is_resolved
            {
                unresolved_items += 1;
            }
            if comment.moderation_status == ModerationStatus::Pending {
                pending_moderation += 1;
            }
        }

        let comment_ids: Vec<CommentId> = comments.iter().map(|c| c.id).collect();
        let total_mentions = if comment_ids.is_empty() {
            0
        } else {
            CommentMention::find()
                .filter(CommentMentionColumn::CommentId.is_in(comment_ids))
                .count(&self.db)
                .await?
        };

        Ok(ThreadSummary {
            total_comments: comments.len() as u64,
            total_threads,
            unresolved_items,
            pending_moderation,
            total_mentions,
            comments_by_type,
            comments_by_visibility,
            comments_by_status,
        })
    }

    /// Per-employee activity over a window; defaults to the trailing 30
    /// days when no bounds are given.
    pub async fn user_summary(
        &self,
        employee_id: EmployeeId,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<UserSummary, ThreadError> {
        let employee = Employee::find_by_id(employee_id).one(&self.db).await?;
        if employee.is_none() {
            return Err(ThreadError::EmployeeNotFound);
        }

        let to = to.unwrap_or_else(Utc::now);
        let from = from.unwrap_or(to - Duration::days(30));

        let authored = Comment::find()
            .filter(CommentColumn::AuthorId.eq(employee_id))
            .filter(CommentColumn::CreatedAt.gte(from))
            .filter(CommentColumn::CreatedAt.lte(to))
            .all(&self.db)
            .await?;

        let mut comments_by_type = BTreeMap::new();
        let mut activity_by_day = zero_filled_days(from, to);
        let mut active_dates = HashSet::new();
        for comment in &authored {
            *comments_by_type
                .entry(comment.kind.as_str().to_string())
                .or_insert(0) += 1;
            *activity_by_day.entry(day_key(comment.created_at)).or_insert(0) += 1;
            active_dates.insert(comment.created_at.date_naive());
        }

        let authored_ids: Vec<CommentId> = authored.iter().map(|c| c.id).collect();
        let (likes_received, endorsements_received) = if authored_ids.is_empty() {
            (0, 0)
        } else {
            let likes = CommentLike::find()
                .filter(CommentLikeColumn::CommentId.is_in(authored_ids.clone()))
                .count(&self.db)
                .await?;
            let endorsements = Endorsement::find()
                .filter(EndorsementColumn::CommentId.is_in(authored_ids))
                .count(&self.db)
                .await?;
            (likes, endorsements)
        };

        let mentions_received = CommentMention::find()
            .filter(CommentMentionColumn::MentionedEmployeeId.eq(employee_id))
            .filter(CommentMentionColumn::CreatedAt.gte(from))
            .filter(CommentMentionColumn::CreatedAt.lte(to))
            .count(&self.db)
            .await?;
        let mentions_made = CommentMention::find()
            .filter(CommentMentionColumn::MentionedById.eq(employee_id))
            .filter(CommentMentionColumn::CreatedAt.gte(from))
            .filter(CommentMentionColumn::CreatedAt.lte(to))
            .count(&self.db)
            .await?;

        let comments_moderated = Comment::find()
            .filter(CommentColumn::ModeratedById.eq(employee_id))
            .filter(CommentColumn::ModeratedAt.gte(from))
            .filter(CommentColumn::ModeratedAt.lte(to))
            .count(&self.db)
            .await?;
        let comments_resolved = Comment::find()
            .filter(CommentColumn::ResolvedById.eq(employee_id))
            .filter(CommentColumn::ResolvedAt.gte(from))
            .filter(CommentColumn::ResolvedAt.lte(to))
            .count(&self.db)
            .await?;

        Ok(UserSummary {
            employee_id,
            from,
            to,
            total_comments: authored.len() as u64,
            comments_by_type,
            likes_received,
            endorsements_received,
            mentions_received,
            mentions_made,
            comments_moderated,
            comments_resolved,
            engagement_score: engagement_score(
                authored.len() as u64,
                likes_received,
                endorsements_received,
            ),
            active_days: active_dates.len() as u64,
            activity_by_day,
        })
    }

    /// Moderation workload over a window, optionally narrowed to a single
    /// moderator.
    pub async fn moderator_summary(
        &self,
        moderator_id: Option<EmployeeId>,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<ModeratorSummary, ThreadError> {
        let mut query = Comment::find()
            .filter(CommentColumn::ModeratedAt.is_not_null())
            .filter(CommentColumn::ModeratedAt.gte(from))
            .filter(CommentColumn::ModeratedAt.lte(to));
        if let Some(moderator_id) = moderator_id {
            query = query.filter(CommentColumn::ModeratedById.eq(moderator_id));
        }
        let moderated = query.all(&self.db).await?;

        let mut actions_by_status = BTreeMap::new();
        let mut moderation_by_day = zero_filled_days(from, to);
        let mut response_minutes = Vec::new();
        let mut approved = 0u64;

        for comment in &moderated {
            *actions_by_status
                .entry(comment.moderation_status.as_str().to_string())
                .or_insert(0) += 1;
            if comment.moderation_status == ModerationStatus::Approved {
                approved += 1;
            }
            if let Some(moderated_at) = comment.moderated_at {
                *moderation_by_day.entry(day_key(moderated_at)).or_insert(0) += 1;
                let minutes = (moderated_at - comment.created_at).num_minutes();
                if minutes >= 0 {
                    response_minutes.push(minutes);
                }
            }
        }

        let total_moderated = moderated.len() as u64;
        let average_response_minutes = if response_minutes.is_empty() {
            0
        } else {
            response_minutes.iter().sum::<i64>() / response_minutes.len() as i64
        };
        let approval_rate = if total_moderated == 0 {
            0.0
        } else {
            approved as f64 / total_moderated as f64 * 100.0
        };

        Ok(ModeratorSummary {
            moderator_id,
            from,
            to,
            total_moderated,
            average_response_minutes,
            approval_rate,
            actions_by_status,
            moderation_by_day,
        })
    }

    /// Daily comment volume over a window, zero-filled so charts render
    /// gaps honestly.
    pub async fn activity_trend(
        &self,
        filter: &CommentFilter,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<BTreeMap<String, u64>, ThreadError> {
        let filter = CommentFilter {
            from: Some(from),
            to: Some(to),
            ..filter.clone()
        };
        let comments = self.load_comments(&filter).await?;

        let mut trend = zero_filled_days(from, to);
        for comment in &comments {
            *trend.entry(day_key(comment.created_at)).or_insert(0) += 1;
        }
        Ok(trend)
    }

    async fn load_comments(
        &self,
        filter: &CommentFilter,
    ) -> Result<Vec<CommentModel>, ThreadError> {
        let mut query = Comment::find();
        if let Some(post_id) = filter.post_id {
            query = query.filter(CommentColumn::PostId.eq(post_id));
        }
        if let Some(from) = filter.from {
            query = query.filter(CommentColumn::CreatedAt.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(CommentColumn::CreatedAt.lte(to));
        }
        if let Some(department) = &filter.department {
            let authors: Vec<EmployeeId> = Employee::find()
                .filter(EmployeeColumn::Department.eq(department.clone()))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|employee| employee.id)
                .collect();
            if authors.is_empty() {
                return Ok(Vec::new());
            }
            query = query.filter(CommentColumn::AuthorId.is_in(authors));
        }
        Ok(query.all(&self.db).await?)
    }
}

fn day_key(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d").to_string()
}

fn zero_filled_days(from: DateTime<Utc>, to: DateTime<Utc>) -> BTreeMap<String, u64> {
    let mut days = BTreeMap::new();
    let mut day = from.date_naive();
    let last = to.date_naive();
    while day <= last {
        days.insert(day.format("%Y-%m-%d").to_string(), 0);
        day = day + Duration::days(1);
    }
    days
}

fn engagement_score(total_comments: u64, likes: u64, endorsements: u64) -> f64 {
    if total_comments == 0 {
        return 0.0;
    }
    let raw = (total_comments + 2 * likes + 3 * endorsements) as f64;
    (raw / total_comments as f64 * 10.0).min(100.0)
}

#[cfg(test)]
mod tests {
    use sea_orm::Set;

    use super::*;
    use crate::ids::{EndorsementId, LikeId, MentionId};
    use crate::test_utils;

    #[test]
    fn test_engagement_score() {
        assert_eq!(engagement_score(0, 10, 10), 0.0);
        // (2 + 2*1 + 3*1) / 2 * 10 = 35.
        assert_eq!(engagement_score(2, 1, 1), 35.0);
        // Capped at 100.
        assert_eq!(engagement_score(1, 50, 50), 100.0);
    }

    #[test]
    fn test_zero_filled_days_inclusive() {
        let from = "2026-03-01T10:00:00Z".parse().unwrap();
        let to = "2026-03-03T02:00:00Z".parse().unwrap();
        let days = zero_filled_days(from, to);
        assert_eq!(
            days.keys().cloned().collect::<Vec<_>>(),
            vec!["2026-03-01", "2026-03-02", "2026-03-03"]
        );
        assert!(days.values().all(|&count| count == 0));
    }

    #[tokio::test]
    async fn test_thread_summary_counts() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let bob = test_utils::create_employee(&db, "Bob", None, false).await;
        let post = test_utils::create_post(&db, author).await;

        let root = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;
        test_utils::seed_comment(&db, post, author, CommentType::Question).await;
        let pending = test_utils::seed_comment(&db, post, bob, CommentType::Concern).await;
        let mut active: CommentActiveModel = pending.into();
        active.moderation_status = Set(ModerationStatus::Pending);
        active.update(&db).await.unwrap();

        let mention = CommentMentionActiveModel {
            id: Set(MentionId::new()),
            comment_id: Set(root.id),
            mentioned_employee_id: Set(bob),
            mentioned_by_id: Set(author),
            mention_text: Set("@bob".to_string()),
            start_position: Set(0),
            length: Set(4),
            context: Set(MentionContext::General),
            urgency: Set(MentionUrgency::Normal),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(Utc::now()),
        };
        CommentMention::insert(mention).exec(&db).await.unwrap();

        let analytics = AnalyticsService::new(db);
        let summary = analytics
            .thread_summary(&CommentFilter {
                post_id: Some(post),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(summary.total_comments, 3);
        assert_eq!(summary.total_threads, 3);
        assert_eq!(summary.unresolved_items, 2);
        assert_eq!(summary.pending_moderation, 1);
        assert_eq!(summary.total_mentions, 1);
        assert_eq!(summary.comments_by_type.get("Regular"), Some(&1));
        assert_eq!(summary.comments_by_type.get("Question"), Some(&1));
        assert_eq!(summary.comments_by_status.get("Approved"), Some(&2));
        assert_eq!(summary.comments_by_status.get("Pending"), Some(&1));
    }

    #[tokio::test]
    async fn test_thread_summary_department_filter() {
        let db = test_utils::setup_db().await;
        let sales = test_utils::create_employee_in_department(&db, "Sal", "sales").await;
        let eng = test_utils::create_employee_in_department(&db, "Eng", "engineering").await;
        let post = test_utils::create_post(&db, sales).await;

        test_utils::seed_comment(&db, post, sales, CommentType::Regular).await;
        test_utils::seed_comment(&db, post, eng, CommentType::Regular).await;

        let analytics = AnalyticsService::new(db);
        let sales_only = analytics
            .thread_summary(&CommentFilter {
                department: Some("sales".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(sales_only.total_comments, 1);

        let nobody = analytics
            .thread_summary(&CommentFilter {
                department: Some("legal".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(nobody.total_comments, 0);
    }

    #[tokio::test]
    async fn test_user_summary_reactions_and_mentions() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let fan = test_utils::create_employee(&db, "Fan", None, false).await;
        let post = test_utils::create_post(&db, author).await;

        let first = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;
        test_utils::seed_comment(&db, post, author, CommentType::Question).await;

        let like = CommentLikeActiveModel {
            id: Set(LikeId::new()),
            comment_id: Set(first.id),
            employee_id: Set(fan),
            created_at: Set(Utc::now()),
        };
        CommentLike::insert(like).exec(&db).await.unwrap();
        let endorsement = EndorsementActiveModel {
            id: Set(EndorsementId::new()),
            comment_id: Set(first.id),
            endorser_id: Set(fan),
            created_at: Set(Utc::now()),
        };
        Endorsement::insert(endorsement).exec(&db).await.unwrap();

        let mention = CommentMentionActiveModel {
            id: Set(MentionId::new()),
            comment_id: Set(first.id),
            mentioned_employee_id: Set(author),
            mentioned_by_id: Set(fan),
            mention_text: Set("@ada".to_string()),
            start_position: Set(0),
            length: Set(4),
            context: Set(MentionContext::General),
            urgency: Set(MentionUrgency::Normal),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(Utc::now()),
        };
        CommentMention::insert(mention).exec(&db).await.unwrap();

        let analytics = AnalyticsService::new(db);
        let summary = analytics.user_summary(author, None, None).await.unwrap();

        assert_eq!(summary.total_comments, 2);
        assert_eq!(summary.likes_received, 1);
        assert_eq!(summary.endorsements_received, 1);
        assert_eq!(summary.mentions_received, 1);
        assert_eq!(summary.mentions_made, 0);
        assert_eq!(summary.engagement_score, 35.0);
        assert_eq!(summary.active_days, 1);
        // Both comments land on today's bucket.
        assert_eq!(summary.activity_by_day.get(&day_key(Utc::now())), Some(&2));

        let unknown = analytics
            .user_summary(EmployeeId::new(), None, None)
            .await;
        assert!(matches!(unknown, Err(ThreadError::EmployeeNotFound)));
    }

    #[tokio::test]
    async fn test_moderator_summary() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let other_mod = test_utils::create_employee(&db, "Mod2", None, true).await;
        let post = test_utils::create_post(&db, author).await;

        let now = Utc::now();
        for (status, by, minutes) in [
            (ModerationStatus::Approved, moderator, 10),
            (ModerationStatus::Hidden, moderator, 30),
            (ModerationStatus::Approved, other_mod, 20),
        ] {
            let comment = test_utils::seed_comment(&db, post, author, CommentType::Regular).await;
            let mut active: CommentActiveModel = comment.clone().into();
            active.created_at = Set(now - Duration::minutes(minutes));
            active.moderation_status = Set(status);
            active.moderated_by_id = Set(Some(by));
            active.moderated_at = Set(Some(now));
            active.update(&db).await.unwrap();
        }

        let analytics = AnalyticsService::new(db);
        let window_start = now - Duration::days(1);

        let all = analytics
            .moderator_summary(None, window_start, now)
            .await
            .unwrap();
        assert_eq!(all.total_moderated, 3);
        assert_eq!(all.average_response_minutes, 20);
        assert!((all.approval_rate - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(all.actions_by_status.get("Approved"), Some(&2));
        assert_eq!(all.actions_by_status.get("Hidden"), Some(&1));

        let one = analytics
            .moderator_summary(Some(moderator), window_start, now)
            .await
            .unwrap();
        assert_eq!(one.total_moderated, 2);
        assert_eq!(one.average_response_minutes, 20);
        assert_eq!(one.approval_rate, 50.0);
    }

    #[tokio::test]
    async fn test_activity_trend_zero_fills_quiet_days() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let post = test_utils::create_post(&db, author).await;
        test_utils::seed_comment(&db, post, author, CommentType::Regular).await;

        let analytics = AnalyticsService::new(db);
        let now = Utc::now();
        let trend = analytics
            .activity_trend(&CommentFilter::default(), now - Duration::days(2), now)
            .await
            .unwrap();

        assert_eq!(trend.len(), 3);
        assert_eq!(trend.get(&day_key(now)), Some(&1));
        assert_eq!(trend.values().sum::<u64>(), 1);
    }
}
