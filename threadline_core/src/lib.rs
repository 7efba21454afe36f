use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub mod config;
pub mod entity;
pub mod error;
pub mod ids;
pub mod models;
pub mod notify;
pub mod service;
pub mod test_utils;

use crate::config::ThreadlineConfig;
use crate::notify::{NoopEmitter, NotificationEmitter};
use crate::service::analytics::AnalyticsService;
use crate::service::comments::CommentsService;
use crate::service::mentions::MentionsService;
use crate::service::moderation::ModerationService;
use crate::service::resolution::ResolutionService;

/// Handle to a running discussion engine: the database connection plus one
/// instance of each service, all sharing it.
pub struct Threadline {
    pub config: ThreadlineConfig,
    pub db: DatabaseConnection,
    pub comments: CommentsService,
    pub moderation: ModerationService,
    pub resolution: ResolutionService,
    pub mentions: MentionsService,
    pub analytics: AnalyticsService,
}

impl Threadline {
    /// Opens (or creates) the engine in the platform data directory, with
    /// notifications discarded.
    pub async fn start() -> Result<Self, Box<dyn std::error::Error>> {
        Self::start_with_emitter(Arc::new(NoopEmitter)).await
    }

    pub async fn start_with_emitter(
        emitter: Arc<dyn NotificationEmitter>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::get_or_init().await?;
        let db = models::open_or_create_db(&config).await?;
        models::migrate_up(&db).await?;

        Ok(Self::assemble(config, db, emitter))
    }

    /// Wires the services onto an already opened and migrated database.
    /// Embedders with their own connection management come in here.
    pub fn assemble(
        config: ThreadlineConfig,
        db: DatabaseConnection,
        emitter: Arc<dyn NotificationEmitter>,
    ) -> Self {
        Threadline {
            comments: CommentsService::new_with_policy(db.clone(), config.auto_approve_comments),
            moderation: ModerationService::new(db.clone(), emitter),
            resolution: ResolutionService::new(db.clone()),
            mentions: MentionsService::new(db.clone()),
            analytics: AnalyticsService::new(db.clone()),
            config,
            db,
        }
    }

    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        self.db.close().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::prelude::*;
    use crate::notify::RecordingEmitter;
    use crate::service::comments::NewComment;
    use crate::test_utils;

    #[tokio::test]
    async fn test_assembled_services_share_one_store() {
        let db = test_utils::setup_db().await;
        let author = test_utils::create_employee(&db, "Ada", None, false).await;
        let moderator = test_utils::create_employee(&db, "Mod", None, true).await;
        let post = test_utils::create_post(&db, author).await;

        let emitter = Arc::new(RecordingEmitter::new());
        let engine = Threadline::assemble(
            ThreadlineConfig::at(std::env::temp_dir()),
            db,
            emitter.clone(),
        );

        let question = engine
            .comments
            .create(
                author,
                NewComment {
                    kind: CommentType::Question,
                    ..NewComment::new(post, "does this hold together?")
                },
            )
            .await
            .unwrap();

        engine
            .moderation
            .moderate(question.id, moderator, ModerationStatus::Flagged, None)
            .await
            .unwrap();
        assert_eq!(emitter.sent().len(), 1);

        engine
            .resolution
            .resolve(question.id, author, Some("it does".to_string()))
            .await
            .unwrap();

        let summary = engine
            .analytics
            .thread_summary(&Default::default())
            .await
            .unwrap();
        assert_eq!(summary.total_comments, 1);
        assert_eq!(summary.unresolved_items, 0);
    }
}
