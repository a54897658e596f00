//! Comment service.
//!
//! Comments are born pending, become approved or rejected exactly once,
//! and rejected ones are swept out by a background job.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use cinema_common::{AppError, AppResult, IdGenerator, VoteKind, VoteRegistry};
use cinema_db::{
    entities::{comment, film},
    repositories::{CommentQuery, CommentRepository, CommentViewer, FilmRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for posting a comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentInput {
    #[validate(length(min = 1, max = 4096))]
    pub text: String,

    /// Optional star rating, 1 to 5.
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,

    /// Reply target; must be a comment on the same film.
    pub parent_id: Option<String>,
}

/// Input for an author editing their comment.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateCommentInput {
    #[validate(length(min = 1, max = 4096))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i16>,
}

/// Input for a moderation decision.
#[derive(Debug, Deserialize)]
pub struct ModerateCommentInput {
    pub status: comment::CommentStatus,
}

/// A comment with its net score and nested replies.
#[derive(Debug, Clone, Serialize)]
pub struct CommentTree {
    #[serde(flatten)]
    pub comment: comment::Model,
    /// Likes minus dislikes.
    pub net_score: i64,
    pub replies: Vec<CommentTree>,
}

/// Comment service for business logic.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    film_repo: FilmRepository,
    vote_registry: Arc<dyn VoteRegistry>,
    id_gen: IdGenerator,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub fn new(
        comment_repo: CommentRepository,
        film_repo: FilmRepository,
        vote_registry: Arc<dyn VoteRegistry>,
    ) -> Self {
        Self {
            comment_repo,
            film_repo,
            vote_registry,
            id_gen: IdGenerator::new(),
        }
    }

    /// Post a comment on a published film. It starts out pending.
    pub async fn create(
        &self,
        film_id: &str,
        user_id: &str,
        input: CreateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let film = self.film_repo.get_by_id(film_id).await?;
        if film.status == film::FilmStatus::Draft {
            return Err(AppError::FilmNotFound(film_id.to_string()));
        }

        if let Some(parent_id) = &input.parent_id {
            let parent = self.comment_repo.get_by_id(parent_id).await?;
            if parent.film_id != film_id {
                return Err(AppError::invalid(
                    "parent",
                    "parent comment belongs to a different film",
                ));
            }
        }

        let model = comment::ActiveModel {
            id: Set(self.id_gen.generate()),
            text: Set(input.text),
            rating: Set(input.rating),
            like_count: Set(0),
            dislike_count: Set(0),
            status: Set(comment::CommentStatus::Pending),
            film_id: Set(film_id.to_string()),
            user_id: Set(user_id.to_string()),
            parent_id: Set(input.parent_id),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        self.comment_repo.create(model).await
    }

    /// Edit a comment. Only the author may edit.
    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        input: UpdateCommentInput,
    ) -> AppResult<comment::Model> {
        input.validate()?;

        let existing = self.comment_repo.get_by_id(id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden(
                "only the author can edit a comment".to_string(),
            ));
        }

        let mut model = comment::ActiveModel {
            id: Set(existing.id.clone()),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        if let Some(text) = input.text {
            model.text = Set(text);
        }
        if let Some(rating) = input.rating {
            model.rating = Set(Some(rating));
        }

        self.comment_repo.update(model).await
    }

    /// Apply a moderation decision.
    ///
    /// The only legal transitions are pending to approved and pending to
    /// rejected; anything else is a conflict.
    pub async fn moderate(
        &self,
        id: &str,
        input: &ModerateCommentInput,
    ) -> AppResult<comment::Model> {
        let existing = self.comment_repo.get_by_id(id).await?;

        if existing.status != comment::CommentStatus::Pending {
            return Err(AppError::Conflict(format!(
                "comment {id} has already been moderated"
            )));
        }
        if input.status == comment::CommentStatus::Pending {
            return Err(AppError::Conflict(
                "a moderation decision cannot be pending".to_string(),
            ));
        }

        let model = comment::ActiveModel {
            id: Set(existing.id.clone()),
            status: Set(input.status),
            updated_at: Set(Some(Utc::now().into())),
            ..Default::default()
        };

        let updated = self.comment_repo.update(model).await?;
        tracing::info!(comment_id = %id, status = ?input.status, "Comment moderated");
        Ok(updated)
    }

    /// Delete a comment. The author or staff may delete.
    pub async fn delete(&self, id: &str, user_id: &str, staff: bool) -> AppResult<()> {
        let existing = self.comment_repo.get_by_id(id).await?;
        if existing.user_id != user_id && !staff {
            return Err(AppError::Forbidden(
                "only the author or staff can delete a comment".to_string(),
            ));
        }
        self.comment_repo.delete(id).await
    }

    /// Get a single comment.
    pub async fn get(&self, id: &str) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(id).await
    }

    /// Get a comment addressed through its film.
    ///
    /// A comment under the wrong film, or one the viewer may not see,
    /// is reported as missing rather than forbidden.
    pub async fn get_for_film(
        &self,
        film_id: &str,
        id: &str,
        viewer: &CommentViewer,
    ) -> AppResult<comment::Model> {
        let comment = self.comment_repo.get_by_id(id).await?;
        if comment.film_id != film_id {
            return Err(AppError::CommentNotFound(id.to_string()));
        }

        let visible = match viewer {
            CommentViewer::Staff => true,
            CommentViewer::User(user_id) => {
                comment.status == comment::CommentStatus::Approved || comment.user_id == *user_id
            }
            CommentViewer::Anonymous => comment.status == comment::CommentStatus::Approved,
        };
        if !visible {
            return Err(AppError::CommentNotFound(id.to_string()));
        }
        Ok(comment)
    }

    /// The comment tree of a film as seen by the viewer.
    ///
    /// Replies hang off their parents; a reply whose parent is not
    /// visible disappears with it.
    pub async fn list_for_film(
        &self,
        film_id: &str,
        viewer: &CommentViewer,
    ) -> AppResult<Vec<CommentTree>> {
        self.film_repo.get_by_id(film_id).await?;

        let comments = self
            .comment_repo
            .find_visible_by_film(film_id, viewer)
            .await?;
        Ok(build_tree(comments))
    }

    /// The moderation queue (staff operation).
    pub async fn list_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<comment::Model>> {
        self.comment_repo.find_pending(limit, offset).await
    }

    /// Flat filtered listing across all films (staff operation).
    pub async fn list(
        &self,
        query: &CommentQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<comment::Model>, u64)> {
        let comments = self.comment_repo.list(query, limit, offset).await?;
        let total = self.comment_repo.count(query).await?;
        Ok((comments, total))
    }

    /// Register a session's like or dislike on a comment.
    ///
    /// One vote per session per comment per kind; repeating the same
    /// kind is a conflict, while a like and a dislike from one session
    /// are independent. The counter update is a relative UPDATE, so two
    /// sessions voting at once both land.
    pub async fn vote(
        &self,
        session_id: &str,
        comment_id: &str,
        kind: VoteKind,
    ) -> AppResult<comment::Model> {
        self.comment_repo.get_by_id(comment_id).await?;

        if !self
            .vote_registry
            .try_register(session_id, comment_id, kind)
            .await?
        {
            return Err(AppError::Conflict(
                "this session has already voted on this comment".to_string(),
            ));
        }

        self.comment_repo.increment_vote(comment_id, kind).await?;
        self.comment_repo.get_by_id(comment_id).await
    }

    /// Delete all rejected comments. Returns how many were removed.
    pub async fn purge_rejected(&self) -> AppResult<u64> {
        let purged = self.comment_repo.purge_rejected().await?;
        if purged > 0 {
            tracing::info!(purged, "Purged rejected comments");
        }
        Ok(purged)
    }
}

fn build_tree(comments: Vec<comment::Model>) -> Vec<CommentTree> {
    let ids: std::collections::HashSet<String> =
        comments.iter().map(|c| c.id.clone()).collect();

    let mut children: HashMap<String, Vec<comment::Model>> = HashMap::new();
    let mut roots = Vec::new();

    for c in comments {
        match &c.parent_id {
            None => roots.push(c),
            Some(parent_id) if ids.contains(parent_id) => {
                children.entry(parent_id.clone()).or_default().push(c);
            }
            // Parent filtered out, the whole subtree goes with it.
            Some(_) => {}
        }
    }

    roots
        .into_iter()
        .map(|c| attach(c, &mut children))
        .collect()
}

fn attach(c: comment::Model, children: &mut HashMap<String, Vec<comment::Model>>) -> CommentTree {
    let replies = children
        .remove(&c.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children))
        .collect();

    CommentTree {
        net_score: i64::from(c.like_count) - i64::from(c.dislike_count),
        replies,
        comment: c,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinema_common::MemoryVoteRegistry;
    use cinema_db::test_utils::{test_comment, test_film};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn service(
        comment_db: sea_orm::DatabaseConnection,
        film_db: sea_orm::DatabaseConnection,
    ) -> CommentService {
        CommentService::new(
            CommentRepository::new(Arc::new(comment_db)),
            FilmRepository::new(Arc::new(film_db)),
            Arc::new(MemoryVoteRegistry::new()),
        )
    }

    fn empty() -> sea_orm::DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn create_input(text: &str) -> CreateCommentInput {
        CreateCommentInput {
            text: text.to_string(),
            rating: None,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_on_draft_film_fails() {
        let mut film = test_film("f1", "Heat");
        film.status = film::FilmStatus::Draft;

        let film_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[film]])
            .into_connection();
        let svc = service(empty(), film_db);

        let result = svc.create("f1", "u1", create_input("hi")).await;
        assert!(matches!(result, Err(AppError::FilmNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_reply_cross_film_fails() {
        let film_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_film("f1", "Heat")]])
            .into_connection();
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_comment("c9", "f2", "u2")]])
            .into_connection();
        let svc = service(comment_db, film_db);

        let mut input = create_input("reply");
        input.parent_id = Some("c9".to_string());

        let result = svc.create("f1", "u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rating_out_of_range() {
        let svc = service(empty(), empty());

        let mut input = create_input("great");
        input.rating = Some(6);

        let result = svc.create("f1", "u1", input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_moderate_pending_to_approved() {
        let pending = test_comment("c1", "f1", "u1");
        let mut approved = pending.clone();
        approved.status = comment::CommentStatus::Approved;

        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .append_query_results([[approved]])
            .into_connection();
        let svc = service(comment_db, empty());

        let input = ModerateCommentInput {
            status: comment::CommentStatus::Approved,
        };
        let result = svc.moderate("c1", &input).await.unwrap();
        assert_eq!(result.status, comment::CommentStatus::Approved);
    }

    #[tokio::test]
    async fn test_moderate_already_decided_conflicts() {
        let mut rejected = test_comment("c1", "f1", "u1");
        rejected.status = comment::CommentStatus::Rejected;

        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[rejected]])
            .into_connection();
        let svc = service(comment_db, empty());

        let input = ModerateCommentInput {
            status: comment::CommentStatus::Approved,
        };
        let result = svc.moderate("c1", &input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_moderate_to_pending_conflicts() {
        let pending = test_comment("c1", "f1", "u1");

        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[pending]])
            .into_connection();
        let svc = service(comment_db, empty());

        let input = ModerateCommentInput {
            status: comment::CommentStatus::Pending,
        };
        let result = svc.moderate("c1", &input).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_by_non_author_forbidden() {
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[test_comment("c1", "f1", "u1")]])
            .into_connection();
        let svc = service(comment_db, empty());

        let result = svc.update("c1", "u2", UpdateCommentInput::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_vote_same_kind_repeat_conflicts() {
        let c = test_comment("c1", "f1", "u1");
        let mut liked = c.clone();
        liked.like_count = 1;
        let mut both = liked.clone();
        both.dislike_count = 1;

        // Each landed vote reads the comment, bumps the counter, reads
        // it back; the conflicting repeat stops after the first read.
        let comment_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![c],
                vec![liked.clone()],
                vec![liked.clone()],
                vec![liked],
                vec![both],
            ])
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let svc = service(comment_db, empty());

        let first = svc.vote("sess1", "c1", VoteKind::Like).await.unwrap();
        assert_eq!(first.like_count, 1);

        let repeat = svc.vote("sess1", "c1", VoteKind::Like).await;
        assert!(matches!(repeat, Err(AppError::Conflict(_))));

        // A dislike is a separate flag, not a repeat.
        let crossed = svc.vote("sess1", "c1", VoteKind::Dislike).await.unwrap();
        assert_eq!(crossed.like_count, 1);
        assert_eq!(crossed.dislike_count, 1);
    }

    #[test]
    fn test_build_tree_nests_replies() {
        let root = test_comment("c1", "f1", "u1");
        let mut reply = test_comment("c2", "f1", "u2");
        reply.parent_id = Some("c1".to_string());
        let mut nested = test_comment("c3", "f1", "u3");
        nested.parent_id = Some("c2".to_string());

        let tree = build_tree(vec![root, reply, nested]);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].replies.len(), 1);
        assert_eq!(tree[0].replies[0].replies[0].comment.id, "c3");
    }

    #[test]
    fn test_build_tree_drops_orphaned_subtree() {
        // c2 replies to an invisible parent; its child c3 goes too.
        let root = test_comment("c1", "f1", "u1");
        let mut orphan = test_comment("c2", "f1", "u2");
        orphan.parent_id = Some("hidden".to_string());
        let mut nested = test_comment("c3", "f1", "u3");
        nested.parent_id = Some("c2".to_string());

        let tree = build_tree(vec![root, orphan, nested]);

        assert_eq!(tree.len(), 1);
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn test_net_score() {
        let mut c = test_comment("c1", "f1", "u1");
        c.like_count = 5;
        c.dislike_count = 2;

        let tree = build_tree(vec![c]);
        assert_eq!(tree[0].net_score, 3);
    }
}
