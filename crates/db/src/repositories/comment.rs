//! Comment repository.

use std::sync::Arc;

use crate::entities::{Comment, comment};
use cinema_common::{AppError, AppResult, VoteKind};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};

/// Who is looking at the comment section. Determines which moderation
/// states are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentViewer {
    /// Sees approved comments only.
    Anonymous,
    /// Sees approved comments plus their own, whatever the state.
    User(String),
    /// Sees everything except rejected comments.
    Staff,
}

/// Filters for the flat moderation listing. All fields are conjunctive.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub status: Option<comment::CommentStatus>,
    pub rating: Option<i16>,
    pub user_id: Option<String>,
    pub film_id: Option<String>,
    /// Case-insensitive substring match on the comment text.
    pub search: Option<String>,
}

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Create a new comment.
    pub async fn create(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a comment.
    pub async fn update(&self, model: comment::ActiveModel) -> AppResult<comment::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a comment.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Comment::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All comments on a film visible to the viewer, oldest first.
    ///
    /// Returns the full set so the caller can assemble the reply tree;
    /// replies whose parent is filtered out are dropped there.
    pub async fn find_visible_by_film(
        &self,
        film_id: &str,
        viewer: &CommentViewer,
    ) -> AppResult<Vec<comment::Model>> {
        let visibility = match viewer {
            CommentViewer::Anonymous => {
                Condition::all().add(comment::Column::Status.eq(comment::CommentStatus::Approved))
            }
            CommentViewer::User(user_id) => Condition::any()
                .add(comment::Column::Status.eq(comment::CommentStatus::Approved))
                .add(comment::Column::UserId.eq(user_id)),
            CommentViewer::Staff => {
                Condition::all().add(comment::Column::Status.ne(comment::CommentStatus::Rejected))
            }
        };

        Comment::find()
            .filter(comment::Column::FilmId.eq(film_id))
            .filter(visibility)
            .order_by_asc(comment::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List comments matching the query, newest first (paginated).
    pub async fn list(
        &self,
        query: &CommentQuery,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(Self::condition(query))
            .order_by_desc(comment::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments matching the query.
    pub async fn count(&self, query: &CommentQuery) -> AppResult<u64> {
        Comment::find()
            .filter(Self::condition(query))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn condition(query: &CommentQuery) -> Condition {
        let mut condition = Condition::all();

        if let Some(status) = query.status {
            condition = condition.add(comment::Column::Status.eq(status));
        }
        if let Some(rating) = query.rating {
            condition = condition.add(comment::Column::Rating.eq(rating));
        }
        if let Some(user_id) = &query.user_id {
            condition = condition.add(comment::Column::UserId.eq(user_id));
        }
        if let Some(film_id) = &query.film_id {
            condition = condition.add(comment::Column::FilmId.eq(film_id));
        }
        if let Some(term) = &query.search {
            condition = condition.add(comment::Column::Text.contains(term));
        }

        condition
    }

    /// Comments awaiting moderation, oldest first (paginated).
    pub async fn find_pending(&self, limit: u64, offset: u64) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::Status.eq(comment::CommentStatus::Pending))
            .order_by_asc(comment::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment a vote counter atomically (single UPDATE query, no fetch).
    pub async fn increment_vote(&self, comment_id: &str, kind: VoteKind) -> AppResult<()> {
        let column = match kind {
            VoteKind::Like => comment::Column::LikeCount,
            VoteKind::Dislike => comment::Column::DislikeCount,
        };

        Comment::update_many()
            .col_expr(column, Expr::col(column).add(1))
            .filter(comment::Column::Id.eq(comment_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete all rejected comments. Returns the number of rows removed.
    pub async fn purge_rejected(&self) -> AppResult<u64> {
        let result = Comment::delete_many()
            .filter(comment::Column::Status.eq(comment::CommentStatus::Rejected))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
