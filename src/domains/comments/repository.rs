use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use super::model::Comment;
use crate::error::{AppError, AppResult};
use crate::framework::Pager;

const COMMENT_SELECT: &str = "SELECT c.id, c.review_id, c.author_id, u.username AS author, \
     c.text, c.pub_date FROM comments c JOIN users u ON u.id = c.author_id";

#[derive(Clone)]
pub struct CommentRepository {
    pool: SqlitePool,
}

impl CommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, review_id: i64, pager: &Pager) -> AppResult<(Vec<Comment>, i64)> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM comments WHERE review_id = ?")
            .bind(review_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to count comments"))?
            .get("n");

        let comments = sqlx::query_as::<_, Comment>(&format!(
            "{} WHERE c.review_id = ? ORDER BY c.pub_date DESC, c.id DESC LIMIT ? OFFSET ?",
            COMMENT_SELECT
        ))
        .bind(review_id)
        .bind(pager.limit())
        .bind(pager.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to list comments"))?;

        Ok((comments, count))
    }

    /// A comment, provided it belongs to `review_id`.
    pub async fn find(&self, review_id: i64, id: i64) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>(&format!(
            "{} WHERE c.id = ? AND c.review_id = ?",
            COMMENT_SELECT
        ))
        .bind(id)
        .bind(review_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, &format!("Failed to get comment {}", id)))
    }

    pub async fn create(&self, review_id: i64, author_id: i64, text: &str) -> AppResult<Comment> {
        let id: i64 = sqlx::query(
            "INSERT INTO comments (author_id, review_id, text, pub_date) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(author_id)
        .bind(review_id)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to create comment"))?
        .get("id");

        self.find(review_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Comment {} vanished after insert", id)))
    }

    pub async fn update(&self, comment: &Comment) -> AppResult<Comment> {
        let result = sqlx::query("UPDATE comments SET text = ? WHERE id = ?")
            .bind(&comment.authored.text)
            .bind(comment.id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to update comment"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Comment {} not found", comment.id)));
        }
        self.find(comment.review_id, comment.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", comment.id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to delete comment"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::reviews::ReviewRepository;
    use crate::domains::titles::{TitleChanges, TitleRepository};
    use crate::domains::users::{NewUser, UserRepository};
    use crate::infrastructure::database::Database;

    #[tokio::test]
    async fn test_comments_follow_their_review() {
        let db = Database::in_memory().await.unwrap();
        let alice = UserRepository::new(db.pool().clone())
            .create(&NewUser {
                username: "alice".to_string(),
                email: "alice@x.io".to_string(),
                ..NewUser::default()
            })
            .await
            .unwrap();
        let title = TitleRepository::new(db.clone())
            .create(&TitleChanges {
                name: "Dune".to_string(),
                year: 1965,
                ..TitleChanges::default()
            })
            .await
            .unwrap();
        let reviews = ReviewRepository::new(db.pool().clone());
        let review = reviews.create(title.id, alice.id, "Good", 8).await.unwrap();

        let comments = CommentRepository::new(db.pool().clone());
        let comment = comments.create(review.id, alice.id, "Agreed").await.unwrap();
        assert_eq!(comment.authored.author, "alice");
        assert!(comments.find(review.id + 1, comment.id).await.unwrap().is_none());

        assert!(reviews.delete(review.id).await.unwrap());
        assert!(comments.find(review.id, comment.id).await.unwrap().is_none());
    }
}
