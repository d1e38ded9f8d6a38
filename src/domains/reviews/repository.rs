use chrono::Utc;
use sqlx::{sqlite::SqlitePool, Row};

use super::model::Review;
use crate::error::{AppError, AppResult};
use crate::framework::Pager;

const REVIEW_SELECT: &str = "SELECT r.id, r.title_id, r.score, r.author_id, u.username AS author, \
     r.text, r.pub_date FROM reviews r JOIN users u ON u.id = r.author_id";

#[derive(Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reviews of one title, newest first.
    pub async fn list(&self, title_id: i64, pager: &Pager) -> AppResult<(Vec<Review>, i64)> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM reviews WHERE title_id = ?")
            .bind(title_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to count reviews"))?
            .get("n");

        let reviews = sqlx::query_as::<_, Review>(&format!(
            "{} WHERE r.title_id = ? ORDER BY r.pub_date DESC, r.id DESC LIMIT ? OFFSET ?",
            REVIEW_SELECT
        ))
        .bind(title_id)
        .bind(pager.limit())
        .bind(pager.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to list reviews"))?;

        Ok((reviews, count))
    }

    /// A review, provided it belongs to `title_id`.
    pub async fn find(&self, title_id: i64, id: i64) -> AppResult<Option<Review>> {
        sqlx::query_as::<_, Review>(&format!(
            "{} WHERE r.id = ? AND r.title_id = ?",
            REVIEW_SELECT
        ))
        .bind(id)
        .bind(title_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, &format!("Failed to get review {}", id)))
    }

    pub async fn exists_for_author(&self, title_id: i64, author_id: i64) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM reviews WHERE title_id = ? AND author_id = ?")
            .bind(title_id)
            .bind(author_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to check existing review"))?;
        Ok(row.is_some())
    }

    /// Insert a review stamped with the current time. A second review by the
    /// same author on the same title surfaces as `Conflict`.
    pub async fn create(&self, title_id: i64, author_id: i64, text: &str, score: i64) -> AppResult<Review> {
        let id: i64 = sqlx::query(
            "INSERT INTO reviews (author_id, title_id, text, score, pub_date) VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(author_id)
        .bind(title_id)
        .bind(text)
        .bind(score)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Review of this title by this author"))?
        .get("id");

        self.find(title_id, id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Review {} vanished after insert", id)))
    }

    pub async fn update(&self, review: &Review) -> AppResult<Review> {
        let result = sqlx::query("UPDATE reviews SET text = ?, score = ? WHERE id = ?")
            .bind(&review.authored.text)
            .bind(review.score)
            .bind(review.id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to update review"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Review {} not found", review.id)));
        }
        self.find(review.title_id, review.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Review {} not found", review.id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to delete review"))?;
        Ok(result.rows_affected() > 0)
    }
}
