use std::collections::HashMap;

use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use super::model::{GenreLink, TitleChanges, TitleDetail, TitleFilter, TitleRow};
use crate::domains::shared::{like_pattern, NameSlug};
use crate::error::{AppError, AppResult};
use crate::framework::Pager;
use crate::infrastructure::database::Database;

const TITLE_SELECT: &str = "SELECT t.id, t.name, t.year, t.description, t.category_id, \
     c.name AS category_name, c.slug AS category_slug, \
     (SELECT AVG(r.score) FROM reviews r WHERE r.title_id = t.id) AS rating \
     FROM titles t LEFT JOIN categories c ON c.id = t.category_id";

/// Titles and their genre links. Writes that touch both run in one transaction.
#[derive(Clone)]
pub struct TitleRepository {
    db: Database,
}

impl TitleRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn list(&self, filter: &TitleFilter, pager: &Pager) -> AppResult<(Vec<TitleDetail>, i64)> {
        let mut count_qb = QueryBuilder::<Sqlite>::new(
            "SELECT COUNT(*) AS n FROM titles t LEFT JOIN categories c ON c.id = t.category_id",
        );
        push_filter(&mut count_qb, filter);
        let count: i64 = count_qb
            .build()
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to count titles"))?
            .get("n");

        let mut qb = QueryBuilder::<Sqlite>::new(TITLE_SELECT);
        push_filter(&mut qb, filter);
        qb.push(filter.ordering.sql());
        qb.push(" LIMIT ");
        qb.push_bind(pager.limit());
        qb.push(" OFFSET ");
        qb.push_bind(pager.offset());

        let rows = qb
            .build_query_as::<TitleRow>()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to list titles"))?;

        Ok((self.attach_genres(rows).await?, count))
    }

    pub async fn find(&self, id: i64) -> AppResult<Option<TitleDetail>> {
        let row = sqlx::query_as::<_, TitleRow>(&format!("{} WHERE t.id = ?", TITLE_SELECT))
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, &format!("Failed to get title {}", id)))?;

        match row {
            Some(row) => Ok(self.attach_genres(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let row = sqlx::query("SELECT 1 FROM titles WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to check title"))?;
        Ok(row.is_some())
    }

    pub async fn create(&self, changes: &TitleChanges) -> AppResult<TitleDetail> {
        let mut tx = self.db.begin_transaction().await?;

        let id: i64 = sqlx::query(
            "INSERT INTO titles (name, year, description, category_id) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(&changes.name)
        .bind(changes.year)
        .bind(&changes.description)
        .bind(changes.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to create title"))?
        .get("id");

        if let Some(genre_ids) = &changes.genre_ids {
            link_genres(&mut *tx, id, genre_ids).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to commit title"))?;

        self.find(id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Title {} vanished after insert", id)))
    }

    pub async fn update(&self, id: i64, changes: &TitleChanges) -> AppResult<TitleDetail> {
        let mut tx = self.db.begin_transaction().await?;

        let result = sqlx::query(
            "UPDATE titles SET name = ?, year = ?, description = ?, category_id = ? WHERE id = ?",
        )
        .bind(&changes.name)
        .bind(changes.year)
        .bind(&changes.description)
        .bind(changes.category_id)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to update title"))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Title {} not found", id)));
        }

        if let Some(genre_ids) = &changes.genre_ids {
            sqlx::query("DELETE FROM genre_titles WHERE title_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| AppError::from_sqlx(e, "Failed to unlink genres"))?;
            link_genres(&mut *tx, id, genre_ids).await?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to commit title"))?;

        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Title {} not found", id)))
    }

    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM titles WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to delete title"))?;
        Ok(result.rows_affected() > 0)
    }

    /// Load genres for all rows in one query, keeping each title's genres
    /// ordered by name.
    async fn attach_genres(&self, rows: Vec<TitleRow>) -> AppResult<Vec<TitleDetail>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT gt.title_id, g.name, g.slug FROM genre_titles gt \
             JOIN genres g ON g.id = gt.genre_id WHERE gt.title_id IN (",
        );
        let mut ids = qb.separated(", ");
        for row in &rows {
            ids.push_bind(row.id);
        }
        qb.push(") ORDER BY g.name, g.id");

        let links = qb
            .build_query_as::<GenreLink>()
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to load title genres"))?;

        let mut by_title: HashMap<i64, Vec<NameSlug>> = HashMap::new();
        for link in links {
            by_title.entry(link.title_id).or_default().push(link.genre);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let genres = by_title.remove(&row.id).unwrap_or_default();
                TitleDetail::from_row(row, genres)
            })
            .collect())
    }
}

async fn link_genres(conn: &mut SqliteConnection, title_id: i64, genre_ids: &[i64]) -> AppResult<()> {
    for genre_id in genre_ids {
        sqlx::query("INSERT OR IGNORE INTO genre_titles (title_id, genre_id) VALUES (?, ?)")
            .bind(title_id)
            .bind(genre_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to link genre"))?;
    }
    Ok(())
}

fn push_filter(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TitleFilter) {
    qb.push(" WHERE 1 = 1");

    if let Some(genre) = filter.genre.as_deref().filter(|s| !s.is_empty()) {
        qb.push(
            " AND EXISTS (SELECT 1 FROM genre_titles gt JOIN genres g ON g.id = gt.genre_id \
             WHERE gt.title_id = t.id AND g.slug = ",
        );
        qb.push_bind(genre.to_string());
        qb.push(")");
    }
    if let Some(category) = filter.category.as_deref().filter(|s| !s.is_empty()) {
        qb.push(" AND c.slug = ");
        qb.push_bind(category.to_string());
    }
    if let Some(year) = filter.year {
        qb.push(" AND t.year = ");
        qb.push_bind(year);
    }
    for term in [filter.name.as_deref(), filter.search.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
    {
        qb.push(" AND t.name LIKE ");
        qb.push_bind(like_pattern(term));
        qb.push(" ESCAPE '\\'");
    }
}
