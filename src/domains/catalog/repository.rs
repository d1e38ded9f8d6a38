use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use super::model::{CatalogItem, CatalogKind};
use crate::domains::shared::{like_pattern, NameSlug};
use crate::error::{AppError, AppResult};
use crate::framework::Pager;

#[derive(Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
    kind: CatalogKind,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool, kind: CatalogKind) -> Self {
        Self { pool, kind }
    }

    /// One page ordered by name, optionally narrowed to names containing `search`.
    pub async fn list(&self, search: Option<&str>, pager: &Pager) -> AppResult<(Vec<CatalogItem>, i64)> {
        let mut count_qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT COUNT(*) AS n FROM {}", self.kind.table()));
        push_search(&mut count_qb, search);
        let count: i64 = count_qb
            .build()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to count catalog entries"))?
            .get("n");

        let mut qb =
            QueryBuilder::<Sqlite>::new(format!("SELECT id, name, slug FROM {}", self.kind.table()));
        push_search(&mut qb, search);
        qb.push(" ORDER BY name, id LIMIT ");
        qb.push_bind(pager.limit());
        qb.push(" OFFSET ");
        qb.push_bind(pager.offset());

        let items = qb
            .build_query_as::<CatalogItem>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to list catalog entries"))?;

        Ok((items, count))
    }

    pub async fn create(&self, fields: &NameSlug) -> AppResult<CatalogItem> {
        sqlx::query_as::<_, CatalogItem>(&format!(
            "INSERT INTO {} (name, slug) VALUES (?, ?) RETURNING id, name, slug",
            self.kind.table()
        ))
        .bind(&fields.name)
        .bind(&fields.slug)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, &format!("{} with this slug", self.kind.label())))
    }

    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<CatalogItem>> {
        sqlx::query_as::<_, CatalogItem>(&format!(
            "SELECT id, name, slug FROM {} WHERE slug = ?",
            self.kind.table()
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_sqlx(e, "Failed to get catalog entry"))
    }

    pub async fn delete_by_slug(&self, slug: &str) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE slug = ?", self.kind.table()))
            .bind(slug)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from_sqlx(e, "Failed to delete catalog entry"))?;
        Ok(result.rows_affected() > 0)
    }
}

fn push_search(qb: &mut QueryBuilder<'_, Sqlite>, search: Option<&str>) {
    if let Some(term) = search.filter(|s| !s.is_empty()) {
        qb.push(" WHERE name LIKE ");
        qb.push_bind(like_pattern(term));
        qb.push(" ESCAPE '\\'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::Database;

    fn fields(name: &str, slug: &str) -> NameSlug {
        NameSlug {
            name: name.to_string(),
            slug: slug.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_list_delete() {
        let db = Database::in_memory().await.unwrap();
        let genres = CatalogRepository::new(db.pool().clone(), CatalogKind::Genre);

        genres.create(&fields("Thriller", "thriller")).await.unwrap();
        genres.create(&fields("Drama", "drama")).await.unwrap();
        genres.create(&fields("Sci-Fi", "sci-fi")).await.unwrap();

        let pager = Pager::new(None, 20).unwrap();
        let (items, count) = genres.list(None, &pager).await.unwrap();
        assert_eq!(count, 3);
        let names: Vec<_> = items.iter().map(|i| i.fields.name.as_str()).collect();
        assert_eq!(names, vec!["Drama", "Sci-Fi", "Thriller"]);

        let (found, count) = genres.list(Some("ill"), &pager).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(found[0].fields.slug, "thriller");

        assert!(genres.delete_by_slug("drama").await.unwrap());
        assert!(!genres.delete_by_slug("drama").await.unwrap());
        assert!(genres.find_by_slug("drama").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let db = Database::in_memory().await.unwrap();
        let categories = CatalogRepository::new(db.pool().clone(), CatalogKind::Category);
        categories.create(&fields("Films", "films")).await.unwrap();
        let again = categories.create(&fields("Movies", "films")).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));

        // Same slug in the other dictionary is fine.
        let genres = CatalogRepository::new(db.pool().clone(), CatalogKind::Genre);
        assert!(genres.create(&fields("Films", "films")).await.is_ok());
    }
}
