use crate::domains::shared::NameSlug;

/// Flat row as selected from `titles` joined with its category.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TitleRow {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub category_slug: Option<String>,
    /// Mean review score, NULL when the title has no reviews.
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GenreLink {
    pub title_id: i64,
    #[sqlx(flatten)]
    pub genre: NameSlug,
}

/// A title with its relations resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleDetail {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub category: Option<NameSlug>,
    pub genres: Vec<NameSlug>,
    pub rating: Option<f64>,
}

impl TitleDetail {
    pub fn from_row(row: TitleRow, genres: Vec<NameSlug>) -> Self {
        let category = match (row.category_name, row.category_slug) {
            (Some(name), Some(slug)) => Some(NameSlug { name, slug }),
            _ => None,
        };
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            description: row.description,
            category_id: row.category_id,
            category,
            genres,
            rating: row.rating,
        }
    }

    /// Current column values, as the base for a partial update.
    pub fn to_changes(&self) -> TitleChanges {
        TitleChanges {
            name: self.name.clone(),
            year: self.year,
            description: self.description.clone(),
            category_id: self.category_id,
            genre_ids: None,
        }
    }
}

/// Column values to write. `genre_ids` of `None` leaves the links untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleChanges {
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub genre_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TitleOrdering {
    #[default]
    NameAsc,
    NameDesc,
}

impl TitleOrdering {
    /// `name` and `-name` are recognised; anything else keeps the default.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("-name") => TitleOrdering::NameDesc,
            _ => TitleOrdering::NameAsc,
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            TitleOrdering::NameAsc => " ORDER BY t.name ASC, t.id ASC",
            TitleOrdering::NameDesc => " ORDER BY t.name DESC, t.id DESC",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TitleFilter {
    pub genre: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub name: Option<String>,
    pub search: Option<String>,
    pub ordering: TitleOrdering,
}
