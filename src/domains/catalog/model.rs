use serde::Serialize;

use crate::domains::shared::NameSlug;

/// Which dictionary table a catalog operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    Genre,
}

impl CatalogKind {
    pub fn table(self) -> &'static str {
        match self {
            CatalogKind::Category => "categories",
            CatalogKind::Genre => "genres",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Category => "Category",
            CatalogKind::Genre => "Genre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CatalogItem {
    #[serde(skip)]
    pub id: i64,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: NameSlug,
}
