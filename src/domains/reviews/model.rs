use crate::domains::shared::Authored;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub title_id: i64,
    pub score: i64,
    #[sqlx(flatten)]
    pub authored: Authored,
}
