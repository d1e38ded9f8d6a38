use crate::domains::shared::Authored;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub review_id: i64,
    #[sqlx(flatten)]
    pub authored: Authored,
}
