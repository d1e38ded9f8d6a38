use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use super::model::TitleDetail;
use crate::domains::shared::NameSlug;
use crate::framework::Operation;

/// Full title payload (POST and PUT). Relations are referenced by slug.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TitleRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    #[serde(default)]
    pub genre: Vec<String>,
    pub category: Option<String>,
}

/// Partial title payload (PATCH). An explicit `null` clears a nullable field.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TitlePatch {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    pub genre: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: Option<Option<String>>,
}

impl From<TitleRequest> for TitlePatch {
    fn from(request: TitleRequest) -> Self {
        Self {
            name: Some(request.name),
            year: Some(request.year),
            description: Some(request.description),
            genre: Some(request.genre),
            category: Some(request.category),
        }
    }
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `default`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Read shape: related objects embedded, rating included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRead {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub genre: Vec<NameSlug>,
    pub category: Option<NameSlug>,
}

/// Write shape: relations as slugs, no rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleWrite {
    pub id: i64,
    pub name: String,
    pub year: i32,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TitleView {
    Read(TitleRead),
    Write(TitleWrite),
}

impl TitleView {
    pub fn for_operation(op: Operation, title: TitleDetail) -> Self {
        if op.is_safe() {
            TitleView::Read(TitleRead {
                id: title.id,
                name: title.name,
                year: title.year,
                rating: title.rating,
                description: title.description,
                genre: title.genres,
                category: title.category,
            })
        } else {
            TitleView::Write(TitleWrite {
                id: title.id,
                name: title.name,
                year: title.year,
                description: title.description,
                genre: title.genres.into_iter().map(|g| g.slug).collect(),
                category: title.category.map(|c| c.slug),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> TitleDetail {
        TitleDetail {
            id: 7,
            name: "Dune".to_string(),
            year: 1965,
            description: None,
            category_id: Some(1),
            category: Some(NameSlug {
                name: "Books".to_string(),
                slug: "books".to_string(),
            }),
            genres: vec![NameSlug {
                name: "Sci-Fi".to_string(),
                slug: "sci-fi".to_string(),
            }],
            rating: Some(9.0),
        }
    }

    #[test]
    fn test_read_shape_embeds_relations() {
        let json = serde_json::to_value(TitleView::for_operation(Operation::Retrieve, dune())).unwrap();
        assert_eq!(json["rating"], 9.0);
        assert_eq!(json["category"]["slug"], "books");
        assert_eq!(json["genre"][0]["name"], "Sci-Fi");
    }

    #[test]
    fn test_write_shape_uses_slugs() {
        let json = serde_json::to_value(TitleView::for_operation(Operation::Create, dune())).unwrap();
        assert!(json.get("rating").is_none());
        assert_eq!(json["category"], "books");
        assert_eq!(json["genre"][0], "sci-fi");
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: TitlePatch = serde_json::from_str(r#"{"name": "Dune"}"#).unwrap();
        assert_eq!(absent.category, None);

        let cleared: TitlePatch = serde_json::from_str(r#"{"category": null}"#).unwrap();
        assert_eq!(cleared.category, Some(None));

        let set: TitlePatch = serde_json::from_str(r#"{"category": "books"}"#).unwrap();
        assert_eq!(set.category, Some(Some("books".to_string())));
    }

    #[test]
    fn test_name_has_no_upper_bound() {
        let long = "x".repeat(300);
        let request: TitleRequest =
            serde_json::from_value(serde_json::json!({"name": long, "year": 1965})).unwrap();
        assert!(request.validate().is_ok());

        let patch = TitlePatch {
            name: Some(long),
            ..TitlePatch::default()
        };
        assert!(patch.validate().is_ok());

        let empty = TitlePatch {
            name: Some(String::new()),
            ..TitlePatch::default()
        };
        assert!(empty.validate().is_err());
    }
}
