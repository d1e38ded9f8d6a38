use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Comment;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub pub_date: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            text: comment.authored.text,
            author: comment.authored.author,
            pub_date: comment.authored.pub_date,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentPatch {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub text: Option<String>,
}

impl From<CommentRequest> for CommentPatch {
    fn from(request: CommentRequest) -> Self {
        Self {
            text: Some(request.text),
        }
    }
}
