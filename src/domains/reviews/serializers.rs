use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::Review;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub score: i64,
    pub pub_date: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            text: review.authored.text,
            author: review.authored.author,
            score: review.score,
            pub_date: review.authored.pub_date,
        }
    }
}

/// POST and PUT body. Author and title come from the request context.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub text: String,

    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: i64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewPatch {
    #[validate(length(min = 1, message = "This field may not be blank"))]
    pub text: Option<String>,

    #[validate(range(min = 1, max = 10, message = "Score must be between 1 and 10"))]
    pub score: Option<i64>,
}

impl ReviewPatch {
    pub fn apply_to(self, review: &mut Review) {
        if let Some(text) = self.text {
            review.authored.text = text;
        }
        if let Some(score) = self.score {
            review.score = score;
        }
    }
}

impl From<ReviewRequest> for ReviewPatch {
    fn from(request: ReviewRequest) -> Self {
        Self {
            text: Some(request.text),
            score: Some(request.score),
        }
    }
}
