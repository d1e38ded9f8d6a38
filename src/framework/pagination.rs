// Page-number pagination for list endpoints

use axum::http::Uri;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Response envelope for paginated lists
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Requested page window. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub page: u32,
    pub page_size: u32,
}

impl Pager {
    pub fn new(page: Option<u32>, page_size: u32) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(Self {
            page,
            page_size: page_size.max(1),
        })
    }

    /// Pager from the raw `page` query value; anything that is not a page number is 404.
    pub fn from_query(page: Option<&str>, page_size: u32) -> AppResult<Self> {
        let page = page
            .map(|raw| {
                raw.trim()
                    .parse::<u32>()
                    .map_err(|_| AppError::NotFound("Invalid page".to_string()))
            })
            .transpose()?;
        Self::new(page, page_size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Pages past the end are an error, except the first page of an empty list.
    pub fn ensure_in_range(&self, count: i64) -> AppResult<()> {
        if self.page > 1 && self.offset() >= count {
            return Err(AppError::NotFound("Invalid page".to_string()));
        }
        Ok(())
    }

    /// Wrap one page of results, linking the neighbouring pages of `uri`.
    pub fn paginate<T>(&self, uri: &Uri, count: i64, results: Vec<T>) -> Page<T> {
        let has_next = self.offset() + (results.len() as i64) < count;
        let next = has_next.then(|| page_link(uri, self.page + 1));
        let previous = (self.page > 1).then(|| page_link(uri, self.page - 1));
        Page {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Same path and query with `page` replaced; page 1 drops the parameter.
fn page_link(uri: &Uri, page: u32) -> String {
    let mut params: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();
    if page > 1 {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        uri.path().to_string()
    } else {
        format!("{}?{}", uri.path(), params.join("&"))
    }
}
