//! Page-number pagination for listings.
//!
//! Requests carry `page` (1-based) and `limit`; responses wrap results as
//! `{count, next, previous, results}` with absolute links built from the
//! configured base URL.

use axum::http::Uri;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::MAX_PAGE_SIZE;
use crate::db::PageRequest;
use crate::error::AppError;

/// `page` and `limit` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A validated page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    /// Validate the query. A missing `limit` uses `default_limit`; larger
    /// limits are capped at [`MAX_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for page 0 or limit 0.
    pub fn window(self, default_limit: u32) -> Result<PageWindow, AppError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::BadRequest("page must be at least 1".to_string()));
        }
        let limit = self.limit.unwrap_or(default_limit);
        if limit == 0 {
            return Err(AppError::BadRequest("limit must be at least 1".to_string()));
        }
        Ok(PageWindow {
            page,
            limit: limit.min(MAX_PAGE_SIZE),
        })
    }
}

impl PageWindow {
    /// Offset/limit for the repository.
    #[must_use]
    pub fn request(self) -> PageRequest {
        PageRequest {
            limit: i64::from(self.limit),
            offset: i64::from(self.page - 1) * i64::from(self.limit),
        }
    }
}

/// One page of results with navigation links.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Wrap results, linking to neighbouring pages of the same request.
    #[must_use]
    pub fn new(results: Vec<T>, count: i64, window: PageWindow, base_url: &Url, uri: &Uri) -> Self {
        let seen = window.request().offset + i64::from(window.limit);
        let next = (seen < count).then(|| page_link(base_url, uri, window.page + 1));
        let previous = (window.page > 1).then(|| page_link(base_url, uri, window.page - 1));

        Self {
            count,
            next,
            previous,
            results,
        }
    }
}

/// Absolute URL for `path` on the configured host.
#[must_use]
pub fn absolute_url(base_url: &Url, path: &str) -> Url {
    let mut url = base_url.clone();
    url.set_path(path);
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// The request's own URL with `page` replaced.
fn page_link(base_url: &Url, uri: &Uri, page: u32) -> String {
    let mut url = absolute_url(base_url, uri.path());
    let kept: Vec<(String, String)> = url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
        .filter(|(key, _)| key != "page")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair("page", &page.to_string());
    }
    url.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://foodgram.example").unwrap()
    }

    #[test]
    fn test_window_defaults_and_caps() {
        let window = PageQuery::default().window(6).unwrap();
        assert_eq!(window, PageWindow { page: 1, limit: 6 });

        let window = PageQuery {
            page: Some(3),
            limit: Some(500),
        }
        .window(6)
        .unwrap();
        assert_eq!(window.limit, MAX_PAGE_SIZE);
        assert_eq!(window.request().offset, 200);
    }

    #[test]
    fn test_window_rejects_zero() {
        assert!(
            PageQuery {
                page: Some(0),
                limit: None
            }
            .window(6)
            .is_err()
        );
        assert!(
            PageQuery {
                page: None,
                limit: Some(0)
            }
            .window(6)
            .is_err()
        );
    }

    #[test]
    fn test_links_keep_other_parameters() {
        let uri: Uri = "/api/recipes?tags=lunch&tags=dinner&page=2&limit=2"
            .parse()
            .unwrap();
        let window = PageWindow { page: 2, limit: 2 };
        let page = Paginated::new(vec![1, 2], 7, window, &base(), &uri);

        assert_eq!(
            page.next.as_deref(),
            Some("https://foodgram.example/api/recipes?tags=lunch&tags=dinner&limit=2&page=3")
        );
        assert_eq!(
            page.previous.as_deref(),
            Some("https://foodgram.example/api/recipes?tags=lunch&tags=dinner&limit=2&page=1")
        );
    }

    #[test]
    fn test_no_links_past_the_ends() {
        let uri: Uri = "/api/users".parse().unwrap();
        let page = Paginated::new(vec!["a"], 1, PageWindow { page: 1, limit: 6 }, &base(), &uri);
        assert!(page.next.is_none());
        assert!(page.previous.is_none());
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(
            absolute_url(&base(), "/media/recipes/4/image").as_str(),
            "https://foodgram.example/media/recipes/4/image"
        );
    }
}
