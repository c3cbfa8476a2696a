use serde::{Deserialize, Serialize};

use crate::pagination::Page;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieCastQuery {
    pub movie_id: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl MovieCastQuery {
    pub fn is_paged(&self) -> bool {
        self.movie_id.is_some() || self.page.is_some() || self.page_size.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub next_link: Option<String>,
    pub total_count: u64,
    pub page_size: u64,
    pub current_page: u64,
}

impl<T> ListResponse<T> {
    pub fn new(page: Page<T>, path: &str) -> Self {
        let next_link = page
            .next_window()
            .map(|next| format!("{path}?skip={}&limit={}", next.skip, next.limit));
        Self {
            next_link,
            total_count: page.total,
            page_size: page.window.limit,
            current_page: page.current_page(),
            data: page.items,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
    pub next_link: Option<String>,
}

impl<T> PagedResponse<T> {
    pub fn new(page: Page<T>, path: &str, movie_id: Option<i32>) -> Self {
        let current_page = page.current_page();
        let total_pages = page.total_pages();
        let next_link = (current_page < total_pages).then(|| {
            let filter = movie_id.map(|id| format!("movieId={id}&")).unwrap_or_default();
            format!("{path}?{filter}page={}&pageSize={}", current_page + 1, page.window.limit)
        });
        Self {
            total_items: page.total,
            total_pages,
            current_page,
            page_size: page.window.limit,
            next_link,
            items: page.items,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct FileOnlyForm {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_path: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::Window;

    #[test]
    fn list_response_links_to_following_window() {
        let page = Page { items: vec![1, 2], total: 5, window: Window { skip: 0, limit: 2 } };
        let resp = ListResponse::new(page, "/api/genres");

        assert_eq!(resp.next_link.as_deref(), Some("/api/genres?skip=2&limit=2"));
        assert_eq!(resp.total_count, 5);
        assert_eq!(resp.current_page, 1);
    }

    #[test]
    fn paged_response_keeps_movie_filter_in_link() {
        let page = Page { items: vec!['a'], total: 3, window: Window { skip: 1, limit: 1 } };
        let resp = PagedResponse::new(page, "/api/movie-casts", Some(7));

        assert_eq!(resp.current_page, 2);
        assert_eq!(resp.total_pages, 3);
        assert_eq!(resp.next_link.as_deref(), Some("/api/movie-casts?movieId=7&page=3&pageSize=1"));
    }

    #[test]
    fn paged_response_has_no_link_on_last_page() {
        let page = Page { items: vec!['a'], total: 3, window: Window { skip: 2, limit: 1 } };
        assert_eq!(PagedResponse::new(page, "/api/movie-casts", None).next_link, None);
    }
}
