// Page requests and the pagination headers sent with list responses

use axum::http::{HeaderMap, HeaderValue, Uri};
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 2000;

pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Zero-based page request read from `?page=&size=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    #[serde(default)]
    pub page: u64,
    #[serde(default = "default_page_size")]
    pub size: u64,
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 0, size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }.clamped()
    }

    /// Size bounded to 1..=MAX_PAGE_SIZE
    pub fn clamped(self) -> Self {
        Self {
            page: self.page,
            size: self.size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// One page of results plus the total across all pages
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    #[serde(skip)]
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self { content, total_elements, request }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(self.request.size.max(1))
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            request: self.request,
        }
    }
}

/// Builds `X-Total-Count` and an RFC 5988 `Link` header (next, prev, last, first)
pub fn generate_pagination_headers<T>(uri: &Uri, page: &Page<T>) -> HeaderMap {
    let mut headers: HeaderMap = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.total_elements));

    let page_number: u64 = page.request.page;
    let size: u64 = page.request.size;
    let total_pages: u64 = page.total_pages();
    let last_page: u64 = total_pages.saturating_sub(1);

    let mut links: Vec<String> = Vec::with_capacity(4);
    let next_page: u64 = page_number.saturating_add(1);
    if next_page < total_pages {
        links.push(prepare_link(uri, next_page, size, "next"));
    }
    if page_number > 0 {
        links.push(prepare_link(uri, page_number - 1, size, "prev"));
    }
    links.push(prepare_link(uri, last_page, size, "last"));
    links.push(prepare_link(uri, 0, size, "first"));

    if let Ok(value) = HeaderValue::try_from(links.join(",")) {
        headers.insert(axum::http::header::LINK, value);
    }
    headers
}

fn prepare_link(uri: &Uri, page: u64, size: u64, rel: &str) -> String {
    let mut query: Vec<String> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key: &str = pair.split('=').next().unwrap_or_default();
            key != "page" && key != "size"
        })
        .map(str::to_string)
        .collect();
    query.push(format!("page={page}"));
    query.push(format!("size={size}"));

    format!("<{}?{}>; rel=\"{}\"", uri.path(), query.join("&"), rel)
}
