//! Pagination envelope primitives shared by DEV-CRAFT portal endpoints.
//!
//! Every list endpoint wraps its records in the same server-computed
//! envelope: the page of `data`, the `current_page`/`last_page` metadata,
//! and a pre-rendered `links` list (Previous, numbered pages, Next) so the
//! client renders pagination without computing anything itself.

use serde::Serialize;

/// Default number of records per page.
pub const DEFAULT_PER_PAGE: u32 = 10;
/// Upper bound accepted for a client-supplied page size.
pub const MAX_PER_PAGE: u32 = 50;

/// Errors raised while parsing client-supplied paging parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The `page` query parameter is not a positive integer.
    #[error("page must be a positive integer, got {value:?}")]
    InvalidPage {
        /// The rejected raw value.
        value: String,
    },
    /// The `per_page` query parameter is not a positive integer.
    #[error("per_page must be a positive integer, got {value:?}")]
    InvalidPerPage {
        /// The rejected raw value.
        value: String,
    },
}

/// A parsed, clamped paging request.
///
/// `page` is 1-based and clamped to at least 1; `per_page` is clamped to
/// `1..=MAX_PER_PAGE`. The optional `search` term is trimmed and dropped
/// when empty so repositories never see a blank filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
    search: Option<String>,
}

impl PageRequest {
    /// Build a request from already-numeric parameters, clamping both.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            search: None,
        }
    }

    /// The first page with the default page size.
    #[must_use]
    pub fn first_page() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }

    /// Parse raw query-string values.
    ///
    /// Absent values fall back to page 1 and [`DEFAULT_PER_PAGE`]. Values
    /// that are present but not positive integers are an error rather than
    /// being silently corrected.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either parameter fails to parse.
    pub fn from_raw(
        page: Option<&str>,
        per_page: Option<&str>,
        search: Option<&str>,
    ) -> Result<Self, PageRequestError> {
        let page = match page {
            None => 1,
            Some(raw) => parse_positive(raw).ok_or_else(|| PageRequestError::InvalidPage {
                value: raw.to_owned(),
            })?,
        };
        let per_page = match per_page {
            None => DEFAULT_PER_PAGE,
            Some(raw) => parse_positive(raw).ok_or_else(|| PageRequestError::InvalidPerPage {
                value: raw.to_owned(),
            })?,
        };
        Ok(Self::new(page, per_page).with_search(search.map(str::to_owned)))
    }

    /// Attach a search term, trimming it and dropping blanks.
    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search
            .map(|term| term.trim().to_owned())
            .filter(|term| !term.is_empty());
        self
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Records per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// The trimmed search term, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Zero-based record offset for repository queries.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page as i64 - 1) * self.per_page as i64
    }

    /// Record limit for repository queries.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// One rendered pagination link.
///
/// `url` is `None` for the disabled Previous/Next edges; the active page
/// keeps its URL so resubmitting it is harmless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// Target URL, absent when the link is disabled.
    pub url: Option<String>,
    /// Display label ("Previous", "1", "2", ..., "Next").
    pub label: String,
    /// Whether this link points at the current page.
    pub active: bool,
}

/// The standard pagination envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paginated<T> {
    /// The records on this page.
    pub data: Vec<T>,
    /// 1-based current page number.
    pub current_page: u32,
    /// Last available page (at least 1, even when empty).
    pub last_page: u32,
    /// Page size used to compute the envelope.
    pub per_page: u32,
    /// Total matching records across all pages.
    pub total: u64,
    /// Server-rendered navigation links.
    pub links: Vec<PageLink>,
}

impl<T> Paginated<T> {
    /// Assemble an envelope from one page of records and the total count.
    ///
    /// `last_page` is `ceil(total / per_page)` with a floor of 1, so a page
    /// request past the end yields empty `data` with correct metadata.
    #[must_use]
    pub fn build(data: Vec<T>, total: u64, request: &PageRequest, base_path: &str) -> Self {
        let per_page = request.per_page();
        let last_page =
            u32::try_from(total.div_ceil(u64::from(per_page)).max(1)).unwrap_or(u32::MAX);
        let current_page = request.page();
        let links = render_links(current_page, last_page, request, base_path);
        Self {
            data,
            current_page,
            last_page,
            per_page,
            total,
            links,
        }
    }

    /// Transform the records while keeping the metadata intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            current_page: self.current_page,
            last_page: self.last_page,
            per_page: self.per_page,
            total: self.total,
            links: self.links,
        }
    }
}

fn parse_positive(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|value| *value > 0)
}

fn page_url(base_path: &str, page: u32, request: &PageRequest) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &page.to_string());
    if request.per_page() != DEFAULT_PER_PAGE {
        query.append_pair("per_page", &request.per_page().to_string());
    }
    if let Some(term) = request.search() {
        query.append_pair("search", term);
    }
    format!("{base_path}?{}", query.finish())
}

fn render_links(
    current: u32,
    last: u32,
    request: &PageRequest,
    base_path: &str,
) -> Vec<PageLink> {
    let mut links = Vec::with_capacity(last as usize + 2);
    links.push(PageLink {
        url: (current > 1).then(|| page_url(base_path, current - 1, request)),
        label: "Previous".to_owned(),
        active: false,
    });
    for page in 1..=last {
        links.push(PageLink {
            url: Some(page_url(base_path, page, request)),
            label: page.to_string(),
            active: page == current,
        });
    }
    links.push(PageLink {
        url: (current < last).then(|| page_url(base_path, current + 1, request)),
        label: "Next".to_owned(),
        active: false,
    });
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 1, DEFAULT_PER_PAGE)]
    #[case(Some("3"), Some("25"), 3, 25)]
    #[case(Some("1"), Some("500"), 1, MAX_PER_PAGE)]
    fn from_raw_parses_and_clamps(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let request = PageRequest::from_raw(page, per_page, None).expect("valid paging input");
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.per_page(), expected_per_page);
    }

    #[rstest]
    #[case(Some("0"), None)]
    #[case(Some("-1"), None)]
    #[case(Some("abc"), None)]
    #[case(None, Some("zero"))]
    fn from_raw_rejects_non_positive_values(
        #[case] page: Option<&str>,
        #[case] per_page: Option<&str>,
    ) {
        let err = PageRequest::from_raw(page, per_page, None).expect_err("invalid paging input");
        match (page, err) {
            (Some(_), PageRequestError::InvalidPage { .. })
            | (None, PageRequestError::InvalidPerPage { .. }) => {}
            (_, other) => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[rstest]
    #[case(Some("  rust  "), Some("rust"))]
    #[case(Some("   "), None)]
    #[case(None, None)]
    fn search_terms_are_trimmed(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        let request = PageRequest::first_page().with_search(raw.map(str::to_owned));
        assert_eq!(request.search(), expected);
    }

    #[rstest]
    fn offsets_follow_page_number() {
        let request = PageRequest::new(3, 10);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.limit(), 10);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(95, 10)]
    fn build_computes_last_page(#[case] total: u64, #[case] expected_last: u32) {
        let envelope =
            Paginated::build(Vec::<u8>::new(), total, &PageRequest::new(1, 10), "/posts");
        assert_eq!(envelope.last_page, expected_last);
        assert_eq!(envelope.total, total);
    }

    #[rstest]
    fn links_disable_edges_and_mark_active_page() {
        let request = PageRequest::new(2, 10);
        let envelope = Paginated::build(vec![1u8], 25, &request, "/posts");
        let links = &envelope.links;
        assert_eq!(links.len(), 5);
        assert_eq!(links[0].label, "Previous");
        assert_eq!(links[0].url.as_deref(), Some("/posts?page=1"));
        assert!(links[2].active);
        assert_eq!(links[4].label, "Next");
        assert_eq!(links[4].url.as_deref(), Some("/posts?page=3"));
    }

    #[rstest]
    fn first_and_last_pages_disable_their_edge_links() {
        let first = Paginated::build(vec![1u8], 25, &PageRequest::new(1, 10), "/posts");
        assert!(first.links[0].url.is_none());
        let last = Paginated::build(vec![1u8], 25, &PageRequest::new(3, 10), "/posts");
        assert!(last.links.last().expect("next link").url.is_none());
    }

    #[rstest]
    fn links_preserve_search_and_page_size() {
        let request = PageRequest::new(1, 25).with_search(Some("rust club".to_owned()));
        let envelope = Paginated::build(vec![1u8], 30, &request, "/forum");
        assert_eq!(
            envelope.links[1].url.as_deref(),
            Some("/forum?page=1&per_page=25&search=rust+club")
        );
    }

    #[rstest]
    fn envelope_serialises_with_snake_case_keys() {
        let envelope = Paginated::build(vec![7u8], 1, &PageRequest::first_page(), "/posts");
        let value = serde_json::to_value(&envelope).expect("serialisable envelope");
        assert_eq!(value["current_page"], 1);
        assert_eq!(value["last_page"], 1);
        assert!(value["links"].is_array());
    }

    #[rstest]
    fn map_keeps_metadata() {
        let envelope = Paginated::build(vec![1u8, 2], 12, &PageRequest::new(1, 10), "/posts");
        let mapped = envelope.map(|value| value * 2);
        assert_eq!(mapped.data, vec![2, 4]);
        assert_eq!(mapped.last_page, 2);
    }
}
