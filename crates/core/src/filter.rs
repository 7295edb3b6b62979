//! Listing criteria for the device catalog.
//!
//! [`DeviceFilter`] is the strongly typed Filter Specification consumed by the
//! cache key deriver and the query builder. [`DeviceFilterParams`] is its raw
//! query-string form; converting one into the other never fails. Unparseable
//! or out-of-range values fall back to "unset" (optional fields) or to the
//! default (page, page size, sort).

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// First page (pages are 1-based).
pub const DEFAULT_PAGE: i64 = 1;

/// Default number of devices per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum number of devices per page.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided limit into `1..=max`, using `default` when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    match limit {
        Some(n) if n >= 1 => n.min(max),
        _ => default,
    }
}

// ---------------------------------------------------------------------------
// Sort mode
// ---------------------------------------------------------------------------

/// Ordering of a device listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortMode {
    /// Newest first.
    #[default]
    Recent,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    /// Parse a `sort` query value. Anything unrecognized is [`SortMode::Recent`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "price_asc" => SortMode::PriceAsc,
            "price_desc" => SortMode::PriceDesc,
            _ => SortMode::Recent,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Recent => "recent",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter specification
// ---------------------------------------------------------------------------

/// Normalized listing criteria.
///
/// Optional fields that are `None` contribute nothing to the generated query.
/// Text fields are stored trimmed and never as `Some("")`; use the `with_*`
/// builders to get that normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Tri-state availability: unset, `true`, or `false`.
    pub available: Option<bool>,
    /// Inclusive lower bound on `price_per_day`.
    pub min_price: Option<f64>,
    /// Inclusive upper bound on `price_per_day`.
    pub max_price: Option<f64>,
    /// Case-insensitive substring match on `city`.
    pub city: Option<String>,
    /// Case-insensitive substring match on `region`.
    pub region: Option<String>,
    pub sort: SortMode,
    /// 1-based page number.
    pub page: i64,
    pub page_size: i64,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            category: None,
            available: None,
            min_price: None,
            max_price: None,
            city: None,
            region: None,
            sort: SortMode::Recent,
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DeviceFilter {
    pub fn with_category(mut self, category: impl AsRef<str>) -> Self {
        self.category = non_empty(category.as_ref());
        self
    }

    pub fn with_available(mut self, available: bool) -> Self {
        self.available = Some(available);
        self
    }

    pub fn with_min_price(mut self, price: f64) -> Self {
        self.min_price = valid_price(price);
        self
    }

    pub fn with_max_price(mut self, price: f64) -> Self {
        self.max_price = valid_price(price);
        self
    }

    pub fn with_city(mut self, city: impl AsRef<str>) -> Self {
        self.city = non_empty(city.as_ref());
        self
    }

    pub fn with_region(mut self, region: impl AsRef<str>) -> Self {
        self.region = non_empty(region.as_ref());
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Set the page; values below 1 fall back to [`DEFAULT_PAGE`].
    pub fn with_page(mut self, page: i64) -> Self {
        self.page = if page >= 1 { page } else { DEFAULT_PAGE };
        self
    }

    /// Set the page size; values below 1 fall back to [`DEFAULT_PAGE_SIZE`],
    /// values above [`MAX_PAGE_SIZE`] are capped.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = clamp_limit(Some(page_size), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        self
    }

    /// Page number actually used for the query, never below 1.
    pub fn effective_page(&self) -> i64 {
        self.page.max(1)
    }

    /// Page size actually used for the query, in `1..=MAX_PAGE_SIZE`.
    pub fn effective_page_size(&self) -> i64 {
        clamp_limit(Some(self.page_size), DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE)
    }

    /// Row offset of the first device on the current page.
    pub fn offset(&self) -> i64 {
        (self.effective_page() - 1).saturating_mul(self.effective_page_size())
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn valid_price(price: f64) -> Option<f64> {
    // Normalizes -0.0 so that it fingerprints like 0.0.
    (price.is_finite() && price >= 0.0).then_some(price + 0.0)
}

// ---------------------------------------------------------------------------
// Query-string parameters
// ---------------------------------------------------------------------------

/// Raw listing parameters (`GET /devices?category=&available=&...`).
///
/// Every field is kept as a string so a malformed value degrades to the
/// default instead of rejecting the whole request.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceFilterParams {
    pub category: Option<String>,
    pub available: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl DeviceFilterParams {
    pub fn into_filter(self) -> DeviceFilter {
        let mut filter = DeviceFilter::default();

        if let Some(category) = self.category {
            filter = filter.with_category(category);
        }
        filter.available = self.available.as_deref().and_then(parse_tristate);
        filter.min_price = self.min_price.as_deref().and_then(parse_price);
        filter.max_price = self.max_price.as_deref().and_then(parse_price);
        if let Some(city) = self.city {
            filter = filter.with_city(city);
        }
        if let Some(region) = self.region {
            filter = filter.with_region(region);
        }
        if let Some(sort) = self.sort.as_deref() {
            filter = filter.with_sort(SortMode::parse(sort));
        }
        if let Some(page) = self.page.as_deref().and_then(parse_int) {
            filter = filter.with_page(page);
        }
        if let Some(limit) = self.limit.as_deref().and_then(parse_int) {
            filter = filter.with_page_size(limit);
        }

        filter
    }
}

impl From<DeviceFilterParams> for DeviceFilter {
    fn from(params: DeviceFilterParams) -> Self {
        params.into_filter()
    }
}

fn parse_tristate(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().and_then(valid_price)
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
