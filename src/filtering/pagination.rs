use crate::config::SearchConfig;

// Keeps `(page - 1) * limit` well inside the signed range every backend binds OFFSET with.
pub const MAX_PAGE_NUMBER: u64 = 10_000_000;

/// The clamped page a request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page number
    pub page: u64,
    /// Page size, already within `[1, max_page_size]`
    pub limit: u64,
}

impl PageWindow {
    /// Number of matching documents to skip before this page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Lenient integer coercion for the windowing parameters.
///
/// Fractions are truncated toward zero; anything unparseable is `None`.
fn coerce_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation)]
        Ok(value) if value.is_finite() => Some(value.trunc() as i64),
        _ => None,
    }
}

fn clamp(value: i64, min: u64, max: u64) -> u64 {
    u64::try_from(value).unwrap_or(0).clamp(min, max)
}

/// Parse `page` and `limit`. These are clamped rather than rejected:
/// `page` is floored at 1, `limit` is clamped to `[1, max_page_size]`, and a
/// missing or non-numeric value takes the default.
#[must_use]
pub fn parse_pagination(page: Option<&str>, limit: Option<&str>, config: &SearchConfig) -> PageWindow {
    let max_limit = config.max_page_size();
    let page = page
        .and_then(coerce_integer)
        .map_or(1, |value| clamp(value, 1, MAX_PAGE_NUMBER));
    let limit = limit
        .and_then(coerce_integer)
        .map_or(config.default_page_size(), |value| clamp(value, 1, max_limit));

    PageWindow { page, limit }
}

/// `ceil(total / limit)`, never less than 1: an empty result is page 1 of 1.
#[must_use]
pub const fn total_pages(total: u64, limit: u64) -> u64 {
    if limit == 0 {
        return 1;
    }
    let pages = total.div_ceil(limit);
    if pages == 0 { 1 } else { pages }
}
