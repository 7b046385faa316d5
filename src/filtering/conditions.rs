//! Query builder: raw parameters in, a validated [`ListingQuery`] out.
//!
//! Pure and synchronous. The store translates the resulting [`PredicateTree`]
//! into its native form by matching on every [`Predicate`] variant.

use tracing::debug;

use super::pagination::{PageWindow, parse_pagination};
use super::search::{MAX_SEARCH_TERM_LENGTH, TextPattern};
use super::sort::{SortSpec, parse_sorting};
use crate::config::{SearchConfig, TagMatch};
use crate::models::SearchParams;
use crate::validation::ValidationError;

/// Text fields a categorical or name match can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    Category,
    City,
}

/// Numeric fields a threshold can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Rating,
    PriceTier,
}

/// One atomic constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Case-insensitive match on a single text field.
    Text { field: TextField, pattern: TextPattern },
    /// `field >= value`
    AtLeast { field: NumericField, value: f64 },
    /// `field <= value`
    AtMost { field: NumericField, value: f64 },
    /// Tag-set membership under the given policy. `tags` is non-empty and deduplicated.
    Tags { tags: Vec<String>, policy: TagMatch },
    /// Substring match on name OR category OR any tag.
    AnyText { pattern: TextPattern },
}

/// Conjunction of predicates. Empty matches every listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredicateTree {
    predicates: Vec<Predicate>,
}

impl PredicateTree {
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }
}

/// Everything the executor needs for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: PredicateTree,
    pub sort: SortSpec,
    pub window: PageWindow,
}

/// Trimmed, non-blank value or `None`.
fn present(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

fn search_term(field: &str, value: Option<&String>) -> Result<Option<String>, ValidationError> {
    let Some(term) = present(value) else {
        return Ok(None);
    };
    if term.chars().count() > MAX_SEARCH_TERM_LENGTH {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_SEARCH_TERM_LENGTH} characters"),
        ));
    }
    Ok(Some(term.to_string()))
}

/// Strict numeric parsing: blank is unset, anything else must be a finite number.
fn parse_number(field: &str, value: Option<&String>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = present(value) else {
        return Ok(None);
    };
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(ValidationError::not_a_number(field, raw)),
    }
}

/// Split a comma-separated tag list, dropping blanks and duplicates, keeping first-seen order.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Build the predicate tree, sort and page window for one search request.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming the parameter when `minRating` or
/// `maxPrice` is not a number, or a free-text term is too long.
pub fn build_query(params: &SearchParams, config: &SearchConfig) -> Result<ListingQuery, ValidationError> {
    let mut filter = PredicateTree::default();

    if let Some(term) = search_term("q", params.q.as_ref())? {
        filter.push(Predicate::AnyText {
            pattern: TextPattern::substring(term),
        });
    }

    if let Some(term) = search_term("name", params.name.as_ref())? {
        filter.push(Predicate::Text {
            field: TextField::Name,
            pattern: TextPattern::substring(term),
        });
    }

    if let Some(city) = present(params.city.as_ref()) {
        filter.push(Predicate::Text {
            field: TextField::City,
            pattern: TextPattern::whole(city),
        });
    }

    let category = present(params.category.as_ref()).or_else(|| present(params.cuisine.as_ref()));
    if let Some(category) = category {
        filter.push(Predicate::Text {
            field: TextField::Category,
            pattern: TextPattern::whole(category),
        });
    }

    if let Some(value) = parse_number("minRating", params.min_rating.as_ref())? {
        filter.push(Predicate::AtLeast {
            field: NumericField::Rating,
            value,
        });
    }

    if let Some(value) = parse_number("maxPrice", params.max_price.as_ref())? {
        filter.push(Predicate::AtMost {
            field: NumericField::PriceTier,
            value,
        });
    }

    if let Some(raw) = params.tags.as_deref() {
        let tags = parse_tags(raw);
        if !tags.is_empty() {
            filter.push(Predicate::Tags {
                tags,
                policy: config.tag_match,
            });
        }
    }

    let sort = parse_sorting(params.sort_by.as_deref(), params.order.as_deref());
    let window = parse_pagination(params.page.as_deref(), params.limit.as_deref(), config);

    debug!(
        constraints = filter.predicates().len(),
        sort_by = sort.field.as_str(),
        order = sort.direction.as_str(),
        page = window.page,
        limit = window.limit,
        "Built listing query"
    );

    Ok(ListingQuery { filter, sort, window })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filtering::sort::{SortDirection, SortField};

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), serde_json::Value::String((*v).to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    fn build(pairs: &[(&str, &str)]) -> Result<ListingQuery, ValidationError> {
        build_query(&params(pairs), &SearchConfig::default())
    }

    #[test]
    fn test_no_params_matches_everything() {
        let query = build(&[]).unwrap();
        assert!(query.filter.is_empty());
        assert_eq!(query.sort, SortSpec::default());
        assert_eq!(query.window, PageWindow { page: 1, limit: 10 });
    }

    #[test]
    fn test_blank_values_are_unset() {
        let query = build(&[("q", "   "), ("city", ""), ("minRating", " "), ("tags", " , ,")]).unwrap();
        assert!(query.filter.is_empty());
    }

    #[test]
    fn test_free_text_is_trimmed_substring() {
        let query = build(&[("q", "  sushi go ")]).unwrap();
        assert_eq!(
            query.filter.predicates(),
            &[Predicate::AnyText {
                pattern: TextPattern::substring("sushi go")
            }]
        );
    }

    #[test]
    fn test_city_and_category_are_whole_matches() {
        let query = build(&[("city", "Lima"), ("cuisine", "peruvian")]).unwrap();
        assert_eq!(
            query.filter.predicates(),
            &[
                Predicate::Text {
                    field: TextField::City,
                    pattern: TextPattern::whole("Lima")
                },
                Predicate::Text {
                    field: TextField::Category,
                    pattern: TextPattern::whole("peruvian")
                },
            ]
        );
    }

    #[test]
    fn test_category_wins_over_cuisine() {
        let query = build(&[("category", "thai"), ("cuisine", "peruvian")]).unwrap();
        assert_eq!(
            query.filter.predicates(),
            &[Predicate::Text {
                field: TextField::Category,
                pattern: TextPattern::whole("thai")
            }]
        );
    }

    #[test]
    fn test_numeric_thresholds() {
        let query = build(&[("minRating", "4"), ("maxPrice", "2")]).unwrap();
        assert_eq!(
            query.filter.predicates(),
            &[
                Predicate::AtLeast {
                    field: NumericField::Rating,
                    value: 4.0
                },
                Predicate::AtMost {
                    field: NumericField::PriceTier,
                    value: 2.0
                },
            ]
        );
    }

    #[test]
    fn test_non_numeric_min_rating_is_rejected() {
        let err = build(&[("minRating", "four")]).unwrap_err();
        assert_eq!(err.field, "minRating");
    }

    #[test]
    fn test_non_numeric_max_price_is_rejected() {
        let err = build(&[("maxPrice", "cheap")]).unwrap_err();
        assert_eq!(err.field, "maxPrice");
    }

    #[test]
    fn test_non_finite_numbers_are_rejected() {
        assert_eq!(build(&[("minRating", "NaN")]).unwrap_err().field, "minRating");
        assert_eq!(build(&[("maxPrice", "inf")]).unwrap_err().field, "maxPrice");
    }

    #[test]
    fn test_overlong_term_is_rejected() {
        let long = "a".repeat(MAX_SEARCH_TERM_LENGTH + 1);
        assert_eq!(build(&[("q", &long)]).unwrap_err().field, "q");
        assert_eq!(build(&[("name", &long)]).unwrap_err().field, "name");
    }

    #[test]
    fn test_tags_use_configured_policy() {
        let query = build(&[("tags", "vegan, casual,,vegan")]).unwrap();
        assert_eq!(
            query.filter.predicates(),
            &[Predicate::Tags {
                tags: vec!["vegan".to_string(), "casual".to_string()],
                policy: TagMatch::Any
            }]
        );

        let config = SearchConfig::new(TagMatch::All, 10, 100);
        let query = build_query(&params(&[("tags", "vegan")]), &config).unwrap();
        assert!(matches!(
            query.filter.predicates(),
            [Predicate::Tags {
                policy: TagMatch::All,
                ..
            }]
        ));
    }

    #[test]
    fn test_sort_and_window_are_resolved() {
        let query = build(&[("sortBy", "rating"), ("order", "ASC"), ("page", "0"), ("limit", "500")]).unwrap();
        assert_eq!(query.sort.field, SortField::Rating);
        assert_eq!(query.sort.direction, SortDirection::Asc);
        assert_eq!(query.window, PageWindow { page: 1, limit: 100 });
    }

    #[test]
    fn test_metacharacters_stay_in_the_term() {
        let query = build(&[("q", "a.b*(c)")]).unwrap();
        let [Predicate::AnyText { pattern }] = query.filter.predicates() else {
            panic!("expected a single free-text predicate");
        };
        assert_eq!(pattern.term(), "a.b*(c)");
        let matcher = pattern.matcher().unwrap();
        assert!(matcher.is_match("xa.b*(c)x"));
        assert!(!matcher.is_match("aXbbbc"));
    }
}
